//! Client configuration.
//!
//! Stored in `~/.teamsync/config.json`. Every field is optional; the
//! `TEAMSYNC_API_URL` environment variable and the `--api-url` flag take
//! precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "TEAMSYNC_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Pause between a successful upload and the jump back to the dashboard.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    /// How many actions the dashboard's "Recent Actions" card shows.
    #[serde(default = "default_recent_actions_limit")]
    pub recent_actions_limit: usize,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_redirect_delay_ms() -> u64 {
    2000
}

fn default_recent_actions_limit() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            redirect_delay_ms: default_redirect_delay_ms(),
            recent_actions_limit: default_recent_actions_limit(),
        }
    }
}

impl Config {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// Parsed base URL. Only http and https are accepted.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        parse_base_url(&self.api_url)
    }

    /// Apply an explicit URL override (env var or CLI flag). Blank values are ignored.
    pub fn with_api_url(mut self, api_url: Option<&str>) -> Self {
        if let Some(url) = api_url.map(str::trim).filter(|u| !u.is_empty()) {
            self.api_url = url.to_string();
        }
        self
    }
}

/// Default location of the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".teamsync").join("config.json"))
}

/// Read a config file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve the effective config: file, then environment, then CLI flag.
pub fn load_config(cli_api_url: Option<&str>) -> Result<Config, ConfigError> {
    let config = match config_path() {
        Some(path) => load_config_from(&path)?,
        None => Config::default(),
    };

    let env_url = std::env::var(ENV_API_URL).ok();
    let config = config
        .with_api_url(env_url.as_deref())
        .with_api_url(cli_api_url);

    config.base_url()?;
    log::info!("Using TeamSync API at {}", config.api_url);
    Ok(config)
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(raw.to_string())),
    }
}
