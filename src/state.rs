use std::sync::Arc;

use crate::api::{DashboardApi, HttpDashboardApi};
use crate::config::Config;
use crate::error::ConfigError;
use crate::query::QueryClient;

/// Everything one dashboard session shares: the API, the query cache and
/// the resolved config. Created at startup, `end_session` clears the cache.
pub struct AppState {
    pub config: Config,
    pub api: Arc<dyn DashboardApi>,
    pub queries: QueryClient,
}

impl AppState {
    /// Session against the HTTP API at `config.api_url`. The URL goes
    /// through the same validation as the loaded config.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        let api = HttpDashboardApi::new(base_url).map_err(ConfigError::HttpClient)?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    pub fn with_api(config: Config, api: Arc<dyn DashboardApi>) -> Self {
        Self {
            config,
            api,
            queries: QueryClient::new(),
        }
    }

    pub fn end_session(&self) {
        self.queries.clear();
        log::debug!("session ended");
    }
}

#[cfg(test)]
pub(crate) fn test_state(api: Arc<crate::api::fake::FakeApi>) -> AppState {
    AppState::with_api(Config::default(), api)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_url() {
        let config = Config::default().with_api_url(Some("::nope::"));
        assert!(matches!(
            AppState::new(config),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        let config = Config::default().with_api_url(Some("ftp://teamsync.dev"));
        assert!(matches!(
            AppState::new(config),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_new_with_default_config() {
        let state = AppState::new(Config::default()).unwrap();
        assert!(state.queries.is_empty());
    }
}
