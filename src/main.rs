//! teamsync - meeting action-item dashboard in the terminal.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use teamsync_lib::config::load_config;
use teamsync_lib::query::QueryStatus;
use teamsync_lib::services::{actions, dashboard, MutationState};
use teamsync_lib::state::AppState;
use teamsync_lib::types::{ActionFilter, ActionStatus, Priority};
use teamsync_lib::views::board::{board_page, quick_actions, QuickAction};
use teamsync_lib::views::dashboard::dashboard_page;
use teamsync_lib::views::upload::{SubmitOutcome, UploadForm};
use teamsync_lib::views::Page;

#[derive(Parser, Debug)]
#[command(name = "teamsync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the TeamSync API (overrides config and TEAMSYNC_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Metrics, priority breakdown and recent actions
    Dashboard,

    /// Kanban board of action items
    Actions {
        #[arg(long)]
        status: Option<ActionStatus>,

        #[arg(long)]
        priority: Option<Priority>,

        #[arg(long)]
        assignee: Option<String>,
    },

    /// Move an action item to in progress
    Start {
        /// Action item id
        id: String,
    },

    /// Mark an action item done
    Complete {
        /// Action item id
        id: String,
    },

    /// Upload a meeting transcript, then show the dashboard
    Upload {
        /// Meeting title
        #[arg(long, required_unless_present = "sample")]
        title: Option<String>,

        /// File holding the transcript text
        #[arg(long, conflicts_with = "sample")]
        transcript_file: Option<PathBuf>,

        /// Fill the form with the bundled sample meeting
        #[arg(long)]
        sample: bool,

        /// Uploader email (defaults to anonymous)
        #[arg(long)]
        uploaded_by: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

async fn show_dashboard(state: &AppState) {
    let data = dashboard::load_dashboard(state).await;
    let page = dashboard_page(
        &data.metrics,
        &data.recent_actions,
        state.config.recent_actions_limit,
    );
    print!("{}", page);
}

async fn show_board(state: &AppState, filter: &ActionFilter) {
    let status = QueryStatus::from_result(actions::fetch_actions(state, filter).await);
    print!("{}", board_page(&status, false));
}

async fn run_quick_action(state: &AppState, id: &str, action: QuickAction) -> Result<()> {
    let filter = ActionFilter::default();
    let page = actions::fetch_actions(state, &filter)
        .await
        .context("Failed to load actions")?;
    let Some(item) = page.actions.iter().find(|a| a.id == id) else {
        bail!("No action item with id {}", id);
    };
    if !quick_actions(item.status).contains(&action) {
        bail!("{} is not available for an action that is {}", action.label(), item.status);
    }

    let mutation = MutationState::from_result(
        actions::update_action_status(state, id, action.target()).await,
    );
    if let MutationState::Error(e) = &mutation {
        bail!("Failed to update action {}: {}", id, e.cause());
    }
    show_board(state, &filter).await;
    Ok(())
}

async fn upload(
    state: &AppState,
    title: Option<String>,
    transcript_file: Option<PathBuf>,
    sample: bool,
    uploaded_by: Option<String>,
) -> Result<()> {
    let mut form = UploadForm::new();
    if sample {
        form.load_sample();
    }
    if let Some(title) = title {
        form.title = title;
    }
    if let Some(path) = transcript_file {
        form.transcript = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    }
    if let Some(uploaded_by) = uploaded_by {
        form.uploaded_by = uploaded_by;
    }

    match form.submit(state).await {
        SubmitOutcome::Invalid => {
            print!("{}", form);
            bail!("Meeting title and transcript are required");
        }
        SubmitOutcome::Failed => {
            print!("{}", form);
            bail!("Upload failed");
        }
        SubmitOutcome::Uploaded { redirect_to, after } => {
            print!("{}", form);
            tokio::time::sleep(after).await;
            log::debug!("redirecting to {}", redirect_to.route());
            if redirect_to == Page::Dashboard {
                show_dashboard(state).await;
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.api_url.as_deref()).context("Failed to load configuration")?;
    let state = AppState::new(config).context("Failed to create API client")?;

    let result = match cli.command {
        Commands::Dashboard => {
            show_dashboard(&state).await;
            Ok(())
        }
        Commands::Actions {
            status,
            priority,
            assignee,
        } => {
            let filter = ActionFilter {
                status,
                priority,
                assignee,
            };
            show_board(&state, &filter).await;
            Ok(())
        }
        Commands::Start { id } => run_quick_action(&state, &id, QuickAction::Start).await,
        Commands::Complete { id } => run_quick_action(&state, &id, QuickAction::Complete).await,
        Commands::Upload {
            title,
            transcript_file,
            sample,
            uploaded_by,
        } => upload(&state, title, transcript_file, sample, uploaded_by).await,
    };

    state.end_session();
    result
}
