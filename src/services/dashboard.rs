// Dashboard service: metrics snapshot plus the recent-actions list.

use std::sync::Arc;

use crate::error::FetchError;
use crate::query::{QueryKey, QueryStatus};
use crate::state::AppState;
use crate::types::{ActionFilter, ActionsPage, DashboardMetrics};

/// Query results the dashboard page renders from.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub metrics: QueryStatus<DashboardMetrics>,
    pub recent_actions: QueryStatus<ActionsPage>,
}

pub async fn fetch_metrics(state: &AppState) -> Result<Arc<DashboardMetrics>, FetchError> {
    state
        .queries
        .fetch_query(&QueryKey::dashboard_metrics(), || state.api.get_metrics())
        .await
}

/// Unfiltered action list under its own key, so the dashboard card keeps
/// its data while the board refetches.
pub async fn fetch_recent_actions(state: &AppState) -> Result<Arc<ActionsPage>, FetchError> {
    let filter = ActionFilter::default();
    state
        .queries
        .fetch_query(&QueryKey::recent_actions(), || state.api.get_actions(&filter))
        .await
}

/// Issue both dashboard queries concurrently.
pub async fn load_dashboard(state: &AppState) -> DashboardData {
    let (metrics, recent_actions) =
        tokio::join!(fetch_metrics(state), fetch_recent_actions(state));

    if let Err(e) = &recent_actions {
        // The list is secondary; the page still renders from metrics.
        log::warn!("Recent actions unavailable: {}", e.cause());
    }

    DashboardData {
        metrics: QueryStatus::from_result(metrics),
        recent_actions: QueryStatus::from_result(recent_actions),
    }
}
