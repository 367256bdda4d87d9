// Action item reads and status mutations.

use std::sync::Arc;

use crate::error::{FetchError, MutationError};
use crate::query::QueryKey;
use crate::state::AppState;
use crate::types::{ActionFilter, ActionItem, ActionPatch, ActionStatus, ActionsPage};

/// Queries made stale by any change to an action.
pub fn affected_queries() -> Vec<QueryKey> {
    vec![
        QueryKey::actions(),
        QueryKey::dashboard_metrics(),
        QueryKey::recent_actions(),
    ]
}

/// Cached action list for `filter`.
pub async fn fetch_actions(
    state: &AppState,
    filter: &ActionFilter,
) -> Result<Arc<ActionsPage>, FetchError> {
    let key = QueryKey::filtered_actions(filter);
    state
        .queries
        .fetch_query(&key, || state.api.get_actions(filter))
        .await
}

/// Apply a partial update and invalidate everything derived from actions.
pub async fn update_action(
    state: &AppState,
    id: &str,
    patch: &ActionPatch,
) -> Result<ActionItem, MutationError> {
    let updated = state.api.update_action(id, patch).await?;
    let invalidated = state.queries.invalidate_all(&affected_queries());
    log::info!(
        "Action {} updated (status {}), {} cached queries invalidated",
        updated.id,
        updated.status,
        invalidated
    );
    Ok(updated)
}

/// Kanban quick action: move an action to `status`.
pub async fn update_action_status(
    state: &AppState,
    id: &str,
    status: ActionStatus,
) -> Result<ActionItem, MutationError> {
    update_action(state, id, &ActionPatch::status(status)).await
}
