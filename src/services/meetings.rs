// Meeting upload. Extraction of action items happens server-side.

use crate::error::MutationError;
use crate::query::QueryKey;
use crate::state::AppState;
use crate::types::UploadMeetingData;

/// Queries made stale by a new meeting.
pub fn affected_queries() -> Vec<QueryKey> {
    vec![
        QueryKey::dashboard_metrics(),
        QueryKey::actions(),
        QueryKey::recent_actions(),
    ]
}

/// Submit a transcript. On success the dashboard and action queries are
/// invalidated. On failure nothing in the cache changes.
pub async fn upload_meeting(
    state: &AppState,
    data: &UploadMeetingData,
) -> Result<serde_json::Value, MutationError> {
    let response = state.api.upload_meeting(data).await?;
    state.queries.invalidate_all(&affected_queries());
    log::info!(
        "Uploaded meeting '{}' ({} chars) for {}",
        data.title,
        data.transcript.len(),
        data.uploaded_by
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::state::test_state;
    use crate::types::ANONYMOUS_UPLOADER;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn data() -> UploadMeetingData {
        UploadMeetingData {
            title: "Retro".to_string(),
            transcript: "Alice: ship it".to_string(),
            uploaded_by: ANONYMOUS_UPLOADER.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upload_invalidates_dashboard_and_actions() {
        let api = Arc::new(FakeApi::default());
        let state = test_state(api.clone());
        crate::services::dashboard::fetch_metrics(&state).await.unwrap();
        crate::services::actions::fetch_actions(&state, &Default::default())
            .await
            .unwrap();
        crate::services::dashboard::fetch_recent_actions(&state)
            .await
            .unwrap();

        let response = upload_meeting(&state, &data()).await.unwrap();
        assert_eq!(response["success"], true);
        assert_eq!(api.uploads.lock().len(), 1);
        assert!(state.queries.is_stale(&QueryKey::dashboard_metrics()));
        assert!(state.queries.is_stale(&QueryKey::actions()));
        assert!(state.queries.is_stale(&QueryKey::recent_actions()));
    }

    #[tokio::test]
    async fn test_failed_upload_leaves_cache_fresh() {
        let api = Arc::new(FakeApi::default());
        let state = test_state(api.clone());
        crate::services::dashboard::fetch_metrics(&state).await.unwrap();
        api.fail_writes.store(true, Ordering::SeqCst);

        assert!(upload_meeting(&state, &data()).await.is_err());
        assert!(!state.queries.is_stale(&QueryKey::dashboard_metrics()));
    }
}
