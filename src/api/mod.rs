//! TeamSync API access.
//!
//! `DashboardApi` is the seam between pages and the remote service. The
//! production implementation is `client::HttpDashboardApi`; tests use the
//! in-memory `fake::FakeApi`.
//!
//! Each method performs exactly one request. No retries, no timeouts beyond
//! the transport defaults.

pub mod client;
#[cfg(test)]
pub(crate) mod fake;

use crate::error::ApiError;
use crate::types::{
    ActionFilter, ActionItem, ActionPatch, ActionsPage, DashboardMetrics, UploadMeetingData,
};

pub use client::HttpDashboardApi;

#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /dashboard`
    async fn get_metrics(&self) -> Result<DashboardMetrics, ApiError>;

    /// `GET /actions` with the filter as query parameters.
    async fn get_actions(&self, filter: &ActionFilter) -> Result<ActionsPage, ApiError>;

    /// `PUT /actions/{id}`
    async fn update_action(&self, id: &str, patch: &ActionPatch) -> Result<ActionItem, ApiError>;

    /// `POST /meetings/upload`. The response body is opaque to the client.
    async fn upload_meeting(&self, data: &UploadMeetingData)
        -> Result<serde_json::Value, ApiError>;
}
