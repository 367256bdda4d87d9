//! HTTP client for the TeamSync API.
//!
//! Uses reqwest with JSON bodies. Paths are resolved against the configured
//! base URL, so a base like `https://host/api/` keeps its `/api` prefix.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use super::DashboardApi;
use crate::error::ApiError;
use crate::types::{
    ActionFilter, ActionItem, ActionPatch, ActionsPage, DashboardMetrics, UploadMeetingData,
};

pub struct HttpDashboardApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDashboardApi {
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint below the base URL. Segments are percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request for an endpoint with the JSON content headers every call carries.
    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        Ok(self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json"))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = request.send().await.map_err(ApiError::Network)?;

        let status = resp.status();
        let url = resp.url().clone();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            log::warn!("TeamSync API {} returned {}", url.path(), status);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = resp.bytes().await?;
        log::debug!("TeamSync API {} -> {} ({} bytes)", url.path(), status, body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait::async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn get_metrics(&self) -> Result<DashboardMetrics, ApiError> {
        self.send_json(self.request(Method::GET, &["dashboard"])?)
            .await
    }

    async fn get_actions(&self, filter: &ActionFilter) -> Result<ActionsPage, ApiError> {
        self.send_json(self.request(Method::GET, &["actions"])?.query(filter))
            .await
    }

    async fn update_action(&self, id: &str, patch: &ActionPatch) -> Result<ActionItem, ApiError> {
        self.send_json(self.request(Method::PUT, &["actions", id])?.json(patch))
            .await
    }

    async fn upload_meeting(
        &self,
        data: &UploadMeetingData,
    ) -> Result<serde_json::Value, ApiError> {
        self.send_json(self.request(Method::POST, &["meetings", "upload"])?.json(data))
            .await
    }
}
