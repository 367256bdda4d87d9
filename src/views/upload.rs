//! Meeting upload form.

use std::fmt;
use std::time::Duration;

use super::{write_header, Page};
use crate::services::{meetings, MutationState};
use crate::state::AppState;
use crate::types::{UploadMeetingData, ANONYMOUS_UPLOADER};

pub const SAMPLE_TITLE: &str = "Sprint Planning Meeting - Dec 19";
pub const SAMPLE_UPLOADER: &str = "sarah@example.com";
pub const SAMPLE_TRANSCRIPT: &str = include_str!("sample_transcript.txt");

/// What the caller should do after a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Title or transcript was blank. Nothing was sent.
    Invalid,
    /// Navigate to `redirect_to` once `after` has elapsed.
    Uploaded { redirect_to: Page, after: Duration },
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub title: String,
    pub transcript: String,
    pub uploaded_by: String,
    pub state: MutationState<serde_json::Value>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_submit(&self) -> bool {
        !self.state.is_pending()
            && !self.title.trim().is_empty()
            && !self.transcript.trim().is_empty()
    }

    /// Request body for the current fields, or `None` if a required field
    /// is blank. Fields are sent as typed. Only the uploader gets a default.
    pub fn submission(&self) -> Option<UploadMeetingData> {
        if self.title.trim().is_empty() || self.transcript.trim().is_empty() {
            return None;
        }
        let uploaded_by = if self.uploaded_by.is_empty() {
            ANONYMOUS_UPLOADER.to_string()
        } else {
            self.uploaded_by.clone()
        };
        Some(UploadMeetingData {
            title: self.title.clone(),
            transcript: self.transcript.clone(),
            uploaded_by,
        })
    }

    pub fn load_sample(&mut self) {
        self.title = SAMPLE_TITLE.to_string();
        self.transcript = SAMPLE_TRANSCRIPT.to_string();
        self.uploaded_by = SAMPLE_UPLOADER.to_string();
    }

    fn clear_fields(&mut self) {
        self.title.clear();
        self.transcript.clear();
        self.uploaded_by.clear();
    }

    pub async fn submit(&mut self, state: &AppState) -> SubmitOutcome {
        if self.state.is_pending() {
            return SubmitOutcome::Invalid;
        }
        let Some(data) = self.submission() else {
            log::debug!("upload form incomplete, not submitting");
            return SubmitOutcome::Invalid;
        };

        self.state = MutationState::Pending;
        let result = meetings::upload_meeting(state, &data).await;
        let uploaded = result.is_ok();
        self.state = MutationState::from_result(result);

        if uploaded {
            self.clear_fields();
            SubmitOutcome::Uploaded {
                redirect_to: Page::Dashboard,
                after: state.config.redirect_delay(),
            }
        } else {
            SubmitOutcome::Failed
        }
    }
}

fn field(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    if value.is_empty() {
        writeln!(f, "  {:<22} -", label)
    } else {
        writeln!(f, "  {:<22} {}", label, value)
    }
}

impl fmt::Display for UploadForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, Page::Upload)?;

        field(f, "Meeting Title *", &self.title)?;
        field(f, "Your Email (optional)", &self.uploaded_by)?;
        let lines = self.transcript.lines().count();
        if lines == 0 {
            field(f, "Meeting Transcript *", "")?;
        } else {
            field(
                f,
                "Meeting Transcript *",
                &format!("{} lines, {} chars", lines, self.transcript.chars().count()),
            )?;
        }
        writeln!(f)?;

        match &self.state {
            MutationState::Pending => writeln!(f, "⟳ Processing..."),
            MutationState::Success(_) => writeln!(f, "✓ Meeting uploaded! Redirecting..."),
            MutationState::Error(_) => writeln!(f, "✗ Upload failed"),
            MutationState::Idle if self.can_submit() => writeln!(f, "[Upload Meeting]"),
            MutationState::Idle => writeln!(f, "(Upload Meeting)"),
        }
    }
}
