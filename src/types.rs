use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder uploader recorded when the form's email field is left empty.
pub const ANONYMOUS_UPLOADER: &str = "anonymous";

/// Action priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

/// Action lifecycle status. `Overdue` is assigned by the server only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    InProgress,
    Done,
    Overdue,
}

impl ActionStatus {
    /// Kanban column order.
    pub const ALL: [ActionStatus; 4] = [
        ActionStatus::Pending,
        ActionStatus::InProgress,
        ActionStatus::Done,
        ActionStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Pending => "pending",
            ActionStatus::InProgress => "in_progress",
            ActionStatus::Done => "done",
            ActionStatus::Overdue => "overdue",
        }
    }

    /// Column title on the board.
    pub fn title(&self) -> &'static str {
        match self {
            ActionStatus::Pending => "Pending",
            ActionStatus::InProgress => "In Progress",
            ActionStatus::Done => "Done",
            ActionStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "pending" => Ok(ActionStatus::Pending),
            "in_progress" => Ok(ActionStatus::InProgress),
            "done" => Ok(ActionStatus::Done),
            "overdue" => Ok(ActionStatus::Overdue),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// A single action item extracted from a meeting transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub id: String,
    pub meeting_id: String,
    pub description: String,
    pub assignee: String,
    #[serde(default)]
    pub due_date: Option<String>,
    pub priority: Priority,
    pub status: ActionStatus,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Per-priority counts of active action items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl PriorityBreakdown {
    pub fn total(&self) -> u64 {
        self.high + self.medium + self.low
    }

    pub fn count(&self, priority: Priority) -> u64 {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Aggregate dashboard numbers, computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_meetings: u64,
    pub active_actions: u64,
    pub completed_actions: u64,
    pub overdue_actions: u64,
    pub completion_rate: f64,
    pub priority_breakdown: PriorityBreakdown,
}

/// Response of `GET /actions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionsPage {
    #[serde(default)]
    pub actions: Vec<ActionItem>,
    #[serde(default)]
    pub total: u64,
}

/// Query-string filter for `GET /actions`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl ActionFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.assignee.is_none()
    }

    /// Stable `name=value` segments, used to extend the `actions` query key.
    pub fn key_segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        if let Some(status) = self.status {
            segments.push(format!("status={}", status));
        }
        if let Some(priority) = self.priority {
            segments.push(format!("priority={}", priority));
        }
        if let Some(assignee) = &self.assignee {
            segments.push(format!("assignee={}", assignee));
        }
        segments
    }
}

/// Partial update body for `PUT /actions/{id}`.
///
/// `due_date` is doubly optional: `None` leaves it untouched,
/// `Some(None)` clears it on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
}

impl ActionPatch {
    pub fn status(status: ActionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Body for `POST /meetings/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMeetingData {
    pub title: String,
    pub transcript: String,
    pub uploaded_by: String,
}

/// Parse an ISO-8601 timestamp or bare `YYYY-MM-DD` date from the API.
pub fn parse_api_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Display form of an API date. Unparseable input is shown as-is.
pub fn format_display_date(s: &str) -> String {
    match parse_api_datetime(s) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => s.to_string(),
    }
}
