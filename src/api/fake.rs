//! In-memory `DashboardApi` for tests. Counts calls per endpoint and can be
//! told to fail or to hold a response until released.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use super::DashboardApi;
use crate::error::ApiError;
use crate::types::{
    ActionFilter, ActionItem, ActionPatch, ActionStatus, ActionsPage, DashboardMetrics,
    Priority, PriorityBreakdown, UploadMeetingData,
};

#[derive(Default)]
pub(crate) struct FakeApi {
    pub actions: Mutex<Vec<ActionItem>>,
    pub metrics_calls: AtomicUsize,
    pub actions_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub uploads: Mutex<Vec<UploadMeetingData>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    /// When set, reads wait on this before answering.
    pub gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeApi {
    pub fn with_actions(actions: Vec<ActionItem>) -> Self {
        let api = Self::default();
        *api.actions.lock() = actions;
        api
    }

    pub fn hold_reads(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock() = Some(notify.clone());
        notify
    }

    pub fn metrics_calls(&self) -> usize {
        self.metrics_calls.load(Ordering::SeqCst)
    }

    pub fn actions_calls(&self) -> usize {
        self.actions_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    async fn wait_gate(&self) {
        let gate = self.gate.lock().clone();
        if let Some(notify) = gate {
            notify.notified().await;
        }
    }

    fn read_result(&self) -> Result<(), ApiError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ApiError::Http {
                status: 500,
                message: "fake read failure".to_string(),
            });
        }
        Ok(())
    }

    fn write_result(&self) -> Result<(), ApiError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Http {
                status: 400,
                message: "fake write failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DashboardApi for FakeApi {
    async fn get_metrics(&self) -> Result<DashboardMetrics, ApiError> {
        self.metrics_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        self.read_result()?;

        let actions = self.actions.lock();
        let mut breakdown = PriorityBreakdown::default();
        let mut completed = 0;
        let mut overdue = 0;
        for action in actions.iter() {
            match action.status {
                ActionStatus::Done => completed += 1,
                ActionStatus::Overdue => overdue += 1,
                _ => {}
            }
            if action.status != ActionStatus::Done {
                match action.priority {
                    Priority::High => breakdown.high += 1,
                    Priority::Medium => breakdown.medium += 1,
                    Priority::Low => breakdown.low += 1,
                }
            }
        }
        let total = actions.len() as u64;
        Ok(DashboardMetrics {
            total_meetings: 1,
            active_actions: total - completed,
            completed_actions: completed,
            overdue_actions: overdue,
            completion_rate: if total == 0 {
                0.0
            } else {
                (completed * 100 / total) as f64
            },
            priority_breakdown: breakdown,
        })
    }

    async fn get_actions(&self, filter: &ActionFilter) -> Result<ActionsPage, ApiError> {
        self.actions_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        self.read_result()?;

        let actions: Vec<ActionItem> = self
            .actions
            .lock()
            .iter()
            .filter(|a| filter.status.map_or(true, |s| a.status == s))
            .filter(|a| filter.priority.map_or(true, |p| a.priority == p))
            .filter(|a| filter.assignee.as_ref().map_or(true, |x| &a.assignee == x))
            .cloned()
            .collect();
        let total = actions.len() as u64;
        Ok(ActionsPage { actions, total })
    }

    async fn update_action(&self, id: &str, patch: &ActionPatch) -> Result<ActionItem, ApiError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.write_result()?;

        let mut actions = self.actions.lock();
        let action = actions
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ApiError::Http {
                status: 404,
                message: format!("action {} not found", id),
            })?;
        if let Some(status) = patch.status {
            action.status = status;
        }
        if let Some(assignee) = &patch.assignee {
            action.assignee = assignee.clone();
        }
        if let Some(due_date) = &patch.due_date {
            action.due_date = due_date.clone();
        }
        Ok(action.clone())
    }

    async fn upload_meeting(
        &self,
        data: &UploadMeetingData,
    ) -> Result<serde_json::Value, ApiError> {
        self.uploads.lock().push(data.clone());
        self.write_result()?;
        Ok(serde_json::json!({ "success": true, "meetingId": "mtg-new" }))
    }
}

pub(crate) fn action(id: &str, status: ActionStatus, priority: Priority) -> ActionItem {
    ActionItem {
        id: id.to_string(),
        meeting_id: "mtg-1".to_string(),
        description: format!("Action {}", id),
        assignee: "Sarah".to_string(),
        due_date: None,
        priority,
        status,
        created_at: "2025-12-19T09:00:00Z".to_string(),
        completed_at: None,
    }
}
