//! Dashboard page: metric cards, priority chart and recent actions.

use std::fmt;

use super::transforms::{priority_percentages, recent_actions, status_label};
use super::{write_header, Page, PageView};
use crate::query::QueryStatus;
use crate::types::{format_display_date, ActionsPage, DashboardMetrics, Priority};

const BAR_WIDTH: u32 = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: u64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriorityBar {
    pub priority: Priority,
    pub count: u64,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriorityChart {
    /// No active actions at all.
    Empty,
    Bars(Vec<PriorityBar>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentActionRow {
    pub description: String,
    pub assignee: String,
    pub due: Option<String>,
    pub priority: Priority,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub cards: Vec<MetricCard>,
    pub chart: PriorityChart,
    pub recent: Vec<RecentActionRow>,
}

/// Metrics drive loading/error. The recent list only adds rows when present.
pub fn dashboard_page(
    metrics: &QueryStatus<DashboardMetrics>,
    actions: &QueryStatus<ActionsPage>,
    recent_limit: usize,
) -> PageView<DashboardView> {
    PageView::from_query(
        metrics,
        "Failed to load dashboard",
        Some("Please check your connection and try again."),
        |metrics| DashboardView {
            cards: metric_cards(metrics),
            chart: priority_chart(metrics),
            recent: actions
                .data()
                .map(|page| recent_rows(page, recent_limit))
                .unwrap_or_default(),
        },
    )
}

pub fn metric_cards(metrics: &DashboardMetrics) -> Vec<MetricCard> {
    vec![
        MetricCard {
            title: "Total Meetings",
            value: metrics.total_meetings,
            note: None,
        },
        MetricCard {
            title: "Active Actions",
            value: metrics.active_actions,
            note: None,
        },
        MetricCard {
            title: "Completed",
            value: metrics.completed_actions,
            note: Some(format!("{}% completion rate", metrics.completion_rate)),
        },
        MetricCard {
            title: "Overdue",
            value: metrics.overdue_actions,
            note: None,
        },
    ]
}

pub fn priority_chart(metrics: &DashboardMetrics) -> PriorityChart {
    let breakdown = &metrics.priority_breakdown;
    if breakdown.total() == 0 {
        return PriorityChart::Empty;
    }
    let pct = priority_percentages(breakdown);
    PriorityChart::Bars(
        [Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .map(|priority| PriorityBar {
                priority,
                count: breakdown.count(priority),
                percentage: pct.get(priority),
            })
            .collect(),
    )
}

fn recent_rows(page: &ActionsPage, limit: usize) -> Vec<RecentActionRow> {
    recent_actions(&page.actions, limit)
        .iter()
        .map(|action| RecentActionRow {
            description: action.description.clone(),
            assignee: action.assignee.clone(),
            due: action.due_date.as_deref().map(format_display_date),
            priority: action.priority,
            status: status_label(action.status),
        })
        .collect()
}

pub(crate) fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "●",
        Priority::Medium => "◐",
        Priority::Low => "○",
    }
}

fn bar(percentage: u32) -> String {
    let filled = (percentage.min(100) * BAR_WIDTH / 100) as usize;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH as usize - filled)
    )
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, Page::Dashboard)?;

        for card in &self.cards {
            write!(f, "  {:<16} {:>6}", card.title, card.value)?;
            match &card.note {
                Some(note) => writeln!(f, "   ({})", note)?,
                None => writeln!(f)?,
            }
        }
        writeln!(f)?;

        writeln!(f, "Priority Breakdown")?;
        match &self.chart {
            PriorityChart::Empty => writeln!(f, "  No active actions to display")?,
            PriorityChart::Bars(bars) => {
                for b in bars {
                    writeln!(
                        f,
                        "  {:<16} {} {} ({}%)",
                        format!("{} Priority", b.priority.label()),
                        bar(b.percentage),
                        b.count,
                        b.percentage
                    )?;
                }
            }
        }
        writeln!(f)?;

        writeln!(f, "Recent Actions")?;
        if self.recent.is_empty() {
            return writeln!(f, "  No actions yet. Upload a meeting to get started!");
        }
        for row in &self.recent {
            write!(
                f,
                "  {} {}  [{}]\n      {}",
                priority_marker(row.priority),
                row.description,
                row.status,
                row.assignee
            )?;
            if let Some(due) = &row.due {
                write!(f, " • {}", due)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::action;
    use crate::error::FetchError;
    use crate::types::{ActionStatus, PriorityBreakdown};
    use std::sync::Arc;

    fn metrics(breakdown: PriorityBreakdown) -> DashboardMetrics {
        DashboardMetrics {
            total_meetings: 4,
            active_actions: breakdown.total(),
            completed_actions: 6,
            overdue_actions: 1,
            completion_rate: 60.0,
            priority_breakdown: breakdown,
        }
    }

    #[test]
    fn test_cards_include_completion_rate() {
        let cards = metric_cards(&metrics(PriorityBreakdown::default()));
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[2].title, "Completed");
        assert_eq!(cards[2].note.as_deref(), Some("60% completion rate"));
        assert!(cards[0].note.is_none());
    }

    #[test]
    fn test_chart_empty_when_no_active_actions() {
        let chart = priority_chart(&metrics(PriorityBreakdown::default()));
        assert_eq!(chart, PriorityChart::Empty);
    }

    #[test]
    fn test_chart_bars_in_priority_order() {
        let chart = priority_chart(&metrics(PriorityBreakdown {
            high: 3,
            medium: 1,
            low: 0,
        }));
        let PriorityChart::Bars(bars) = chart else {
            panic!("expected bars");
        };
        let summary: Vec<(Priority, u64, u32)> = bars
            .iter()
            .map(|b| (b.priority, b.count, b.percentage))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Priority::High, 3, 75),
                (Priority::Medium, 1, 25),
                (Priority::Low, 0, 0)
            ]
        );
    }

    #[test]
    fn test_page_loading_and_error() {
        let loading: QueryStatus<DashboardMetrics> = QueryStatus::Loading;
        let failed: QueryStatus<DashboardMetrics> =
            QueryStatus::Error(FetchError::new("timeout"));
        let no_actions: QueryStatus<ActionsPage> = QueryStatus::Idle;

        assert_eq!(dashboard_page(&loading, &no_actions, 5), PageView::Loading);
        assert!(dashboard_page(&failed, &no_actions, 5)
            .to_string()
            .contains("Failed to load dashboard"));
    }

    #[test]
    fn test_recent_actions_failure_does_not_fail_page() {
        let ok = QueryStatus::Success(Arc::new(metrics(PriorityBreakdown::default())));
        let failed: QueryStatus<ActionsPage> = QueryStatus::Error(FetchError::new("503"));

        let view = dashboard_page(&ok, &failed, 5);
        let ready = view.ready().unwrap();
        assert!(ready.recent.is_empty());
        assert!(view.to_string().contains("No actions yet"));
    }

    #[test]
    fn test_recent_rows_are_limited_and_formatted() {
        let mut actions: Vec<_> = (0..7)
            .map(|i| action(&i.to_string(), ActionStatus::InProgress, Priority::Medium))
            .collect();
        actions[0].due_date = Some("2025-12-26".to_string());
        let page = ActionsPage { total: 7, actions };

        let ok = QueryStatus::Success(Arc::new(metrics(PriorityBreakdown {
            high: 0,
            medium: 7,
            low: 0,
        })));
        let view = dashboard_page(&ok, &QueryStatus::Success(Arc::new(page)), 5);
        let ready = view.ready().unwrap();

        assert_eq!(ready.recent.len(), 5);
        assert_eq!(ready.recent[0].status, "in progress");
        assert_eq!(ready.recent[0].due.as_deref(), Some("Dec 26, 2025"));
        assert!(view.to_string().contains("Medium Priority"));
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(50).chars().filter(|c| *c == '█').count(), 12);
        assert_eq!(bar(100).chars().count(), BAR_WIDTH as usize);
    }
}
