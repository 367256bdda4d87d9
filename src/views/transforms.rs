//! Pure view-model derivations over fetched data.

use crate::types::{ActionItem, ActionStatus, Priority, PriorityBreakdown};

/// Action items belonging to one status, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusGroup<'a> {
    pub status: ActionStatus,
    pub items: Vec<&'a ActionItem>,
}

/// Partition `items` into one group per entry of `statuses`, in that order.
///
/// Statuses with no items get an empty group. Items whose status is not
/// listed are left out.
pub fn group_by_status<'a>(
    items: &'a [ActionItem],
    statuses: &[ActionStatus],
) -> Vec<StatusGroup<'a>> {
    let mut groups: Vec<StatusGroup<'a>> = statuses
        .iter()
        .map(|&status| StatusGroup {
            status,
            items: Vec::new(),
        })
        .collect();

    for item in items {
        if let Some(group) = groups.iter_mut().find(|g| g.status == item.status) {
            group.items.push(item);
        }
    }

    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityPercentages {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl PriorityPercentages {
    pub fn get(&self, priority: Priority) -> u32 {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Share of each priority in whole percent, rounded half up.
///
/// All zeros when there are no items. The three values need not sum to 100.
pub fn priority_percentages(breakdown: &PriorityBreakdown) -> PriorityPercentages {
    let total = breakdown.total();
    PriorityPercentages {
        high: percentage(breakdown.high, total),
        medium: percentage(breakdown.medium, total),
        low: percentage(breakdown.low, total),
    }
}

fn percentage(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    // round(100 * count / total) without floats: (200c + t) / 2t
    let scaled = (200 * u128::from(count) + u128::from(total)) / (2 * u128::from(total));
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// The first `limit` actions, in server order.
pub fn recent_actions(items: &[ActionItem], limit: usize) -> &[ActionItem] {
    &items[..items.len().min(limit)]
}

/// Status text for lists: `in_progress` → `in progress`.
pub fn status_label(status: ActionStatus) -> String {
    status.as_str().replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::action;

    fn sample() -> Vec<ActionItem> {
        vec![
            action("1", ActionStatus::Pending, Priority::High),
            action("2", ActionStatus::Done, Priority::Low),
            action("3", ActionStatus::Pending, Priority::Medium),
            action("4", ActionStatus::Overdue, Priority::High),
            action("5", ActionStatus::InProgress, Priority::Low),
            action("6", ActionStatus::Pending, Priority::Low),
        ]
    }

    #[test]
    fn test_group_by_status_conserves_items() {
        let items = sample();
        let groups = group_by_status(&items, &ActionStatus::ALL);
        let total: usize = groups.iter().map(|g| g.items.len()).sum();
        assert_eq!(total, items.len());

        let mut ids: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.items.iter().map(|a| a.id.as_str()))
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_group_by_status_preserves_input_order() {
        let items = sample();
        let groups = group_by_status(&items, &ActionStatus::ALL);
        let pending: Vec<&str> = groups[0].items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(groups[0].status, ActionStatus::Pending);
        assert_eq!(pending, vec!["1", "3", "6"]);
    }

    #[test]
    fn test_group_by_status_empty_groups() {
        let items = vec![action("1", ActionStatus::Done, Priority::High)];
        let groups = group_by_status(&items, &ActionStatus::ALL);
        assert_eq!(groups.len(), 4);
        assert!(groups[0].items.is_empty());
        assert!(groups[1].items.is_empty());
        assert_eq!(groups[2].items.len(), 1);
        assert!(groups[3].items.is_empty());

        let none = group_by_status(&[], &ActionStatus::ALL);
        assert!(none.iter().all(|g| g.items.is_empty()));
    }

    #[test]
    fn test_group_by_status_follows_requested_order() {
        let items = sample();
        let groups = group_by_status(&items, &[ActionStatus::Overdue, ActionStatus::Done]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].status, ActionStatus::Overdue);
        assert_eq!(groups[0].items[0].id, "4");
        assert_eq!(groups[1].items[0].id, "2");
    }

    #[test]
    fn test_priority_percentages_zero_total() {
        let pct = priority_percentages(&PriorityBreakdown::default());
        assert_eq!(
            pct,
            PriorityPercentages {
                high: 0,
                medium: 0,
                low: 0
            }
        );
    }

    #[test]
    fn test_priority_percentages_three_one_zero() {
        let pct = priority_percentages(&PriorityBreakdown {
            high: 3,
            medium: 1,
            low: 0,
        });
        assert_eq!(
            pct,
            PriorityPercentages {
                high: 75,
                medium: 25,
                low: 0
            }
        );
    }

    #[test]
    fn test_priority_percentages_rounding() {
        // thirds round down and need not sum to 100
        let thirds = priority_percentages(&PriorityBreakdown {
            high: 1,
            medium: 1,
            low: 1,
        });
        assert_eq!((thirds.high, thirds.medium, thirds.low), (33, 33, 33));

        // 1/8 = 12.5 rounds up
        let eighth = priority_percentages(&PriorityBreakdown {
            high: 1,
            medium: 7,
            low: 0,
        });
        assert_eq!(eighth.high, 13);
        assert_eq!(eighth.medium, 88);
        assert_eq!(eighth.get(Priority::Low), 0);
    }

    #[test]
    fn test_recent_actions_limit() {
        let items = sample();
        assert_eq!(recent_actions(&items, 5).len(), 5);
        assert_eq!(recent_actions(&items, 5)[0].id, "1");
        assert_eq!(recent_actions(&items[..2], 5).len(), 2);
        assert!(recent_actions(&[], 5).is_empty());
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(ActionStatus::InProgress), "in progress");
        assert_eq!(status_label(ActionStatus::Overdue), "overdue");
    }
}
