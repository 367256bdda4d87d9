//! Kanban board of action items, one column per status.

use std::fmt;

use super::dashboard::priority_marker;
use super::transforms::group_by_status;
use super::{write_header, Page, PageView};
use crate::query::QueryStatus;
use crate::types::{format_display_date, ActionItem, ActionStatus, ActionsPage, Priority};

/// One-click status transitions offered on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Start,
    Complete,
}

impl QuickAction {
    pub fn target(&self) -> ActionStatus {
        match self {
            QuickAction::Start => ActionStatus::InProgress,
            QuickAction::Complete => ActionStatus::Done,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::Start => "Start",
            QuickAction::Complete => "Complete",
        }
    }
}

/// Overdue cards keep both actions.
pub fn quick_actions(status: ActionStatus) -> Vec<QuickAction> {
    let mut actions = Vec::new();
    if status != ActionStatus::InProgress && status != ActionStatus::Done {
        actions.push(QuickAction::Start);
    }
    if status != ActionStatus::Done {
        actions.push(QuickAction::Complete);
    }
    actions
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub description: String,
    pub assignee: String,
    pub due: Option<String>,
    pub priority: Priority,
    pub actions: Vec<QuickAction>,
    /// Quick actions are disabled while a status update is in flight.
    pub actions_enabled: bool,
}

impl Card {
    fn from_item(item: &ActionItem, mutation_pending: bool) -> Self {
        Self {
            id: item.id.clone(),
            description: item.description.clone(),
            assignee: item.assignee.clone(),
            due: item.due_date.as_deref().map(format_display_date),
            priority: item.priority,
            actions: quick_actions(item.status),
            actions_enabled: !mutation_pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub status: ActionStatus,
    pub cards: Vec<Card>,
}

impl Column {
    pub fn title(&self) -> &'static str {
        self.status.title()
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn empty_text(&self) -> String {
        format!("No {} actions", self.title().to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub columns: Vec<Column>,
}

impl BoardView {
    pub fn card(&self, id: &str) -> Option<&Card> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|card| card.id == id)
    }
}

pub fn board_page(actions: &QueryStatus<ActionsPage>, mutation_pending: bool) -> PageView<BoardView> {
    PageView::from_query(actions, "Failed to load actions", None, |page| {
        let columns = group_by_status(&page.actions, &ActionStatus::ALL)
            .into_iter()
            .map(|group| Column {
                status: group.status,
                cards: group
                    .items
                    .into_iter()
                    .map(|item| Card::from_item(item, mutation_pending))
                    .collect(),
            })
            .collect();
        BoardView { columns }
    })
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_header(f, Page::Actions)?;

        for column in &self.columns {
            writeln!(f, "── {} ({}) ──", column.title(), column.count())?;
            if column.cards.is_empty() {
                writeln!(f, "  {}", column.empty_text())?;
            }
            for card in &column.cards {
                writeln!(
                    f,
                    "  {} {}  #{}",
                    priority_marker(card.priority),
                    card.description,
                    card.id
                )?;
                write!(f, "      {}", card.assignee)?;
                if let Some(due) = &card.due {
                    write!(f, " • {}", due)?;
                }
                writeln!(f)?;
                if !card.actions.is_empty() {
                    let labels: Vec<String> = card
                        .actions
                        .iter()
                        .map(|a| {
                            if card.actions_enabled {
                                format!("[{}]", a.label())
                            } else {
                                format!("({})", a.label())
                            }
                        })
                        .collect();
                    writeln!(f, "      {}", labels.join(" "))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
