//! Page view models and their text rendering.
//!
//! Every page is a pure function from query state (plus local form state)
//! to a `PageView`. The binary re-evaluates it after each state change and
//! prints the result.

pub mod board;
pub mod dashboard;
pub mod transforms;
pub mod upload;

use std::fmt;

use crate::query::QueryStatus;

/// Top-level navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Actions,
    Upload,
}

impl Page {
    pub fn route(&self) -> &'static str {
        match self {
            Page::Dashboard => "/",
            Page::Actions => "/actions",
            Page::Upload => "/upload",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Actions => "Action Items",
            Page::Upload => "Upload Meeting",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Page::Dashboard => "Overview of your meetings and action items",
            Page::Actions => "Manage and track your meeting action items",
            Page::Upload => {
                "Upload your meeting transcript and let AI extract action items automatically"
            }
        }
    }
}

/// The three states every data-backed page renders.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView<T> {
    Loading,
    Error {
        message: &'static str,
        hint: Option<&'static str>,
    },
    Ready(T),
}

impl<T> PageView<T> {
    /// Map a query status onto the page states. Idle counts as loading.
    pub fn from_query<Q>(
        status: &QueryStatus<Q>,
        message: &'static str,
        hint: Option<&'static str>,
        build: impl FnOnce(&Q) -> T,
    ) -> Self {
        match status {
            QueryStatus::Idle | QueryStatus::Loading => PageView::Loading,
            QueryStatus::Error(_) => PageView::Error { message, hint },
            QueryStatus::Success(data) => PageView::Ready(build(data)),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageView::Ready(view) => Some(view),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for PageView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageView::Loading => writeln!(f, "⟳ Loading..."),
            PageView::Error { message, hint } => {
                writeln!(f, "✗ {}", message)?;
                if let Some(hint) = hint {
                    writeln!(f, "  {}", hint)?;
                }
                Ok(())
            }
            PageView::Ready(view) => fmt::Display::fmt(view, f),
        }
    }
}

/// Page heading shared by every page.
pub(crate) fn write_header(f: &mut fmt::Formatter<'_>, page: Page) -> fmt::Result {
    writeln!(f, "{}", page.title())?;
    writeln!(f, "{}", page.subtitle())?;
    writeln!(f)
}
