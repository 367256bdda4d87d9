use std::fmt;

use crate::types::ActionFilter;

/// Logical identity of a cached query, e.g. `["actions", "status=done"]`.
///
/// Invalidation matches by prefix: invalidating `["actions"]` also
/// invalidates every filtered action list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn dashboard_metrics() -> Self {
        Self::new(["dashboard-metrics"])
    }

    pub fn actions() -> Self {
        Self::new(["actions"])
    }

    /// Action list for a filter. An empty filter is the plain `actions` key.
    pub fn filtered_actions(filter: &ActionFilter) -> Self {
        let mut key = Self::actions();
        key.0.extend(filter.key_segments());
        key
    }

    pub fn recent_actions() -> Self {
        Self::new(["recent-actions"])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
