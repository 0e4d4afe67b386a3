//! Rewards route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use geomint_core::{Task, TaskKind};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::state::AppState;

/// Task-kind predicate for the rewards view.
///
/// The wildcard `all` keeps every task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum KindFilter {
    #[default]
    All,
    Only(TaskKind),
}

impl KindFilter {
    fn matches(self, kind: TaskKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == kind,
        }
    }
}

impl TryFrom<String> for KindFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "all" => Ok(Self::All),
            "shop" => Ok(Self::Only(TaskKind::Shop)),
            "platform" => Ok(Self::Only(TaskKind::Platform)),
            "event" => Ok(Self::Only(TaskKind::Event)),
            other => Err(format!("unknown task kind: {other}")),
        }
    }
}

/// Rewards view query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct RewardsQuery {
    pub kind: Option<KindFilter>,
}

/// Per-kind task counts for the tab headers.
#[derive(Debug, Serialize)]
pub struct TaskCounts {
    pub all: usize,
    pub shop: usize,
    pub platform: usize,
    pub event: usize,
}

/// Rewards view model.
#[derive(Debug, Serialize)]
pub struct RewardsView {
    pub tasks: Vec<Task>,
    pub counts: TaskCounts,
}

/// Display the rewards center: tasks filtered by kind, with counts.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<RewardsQuery>,
) -> Json<RewardsView> {
    let all = state.catalogue().tasks().await;

    let count_of = |kind: TaskKind| all.iter().filter(|t| t.kind == kind).count();
    let counts = TaskCounts {
        all: all.len(),
        shop: count_of(TaskKind::Shop),
        platform: count_of(TaskKind::Platform),
        event: count_of(TaskKind::Event),
    };

    let filter = query.kind.unwrap_or_default();
    let tasks = all.into_iter().filter(|t| filter.matches(t.kind)).collect();

    Json(RewardsView { tasks, counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_filter_parses() {
        assert_eq!(KindFilter::try_from("all".to_string()), Ok(KindFilter::All));
        assert_eq!(
            KindFilter::try_from("event".to_string()),
            Ok(KindFilter::Only(TaskKind::Event))
        );
        assert!(KindFilter::try_from("weekly".to_string()).is_err());
    }

    #[test]
    fn test_kind_filter_matches() {
        assert!(KindFilter::All.matches(TaskKind::Shop));
        assert!(KindFilter::Only(TaskKind::Platform).matches(TaskKind::Platform));
        assert!(!KindFilter::Only(TaskKind::Platform).matches(TaskKind::Event));
    }
}
