//! Progress-tracked reward tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::TaskId;

/// Classification of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Tied to a single shop (visit, purchase).
    Shop,
    /// Platform-wide challenge.
    Platform,
    /// Limited-time event.
    Event,
}

/// A progress-tracked objective that unlocks a reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Completion percentage, 0-100.
    pub progress: u8,
    pub shop_name: String,
    pub reward: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub kind: TaskKind,
}

impl Task {
    /// Whether this is a platform collect challenge.
    ///
    /// Collect challenges track the size of the claimed collection, so their
    /// progress is always recomputed from it rather than incremented.
    #[must_use]
    pub fn is_collect_challenge(&self) -> bool {
        self.kind == TaskKind::Platform && self.title.contains("Collect")
    }

    /// Progress of a collect challenge for a given claimed-collection size.
    ///
    /// Each claimed NFT is worth 20%, capped at 100.
    #[must_use]
    pub fn collect_progress(claimed_count: usize) -> u8 {
        let pct = claimed_count.saturating_mul(20).min(100);
        u8::try_from(pct).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(kind: TaskKind, title: &str) -> Task {
        Task {
            id: TaskId::new(1),
            title: title.to_string(),
            description: String::new(),
            progress: 0,
            shop_name: "Platform Challenge".to_string(),
            reward: "Rare Platform NFT".to_string(),
            expires_at: None,
            kind,
        }
    }

    #[test]
    fn test_collect_challenge_detection() {
        assert!(task(TaskKind::Platform, "Collect 5 NFTs").is_collect_challenge());
        assert!(!task(TaskKind::Shop, "Collect 5 NFTs").is_collect_challenge());
        assert!(!task(TaskKind::Platform, "Visit Local Shop A").is_collect_challenge());
    }

    #[test]
    fn test_collect_progress_scales_by_twenty() {
        assert_eq!(Task::collect_progress(0), 0);
        assert_eq!(Task::collect_progress(1), 20);
        assert_eq!(Task::collect_progress(4), 80);
        assert_eq!(Task::collect_progress(5), 100);
    }

    #[test]
    fn test_collect_progress_caps_at_hundred() {
        assert_eq!(Task::collect_progress(6), 100);
        assert_eq!(Task::collect_progress(1000), 100);
    }
}
