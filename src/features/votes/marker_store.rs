use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Remembers which reports each user has voted on.
///
/// Advisory: saves a round trip for repeat votes and drives the "voted"
/// flag on report views. The report service remains the authority and
/// rejects duplicates on its own.
#[derive(Clone, Default)]
pub struct VoteMarkerStore {
    markers: Arc<RwLock<HashMap<i64, HashSet<i64>>>>,
}

impl VoteMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn has_voted(&self, user_id: i64, report_id: i64) -> bool {
        self.markers
            .read()
            .await
            .get(&user_id)
            .map(|reports| reports.contains(&report_id))
            .unwrap_or(false)
    }

    /// Returns false when the marker was already present
    pub async fn mark(&self, user_id: i64, report_id: i64) -> bool {
        self.markers
            .write()
            .await
            .entry(user_id)
            .or_default()
            .insert(report_id)
    }

    pub async fn clear(&self, user_id: i64, report_id: i64) -> bool {
        let mut markers = self.markers.write().await;
        let Some(reports) = markers.get_mut(&user_id) else {
            return false;
        };
        let removed = reports.remove(&report_id);
        if reports.is_empty() {
            markers.remove(&user_id);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_markers_are_per_user() {
        let store = VoteMarkerStore::new();

        assert!(store.mark(1, 10).await);
        assert!(!store.mark(1, 10).await);

        assert!(store.has_voted(1, 10).await);
        assert!(!store.has_voted(2, 10).await);
        assert!(!store.has_voted(1, 11).await);
    }

    #[tokio::test]
    async fn test_clear_removes_marker() {
        let store = VoteMarkerStore::new();
        store.mark(1, 10).await;
        store.mark(1, 12).await;

        assert!(store.clear(1, 10).await);
        assert!(!store.clear(1, 10).await);
        assert!(!store.clear(9, 10).await);
        assert!(store.has_voted(1, 12).await);
    }
}
