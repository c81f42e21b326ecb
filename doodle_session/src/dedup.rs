use std::collections::VecDeque;

use tokio::sync::Mutex;
use tracing::debug;

/// Keywords remembered across all sessions.
pub const DEFAULT_CAPACITY: usize = 30;

/// Bounded, insertion-ordered set of recently issued keywords.
///
/// Re-adding a present keyword is a no-op and never refreshes its position;
/// once full, the oldest entry is evicted.
pub struct KeywordDedupRing {
    entries: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl KeywordDedupRing {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity + 1)),
            capacity,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record `keyword`. Returns `false` if it was already present or blank.
    pub async fn add(&self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return false;
        }

        let mut entries = self.entries.lock().await;
        if entries.iter().any(|k| k == keyword) {
            return false;
        }

        entries.push_back(keyword.to_string());
        while entries.len() > self.capacity {
            if let Some(evicted) = entries.pop_front() {
                debug!(keyword = %evicted, "Evicted keyword from dedup ring");
            }
        }
        true
    }

    /// Point-in-time copy, oldest first.
    pub async fn snapshot(&self) -> Vec<String> {
        self.entries.lock().await.iter().cloned().collect()
    }

    pub async fn contains(&self, keyword: &str) -> bool {
        self.entries.lock().await.iter().any(|k| k == keyword.trim())
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl Default for KeywordDedupRing {
    fn default() -> Self {
        Self::new()
    }
}
