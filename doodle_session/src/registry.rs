use std::collections::HashMap;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use doodle_core::{GameError, Result};
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Four-digit session ids: 9000 possible values.
pub const DEFAULT_ID_RANGE: RangeInclusive<u16> = 1000..=9999;

/// Random draws tried before `create` gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

#[derive(Debug, Clone)]
struct SessionSlot<S> {
    state: Option<S>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Thread-safe map from session id to one optional state slot.
///
/// Every operation holds the lock only for the map access itself, so callers
/// must read what they need, drop out, and come back to persist results.
pub struct SessionRegistry<S> {
    sessions: RwLock<HashMap<String, SessionSlot<S>>>,
    id_range: RangeInclusive<u16>,
    max_attempts: usize,
}

impl<S> SessionRegistry<S>
where
    S: Clone + Send + Sync,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            id_range: DEFAULT_ID_RANGE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    #[must_use]
    pub const fn with_id_range(mut self, range: RangeInclusive<u16>) -> Self {
        self.id_range = range;
        self
    }

    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Number of distinct ids the registry can hand out; 0 for an empty range.
    #[must_use]
    pub fn capacity(&self) -> usize {
        let (start, end) = (*self.id_range.start(), *self.id_range.end());
        if start > end {
            return 0;
        }
        usize::from(end) - usize::from(start) + 1
    }

    /// Allocate a fresh random id with an empty state slot.
    ///
    /// Draws are retried on collision up to the attempt limit; a full id
    /// space fails immediately.
    pub async fn create(&self) -> Result<String> {
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.capacity() {
            return Err(GameError::ResourceExhausted { attempts: 0 });
        }

        for attempt in 1..=self.max_attempts {
            let id = rand::thread_rng().gen_range(self.id_range.clone()).to_string();
            if sessions.contains_key(&id) {
                debug!(session_id = %id, attempt, "Session id collision, retrying");
                continue;
            }

            let now = Utc::now();
            sessions.insert(
                id.clone(),
                SessionSlot {
                    state: None,
                    created_at: now,
                    updated_at: now,
                },
            );
            info!(session_id = %id, live = sessions.len(), "Session created");
            return Ok(id);
        }

        Err(GameError::ResourceExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Current state of `id`; `Ok(None)` when the session exists without one.
    pub async fn get(&self, id: &str) -> Result<Option<S>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .map(|slot| slot.state.clone())
            .ok_or_else(|| GameError::NotFound(id.to_string()))
    }

    /// Replace the state of an existing session.
    pub async fn set(&self, id: &str, state: S) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .get_mut(id)
            .ok_or_else(|| GameError::NotFound(id.to_string()))?;
        slot.state = Some(state);
        slot.updated_at = Utc::now();
        Ok(())
    }

    /// Remove `id` and return its state, atomically.
    ///
    /// A session without state is left in place and yields `Ok(None)`, so
    /// only one caller can ever take a given state.
    pub async fn take(&self, id: &str) -> Result<Option<S>> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .get(id)
            .ok_or_else(|| GameError::NotFound(id.to_string()))?;
        if slot.state.is_none() {
            return Ok(None);
        }

        let slot = sessions.remove(id);
        drop(sessions);
        Ok(slot.and_then(|slot| {
            info!(
                session_id = %id,
                lifetime_ms = Utc::now().signed_duration_since(slot.created_at).num_milliseconds(),
                "Session taken"
            );
            slot.state
        }))
    }

    /// Remove `id`. Returns whether a session existed.
    pub async fn delete(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(slot) => {
                let lifetime = Utc::now().signed_duration_since(slot.created_at);
                info!(
                    session_id = %id,
                    lifetime_ms = lifetime.num_milliseconds(),
                    idle_ms = Utc::now().signed_duration_since(slot.updated_at).num_milliseconds(),
                    "Session flushed"
                );
                true
            }
            None => false,
        }
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl<S> Default for SessionRegistry<S>
where
    S: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn create_issues_four_digit_ids() {
        let registry: SessionRegistry<String> = SessionRegistry::new();
        let id = registry.create().await.unwrap();
        assert_eq!(id.len(), 4);
        assert!(id.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(registry.get(&id).await.unwrap(), None);
        assert_eq!(registry.capacity(), 9000);
    }

    #[tokio::test]
    async fn set_requires_existing_session() {
        let registry: SessionRegistry<String> = SessionRegistry::new();
        assert!(matches!(
            registry.set("1234", "x".into()).await,
            Err(GameError::NotFound(id)) if id == "1234"
        ));

        let id = registry.create().await.unwrap();
        registry.set(&id, "first".into()).await.unwrap();
        registry.set(&id, "second".into()).await.unwrap();
        assert_eq!(registry.get(&id).await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let registry: SessionRegistry<u32> = SessionRegistry::new();
        let id = registry.create().await.unwrap();
        assert!(registry.delete(&id).await);
        assert!(!registry.delete(&id).await);
        assert!(matches!(registry.get(&id).await, Err(GameError::NotFound(_))));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn exhausted_id_space_fails() {
        let registry: SessionRegistry<u32> = SessionRegistry::new().with_id_range(1000..=1002);
        let mut ids = HashSet::new();
        for _ in 0..3 {
            ids.insert(registry.create().await.unwrap());
        }
        assert_eq!(ids.len(), 3);
        assert!(matches!(
            registry.create().await,
            Err(GameError::ResourceExhausted { .. })
        ));

        // Freed ids become available again.
        let freed = ids.iter().next().cloned().unwrap();
        registry.delete(&freed).await;
        assert_eq!(registry.create().await.unwrap(), freed);
    }

    #[tokio::test]
    async fn take_removes_only_sessions_with_state() {
        let registry: SessionRegistry<String> = SessionRegistry::new();
        let id = registry.create().await.unwrap();

        assert_eq!(registry.take(&id).await.unwrap(), None);
        assert!(registry.contains(&id).await);

        registry.set(&id, "task".into()).await.unwrap();
        assert_eq!(registry.take(&id).await.unwrap().as_deref(), Some("task"));
        assert!(!registry.contains(&id).await);
        assert!(matches!(registry.take(&id).await, Err(GameError::NotFound(_))));
    }

    #[tokio::test]
    async fn empty_id_range_is_exhausted() {
        #[allow(clippy::reversed_empty_ranges)]
        let registry: SessionRegistry<u32> = SessionRegistry::new().with_id_range(1000..=999);
        assert_eq!(registry.capacity(), 0);
        assert!(matches!(
            registry.create().await,
            Err(GameError::ResourceExhausted { attempts: 0 })
        ));
    }

    #[tokio::test]
    async fn bounded_attempts_give_up() {
        let registry: SessionRegistry<u32> = SessionRegistry::new()
            .with_id_range(1000..=1001)
            .with_max_attempts(0);
        assert!(matches!(
            registry.create().await,
            Err(GameError::ResourceExhausted { attempts: 0 })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_are_distinct() {
        let registry: Arc<SessionRegistry<u32>> = Arc::new(SessionRegistry::new());
        let handles: Vec<_> = (0..200)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.create().await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap());
        }
        assert_eq!(ids.len(), 200);
        assert_eq!(registry.len().await, 200);
    }
}
