use crate::services::clock::Clock;
use crate::services::errors::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Sessions untouched for this long are dropped by the memory store.
pub const DEFAULT_IDLE_TIMEOUT_MINUTES: i64 = 120;

/// Keyed per-session storage. Access to one session id is assumed to be
/// serialized by whoever fronts the store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, session_id: &str, key: &str, value: Value) -> Result<(), StoreError>;

    async fn remove(&self, session_id: &str, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug)]
struct SessionEntry {
    values: HashMap<String, Value>,
    touched_at: DateTime<Utc>,
}

/// Process-local store. A session expires once it has been idle longer than
/// the idle timeout; expired sessions read as empty and are swept on writes.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    idle_timeout: Duration,
    clock: Clock,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(
            Duration::minutes(DEFAULT_IDLE_TIMEOUT_MINUTES),
            Clock::System,
        )
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration, clock: Clock) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
            clock,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every idle session, returning how many went.
    pub async fn prune_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, self.clock.now())
    }

    fn is_idle(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        now - entry.touched_at > self.idle_timeout
    }

    fn sweep(&self, sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_idle(entry, now));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "evicted idle sessions");
        }
        evicted
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let Some(entry) = sessions.get_mut(session_id) else {
            return Ok(None);
        };
        if self.is_idle(entry, now) {
            sessions.remove(session_id);
            return Ok(None);
        }
        entry.touched_at = now;
        Ok(entry.values.get(key).cloned())
    }

    async fn set(&self, session_id: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, now);

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                values: HashMap::new(),
                touched_at: now,
            });
        entry.touched_at = now;
        entry.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, session_id: &str, key: &str) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, now);

        if let Some(entry) = sessions.get_mut(session_id) {
            entry.values.remove(key);
            entry.touched_at = now;
            if entry.values.is_empty() {
                sessions.remove(session_id);
            }
        }
        Ok(())
    }
}
