use crate::db;
use crate::models::timer_session::{Identity, TimerSession};
use crate::services::clock::Clock;
use crate::services::errors::TimerError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// How far back the session history reaches.
pub const HISTORY_WINDOW_DAYS: i64 = 30;
/// Most sessions returned by one history listing.
pub const HISTORY_LIMIT: u32 = 20;

#[async_trait]
pub trait TimerSessionStore: Send + Sync {
    async fn insert(
        &self,
        identity: &Identity,
        duration: u32,
        completed: bool,
        created_at: DateTime<Utc>,
    ) -> Result<TimerSession, sqlx::Error>;

    /// Sessions created at or after `since`, newest first.
    async fn recent(
        &self,
        identity: &Identity,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<TimerSession>, sqlx::Error>;
}

#[derive(Clone)]
pub struct SqliteTimerStore {
    pool: SqlitePool,
}

impl SqliteTimerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimerSessionStore for SqliteTimerStore {
    async fn insert(
        &self,
        identity: &Identity,
        duration: u32,
        completed: bool,
        created_at: DateTime<Utc>,
    ) -> Result<TimerSession, sqlx::Error> {
        let id = db::insert_timer_session(
            &self.pool,
            identity.user_id(),
            duration,
            completed,
            created_at,
        )
        .await?;

        Ok(TimerSession {
            id,
            identity: identity.clone(),
            duration,
            completed,
            // round-trip through storage precision
            created_at: DateTime::<Utc>::from_timestamp_millis(created_at.timestamp_millis())
                .unwrap_or(created_at),
        })
    }

    async fn recent(
        &self,
        identity: &Identity,
        since: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<TimerSession>, sqlx::Error> {
        db::get_recent_timer_sessions(&self.pool, identity.user_id(), since, limit)
            .await?
            .into_iter()
            .map(db::TimerSessionRecord::into_session)
            .collect()
    }
}

/// Append-only log of finished or abandoned timer runs.
#[derive(Clone)]
pub struct TimerRecorder {
    store: Arc<dyn TimerSessionStore>,
    clock: Clock,
}

impl TimerRecorder {
    pub fn new(store: Arc<dyn TimerSessionStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    pub async fn record(
        &self,
        identity: &Identity,
        duration: u32,
        completed: bool,
    ) -> Result<TimerSession, TimerError> {
        let session = self
            .store
            .insert(identity, duration, completed, self.clock.now())
            .await?;

        info!(
            session = session.id,
            user = identity.user_id().unwrap_or("anonymous"),
            duration,
            completed,
            "timer session recorded"
        );
        Ok(session)
    }

    /// Coerces the loose JSON fields of a record request before storing it.
    pub async fn record_raw(
        &self,
        identity: &Identity,
        duration: Option<&Value>,
        completed: Option<&Value>,
    ) -> Result<TimerSession, TimerError> {
        let duration = parse_duration(duration)?;
        let completed = parse_completed(completed)?;
        self.record(identity, duration, completed).await
    }

    pub async fn list_since(
        &self,
        identity: &Identity,
        since: DateTime<Utc>,
    ) -> Result<Vec<TimerSession>, TimerError> {
        Ok(self.store.recent(identity, since, HISTORY_LIMIT).await?)
    }

    /// The history window ending now.
    pub async fn list_recent(&self, identity: &Identity) -> Result<Vec<TimerSession>, TimerError> {
        let since = self.clock.now() - Duration::days(HISTORY_WINDOW_DAYS);
        self.list_since(identity, since).await
    }
}

/// Accepts non-negative integers, non-negative floats (truncated) and numeric
/// strings. Missing or null means zero.
pub fn parse_duration(value: Option<&Value>) -> Result<u32, TimerError> {
    let invalid = |what: &str| TimerError::InvalidInput(format!("duration {}", what));

    let seconds: i64 = match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite() && *f >= 0.0) {
                if f >= u32::MAX as f64 + 1.0 {
                    return Err(invalid("is too large"));
                }
                f.trunc() as i64
            } else {
                return Err(invalid("must be a non-negative number of seconds"));
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid("must be a whole number of seconds"))?,
        Some(_) => return Err(invalid("must be a number")),
    };

    if seconds < 0 {
        return Err(invalid("must not be negative"));
    }
    u32::try_from(seconds).map_err(|_| invalid("is too large"))
}

pub fn parse_completed(value: Option<&Value>) -> Result<bool, TimerError> {
    match value {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(TimerError::InvalidInput(
            "completed must be true or false".to_string(),
        )),
    }
}

/// Seconds for a countdown of `minutes`.
pub fn countdown_seconds(minutes: u32) -> Result<u32, TimerError> {
    minutes
        .checked_mul(60)
        .ok_or_else(|| TimerError::InvalidInput(format!("{} minutes is too long", minutes)))
}
