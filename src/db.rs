use crate::models::timer_session::{Identity, TimerSession};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool, sqlite::SqlitePoolOptions}; //PoolOptions allows config of pool

//Returns either a SqlitePool or Error Message. Establish connection to the database
pub async fn establish_connection(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

// ===============================================
// DATABASE MODELS

#[derive(Debug, FromRow)]
pub struct TimerSessionRecord {
    pub id: i64,
    pub user_id: Option<String>,
    pub duration: i64,
    pub completed: bool,
    // unix epoch milliseconds
    pub created_at: i64,
}

impl TimerSessionRecord {
    pub fn into_session(self) -> Result<TimerSession, sqlx::Error> {
        let duration = u32::try_from(self.duration).map_err(|_| {
            sqlx::Error::Decode(
                format!("timer session {} has bad duration {}", self.id, self.duration).into(),
            )
        })?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.created_at).ok_or_else(|| {
            sqlx::Error::Decode(
                format!("timer session {} has bad timestamp {}", self.id, self.created_at).into(),
            )
        })?;

        Ok(TimerSession {
            id: self.id,
            identity: match self.user_id {
                Some(user) => Identity::User(user),
                None => Identity::Anonymous,
            },
            duration,
            completed: self.completed,
            created_at,
        })
    }
}

#[derive(Debug, FromRow, Serialize)]
pub struct Factoid {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub badge: Option<String>,
    pub source_name: Option<String>,
    pub source_url: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, FromRow, Serialize)]
pub struct LifestyleTip {
    pub id: i64,
    pub title: String,
    pub impact: Option<String>,
    pub front_summary: String,
    pub back_detail: String,
    pub icon: Option<String>,
}

// ======================================================
// DATABASE INITIALIZATION

pub async fn init_db(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS timer_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT,
            duration INTEGER NOT NULL CHECK (duration >= 0),
            completed BOOLEAN NOT NULL,
            created_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_timer_sessions_user_created
            ON timer_sessions (user_id, created_at);

        CREATE TABLE IF NOT EXISTS factoids (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            text TEXT NOT NULL,
            badge TEXT,
            source_name TEXT,
            source_url TEXT,
            icon TEXT,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            order_index INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS lifestyle_tips (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            impact TEXT,
            front_summary TEXT NOT NULL,
            back_detail TEXT NOT NULL,
            icon TEXT,
            is_active BOOLEAN NOT NULL DEFAULT 1,
            order_index INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

// =============================================================
// TIMER SESSION OPERATIONS

pub async fn insert_timer_session(
    pool: &SqlitePool,
    user_id: Option<&str>,
    duration: u32,
    completed: bool,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO timer_sessions (user_id, duration, completed, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(i64::from(duration))
    .bind(completed)
    .bind(created_at.timestamp_millis())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Newest first. A `None` user selects the anonymous partition only.
pub async fn get_recent_timer_sessions(
    pool: &SqlitePool,
    user_id: Option<&str>,
    since: DateTime<Utc>,
    limit: u32,
) -> Result<Vec<TimerSessionRecord>, sqlx::Error> {
    sqlx::query_as::<_, TimerSessionRecord>(
        r#"
        SELECT id, user_id, duration, completed, created_at
        FROM timer_sessions
        WHERE user_id IS ? AND created_at >= ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(since.timestamp_millis())
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
}

// ==============================
// INSIGHTS CONTENT

pub async fn get_active_factoids(pool: &SqlitePool) -> Result<Vec<Factoid>, sqlx::Error> {
    sqlx::query_as::<_, Factoid>(
        r#"
        SELECT id, title, text, badge, source_name, source_url, icon
        FROM factoids
        WHERE is_active = 1
        ORDER BY order_index, id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_active_tips(pool: &SqlitePool) -> Result<Vec<LifestyleTip>, sqlx::Error> {
    sqlx::query_as::<_, LifestyleTip>(
        r#"
        SELECT id, title, impact, front_summary, back_detail, icon
        FROM lifestyle_tips
        WHERE is_active = 1
        ORDER BY order_index, id
        "#,
    )
    .fetch_all(pool)
    .await
}
