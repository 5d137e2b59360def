use crate::AppState;
use crate::handlers::context::RequestContext;
use crate::handlers::error::ApiError;
use crate::models::timer_session::{TimerSessionListEntry, TimerSessionSummary};
use crate::services::errors::TimerError;
use crate::services::timer_recorder::countdown_seconds;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct CountdownResponse {
    pub seconds: u32,
    pub minutes: u32,
    pub recommended: bool,
}

#[derive(Serialize)]
pub struct SaveSessionResponse {
    pub success: bool,
    pub session_id: i64,
    pub message: String,
    pub session: TimerSessionSummary,
}

#[derive(Serialize)]
pub struct SessionListResponse {
    pub success: bool,
    pub sessions: Vec<TimerSessionListEntry>,
    pub count: usize,
}

/// Countdown length for a recommended exposure in minutes
pub async fn timer_countdown(
    path: Result<Path<u32>, PathRejection>,
) -> Result<Json<CountdownResponse>, ApiError> {
    let Path(minutes) = path?;
    Ok(Json(CountdownResponse {
        seconds: countdown_seconds(minutes)?,
        minutes,
        recommended: true,
    }))
}

/// Records a finished or stopped timer run
pub async fn save_timer_session(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveSessionResponse>, ApiError> {
    let Json(body) = payload?;
    let Some(fields) = body.as_object() else {
        return Err(TimerError::InvalidInput("expected a JSON object".to_string()).into());
    };

    let session = state
        .timers
        .record_raw(&ctx.identity, fields.get("duration"), fields.get("completed"))
        .await?;

    Ok(Json(SaveSessionResponse {
        success: true,
        session_id: session.id,
        message: "Timer session saved successfully".to_string(),
        session: session.summary(),
    }))
}

/// Caller's recent timer runs, newest first
pub async fn list_timer_sessions(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<SessionListResponse>, ApiError> {
    let sessions: Vec<TimerSessionListEntry> = state
        .timers
        .list_recent(&ctx.identity)
        .await?
        .iter()
        .map(|s| s.list_entry())
        .collect();

    Ok(Json(SessionListResponse {
        success: true,
        count: sessions.len(),
        sessions,
    }))
}
