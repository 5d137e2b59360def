use crate::AppState;
use crate::handlers::context::{RequestContext, SESSION_HEADER};
use crate::handlers::error::ApiError;
use crate::models::questionnaire::{Band, QuestionnaireResult};
use crate::services::errors::QuestionnaireError;
use crate::services::questionnaire_session::{NavAction, NavOutcome, QuestionnaireSession};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

// ====================================
// DATA STRUCTURES

#[derive(Serialize)]
pub struct StartResponse {
    pub message: String,
    pub session_id: String,
    pub questions: Vec<CatalogQuestion>,
    pub total_questions: usize,
    pub next_question_index: usize,
}

#[derive(Serialize)]
pub struct CatalogQuestion {
    pub id: usize,
    pub code: String,
    pub text: String,
    pub helper: String,
    pub options: Vec<CatalogOption>,
}

#[derive(Serialize)]
pub struct CatalogOption {
    pub code: usize,
    pub text: String,
    pub score: i32,
}

#[derive(Serialize)]
pub struct QuestionResponse {
    pub question: QuestionDetail,
    pub selected: Option<usize>,
    pub is_last: bool,
}

#[derive(Serialize)]
pub struct QuestionDetail {
    pub index: usize,
    pub total: usize,
    pub code: String,
    pub text: String,
    pub helper: String,
    pub options: Vec<OptionChoice>,
}

#[derive(Serialize)]
pub struct OptionChoice {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub action: NavAction,
    pub option: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerResponse {
    Moved {
        next_index: usize,
    },
    Completed {
        completed: bool,
        total_score: i32,
        result: Band,
    },
}

#[derive(Debug, Deserialize)]
pub struct SubmitResultRequest {
    pub answers: Option<Vec<Option<i64>>>,
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    pub result: Band,
    pub total_score: i32,
    pub classification: &'static str,
}

impl From<QuestionnaireResult> for ResultResponse {
    fn from(result: QuestionnaireResult) -> Self {
        Self {
            result: result.band,
            total_score: result.total_score,
            classification: result.band.description(),
        }
    }
}

// ====================================
// HANDLERS

/// Begins (or restarts) a questionnaire and returns the whole catalog
pub async fn start_questionnaire(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<([(&'static str, String); 1], Json<StartResponse>), ApiError> {
    let session_id = ctx.session_or_new();
    QuestionnaireSession::new(&*state.sessions, &state.catalog, &session_id)
        .start()
        .await?;

    let questions = state
        .catalog
        .questions()
        .iter()
        .enumerate()
        .map(|(i, q)| CatalogQuestion {
            id: i,
            code: q.code.clone(),
            text: q.text.clone(),
            helper: q.helper.clone().unwrap_or_default(),
            options: q
                .options
                .iter()
                .enumerate()
                .map(|(j, opt)| CatalogOption {
                    code: j,
                    text: opt.label.clone(),
                    score: opt.score,
                })
                .collect(),
        })
        .collect();

    Ok((
        [(SESSION_HEADER, session_id.clone())],
        Json(StartResponse {
            message: "Questionnaire initialized".to_string(),
            session_id,
            questions,
            total_questions: state.catalog.len(),
            next_question_index: 0,
        }),
    ))
}

/// Question at `index` (clamped) with the caller's current selection
pub async fn get_question(
    State(state): State<AppState>,
    ctx: RequestContext,
    path: Result<Path<usize>, PathRejection>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let Path(index) = path?;
    let session_id = ctx.require_session()?;
    let view = QuestionnaireSession::new(&*state.sessions, &state.catalog, session_id)
        .question(index)
        .await?;

    Ok(Json(QuestionResponse {
        question: QuestionDetail {
            index: view.index,
            total: view.total,
            code: view.question.code.clone(),
            text: view.question.text.clone(),
            helper: view.question.helper.clone().unwrap_or_default(),
            options: view
                .question
                .options
                .iter()
                .enumerate()
                .map(|(i, opt)| OptionChoice {
                    label: opt.label.clone(),
                    value: i,
                })
                .collect(),
        },
        selected: view.selected,
        is_last: view.is_last,
    }))
}

/// Saves the chosen option (if any) then moves back, forward, or finishes
pub async fn answer_question(
    State(state): State<AppState>,
    ctx: RequestContext,
    path: Result<Path<usize>, PathRejection>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let Path(index) = path?;
    let session_id = ctx.require_session()?;
    let Json(request) = payload?;

    let option = request
        .option
        .map(|raw| {
            usize::try_from(raw).map_err(|_| {
                QuestionnaireError::InvalidInput(format!("Option {} is not valid", raw))
            })
        })
        .transpose()?;

    let outcome = QuestionnaireSession::new(&*state.sessions, &state.catalog, session_id)
        .respond(index, option, request.action)
        .await?;

    Ok(Json(match outcome {
        NavOutcome::Moved { next_index } => AnswerResponse::Moved { next_index },
        NavOutcome::Completed(result) => AnswerResponse::Completed {
            completed: true,
            total_score: result.total_score,
            result: result.band,
        },
    }))
}

/// Scores a full answer list in one go
pub async fn submit_result(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<SubmitResultRequest>, JsonRejection>,
) -> Result<([(&'static str, String); 1], Json<ResultResponse>), ApiError> {
    let Json(request) = payload?;
    let answers = request
        .answers
        .ok_or_else(|| QuestionnaireError::InvalidInput("No answers provided".to_string()))?;

    let session_id = ctx.session_or_new();
    let result = QuestionnaireSession::new(&*state.sessions, &state.catalog, &session_id)
        .submit_all(&answers)
        .await?;

    Ok(([(SESSION_HEADER, session_id)], Json(result.into())))
}

/// The stored result of a completed questionnaire
pub async fn get_result(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<ResultResponse>, ApiError> {
    let Some(session_id) = ctx.session_id.as_deref() else {
        return Err(QuestionnaireError::NoResultAvailable.into());
    };

    let result = QuestionnaireSession::new(&*state.sessions, &state.catalog, session_id)
        .result()
        .await?;
    Ok(Json(result.into()))
}
