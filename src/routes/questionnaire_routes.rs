use crate::AppState;
use crate::handlers::questionnaire_handler::{
    answer_question, get_question, get_result, start_questionnaire, submit_result,
};
use axum::{
    Router,
    routing::{get, post},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/questionnaire/start", post(start_questionnaire))
        .route(
            "/api/questionnaire/question/:index",
            get(get_question).post(answer_question),
        )
        .route(
            "/api/questionnaire/result",
            get(get_result).post(submit_result),
        )
}
