use crate::AppState;
use crate::handlers::timer_handler::{list_timer_sessions, save_timer_session, timer_countdown};
use axum::{
    Router,
    routing::{get, post},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/timer/api/timer/:minutes", get(timer_countdown))
        .route("/timer/api/sessions", post(save_timer_session))
        .route("/timer/api/sessions/list", get(list_timer_sessions))
}
