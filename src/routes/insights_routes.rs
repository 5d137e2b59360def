use crate::AppState;
use crate::handlers::insights_handler::{dashboard, disclaimer, factoids, hub, learn_more, tips};
use axum::{Router, routing::get};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/hub", get(hub))
        .route("/api/dashboard", get(dashboard))
        .route("/api/disclaimer", get(disclaimer))
        .route("/api/learn-more", get(learn_more))
        .route("/api/factoids", get(factoids))
        .route("/api/tips", get(tips))
}
