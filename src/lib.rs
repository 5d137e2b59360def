use axum::Router;
use services::catalog::Catalog;
use services::clock::Clock;
use services::session_store::SessionStore;
use services::timer_recorder::{SqliteTimerStore, TimerRecorder};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub catalog: Arc<Catalog>,
    pub sessions: Arc<dyn SessionStore>,
    pub timers: TimerRecorder,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        catalog: Catalog,
        sessions: Arc<dyn SessionStore>,
        clock: Clock,
    ) -> Self {
        let timers = TimerRecorder::new(Arc::new(SqliteTimerStore::new(pool.clone())), clock);
        Self {
            pool,
            catalog: Arc::new(catalog),
            sessions,
            timers,
        }
    }
}

/// Full HTTP surface: questionnaire, timer and insights content.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::questionnaire_routes::router())
        .merge(routes::timer_routes::router())
        .merge(routes::insights_routes::router())
        .layer(TraceLayer::new_for_http())
        // allow all origins and headers, the front end is served separately
        .layer(CorsLayer::permissive())
        .with_state(state)
}
