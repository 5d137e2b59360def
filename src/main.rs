use chrono::Duration;
use std::sync::Arc;
use sunsense_backend::config::Config;
use sunsense_backend::services::catalog::Catalog;
use sunsense_backend::services::clock::Clock;
use sunsense_backend::services::session_store::MemorySessionStore;
use sunsense_backend::{AppState, app, db};
use tokio::net::TcpListener; //TCP listener
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main] // the program entry point using the Tokio async runtime.
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let pool = db::establish_connection(&config.database_url, config.max_connections).await?;
    db::init_db(&pool).await?;
    info!(database = %config.database_url, "database ready");

    let state = AppState::new(
        pool,
        Catalog::vitamin_d(),
        Arc::new(MemorySessionStore::with_idle_timeout(
            Duration::minutes(i64::from(config.session_idle_minutes)),
            Clock::System,
        )),
        Clock::System,
    );

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
