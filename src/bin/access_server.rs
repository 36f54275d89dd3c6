//! Access-control API server
//!
//! Serves the session, masking, audit, and admin endpoints over a
//! PostgreSQL backing store.

use std::sync::Arc;

use tracing::info;

use vistoria::api::{create_router, AppState};
use vistoria::{AppConfig, DatabaseConfig, DatabaseManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "vistoria=info,tower_http=debug".to_string()),
        )
        .init();

    let config = AppConfig::from_env();

    let database = DatabaseManager::new(DatabaseConfig {
        database_url: config.database_url.clone(),
        ..DatabaseConfig::default()
    })
    .await?;

    let state = AppState::new(Arc::new(database.store()));
    let app = create_router(state);

    let addr = config.bind_addr();
    info!("Starting access server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
