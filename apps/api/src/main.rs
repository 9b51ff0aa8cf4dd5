mod comparison;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::comparison::cache::PgComparisonCache;
use crate::comparison::catalog::PgCatalogStore;
use crate::comparison::pipeline::ComparisonPipeline;
use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compare API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL and make sure the catalog/cache tables exist
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize the Gemini client
    let llm = GeminiClient::new(config.gemini_api_key.clone());
    info!("LLM client initialized");

    // Wire the pipeline: catalog store + comparison cache + model gateway
    let pipeline = Arc::new(ComparisonPipeline::new(
        Arc::new(PgCatalogStore::new(db.clone())),
        Arc::new(PgComparisonCache::new(db)),
        Arc::new(llm),
    ));

    // Build app state
    let state = AppState { pipeline };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the original runs permissive CORS globally

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
