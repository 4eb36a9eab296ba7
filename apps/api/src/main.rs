mod config;
mod db;
mod errors;
mod feedback;
mod interviews;
mod llm_client;
mod models;
mod pages;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreBackend};
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PrepWise API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    // Initialize LLM client
    let llm = match &config.anthropic_api_url {
        Some(url) => LlmClient::with_base_url(config.anthropic_api_key.clone(), url.clone())?,
        None => LlmClient::new(config.anthropic_api_key.clone())?,
    };
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        store,
        generator: Arc::new(llm),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres store"))?;
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory document store; data will not survive a restart");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}
