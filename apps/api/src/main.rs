mod config;
mod controller;
mod document;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::controller::ReportController;
use crate::document::gate::load_into;
use crate::document::{DocumentStyle, DocxEngine, ReadinessGate};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Daily Reports v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = GeminiClient::new(config.api_key.clone(), config.gemini_api_base.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Document engine loads in the background; exports wait on the gate.
    let engine = Arc::new(ReadinessGate::new(config.engine_wait));
    tokio::spawn(load_into(Arc::clone(&engine), || {
        DocxEngine::new(DocumentStyle::default())
    }));

    if let Some(dir) = &config.export_dir {
        info!("Exports will also be saved under {}", dir.display());
    }

    let reports = Arc::new(ReportController::new(
        Arc::new(llm),
        engine,
        config.identity.clone(),
        config.export_dir.clone(),
    ));

    // Build router
    let app = build_router(AppState { reports })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
