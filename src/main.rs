// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Lumora API Server
//!
//! Campus assistant backend: spot discovery, study answers and study
//! session matching.

use lumora::{
    config::Config,
    db::SqliteDb,
    services::{DisabledModel, LanguageModel, OpenAiClient, SpotCatalog},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Lumora API");

    let db = SqliteDb::open(&config.database_path).await?;

    tracing::info!(path = %config.spot_catalog_path, "Loading spot catalog");
    let catalog = SpotCatalog::load_from_file(&config.spot_catalog_path)?;

    if config.seed_spots && db.count_spots().await? == 0 {
        let seeded = db.seed_spots(&catalog.seed_spots()).await?;
        tracing::info!(count = seeded, "Seeded spot store from catalog");
    }

    let llm: Arc<dyn LanguageModel> = match OpenAiClient::from_config(&config)? {
        Some(client) => {
            tracing::info!(
                base_url = %config.llm_base_url,
                chat_model = %config.llm_chat_model,
                "Language model client initialized"
            );
            Arc::new(client)
        }
        None => {
            tracing::warn!("LLM_API_KEY not set, assistant features will use fallbacks");
            Arc::new(DisabledModel)
        }
    };

    let state = Arc::new(AppState::new(config.clone(), db, catalog, llm));

    let app = lumora::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lumora=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
