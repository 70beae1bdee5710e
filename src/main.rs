// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mission-Progress API Server
//!
//! Serves per-user mission progress stored in Firestore.

use mission_progress::{config::Config, db, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment. A missing project ID is fatal
    // and must stop startup before any database connection is attempted.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(
        port = config.port,
        project = config.store.project_id(),
        development = config.store.is_development(),
        "Starting Mission-Progress API"
    );

    // Initialize Firestore database
    let store = db::connect(&config.store).await?;

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
    });

    // Build router
    let app = mission_progress::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mission_progress=debug,info")),
        )
        .with(format)
        .init();
}
