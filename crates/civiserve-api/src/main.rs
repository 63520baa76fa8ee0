// crates/civiserve-api/src/main.rs
// ============================================================================
// Module: Civiserve Server Entry Point
// Description: Binary entry for the citizen-services HTTP backend.
// Purpose: Load configuration, open the store, and serve the router.
// Dependencies: civiserve-api, civiserve-store-sqlite, tokio, tracing
// ============================================================================

//! ## Overview
//! Configuration resolves from the first CLI argument, then the
//! `CIVISERVE_CONFIG` environment variable, then built-in defaults. The
//! server runs until ctrl-c and shuts down gracefully.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use civiserve_api::ApiConfig;
use civiserve_api::ApiConfigError;
use civiserve_api::AppState;
use civiserve_api::build_router;
use civiserve_store_sqlite::CivicStore;
use civiserve_store_sqlite::CivicStoreError;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal startup and serve errors.
#[derive(Debug, Error)]
enum ServeError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ApiConfigError),
    /// Store could not be opened.
    #[error("store error: {0}")]
    Store(#[from] CivicStoreError),
    /// Listener or serve loop failure.
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Resolves the configuration source and loads it.
fn load_config() -> Result<ApiConfig, ApiConfigError> {
    let from_arg = std::env::args().nth(1).map(PathBuf::from);
    let from_env = std::env::var_os("CIVISERVE_CONFIG").map(PathBuf::from);
    match from_arg.or(from_env) {
        Some(path) => ApiConfig::load(&path),
        None => Ok(ApiConfig::default()),
    }
}

/// Opens the store, binds the listener, and serves until ctrl-c.
async fn serve(config: ApiConfig) -> Result<(), ServeError> {
    let store = Arc::new(CivicStore::open(config.store.clone())?);
    let state = AppState::new(store);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "civiserve listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Completes when the process receives ctrl-c.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install ctrl-c handler");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config().map_err(ServeError::Config) {
        Ok(config) => config,
        Err(err) => {
            // No subscriber is installed yet when config loading fails.
            tracing_subscriber::fmt().with_env_filter(EnvFilter::new("info")).init();
            tracing::error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter.clone()))
        .init();

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server terminated");
            ExitCode::FAILURE
        }
    }
}
