// crates/civiserve-api/src/routes/mod.rs
// ============================================================================
// Module: Route Index
// Description: Router assembly and cross-cutting request shapes.
// Purpose: Merge every endpoint group into one stateful router.
// Dependencies: axum, civiserve-core, serde
// ============================================================================

//! ## Overview
//! Each endpoint group lives in its own module and contributes a
//! `Router<AppState>`; this module merges them and adds the service banner
//! and health probe.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use civiserve_core::GatewayError;
use serde::Deserialize;

use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

pub mod citizens;
pub mod custom_queries;
pub mod dashboard;
pub mod db_tools;
pub mod departments;
pub mod grievances;
pub mod payments;
pub mod service_requests;
pub mod services;

// ============================================================================
// SECTION: Shared Request Shapes
// ============================================================================

/// Listing window for CRUD collections.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// Rows to skip.
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows to return.
    #[serde(default = "default_page_limit")]
    pub limit: i64,
}

/// Returns the default listing window size.
const fn default_page_limit() -> i64 {
    100
}

/// Status label carried by the status-patch endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    /// Target status label.
    pub status: String,
}

// ============================================================================
// SECTION: Router Assembly
// ============================================================================

/// Builds the full application router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(citizens::router())
        .merge(departments::router())
        .merge(services::router())
        .merge(payments::router())
        .merge(service_requests::router())
        .merge(grievances::router())
        .merge(custom_queries::router())
        .merge(db_tools::router())
        .merge(dashboard::router())
        .with_state(state)
}

/// Service banner.
pub(crate) async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Civiserve Administrative Backend",
        "status": "running",
    }))
}

/// Database connectivity probe.
pub(crate) async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let store = Arc::clone(&state.store);
    run_blocking(move || store.check_connection().map_err(GatewayError::from)).await?;
    Ok(Json(serde_json::json!({ "status": "healthy" })))
}
