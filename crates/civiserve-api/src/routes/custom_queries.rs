// crates/civiserve-api/src/routes/custom_queries.rs
// ============================================================================
// Module: Ad-hoc Query Endpoints
// Description: Single-statement SQL execution and canned sample queries.
// Purpose: Expose the classified query executor over HTTP.
// Dependencies: axum, civiserve-core
// ============================================================================

//! ## Overview
//! `POST /custom-queries/execute` feeds one raw statement through the
//! classifier and executor. Every statement-level failure, rejection
//! included, is folded into the outcome body with HTTP 200; only a
//! malformed request body earns a 4xx.
//! `GET /custom-queries/sample-queries` returns the canned query catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use axum::routing::post;
use civiserve_core::QueryOutcome;
use civiserve_core::QueryRequest;
use civiserve_core::SampleQuery;
use civiserve_core::sample_queries;

use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Ad-hoc query endpoint group.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/custom-queries/execute", post(execute))
        .route("/custom-queries/sample-queries", get(samples))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Executes one raw SQL statement.
pub(crate) async fn execute(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryOutcome>, ApiError> {
    let gateway = Arc::clone(&state.gateway);
    let outcome = run_blocking(move || gateway.execute_adhoc(&request.query)).await?;
    Ok(Json(outcome))
}

/// Returns the canned sample query catalog.
pub(crate) async fn samples() -> Json<Vec<SampleQuery>> {
    Json(sample_queries())
}
