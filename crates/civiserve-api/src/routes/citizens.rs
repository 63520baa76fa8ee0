// crates/civiserve-api/src/routes/citizens.rs
// ============================================================================
// Module: Citizen Endpoints
// Description: CRUD over the citizen registry.
// Purpose: JSON create/read/update/delete with allocator-assigned keys.
// Dependencies: axum, civiserve-core
// ============================================================================

//! ## Overview
//! Standard CRUD group; keys are assigned by the sequence allocator, never
//! accepted from the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use civiserve_core::Citizen;
use civiserve_core::CitizenPayload;

use super::PageQuery;
use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Citizen endpoint group.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/citizens", get(list).post(create))
        .route("/citizens/{id}", get(fetch).put(update).delete(remove))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Lists citizens in key order.
pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Citizen>>, ApiError> {
    let store = Arc::clone(&state.store);
    let rows = run_blocking(move || store.list_citizens(page.skip, page.limit)).await?;
    Ok(Json(rows))
}

/// Fetches one citizen.
pub(crate) async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Citizen>, ApiError> {
    let store = Arc::clone(&state.store);
    let row = run_blocking(move || store.get_citizen(id)).await?;
    Ok(Json(row))
}

/// Creates a citizen with an allocator-assigned key.
pub(crate) async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CitizenPayload>,
) -> Result<(StatusCode, Json<Citizen>), ApiError> {
    let store = Arc::clone(&state.store);
    let created = run_blocking(move || store.create_citizen(&payload)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replaces every non-key column of a citizen.
pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CitizenPayload>,
) -> Result<Json<Citizen>, ApiError> {
    let store = Arc::clone(&state.store);
    let updated = run_blocking(move || store.update_citizen(id, &payload)).await?;
    Ok(Json(updated))
}

/// Deletes one citizen.
pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = Arc::clone(&state.store);
    run_blocking(move || store.delete_citizen(id)).await?;
    Ok(Json(serde_json::json!({ "message": "Citizen deleted successfully" })))
}
