// crates/civiserve-api/src/routes/grievances.rs
// ============================================================================
// Module: Grievance Endpoints
// Description: CRUD plus status transitions for grievances.
// Purpose: JSON lifecycle management with vocabulary-checked statuses.
// Dependencies: axum, civiserve-core
// ============================================================================

//! ## Overview
//! CRUD group plus a status-patch endpoint; status labels are validated
//! against the closed grievance vocabulary before the engine is touched.

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
use axum::routing::patch;
use civiserve_core::Grievance;
use civiserve_core::GrievancePayload;

use super::PageQuery;
use super::StatusQuery;
use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Grievance endpoint group.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/grievances", get(list).post(create))
        .route("/grievances/{id}", get(fetch).put(update).delete(remove))
        .route("/grievances/{id}/status", patch(set_status))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Lists grievances in key order.
pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Grievance>>, ApiError> {
    let store = Arc::clone(&state.store);
    let rows = run_blocking(move || store.list_grievances(page.skip, page.limit)).await?;
    Ok(Json(rows))
}

/// Fetches one grievance.
pub(crate) async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Grievance>, ApiError> {
    let store = Arc::clone(&state.store);
    let row = run_blocking(move || store.get_grievance(id)).await?;
    Ok(Json(row))
}

/// Creates a grievance with an allocator-assigned key.
pub(crate) async fn create(
    State(state): State<AppState>,
    Json(payload): Json<GrievancePayload>,
) -> Result<(StatusCode, Json<Grievance>), ApiError> {
    let store = Arc::clone(&state.store);
    let created = run_blocking(move || store.create_grievance(&payload)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replaces every non-key column of a grievance.
pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GrievancePayload>,
) -> Result<Json<Grievance>, ApiError> {
    let store = Arc::clone(&state.store);
    let updated = run_blocking(move || store.update_grievance(id, &payload)).await?;
    Ok(Json(updated))
}

/// Moves one grievance to a new status.
pub(crate) async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Grievance>, ApiError> {
    let store = Arc::clone(&state.store);
    let updated = run_blocking(move || store.set_grievance_status(id, &query.status)).await?;
    Ok(Json(updated))
}

/// Deletes one grievance.
pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = Arc::clone(&state.store);
    run_blocking(move || store.delete_grievance(id)).await?;
    Ok(Json(serde_json::json!({ "message": "Grievance deleted successfully" })))
}
