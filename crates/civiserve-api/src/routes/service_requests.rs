// crates/civiserve-api/src/routes/service_requests.rs
// ============================================================================
// Module: Service Request Endpoints
// Description: CRUD plus status transitions for service requests.
// Purpose: JSON lifecycle management with vocabulary-checked statuses.
// Dependencies: axum, civiserve-core
// ============================================================================

//! ## Overview
//! CRUD group plus a status-patch endpoint; status labels are validated
//! against the closed request vocabulary before the engine is touched.

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
use civiserve_core::ServiceRequest;
use civiserve_core::ServiceRequestPayload;

use super::PageQuery;
use super::StatusQuery;
use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Service request endpoint group.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/service-requests", get(list).post(create))
        .route("/service-requests/{id}", get(fetch).put(update).delete(remove))
        .route("/service-requests/{id}/status", patch(set_status))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Lists service requests in key order.
pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<ServiceRequest>>, ApiError> {
    let store = Arc::clone(&state.store);
    let rows = run_blocking(move || store.list_service_requests(page.skip, page.limit)).await?;
    Ok(Json(rows))
}

/// Fetches one service request.
pub(crate) async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let store = Arc::clone(&state.store);
    let row = run_blocking(move || store.get_service_request(id)).await?;
    Ok(Json(row))
}

/// Creates a service request with an allocator-assigned key.
pub(crate) async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ServiceRequestPayload>,
) -> Result<(StatusCode, Json<ServiceRequest>), ApiError> {
    let store = Arc::clone(&state.store);
    let created = run_blocking(move || store.create_service_request(&payload)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replaces every non-key column of a service request.
pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceRequestPayload>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let store = Arc::clone(&state.store);
    let updated = run_blocking(move || store.update_service_request(id, &payload)).await?;
    Ok(Json(updated))
}

/// Moves one service request to a new status.
pub(crate) async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ServiceRequest>, ApiError> {
    let store = Arc::clone(&state.store);
    let updated = run_blocking(move || store.set_request_status(id, &query.status)).await?;
    Ok(Json(updated))
}

/// Deletes one service request.
pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = Arc::clone(&state.store);
    run_blocking(move || store.delete_service_request(id)).await?;
    Ok(Json(serde_json::json!({ "message": "Service request deleted successfully" })))
}
