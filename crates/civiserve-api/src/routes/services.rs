// crates/civiserve-api/src/routes/services.rs
// ============================================================================
// Module: Service Endpoints
// Description: CRUD over department services.
// Purpose: JSON create/read/update/delete with allocator-assigned keys.
// Dependencies: axum, civiserve-core
// ============================================================================

//! ## Overview
//! Standard CRUD group for services.

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
use civiserve_core::Service;
use civiserve_core::ServicePayload;

use super::PageQuery;
use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Service endpoint group.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/services", get(list).post(create))
        .route("/services/{id}", get(fetch).put(update).delete(remove))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Lists services in key order.
pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let store = Arc::clone(&state.store);
    let rows = run_blocking(move || store.list_services(page.skip, page.limit)).await?;
    Ok(Json(rows))
}

/// Fetches one service.
pub(crate) async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Service>, ApiError> {
    let store = Arc::clone(&state.store);
    let row = run_blocking(move || store.get_service(id)).await?;
    Ok(Json(row))
}

/// Creates a service with an allocator-assigned key.
pub(crate) async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ServicePayload>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let store = Arc::clone(&state.store);
    let created = run_blocking(move || store.create_service(&payload)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replaces every non-key column of a service.
pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ServicePayload>,
) -> Result<Json<Service>, ApiError> {
    let store = Arc::clone(&state.store);
    let updated = run_blocking(move || store.update_service(id, &payload)).await?;
    Ok(Json(updated))
}

/// Deletes one service.
pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = Arc::clone(&state.store);
    run_blocking(move || store.delete_service(id)).await?;
    Ok(Json(serde_json::json!({ "message": "Service deleted successfully" })))
}
