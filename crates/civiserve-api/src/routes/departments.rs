// crates/civiserve-api/src/routes/departments.rs
// ============================================================================
// Module: Department Endpoints
// Description: CRUD over government departments.
// Purpose: JSON create/read/update/delete with allocator-assigned keys.
// Dependencies: axum, civiserve-core
// ============================================================================

//! ## Overview
//! Standard CRUD group for departments.

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
use civiserve_core::Department;
use civiserve_core::DepartmentPayload;

use super::PageQuery;
use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Department endpoint group.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list).post(create))
        .route("/departments/{id}", get(fetch).put(update).delete(remove))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Lists departments in key order.
pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Department>>, ApiError> {
    let store = Arc::clone(&state.store);
    let rows = run_blocking(move || store.list_departments(page.skip, page.limit)).await?;
    Ok(Json(rows))
}

/// Fetches one department.
pub(crate) async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Department>, ApiError> {
    let store = Arc::clone(&state.store);
    let row = run_blocking(move || store.get_department(id)).await?;
    Ok(Json(row))
}

/// Creates a department with an allocator-assigned key.
pub(crate) async fn create(
    State(state): State<AppState>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<(StatusCode, Json<Department>), ApiError> {
    let store = Arc::clone(&state.store);
    let created = run_blocking(move || store.create_department(&payload)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replaces every non-key column of a department.
pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DepartmentPayload>,
) -> Result<Json<Department>, ApiError> {
    let store = Arc::clone(&state.store);
    let updated = run_blocking(move || store.update_department(id, &payload)).await?;
    Ok(Json(updated))
}

/// Deletes one department.
pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = Arc::clone(&state.store);
    run_blocking(move || store.delete_department(id)).await?;
    Ok(Json(serde_json::json!({ "message": "Department deleted successfully" })))
}
