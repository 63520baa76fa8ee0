// crates/civiserve-api/src/routes/payments.rs
// ============================================================================
// Module: Payment Endpoints
// Description: CRUD over payments.
// Purpose: JSON create/read/update/delete with allocator-assigned keys.
// Dependencies: axum, civiserve-core
// ============================================================================

//! ## Overview
//! Standard CRUD group for payments.

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
use civiserve_core::Payment;
use civiserve_core::PaymentPayload;

use super::PageQuery;
use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Payment endpoint group.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list).post(create))
        .route("/payments/{id}", get(fetch).put(update).delete(remove))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Lists payments in key order.
pub(crate) async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let store = Arc::clone(&state.store);
    let rows = run_blocking(move || store.list_payments(page.skip, page.limit)).await?;
    Ok(Json(rows))
}

/// Fetches one payment.
pub(crate) async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Payment>, ApiError> {
    let store = Arc::clone(&state.store);
    let row = run_blocking(move || store.get_payment(id)).await?;
    Ok(Json(row))
}

/// Creates a payment with an allocator-assigned key.
pub(crate) async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PaymentPayload>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let store = Arc::clone(&state.store);
    let created = run_blocking(move || store.create_payment(&payload)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replaces every non-key column of a payment.
pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentPayload>,
) -> Result<Json<Payment>, ApiError> {
    let store = Arc::clone(&state.store);
    let updated = run_blocking(move || store.update_payment(id, &payload)).await?;
    Ok(Json(updated))
}

/// Deletes one payment.
pub(crate) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store = Arc::clone(&state.store);
    run_blocking(move || store.delete_payment(id)).await?;
    Ok(Json(serde_json::json!({ "message": "Payment deleted successfully" })))
}
