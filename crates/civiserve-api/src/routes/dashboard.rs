// crates/civiserve-api/src/routes/dashboard.rs
// ============================================================================
// Module: Dashboard Endpoints
// Description: Headline statistics and registered aggregation reports.
// Purpose: Expose the reporting engine over HTTP.
// Dependencies: axum, civiserve-core, serde
// ============================================================================

//! ## Overview
//! The stats endpoint returns the typed headline row; the remaining
//! endpoints stream registered report rows as generic column maps. Limits
//! are clamped inside the reporting engine, never here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::Query;
use axum::extract::State;
use axum::routing::get;
use civiserve_core::DashboardStats;
use civiserve_core::RowMap;
use serde::Deserialize;

use crate::error::ApiError;
use crate::error::run_blocking;
use crate::state::AppState;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Dashboard endpoint group.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/recent-requests", get(recent_requests))
        .route("/dashboard/department-performance", get(department_performance))
        .route("/dashboard/monthly-trends", get(monthly_trends))
}

// ============================================================================
// SECTION: Request Shapes
// ============================================================================

/// Optional result-size cap for limited reports.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LimitQuery {
    /// Maximum rows to return; clamped by the reporting engine.
    pub limit: Option<i64>,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Returns the typed headline counters.
pub(crate) async fn stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    let store = Arc::clone(&state.store);
    let row = run_blocking(move || store.dashboard_stats()).await?;
    Ok(Json(row))
}

/// Returns the most recent service requests with joined context.
pub(crate) async fn recent_requests(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<RowMap>>, ApiError> {
    let gateway = Arc::clone(&state.gateway);
    let rows = run_blocking(move || gateway.run_report("recent_requests", query.limit)).await?;
    Ok(Json(rows))
}

/// Returns per-department workload and completion rates.
pub(crate) async fn department_performance(
    State(state): State<AppState>,
) -> Result<Json<Vec<RowMap>>, ApiError> {
    let gateway = Arc::clone(&state.gateway);
    let rows = run_blocking(move || gateway.run_report("department_performance", None)).await?;
    Ok(Json(rows))
}

/// Returns monthly request volume buckets.
pub(crate) async fn monthly_trends(
    State(state): State<AppState>,
) -> Result<Json<Vec<RowMap>>, ApiError> {
    let gateway = Arc::clone(&state.gateway);
    let rows = run_blocking(move || gateway.run_report("monthly_trends", None)).await?;
    Ok(Json(rows))
}
