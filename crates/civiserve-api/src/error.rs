// crates/civiserve-api/src/error.rs
// ============================================================================
// Module: API Error Mapping
// Description: Gateway error to HTTP status translation.
// Purpose: Give every failure a stable status and a sanitized JSON detail.
// Dependencies: axum, civiserve-core, serde_json, tokio
// ============================================================================

//! ## Overview
//! [`ApiError`] is the one failure type handlers return. Gateway errors map
//! onto statuses here: rejection and bad input are 400, registry and entity
//! misses are 404, allocation failures are 409, everything engine-side is a
//! sanitized 500. Ad-hoc execution failures never reach this type; they ride
//! inside a 200 outcome body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use civiserve_core::GatewayError;

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// HTTP-mapped failure returned by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Response status.
    status: StatusCode,
    /// Sanitized detail message.
    detail: String,
}

impl ApiError {
    /// Builds an internal server error with a sanitized message.
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }

    /// Returns the response status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the detail message.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<GatewayError> for ApiError {
    fn from(error: GatewayError) -> Self {
        let status = match &error {
            GatewayError::RejectedStatement(_) | GatewayError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::UnknownRoutine(_) | GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::AllocationConflict { .. } | GatewayError::AllocationExhausted { .. } => {
                StatusCode::CONFLICT
            }
            GatewayError::RoutineExecutionError(_)
            | GatewayError::QueryExecutionError(_)
            | GatewayError::Db(_)
            | GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

// ============================================================================
// SECTION: Blocking Bridge
// ============================================================================

/// Runs a blocking store call on the blocking pool.
///
/// # Errors
///
/// Returns the mapped gateway error, or an internal error when the worker
/// task itself fails.
pub async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, GatewayError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| ApiError::internal(format!("worker task failed: {err}")))?
        .map_err(ApiError::from)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions."
)]
mod tests {
    use super::*;

    #[test]
    fn gateway_errors_map_to_stable_statuses() {
        let err = ApiError::from(GatewayError::NotFound("citizen 7".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = ApiError::from(GatewayError::RejectedStatement("empty".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = ApiError::from(GatewayError::UnknownRoutine("nope".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = ApiError::from(GatewayError::AllocationExhausted {
            table: "Citizen".to_string(),
            attempts: 5,
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        let err = ApiError::from(GatewayError::Db("disk full".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
