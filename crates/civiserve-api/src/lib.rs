// crates/civiserve-api/src/lib.rs
// ============================================================================
// Module: Civiserve API
// Description: Axum HTTP surface for the citizen-services backend.
// Purpose: Map the relational data access gateway onto JSON endpoints.
// Dependencies: axum, civiserve-core, civiserve-store-sqlite, serde, tokio
// ============================================================================

//! ## Overview
//! Every handler delegates to the gateway trait or the typed store and runs
//! blocking database work on the blocking pool. Error mapping lives in
//! [`error::ApiError`]; router assembly in [`routes::build_router`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
#[cfg(test)]
mod tests;

pub use config::ApiConfig;
pub use config::ApiConfigError;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
