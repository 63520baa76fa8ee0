// crates/civiserve-core/src/core/error.rs
// ============================================================================
// Module: Gateway Error Taxonomy
// Description: Typed failures shared across the gateway subsystems.
// Purpose: Give every caller a stable, sanitized failure vocabulary.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! One error enum covers the whole gateway surface: statement rejection, the
//! routine allow-list, key allocation, routine/ad-hoc execution, and missing
//! entities. Variants are stable for programmatic handling; message payloads
//! must already be sanitized by the layer that produced them (no connection
//! strings, no credentials).

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Gateway failures.
///
/// # Invariants
/// - Message payloads never embed credentials or connection state.
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Statement rejected before execution (empty or multi-statement input).
    #[error("rejected statement: {0}")]
    RejectedStatement(String),
    /// Routine name absent from the allow-list.
    #[error("unknown routine: {0}")]
    UnknownRoutine(String),
    /// A concurrent writer committed the candidate key first.
    #[error("allocation conflict on {table}: candidate key {candidate} already taken")]
    AllocationConflict {
        /// Table the allocation targeted.
        table: String,
        /// Candidate key that collided.
        candidate: i64,
    },
    /// Bounded allocation retries were exhausted.
    #[error("allocation exhausted on {table} after {attempts} attempts")]
    AllocationExhausted {
        /// Table the allocation targeted.
        table: String,
        /// Number of attempts made.
        attempts: u32,
    },
    /// Engine-side failure while executing a bridged routine.
    #[error("routine execution error: {0}")]
    RoutineExecutionError(String),
    /// Ad-hoc statement failed during execution.
    #[error("query execution error: {0}")]
    QueryExecutionError(String),
    /// Caller-supplied value outside the accepted vocabulary.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Entity or view absent.
    #[error("{0} not found")]
    NotFound(String),
    /// Relational engine error outside the taxonomy above.
    #[error("database error: {0}")]
    Db(String),
    /// I/O failure reaching the relational engine.
    #[error("io error: {0}")]
    Io(String),
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
    fn display_messages_are_stable() {
        let err = GatewayError::UnknownRoutine("sp_nope".to_string());
        assert_eq!(err.to_string(), "unknown routine: sp_nope");
        let err = GatewayError::AllocationExhausted {
            table: "Citizen".to_string(),
            attempts: 5,
        };
        assert_eq!(err.to_string(), "allocation exhausted on Citizen after 5 attempts");
    }
}
