// crates/civiserve-core/src/interfaces/mod.rs
// ============================================================================
// Module: Gateway Interfaces
// Description: The trait seam between the HTTP surface and the relational
//              engine adapter.
// Purpose: Let the HTTP layer depend on gateway behavior without naming a
//          concrete engine.
// Dependencies: serde_json, crate::core
// ============================================================================

//! ## Overview
//! [`RelationalGateway`] is the one seam the HTTP surface talks through for
//! gateway operations: ad-hoc execution, bridged routines, registered views,
//! reports, and key allocation. The store crate supplies the only production
//! implementation; tests substitute their own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::entities::EntityTable;
use crate::core::error::GatewayError;
use crate::core::query::ProcedureResult;
use crate::core::query::QueryOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A materialized result row keyed by column name.
pub type RowMap = serde_json::Map<String, serde_json::Value>;

/// A positional argument bound into a routine template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineArg {
    /// Integer argument.
    Int(i64),
    /// Text argument.
    Text(String),
}

// ============================================================================
// SECTION: Gateway Trait
// ============================================================================

/// Behavior the relational engine adapter exposes to the HTTP surface.
///
/// Implementations are expected to be shared behind an `Arc` and called from
/// blocking contexts; every method takes `&self`.
pub trait RelationalGateway {
    /// Classifies and executes one ad-hoc statement.
    ///
    /// All statement-level failures, lexical rejection included, are
    /// reported inside the returned [`QueryOutcome`] with
    /// `success == false`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Io`] when the engine cannot be reached.
    fn execute_adhoc(&self, raw_sql: &str) -> Result<QueryOutcome, GatewayError>;

    /// Invokes a registered procedure with positional arguments.
    ///
    /// Non-mutating procedures answer with their bare row set; mutating
    /// procedures answer with a confirmation object.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownRoutine`] for unregistered names and
    /// [`GatewayError::RoutineExecutionError`] when the engine rejects the
    /// invocation.
    fn call_procedure(
        &self,
        name: &str,
        args: &[RoutineArg],
    ) -> Result<ProcedureResult, GatewayError>;

    /// Invokes a registered scalar function and returns its single-key row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownRoutine`] for unregistered names and
    /// [`GatewayError::RoutineExecutionError`] when the engine rejects the
    /// invocation.
    fn call_function(&self, name: &str, args: &[RoutineArg]) -> Result<RowMap, GatewayError>;

    /// Selects every row of a registered view.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownRoutine`] for unregistered view names.
    fn select_view(&self, name: &str) -> Result<Vec<RowMap>, GatewayError>;

    /// Runs a registered report, binding `limit` when the template takes one.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownRoutine`] for unregistered report names
    /// and [`GatewayError::Db`] for engine failures.
    fn run_report(&self, name: &str, limit: Option<i64>) -> Result<Vec<RowMap>, GatewayError>;

    /// Allocates the next primary key for `table`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Db`] when the current maximum cannot be read.
    fn allocate(&self, table: EntityTable) -> Result<i64, GatewayError>;
}
