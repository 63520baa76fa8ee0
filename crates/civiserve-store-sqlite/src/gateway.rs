// crates/civiserve-store-sqlite/src/gateway.rs
// ============================================================================
// Module: Gateway Trait Implementation
// Description: RelationalGateway wiring for the civic store.
// Purpose: Expose the store's gateway operations through the trait seam the
//          HTTP surface consumes.
// Dependencies: civiserve-core
// ============================================================================

//! ## Overview
//! Thin delegation from the [`RelationalGateway`] trait to the store's
//! inherent operations. The HTTP layer only ever sees the trait object.

// ============================================================================
// SECTION: Imports
// ============================================================================

use civiserve_core::EntityTable;
use civiserve_core::GatewayError;
use civiserve_core::ProcedureResult;
use civiserve_core::QueryOutcome;
use civiserve_core::RelationalGateway;
use civiserve_core::RoutineArg;
use civiserve_core::RowMap;

use crate::store::CivicStore;

// ============================================================================
// SECTION: Trait Implementation
// ============================================================================

impl RelationalGateway for CivicStore {
    fn execute_adhoc(&self, raw_sql: &str) -> Result<QueryOutcome, GatewayError> {
        self.run_adhoc(raw_sql)
    }

    fn call_procedure(
        &self,
        name: &str,
        args: &[RoutineArg],
    ) -> Result<ProcedureResult, GatewayError> {
        self.invoke_procedure(name, args)
    }

    fn call_function(&self, name: &str, args: &[RoutineArg]) -> Result<RowMap, GatewayError> {
        self.invoke_function(name, args)
    }

    fn select_view(&self, name: &str) -> Result<Vec<RowMap>, GatewayError> {
        self.read_view(name)
    }

    fn run_report(&self, name: &str, limit: Option<i64>) -> Result<Vec<RowMap>, GatewayError> {
        self.report(name, limit)
    }

    fn allocate(&self, table: EntityTable) -> Result<i64, GatewayError> {
        self.next_key(table)
    }
}
