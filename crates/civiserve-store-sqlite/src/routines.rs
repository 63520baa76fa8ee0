// crates/civiserve-store-sqlite/src/routines.rs
// ============================================================================
// Module: Routine Bridge
// Description: Invocation of registered procedures, functions, and views.
// Purpose: Bind positional arguments into registered templates and shape the
//          results for the wire.
// Dependencies: civiserve-core, rusqlite
// ============================================================================

//! ## Overview
//! Every invocation starts with a registry lookup; a miss is an
//! [`GatewayError::UnknownRoutine`] and never reaches the engine. Arguments
//! are bound positionally into the registered template, so caller input can
//! only ever be a value, never SQL text. Functions return their single
//! single-key row; procedures return their bare row set, or a confirmation
//! object when the registered template mutates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use civiserve_core::GatewayError;
use civiserve_core::ProcedureResult;
use civiserve_core::RoutineArg;
use civiserve_core::RoutineKind;
use civiserve_core::RoutineSpec;
use civiserve_core::RowMap;
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::store::CivicStore;
use crate::store::collect_rows;

// ============================================================================
// SECTION: Argument Binding
// ============================================================================

/// Converts a routine argument into an engine value.
fn to_engine_value(arg: &RoutineArg) -> Value {
    match arg {
        RoutineArg::Int(v) => Value::Integer(*v),
        RoutineArg::Text(s) => Value::Text(s.clone()),
    }
}

/// Checks arity and converts arguments for a registered routine.
fn bind_args(spec: &RoutineSpec, args: &[RoutineArg]) -> Result<Vec<Value>, GatewayError> {
    if args.len() != spec.params.len() {
        return Err(GatewayError::RoutineExecutionError(format!(
            "{} expects {} argument(s), got {}",
            spec.name,
            spec.params.len(),
            args.len()
        )));
    }
    Ok(args.iter().map(to_engine_value).collect())
}

// ============================================================================
// SECTION: Invocation
// ============================================================================

impl CivicStore {
    /// Invokes a registered procedure with positional arguments.
    ///
    /// Non-mutating procedures answer with their bare row set; mutating
    /// procedures answer with a confirmation object.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownRoutine`] for unregistered names and
    /// [`GatewayError::RoutineExecutionError`] on arity mismatch or engine
    /// failure.
    pub fn invoke_procedure(
        &self,
        name: &str,
        args: &[RoutineArg],
    ) -> Result<ProcedureResult, GatewayError> {
        let spec = self
            .routines
            .get(RoutineKind::Procedure, name)
            .copied()
            .ok_or_else(|| GatewayError::UnknownRoutine(name.to_string()))?;
        let values = bind_args(&spec, args)?;
        if spec.mutating {
            let guard = self.writer()?;
            let affected = guard
                .execute(spec.sql, params_from_iter(values))
                .map_err(|err| GatewayError::RoutineExecutionError(self.sanitize(&err)))?;
            Ok(ProcedureResult::Confirmation {
                message: format!("{} executed successfully", spec.name),
                rows_affected: u64::try_from(affected).unwrap_or(u64::MAX),
            })
        } else {
            let guard = self.reader()?;
            let result = guard.prepare(spec.sql).and_then(|mut statement| {
                collect_rows(&mut statement, params_from_iter(values))
            });
            let (_, data) =
                result.map_err(|err| GatewayError::RoutineExecutionError(self.sanitize(&err)))?;
            Ok(ProcedureResult::Rows(data))
        }
    }

    /// Invokes a registered scalar function and returns its single-key row.
    ///
    /// An empty result yields an empty map, not an error; the registered
    /// aggregate templates always produce a row in practice.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownRoutine`] for unregistered names and
    /// [`GatewayError::RoutineExecutionError`] on arity mismatch or engine
    /// failure.
    pub fn invoke_function(&self, name: &str, args: &[RoutineArg]) -> Result<RowMap, GatewayError> {
        let spec = self
            .routines
            .get(RoutineKind::Function, name)
            .copied()
            .ok_or_else(|| GatewayError::UnknownRoutine(name.to_string()))?;
        let values = bind_args(&spec, args)?;
        let guard = self.reader()?;
        let result = guard.prepare(spec.sql).and_then(|mut statement| {
            collect_rows(&mut statement, params_from_iter(values))
        });
        let (_, data) =
            result.map_err(|err| GatewayError::RoutineExecutionError(self.sanitize(&err)))?;
        Ok(data.into_iter().next().unwrap_or_default())
    }

    /// Selects every row of a registered view.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownRoutine`] for unregistered view names
    /// and [`GatewayError::Db`] for engine failures.
    pub fn read_view(&self, name: &str) -> Result<Vec<RowMap>, GatewayError> {
        let spec = self
            .routines
            .get(RoutineKind::View, name)
            .copied()
            .ok_or_else(|| GatewayError::UnknownRoutine(name.to_string()))?;
        let guard = self.reader()?;
        let result = guard
            .prepare(spec.sql)
            .and_then(|mut statement| collect_rows(&mut statement, []));
        let (_, data) = result.map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
        Ok(data)
    }
}
