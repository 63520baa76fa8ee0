// crates/civiserve-store-sqlite/src/executor.rs
// ============================================================================
// Module: Ad-hoc Query Executor
// Description: Classified execution of operator-submitted SQL.
// Purpose: Run one statement at a time and fold engine failures into the
//          stable outcome shape.
// Dependencies: civiserve-core, rusqlite
// ============================================================================

//! ## Overview
//! The executor runs whatever survives the lexical gate: row-producing
//! statements on a pooled read connection, mutations on the writer. Nothing
//! statement-level escapes as an error; lexical rejection and engine
//! failures alike come back as a failure [`QueryOutcome`] with a sanitized
//! message, so the operator console always gets the same response shape.

// ============================================================================
// SECTION: Imports
// ============================================================================

use civiserve_core::GatewayError;
use civiserve_core::QueryOutcome;
use civiserve_core::StatementKind;
use civiserve_core::classify;

use crate::store::CivicStore;
use crate::store::collect_rows;

// ============================================================================
// SECTION: Execution
// ============================================================================

impl CivicStore {
    /// Classifies and executes one ad-hoc statement.
    ///
    /// Lexical rejection and engine failures alike come back inside the
    /// outcome with `success == false`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Io`] when a connection guard is poisoned.
    pub fn run_adhoc(&self, raw: &str) -> Result<QueryOutcome, GatewayError> {
        let classified = match classify(raw) {
            Ok(classified) => classified,
            Err(GatewayError::RejectedStatement(message)) => {
                return Ok(QueryOutcome::failure(message));
            }
            Err(err) => return Err(err),
        };
        match classified.kind {
            StatementKind::RowProducing => {
                let guard = self.reader()?;
                let result = guard.prepare(&classified.sql).and_then(|mut statement| {
                    collect_rows(&mut statement, [])
                });
                match result {
                    Ok((columns, data)) => Ok(QueryOutcome::rows(columns, data)),
                    Err(err) => Ok(QueryOutcome::failure(self.sanitize(&err))),
                }
            }
            StatementKind::Mutating => {
                let guard = self.writer()?;
                match guard.execute(&classified.sql, []) {
                    Ok(affected) => {
                        Ok(QueryOutcome::mutation(u64::try_from(affected).unwrap_or(u64::MAX)))
                    }
                    Err(err) => Ok(QueryOutcome::failure(self.sanitize(&err))),
                }
            }
        }
    }
}
