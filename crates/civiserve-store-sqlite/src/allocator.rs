// crates/civiserve-store-sqlite/src/allocator.rs
// ============================================================================
// Module: Sequence Allocator
// Description: Manual primary key allocation with bounded conflict retry.
// Purpose: Hand out strictly increasing keys for the six entity tables
//          without relying on engine auto-increment.
// Dependencies: civiserve-core, rusqlite, tracing
// ============================================================================

//! ## Overview
//! Every entity table carries an application-assigned integer key. The
//! allocator keeps one high-water mark per table; a candidate is always
//! `max(stored maximum, mark) + 1`, so keys stay strictly increasing even
//! when rows are deleted or an earlier reservation was never used.
//!
//! Inserts go through [`CivicStore::insert_allocated`], which holds the
//! table's mark lock across an immediate transaction and retries on key
//! conflict caused by out-of-band writers (ad-hoc INSERTs pick their own
//! keys). Lock order is fixed: mark lock first, writer connection second.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::MutexGuard;

use civiserve_core::EntityTable;
use civiserve_core::GatewayError;
use rusqlite::Connection;
use rusqlite::Transaction;
use rusqlite::TransactionBehavior;

use crate::store::CivicStore;
use crate::store::CivicStoreError;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the mark-array slot for a table.
pub(crate) const fn mark_slot(table: EntityTable) -> usize {
    match table {
        EntityTable::Citizen => 0,
        EntityTable::Department => 1,
        EntityTable::Service => 2,
        EntityTable::Payment => 3,
        EntityTable::ServiceRequest => 4,
        EntityTable::Grievance => 5,
    }
}

/// Reads the current stored key maximum for a table.
fn current_max(connection: &Connection, table: EntityTable) -> rusqlite::Result<i64> {
    let sql = format!(
        "SELECT COALESCE(MAX({}), 0) FROM {}",
        table.primary_key(),
        table.table_name()
    );
    connection.query_row(&sql, [], |row| row.get(0))
}

/// Returns whether an engine error is a primary-key or unique conflict.
fn is_key_conflict(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(failure, _)
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

// ============================================================================
// SECTION: Allocation
// ============================================================================

impl CivicStore {
    /// Locks the high-water mark for a table.
    fn lock_mark(&self, table: EntityTable) -> Result<MutexGuard<'_, i64>, CivicStoreError> {
        self.allocation_marks[mark_slot(table)]
            .lock()
            .map_err(|_| CivicStoreError::Io("allocation mark poisoned".to_string()))
    }

    /// Reserves and returns the next primary key for `table`.
    ///
    /// The reservation advances the table's mark, so two concurrent calls
    /// never see the same key even before either inserts. The stored maximum
    /// is read from the pool; the mark lock alone serializes reservations,
    /// so tables never contend with each other or with the writer here.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Db`] when the stored maximum cannot be read.
    pub fn next_key(&self, table: EntityTable) -> Result<i64, GatewayError> {
        let mut mark = self.lock_mark(table)?;
        let candidate = {
            let guard = self.reader()?;
            let db_max =
                current_max(&guard, table).map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
            db_max.max(*mark) + 1
        };
        *mark = candidate;
        Ok(candidate)
    }

    /// Runs `insert` with a freshly allocated key inside one immediate
    /// transaction, retrying on key conflict.
    ///
    /// The mark lock is held for the whole call, so allocator-driven inserts
    /// never collide with each other; conflicts come only from out-of-band
    /// writers that pick their own keys.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AllocationExhausted`] when every bounded
    /// attempt hit a key conflict, or [`GatewayError::Db`] for any other
    /// engine failure.
    pub(crate) fn insert_allocated<F>(
        &self,
        table: EntityTable,
        mut insert: F,
    ) -> Result<i64, GatewayError>
    where
        F: FnMut(&Transaction<'_>, i64) -> rusqlite::Result<()>,
    {
        let attempts = self.max_allocation_attempts();
        let mut mark = self.lock_mark(table)?;
        let mut guard = self.writer()?;
        for attempt in 1 ..= attempts {
            let tx = guard
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
            let db_max =
                current_max(&tx, table).map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
            let candidate = db_max.max(*mark) + 1;
            match insert(&tx, candidate) {
                Ok(()) => {
                    tx.commit().map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
                    *mark = candidate;
                    return Ok(candidate);
                }
                Err(err) if is_key_conflict(&err) => {
                    tracing::warn!(
                        table = %table,
                        candidate,
                        attempt,
                        "key conflict with out-of-band writer, retrying"
                    );
                    // Dropping the transaction rolls it back.
                }
                Err(err) => return Err(GatewayError::Db(self.sanitize(&err))),
            }
        }
        Err(GatewayError::AllocationExhausted {
            table: table.to_string(),
            attempts,
        })
    }
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
    fn every_table_maps_to_a_distinct_slot() {
        let mut slots: Vec<usize> = EntityTable::ALL.iter().map(|t| mark_slot(*t)).collect();
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), EntityTable::ALL.len());
    }
}
