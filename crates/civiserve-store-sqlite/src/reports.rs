// crates/civiserve-store-sqlite/src/reports.rs
// ============================================================================
// Module: Reporting Engine
// Description: Execution of the registered dashboard reports.
// Purpose: Run read-only aggregation templates with a clamped result limit.
// Dependencies: civiserve-core, rusqlite, serde_json
// ============================================================================

//! ## Overview
//! Reports are fixed templates from the report registry; the only
//! caller-variable input is an optional result limit, clamped to `1..=100`
//! with a default of 10. The headline counters report is additionally
//! decoded into the typed [`DashboardStats`] shape for the stats endpoint.

// ============================================================================
// SECTION: Imports
// ============================================================================

use civiserve_core::DashboardStats;
use civiserve_core::GatewayError;
use civiserve_core::RowMap;

use crate::store::CivicStore;
use crate::store::collect_rows;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default result limit for limited reports.
const DEFAULT_REPORT_LIMIT: i64 = 10;
/// Smallest accepted result limit.
const MIN_REPORT_LIMIT: i64 = 1;
/// Largest accepted result limit.
const MAX_REPORT_LIMIT: i64 = 100;

// ============================================================================
// SECTION: Execution
// ============================================================================

impl CivicStore {
    /// Runs a registered report, binding `limit` when the template takes one.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownRoutine`] for unregistered report names
    /// and [`GatewayError::Db`] for engine failures.
    pub fn report(&self, name: &str, limit: Option<i64>) -> Result<Vec<RowMap>, GatewayError> {
        let spec = self
            .reports
            .get(name)
            .copied()
            .ok_or_else(|| GatewayError::UnknownRoutine(name.to_string()))?;
        let guard = self.reader()?;
        let result = guard.prepare(spec.sql).and_then(|mut statement| {
            if spec.takes_limit {
                let bound = limit
                    .unwrap_or(DEFAULT_REPORT_LIMIT)
                    .clamp(MIN_REPORT_LIMIT, MAX_REPORT_LIMIT);
                collect_rows(&mut statement, [bound])
            } else {
                collect_rows(&mut statement, [])
            }
        });
        let (_, data) = result.map_err(|err| GatewayError::Db(self.sanitize(&err)))?;
        Ok(data)
    }

    /// Runs the headline counters report and decodes it into typed stats.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Db`] when the report fails or its single row
    /// does not decode.
    pub fn dashboard_stats(&self) -> Result<DashboardStats, GatewayError> {
        let rows = self.report("dashboard_stats", None)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Db("headline report returned no row".to_string()))?;
        serde_json::from_value(serde_json::Value::Object(row))
            .map_err(|err| GatewayError::Db(err.to_string()))
    }
}
