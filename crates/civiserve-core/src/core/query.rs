// crates/civiserve-core/src/core/query.rs
// ============================================================================
// Module: Ad-hoc Query Wire Models
// Description: Request/response shapes for the custom query endpoint.
// Purpose: Keep the operator console wire format stable regardless of what
//          the statement did or how it failed.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`QueryOutcome`] is the single response shape for ad-hoc execution:
//! `columns`/`data` are populated only for row-producing statements,
//! mutations report only `rows_affected`, and failures zero everything and
//! carry a sanitized message. The endpoint never surfaces a transport-level
//! error for an execution failure; `success` in the body is the contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Request
// ============================================================================

/// Raw SQL submission from the operator console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Raw SQL text; exactly one statement, trailing terminator permitted.
    pub query: String,
}

// ============================================================================
// SECTION: Response
// ============================================================================

/// Result of an ad-hoc execution.
///
/// # Invariants
/// - `columns`/`data` are non-empty only for row-producing statements.
/// - Failures carry zero rows, zero columns, and `rows_affected == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Whether the statement executed.
    pub success: bool,
    /// Human-readable outcome or sanitized failure message.
    pub message: String,
    /// Column names in engine-reported order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Materialized rows keyed by column name.
    #[serde(default)]
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
    /// Rows returned (row-producing) or affected (mutating).
    #[serde(default)]
    pub rows_affected: u64,
}

impl QueryOutcome {
    /// Builds the success shape for a row-producing statement.
    #[must_use]
    pub fn rows(
        columns: Vec<String>,
        data: Vec<serde_json::Map<String, serde_json::Value>>,
    ) -> Self {
        let count = u64::try_from(data.len()).unwrap_or(u64::MAX);
        Self {
            success: true,
            message: format!("Query executed successfully. {count} rows returned."),
            columns,
            data,
            rows_affected: count,
        }
    }

    /// Builds the success shape for a mutating statement.
    #[must_use]
    pub fn mutation(rows_affected: u64) -> Self {
        Self {
            success: true,
            message: format!("Query executed successfully. {rows_affected} rows affected."),
            columns: Vec::new(),
            data: Vec::new(),
            rows_affected,
        }
    }

    /// Builds the failure shape with a sanitized message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: format!("Query execution failed: {}", message.into()),
            columns: Vec::new(),
            data: Vec::new(),
            rows_affected: 0,
        }
    }
}

// ============================================================================
// SECTION: Procedure Results
// ============================================================================

/// Result of a bridged procedure invocation.
///
/// Row-producing procedures answer with their bare row set; mutating
/// procedures answer with a confirmation object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcedureResult {
    /// Row set produced by a non-mutating procedure.
    Rows(Vec<serde_json::Map<String, serde_json::Value>>),
    /// Confirmation for a mutating procedure.
    Confirmation {
        /// Human-readable confirmation.
        message: String,
        /// Rows affected by the mutation.
        rows_affected: u64,
    },
}

// ============================================================================
// SECTION: Dashboard Stats
// ============================================================================

/// Headline dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Registered citizens.
    pub total_citizens: i64,
    /// Service requests on record.
    pub total_requests: i64,
    /// Grievances on record.
    pub total_grievances: i64,
    /// Revenue from completed payments.
    pub total_revenue: f64,
    /// Requests pending or in processing.
    pub pending_requests: i64,
    /// Grievances submitted or under review.
    pub open_grievances: i64,
}

// ============================================================================
// SECTION: Sample Queries
// ============================================================================

/// A canned operator-console example query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleQuery {
    /// Display name.
    pub name: &'static str,
    /// Example SQL text.
    pub query: &'static str,
}

/// Returns the canned examples offered next to the custom query editor.
#[must_use]
pub fn sample_queries() -> Vec<SampleQuery> {
    vec![
        SampleQuery {
            name: "View All Citizens",
            query: "SELECT * FROM Citizen LIMIT 10;",
        },
        SampleQuery {
            name: "Count Services by Department",
            query: "SELECT d.Department_Name, COUNT(s.Service_ID) AS Total_Services\n\
                    FROM Department d\n\
                    LEFT JOIN Service s ON d.Department_ID = s.Department_ID\n\
                    GROUP BY d.Department_Name;",
        },
        SampleQuery {
            name: "Pending Service Requests",
            query: "SELECT sr.Request_ID, c.Name AS Citizen_Name, s.Service_Name, \
                    sr.Request_Date\n\
                    FROM Service_Request sr\n\
                    JOIN Citizen c ON sr.Citizen_ID = c.Citizen_ID\n\
                    JOIN Service s ON sr.Service_ID = s.Service_ID\n\
                    WHERE sr.Status = 'Pending';",
        },
        SampleQuery {
            name: "Grievances by Status",
            query: "SELECT Status, COUNT(*) AS Count\nFROM Grievance\nGROUP BY Status;",
        },
        SampleQuery {
            name: "Recent Payments",
            query: "SELECT Payment_ID, Amount, Payment_Date, Payment_Method\n\
                    FROM Payment\nORDER BY Payment_Date DESC\nLIMIT 10;",
        },
    ]
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
    fn row_outcome_reports_row_count_in_both_fields() {
        let mut row = serde_json::Map::new();
        row.insert("Citizen_ID".to_string(), serde_json::json!(1));
        let outcome = QueryOutcome::rows(vec!["Citizen_ID".to_string()], vec![row]);
        assert!(outcome.success);
        assert_eq!(outcome.rows_affected, 1);
        assert_eq!(outcome.message, "Query executed successfully. 1 rows returned.");
    }

    #[test]
    fn mutation_outcome_has_no_columns_or_rows() {
        let outcome = QueryOutcome::mutation(3);
        assert!(outcome.success);
        assert!(outcome.columns.is_empty());
        assert!(outcome.data.is_empty());
        assert_eq!(outcome.rows_affected, 3);
    }

    #[test]
    fn failure_outcome_zeroes_everything() {
        let outcome = QueryOutcome::failure("no such table: Citzen");
        assert!(!outcome.success);
        assert!(outcome.columns.is_empty());
        assert!(outcome.data.is_empty());
        assert_eq!(outcome.rows_affected, 0);
        assert!(outcome.message.starts_with("Query execution failed:"));
    }

    #[test]
    fn procedure_rows_serialize_as_a_bare_array() {
        let mut row = serde_json::Map::new();
        row.insert("Total_Paid".to_string(), serde_json::json!(150.0));
        let result = ProcedureResult::Rows(vec![row]);
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire, serde_json::json!([{ "Total_Paid": 150.0 }]));
    }

    #[test]
    fn procedure_confirmation_serializes_as_an_object() {
        let result = ProcedureResult::Confirmation {
            message: "mark_grievance_resolved executed successfully".to_string(),
            rows_affected: 1,
        };
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["rows_affected"], 1);
    }

    #[test]
    fn sample_queries_are_single_statements() {
        for sample in sample_queries() {
            let body = sample.query.trim().trim_end_matches(';');
            assert!(!body.contains(';'), "sample {} stacks statements", sample.name);
        }
    }
}
