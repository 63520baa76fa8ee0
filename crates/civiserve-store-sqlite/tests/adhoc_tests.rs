// crates/civiserve-store-sqlite/tests/adhoc_tests.rs
// ============================================================================
// Module: Ad-hoc Executor Integration Tests
// Description: Classification, outcome shaping, and failure folding.
// Purpose: Verify operator-submitted SQL always yields the stable outcome
//          shape.
// Dependencies: civiserve-core, civiserve-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Row-producing statements must materialize columns and rows, mutations
//! must report affected counts, and every statement-level failure, lexical
//! rejection included, must fold into a failure outcome.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions."
)]

mod common;

use common::open_temp_store;
use common::seed_baseline;

#[test]
fn select_returns_columns_and_rows() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    let outcome = store.run_adhoc("SELECT Citizen_ID, Name FROM Citizen;").unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.columns, vec!["Citizen_ID", "Name"]);
    assert_eq!(outcome.rows_affected, 1);
    assert_eq!(
        outcome.data[0].get("Citizen_ID"),
        Some(&serde_json::json!(keys.citizen_id))
    );
}

#[test]
fn select_with_no_matches_still_succeeds() {
    let (_dir, store) = open_temp_store();
    let outcome = store.run_adhoc("SELECT * FROM Citizen WHERE Citizen_ID = 99").unwrap();
    assert!(outcome.success);
    assert!(outcome.data.is_empty());
    assert_eq!(outcome.rows_affected, 0);
    // Column names are still reported for an empty result set.
    assert!(outcome.columns.contains(&"Name".to_string()));
}

#[test]
fn mutation_reports_affected_count_without_rows() {
    let (_dir, store) = open_temp_store();
    seed_baseline(&store);
    let outcome = store
        .run_adhoc("UPDATE Citizen SET Address = 'Relocated' WHERE Citizen_ID = 1")
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.rows_affected, 1);
    assert!(outcome.columns.is_empty());
    assert!(outcome.data.is_empty());
}

#[test]
fn engine_failure_folds_into_failure_outcome() {
    let (_dir, store) = open_temp_store();
    let outcome = store.run_adhoc("SELECT * FROM Citzen").unwrap();
    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Query execution failed:"));
    assert!(outcome.data.is_empty());
    assert_eq!(outcome.rows_affected, 0);
}

#[test]
fn multi_statement_submission_folds_into_a_failure_outcome() {
    let (_dir, store) = open_temp_store();
    seed_baseline(&store);
    let outcome = store.run_adhoc("DELETE FROM Citizen; DROP TABLE Citizen;").unwrap();
    assert!(!outcome.success);
    assert!(outcome.message.contains("multiple"));
    assert_eq!(outcome.rows_affected, 0);
    // The gate fired before execution: the table is untouched.
    let outcome = store.run_adhoc("SELECT COUNT(*) AS n FROM Citizen").unwrap();
    assert_eq!(outcome.data[0].get("n"), Some(&serde_json::json!(1)));
}

#[test]
fn repeated_select_is_idempotent() {
    let (_dir, store) = open_temp_store();
    seed_baseline(&store);
    let first = store.run_adhoc("SELECT Name FROM Citizen ORDER BY Citizen_ID").unwrap();
    let second = store.run_adhoc("SELECT Name FROM Citizen ORDER BY Citizen_ID").unwrap();
    assert_eq!(first, second);
}

#[test]
fn temporal_text_is_canonicalized_on_the_wire() {
    let (_dir, store) = open_temp_store();
    let insert = store
        .run_adhoc(
            "INSERT INTO Payment (Payment_ID, Amount, Payment_Date, Payment_Method, Status) \
             VALUES (1, 10.0, '2024-02-01 09:30:00', 'Cash', 'Completed')",
        )
        .unwrap();
    assert!(insert.success);
    let outcome = store.run_adhoc("SELECT Payment_Date FROM Payment").unwrap();
    assert_eq!(
        outcome.data[0].get("Payment_Date"),
        Some(&serde_json::json!("2024-02-01T09:30:00"))
    );
}
