// crates/civiserve-store-sqlite/tests/routine_tests.rs
// ============================================================================
// Module: Routine Bridge Integration Tests
// Description: Procedure, function, and view invocation through the bridge.
// Purpose: Verify registry gating, positional binding, and result shaping.
// Dependencies: civiserve-core, civiserve-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Registry misses must fail before the engine; registered routines must
//! bind caller values positionally and shape their results per family.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions."
)]

mod common;

use civiserve_core::GatewayError;
use civiserve_core::ProcedureResult;
use civiserve_core::RoutineArg;

use common::open_temp_store;
use common::seed_baseline;

#[test]
fn unknown_routine_never_reaches_the_engine() {
    let (_dir, store) = open_temp_store();
    let err = store.invoke_procedure("drop_everything", &[]).unwrap_err();
    assert!(matches!(err, GatewayError::UnknownRoutine(_)));
    let err = store.invoke_function("fn_made_up", &[]).unwrap_err();
    assert!(matches!(err, GatewayError::UnknownRoutine(_)));
    let err = store.read_view("view_made_up").unwrap_err();
    assert!(matches!(err, GatewayError::UnknownRoutine(_)));
}

#[test]
fn arity_mismatch_is_a_routine_execution_error() {
    let (_dir, store) = open_temp_store();
    let err = store.invoke_procedure("citizen_summary", &[]).unwrap_err();
    assert!(matches!(err, GatewayError::RoutineExecutionError(_)));
}

#[test]
fn citizen_summary_returns_its_bare_row_set() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    let result = store
        .invoke_procedure("citizen_summary", &[RoutineArg::Int(keys.citizen_id)])
        .unwrap();
    let ProcedureResult::Rows(rows) = result else {
        panic!("expected rows from a read-only procedure, got {result:?}");
    };
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.get("Total_Requests"), Some(&serde_json::json!(1)));
    assert_eq!(row.get("Total_Grievances"), Some(&serde_json::json!(1)));
    assert_eq!(row.get("Total_Paid"), Some(&serde_json::json!(150.0)));
}

#[test]
fn mark_grievance_resolved_mutates_and_annotates() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    let result = store
        .invoke_procedure(
            "mark_grievance_resolved",
            &[
                RoutineArg::Int(keys.grievance_id),
                RoutineArg::Text("Inspector Kumar".to_string()),
            ],
        )
        .unwrap();
    assert!(matches!(result, ProcedureResult::Confirmation { rows_affected: 1, .. }));
    let grievance = store.get_grievance(keys.grievance_id).unwrap();
    assert_eq!(grievance.Status, "Resolved");
    assert!(grievance.Description.ends_with("(resolved by Inspector Kumar)"));
}

#[test]
fn scalar_functions_return_their_single_named_key() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    let row = store.invoke_function("total_paid", &[RoutineArg::Int(keys.citizen_id)]).unwrap();
    assert_eq!(row.get("total"), Some(&serde_json::json!(150.0)));
    let row = store
        .invoke_function("count_requests", &[RoutineArg::Int(keys.citizen_id)])
        .unwrap();
    assert_eq!(row.get("cnt"), Some(&serde_json::json!(1)));
    let row = store
        .invoke_function("is_citizen_active", &[RoutineArg::Int(keys.citizen_id)])
        .unwrap();
    assert_eq!(row.get("active"), Some(&serde_json::json!(1)));
    let row = store.invoke_function("is_citizen_active", &[RoutineArg::Int(999)]).unwrap();
    assert_eq!(row.get("active"), Some(&serde_json::json!(0)));
}

#[test]
fn open_grievance_count_tracks_status_transitions() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    let row = store
        .invoke_function("open_grievances", &[RoutineArg::Int(keys.department_id)])
        .unwrap();
    assert_eq!(row.get("open_cnt"), Some(&serde_json::json!(1)));
    store.set_grievance_status(keys.grievance_id, "Closed").unwrap();
    let row = store
        .invoke_function("open_grievances", &[RoutineArg::Int(keys.department_id)])
        .unwrap();
    assert_eq!(row.get("open_cnt"), Some(&serde_json::json!(0)));
}

#[test]
fn registered_views_return_aggregated_rows() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    let rows = store.read_view("view_total_paid_per_citizen").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Total_Paid"), Some(&serde_json::json!(150.0)));
    let rows = store.read_view("view_request_counts_per_service").unwrap();
    assert_eq!(rows[0].get("Request_Count"), Some(&serde_json::json!(1)));
    let rows = store.read_view("view_open_grievances_per_department").unwrap();
    assert_eq!(rows[0].get("Department_ID"), Some(&serde_json::json!(keys.department_id)));
    assert_eq!(rows[0].get("Open_Grievances"), Some(&serde_json::json!(1)));
}
