// crates/civiserve-store-sqlite/tests/report_tests.rs
// ============================================================================
// Module: Reporting Engine Integration Tests
// Description: Dashboard report execution and limit clamping.
// Purpose: Verify report templates aggregate correctly and guard division.
// Dependencies: civiserve-core, civiserve-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Reports run fixed templates; the only variable input is a clamped limit.
//! Departments with no requests must report a null completion rate, never a
//! division failure.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions."
)]

mod common;

use civiserve_core::DepartmentPayload;
use civiserve_core::GatewayError;
use civiserve_core::ServiceRequestPayload;

use common::open_temp_store;
use common::seed_baseline;

#[test]
fn unknown_report_is_refused() {
    let (_dir, store) = open_temp_store();
    let err = store.report("quarterly_audit", None).unwrap_err();
    assert!(matches!(err, GatewayError::UnknownRoutine(_)));
}

#[test]
fn headline_stats_count_the_seeded_dataset() {
    let (_dir, store) = open_temp_store();
    seed_baseline(&store);
    let stats = store.dashboard_stats().unwrap();
    assert_eq!(stats.total_citizens, 1);
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.total_grievances, 1);
    assert!((stats.total_revenue - 150.0).abs() < f64::EPSILON);
    assert_eq!(stats.pending_requests, 1);
    assert_eq!(stats.open_grievances, 1);
}

#[test]
fn headline_stats_on_an_empty_database_are_all_zero() {
    let (_dir, store) = open_temp_store();
    let stats = store.dashboard_stats().unwrap();
    assert_eq!(stats.total_citizens, 0);
    assert!((stats.total_revenue).abs() < f64::EPSILON);
    assert_eq!(stats.open_grievances, 0);
}

#[test]
fn department_performance_reports_null_rate_without_requests() {
    let (_dir, store) = open_temp_store();
    store
        .create_department(&DepartmentPayload {
            Department_Name: "Archives".to_string(),
            Contact_Info: None,
        })
        .unwrap();
    let rows = store.report("department_performance", None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Total_Requests"), Some(&serde_json::json!(0)));
    // No requests: the NULLIF guard yields null, not a division failure.
    assert_eq!(rows[0].get("Completion_Rate"), Some(&serde_json::Value::Null));
}

#[test]
fn department_performance_computes_completion_rate() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    store.set_request_status(keys.request_id, "Completed").unwrap();
    store
        .create_service_request(&ServiceRequestPayload {
            Citizen_ID: keys.citizen_id,
            Service_ID: keys.service_id,
            Request_Date: "2024-02-01".to_string(),
            Status: "Pending".to_string(),
            Payment_ID: None,
        })
        .unwrap();
    let rows = store.report("department_performance", None).unwrap();
    let row = rows
        .iter()
        .find(|r| r.get("Department_Name") == Some(&serde_json::json!("Sanitation")))
        .unwrap();
    assert_eq!(row.get("Total_Requests"), Some(&serde_json::json!(2)));
    assert_eq!(row.get("Completed_Requests"), Some(&serde_json::json!(1)));
    assert_eq!(row.get("Completion_Rate"), Some(&serde_json::json!(50.0)));
}

#[test]
fn recent_requests_honors_and_clamps_the_limit() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    for day in 1 ..= 5 {
        store
            .create_service_request(&ServiceRequestPayload {
                Citizen_ID: keys.citizen_id,
                Service_ID: keys.service_id,
                Request_Date: format!("2024-03-{day:02}"),
                Status: "Pending".to_string(),
                Payment_ID: None,
            })
            .unwrap();
    }
    let rows = store.report("recent_requests", Some(3)).unwrap();
    assert_eq!(rows.len(), 3);
    // Most recent first.
    assert_eq!(rows[0].get("Request_Date"), Some(&serde_json::json!("2024-03-05")));
    // Out-of-range limits clamp instead of failing.
    let rows = store.report("recent_requests", Some(0)).unwrap();
    assert_eq!(rows.len(), 1);
    let rows = store.report("recent_requests", Some(10_000)).unwrap();
    assert_eq!(rows.len(), 6);
}

#[test]
fn monthly_trends_buckets_by_month() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    store
        .create_service_request(&ServiceRequestPayload {
            Citizen_ID: keys.citizen_id,
            Service_ID: keys.service_id,
            Request_Date: "2024-02-20".to_string(),
            Status: "Pending".to_string(),
            Payment_ID: None,
        })
        .unwrap();
    let rows = store.report("monthly_trends", None).unwrap();
    assert_eq!(rows.len(), 2);
    // Descending month order.
    assert_eq!(rows[0].get("Month"), Some(&serde_json::json!("2024-02")));
    assert_eq!(rows[1].get("Month"), Some(&serde_json::json!("2024-01")));
    assert_eq!(rows[1].get("Total_Requests"), Some(&serde_json::json!(1)));
}
