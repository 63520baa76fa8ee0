// crates/civiserve-api/src/tests.rs
// ============================================================================
// Module: API Handler Tests
// Description: Direct handler invocation against a temporary store.
// Purpose: Exercise error mapping, outcome folding, and the endpoint shapes.
// Dependencies: axum, civiserve-core, civiserve-store-sqlite, tempfile, tokio
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions."
)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use civiserve_core::CitizenPayload;
use civiserve_core::DepartmentPayload;
use civiserve_core::GrievancePayload;
use civiserve_core::ServicePayload;
use civiserve_core::ServiceRequestPayload;
use civiserve_store_sqlite::CivicStore;
use civiserve_store_sqlite::CivicStoreConfig;
use civiserve_store_sqlite::JournalMode;
use civiserve_store_sqlite::SyncMode;
use tempfile::TempDir;

use crate::routes;
use crate::routes::PageQuery;
use crate::routes::StatusQuery;
use crate::state::AppState;

/// Opens a fresh store in a temporary directory and wraps it in app state.
fn temp_state() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let config = CivicStoreConfig {
        path: dir.path().join("civic.db"),
        busy_timeout_ms: 5_000,
        journal_mode: JournalMode::Wal,
        sync_mode: SyncMode::Normal,
        read_pool_size: 2,
        max_allocation_attempts: 5,
    };
    let store = Arc::new(CivicStore::open(config).unwrap());
    (dir, AppState::new(store))
}

/// Creates a citizen/department/service triple and returns their keys.
fn seed_context(state: &AppState) -> (i64, i64, i64) {
    let citizen = state
        .store
        .create_citizen(&CitizenPayload {
            Name: "Asha Rao".to_string(),
            Address: None,
            Phone: None,
            Email: Some("asha@example.org".to_string()),
            Aadhaar_Number: None,
        })
        .unwrap();
    let department = state
        .store
        .create_department(&DepartmentPayload {
            Department_Name: "Sanitation".to_string(),
            Contact_Info: None,
        })
        .unwrap();
    let service = state
        .store
        .create_service(&ServicePayload {
            Service_Name: "Waste Pickup".to_string(),
            Service_Type: Some("Municipal".to_string()),
            Department_ID: department.Department_ID,
        })
        .unwrap();
    (citizen.Citizen_ID, department.Department_ID, service.Service_ID)
}

#[tokio::test]
async fn root_banner_reports_running() {
    let body = routes::root().await;
    assert_eq!(body.0["status"], "running");
}

#[tokio::test]
async fn health_probe_succeeds_on_a_fresh_store() {
    let (_dir, state) = temp_state();
    let body = routes::health(State(state)).await.unwrap();
    assert_eq!(body.0["status"], "healthy");
}

#[tokio::test]
async fn citizen_crud_round_trip_through_handlers() {
    let (_dir, state) = temp_state();

    let (status, created) = routes::citizens::create(
        State(state.clone()),
        Json(CitizenPayload {
            Name: "Asha Rao".to_string(),
            Address: Some("12 Lake Road".to_string()),
            Phone: None,
            Email: None,
            Aadhaar_Number: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.0.Citizen_ID, 1);

    let fetched = routes::citizens::fetch(State(state.clone()), Path(1))
        .await
        .unwrap();
    assert_eq!(fetched.0.Name, "Asha Rao");

    let updated = routes::citizens::update(
        State(state.clone()),
        Path(1),
        Json(CitizenPayload {
            Name: "Asha R. Rao".to_string(),
            Address: Some("12 Lake Road".to_string()),
            Phone: None,
            Email: None,
            Aadhaar_Number: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.0.Name, "Asha R. Rao");

    let listed = routes::citizens::list(
        State(state.clone()),
        Query(PageQuery { skip: 0, limit: 100 }),
    )
    .await
    .unwrap();
    assert_eq!(listed.0.len(), 1);

    let removed = routes::citizens::remove(State(state.clone()), Path(1))
        .await
        .unwrap();
    assert_eq!(removed.0["message"], "Citizen deleted successfully");

    let err = routes::citizens::fetch(State(state), Path(1)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adhoc_failures_fold_into_a_success_false_body() {
    let (_dir, state) = temp_state();
    let body = routes::custom_queries::execute(
        State(state),
        Json(civiserve_core::QueryRequest {
            query: "SELECT * FROM Citzen".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(!body.0.success);
    assert!(body.0.message.starts_with("Query execution failed"));
}

#[tokio::test]
async fn rejected_statements_fold_into_a_success_false_body() {
    let (_dir, state) = temp_state();
    let body = routes::custom_queries::execute(
        State(state),
        Json(civiserve_core::QueryRequest {
            query: "DELETE FROM Citizen; DROP TABLE Citizen;".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(!body.0.success);
    assert!(body.0.message.contains("multiple"));
    assert_eq!(body.0.rows_affected, 0);
}

#[tokio::test]
async fn unknown_views_are_not_found() {
    let (_dir, state) = temp_state();
    let err = routes::db_tools::select_view(State(state), Path("view_nope".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mutating_procedures_are_refused_on_get() {
    let (_dir, state) = temp_state();
    let err = routes::db_tools::call_procedure(
        State(state),
        Path("mark_grievance_resolved".to_string()),
        Query(HashMap::new()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(err.detail().contains("requires POST"));
}

#[tokio::test]
async fn posted_procedures_bind_json_arguments() {
    let (_dir, state) = temp_state();
    let (citizen_id, department_id, _service_id) = seed_context(&state);
    let grievance = state
        .store
        .create_grievance(&GrievancePayload {
            Citizen_ID: citizen_id,
            Department_ID: department_id,
            Description: "Missed pickup".to_string(),
            Status: "Submitted".to_string(),
            Date: "2024-01-16".to_string(),
        })
        .unwrap();

    let mut body = serde_json::Map::new();
    body.insert(
        "grievance_id".to_string(),
        serde_json::Value::from(grievance.Grievance_ID),
    );
    body.insert(
        "resolved_by".to_string(),
        serde_json::Value::from("Inspector Kumar"),
    );
    let result = routes::db_tools::call_procedure_json(
        State(state.clone()),
        Path("mark_grievance_resolved".to_string()),
        Json(body),
    )
    .await
    .unwrap();
    assert!(matches!(
        result.0,
        civiserve_core::ProcedureResult::Confirmation { rows_affected: 1, .. }
    ));

    let resolved = state.store.get_grievance(grievance.Grievance_ID).unwrap();
    assert_eq!(resolved.Status, "Resolved");
}

#[tokio::test]
async fn read_only_procedures_answer_with_bare_rows() {
    let (_dir, state) = temp_state();
    let (citizen_id, _department_id, _service_id) = seed_context(&state);
    let result = routes::db_tools::call_procedure(
        State(state),
        Path("citizen_summary".to_string()),
        Query(HashMap::from([("citizen_id".to_string(), citizen_id.to_string())])),
    )
    .await
    .unwrap();
    let civiserve_core::ProcedureResult::Rows(rows) = result.0 else {
        panic!("expected a bare row set");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("Name"), Some(&serde_json::Value::from("Asha Rao")));
}

#[tokio::test]
async fn functions_bind_query_string_arguments() {
    let (_dir, state) = temp_state();
    let row = routes::db_tools::call_function(
        State(state),
        Path("count_requests".to_string()),
        Query(HashMap::from([("citizen_id".to_string(), "1".to_string())])),
    )
    .await
    .unwrap();
    assert_eq!(row.0.get("cnt"), Some(&serde_json::Value::from(0)));
}

#[tokio::test]
async fn missing_function_arguments_are_bad_requests() {
    let (_dir, state) = temp_state();
    let err = routes::db_tools::call_function(
        State(state),
        Path("count_requests".to_string()),
        Query(HashMap::new()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(err.detail().contains("citizen_id"));
}

#[tokio::test]
async fn next_id_resolves_tables_case_insensitively() {
    let (_dir, state) = temp_state();
    let body = routes::db_tools::next_id(State(state.clone()), Path("service_request".to_string()))
        .await
        .unwrap();
    assert_eq!(body.0["table"], "Service_Request");
    assert_eq!(body.0["next_id"], 1);

    let err = routes::db_tools::next_id(State(state), Path("Ledger".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_patch_enforces_the_request_vocabulary() {
    let (_dir, state) = temp_state();
    let (citizen_id, _department_id, service_id) = seed_context(&state);
    let request = state
        .store
        .create_service_request(&ServiceRequestPayload {
            Citizen_ID: citizen_id,
            Service_ID: service_id,
            Request_Date: "2024-01-15".to_string(),
            Status: "Pending".to_string(),
            Payment_ID: None,
        })
        .unwrap();

    let err = routes::service_requests::set_status(
        State(state.clone()),
        Path(request.Request_ID),
        Query(StatusQuery {
            status: "Vanished".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let updated = routes::service_requests::set_status(
        State(state),
        Path(request.Request_ID),
        Query(StatusQuery {
            status: "Completed".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(updated.0.Status, "Completed");
}

#[tokio::test]
async fn dashboard_stats_start_at_zero() {
    let (_dir, state) = temp_state();
    let stats = routes::dashboard::stats(State(state)).await.unwrap();
    assert_eq!(stats.0.total_citizens, 0);
    assert_eq!(stats.0.total_revenue, 0.0);
    assert_eq!(stats.0.open_grievances, 0);
}

#[tokio::test]
async fn sample_query_catalog_is_nonempty() {
    let body = routes::custom_queries::samples().await;
    assert!(!body.0.is_empty());
    assert!(body.0.iter().all(|sample| !sample.name.is_empty()));
}
