// crates/civiserve-store-sqlite/tests/crud_tests.rs
// ============================================================================
// Module: Entity CRUD Integration Tests
// Description: Typed create/read/update/delete across the entity tables.
// Purpose: Verify key assignment, not-found reporting, and status
//          vocabulary enforcement.
// Dependencies: civiserve-core, civiserve-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! CRUD operations must assign keys through the allocator, report absence
//! as typed not-found errors, and refuse status labels outside the closed
//! vocabularies.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions."
)]

mod common;

use civiserve_core::CitizenPayload;
use civiserve_core::GatewayError;
use civiserve_core::GrievancePayload;
use civiserve_core::ServiceRequestPayload;

use common::open_temp_store;
use common::seed_baseline;

#[test]
fn create_get_update_delete_round_trip() {
    let (_dir, store) = open_temp_store();
    let created = store
        .create_citizen(&CitizenPayload {
            Name: "Ravi Menon".to_string(),
            Address: None,
            Phone: None,
            Email: Some("ravi@example.org".to_string()),
            Aadhaar_Number: None,
        })
        .unwrap();
    assert_eq!(created.Citizen_ID, 1);
    let fetched = store.get_citizen(created.Citizen_ID).unwrap();
    assert_eq!(fetched, created);
    let updated = store
        .update_citizen(
            created.Citizen_ID,
            &CitizenPayload {
                Name: "Ravi Menon".to_string(),
                Address: Some("4 Hill Street".to_string()),
                Phone: None,
                Email: Some("ravi@example.org".to_string()),
                Aadhaar_Number: None,
            },
        )
        .unwrap();
    assert_eq!(updated.Address.as_deref(), Some("4 Hill Street"));
    store.delete_citizen(created.Citizen_ID).unwrap();
    let err = store.get_citizen(created.Citizen_ID).unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(_)));
}

#[test]
fn missing_keys_report_not_found_on_every_verb() {
    let (_dir, store) = open_temp_store();
    assert!(matches!(store.get_department(42), Err(GatewayError::NotFound(_))));
    assert!(matches!(store.delete_payment(42), Err(GatewayError::NotFound(_))));
    let err = store
        .update_citizen(
            42,
            &CitizenPayload {
                Name: "Nobody".to_string(),
                Address: None,
                Phone: None,
                Email: None,
                Aadhaar_Number: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, GatewayError::NotFound(_)));
}

#[test]
fn listings_come_back_in_key_order() {
    let (_dir, store) = open_temp_store();
    for name in ["A", "B", "C"] {
        store
            .create_citizen(&CitizenPayload {
                Name: name.to_string(),
                Address: None,
                Phone: None,
                Email: None,
                Aadhaar_Number: None,
            })
            .unwrap();
    }
    let listed = store.list_citizens(0, 100).unwrap();
    let keys: Vec<i64> = listed.iter().map(|c| c.Citizen_ID).collect();
    assert_eq!(keys, vec![1, 2, 3]);
    // The window skips and bounds in key order.
    let page = store.list_citizens(1, 1).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].Citizen_ID, 2);
}

#[test]
fn request_status_transitions_are_vocabulary_checked() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    let updated = store.set_request_status(keys.request_id, "Processing").unwrap();
    assert_eq!(updated.Status, "Processing");
    let err = store.set_request_status(keys.request_id, "Paused").unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)));
    // The rejected label left the row untouched.
    assert_eq!(store.get_service_request(keys.request_id).unwrap().Status, "Processing");
}

#[test]
fn grievance_status_transitions_are_vocabulary_checked() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    let updated = store.set_grievance_status(keys.grievance_id, "Under Review").unwrap();
    assert_eq!(updated.Status, "Under Review");
    let err = store.set_grievance_status(keys.grievance_id, "Ignored").unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)));
}

#[test]
fn creates_with_invalid_status_labels_are_refused() {
    let (_dir, store) = open_temp_store();
    let keys = seed_baseline(&store);
    let err = store
        .create_service_request(&ServiceRequestPayload {
            Citizen_ID: keys.citizen_id,
            Service_ID: keys.service_id,
            Request_Date: "2024-04-01".to_string(),
            Status: "Queued".to_string(),
            Payment_ID: None,
        })
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)));
    let err = store
        .create_grievance(&GrievancePayload {
            Citizen_ID: keys.citizen_id,
            Department_ID: keys.department_id,
            Description: "Late response".to_string(),
            Status: "Escalated".to_string(),
            Date: "2024-04-01".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)));
}

#[test]
fn duplicate_unique_columns_surface_as_db_errors() {
    let (_dir, store) = open_temp_store();
    seed_baseline(&store);
    let err = store
        .create_citizen(&CitizenPayload {
            Name: "Duplicate Email".to_string(),
            Address: None,
            Phone: None,
            Email: Some("asha@example.org".to_string()),
            Aadhaar_Number: None,
        })
        .unwrap_err();
    // A unique-column collision repeats on every candidate key, so the
    // bounded retry loop reports exhaustion.
    assert!(
        matches!(
            err,
            GatewayError::AllocationExhausted { .. } | GatewayError::Db(_)
        ),
        "got {err:?}"
    );
}
