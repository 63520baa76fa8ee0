// crates/civiserve-store-sqlite/tests/common/mod.rs
// ============================================================================
// Module: Store Test Helpers
// Description: Temp-database fixtures shared by the store integration tests.
// Purpose: Open disposable stores and seed a small civic dataset.
// Dependencies: civiserve-core, civiserve-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! Shared fixtures for the store integration suites.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    dead_code,
    reason = "Test-only helpers; not every suite uses every fixture."
)]

use civiserve_core::CitizenPayload;
use civiserve_core::DepartmentPayload;
use civiserve_core::GrievancePayload;
use civiserve_core::PaymentPayload;
use civiserve_core::ServicePayload;
use civiserve_core::ServiceRequestPayload;
use civiserve_store_sqlite::CivicStore;
use civiserve_store_sqlite::CivicStoreConfig;
use civiserve_store_sqlite::JournalMode;
use civiserve_store_sqlite::SyncMode;

/// Opens a store against a fresh temp-directory database.
pub fn open_temp_store() -> (tempfile::TempDir, CivicStore) {
    let dir = tempfile::tempdir().unwrap();
    let config = CivicStoreConfig {
        path: dir.path().join("civic.db"),
        busy_timeout_ms: 5_000,
        journal_mode: JournalMode::Wal,
        sync_mode: SyncMode::Normal,
        read_pool_size: 2,
        max_allocation_attempts: 5,
    };
    let store = CivicStore::open(config).unwrap();
    (dir, store)
}

/// Seeded entity keys for cross-referencing in assertions.
pub struct SeededKeys {
    /// Citizen key.
    pub citizen_id: i64,
    /// Department key.
    pub department_id: i64,
    /// Service key.
    pub service_id: i64,
    /// Payment key.
    pub payment_id: i64,
    /// Service request key.
    pub request_id: i64,
    /// Grievance key.
    pub grievance_id: i64,
}

/// Seeds one row in every entity table and returns the assigned keys.
pub fn seed_baseline(store: &CivicStore) -> SeededKeys {
    let citizen = store
        .create_citizen(&CitizenPayload {
            Name: "Asha Rao".to_string(),
            Address: Some("12 Lake Road".to_string()),
            Phone: Some("9000000001".to_string()),
            Email: Some("asha@example.org".to_string()),
            Aadhaar_Number: Some("1111-2222-3333".to_string()),
        })
        .unwrap();
    let department = store
        .create_department(&DepartmentPayload {
            Department_Name: "Sanitation".to_string(),
            Contact_Info: Some("sanitation@city.gov".to_string()),
        })
        .unwrap();
    let service = store
        .create_service(&ServicePayload {
            Service_Name: "Waste Pickup".to_string(),
            Service_Type: Some("Municipal".to_string()),
            Department_ID: department.Department_ID,
        })
        .unwrap();
    let payment = store
        .create_payment(&PaymentPayload {
            Amount: 150.0,
            Payment_Date: "2024-01-10".to_string(),
            Payment_Method: "Card".to_string(),
            Status: "Completed".to_string(),
        })
        .unwrap();
    let request = store
        .create_service_request(&ServiceRequestPayload {
            Citizen_ID: citizen.Citizen_ID,
            Service_ID: service.Service_ID,
            Request_Date: "2024-01-15".to_string(),
            Status: "Pending".to_string(),
            Payment_ID: Some(payment.Payment_ID),
        })
        .unwrap();
    let grievance = store
        .create_grievance(&GrievancePayload {
            Citizen_ID: citizen.Citizen_ID,
            Department_ID: department.Department_ID,
            Description: "Missed pickup on Lake Road".to_string(),
            Status: "Submitted".to_string(),
            Date: "2024-01-16".to_string(),
        })
        .unwrap();
    SeededKeys {
        citizen_id: citizen.Citizen_ID,
        department_id: department.Department_ID,
        service_id: service.Service_ID,
        payment_id: payment.Payment_ID,
        request_id: request.Request_ID,
        grievance_id: grievance.Grievance_ID,
    }
}
