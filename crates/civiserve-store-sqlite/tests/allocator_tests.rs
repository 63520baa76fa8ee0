// crates/civiserve-store-sqlite/tests/allocator_tests.rs
// ============================================================================
// Module: Allocator Integration Tests
// Description: Key uniqueness and monotonicity under concurrency and churn.
// Purpose: Verify allocator-driven inserts never duplicate or reuse keys.
// Dependencies: civiserve-core, civiserve-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! The allocator must hand out strictly increasing keys across concurrent
//! writers and must never reuse a key after the maximum row is deleted.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions."
)]

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use civiserve_core::CitizenPayload;
use civiserve_core::EntityTable;
use civiserve_core::GatewayError;

use common::open_temp_store;

/// Payload for throwaway citizens.
fn citizen(name: &str) -> CitizenPayload {
    CitizenPayload {
        Name: name.to_string(),
        Address: None,
        Phone: None,
        Email: None,
        Aadhaar_Number: None,
    }
}

#[test]
fn concurrent_creates_assign_unique_keys() {
    let (_dir, store) = open_temp_store();
    let store = Arc::new(store);
    let mut handles = Vec::new();
    for worker in 0 .. 10 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let mut keys = Vec::new();
            for round in 0 .. 5 {
                let payload = citizen(&format!("Worker {worker} Round {round}"));
                keys.push(store.create_citizen(&payload).unwrap().Citizen_ID);
            }
            keys
        }));
    }
    let mut all_keys = Vec::new();
    for handle in handles {
        all_keys.extend(handle.join().unwrap());
    }
    let unique: HashSet<i64> = all_keys.iter().copied().collect();
    assert_eq!(unique.len(), all_keys.len(), "duplicate keys were assigned");
    assert_eq!(all_keys.len(), 50);
}

#[test]
fn keys_stay_monotonic_after_deleting_the_maximum() {
    let (_dir, store) = open_temp_store();
    let first = store.create_citizen(&citizen("First")).unwrap().Citizen_ID;
    let second = store.create_citizen(&citizen("Second")).unwrap().Citizen_ID;
    assert!(second > first);
    store.delete_citizen(second).unwrap();
    // The mark remembers the deleted maximum; the key is never reused.
    let third = store.create_citizen(&citizen("Third")).unwrap().Citizen_ID;
    assert!(third > second);
}

#[test]
fn reservation_advances_without_inserting() {
    let (_dir, store) = open_temp_store();
    let reserved = store.next_key(EntityTable::Citizen).unwrap();
    let reserved_again = store.next_key(EntityTable::Citizen).unwrap();
    assert!(reserved_again > reserved);
    // A create after two reservations lands above both.
    let created = store.create_citizen(&citizen("After reservations")).unwrap().Citizen_ID;
    assert!(created > reserved_again);
}

#[test]
fn reservations_are_per_table() {
    let (_dir, store) = open_temp_store();
    let citizen_key = store.next_key(EntityTable::Citizen).unwrap();
    let department_key = store.next_key(EntityTable::Department).unwrap();
    // Fresh tables both start at one; sequences do not share state.
    assert_eq!(citizen_key, 1);
    assert_eq!(department_key, 1);
}

#[test]
fn reservations_see_committed_rows_through_the_read_pool() {
    let (_dir, store) = open_temp_store();
    let created = store.create_citizen(&citizen("First")).unwrap().Citizen_ID;
    let reserved = store.next_key(EntityTable::Citizen).unwrap();
    assert_eq!(reserved, created + 1);
}

#[test]
fn reservations_proceed_while_another_table_is_being_written() {
    let (_dir, store) = open_temp_store();
    let store = Arc::new(store);
    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for round in 0 .. 20 {
                store.create_citizen(&citizen(&format!("Writer {round}"))).unwrap();
            }
        })
    };
    // Department reservations never touch the writer connection, so they
    // advance strictly regardless of citizen insert traffic.
    let mut last = 0;
    for _ in 0 .. 20 {
        let key = store.next_key(EntityTable::Department).unwrap();
        assert!(key > last);
        last = key;
    }
    writer.join().unwrap();
}

#[test]
fn out_of_band_key_squatting_is_retried_past() {
    let (_dir, store) = open_temp_store();
    let first = store.create_citizen(&citizen("First")).unwrap().Citizen_ID;
    // An ad-hoc writer grabs the next key directly.
    let squatted = first + 1;
    let outcome = store
        .run_adhoc(&format!(
            "INSERT INTO Citizen (Citizen_ID, Name) VALUES ({squatted}, 'Squatter')"
        ))
        .unwrap();
    assert!(outcome.success);
    // The allocator re-reads the maximum inside its transaction, so the
    // next create simply lands above the squatted key.
    let next = store.create_citizen(&citizen("Next")).unwrap().Citizen_ID;
    assert!(next > squatted);
}

#[test]
fn naive_max_plus_one_collides_where_the_allocator_does_not() {
    let (_dir, store) = open_temp_store();
    store.create_citizen(&citizen("First")).unwrap();

    // Two writers compute max+1 from the same snapshot before either
    // inserts; the second insert with that key must collide.
    let snapshot = store
        .run_adhoc("SELECT COALESCE(MAX(Citizen_ID), 0) + 1 AS candidate FROM Citizen")
        .unwrap();
    let candidate = snapshot.data[0]["candidate"].as_i64().unwrap();
    let first = store
        .run_adhoc(&format!(
            "INSERT INTO Citizen (Citizen_ID, Name) VALUES ({candidate}, 'Racer A')"
        ))
        .unwrap();
    assert!(first.success);
    let second = store
        .run_adhoc(&format!(
            "INSERT INTO Citizen (Citizen_ID, Name) VALUES ({candidate}, 'Racer B')"
        ))
        .unwrap();
    assert!(!second.success, "stale candidate must collide");

    // The allocator recomputes inside its own transaction and lands clear.
    let allocated = store.create_citizen(&citizen("Racer C")).unwrap().Citizen_ID;
    assert!(allocated > candidate);
}

#[test]
fn allocation_failures_surface_as_typed_errors() {
    let (_dir, store) = open_temp_store();
    // Referencing a missing department trips the foreign key, which is not
    // a key conflict and must not be retried into exhaustion.
    let err = store
        .create_service(&civiserve_core::ServicePayload {
            Service_Name: "Orphan".to_string(),
            Service_Type: None,
            Department_ID: 999,
        })
        .unwrap_err();
    assert!(matches!(err, GatewayError::Db(_)), "got {err:?}");
}
