// crates/civiserve-store-sqlite/src/lib.rs
// ============================================================================
// Module: Civiserve SQLite Store
// Description: SQLite-backed relational gateway and entity store.
// Purpose: Implement the gateway trait and the typed entity CRUD surface on
//          top of a WAL-mode SQLite database.
// Dependencies: civiserve-core, rusqlite, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! `civiserve-store-sqlite` is the only crate that talks to the relational
//! engine. [`CivicStore`] owns one writer connection behind a mutex plus a
//! round-robin pool of read connections, bootstraps the schema and the three
//! registered views idempotently, and implements
//! [`civiserve_core::RelationalGateway`] for the HTTP surface. Typed entity
//! CRUD and the sequence allocator live here too, sharing the same
//! connections.

pub mod allocator;
pub mod crud;
pub mod executor;
pub mod gateway;
pub mod reports;
pub mod routines;
pub mod store;

pub use store::CivicStore;
pub use store::CivicStoreConfig;
pub use store::CivicStoreError;
pub use store::JournalMode;
pub use store::SyncMode;
