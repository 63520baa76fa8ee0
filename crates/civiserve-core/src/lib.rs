// crates/civiserve-core/src/lib.rs
// ============================================================================
// Module: Civiserve Core
// Description: Domain types and gateway contracts for the citizen-services
//              backend.
// Purpose: Provide the I/O-free core shared by the store adapter and the
//          HTTP surface.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! `civiserve-core` holds everything the relational data access gateway needs
//! that does not touch a database: the entity catalog, the lexical statement
//! classifier, scalar canonicalization, the wire models for ad-hoc query
//! results, the immutable routine/report registries, the error taxonomy, and
//! the [`RelationalGateway`] trait seam the HTTP layer consumes.
//!
//! The registries are closed allow-lists built once at startup; nothing in
//! this crate accepts dynamic registration from request input.

pub mod core;
pub mod interfaces;

pub use core::classifier::ClassifiedStatement;
pub use core::classifier::StatementKind;
pub use core::classifier::classify;
pub use core::entities::Citizen;
pub use core::entities::CitizenPayload;
pub use core::entities::Department;
pub use core::entities::DepartmentPayload;
pub use core::entities::EntityTable;
pub use core::entities::GRIEVANCE_STATUSES;
pub use core::entities::Grievance;
pub use core::entities::GrievancePayload;
pub use core::entities::Payment;
pub use core::entities::PaymentPayload;
pub use core::entities::SERVICE_REQUEST_STATUSES;
pub use core::entities::Service;
pub use core::entities::ServicePayload;
pub use core::entities::ServiceRequest;
pub use core::entities::ServiceRequestPayload;
pub use core::error::GatewayError;
pub use core::query::DashboardStats;
pub use core::query::ProcedureResult;
pub use core::query::QueryOutcome;
pub use core::query::QueryRequest;
pub use core::query::SampleQuery;
pub use core::query::sample_queries;
pub use core::registry::ReportRegistry;
pub use core::registry::ReportSpec;
pub use core::registry::RoutineKind;
pub use core::registry::RoutineRegistry;
pub use core::registry::RoutineSpec;
pub use core::values::canonicalize_temporal_text;
pub use core::values::lossy_text;
pub use interfaces::RelationalGateway;
pub use interfaces::RoutineArg;
pub use interfaces::RowMap;
