// crates/civiserve-core/src/core/mod.rs
// ============================================================================
// Module: Core Domain Modules
// Description: Entity catalog, classification, canonicalization, wire models.
// Purpose: Group the I/O-free building blocks of the gateway.
// Dependencies: crate-local submodules
// ============================================================================

//! ## Overview
//! Submodule index for the core domain layer.

pub mod classifier;
pub mod entities;
pub mod error;
pub mod query;
pub mod registry;
pub mod values;
