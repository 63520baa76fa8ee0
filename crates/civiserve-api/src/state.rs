// crates/civiserve-api/src/state.rs
// ============================================================================
// Module: Shared Application State
// Description: Gateway, store, and registry handles shared across handlers.
// Purpose: One cloneable state value for the whole router.
// Dependencies: civiserve-core, civiserve-store-sqlite
// ============================================================================

//! ## Overview
//! Handlers talk to the gateway trait object for gateway operations and to
//! the concrete store for typed CRUD. Both point at the same underlying
//! store; the registry handle lets the routine endpoints resolve declared
//! parameter names without touching the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use civiserve_core::RelationalGateway;
use civiserve_core::RoutineRegistry;
use civiserve_store_sqlite::CivicStore;

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Gateway seam for ad-hoc, routine, report, and allocation operations.
    pub gateway: Arc<dyn RelationalGateway + Send + Sync>,
    /// Concrete store for typed entity CRUD.
    pub store: Arc<CivicStore>,
    /// Routine registry for parameter-name resolution.
    pub routines: Arc<RoutineRegistry>,
}

impl AppState {
    /// Builds state around one shared store.
    #[must_use]
    pub fn new(store: Arc<CivicStore>) -> Self {
        let gateway: Arc<dyn RelationalGateway + Send + Sync> = Arc::clone(&store) as _;
        Self {
            gateway,
            store,
            routines: Arc::new(RoutineRegistry::builtin()),
        }
    }
}
