// crates/civiserve-api/src/config.rs
// ============================================================================
// Module: API Configuration
// Description: TOML-backed configuration for the HTTP surface.
// Purpose: Bind address, log filter, and store tuning from one file.
// Dependencies: civiserve-store-sqlite, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration loads from a TOML file; every field except the store path
//! has a serde default, and a fully-defaulted configuration is available for
//! running without a file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use civiserve_store_sqlite::CivicStoreConfig;
use civiserve_store_sqlite::JournalMode;
use civiserve_store_sqlite::SyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiConfigError {
    /// Configuration file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Configuration text could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// HTTP surface configuration.
///
/// # Invariants
/// - `bind_addr` is a `host:port` socket address string.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Socket address the server binds.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Tracing filter directive (e.g. `info` or `civiserve_api=debug`).
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Store tuning and database path.
    #[serde(default = "default_store")]
    pub store: CivicStoreConfig,
}

/// Returns the default bind address.
fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

/// Returns the default tracing filter.
fn default_log_filter() -> String {
    "info".to_string()
}

/// Returns the default store configuration.
fn default_store() -> CivicStoreConfig {
    CivicStoreConfig {
        path: PathBuf::from("civiserve.db"),
        busy_timeout_ms: 5_000,
        journal_mode: JournalMode::Wal,
        sync_mode: SyncMode::Full,
        read_pool_size: 4,
        max_allocation_attempts: 5,
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            log_filter: default_log_filter(),
            store: default_store(),
        }
    }
}

impl ApiConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiConfigError::Parse`] when the text is not valid TOML or
    /// does not match the schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ApiConfigError> {
        toml::from_str(text).map_err(|err| ApiConfigError::Parse(err.to_string()))
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ApiConfigError::Io`] when the file cannot be read and
    /// [`ApiConfigError::Parse`] when its contents do not parse.
    pub fn load(path: &Path) -> Result<Self, ApiConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|err| ApiConfigError::Io(err.to_string()))?;
        Self::from_toml_str(&text)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions."
)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_fills_every_default() {
        let config = ApiConfig::from_toml_str("").unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.store.read_pool_size, 4);
    }

    #[test]
    fn store_section_overrides_apply() {
        let config = ApiConfig::from_toml_str(
            "bind_addr = \"0.0.0.0:9000\"\n\n\
             [store]\n\
             path = \"/tmp/civic.db\"\n\
             read_pool_size = 2\n\
             sync_mode = \"normal\"\n",
        )
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.store.read_pool_size, 2);
        assert_eq!(config.store.sync_mode, SyncMode::Normal);
        assert_eq!(config.store.max_allocation_attempts, 5);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ApiConfig::from_toml_str("bind_addr = [").unwrap_err();
        assert!(matches!(err, ApiConfigError::Parse(_)));
    }
}
