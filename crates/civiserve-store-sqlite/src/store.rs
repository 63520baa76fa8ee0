// crates/civiserve-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Civic Store
// Description: Connection management, schema bootstrap, and row shaping.
// Purpose: Own the writer/reader connections every gateway operation runs on.
// Dependencies: civiserve-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`CivicStore`] opens one writer connection guarded by a mutex plus a small
//! round-robin pool of read connections, all in WAL mode with foreign keys
//! enforced. Startup bootstraps the six entity tables and the three
//! registered views idempotently, so opening an existing database is a no-op.
//! Engine scalars are shaped into JSON here so every read path canonicalizes
//! values the same way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use civiserve_core::GatewayError;
use civiserve_core::ReportRegistry;
use civiserve_core::RoutineRegistry;
use civiserve_core::RowMap;
use civiserve_core::canonicalize_temporal_text;
use civiserve_core::lossy_text;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Entity tables created at startup when absent.
const BOOTSTRAP_TABLES: [&str; 6] = [
    "CREATE TABLE IF NOT EXISTS Citizen (
         Citizen_ID INTEGER PRIMARY KEY,
         Name TEXT NOT NULL,
         Address TEXT,
         Phone TEXT,
         Email TEXT UNIQUE,
         Aadhaar_Number TEXT UNIQUE
     )",
    "CREATE TABLE IF NOT EXISTS Department (
         Department_ID INTEGER PRIMARY KEY,
         Department_Name TEXT NOT NULL,
         Contact_Info TEXT
     )",
    "CREATE TABLE IF NOT EXISTS Service (
         Service_ID INTEGER PRIMARY KEY,
         Service_Name TEXT NOT NULL,
         Service_Type TEXT,
         Department_ID INTEGER NOT NULL REFERENCES Department(Department_ID)
     )",
    "CREATE TABLE IF NOT EXISTS Payment (
         Payment_ID INTEGER PRIMARY KEY,
         Amount REAL NOT NULL,
         Payment_Date TEXT NOT NULL,
         Payment_Method TEXT NOT NULL,
         Status TEXT NOT NULL
     )",
    "CREATE TABLE IF NOT EXISTS Service_Request (
         Request_ID INTEGER PRIMARY KEY,
         Citizen_ID INTEGER NOT NULL REFERENCES Citizen(Citizen_ID),
         Service_ID INTEGER NOT NULL REFERENCES Service(Service_ID),
         Request_Date TEXT NOT NULL,
         Status TEXT NOT NULL,
         Payment_ID INTEGER REFERENCES Payment(Payment_ID)
     )",
    "CREATE TABLE IF NOT EXISTS Grievance (
         Grievance_ID INTEGER PRIMARY KEY,
         Citizen_ID INTEGER NOT NULL REFERENCES Citizen(Citizen_ID),
         Department_ID INTEGER NOT NULL REFERENCES Department(Department_ID),
         Description TEXT NOT NULL,
         Status TEXT NOT NULL,
         Date TEXT NOT NULL
     )",
];

/// Registered views created at startup when absent.
const BOOTSTRAP_VIEWS: [&str; 3] = [
    "CREATE VIEW IF NOT EXISTS view_total_paid_per_citizen AS
     SELECT c.Citizen_ID, c.Name, COALESCE(SUM(p.Amount), 0) AS Total_Paid
     FROM Citizen c
     LEFT JOIN Service_Request sr ON sr.Citizen_ID = c.Citizen_ID
     LEFT JOIN Payment p ON p.Payment_ID = sr.Payment_ID
     GROUP BY c.Citizen_ID, c.Name",
    "CREATE VIEW IF NOT EXISTS view_request_counts_per_service AS
     SELECT s.Service_ID, s.Service_Name, COUNT(sr.Request_ID) AS Request_Count
     FROM Service s
     LEFT JOIN Service_Request sr ON sr.Service_ID = s.Service_ID
     GROUP BY s.Service_ID, s.Service_Name",
    "CREATE VIEW IF NOT EXISTS view_open_grievances_per_department AS
     SELECT d.Department_ID, d.Department_Name,
            COUNT(g.Grievance_ID) AS Open_Grievances
     FROM Department d
     LEFT JOIN Grievance g ON g.Department_ID = d.Department_ID
          AND g.Status IN ('Submitted', 'Under Review')
     GROUP BY d.Department_ID, d.Department_Name",
];

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl JournalMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the civic store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `read_pool_size` and `max_allocation_attempts` are greater than zero.
#[derive(Debug, Clone, Deserialize)]
pub struct CivicStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: JournalMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SyncMode,
    /// Number of read-only connections used for read path isolation.
    #[serde(default = "default_read_pool_size")]
    pub read_pool_size: usize,
    /// Upper bound on per-insert key allocation retries.
    #[serde(default = "default_max_allocation_attempts")]
    pub max_allocation_attempts: u32,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default read connection pool size.
const fn default_read_pool_size() -> usize {
    4
}

/// Returns the default allocation retry bound.
const fn default_max_allocation_attempts() -> u32 {
    5
}

/// Validates runtime limits in the store configuration.
fn validate_runtime_limits(config: &CivicStoreConfig) -> Result<(), CivicStoreError> {
    if config.read_pool_size == 0 {
        return Err(CivicStoreError::Invalid(
            "read_pool_size must be greater than zero".to_string(),
        ));
    }
    if config.max_allocation_attempts == 0 {
        return Err(CivicStoreError::Invalid(
            "max_allocation_attempts must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Validates that the configured store path can hold a database file.
fn validate_store_path(path: &Path) -> Result<(), CivicStoreError> {
    if path.as_os_str().is_empty() {
        return Err(CivicStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.is_dir() {
        return Err(CivicStoreError::Invalid(format!(
            "store path is a directory: {}",
            path.display()
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Civic store errors.
///
/// # Invariants
/// - Error messages never embed the database path or connection state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CivicStoreError {
    /// Store I/O error.
    #[error("civic store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("civic store db error: {0}")]
    Db(String),
    /// Invalid configuration or data.
    #[error("civic store invalid data: {0}")]
    Invalid(String),
}

impl From<CivicStoreError> for GatewayError {
    fn from(error: CivicStoreError) -> Self {
        match error {
            CivicStoreError::Io(message) => Self::Io(message),
            CivicStoreError::Db(message) => Self::Db(message),
            CivicStoreError::Invalid(message) => Self::Db(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed civic store.
///
/// # Invariants
/// - All mutations run on the single writer connection.
/// - Allocation marks are locked before the writer connection, never after.
pub struct CivicStore {
    /// Store configuration.
    config: CivicStoreConfig,
    /// Shared writer connection guarded by a mutex.
    write_connection: Mutex<Connection>,
    /// Read-only connection pool used for read path isolation under WAL.
    read_connections: Vec<Mutex<Connection>>,
    /// Round-robin cursor for read connection selection.
    read_cursor: AtomicUsize,
    /// Per-table high-water marks for the sequence allocator.
    pub(crate) allocation_marks: [Mutex<i64>; 6],
    /// Registered routines the bridge may invoke.
    pub(crate) routines: RoutineRegistry,
    /// Registered reports the dashboard may run.
    pub(crate) reports: ReportRegistry,
}

impl CivicStore {
    /// Opens the store, bootstrapping schema and views when absent.
    ///
    /// # Errors
    ///
    /// Returns [`CivicStoreError`] when the configuration is invalid or the
    /// database cannot be opened or initialized.
    pub fn open(config: CivicStoreConfig) -> Result<Self, CivicStoreError> {
        validate_store_path(&config.path)?;
        validate_runtime_limits(&config)?;
        let write_connection = open_connection(&config, false)?;
        initialize_schema(&write_connection)?;
        let mut read_connections = Vec::with_capacity(config.read_pool_size);
        for _ in 0 .. config.read_pool_size {
            read_connections.push(Mutex::new(open_connection(&config, true)?));
        }
        Ok(Self {
            config,
            write_connection: Mutex::new(write_connection),
            read_connections,
            read_cursor: AtomicUsize::new(0),
            allocation_marks: [
                Mutex::new(0),
                Mutex::new(0),
                Mutex::new(0),
                Mutex::new(0),
                Mutex::new(0),
                Mutex::new(0),
            ],
            routines: RoutineRegistry::builtin(),
            reports: ReportRegistry::builtin(),
        })
    }

    /// Returns the configured allocation retry bound.
    #[must_use]
    pub(crate) const fn max_allocation_attempts(&self) -> u32 {
        self.config.max_allocation_attempts
    }

    /// Locks and returns the writer connection.
    ///
    /// # Errors
    ///
    /// Returns [`CivicStoreError::Io`] when the writer mutex is poisoned.
    pub(crate) fn writer(&self) -> Result<MutexGuard<'_, Connection>, CivicStoreError> {
        self.write_connection
            .lock()
            .map_err(|_| CivicStoreError::Io("write mutex poisoned".to_string()))
    }

    /// Locks and returns the next read connection using round-robin selection.
    ///
    /// # Errors
    ///
    /// Returns [`CivicStoreError::Io`] when the selected mutex is poisoned.
    pub(crate) fn reader(&self) -> Result<MutexGuard<'_, Connection>, CivicStoreError> {
        let index = self.read_cursor.fetch_add(1, Ordering::Relaxed) % self.read_connections.len();
        self.read_connections[index]
            .lock()
            .map_err(|_| CivicStoreError::Io("read mutex poisoned".to_string()))
    }

    /// Verifies the store can execute a trivial statement.
    ///
    /// # Errors
    ///
    /// Returns [`CivicStoreError`] when the probe query fails.
    pub fn check_connection(&self) -> Result<(), CivicStoreError> {
        let guard = self.reader()?;
        guard
            .execute_batch("SELECT 1")
            .map_err(|err| CivicStoreError::Db(self.sanitize(&err)))
    }

    /// Renders an engine error for the wire without leaking the store path.
    #[must_use]
    pub(crate) fn sanitize(&self, err: &rusqlite::Error) -> String {
        let message = err.to_string();
        let path = self.config.path.display().to_string();
        if path.is_empty() {
            message
        } else {
            message.replace(&path, "<database>")
        }
    }
}

// ============================================================================
// SECTION: Connection Setup
// ============================================================================

/// Opens one configured connection against the store path.
fn open_connection(
    config: &CivicStoreConfig,
    read_only: bool,
) -> Result<Connection, CivicStoreError> {
    let flags = if read_only {
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
    } else {
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
    };
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| CivicStoreError::Io(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| CivicStoreError::Db(err.to_string()))?;
    if !read_only {
        // Journal and sync modes are writer-side; the journal mode persists
        // in the database file for readers.
        connection
            .pragma_update(None, "journal_mode", config.journal_mode.pragma_value())
            .map_err(|err| CivicStoreError::Db(err.to_string()))?;
        connection
            .pragma_update(None, "synchronous", config.sync_mode.pragma_value())
            .map_err(|err| CivicStoreError::Db(err.to_string()))?;
    }
    connection
        .pragma_update(None, "foreign_keys", "on")
        .map_err(|err| CivicStoreError::Db(err.to_string()))?;
    Ok(connection)
}

/// Creates the entity tables and registered views when absent.
fn initialize_schema(connection: &Connection) -> Result<(), CivicStoreError> {
    for statement in BOOTSTRAP_TABLES.iter().chain(BOOTSTRAP_VIEWS.iter()) {
        connection
            .execute_batch(statement)
            .map_err(|err| CivicStoreError::Db(err.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Row Shaping
// ============================================================================

/// Converts one engine scalar into its JSON wire value.
///
/// Text is canonicalized to ISO-8601 when temporal; binary payloads decode
/// lossily. Shaping never fails a row.
#[must_use]
pub(crate) fn json_scalar(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(v) => serde_json::Value::from(v),
        ValueRef::Real(v) => {
            serde_json::Number::from_f64(v).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        ValueRef::Text(bytes) => {
            let text = lossy_text(bytes);
            match canonicalize_temporal_text(&text) {
                Some(canonical) => serde_json::Value::String(canonical),
                None => serde_json::Value::String(text),
            }
        }
        ValueRef::Blob(bytes) => serde_json::Value::String(lossy_text(bytes)),
    }
}

/// Runs a prepared statement and materializes every row keyed by column name.
pub(crate) fn collect_rows(
    statement: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
) -> Result<(Vec<String>, Vec<RowMap>), rusqlite::Error> {
    let columns: Vec<String> =
        statement.column_names().iter().map(ToString::to_string).collect();
    let mut rows = statement.query(params)?;
    let mut data = Vec::new();
    while let Some(row) = rows.next()? {
        let mut map = RowMap::new();
        for (index, name) in columns.iter().enumerate() {
            map.insert(name.clone(), json_scalar(row.get_ref(index)?));
        }
        data.push(map);
    }
    Ok((columns, data))
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

    fn temp_config(dir: &tempfile::TempDir) -> CivicStoreConfig {
        CivicStoreConfig {
            path: dir.path().join("civic.db"),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: JournalMode::Wal,
            sync_mode: SyncMode::Normal,
            read_pool_size: 2,
            max_allocation_attempts: 5,
        }
    }

    #[test]
    fn open_bootstraps_schema_idempotently() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);
        let store = CivicStore::open(config.clone()).unwrap();
        store.check_connection().unwrap();
        drop(store);
        // Second open against the same file must not fail or re-create.
        let store = CivicStore::open(config).unwrap();
        store.check_connection().unwrap();
    }

    #[test]
    fn zero_read_pool_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = temp_config(&dir);
        config.read_pool_size = 0;
        assert!(matches!(CivicStore::open(config), Err(CivicStoreError::Invalid(_))));
    }

    #[test]
    fn directory_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = temp_config(&dir);
        config.path = dir.path().to_path_buf();
        assert!(matches!(CivicStore::open(config), Err(CivicStoreError::Invalid(_))));
    }

    #[test]
    fn temporal_text_scalars_are_canonicalized() {
        let value = json_scalar(ValueRef::Text(b"2024-03-01 08:15:00"));
        assert_eq!(value, serde_json::json!("2024-03-01T08:15:00"));
        let value = json_scalar(ValueRef::Text(b"Sanitation"));
        assert_eq!(value, serde_json::json!("Sanitation"));
    }
}
