// crates/civiserve-core/src/core/entities.rs
// ============================================================================
// Module: Entity Catalog
// Description: The six relational entities and the static table registry.
// Purpose: Provide wire-compatible entity structs and the allocator's
//          closed table catalog.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Entity structs keep the exact wire field names of the relational schema
//! (`Citizen_ID`, `Department_Name`, ...), so CRUD responses serialize
//! byte-compatibly with the administrative console. Each entity has a
//! `...Payload` companion carrying every column except the primary key; the
//! key is assigned by the sequence allocator, never by the caller.
//!
//! [`EntityTable`] is the closed registry of manually-numbered tables. It is
//! the only set of tables the allocator will serve.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Table Registry
// ============================================================================

/// Static registry of entity tables with application-assigned primary keys.
///
/// # Invariants
/// - The set is closed; no runtime registration exists.
/// - Every variant maps to exactly one table and one integer key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTable {
    /// `Citizen` table.
    Citizen,
    /// `Department` table.
    Department,
    /// `Service` table.
    Service,
    /// `Payment` table.
    Payment,
    /// `Service_Request` table.
    ServiceRequest,
    /// `Grievance` table.
    Grievance,
}

impl EntityTable {
    /// Every table served by the sequence allocator.
    pub const ALL: [Self; 6] = [
        Self::Citizen,
        Self::Department,
        Self::Service,
        Self::Payment,
        Self::ServiceRequest,
        Self::Grievance,
    ];

    /// Returns the SQL table name.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Citizen => "Citizen",
            Self::Department => "Department",
            Self::Service => "Service",
            Self::Payment => "Payment",
            Self::ServiceRequest => "Service_Request",
            Self::Grievance => "Grievance",
        }
    }

    /// Returns the integer primary key column name.
    #[must_use]
    pub const fn primary_key(self) -> &'static str {
        match self {
            Self::Citizen => "Citizen_ID",
            Self::Department => "Department_ID",
            Self::Service => "Service_ID",
            Self::Payment => "Payment_ID",
            Self::ServiceRequest => "Request_ID",
            Self::Grievance => "Grievance_ID",
        }
    }
}

impl fmt::Display for EntityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

// ============================================================================
// SECTION: Status Vocabularies
// ============================================================================

/// Accepted statuses for a service request.
pub const SERVICE_REQUEST_STATUSES: [&str; 4] =
    ["Pending", "Processing", "Completed", "Rejected"];

/// Accepted statuses for a grievance.
pub const GRIEVANCE_STATUSES: [&str; 4] = ["Submitted", "Under Review", "Resolved", "Closed"];

// ============================================================================
// SECTION: Entities
// ============================================================================

/// A registered citizen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct Citizen {
    /// Primary key.
    pub Citizen_ID: i64,
    /// Full name.
    pub Name: String,
    /// Postal address.
    pub Address: Option<String>,
    /// Contact phone number.
    pub Phone: Option<String>,
    /// Contact email (unique).
    pub Email: Option<String>,
    /// National identity number (unique).
    pub Aadhaar_Number: Option<String>,
}

/// Create/update payload for a citizen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct CitizenPayload {
    /// Full name.
    pub Name: String,
    /// Postal address.
    #[serde(default)]
    pub Address: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub Phone: Option<String>,
    /// Contact email (unique).
    #[serde(default)]
    pub Email: Option<String>,
    /// National identity number (unique).
    #[serde(default)]
    pub Aadhaar_Number: Option<String>,
}

/// A government department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct Department {
    /// Primary key.
    pub Department_ID: i64,
    /// Department display name.
    pub Department_Name: String,
    /// Contact details.
    pub Contact_Info: Option<String>,
}

/// Create/update payload for a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct DepartmentPayload {
    /// Department display name.
    pub Department_Name: String,
    /// Contact details.
    #[serde(default)]
    pub Contact_Info: Option<String>,
}

/// A service offered by a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct Service {
    /// Primary key.
    pub Service_ID: i64,
    /// Service display name.
    pub Service_Name: String,
    /// Service category.
    pub Service_Type: Option<String>,
    /// Owning department.
    pub Department_ID: i64,
}

/// Create/update payload for a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct ServicePayload {
    /// Service display name.
    pub Service_Name: String,
    /// Service category.
    #[serde(default)]
    pub Service_Type: Option<String>,
    /// Owning department.
    pub Department_ID: i64,
}

/// A payment made against a service request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct Payment {
    /// Primary key.
    pub Payment_ID: i64,
    /// Amount paid.
    pub Amount: f64,
    /// Payment date (ISO-8601 calendar date).
    pub Payment_Date: String,
    /// Payment method label.
    pub Payment_Method: String,
    /// Payment status label.
    pub Status: String,
}

/// Create/update payload for a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct PaymentPayload {
    /// Amount paid.
    pub Amount: f64,
    /// Payment date (ISO-8601 calendar date).
    pub Payment_Date: String,
    /// Payment method label.
    pub Payment_Method: String,
    /// Payment status label.
    pub Status: String,
}

/// A citizen's request for a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct ServiceRequest {
    /// Primary key.
    pub Request_ID: i64,
    /// Requesting citizen.
    pub Citizen_ID: i64,
    /// Requested service.
    pub Service_ID: i64,
    /// Request date (ISO-8601 calendar date).
    pub Request_Date: String,
    /// Request status label.
    pub Status: String,
    /// Optional associated payment.
    pub Payment_ID: Option<i64>,
}

/// Create/update payload for a service request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct ServiceRequestPayload {
    /// Requesting citizen.
    pub Citizen_ID: i64,
    /// Requested service.
    pub Service_ID: i64,
    /// Request date (ISO-8601 calendar date).
    pub Request_Date: String,
    /// Request status label.
    pub Status: String,
    /// Optional associated payment.
    #[serde(default)]
    pub Payment_ID: Option<i64>,
}

/// A grievance filed against a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct Grievance {
    /// Primary key.
    pub Grievance_ID: i64,
    /// Filing citizen.
    pub Citizen_ID: i64,
    /// Accused department.
    pub Department_ID: i64,
    /// Grievance text.
    pub Description: String,
    /// Grievance status label.
    pub Status: String,
    /// Filing date (ISO-8601 calendar date).
    pub Date: String,
}

/// Create/update payload for a grievance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[expect(non_snake_case, reason = "Wire field names match the relational schema.")]
pub struct GrievancePayload {
    /// Filing citizen.
    pub Citizen_ID: i64,
    /// Accused department.
    pub Department_ID: i64,
    /// Grievance text.
    pub Description: String,
    /// Grievance status label.
    pub Status: String,
    /// Filing date (ISO-8601 calendar date).
    pub Date: String,
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
    fn table_names_and_keys_are_stable() {
        assert_eq!(EntityTable::Citizen.table_name(), "Citizen");
        assert_eq!(EntityTable::Citizen.primary_key(), "Citizen_ID");
        assert_eq!(EntityTable::ServiceRequest.table_name(), "Service_Request");
        assert_eq!(EntityTable::ServiceRequest.primary_key(), "Request_ID");
    }

    #[test]
    fn registry_covers_every_table_once() {
        let mut names: Vec<&str> = EntityTable::ALL.iter().map(|t| t.table_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EntityTable::ALL.len());
    }

    #[test]
    fn citizen_serializes_with_wire_field_names() {
        let citizen = Citizen {
            Citizen_ID: 7,
            Name: "Asha Rao".to_string(),
            Address: None,
            Phone: None,
            Email: Some("asha@example.org".to_string()),
            Aadhaar_Number: None,
        };
        let json = serde_json::to_string(&citizen).unwrap();
        assert!(json.contains("\"Citizen_ID\":7"));
        assert!(json.contains("\"Aadhaar_Number\":null"));
    }
}
