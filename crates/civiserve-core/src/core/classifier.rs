// crates/civiserve-core/src/core/classifier.rs
// ============================================================================
// Module: Statement Classifier
// Description: Lexical read/write classification for ad-hoc SQL.
// Purpose: Gate administrator-supplied SQL before anything touches the engine.
// Dependencies: crate::core::error
// ============================================================================

//! ## Overview
//! The classifier decides, without parsing SQL grammar, whether a raw
//! statement produces rows or mutates, and rejects anything that smuggles a
//! second statement behind an embedded terminator. Classification is purely
//! lexical: a statement is row-producing exactly when it begins
//! (case-insensitively, after trimming) with `SELECT`.
//!
//! Trust boundary: the caller is a trusted operator console, not a public
//! endpoint. This gate prevents stacked statements in one submission; it is
//! not a defense against adversarial SQL and must not be advertised as one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::error::GatewayError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Row-producing versus mutating intent of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Statement returns a result set.
    RowProducing,
    /// Statement returns only an affected-row count.
    Mutating,
}

/// A statement that passed the lexical gate.
///
/// # Invariants
/// - `sql` is trimmed and carries no statement terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedStatement {
    /// Classified intent.
    pub kind: StatementKind,
    /// Sanitized statement text.
    pub sql: String,
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Classifies a raw SQL string and strips its optional trailing terminator.
///
/// A single trailing `;` is permitted; a terminator anywhere before the final
/// character of the trimmed input rejects the whole submission.
///
/// # Errors
///
/// Returns [`GatewayError::RejectedStatement`] for empty input or input
/// containing an embedded statement terminator.
pub fn classify(raw: &str) -> Result<ClassifiedStatement, GatewayError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::RejectedStatement("empty statement".to_string()));
    }
    let body = trimmed.strip_suffix(';').unwrap_or(trimmed);
    if body.contains(';') {
        return Err(GatewayError::RejectedStatement(
            "multiple statements not allowed; execute one query at a time".to_string(),
        ));
    }
    let sql = body.trim_end();
    if sql.is_empty() {
        return Err(GatewayError::RejectedStatement("empty statement".to_string()));
    }
    let kind = if sql.get(.. 6).is_some_and(|prefix| prefix.eq_ignore_ascii_case("select")) {
        StatementKind::RowProducing
    } else {
        StatementKind::Mutating
    };
    Ok(ClassifiedStatement {
        kind,
        sql: sql.to_string(),
    })
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
    fn select_classifies_as_row_producing() {
        let classified = classify("SELECT * FROM Citizen LIMIT 1;").unwrap();
        assert_eq!(classified.kind, StatementKind::RowProducing);
        assert_eq!(classified.sql, "SELECT * FROM Citizen LIMIT 1");
    }

    #[test]
    fn lowercase_select_with_leading_whitespace_is_row_producing() {
        let classified = classify("   select 1 ").unwrap();
        assert_eq!(classified.kind, StatementKind::RowProducing);
        assert_eq!(classified.sql, "select 1");
    }

    #[test]
    fn update_classifies_as_mutating() {
        let classified = classify("UPDATE Citizen SET Name = 'x' WHERE Citizen_ID = 1").unwrap();
        assert_eq!(classified.kind, StatementKind::Mutating);
    }

    #[test]
    fn embedded_terminator_is_rejected() {
        let err = classify("DELETE FROM Citizen; DROP TABLE Citizen;").unwrap_err();
        assert!(matches!(err, GatewayError::RejectedStatement(_)));
    }

    #[test]
    fn trailing_terminator_after_whitespace_is_tolerated() {
        let classified = classify("SELECT 1; ").unwrap();
        assert_eq!(classified.sql, "SELECT 1");
    }

    #[test]
    fn truly_embedded_terminator_is_rejected() {
        let err = classify("SELECT 1;SELECT 2").unwrap_err();
        assert!(matches!(err, GatewayError::RejectedStatement(_)));
    }

    #[test]
    fn empty_and_bare_terminator_inputs_are_rejected() {
        assert!(matches!(classify(""), Err(GatewayError::RejectedStatement(_))));
        assert!(matches!(classify("   "), Err(GatewayError::RejectedStatement(_))));
        assert!(matches!(classify(";"), Err(GatewayError::RejectedStatement(_))));
    }

    #[test]
    fn select_prefix_is_matched_without_a_word_boundary() {
        // The heuristic is a pure prefix check, boundary or not.
        let classified = classify("SELECTX").unwrap();
        assert_eq!(classified.kind, StatementKind::RowProducing);
    }
}
