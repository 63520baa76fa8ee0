// crates/civiserve-core/src/core/values.rs
// ============================================================================
// Module: Scalar Canonicalization
// Description: Defensive normalization of engine scalars for the wire.
// Purpose: Render temporal values as ISO-8601 text and decode binary values
//          without ever failing a row.
// Dependencies: time
// ============================================================================

//! ## Overview
//! Result sets coming back from the relational engine carry heterogeneous
//! scalar types. Before anything reaches JSON, temporal text is normalized to
//! ISO-8601 (`YYYY-MM-DD` and `YYYY-MM-DDTHH:MM:SS`) and binary payloads are
//! decoded as UTF-8 with replacement characters instead of failing the row.
//! Everything else passes through unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Formats
// ============================================================================

/// Calendar-date layout used by the relational engine.
const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Space-separated datetime layout used by the relational engine.
const DATETIME_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// ISO-8601 datetime layout for the wire.
const ISO_DATETIME_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

// ============================================================================
// SECTION: Canonicalization
// ============================================================================

/// Returns the ISO-8601 rendering of `text` when it is a temporal value.
///
/// Calendar dates are already canonical and come back unchanged; engine-style
/// `YYYY-MM-DD HH:MM:SS` datetimes are rewritten with a `T` separator.
/// Non-temporal text yields `None` and must pass through untouched.
#[must_use]
pub fn canonicalize_temporal_text(text: &str) -> Option<String> {
    if Date::parse(text, DATE_FORMAT).is_ok() {
        return Some(text.to_string());
    }
    let datetime = PrimitiveDateTime::parse(text, DATETIME_FORMAT).ok()?;
    datetime.format(ISO_DATETIME_FORMAT).ok()
}

/// Decodes binary data as UTF-8 text, replacing undecodable bytes.
#[must_use]
pub fn lossy_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
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
    fn calendar_date_round_trips_to_its_canonical_text() {
        assert_eq!(
            canonicalize_temporal_text("2024-01-15").as_deref(),
            Some("2024-01-15")
        );
    }

    #[test]
    fn engine_datetime_is_rewritten_with_t_separator() {
        assert_eq!(
            canonicalize_temporal_text("2024-01-15 09:30:00").as_deref(),
            Some("2024-01-15T09:30:00")
        );
    }

    #[test]
    fn non_temporal_text_is_left_alone() {
        assert_eq!(canonicalize_temporal_text("Asha Rao"), None);
        assert_eq!(canonicalize_temporal_text("2024-13-45"), None);
        assert_eq!(canonicalize_temporal_text(""), None);
    }

    #[test]
    fn binary_decoding_replaces_undecodable_bytes() {
        assert_eq!(lossy_text(b"plain"), "plain");
        assert_eq!(lossy_text(&[0xff, b'o', b'k']), "\u{fffd}ok");
    }
}
