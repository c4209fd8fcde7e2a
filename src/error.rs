// File: ./src/error.rs
//! Domain errors for the conversion core and the document reader.
//!
//! Application glue (config, context, export, CLI) keeps using `anyhow`;
//! these types exist so callers can match on what actually went wrong.

use thiserror::Error;

/// Failure while turning itinerary text into calendar bytes.
///
/// Text without any day marker is not an error: it takes the fallback path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// `start_date + (day - 1)` left the representable date range.
    /// `day` is the digit run exactly as it appeared in the text.
    #[error("Day {day} falls outside the representable date range")]
    DateRangeOverflow { day: String },

    #[error("Cannot serialize calendar: {0}")]
    Serialization(String),
}

/// Failure while reading an `.ics` document back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("No VCALENDAR component found")]
    MissingCalendar,

    #[error("Cannot parse calendar: {0}")]
    Parse(String),

    #[error("Invalid {property} value '{value}'")]
    InvalidDate { property: String, value: String },
}
