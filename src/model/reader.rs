// File: ./src/model/reader.rs
//! Reads `.ics` documents back into plain event data.
//!
//! Used to verify round-trips and by `tripcal inspect`. DTSTART, DTEND and
//! DTSTAMP accept the all-day and date-time forms; date-times are reduced to
//! their date.

use crate::error::ReadError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use icalendar::{Calendar, CalendarComponent, Component, Event};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedEvent {
    pub uid: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub stamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedCalendar {
    pub prod_id: Option<String>,
    pub version: Option<String>,
    pub events: Vec<ParsedEvent>,
}

fn parse_date(property: &str, value: &str) -> Result<NaiveDate, ReadError> {
    let invalid = || ReadError::InvalidDate {
        property: property.to_string(),
        value: value.to_string(),
    };
    let date_part = value.get(..8).ok_or_else(invalid)?;
    NaiveDate::parse_from_str(date_part, "%Y%m%d").map_err(|_| invalid())
}

fn parse_stamp(value: &str) -> Result<DateTime<Utc>, ReadError> {
    let invalid = || ReadError::InvalidDate {
        property: "DTSTAMP".to_string(),
        value: value.to_string(),
    };
    let fmt = if value.ends_with('Z') {
        "%Y%m%dT%H%M%SZ"
    } else {
        "%Y%m%dT%H%M%S"
    };
    NaiveDateTime::parse_from_str(value, fmt)
        .map(|d| Utc.from_utc_datetime(&d))
        .map_err(|_| invalid())
}

impl ParsedEvent {
    pub fn is_single_day(&self) -> bool {
        self.start.is_some() && self.start == self.end
    }

    fn from_vevent(event: &Event) -> Result<Self, ReadError> {
        let props = event.properties();
        let date_of = |key: &str| {
            props
                .get(key)
                .map(|p| parse_date(key, p.value().trim()))
                .transpose()
        };

        Ok(Self {
            uid: event.get_uid().map(str::to_string),
            summary: event.get_summary().map(str::to_string),
            description: event.get_description().map(str::to_string),
            start: date_of("DTSTART")?,
            end: date_of("DTEND")?,
            stamp: props
                .get("DTSTAMP")
                .map(|p| parse_stamp(p.value().trim()))
                .transpose()?,
        })
    }
}

/// Read every VEVENT of the calendar in `ics`.
///
/// Parsing (line unfolding, TEXT unescaping, nested components) is done by
/// `icalendar`; this only maps the events and checks their dates.
pub fn read_calendar(ics: &str) -> Result<ParsedCalendar, ReadError> {
    if !ics.to_ascii_uppercase().contains("BEGIN:VCALENDAR") {
        return Err(ReadError::MissingCalendar);
    }
    let calendar: Calendar = ics.parse().map_err(|e| ReadError::Parse(format!("{}", e)))?;

    let header = |key: &str| {
        calendar
            .properties
            .iter()
            .find(|p| p.key().eq_ignore_ascii_case(key))
            .map(|p| p.value().to_string())
    };

    let mut events = Vec::new();
    for component in &calendar.components {
        if let CalendarComponent::Event(e) = component {
            events.push(ParsedEvent::from_vevent(e)?);
        }
    }

    Ok(ParsedCalendar {
        prod_id: header("PRODID"),
        version: header("VERSION"),
        events,
    })
}
