// File: ./src/model/event.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed product identifier written into every document.
pub const PRODID: &str = "-//Tripcal//Itinerary Planner//EN";
pub const ICAL_VERSION: &str = "2.0";

/// Suggested download name and MIME type for the produced bytes.
pub const ICS_FILE_NAME: &str = "travel_itinerary.ics";
pub const ICS_MIME_TYPE: &str = "text/calendar";

/// One all-day entry of the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryEvent {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub stamp: DateTime<Utc>,
}

impl ItineraryEvent {
    /// Build a single-day event. `position` is the event's index in the
    /// document and only feeds the UID, so identical inputs stamped at the
    /// same instant always get the same UIDs.
    pub fn all_day(
        position: usize,
        summary: String,
        description: String,
        date: NaiveDate,
        stamp: DateTime<Utc>,
    ) -> Self {
        let seed = format!(
            "{}|{}|{}|{}|{}",
            stamp.timestamp(),
            position,
            date,
            summary,
            description
        );
        let uid = Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()).to_string();

        Self {
            uid,
            summary,
            description,
            start: date,
            end: date,
            stamp,
        }
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}

/// An ordered list of events plus the document metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryCalendar {
    pub prod_id: String,
    pub version: String,
    pub events: Vec<ItineraryEvent>,
}

impl Default for ItineraryCalendar {
    fn default() -> Self {
        Self {
            prod_id: PRODID.to_string(),
            version: ICAL_VERSION.to_string(),
            events: Vec::new(),
        }
    }
}

impl ItineraryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ItineraryEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
