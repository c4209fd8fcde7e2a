// File: ./src/model/mod.rs
pub mod adapter;
pub mod event;
pub mod reader;
pub mod segment;

pub use event::{ICS_FILE_NAME, ICS_MIME_TYPE, ItineraryCalendar, ItineraryEvent, PRODID};
pub use reader::{ParsedCalendar, ParsedEvent, read_calendar};
pub use segment::{DaySegment, segment_days};
