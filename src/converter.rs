// File: ./src/converter.rs
//! Itinerary text in, `.ics` bytes out.
//!
//! The converter is a pure function of its inputs plus the injected clock:
//! no I/O, no logging, no shared mutable state.

use crate::clock::{SharedClock, SystemClock};
use crate::error::ConvertError;
use crate::model::{DaySegment, ItineraryCalendar, ItineraryEvent, segment_days};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::sync::Arc;

pub const DEFAULT_DAY_SUMMARY: &str = "Day {day} itinerary";
pub const DEFAULT_FALLBACK_SUMMARY: &str = "Travel itinerary";

/// How event titles are worded. `{day}` in the day template is replaced by
/// the day number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryStyle {
    pub day_template: String,
    pub fallback: String,
}

impl Default for SummaryStyle {
    fn default() -> Self {
        Self {
            day_template: DEFAULT_DAY_SUMMARY.to_string(),
            fallback: DEFAULT_FALLBACK_SUMMARY.to_string(),
        }
    }
}

impl SummaryStyle {
    pub fn day_summary(&self, day: u64) -> String {
        self.day_template.replace("{day}", &day.to_string())
    }
}

/// Date of a day block: day 1 is `start`, day 0 the day before.
pub fn day_date(start: NaiveDate, segment: &DaySegment<'_>) -> Result<NaiveDate, ConvertError> {
    let overflow = || ConvertError::DateRangeOverflow {
        day: segment.digits.to_string(),
    };
    let day = segment.day_number().ok_or_else(overflow)?;
    let date = if day == 0 {
        start.checked_sub_days(Days::new(1))
    } else {
        start.checked_add_days(Days::new(day - 1))
    };
    date.ok_or_else(overflow)
}

#[derive(Debug, Clone)]
pub struct Converter {
    clock: SharedClock,
    summaries: SummaryStyle,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Converter {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            summaries: SummaryStyle::default(),
        }
    }

    pub fn with_summaries(mut self, summaries: SummaryStyle) -> Self {
        self.summaries = summaries;
        self
    }

    /// Build the in-memory document without serializing it.
    pub fn build_calendar(
        &self,
        plan_text: &str,
        start_date: Option<NaiveDate>,
    ) -> Result<ItineraryCalendar, ConvertError> {
        let start = start_date.unwrap_or_else(|| self.clock.today());
        let stamp = self.clock.now();
        let mut calendar = ItineraryCalendar::new();

        let segments = segment_days(plan_text);
        if segments.is_empty() {
            calendar.push(ItineraryEvent::all_day(
                0,
                self.summaries.fallback.clone(),
                plan_text.to_string(),
                start,
                stamp,
            ));
            return Ok(calendar);
        }

        for (position, segment) in segments.iter().enumerate() {
            calendar.push(self.day_event(position, segment, start, stamp)?);
        }
        Ok(calendar)
    }

    fn day_event(
        &self,
        position: usize,
        segment: &DaySegment<'_>,
        start: NaiveDate,
        stamp: DateTime<Utc>,
    ) -> Result<ItineraryEvent, ConvertError> {
        let date = day_date(start, segment)?;
        // day_date already proved the number parses.
        let day = segment.day_number().unwrap_or_default();
        Ok(ItineraryEvent::all_day(
            position,
            self.summaries.day_summary(day),
            segment.description().to_string(),
            date,
            stamp,
        ))
    }

    pub fn convert(
        &self,
        plan_text: &str,
        start_date: Option<NaiveDate>,
    ) -> Result<Vec<u8>, ConvertError> {
        self.build_calendar(plan_text, start_date)?.to_bytes()
    }
}

/// Convert with the system clock and default wording.
pub fn convert(plan_text: &str, start_date: Option<NaiveDate>) -> Result<Vec<u8>, ConvertError> {
    Converter::default().convert(plan_text, start_date)
}
