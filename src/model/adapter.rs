// File: src/model/adapter.rs
use crate::error::ConvertError;
use crate::model::event::{ItineraryCalendar, ItineraryEvent};
use chrono::NaiveDate;
use icalendar::{Component, Event, Property};

fn date_property(key: &str, date: NaiveDate) -> Property {
    let mut prop = Property::new(key, date.format("%Y%m%d").to_string().as_str());
    prop.add_parameter("VALUE", "DATE");
    prop
}

// Summaries must stay on one line; raw control characters are never valid TEXT.
fn check_summary(summary: &str) -> Result<(), ConvertError> {
    if let Some(c) = summary.chars().find(|c| c.is_control()) {
        return Err(ConvertError::Serialization(format!(
            "SUMMARY contains control character {:?}: '{}'",
            c, summary
        )));
    }
    Ok(())
}

// CRLF and lone CR become LF, which the writer escapes as `\n`. Other control
// characters apart from tab are dropped.
fn description_text(description: &str) -> String {
    description
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .collect()
}

impl ItineraryEvent {
    pub fn to_vevent(&self) -> Event {
        let mut event = Event::new();
        event.uid(&self.uid);
        event.summary(&self.summary);
        event.description(&description_text(&self.description));
        event.timestamp(self.stamp);
        event.append_property(date_property("DTSTART", self.start));
        event.append_property(date_property("DTEND", self.end));
        event.done()
    }

    /// The `BEGIN:VEVENT` .. `END:VEVENT` block, CRLF-terminated.
    pub fn to_ics_block(&self) -> Result<String, ConvertError> {
        check_summary(&self.summary)?;

        let rendered = self.to_vevent().to_string();
        let start = rendered.find("BEGIN:VEVENT");
        let end = rendered.rfind("END:VEVENT");
        match (start, end) {
            (Some(start), Some(end_idx)) if start < end_idx => {
                // "END:VEVENT" is 10 chars long
                let mut block = rendered[start..end_idx + 10].to_string();
                block.push_str("\r\n");
                Ok(block)
            }
            _ => Err(ConvertError::Serialization(format!(
                "VEVENT for '{}' rendered without BEGIN/END lines",
                self.summary
            ))),
        }
    }
}

impl ItineraryCalendar {
    /// Render the whole document. The header is written here rather than by
    /// `icalendar::Calendar` so that PRODID is ours and appears exactly once.
    pub fn to_ics(&self) -> Result<String, ConvertError> {
        let mut output = String::with_capacity(128 + self.events.len() * 256);
        output.push_str("BEGIN:VCALENDAR\r\n");
        output.push_str(&format!("VERSION:{}\r\n", self.version));
        output.push_str(&format!("PRODID:{}\r\n", self.prod_id));
        output.push_str("CALSCALE:GREGORIAN\r\n");

        for event in &self.events {
            output.push_str(&event.to_ics_block()?);
        }

        output.push_str("END:VCALENDAR\r\n");
        Ok(output)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ConvertError> {
        Ok(self.to_ics()?.into_bytes())
    }
}
