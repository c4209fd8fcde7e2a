// Round-trip chain (itinerary text → .ics → read back) and file export.
use chrono::{NaiveDate, TimeZone, Utc};
use icalendar::{Calendar, CalendarComponent, Component};
use std::fs;
use std::sync::Arc;
use tripcal::clock::FixedClock;
use tripcal::context::{AppContext, TestContext};
use tripcal::converter::Converter;
use tripcal::export;
use tripcal::model::{ICS_FILE_NAME, read_calendar};

const ROME: &str = "Here is your 3-day Rome plan!\n\
\n\
Day 1: Ancient Rome\n\
- Colosseum, Roman Forum; Palatine Hill\n\
- Dinner in Monti\n\
\n\
Day 2: Vatican\n\
- St. Peter's Basilica (arrive early: lines get long)\n\
- Sistine Chapel & Raphael Rooms\n\
\n\
Day 3: Trastevere and a very long walk along the Tiber river with plenty of stops for gelato, espresso and people-watching before the flight\n";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn converter() -> Converter {
    let instant = Utc.with_ymd_and_hms(2025, 3, 1, 7, 45, 0).unwrap();
    Converter::new(Arc::new(FixedClock::new(instant)))
}

// ==================== Round-trip ====================

#[test]
fn test_roundtrip_preserves_count_dates_descriptions() {
    let conv = converter();
    let built = conv.build_calendar(ROME, Some(date(2025, 4, 10))).unwrap();
    let ics = String::from_utf8(conv.convert(ROME, Some(date(2025, 4, 10))).unwrap()).unwrap();

    let parsed = read_calendar(&ics).unwrap();
    assert_eq!(parsed.prod_id.as_deref(), Some(tripcal::model::PRODID));
    assert_eq!(parsed.version.as_deref(), Some("2.0"));
    assert_eq!(parsed.events.len(), built.len());
    assert_eq!(parsed.events.len(), 3);

    for (read, original) in parsed.events.iter().zip(&built.events) {
        assert_eq!(read.uid.as_deref(), Some(original.uid.as_str()));
        assert_eq!(read.summary.as_deref(), Some(original.summary.as_str()));
        assert_eq!(read.description.as_deref(), Some(original.description.as_str()));
        assert_eq!(read.start, Some(original.start));
        assert_eq!(read.end, Some(original.end));
        assert_eq!(read.stamp, Some(original.stamp));
        assert!(read.is_single_day());
    }

    assert_eq!(
        parsed.events[0].description.as_deref(),
        Some("Ancient Rome\n- Colosseum, Roman Forum; Palatine Hill\n- Dinner in Monti")
    );
    assert_eq!(parsed.events[2].start, Some(date(2025, 4, 12)));
}

#[test]
fn test_roundtrip_fallback_event() {
    let text = "Wander, eat; repeat.\nNo plan needed.";
    let ics = String::from_utf8(converter().convert(text, Some(date(2025, 1, 1))).unwrap()).unwrap();
    let parsed = read_calendar(&ics).unwrap();
    assert_eq!(parsed.events.len(), 1);
    assert_eq!(parsed.events[0].description.as_deref(), Some(text));
    assert_eq!(parsed.events[0].start, Some(date(2025, 1, 1)));
    assert_eq!(parsed.events[0].end, Some(date(2025, 1, 1)));
}

#[test]
fn test_output_has_no_bare_line_feeds() {
    let ics = String::from_utf8(converter().convert(ROME, Some(date(2025, 4, 10))).unwrap()).unwrap();
    assert!(ics.ends_with("\r\n"));
    for line in ics.split("\r\n") {
        assert!(!line.contains('\n'), "bare LF in line {:?}", line);
    }
}

#[test]
fn test_crlf_input_roundtrips_without_raw_carriage_returns() {
    let text = "Day 1: a\r\nb\r\nDay 2: c\r\n";
    let ics = String::from_utf8(converter().convert(text, Some(date(2025, 6, 1))).unwrap()).unwrap();

    let body = ics.strip_suffix("\r\n").unwrap();
    for line in body.split("\r\n") {
        assert!(!line.contains('\r'), "raw CR in line {:?}", line);
        assert!(!line.contains('\n'), "bare LF in line {:?}", line);
    }

    let calendar: Calendar = ics.parse().expect("icalendar should parse CRLF-derived output");
    let descriptions: Vec<String> = calendar
        .components
        .iter()
        .filter_map(|c| match c {
            CalendarComponent::Event(e) => e.get_description().map(str::to_string),
            _ => None,
        })
        .collect();
    assert_eq!(descriptions, vec!["a\nb", "c"]);

    let parsed = read_calendar(&ics).unwrap();
    assert_eq!(parsed.events.len(), 2);
    assert_eq!(parsed.events[0].description.as_deref(), Some("a\nb"));
    assert_eq!(parsed.events[1].start, Some(date(2025, 6, 2)));
}

#[test]
fn test_icalendar_crate_can_parse_output() {
    let ics = String::from_utf8(converter().convert(ROME, Some(date(2025, 4, 10))).unwrap()).unwrap();
    let calendar: Calendar = ics.parse().expect("icalendar should parse our output");

    let starts: Vec<String> = calendar
        .components
        .iter()
        .filter_map(|c| match c {
            CalendarComponent::Event(e) => e
                .properties()
                .get("DTSTART")
                .map(|p| p.value().to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(starts, vec!["20250410", "20250411", "20250412"]);
}

// ==================== Export ====================

#[test]
fn test_export_writes_file() {
    let ctx = TestContext::new();
    let dir = ctx.get_data_dir().unwrap().join("out");

    let path = export::export_itinerary(
        &converter(),
        "Day 1: Arrive\nDay 2: Leave",
        Some(date(2025, 8, 1)),
        &dir,
        ICS_FILE_NAME,
    )
    .unwrap();

    assert_eq!(path, dir.join("travel_itinerary.ics"));
    let written = fs::read_to_string(&path).unwrap();
    let parsed = read_calendar(&written).unwrap();
    assert_eq!(parsed.events.len(), 2);
    assert!(!dir.join("travel_itinerary.tmp").exists());
    assert!(!dir.join("travel_itinerary.ics.lock").exists());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
}

#[test]
fn test_export_failure_writes_nothing() {
    let ctx = TestContext::new();
    let dir = ctx.get_data_dir().unwrap();

    let result = export::export_itinerary(
        &converter(),
        "Day 18446744073709551616: beyond u64",
        Some(date(2025, 8, 1)),
        &dir,
        "broken.ics",
    );

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.to_string().contains("18446744073709551616"));
    assert!(!dir.join("broken.ics").exists());
}

#[test]
fn test_export_overwrites_previous_file() {
    let ctx = TestContext::new();
    let dir = ctx.get_data_dir().unwrap();

    export::export_itinerary(&converter(), "Day 1: a\nDay 2: b", None, &dir, "trip.ics").unwrap();
    export::export_itinerary(&converter(), "Day 1: only one", None, &dir, "trip.ics").unwrap();

    let parsed = read_calendar(&fs::read_to_string(dir.join("trip.ics")).unwrap()).unwrap();
    assert_eq!(parsed.events.len(), 1);
    assert_eq!(parsed.events[0].description.as_deref(), Some("only one"));
}
