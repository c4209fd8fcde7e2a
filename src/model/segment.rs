// File: src/model/segment.rs
use once_cell::sync::Lazy;
use regex::Regex;

// "Day", one space, a run of decimal digits (any script), then a run of
// colons and/or whitespace.
static DAY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Day (\d+)[:\s]+").expect("DAY_MARKER should compile - this is a bug")
});

// Where a day's content stops. No separator required here.
static DAY_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Day \d+").expect("DAY_BOUNDARY should compile - this is a bug")
});

static DECIMAL_DIGIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d$").expect("DECIMAL_DIGIT should compile - this is a bug")
});

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Value of a decimal digit from any script (`7`, `７`, `٧`, ...).
///
/// Unicode lays every decimal digit set out as ten consecutive code points
/// starting at zero, so the value is the digit's distance from the start of
/// its run, modulo ten.
fn digit_value(c: char) -> Option<u64> {
    if let Some(d) = c.to_digit(10) {
        return Some(u64::from(d));
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut offset = 0u64;
    let mut code = u32::from(c);
    while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        offset += 1;
        code -= 1;
    }
    Some(offset % 10)
}

/// One `Day N: ...` block, borrowed from the itinerary text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySegment<'a> {
    /// The digit run as written (may carry leading zeros, use non-ASCII
    /// digits or exceed `u64`).
    pub digits: &'a str,
    /// Everything between the separator and the next marker, untrimmed.
    pub content: &'a str,
}

impl DaySegment<'_> {
    /// `None` when the digit run does not fit in a `u64`.
    pub fn day_number(&self) -> Option<u64> {
        self.digits.chars().try_fold(0u64, |acc, c| {
            acc.checked_mul(10)?.checked_add(digit_value(c)?)
        })
    }

    /// Content with leading/trailing whitespace removed; inner layout untouched.
    pub fn description(&self) -> &str {
        self.content.trim()
    }
}

/// Split itinerary text into day blocks, in the order they appear.
///
/// Content spans newlines and ends right before the next `Day <digits>`
/// (whether or not that one is a valid marker) or at the end of the text.
/// Scanning resumes where the previous content stopped. Duplicates and
/// out-of-order day numbers are returned as-is.
pub fn segment_days(text: &str) -> Vec<DaySegment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;

    while let Some(caps) = DAY_MARKER.captures_at(text, pos) {
        let (Some(marker), Some(digits)) = (caps.get(0), caps.get(1)) else {
            break;
        };

        let content_start = marker.end();
        let content_end = DAY_BOUNDARY
            .find_at(text, content_start)
            .map_or(text.len(), |next| next.start());

        segments.push(DaySegment {
            digits: digits.as_str(),
            content: &text[content_start..content_end],
        });

        pos = content_end;
    }

    segments
}
