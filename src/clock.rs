/*! Time source abstraction.

The converter reads "now" twice: the default start date and the DTSTAMP of
every event. Both go through a `Clock` so that callers (and tests) can freeze
time explicitly instead of depending on the wall clock.

- `SystemClock`: the real clock. `today()` is the local calendar date.
- `FixedClock`: a frozen instant. `today()` is the UTC date of that instant.
*/

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Supplies the current instant and the current calendar date.
///
/// The trait is object-safe so callers can hold `Arc<dyn Clock>`.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

// --- Production Implementation ---

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        // "Today" is what the traveller sees on their own calendar.
        Local::now().date_naive()
    }
}

// --- Test / Reproducible Implementation ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Freeze the clock at midnight UTC of `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

// Convenience alias for users who want to store the clock in an Arc.
pub type SharedClock = std::sync::Arc<dyn Clock>;
