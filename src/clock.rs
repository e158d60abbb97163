//! Source of the current date.
//!
//! Only the contributor's current age and the years left until
//! retirement depend on "today"; everything else is a function of the
//! inputs.  Passing the date through a [`Clock`] keeps the engine
//! deterministic under test.

use chrono::{Local, NaiveDate};

/// Clocks must be thread-safe (`Send + Sync`) because scenarios may be
/// evaluated concurrently.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
