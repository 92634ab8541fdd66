//! Wall-clock adapter.

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::ports::clock_port::Clock;

/// Local calendar date, UTC timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
