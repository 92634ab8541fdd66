//! Wall-clock access port trait.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of "today" and "now" for the generators.
pub trait Clock: Send + Sync {
    /// Calendar date the historical series ends on and the forecast starts after.
    fn today(&self) -> NaiveDate;

    /// Timestamp stamped on live readings.
    fn now(&self) -> DateTime<Utc>;
}
