//! Decomposition of event timestamps into time dimension fields.

use crate::sparkify_store::TimeRow;
use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Timelike};

const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S%.3f";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// An event timestamp split into the fields of the `time` table.
///
/// `week` is the ISO-8601 week number, `year` the calendar year and
/// `weekday` counts from Monday = 0 to Sunday = 6. All fields are UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBucket {
    pub timestamp: NaiveDateTime,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

impl TimeBucket {
    /// The bucket key. The date is dropped, so identical clock times on
    /// different days share a bucket.
    pub fn time_of_day(&self) -> NaiveTime {
        self.timestamp.time()
    }

    /// Full timestamp with millisecond precision, as stored on songplays.
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_row(&self) -> TimeRow {
        TimeRow {
            start_time: self.time_of_day().format(TIME_OF_DAY_FORMAT).to_string(),
            hour: self.hour,
            day: self.day,
            week: self.week,
            month: self.month,
            year: self.year,
            weekday: self.weekday,
        }
    }
}

/// Split an epoch-milliseconds UTC timestamp. Returns `None` when it is
/// outside the representable range.
pub fn decompose_timestamp(epoch_millis: i64) -> Option<TimeBucket> {
    let timestamp = DateTime::from_timestamp_millis(epoch_millis)?.naive_utc();
    Some(TimeBucket {
        timestamp,
        hour: timestamp.hour(),
        day: timestamp.day(),
        week: timestamp.iso_week().week(),
        month: timestamp.month(),
        year: timestamp.year(),
        weekday: timestamp.weekday().num_days_from_monday(),
    })
}
