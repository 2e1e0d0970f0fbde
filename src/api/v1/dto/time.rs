use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;

/// Current UTC time, split into calendar fields.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimeResponse {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl TimeResponse {
    pub fn now() -> Self {
        Self::from(Utc::now())
    }
}

impl From<DateTime<Utc>> for TimeResponse {
    fn from(t: DateTime<Utc>) -> Self {
        Self {
            year: t.year(),
            month: t.month(),
            day: t.day(),
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
            // leap-second representation can push nanos past 1e9
            millisecond: t.timestamp_subsec_millis().min(999),
        }
    }
}
