// libs/schedule-cell/src/services/calendar.rs
//
// Pure calendar and interval arithmetic. Everything here is deterministic
// and side-effect free; malformed input fails with a ParseError.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::models::ParseError;

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_time(value: &str) -> Result<NaiveTime, ParseError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| ParseError(format!("invalid time '{}', expected HH:MM:SS", value)))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ParseError(format!("invalid date '{}', expected YYYY-MM-DD", value)))
}

/// Minutes since midnight.
pub fn time_to_minutes(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Add minutes to a time of day. Returns None if the result would roll past
/// midnight; slots never span day boundaries.
pub fn add_minutes(time: NaiveTime, minutes: i32) -> Option<NaiveTime> {
    let total = time_to_minutes(time) + minutes;
    if !(0..=24 * 60).contains(&total) {
        return None;
    }
    if total == 24 * 60 {
        // 24:00 is not representable; the caller treats a full-day end as
        // exclusive anyway, so the last representable minute never matters.
        return None;
    }
    NaiveTime::from_hms_opt((total / 60) as u32, (total % 60) as u32, 0)
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
pub fn range_overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Inclusive on both ends.
pub fn date_in_range(date: NaiveDate, from: NaiveDate, to: NaiveDate) -> bool {
    date >= from && date <= to
}
