//! Presentation helpers for epoch timestamps and durations.

use chrono::{Local, TimeZone};
use std::fmt::Display;

/// Date portion of an epoch timestamp, MM/DD/YYYY, host-local time.
pub fn format_date(epoch_secs: i64) -> String {
    date_in(&Local, epoch_secs)
}

/// Time portion of an epoch timestamp as a 12-hour clock with AM/PM,
/// host-local time.
pub fn format_time(epoch_secs: i64) -> String {
    time_in(&Local, epoch_secs)
}

/// Signed span between the two endpoints in seconds. The capture windows
/// in flow logs occasionally run backwards, and a negative span is shown
/// as-is rather than clamped.
pub fn duration_secs(start: i64, end: i64) -> i64 {
    end - start
}

fn date_in<Tz: TimeZone>(tz: &Tz, epoch_secs: i64) -> String
where
    Tz::Offset: Display,
{
    match tz.timestamp_opt(epoch_secs, 0).single() {
        Some(ts) => ts.format("%m/%d/%Y").to_string(),
        None => "-".to_string(),
    }
}

fn time_in<Tz: TimeZone>(tz: &Tz, epoch_secs: i64) -> String
where
    Tz::Offset: Display,
{
    match tz.timestamp_opt(epoch_secs, 0).single() {
        Some(ts) => ts.format("%-I:%M %p").to_string(),
        None => "-".to_string(),
    }
}
