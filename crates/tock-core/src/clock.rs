//! Wall-clock formatting, parsing, and interval math.
//!
//! # Timestamp Format
//!
//! Timestamps are stored as TEXT in local-naive ISO 8601 form with second
//! precision (e.g., `2024-01-15T10:30:00`), no timezone offset. This keeps
//! lexicographic ordering aligned with chronological ordering, which the
//! storage layer relies on for range scans.
//!
//! Storing wall-clock time means intervals spanning a DST shift on the host
//! are over- or under-counted by the shift amount. That matches the behavior
//! users see on their clock and is the documented policy here.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Stored timestamp layout, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Formats a signed second count as `[-]HH:MM:SS`.
///
/// Hours widen past two digits as needed; negative inputs keep a single
/// leading `-`.
pub fn format_duration(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parses `H:MM` or `H:MM:SS` into seconds.
///
/// Returns `None` unless the input has exactly two or three numeric
/// colon-separated fields with minutes and seconds in `[0, 60)`. Hours take
/// whatever integer parsing yields, sign included, so `-1:30` is `-3600 +
/// 1800` seconds.
pub fn parse_clock(text: &str) -> Option<i64> {
    let fields: Vec<&str> = text.trim().split(':').collect();
    if fields.len() != 2 && fields.len() != 3 {
        return None;
    }
    let hours: i64 = fields[0].trim().parse().ok()?;
    let minutes: i64 = fields[1].trim().parse().ok()?;
    let seconds: i64 = match fields.get(2) {
        Some(field) => field.trim().parse().ok()?,
        None => 0,
    };
    if !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}

/// Clamps `[start, end]` to `[window_start, window_end]`.
///
/// Returns `(max(start, window_start), min(end, window_end))`. The result may
/// be inverted when the interval and window do not overlap; callers must
/// treat `eff_end <= eff_start` as a zero contribution.
pub fn clamp_interval(
    start: NaiveDateTime,
    end: NaiveDateTime,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> (NaiveDateTime, NaiveDateTime) {
    (start.max(window_start), end.min(window_end))
}

/// Returns the inclusive `[00:00:00, 23:59:59.999999]` bounds of a day.
pub fn day_window(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let end_of_day = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
        .expect("23:59:59.999999 is a valid time of day");
    (day.and_time(NaiveTime::MIN), day.and_time(end_of_day))
}

/// Renders a timestamp in the stored second-precision layout.
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp.
///
/// Accepts the canonical `T`-separated layout and, for hand-edited input, a
/// space separator.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
}
