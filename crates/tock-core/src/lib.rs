//! Core time math for the tock time tracker.
//!
//! This crate contains the leaf utilities the storage layer builds on:
//! - Duration rendering (`HH:MM:SS`) and clock-string parsing
//! - Interval clamping for partial-day aggregation
//! - The local-naive timestamp codec and day-window bounds

pub mod clock;

pub use clock::{
    TIMESTAMP_FORMAT, clamp_interval, day_window, format_duration, format_timestamp, parse_clock,
    parse_timestamp,
};
