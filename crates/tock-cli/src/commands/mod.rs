//! CLI command implementations.

pub mod delete;
pub mod edit;
pub mod export;
pub mod log;
pub mod projects;
pub mod start;
pub mod status;
pub mod stop;

use chrono::{Datelike, Local, NaiveDate};

/// Fills in the default reporting range: first of the current month through
/// today.
pub fn resolve_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let today = Local::now().date_naive();
    let from = from.unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    (from, to.unwrap_or(today))
}
