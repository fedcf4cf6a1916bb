//! Departure date/time parsing.
//!
//! Rejseplanen sends dates as "YYYY-MM-DD" and times as either "HH:MM:SS"
//! or "HH:MM". Times are Danish local time; we never attach a zone since
//! planned and real-time values are only compared with each other.

use chrono::NaiveDateTime;

/// Accepted formats for a joined "date time" string, tried in order.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a date and time pair into a single moment.
///
/// Returns `None` when either part is missing or no accepted format
/// matches.
///
/// # Examples
///
/// ```
/// use departure_board::board::parse_departure_datetime;
///
/// let with_seconds = parse_departure_datetime(Some("2024-05-01"), Some("10:05:00"));
/// let without = parse_departure_datetime(Some("2024-05-01"), Some("10:05"));
/// assert!(with_seconds.is_some());
/// assert_eq!(with_seconds, without);
///
/// assert!(parse_departure_datetime(Some("2024-05-01"), None).is_none());
/// assert!(parse_departure_datetime(Some("01.05.2024"), Some("10:05")).is_none());
/// ```
pub fn parse_departure_datetime(date: Option<&str>, time: Option<&str>) -> Option<NaiveDateTime> {
    let joined = format!("{} {}", date?, time?);
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&joined, format).ok())
}
