use chrono::{NaiveDate, NaiveTime};

/// Format used for every time-of-day string the crate stores or compares.
pub const TIME_FORMAT: &str = "%H:%M";

/// Format of the calendar-day half of the cache key: `DD-MM-YYYY`, zero padded.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// The one place a calendar day becomes a string. Store lookups, store writes
/// and the provider URL all go through here.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Format a NaiveTime to "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// Parse an "HH:MM" string.
pub fn parse_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
}

/// Format a duration in seconds to "Xh Ym" or "Ym" string
pub fn format_duration_secs(secs: i64) -> String {
    if secs <= 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
