//! Display formatting for timestamps

use chrono::{DateTime, Utc};

/// `Oct 13, 2025`
pub fn date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// `14:05`
pub fn time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

/// `30 minutes ago`, `2 hours ago`, `1 day ago`
pub fn relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - at;
    let (amount, unit) = if elapsed.num_days() > 0 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_hours() > 0 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() > 0 {
        (elapsed.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{} {}{} ago", amount, unit, plural)
}
