//! Pure transforms from provider values into dashboard vocabulary.
//!
//! Everything here is a total function: out-of-table weather codes, degrees
//! outside [0, 360) and unparsable timestamps all land on defined defaults
//! instead of failing.

use chrono::{NaiveDateTime, Timelike};

use crate::model::{Condition, MoodTag};

/// Map a WMO weather code to a dashboard condition.
///
/// Codes absent from the table read as cloudy.
pub fn condition_for_code(code: i32) -> Condition {
    match code {
        0 | 1 => Condition::Clear,
        2 => Condition::Cloudy,
        3 => Condition::Overcast,
        45 | 48 => Condition::Cloudy, // fog
        51 | 53 | 55 | 56 | 57 => Condition::Rainy, // drizzle
        61 | 63 | 65 | 66 | 67 => Condition::Rainy,
        71 | 73 | 75 | 77 => Condition::Snow,
        80 | 81 => Condition::Rainy, // rain showers
        82 => Condition::Stormy,     // violent rain showers
        85 | 86 => Condition::Snow,
        95 | 96 | 99 => Condition::Stormy, // thunderstorm
        _ => Condition::Cloudy,
    }
}

pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Convert wind degrees to one of 16 compass labels.
///
/// Lower-bound buckets every 22.5 degrees; 360 wraps back to "N".
pub fn wind_direction(degrees: f64) -> &'static str {
    let wrapped = degrees.rem_euclid(360.0);
    let index = (wrapped / 22.5).floor() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

/// Label for an hourly slot. The first slot is always "Now"; later slots use
/// the local hour with 12-hour wraparound.
pub fn hourly_label(hour: u32, index: usize) -> String {
    if index == 0 {
        return "Now".to_string();
    }
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{hour} AM"),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

/// Morning and evening commute windows.
pub fn is_peak_travel(hour: u32) -> bool {
    (7..=9).contains(&hour) || (17..=19).contains(&hour)
}

pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Label for a daily slot. `today_index` is the current weekday as an index
/// into [`DAY_NAMES`] (0 = Sunday); `offset` is days ahead of today.
pub fn daily_label(today_index: usize, offset: usize) -> String {
    if offset == 0 {
        return "Today".to_string();
    }
    DAY_NAMES[(today_index + offset) % 7].to_string()
}

pub fn mood_for(condition: Condition) -> MoodTag {
    match condition {
        Condition::Clear => MoodTag::Orange,
        Condition::Rainy | Condition::Stormy => MoodTag::Gray,
        _ => MoodTag::Blue,
    }
}

/// Round to the nearest integer for display.
pub fn round(value: f64) -> i32 {
    value.round() as i32
}

/// Provider visibility comes in meters; the dashboard shows kilometers.
pub fn metres_to_km(metres: f64) -> i32 {
    round(metres / 1000.0)
}

/// Parse a provider-local timestamp like "2024-03-04T14:00".
pub fn parse_local(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M").ok()
}

/// Format a provider-local timestamp as a clock label like "6:45 AM".
/// Unparsable input passes through unchanged.
pub fn clock_label(timestamp: &str) -> String {
    match parse_local(timestamp) {
        Some(time) => {
            let (is_pm, hour12) = time.hour12();
            let suffix = if is_pm { "PM" } else { "AM" };
            format!("{}:{:02} {}", hour12, time.minute(), suffix)
        }
        None => timestamp.to_string(),
    }
}
