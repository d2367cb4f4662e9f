// src/format.rs
//! Speed unit conversion and GPS time formatting

/// Statute miles per hour in one knot.
pub const MPH_PER_KNOT: f64 = 1.15078;

/// Kilometres per hour in one mile per hour.
pub const KMH_PER_MPH: f64 = 1.60934;

pub fn knots_to_mph(knots: f64) -> f64 {
    knots * MPH_PER_KNOT
}

pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * KMH_PER_MPH
}

/// Reformat a receiver `HHMMSS[.sss]` time as `HH:MM:SS`.
///
/// Only the first six characters are used and they are not range checked.
/// Returns `None` when fewer than six characters are available; callers
/// omit the time line in that case.
pub fn format_time(raw: &str) -> Option<String> {
    let digits: Vec<char> = raw.chars().take(6).collect();
    if digits.len() < 6 {
        return None;
    }

    let pair = |i: usize| digits[i..i + 2].iter().collect::<String>();
    Some(format!("{}:{}:{}", pair(0), pair(2), pair(4)))
}

/// Format a speed with the two decimals used on every view.
pub fn format_speed(value: f64) -> String {
    format!("{:.2}", value)
}
