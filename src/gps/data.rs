// src/gps/data.rs
//! Decoded receiver values shared between the decoders and the display

use crate::format::mph_to_kmh;
use chrono::{DateTime, Utc};
use std::fmt;

/// A latitude or longitude exactly as the receiver sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coordinate {
    pub value: String,      // ddmm.mmmm / dddmm.mmmm
    pub hemisphere: String, // N, S, E or W
}

impl Coordinate {
    pub fn new(value: &str, hemisphere: &str) -> Self {
        Self {
            value: value.to_string(),
            hemisphere: hemisphere.to_string(),
        }
    }

    /// Convert to signed decimal degrees. South and west are negative.
    pub fn to_decimal_degrees(&self) -> Option<f64> {
        if self.value.is_empty() {
            return None;
        }
        let raw = self.value.parse::<f64>().ok()?;
        let degrees = (raw / 100.0).trunc();
        let minutes = raw - degrees * 100.0;
        let decimal = degrees + minutes / 60.0;

        match self.hemisphere.as_str() {
            "S" | "W" => Some(-decimal),
            _ => Some(decimal),
        }
    }

    /// Verbatim value, with decimal degrees appended when it parses
    pub fn describe(&self) -> String {
        match self.to_decimal_degrees() {
            Some(degrees) => format!("{} ({:.6})", self, degrees),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.hemisphere)
    }
}

/// Fields of the most recent position-fix sentence, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixRecord {
    pub time_raw: String,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub fix_quality: String,
    pub satellite_count: String,
}

impl FixRecord {
    pub fn fix_quality_code(&self) -> Option<u8> {
        self.fix_quality.trim().parse().ok()
    }

    pub fn satellite_count(&self) -> Option<u32> {
        self.satellite_count.trim().parse().ok()
    }

    /// Get fix type description
    pub fn fix_description(&self) -> String {
        match self.fix_quality_code() {
            Some(0) => "No fix".to_string(),
            Some(1) => "GPS".to_string(),
            Some(2) => "DGPS".to_string(),
            Some(3) => "PPS".to_string(),
            Some(4) => "RTK".to_string(),
            Some(5) => "Float RTK".to_string(),
            Some(6) => "Estimated".to_string(),
            Some(7) => "Manual".to_string(),
            Some(8) => "Simulation".to_string(),
            Some(q) => format!("Unknown ({})", q),
            None => "Unknown".to_string(),
        }
    }
}

/// Last known values. Each sentence type overwrites only its own fields;
/// nothing is ever reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestValues {
    pub fix: FixRecord,
    pub speed_mph: f64,
    pub last_update: Option<DateTime<Utc>>,
}

impl LatestValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speed_kmh(&self) -> f64 {
        mph_to_kmh(self.speed_mph)
    }

    /// Update the timestamp to now
    pub fn update_timestamp(&mut self) {
        self.last_update = Some(Utc::now());
    }

    /// Receiver dump, one `label: value` line per field.
    pub fn summary_lines(&self) -> Vec<String> {
        let updated = match self.last_update {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "never".to_string(),
        };
        let satellites = match self.fix.satellite_count() {
            Some(count) => count.to_string(),
            None => "Unknown".to_string(),
        };

        vec![
            format!("Updated: {}", updated),
            format!("Time: {}", self.fix.time_raw),
            format!("Latitude: {}", self.fix.latitude.describe()),
            format!("Longitude: {}", self.fix.longitude.describe()),
            format!("Fix quality: {} ({})", self.fix.fix_quality, self.fix.fix_description()),
            format!("Number of satellites: {}", satellites),
            format!("Speed: {:.2} MPH", self.speed_mph),
        ]
    }
}
