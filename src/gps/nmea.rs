// src/gps/nmea.rs
//! NMEA sentence decoding for GGA position fixes and VTG velocity

use super::{
    data::{Coordinate, FixRecord, LatestValues},
    tokenizer::TokenSequence,
};
use crate::format::knots_to_mph;

pub const FIX_PREFIX: &str = "$GPGGA,";
pub const VELOCITY_PREFIX: &str = "$GPVTG,";

const FIX_FIELDS: usize = 15;
const VELOCITY_FIELDS: usize = 10;

// Highest field index each decoder reads, plus one.
const FIX_MIN_FIELDS: usize = 8;
const VELOCITY_MIN_FIELDS: usize = 6;

const VELOCITY_KNOTS_FIELD: usize = 5;

/// Which kind of sentence a line decoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentence {
    Fix,
    Velocity,
}

/// Decode one line into `values`.
///
/// Returns `None` for anything that is not a well-formed GGA or VTG line;
/// `values` is left untouched in that case.
pub fn decode_sentence(values: &mut LatestValues, line: &str) -> Option<Sentence> {
    let line = line.trim_end_matches(['\r', '\n']);

    let decoded = if line.starts_with(FIX_PREFIX) {
        decode_fix(values, line).then_some(Sentence::Fix)
    } else if line.starts_with(VELOCITY_PREFIX) {
        decode_velocity(values, line).then_some(Sentence::Velocity)
    } else {
        None
    };

    if decoded.is_some() {
        values.update_timestamp();
    }
    decoded
}

/// Decode a GGA (Global Positioning System Fix Data) sentence
fn decode_fix(values: &mut LatestValues, line: &str) -> bool {
    let parts = TokenSequence::split(line, FIX_FIELDS);
    if parts.present() < FIX_MIN_FIELDS {
        return false;
    }

    values.fix = FixRecord {
        time_raw: parts.get(1).to_string(),
        latitude: Coordinate::new(parts.get(2), parts.get(3)),
        longitude: Coordinate::new(parts.get(4), parts.get(5)),
        fix_quality: parts.get(6).to_string(),
        satellite_count: parts.get(7).to_string(),
    };
    true
}

/// Decode a VTG (Course Over Ground and Ground Speed) sentence
fn decode_velocity(values: &mut LatestValues, line: &str) -> bool {
    let parts = TokenSequence::split(line, VELOCITY_FIELDS);
    if parts.present() < VELOCITY_MIN_FIELDS {
        return false;
    }

    let knots = parse_or_zero(parts.get(VELOCITY_KNOTS_FIELD));
    values.speed_mph = knots_to_mph(knots);
    true
}

/// Parse a speed field, treating anything unusable as zero.
///
/// Receivers leave the speed empty until they have a fix, so an empty or
/// garbled field reads as standing still rather than as an error. Negative
/// and non-finite values are also clamped to zero.
///
/// Stricter than a leading-number parse: the whole field must be a number,
/// so `"12abc"` reads as 0.0, not 12.
pub fn parse_or_zero(field: &str) -> f64 {
    match field.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}
