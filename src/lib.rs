// src/lib.rs
//! GPS Speedometer Library
//!
//! Decodes NMEA position-fix and velocity sentences from a GPS receiver and
//! drives a small text display with button-selectable views.

pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod gps;
pub mod input;
pub mod monitor;

// Re-export main types for convenience
pub use display::{DisplayMode, RenderSink};
pub use error::{Result, SpeedoError};
pub use gps::LatestValues;
pub use monitor::{GpsSource, Speedometer};
