// src/error.rs
//! Error types for the speedometer

use std::fmt;

pub type Result<T> = std::result::Result<T, SpeedoError>;

#[derive(Debug)]
pub enum SpeedoError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Json(serde_json::Error),
    Connection(String),
    /// The rendering sink could not be brought up; the device has nothing to show.
    Display(String),
    Config(String),
    Other(String),
}

impl fmt::Display for SpeedoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedoError::Io(e) => write!(f, "IO error: {}", e),
            SpeedoError::Serial(e) => write!(f, "Serial error: {}", e),
            SpeedoError::Json(e) => write!(f, "JSON error: {}", e),
            SpeedoError::Connection(msg) => write!(f, "Connection error: {}", msg),
            SpeedoError::Display(msg) => write!(f, "Display error: {}", msg),
            SpeedoError::Config(msg) => write!(f, "Config error: {}", msg),
            SpeedoError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for SpeedoError {}

impl From<std::io::Error> for SpeedoError {
    fn from(error: std::io::Error) -> Self {
        SpeedoError::Io(error)
    }
}

impl From<tokio_serial::Error> for SpeedoError {
    fn from(error: tokio_serial::Error) -> Self {
        SpeedoError::Serial(error)
    }
}

impl From<serde_json::Error> for SpeedoError {
    fn from(error: serde_json::Error) -> Self {
        SpeedoError::Json(error)
    }
}

impl From<anyhow::Error> for SpeedoError {
    fn from(error: anyhow::Error) -> Self {
        SpeedoError::Other(error.to_string())
    }
}
