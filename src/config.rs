// src/config.rs
//! Configuration management

use crate::error::{Result, SpeedoError};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_BRAND_LABEL: &str = "Mellow_labs";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeedoConfig {
    pub source_type: String, // "serial", "replay"
    pub serial_port: Option<String>,
    pub serial_baudrate: Option<u32>,
    pub replay_path: Option<String>,
    pub replay_interval_ms: Option<u64>,
    pub debounce_ms: u64,
    pub tick_ms: u64,
    pub button_hold_ms: u64,
    pub brand_label: String,
}

impl Default for SpeedoConfig {
    fn default() -> Self {
        Self {
            source_type: "serial".to_string(),
            serial_port: None,
            serial_baudrate: Some(9600),
            replay_path: None,
            replay_interval_ms: Some(200),
            debounce_ms: 50,
            tick_ms: 10,
            button_hold_ms: 120,
            brand_label: DEFAULT_BRAND_LABEL.to_string(),
        }
    }
}

impl SpeedoConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| SpeedoError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| SpeedoError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SpeedoError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(path, contents)
            .map_err(|e| SpeedoError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| SpeedoError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("gps-speedometer").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(SpeedoError::Config("tick_ms must be greater than zero".to_string()));
        }
        // The first low sample can land up to one tick after the key press.
        let min_hold = self.debounce_ms.saturating_add(self.tick_ms);
        if self.button_hold_ms < min_hold {
            return Err(SpeedoError::Config(format!(
                "button_hold_ms ({}) must be at least debounce_ms + tick_ms ({})",
                self.button_hold_ms, min_hold
            )));
        }
        match self.source_type.as_str() {
            "serial" | "replay" => Ok(()),
            other => Err(SpeedoError::Config(format!("Unknown source type '{}'", other))),
        }
    }

    /// Update serial port settings
    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.source_type = "serial".to_string();
        self.serial_port = Some(port);
        self.serial_baudrate = Some(baudrate);
    }

    /// Update replay settings
    pub fn update_replay(&mut self, path: String, interval_ms: u64) {
        self.source_type = "replay".to_string();
        self.replay_path = Some(path);
        self.replay_interval_ms = Some(interval_ms);
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn button_hold(&self) -> Duration {
        Duration::from_millis(self.button_hold_ms)
    }
}
