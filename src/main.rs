// src/main.rs
//! GPS Speedometer - NMEA speed display with a terminal panel

use anyhow::Context;
use clap::Parser;
use env_logger::{Builder, Target};
use gps_speedometer::{
    config::SpeedoConfig,
    display::terminal::TerminalDisplay,
    input::KeyboardButton,
    monitor::{list_serial_ports, GpsSource, Speedometer},
};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gps-speedometer", version, about = "NMEA GPS speedometer")]
struct Cli {
    /// Configuration file (defaults to ~/.config/gps-speedometer/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port the receiver is attached to
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Replay a recorded NMEA log instead of reading a serial port
    #[arg(short, long, conflicts_with = "port")]
    replay: Option<String>,

    /// Delay between replayed lines in milliseconds
    #[arg(long)]
    replay_interval: Option<u64>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut SpeedoConfig) {
        if let Some(port) = &self.port {
            let baud = self.baud.or(config.serial_baudrate).unwrap_or(9600);
            config.update_serial(port.clone(), baud);
        } else if let Some(baud) = self.baud {
            config.serial_baudrate = Some(baud);
        }

        if let Some(path) = &self.replay {
            let interval = self.replay_interval.or(config.replay_interval_ms).unwrap_or(200);
            config.update_replay(path.clone(), interval);
        } else if let Some(interval) = self.replay_interval {
            config.replay_interval_ms = Some(interval);
        }
    }
}

fn init_logging() {
    // stderr keeps log output off the panel on stdout
    Builder::from_default_env()
        .target(Target::Stderr)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    if cli.list_ports {
        list_serial_ports()?;
        return Ok(());
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => SpeedoConfig::get_config_path()?,
    };
    let mut config = SpeedoConfig::load_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    cli.apply(&mut config);
    config.validate()?;

    if cli.save_config {
        config.save_to(&config_path)?;
        info!("Saved configuration to {}", config_path.display());
    }

    info!("Starting GPS speedometer using {} source", config.source_type);

    let source = GpsSource::from_config(&config)?;
    let mut lines = source.connect().await?;

    // Without a display there is nothing to do.
    let mut display = TerminalDisplay::init().context("display initialization failed")?;
    let mut button = KeyboardButton::new(config.button_hold());
    let mut speedometer = Speedometer::from_config(&config);

    speedometer
        .run(&mut lines, &mut button, &mut display, config.tick_period())
        .await?;

    drop(display);
    info!("Shutting down...");
    Ok(())
}
