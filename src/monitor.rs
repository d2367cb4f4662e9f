// src/monitor.rs
//! Speedometer control loop: line sources, decoding, button and rendering

use crate::{
    config::SpeedoConfig,
    display::{render, DisplayMode, RenderContext, RenderSink},
    error::{Result, SpeedoError},
    gps::{decode_sentence, ChannelLines, LatestValues, LineSource, Sentence},
    input::{ButtonInput, Debouncer, Level},
};
use log::{debug, error, info, trace, warn};
use std::time::{Duration, Instant};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc::UnboundedSender,
    time::MissedTickBehavior,
};
use tokio_serial::SerialPortBuilderExt;

/// GPS data source configuration
#[derive(Debug, Clone, PartialEq)]
pub enum GpsSource {
    Serial { port: String, baudrate: u32 },
    /// Play back a recorded NMEA log, one line per `interval`
    Replay { path: String, interval: Duration },
}

impl GpsSource {
    pub fn from_config(config: &SpeedoConfig) -> Result<Self> {
        match config.source_type.as_str() {
            "serial" => {
                let port = config
                    .serial_port
                    .clone()
                    .ok_or_else(|| SpeedoError::Config("No serial port configured".to_string()))?;
                Ok(GpsSource::Serial {
                    port,
                    baudrate: config.serial_baudrate.unwrap_or(9600),
                })
            }
            "replay" => {
                let path = config
                    .replay_path
                    .clone()
                    .ok_or_else(|| SpeedoError::Config("No replay file configured".to_string()))?;
                Ok(GpsSource::Replay {
                    path,
                    interval: Duration::from_millis(config.replay_interval_ms.unwrap_or(200)),
                })
            }
            other => Err(SpeedoError::Config(format!("Unknown source type '{}'", other))),
        }
    }

    /// Start a reader task for this source and return the receiving end
    pub async fn connect(&self) -> Result<ChannelLines> {
        let (tx, lines) = ChannelLines::channel();
        match self {
            GpsSource::Serial { port, baudrate } => connect_serial(port, *baudrate, tx)?,
            GpsSource::Replay { path, interval } => connect_replay(path, *interval, tx).await?,
        }
        Ok(lines)
    }
}

/// Connect to a GPS receiver via serial port
fn connect_serial(port: &str, baudrate: u32, tx: UnboundedSender<String>) -> Result<()> {
    info!("Connecting to GPS on {} at {} baud...", port, baudrate);

    let serial = tokio_serial::new(port, baudrate)
        .timeout(Duration::from_millis(1000))
        .open_native_async()
        .map_err(|e| SpeedoError::Connection(format!("Failed to open serial port {}: {}", port, e)))?;

    info!("Connected successfully!");

    tokio::spawn(async move {
        if let Err(e) = forward_lines(BufReader::new(serial), tx, None).await {
            error!("Error reading from serial port: {}", e);
        }
        warn!("Serial reader stopped");
    });

    Ok(())
}

/// Replay a recorded NMEA log file
async fn connect_replay(path: &str, interval: Duration, tx: UnboundedSender<String>) -> Result<()> {
    info!("Replaying NMEA log {} every {:?}...", path, interval);

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| SpeedoError::Connection(format!("Failed to open replay file {}: {}", path, e)))?;

    tokio::spawn(async move {
        if let Err(e) = forward_lines(BufReader::new(file), tx, Some(interval)).await {
            error!("Error reading replay file: {}", e);
        }
        info!("Replay finished");
    });

    Ok(())
}

/// Send each non-empty line from `reader` to `tx`, waiting `pace` after each.
///
/// Lines that are not valid UTF-8 (line noise, wrong baud rate) are skipped.
/// Returns on EOF, on an I/O error, or when the receiver is gone.
async fn forward_lines<R>(mut reader: R, tx: UnboundedSender<String>, pace: Option<Duration>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(()); // EOF
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(text) => text.trim(),
            Err(_) => {
                trace!("Skipping non-UTF-8 line: {}", String::from_utf8_lossy(&buf).trim());
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        if tx.send(line.to_string()).is_err() {
            return Ok(());
        }
        if let Some(pace) = pace {
            tokio::time::sleep(pace).await;
        }
    }
}

/// What one control-loop tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub decoded: Option<Sentence>,
    pub pressed: bool,
}

impl TickOutcome {
    pub fn rendered(&self) -> bool {
        self.decoded.is_some() || self.pressed
    }
}

/// Owns the latest decoded values, the current display mode and the
/// button debouncer. All mutation goes through `&mut self`.
pub struct Speedometer {
    values: LatestValues,
    mode: DisplayMode,
    debouncer: Debouncer,
    brand_label: String,
}

impl Speedometer {
    pub fn new(debounce: Duration, brand_label: impl Into<String>) -> Self {
        Self {
            values: LatestValues::new(),
            mode: DisplayMode::default(),
            debouncer: Debouncer::new(debounce),
            brand_label: brand_label.into(),
        }
    }

    pub fn from_config(config: &SpeedoConfig) -> Self {
        Self::new(config.debounce_window(), config.brand_label.clone())
    }

    pub fn values(&self) -> &LatestValues {
        &self.values
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Repaint the current mode
    pub fn render(&self, sink: &mut dyn RenderSink) -> Result<()> {
        let ctx = RenderContext {
            values: &self.values,
            brand_label: &self.brand_label,
        };
        render(self.mode, &ctx, sink)
    }

    /// Decode one line; repaint if it was a recognised sentence
    pub fn handle_line(&mut self, line: &str, sink: &mut dyn RenderSink) -> Result<Option<Sentence>> {
        let decoded = decode_sentence(&mut self.values, line);
        match decoded {
            Some(kind) => {
                debug!("Decoded {:?} sentence", kind);
                for entry in self.values.summary_lines() {
                    debug!("  {}", entry);
                }
                self.render(sink)?;
            }
            None => trace!("Ignored line: {}", line),
        }
        Ok(decoded)
    }

    /// Step to the next mode
    pub fn advance_mode(&mut self) -> DisplayMode {
        self.mode = self.mode.next();
        self.mode
    }

    /// Feed one button sample; on a clean press advance the mode and repaint
    pub fn handle_button(&mut self, level: Level, now: Instant, sink: &mut dyn RenderSink) -> Result<bool> {
        if self.debouncer.update(level, now).is_none() {
            return Ok(false);
        }
        let mode = self.advance_mode();
        info!("Button pressed - mode changed to {}", mode);
        self.render(sink)?;
        Ok(true)
    }

    /// One pass of the control loop: at most one line, one button sample
    pub fn tick(
        &mut self,
        lines: &mut dyn LineSource,
        button: &mut dyn ButtonInput,
        now: Instant,
        sink: &mut dyn RenderSink,
    ) -> Result<TickOutcome> {
        let decoded = match lines.poll_line() {
            Some(line) => self.handle_line(&line, sink)?,
            None => None,
        };
        let level = button.read_level()?;
        let pressed = self.handle_button(level, now, sink)?;

        Ok(TickOutcome { decoded, pressed })
    }

    /// Run the control loop until Ctrl+C or the button input asks to quit
    pub async fn run(
        &mut self,
        lines: &mut dyn LineSource,
        button: &mut dyn ButtonInput,
        sink: &mut dyn RenderSink,
        tick_period: Duration,
    ) -> Result<()> {
        let mut interval = tokio::time::interval(tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut source_ended = false;
        self.render(sink)?;

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Interrupted");
                    break;
                }
                _ = interval.tick() => {
                    self.tick(lines, button, Instant::now(), sink)?;

                    if button.quit_requested() {
                        info!("Quit requested");
                        break;
                    }
                    if !source_ended && lines.is_finished() {
                        warn!("GPS source ended; showing last known values");
                        source_ended = true;
                    }
                }
            }
        }

        Ok(())
    }
}

/// List available serial ports
pub fn list_serial_ports() -> Result<()> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| SpeedoError::Other(format!("Failed to list serial ports: {}", e)))?;

    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        println!("Available serial ports:");
        for port in ports {
            println!("  {} - {:?}", port.port_name, port.port_type);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DrawOp, RecordingSink};
    use std::collections::VecDeque;

    const GGA: &str = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
    const VTG: &str = "$GPVTG,054.7,T,034.4,M,010.0,N,018.5,K*48";

    /// Button that replays a fixed level sequence, then stays idle
    struct ScriptedButton {
        levels: VecDeque<Level>,
    }

    impl ScriptedButton {
        fn idle() -> Self {
            Self { levels: VecDeque::new() }
        }
    }

    impl ButtonInput for ScriptedButton {
        fn read_level(&mut self) -> Result<Level> {
            Ok(self.levels.pop_front().unwrap_or(Level::High))
        }
    }

    /// Idle button that asks to quit once it has been read `quit_after` times
    struct QuittingButton {
        reads: usize,
        quit_after: usize,
    }

    impl ButtonInput for QuittingButton {
        fn read_level(&mut self) -> Result<Level> {
            self.reads += 1;
            Ok(Level::High)
        }

        fn quit_requested(&self) -> bool {
            self.reads >= self.quit_after
        }
    }

    fn speedometer() -> Speedometer {
        Speedometer::new(Duration::from_millis(50), "Mellow_labs")
    }

    fn press(speedo: &mut Speedometer, sink: &mut RecordingSink, t: Instant) -> Instant {
        speedo.handle_button(Level::Low, t, sink).unwrap();
        speedo.handle_button(Level::Low, t + Duration::from_millis(50), sink).unwrap();
        speedo.handle_button(Level::High, t + Duration::from_millis(100), sink).unwrap();
        speedo.handle_button(Level::High, t + Duration::from_millis(150), sink).unwrap();
        t + Duration::from_millis(200)
    }

    #[test]
    fn test_decode_triggers_render() {
        let mut speedo = speedometer();
        let mut sink = RecordingSink::new();

        assert_eq!(speedo.handle_line(VTG, &mut sink).unwrap(), Some(Sentence::Velocity));
        assert_eq!(sink.lines(), ["11.51 MPH", "18.52 km/h", "Sats: "]);
    }

    #[test]
    fn test_ignored_line_does_not_render() {
        let mut speedo = speedometer();
        let mut sink = RecordingSink::new();

        assert_eq!(speedo.handle_line("$GPRMC,123519,A", &mut sink).unwrap(), None);
        assert!(sink.ops.is_empty());
    }

    #[test]
    fn test_press_advances_and_renders() {
        let mut speedo = speedometer();
        let mut sink = RecordingSink::new();
        speedo.handle_line(GGA, &mut sink).unwrap();
        sink.take();

        let t0 = Instant::now();
        assert!(!speedo.handle_button(Level::Low, t0, &mut sink).unwrap());
        assert!(sink.ops.is_empty());
        assert!(speedo.handle_button(Level::Low, t0 + Duration::from_millis(50), &mut sink).unwrap());

        assert_eq!(speedo.mode(), DisplayMode::MphOnly);
        assert_eq!(sink.lines(), ["0.00Mph"]);
    }

    #[test]
    fn test_five_presses_cycle_back() {
        let mut speedo = speedometer();
        let mut sink = RecordingSink::new();
        let mut t = Instant::now();

        let mut seen = Vec::new();
        for _ in 0..5 {
            t = press(&mut speedo, &mut sink, t);
            seen.push(speedo.mode());
        }
        assert_eq!(
            seen,
            [
                DisplayMode::MphOnly,
                DisplayMode::KmhOnly,
                DisplayMode::Brand,
                DisplayMode::Blank,
                DisplayMode::Full,
            ]
        );
    }

    #[test]
    fn test_blank_mode_still_tracks_values() {
        let mut speedo = speedometer();
        let mut sink = RecordingSink::new();
        let mut t = Instant::now();
        for _ in 0..4 {
            t = press(&mut speedo, &mut sink, t);
        }
        assert_eq!(speedo.mode(), DisplayMode::Blank);
        sink.take();

        speedo.handle_line(VTG, &mut sink).unwrap();
        assert_eq!(sink.ops, vec![DrawOp::Clear, DrawOp::SetCursor(0, 0), DrawOp::Flush]);

        // Leaving blank shows the value that arrived while blank
        press(&mut speedo, &mut sink, t);
        assert_eq!(sink.lines()[0], "11.51 MPH");
    }

    #[test]
    fn test_tick_takes_one_line() {
        let mut speedo = speedometer();
        let mut sink = RecordingSink::new();
        let mut lines: VecDeque<String> = VecDeque::from(vec![GGA.to_string(), VTG.to_string()]);
        let mut button = ScriptedButton::idle();
        let t0 = Instant::now();

        let outcome = speedo.tick(&mut lines, &mut button, t0, &mut sink).unwrap();
        assert_eq!(outcome.decoded, Some(Sentence::Fix));
        assert!(outcome.rendered());
        assert_eq!(lines.len(), 1);

        let outcome = speedo.tick(&mut lines, &mut button, t0, &mut sink).unwrap();
        assert_eq!(outcome.decoded, Some(Sentence::Velocity));

        let outcome = speedo.tick(&mut lines, &mut button, t0, &mut sink).unwrap();
        assert_eq!(outcome, TickOutcome::default());
        assert!(!outcome.rendered());
    }

    #[test]
    fn test_tick_reads_button() {
        let mut speedo = speedometer();
        let mut sink = RecordingSink::new();
        let mut lines: VecDeque<String> = VecDeque::new();
        let mut button = ScriptedButton {
            levels: VecDeque::from(vec![Level::Low; 10]),
        };
        let t0 = Instant::now();

        let mut presses = 0;
        for i in 0..10 {
            let now = t0 + Duration::from_millis(i * 10);
            if speedo.tick(&mut lines, &mut button, now, &mut sink).unwrap().pressed {
                presses += 1;
            }
        }
        assert_eq!(presses, 1);
        assert_eq!(speedo.mode(), DisplayMode::MphOnly);
    }

    #[test]
    fn test_source_from_config() {
        let mut config = SpeedoConfig::default();
        assert!(matches!(GpsSource::from_config(&config), Err(SpeedoError::Config(_))));

        config.update_serial("/dev/ttyUSB0".to_string(), 4800);
        assert_eq!(
            GpsSource::from_config(&config).unwrap(),
            GpsSource::Serial { port: "/dev/ttyUSB0".to_string(), baudrate: 4800 }
        );

        config.update_replay("log.nmea".to_string(), 5);
        assert_eq!(
            GpsSource::from_config(&config).unwrap(),
            GpsSource::Replay { path: "log.nmea".to_string(), interval: Duration::from_millis(5) }
        );
    }

    #[tokio::test]
    async fn test_replay_source_feeds_lines() {
        let path = std::env::temp_dir().join(format!("gps-speedometer-replay-{}.nmea", std::process::id()));
        std::fs::write(&path, format!("{}\r\n\r\n{}\r\n", GGA, VTG)).unwrap();

        let source = GpsSource::Replay {
            path: path.to_string_lossy().into_owned(),
            interval: Duration::from_millis(1),
        };
        let mut lines = source.connect().await.unwrap();

        let mut received = Vec::new();
        for _ in 0..200 {
            while let Some(line) = lines.poll_line() {
                received.push(line);
            }
            if lines.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(received, [GGA.to_string(), VTG.to_string()]);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_missing_replay_file() {
        let source = GpsSource::Replay {
            path: "/nonexistent/drive.nmea".to_string(),
            interval: Duration::from_millis(1),
        };
        assert!(matches!(source.connect().await, Err(SpeedoError::Connection(_))));
    }

    #[tokio::test]
    async fn test_non_utf8_line_is_skipped() {
        let input: &[u8] = b"\xff\xfe noise\r\n$GPVTG,054.7,T,034.4,M,010.0,N,018.5,K*48\r\n";
        let (tx, mut lines) = ChannelLines::channel();

        forward_lines(input, tx, None).await.unwrap();

        assert_eq!(lines.poll_line().as_deref(), Some(VTG));
        assert_eq!(lines.poll_line(), None);
        assert!(lines.is_finished());
    }

    #[tokio::test]
    async fn test_replay_survives_line_noise() {
        let path = std::env::temp_dir().join(format!("gps-speedometer-noise-{}.nmea", std::process::id()));
        let mut contents = b"\xff\xfe noise\r\n".to_vec();
        contents.extend_from_slice(format!("{}\r\n", VTG).as_bytes());
        std::fs::write(&path, contents).unwrap();

        let source = GpsSource::Replay {
            path: path.to_string_lossy().into_owned(),
            interval: Duration::from_millis(1),
        };
        let mut lines = source.connect().await.unwrap();

        let mut received = Vec::new();
        for _ in 0..200 {
            while let Some(line) = lines.poll_line() {
                received.push(line);
            }
            if lines.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(received, [VTG.to_string()]);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_run_renders_until_quit() {
        let mut speedo = speedometer();
        let mut sink = RecordingSink::new();
        let mut lines: VecDeque<String> = VecDeque::from(vec![GGA.to_string(), VTG.to_string()]);
        let mut button = QuittingButton { reads: 0, quit_after: 3 };

        speedo
            .run(&mut lines, &mut button, &mut sink, Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(button.reads, 3);
        // Start-up paint, then one repaint per decoded sentence
        let clears = sink.ops.iter().filter(|op| **op == DrawOp::Clear).count();
        assert_eq!(clears, 3);
        assert_eq!(&sink.lines()[..3], ["0.00 MPH", "0.00 km/h", "Sats: "]);
        let lines_drawn = sink.lines();
        assert_eq!(
            &lines_drawn[lines_drawn.len() - 4..],
            ["11.51 MPH", "18.52 km/h", "Sats: 08", "12:35:19"]
        );
        assert_eq!(sink.ops.last(), Some(&DrawOp::Flush));
    }

    #[tokio::test]
    async fn test_run_keeps_going_after_source_ends() {
        let mut speedo = speedometer();
        let mut sink = RecordingSink::new();
        let mut lines: VecDeque<String> = VecDeque::new();
        let mut button = QuittingButton { reads: 0, quit_after: 5 };

        speedo
            .run(&mut lines, &mut button, &mut sink, Duration::from_millis(1))
            .await
            .unwrap();

        assert_eq!(button.reads, 5);
        let clears = sink.ops.iter().filter(|op| **op == DrawOp::Clear).count();
        assert_eq!(clears, 1);
    }
}
