// src/gps/source.rs
//! Non-blocking sources of complete NMEA lines

use std::collections::VecDeque;
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Something the control loop can ask for at most one line per tick.
pub trait LineSource {
    /// Next complete line, or `None` when nothing is waiting right now.
    fn poll_line(&mut self) -> Option<String>;

    /// True once no further lines will ever arrive.
    fn is_finished(&self) -> bool {
        false
    }
}

/// Lines handed over by a reader task through an unbounded channel
pub struct ChannelLines {
    rx: mpsc::UnboundedReceiver<String>,
    finished: bool,
}

impl ChannelLines {
    pub fn new(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self { rx, finished: false }
    }

    /// Create a connected sender/source pair
    pub fn channel() -> (mpsc::UnboundedSender<String>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx))
    }
}

impl LineSource for ChannelLines {
    fn poll_line(&mut self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                None
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

impl LineSource for VecDeque<String> {
    fn poll_line(&mut self) -> Option<String> {
        self.pop_front()
    }

    fn is_finished(&self) -> bool {
        self.is_empty()
    }
}
