// src/input/mod.rs
//! Mode button: level input and debouncing

pub mod keyboard;

pub use keyboard::KeyboardButton;

use crate::error::Result;
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Electrical level of the button line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    High,
    Low,
}

impl Level {
    /// The button pulls the line low while pressed.
    pub const ACTIVE: Level = Level::Low;
    pub const IDLE: Level = Level::High;
}

/// A digital input read once per tick without blocking
pub trait ButtonInput {
    fn read_level(&mut self) -> Result<Level>;

    /// Whether the user asked the program to stop
    fn quit_requested(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Stable,
    Unstable { level: Level, since: Instant },
}

/// Turns a bouncing level into one `Pressed` event per genuine press.
///
/// A new level must be seen continuously for `window` before it replaces
/// the stable level. Only a stable transition into [`Level::ACTIVE`] emits.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    stable: Level,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            stable: Level::IDLE,
            state: DebounceState::Stable,
        }
    }

    /// The last level that survived the debounce window
    pub fn stable_level(&self) -> Level {
        self.stable
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.state, DebounceState::Unstable { .. })
    }

    /// Feed one sample taken at `now`.
    pub fn update(&mut self, level: Level, now: Instant) -> Option<ButtonEvent> {
        match self.state {
            DebounceState::Stable => {
                if level != self.stable {
                    self.state = DebounceState::Unstable { level, since: now };
                }
                None
            }
            DebounceState::Unstable { level: pending, since } => {
                if level != pending {
                    self.state = DebounceState::Unstable { level, since: now };
                    return None;
                }
                if now.saturating_duration_since(since) < self.window {
                    return None;
                }

                self.state = DebounceState::Stable;
                if level == self.stable {
                    return None;
                }
                self.stable = level;
                (level == Level::ACTIVE).then_some(ButtonEvent::Pressed)
            }
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
