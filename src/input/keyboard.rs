// src/input/keyboard.rs
//! Keyboard stand-in for the hardware mode button

use super::{ButtonInput, Level};
use crate::error::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

/// Space or Enter pulls the simulated line low for `hold`. Another key
/// event inside that window extends it. Terminal auto-repeat usually starts
/// later than `hold`, so holding the key down steps through modes at the
/// repeat rate instead of acting as one long press. `q`, Esc and Ctrl+C
/// request shutdown.
///
/// Needs the terminal in raw mode, which [`TerminalDisplay`] sets up.
///
/// [`TerminalDisplay`]: crate::display::terminal::TerminalDisplay
pub struct KeyboardButton {
    hold: Duration,
    low_until: Option<Instant>,
    quit: bool,
}

impl KeyboardButton {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            low_until: None,
            quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.low_until = Some(now + self.hold),
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            _ => {}
        }
    }

    fn level_at(&self, now: Instant) -> Level {
        match self.low_until {
            Some(until) if now < until => Level::Low,
            _ => Level::High,
        }
    }
}

impl ButtonInput for KeyboardButton {
    fn read_level(&mut self) -> Result<Level> {
        let now = Instant::now();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, now);
            }
        }
        Ok(self.level_at(now))
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_space_holds_line_low() {
        let mut button = KeyboardButton::new(Duration::from_millis(120));
        let t0 = Instant::now();
        assert_eq!(button.level_at(t0), Level::High);

        button.handle_key(key(KeyCode::Char(' ')), t0);
        assert_eq!(button.level_at(t0 + Duration::from_millis(119)), Level::Low);
        assert_eq!(button.level_at(t0 + Duration::from_millis(120)), Level::High);
    }

    #[test]
    fn test_key_within_hold_extends_it() {
        let mut button = KeyboardButton::new(Duration::from_millis(120));
        let t0 = Instant::now();

        button.handle_key(key(KeyCode::Char(' ')), t0);
        button.handle_key(key(KeyCode::Char(' ')), t0 + Duration::from_millis(100));
        assert_eq!(button.level_at(t0 + Duration::from_millis(200)), Level::Low);
        assert_eq!(button.level_at(t0 + Duration::from_millis(220)), Level::High);
    }

    #[test]
    fn test_quit_keys() {
        let mut button = KeyboardButton::new(Duration::from_millis(120));
        button.handle_key(key(KeyCode::Char('x')), Instant::now());
        assert!(!button.quit_requested());

        button.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(button.quit_requested());
    }
}
