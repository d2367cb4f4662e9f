// src/display/terminal.rs
//! Terminal emulation of the 128x32 OLED panel

use super::{RenderSink, TextSize};
use crate::error::{Result, SpeedoError};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::io::{self, Stdout, Write};

pub const PANEL_WIDTH_PX: u16 = 128;
pub const PANEL_HEIGHT_PX: u16 = 32;

// Size-1 glyph cell of the panel font
const CELL_WIDTH_PX: u16 = 6;
const CELL_HEIGHT_PX: u16 = 8;

pub const COLUMNS: usize = (PANEL_WIDTH_PX / CELL_WIDTH_PX) as usize;
pub const ROWS: usize = (PANEL_HEIGHT_PX / CELL_HEIGHT_PX) as usize;

/// Character-cell frame buffer with the panel's wrap and clip behaviour.
///
/// A glyph at size `n` covers `n` cells across and `n` rows down; the
/// glyph itself is drawn in the top-left cell of that block.
#[derive(Debug, Clone)]
pub struct TextFrame {
    cells: Vec<Vec<char>>,
    col: usize,
    row: usize,
    size: TextSize,
}

impl TextFrame {
    pub fn new() -> Self {
        Self {
            cells: vec![vec![' '; COLUMNS]; ROWS],
            col: 0,
            row: 0,
            size: TextSize::Small,
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(' ');
        }
        self.col = 0;
        self.row = 0;
    }

    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.col = usize::from(x / CELL_WIDTH_PX);
        self.row = usize::from(y / CELL_HEIGHT_PX);
    }

    pub fn set_size(&mut self, size: TextSize) {
        self.size = size;
    }

    pub fn write_line(&mut self, text: &str) {
        let scale = usize::from(self.size.scale());
        for ch in text.chars() {
            if self.col + scale > COLUMNS {
                self.newline(scale);
            }
            if let Some(cell) = self.cells.get_mut(self.row).and_then(|r| r.get_mut(self.col)) {
                *cell = ch;
            }
            self.col += scale;
        }
        self.newline(scale);
    }

    fn newline(&mut self, scale: usize) {
        self.col = 0;
        self.row += scale;
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells.iter().map(|row| row.iter().collect()).collect()
    }
}

impl Default for TextFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Draws frames to stdout. Holds the terminal in raw mode until dropped.
pub struct TerminalDisplay {
    stdout: Stdout,
    frame: TextFrame,
}

impl TerminalDisplay {
    /// Take over the terminal. Fails when stdout is not an interactive terminal.
    pub fn init() -> Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()
            .map_err(|e| SpeedoError::Display(format!("Failed to enter raw mode: {}", e)))?;
        execute!(stdout, Hide, DisableLineWrap, Clear(ClearType::All))
            .map_err(|e| SpeedoError::Display(format!("Failed to prepare terminal: {}", e)))?;

        Ok(Self {
            stdout,
            frame: TextFrame::new(),
        })
    }

    fn draw_border(&mut self) -> Result<()> {
        execute!(
            self.stdout,
            SetForegroundColor(Color::DarkGrey),
            Print(format!("+{}+\r\n", "-".repeat(COLUMNS))),
            ResetColor
        )?;
        Ok(())
    }
}

impl RenderSink for TerminalDisplay {
    fn clear(&mut self) -> Result<()> {
        self.frame.clear();
        Ok(())
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.frame.set_cursor(x, y);
        Ok(())
    }

    fn set_text_size(&mut self, size: TextSize) -> Result<()> {
        self.frame.set_size(size);
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.frame.write_line(text);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;

        self.draw_border()?;
        for row in self.frame.rows() {
            execute!(
                self.stdout,
                SetForegroundColor(Color::DarkGrey),
                Print("|"),
                SetForegroundColor(Color::Cyan),
                Print(row),
                SetForegroundColor(Color::DarkGrey),
                Print("|\r\n"),
                ResetColor
            )?;
        }
        self.draw_border()?;

        execute!(self.stdout, Print("space: next mode   q: quit\r\n"))?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, Show, EnableLineWrap);
        let _ = terminal::disable_raw_mode();
    }
}
