// src/display/mod.rs
//! Rendering sinks and the display mode views

pub mod mode;
pub mod terminal;

pub use mode::{render, DisplayMode, RenderContext};

use crate::error::Result;

/// Text scale, matching the 1/2/3 sizes of the OLED font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl TextSize {
    pub fn scale(self) -> u8 {
        self as u8
    }
}

/// A text display that is repainted one whole frame at a time.
pub trait RenderSink {
    /// Blank the frame buffer
    fn clear(&mut self) -> Result<()>;

    fn set_cursor(&mut self, x: u16, y: u16) -> Result<()>;

    fn set_text_size(&mut self, size: TextSize) -> Result<()>;

    /// Draw `text` at the cursor and move the cursor to the next line
    fn write_line(&mut self, text: &str) -> Result<()>;

    /// Push the frame buffer to the screen
    fn flush(&mut self) -> Result<()>;
}

/// One call made against a [`RenderSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear,
    SetCursor(u16, u16),
    SetTextSize(TextSize),
    WriteLine(String),
    Flush,
}

/// Sink that records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub ops: Vec<DrawOp>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded ops, leaving the sink empty
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Text of every `WriteLine` op, in order
    pub fn lines(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::WriteLine(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn clear(&mut self) -> Result<()> {
        self.ops.push(DrawOp::Clear);
        Ok(())
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.ops.push(DrawOp::SetCursor(x, y));
        Ok(())
    }

    fn set_text_size(&mut self, size: TextSize) -> Result<()> {
        self.ops.push(DrawOp::SetTextSize(size));
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.ops.push(DrawOp::WriteLine(text.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ops.push(DrawOp::Flush);
        Ok(())
    }
}
