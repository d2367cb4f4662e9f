// src/display/mode.rs
//! Display modes and the view drawn for each

use super::{RenderSink, TextSize};
use crate::{
    error::Result,
    format::{format_speed, format_time},
    gps::LatestValues,
};
use std::fmt;

/// The five views, cycled by the button in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Full,
    MphOnly,
    KmhOnly,
    Brand,
    Blank,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 5] = [
        DisplayMode::Full,
        DisplayMode::MphOnly,
        DisplayMode::KmhOnly,
        DisplayMode::Brand,
        DisplayMode::Blank,
    ];

    /// The mode after this one, wrapping from `Blank` back to `Full`
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Full => "full",
            DisplayMode::MphOnly => "mph",
            DisplayMode::KmhOnly => "km/h",
            DisplayMode::Brand => "brand",
            DisplayMode::Blank => "blank",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a view may draw from
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub values: &'a LatestValues,
    pub brand_label: &'a str,
}

type ViewFn = fn(&RenderContext<'_>, &mut dyn RenderSink) -> Result<()>;

// Indexed by `DisplayMode as usize`.
const VIEWS: [ViewFn; 5] = [draw_full, draw_mph, draw_kmh, draw_brand, draw_blank];

/// Repaint the whole frame for `mode`.
pub fn render(mode: DisplayMode, ctx: &RenderContext<'_>, sink: &mut dyn RenderSink) -> Result<()> {
    sink.clear()?;
    sink.set_cursor(0, 0)?;
    VIEWS[mode.index()](ctx, sink)?;
    sink.flush()
}

fn draw_full(ctx: &RenderContext<'_>, sink: &mut dyn RenderSink) -> Result<()> {
    let values = ctx.values;
    sink.set_text_size(TextSize::Small)?;
    sink.write_line(&format!("{} MPH", format_speed(values.speed_mph)))?;
    sink.write_line(&format!("{} km/h", format_speed(values.speed_kmh())))?;
    sink.write_line(&format!("Sats: {}", values.fix.satellite_count))?;
    if let Some(time) = format_time(&values.fix.time_raw) {
        sink.write_line(&time)?;
    }
    Ok(())
}

fn draw_mph(ctx: &RenderContext<'_>, sink: &mut dyn RenderSink) -> Result<()> {
    sink.set_text_size(TextSize::Large)?;
    sink.write_line(&format!("{}Mph", format_speed(ctx.values.speed_mph)))
}

fn draw_kmh(ctx: &RenderContext<'_>, sink: &mut dyn RenderSink) -> Result<()> {
    sink.set_text_size(TextSize::Large)?;
    sink.write_line(&format!("{}Km", format_speed(ctx.values.speed_kmh())))
}

fn draw_brand(ctx: &RenderContext<'_>, sink: &mut dyn RenderSink) -> Result<()> {
    sink.set_text_size(TextSize::Medium)?;
    sink.write_line(ctx.brand_label)
}

fn draw_blank(_ctx: &RenderContext<'_>, _sink: &mut dyn RenderSink) -> Result<()> {
    Ok(())
}
