//! A [`Surface`] that records draw calls instead of rasterizing them.
//!
//! Used by headless hosts and tests to inspect what a tool would draw.

use crate::error::DrawError;
use crate::geometry::{BoundingBox, Point};
use crate::render::Surface;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Save,
    Restore,
    SetStroke { color: String, width: f64, dash: Vec<f64> },
    SetFill(String),
    SetFont(f64),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    QuadraticCurveTo { ctrl: Point, end: Point },
    Arc { center: Point, radius: f64 },
    ClosePath,
    Stroke,
    Fill,
    FillRect(BoundingBox),
    StrokeRect(BoundingBox),
    FillText { text: String, at: Point },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<Command>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `stroke` calls recorded.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, Command::Stroke)).count()
    }

    /// Number of `fill` and `fill_rect` calls recorded.
    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Fill | Command::FillRect(_)))
            .count()
    }

    /// All text drawn, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of `arc` calls (handles and circles).
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.commands.iter().filter(|c| matches!(c, Command::Arc { .. })).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.commands.push(Command::Save);
    }

    fn restore(&mut self) {
        self.commands.push(Command::Restore);
    }

    fn set_stroke(&mut self, color: &str, width: f64, dash: &[f64]) -> Result<(), DrawError> {
        self.commands.push(Command::SetStroke { color: color.to_owned(), width, dash: dash.to_vec() });
        Ok(())
    }

    fn set_fill(&mut self, color: &str) {
        self.commands.push(Command::SetFill(color.to_owned()));
    }

    fn set_font(&mut self, size_px: f64) {
        self.commands.push(Command::SetFont(size_px));
    }

    fn begin_path(&mut self) {
        self.commands.push(Command::BeginPath);
    }

    fn move_to(&mut self, p: Point) {
        self.commands.push(Command::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.commands.push(Command::LineTo(p));
    }

    fn quadratic_curve_to(&mut self, ctrl: Point, end: Point) {
        self.commands.push(Command::QuadraticCurveTo { ctrl, end });
    }

    fn arc(&mut self, center: Point, radius: f64) -> Result<(), DrawError> {
        if radius < 0.0 || !radius.is_finite() {
            return Err(DrawError::Surface(format!("invalid arc radius {radius}")));
        }
        self.commands.push(Command::Arc { center, radius });
        Ok(())
    }

    fn close_path(&mut self) {
        self.commands.push(Command::ClosePath);
    }

    fn stroke(&mut self) {
        self.commands.push(Command::Stroke);
    }

    fn fill(&mut self) {
        self.commands.push(Command::Fill);
    }

    fn fill_rect(&mut self, rect: BoundingBox) {
        self.commands.push(Command::FillRect(rect));
    }

    fn stroke_rect(&mut self, rect: BoundingBox) {
        self.commands.push(Command::StrokeRect(rect));
    }

    fn fill_text(&mut self, text: &str, top_left: Point) -> Result<(), DrawError> {
        self.commands.push(Command::FillText { text: text.to_owned(), at: top_left });
        Ok(())
    }
}
