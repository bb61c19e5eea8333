//! Rendering: the drawing-surface abstraction and shared draw helpers.
//!
//! Tools draw through the [`Surface`] trait so the same draw code targets a
//! browser canvas ([`crate::canvas2d`]) or a command recorder
//! ([`crate::recording`]). Draw functions read only cached pixel geometry and
//! options; they never touch chart scales.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::{GLYPH_WIDTH_RATIO, HANDLE_DRAW_RADIUS_PX, LABEL_OFFSET_PX, LABEL_PADDING_PX, LINE_HEIGHT_RATIO};
use crate::error::DrawError;
use crate::geometry::{BoundingBox, Point};
use crate::options::ToolOptions;

/// Minimal 2D drawing surface.
///
/// Text is laid out from its top-left corner in a sans-serif font.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    /// Set stroke color, width, and dash pattern (empty for solid).
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the dash pattern.
    fn set_stroke(&mut self, color: &str, width: f64, dash: &[f64]) -> Result<(), DrawError>;
    fn set_fill(&mut self, color: &str);
    fn set_font(&mut self, size_px: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn quadratic_curve_to(&mut self, ctrl: Point, end: Point);
    /// Add a full circle to the current path.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the surface rejects the radius.
    fn arc(&mut self, center: Point, radius: f64) -> Result<(), DrawError>;
    fn close_path(&mut self);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn fill_rect(&mut self, rect: BoundingBox);
    fn stroke_rect(&mut self, rect: BoundingBox);
    /// # Errors
    ///
    /// Returns `Err` if the surface fails to draw the text.
    fn fill_text(&mut self, text: &str, top_left: Point) -> Result<(), DrawError>;
}

/// Where a label sits relative to its reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    /// Box top-left corner at the point.
    TopLeft,
    /// Box centered horizontally, bottom edge above the point.
    Above,
    /// Box centered horizontally, top edge below the point.
    Below,
    /// Box vertically centered, left edge right of the point.
    Right,
}

/// A text label with an estimated bounding box.
///
/// Sizes come from fixed glyph ratios rather than measured text, so the same
/// box is used for drawing and hit-testing.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub lines: Vec<String>,
    pub bbox: BoundingBox,
    pub font_size: f64,
}

impl Label {
    #[must_use]
    pub fn new(text: &str, at: Point, placement: LabelPlacement, font_size: f64) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();
        let lines = if lines.is_empty() { vec![String::new()] } else { lines };
        let (w, h) = estimate_text_size(&lines, font_size);
        let origin = match placement {
            LabelPlacement::TopLeft => at,
            LabelPlacement::Above => Point::new(at.x - w * 0.5, at.y - LABEL_OFFSET_PX - h),
            LabelPlacement::Below => Point::new(at.x - w * 0.5, at.y + LABEL_OFFSET_PX),
            LabelPlacement::Right => Point::new(at.x + LABEL_OFFSET_PX, at.y - h * 0.5),
        };
        Self {
            lines,
            bbox: BoundingBox::new(origin, Point::new(origin.x + w, origin.y + h)),
            font_size,
        }
    }
}

/// Estimated `(width, height)` of a padded text block.
#[must_use]
pub fn estimate_text_size(lines: &[String], font_size: f64) -> (f64, f64) {
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    #[allow(clippy::cast_precision_loss)]
    let (chars, rows) = (longest as f64, lines.len().max(1) as f64);
    let w = chars * font_size * GLYPH_WIDTH_RATIO + LABEL_PADDING_PX * 2.0;
    let h = rows * font_size * LINE_HEIGHT_RATIO + LABEL_PADDING_PX * 2.0;
    (w, h)
}

/// Apply the tool's stroke color, width, and dash style.
///
/// # Errors
///
/// Propagates [`Surface::set_stroke`] failures.
pub fn apply_stroke(surface: &mut dyn Surface, options: &ToolOptions) -> Result<(), DrawError> {
    let width = options.line_width();
    surface.set_stroke(options.line_color(), width, &options.line_style().dash(width))
}

pub fn stroke_segments(surface: &mut dyn Surface, segments: &[[Point; 2]]) {
    if segments.is_empty() {
        return;
    }
    surface.begin_path();
    for [a, b] in segments {
        surface.move_to(*a);
        surface.line_to(*b);
    }
    surface.stroke();
}

pub fn stroke_polyline(surface: &mut dyn Surface, points: &[Point], closed: bool) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    surface.begin_path();
    surface.move_to(*first);
    for p in rest {
        surface.line_to(*p);
    }
    if closed {
        surface.close_path();
    }
    surface.stroke();
}

pub fn fill_polygon(surface: &mut dyn Surface, points: &[Point], color: &str) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    surface.set_fill(color);
    surface.begin_path();
    surface.move_to(*first);
    for p in rest {
        surface.line_to(*p);
    }
    surface.close_path();
    surface.fill();
}

/// Draw selection handles as white circles with a blue outline.
///
/// # Errors
///
/// Propagates surface failures.
pub fn draw_handles(surface: &mut dyn Surface, handles: &[Point]) -> Result<(), DrawError> {
    if handles.is_empty() {
        return Ok(());
    }
    surface.save();
    let drawn = handle_circles(surface, handles);
    surface.restore();
    drawn
}

fn handle_circles(surface: &mut dyn Surface, handles: &[Point]) -> Result<(), DrawError> {
    surface.set_stroke("#2962FF", 1.0, &[])?;
    surface.set_fill("#FFFFFF");
    for h in handles {
        surface.begin_path();
        surface.arc(*h, HANDLE_DRAW_RADIUS_PX)?;
        surface.fill();
        surface.stroke();
    }
    Ok(())
}

/// Draw a label's background box and its text lines.
///
/// # Errors
///
/// Propagates surface failures.
pub fn draw_label(surface: &mut dyn Surface, label: &Label, background: &str, color: &str) -> Result<(), DrawError> {
    surface.save();
    if background != "transparent" {
        surface.set_fill(background);
        surface.fill_rect(label.bbox);
    }
    surface.set_fill(color);
    surface.set_font(label.font_size);
    let drawn = label_lines(surface, label);
    surface.restore();
    drawn
}

fn label_lines(surface: &mut dyn Surface, label: &Label) -> Result<(), DrawError> {
    let line_height = label.font_size * LINE_HEIGHT_RATIO;
    for (i, line) in label.lines.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y = label.bbox.min.y + LABEL_PADDING_PX + line_height * i as f64;
        surface.fill_text(line, Point::new(label.bbox.min.x + LABEL_PADDING_PX, y))?;
    }
    Ok(())
}
