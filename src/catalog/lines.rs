//! Line-like tools: trend line, ray, extended line, and the axis-aligned
//! horizontal, vertical, and cross lines.
//!
//! The extension flags pick the clip routine once in `layout`, so the
//! segment that is drawn is exactly the segment that is hit-tested.

#[cfg(test)]
#[path = "lines_test.rs"]
mod lines_test;

use crate::consts::GEOMETRY_EPSILON;
use crate::coords::{ChartHost, resolve_anchors};
use crate::error::DrawError;
use crate::geometry::{Point, arrow_points, extend_and_clip_line_segment};
use crate::options::ToolOptions;
use crate::render::{Surface, apply_stroke, stroke_segments};
use crate::tool::{HitTestResult, Tool, ToolKind};

use super::{near_segments, nearest_handle};

#[derive(Debug, Clone, PartialEq)]
pub struct LineGeometry {
    /// Visible extent of each line (cross lines have two).
    pub segments: Vec<[Point; 2]>,
    /// Arrowhead strokes.
    pub arrows: Vec<[Point; 2]>,
    pub handles: Vec<Point>,
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<LineGeometry> {
    let pane = host.pane_size();
    let anchor = *tool.anchors.first()?;
    match tool.kind {
        ToolKind::HorizontalLine => {
            let y = finite(host.price_to_coordinate(anchor.price))?;
            let x = finite(host.logical_to_coordinate(anchor.logical)).unwrap_or(pane.width / 2.0);
            Some(LineGeometry {
                segments: vec![[Point::new(0.0, y), Point::new(pane.width, y)]],
                arrows: Vec::new(),
                handles: vec![Point::new(x, y)],
            })
        }
        ToolKind::VerticalLine => {
            let x = finite(host.logical_to_coordinate(anchor.logical))?;
            let y = finite(host.price_to_coordinate(anchor.price)).unwrap_or(pane.height / 2.0);
            Some(LineGeometry {
                segments: vec![[Point::new(x, 0.0), Point::new(x, pane.height)]],
                arrows: Vec::new(),
                handles: vec![Point::new(x, y)],
            })
        }
        ToolKind::HorizontalRay => {
            let p = resolve_anchors(host, &tool.anchors, 1)?[0];
            let end = Point::new(p.x.max(pane.width), p.y);
            Some(LineGeometry { segments: vec![[p, end]], arrows: Vec::new(), handles: vec![p] })
        }
        ToolKind::CrossLine => {
            let p = resolve_anchors(host, &tool.anchors, 1)?[0];
            Some(LineGeometry {
                segments: vec![
                    [Point::new(0.0, p.y), Point::new(pane.width, p.y)],
                    [Point::new(p.x, 0.0), Point::new(p.x, pane.height)],
                ],
                arrows: Vec::new(),
                handles: vec![p],
            })
        }
        _ => {
            let pts = resolve_anchors(host, &tool.anchors, 2)?;
            let options = &tool.options;
            let (extend_left, extend_right) = (options.extend_left(), options.extend_right());
            let segment =
                extend_and_clip_line_segment(pts[0], pts[1], pane.width, pane.height, extend_left, extend_right)?;
            let width = options.line_width();
            let mut arrows = Vec::new();
            if options.start_arrow() && !extend_left {
                arrows.extend(arrow_points(segment[1], segment[0], width));
            }
            if options.end_arrow() && !extend_right {
                arrows.extend(arrow_points(segment[0], segment[1], width));
            }
            Some(LineGeometry { segments: vec![segment], arrows, handles: pts })
        }
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

pub(crate) fn hit_test(g: &LineGeometry, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if let Some(i) = nearest_handle(&g.handles, p) {
        return Some(HitTestResult::point(i));
    }
    near_segments(&g.segments, p, tolerance).then(HitTestResult::line)
}

pub(crate) fn draw(g: &LineGeometry, options: &ToolOptions, surface: &mut dyn Surface) -> Result<(), DrawError> {
    apply_stroke(surface, options)?;
    stroke_segments(surface, &g.segments);
    if !g.arrows.is_empty() {
        surface.set_stroke(options.line_color(), options.line_width(), &[])?;
        stroke_segments(surface, &g.arrows);
    }
    Ok(())
}

/// Price the tool implies at `logical`.
///
/// Sloped lines interpolate between their anchors and only answer beyond an
/// anchor on a side that is extended. Horizontal lines are constant, the
/// horizontal ray only from its anchor forward, and a vertical line has no
/// single price.
#[must_use]
pub fn price_at_logical(tool: &Tool, logical: f64) -> Option<f64> {
    if !logical.is_finite() {
        return None;
    }
    let a0 = *tool.anchors.first()?;
    if !a0.is_finite() {
        return None;
    }
    match tool.kind {
        ToolKind::HorizontalLine | ToolKind::CrossLine => Some(a0.price),
        ToolKind::HorizontalRay => (logical >= a0.logical - GEOMETRY_EPSILON).then_some(a0.price),
        ToolKind::TrendLine | ToolKind::Ray | ToolKind::ExtendedLine => {
            let a1 = *tool.anchors.get(1)?;
            if !a1.is_finite() {
                return None;
            }
            let span = a1.logical - a0.logical;
            if span.abs() < GEOMETRY_EPSILON {
                return None;
            }
            let t = (logical - a0.logical) / span;
            if t < 0.0 && !tool.options.extend_left() {
                return None;
            }
            if t > 1.0 && !tool.options.extend_right() {
                return None;
            }
            Some(t.mul_add(a1.price - a0.price, a0.price))
        }
        _ => None,
    }
}
