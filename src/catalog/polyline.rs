//! Freehand polylines: brush, highlighter, path.
//!
//! With `smooth` set, the stroke is a chain of quadratic curves whose control
//! points are the raw anchors and whose endpoints are the midpoints between
//! consecutive anchors; the last curve ends on the last anchor. Smoothed
//! strokes hide their handles. Hit-testing runs on the curve flattened into
//! [`CURVE_SAMPLES`] segments per curve.

#[cfg(test)]
#[path = "polyline_test.rs"]
mod polyline_test;

use crate::consts::CURVE_SAMPLES;
use crate::coords::{ChartHost, resolve_anchors};
use crate::error::DrawError;
use crate::geometry::Point;
use crate::options::ToolOptions;
use crate::render::{Surface, apply_stroke};
use crate::tool::{HitTestResult, Tool};

use super::{near_polyline, nearest_handle};

/// One step of a stroke path after the start point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line(Point),
    Quad { ctrl: Point, end: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolylineGeometry {
    pub start: Point,
    pub segments: Vec<PathSegment>,
    /// The path as straight runs, for hit-testing.
    pub flattened: Vec<Point>,
    pub handles: Vec<Point>,
}

/// Build the path steps for `points`.
#[must_use]
pub fn build_path(points: &[Point], smooth: bool) -> Vec<PathSegment> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    if !smooth || n == 2 {
        return points[1..].iter().map(|p| PathSegment::Line(*p)).collect();
    }
    (1..n - 1)
        .map(|i| {
            let ctrl = points[i];
            let end = if i == n - 2 { points[n - 1] } else { ctrl.midpoint(points[i + 1]) };
            PathSegment::Quad { ctrl, end }
        })
        .collect()
}

/// Point on a quadratic Bezier at parameter `t`.
#[must_use]
pub fn quad_point(from: Point, ctrl: Point, end: Point, t: f64) -> Point {
    let u = 1.0 - t;
    from * (u * u) + ctrl * (2.0 * u * t) + end * (t * t)
}

/// Flatten a path into a point run.
#[must_use]
pub fn flatten(start: Point, segments: &[PathSegment]) -> Vec<Point> {
    let mut out = vec![start];
    let mut cursor = start;
    for seg in segments {
        match *seg {
            PathSegment::Line(p) => {
                out.push(p);
                cursor = p;
            }
            PathSegment::Quad { ctrl, end } => {
                for step in 1..=CURVE_SAMPLES {
                    #[allow(clippy::cast_precision_loss)]
                    let t = step as f64 / CURVE_SAMPLES as f64;
                    out.push(quad_point(cursor, ctrl, end, t));
                }
                cursor = end;
            }
        }
    }
    out
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<PolylineGeometry> {
    if tool.anchors.len() < 2 {
        return None;
    }
    let points = resolve_anchors(host, &tool.anchors, tool.anchors.len())?;
    let smooth = tool.options.smooth();
    let segments = build_path(&points, smooth);
    let start = points[0];
    Some(PolylineGeometry {
        start,
        flattened: flatten(start, &segments),
        segments,
        handles: if smooth { Vec::new() } else { points },
    })
}

pub(crate) fn hit_test(g: &PolylineGeometry, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if let Some(i) = nearest_handle(&g.handles, p) {
        return Some(HitTestResult::point(i));
    }
    near_polyline(&g.flattened, false, p, tolerance).then(HitTestResult::line)
}

pub(crate) fn draw(g: &PolylineGeometry, options: &ToolOptions, surface: &mut dyn Surface) -> Result<(), DrawError> {
    apply_stroke(surface, options)?;
    surface.begin_path();
    surface.move_to(g.start);
    for seg in &g.segments {
        match *seg {
            PathSegment::Line(p) => surface.line_to(p),
            PathSegment::Quad { ctrl, end } => surface.quadratic_curve_to(ctrl, end),
        }
    }
    surface.stroke();
    Ok(())
}
