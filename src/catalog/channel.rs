//! Parallel channel.
//!
//! Anchors `p1` and `p2` define the baseline; `p3` sets the parallel edge.
//! The edge is the baseline shifted vertically by [`channel_offset`], the
//! price distance from `p3` to the baseline at `p3`'s index. A baseline with
//! no logical extent has slope zero, so the offset degrades to a plain price
//! difference through the same formula.

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

use crate::consts::GEOMETRY_EPSILON;
use crate::coords::{ChartHost, LogicalPoint, point_to_coordinate, resolve_anchors};
use crate::error::DrawError;
use crate::geometry::{Point, extend_and_clip_line_segment, is_point_in_triangle};
use crate::options::{LineStyle, ToolOptions};
use crate::render::{Surface, apply_stroke, fill_polygon, stroke_segments};
use crate::tool::{HitTestResult, Tool};

use super::{near_segments, nearest_handle, set_anchor};

fn slope(p1: LogicalPoint, p2: LogicalPoint) -> f64 {
    let span = p2.logical - p1.logical;
    if span.abs() < GEOMETRY_EPSILON {
        0.0
    } else {
        (p2.price - p1.price) / span
    }
}

/// Vertical price offset from the baseline to the parallel edge.
///
/// `p3.price - (p1.price + slope * (p3.logical - p1.logical))`.
#[must_use]
pub fn channel_offset(anchors: &[LogicalPoint]) -> Option<f64> {
    let [p1, p2, p3] = match anchors {
        [a, b, c, ..] => [*a, *b, *c],
        _ => return None,
    };
    Some(p3.price - slope(p1, p2).mul_add(p3.logical - p1.logical, p1.price))
}

/// Lower and upper channel price at `logical`, or `None` outside the
/// baseline's logical span.
#[must_use]
pub fn channel_bounds_at(anchors: &[LogicalPoint], logical: f64) -> Option<(f64, f64)> {
    let offset = channel_offset(anchors)?;
    let (p1, p2) = (anchors[0], anchors[1]);
    let lo = p1.logical.min(p2.logical);
    let hi = p1.logical.max(p2.logical);
    if !logical.is_finite() || logical < lo - GEOMETRY_EPSILON || logical > hi + GEOMETRY_EPSILON {
        return None;
    }
    let base = slope(p1, p2).mul_add(logical - p1.logical, p1.price);
    let edge = base + offset;
    Some((base.min(edge), base.max(edge)))
}

/// Baseline anchors keep the channel width by carrying `p3` along.
pub(crate) fn update_anchor(anchors: &mut [LogicalPoint], index: usize, point: LogicalPoint) -> bool {
    match index {
        0 | 1 if anchors.len() >= 3 => {
            let Some(offset) = channel_offset(anchors) else {
                return false;
            };
            anchors[index] = point;
            let p3 = anchors[2];
            anchors[2].price = slope(anchors[0], anchors[1]).mul_add(p3.logical - anchors[0].logical, anchors[0].price)
                + offset;
            true
        }
        _ => set_anchor(anchors, index, point),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelGeometry {
    pub top: [Point; 2],
    pub bottom: [Point; 2],
    pub middle: Option<[Point; 2]>,
    pub handles: Vec<Point>,
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<ChannelGeometry> {
    let handles = resolve_anchors(host, &tool.anchors, 3)?;
    let offset = channel_offset(&tool.anchors)?;
    let (p1, p2) = (tool.anchors[0], tool.anchors[1]);
    let b1 = point_to_coordinate(host, p1.offset(0.0, offset)).resolved()?;
    let b2 = point_to_coordinate(host, p2.offset(0.0, offset)).resolved()?;

    let options = &tool.options;
    let pane = host.pane_size();
    let clip = |a: Point, b: Point| {
        extend_and_clip_line_segment(a, b, pane.width, pane.height, options.extend_left(), options.extend_right())
    };
    let top = clip(handles[0], handles[1])?;
    let bottom = clip(b1, b2)?;
    let middle = if options.show_middle_line() {
        clip(handles[0].midpoint(b1), handles[1].midpoint(b2))
    } else {
        None
    };
    Some(ChannelGeometry { top, bottom, middle, handles })
}

pub(crate) fn hit_test(g: &ChannelGeometry, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if let Some(i) = nearest_handle(&g.handles, p) {
        return Some(HitTestResult::point(i));
    }
    let mut edges = vec![g.top, g.bottom];
    edges.extend(g.middle);
    if near_segments(&edges, p, tolerance) {
        return Some(HitTestResult::line());
    }
    let [t0, t1] = g.top;
    let [b0, b1] = g.bottom;
    let inside = is_point_in_triangle(p, t0, t1, b1) || is_point_in_triangle(p, t0, b1, b0);
    inside.then(HitTestResult::shape)
}

pub(crate) fn draw(g: &ChannelGeometry, options: &ToolOptions, surface: &mut dyn Surface) -> Result<(), DrawError> {
    let [t0, t1] = g.top;
    let [b0, b1] = g.bottom;
    fill_polygon(surface, &[t0, t1, b1, b0], options.fill_color());
    apply_stroke(surface, options)?;
    stroke_segments(surface, &[g.top, g.bottom]);
    if let Some(middle) = g.middle {
        let width = options.line_width();
        surface.set_stroke(options.line_color(), width, &LineStyle::Dashed.dash(width))?;
        stroke_segments(surface, &[middle]);
    }
    Ok(())
}
