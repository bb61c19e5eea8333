//! Closed shapes: rectangle, circle, triangle.
//!
//! The rectangle stores two corner anchors and exposes eight handles. The
//! [`RECT_HANDLES`] table maps every handle index to what it moves on each
//! axis; the same table places the handles and applies drags, so a handle
//! always moves the stored values it is drawn from. The range tools reuse it.

#[cfg(test)]
#[path = "shapes_test.rs"]
mod shapes_test;

use crate::coords::{ChartHost, LogicalPoint, resolve_anchors};
use crate::error::DrawError;
use crate::geometry::{
    BoundingBox, Point, distance_to_segment, is_point_in_circle, is_point_in_rectangle, is_point_in_triangle,
};
use crate::options::ToolOptions;
use crate::render::{Surface, apply_stroke, fill_polygon, stroke_polyline};
use crate::tool::{HitTestResult, Tool, ToolKind};

use super::{near_polyline, nearest_handle, set_anchor};

/// What a rectangle handle controls on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The stored anchor with this index.
    Anchor(usize),
    /// Whichever stored anchor has the smaller value on this axis.
    Min,
    /// Whichever stored anchor has the larger value on this axis.
    Max,
    /// Not moved; the handle sits at the midpoint of this axis.
    Fixed,
}

/// Per-handle mapping onto the two stored anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleMap {
    pub logical: Slot,
    pub price: Slot,
}

/// Rectangle handles: two stored corners, two derived corners, then the
/// left, right, top, and bottom edge midpoints.
pub const RECT_HANDLES: [HandleMap; 8] = [
    HandleMap { logical: Slot::Anchor(0), price: Slot::Anchor(0) },
    HandleMap { logical: Slot::Anchor(1), price: Slot::Anchor(1) },
    HandleMap { logical: Slot::Anchor(0), price: Slot::Anchor(1) },
    HandleMap { logical: Slot::Anchor(1), price: Slot::Anchor(0) },
    HandleMap { logical: Slot::Min, price: Slot::Fixed },
    HandleMap { logical: Slot::Max, price: Slot::Fixed },
    HandleMap { logical: Slot::Fixed, price: Slot::Max },
    HandleMap { logical: Slot::Fixed, price: Slot::Min },
];

/// Edge handles bound to one stored anchor: the logical edge of anchor 0,
/// of anchor 1, then the price edge of anchor 0, of anchor 1. Reachable as
/// drag indices `RECT_HANDLES.len()..` through [`pin_rect_handle`].
const PINNED_EDGES: [HandleMap; 4] = [
    HandleMap { logical: Slot::Anchor(0), price: Slot::Fixed },
    HandleMap { logical: Slot::Anchor(1), price: Slot::Fixed },
    HandleMap { logical: Slot::Fixed, price: Slot::Anchor(0) },
    HandleMap { logical: Slot::Fixed, price: Slot::Anchor(1) },
];

/// Index of the stored anchor with the smaller (`want_max == false`) or
/// larger value. Ties resolve to anchor 0 for min and anchor 1 for max.
fn extreme(values: [f64; 2], want_max: bool) -> usize {
    if want_max {
        usize::from(values[1] >= values[0])
    } else {
        usize::from(values[1] < values[0])
    }
}

fn slot_anchor(slot: Slot, values: [f64; 2]) -> Option<usize> {
    match slot {
        Slot::Anchor(i) => Some(i),
        Slot::Min => Some(extreme(values, false)),
        Slot::Max => Some(extreme(values, true)),
        Slot::Fixed => None,
    }
}

/// Pixel positions of the eight rectangle handles.
///
/// `anchors` decide which stored corner is min/max on each axis; `px` are
/// those corners resolved to pixels.
#[must_use]
pub fn rect_handles(anchors: &[LogicalPoint], px: [Point; 2]) -> Vec<Point> {
    let [a0, a1] = match anchors {
        [a0, a1, ..] => [*a0, *a1],
        _ => return Vec::new(),
    };
    let logicals = [a0.logical, a1.logical];
    let prices = [a0.price, a1.price];
    RECT_HANDLES
        .iter()
        .map(|m| {
            let x = slot_anchor(m.logical, logicals).map_or((px[0].x + px[1].x) * 0.5, |i| px[i].x);
            let y = slot_anchor(m.price, prices).map_or((px[0].y + px[1].y) * 0.5, |i| px[i].y);
            Point::new(x, y)
        })
        .collect()
}

/// Drag index that keeps edge handle `index` on the stored anchor it moves
/// now. A drag started on an edge midpoint uses this index for every move,
/// so the edge can cross the opposite edge and come back without the two
/// anchors trading places. Other handles map to themselves.
#[must_use]
pub fn pin_rect_handle(anchors: &[LogicalPoint], index: usize) -> usize {
    let (Some(map), [a0, a1, ..]) = (RECT_HANDLES.get(index), anchors) else {
        return index;
    };
    let base = RECT_HANDLES.len();
    match (map.logical, map.price) {
        (slot @ (Slot::Min | Slot::Max), Slot::Fixed) => {
            slot_anchor(slot, [a0.logical, a1.logical]).map_or(index, |i| base + i)
        }
        (Slot::Fixed, slot @ (Slot::Min | Slot::Max)) => {
            slot_anchor(slot, [a0.price, a1.price]).map_or(index, |i| base + 2 + i)
        }
        _ => index,
    }
}

/// Drag rectangle handle `index`: each axis writes only the stored anchor
/// the table names for it. Indices past the eight handles are the pinned
/// edges from [`pin_rect_handle`].
pub(crate) fn drag_rect_handle(anchors: &mut [LogicalPoint], index: usize, point: LogicalPoint) -> bool {
    let pinned = index.checked_sub(RECT_HANDLES.len()).and_then(|i| PINNED_EDGES.get(i));
    let Some(map) = RECT_HANDLES.get(index).or(pinned) else {
        return false;
    };
    if anchors.len() < 2 {
        return false;
    }
    let logicals = [anchors[0].logical, anchors[1].logical];
    let prices = [anchors[0].price, anchors[1].price];
    if let Some(i) = slot_anchor(map.logical, logicals) {
        anchors[i].logical = point.logical;
    }
    if let Some(i) = slot_anchor(map.price, prices) {
        anchors[i].price = point.price;
    }
    true
}

/// Circle: dragging the centre carries the rim point with it.
pub(crate) fn drag_circle(anchors: &mut [LogicalPoint], index: usize, point: LogicalPoint) -> bool {
    if index == 0 && anchors.len() >= 2 {
        let d_logical = point.logical - anchors[0].logical;
        let d_price = point.price - anchors[0].price;
        anchors[0] = point;
        anchors[1] = anchors[1].offset(d_logical, d_price);
        return true;
    }
    set_anchor(anchors, index, point)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    Rect(BoundingBox),
    Circle { center: Point, radius: f64 },
    Triangle([Point; 3]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    pub outline: Outline,
    pub handles: Vec<Point>,
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<ShapeGeometry> {
    match tool.kind {
        ToolKind::Rectangle => {
            let pts = resolve_anchors(host, &tool.anchors, 2)?;
            let corners = [pts[0], pts[1]];
            Some(ShapeGeometry {
                outline: Outline::Rect(BoundingBox::from_corners(corners[0], corners[1])),
                handles: rect_handles(&tool.anchors, corners),
            })
        }
        ToolKind::Circle => {
            let pts = resolve_anchors(host, &tool.anchors, 2)?;
            Some(ShapeGeometry {
                outline: Outline::Circle { center: pts[0], radius: pts[0].distance(pts[1]) },
                handles: pts,
            })
        }
        ToolKind::Triangle => {
            let pts = resolve_anchors(host, &tool.anchors, 3)?;
            Some(ShapeGeometry { outline: Outline::Triangle([pts[0], pts[1], pts[2]]), handles: pts })
        }
        _ => None,
    }
}

pub(crate) fn hit_test(g: &ShapeGeometry, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if let Some(i) = nearest_handle(&g.handles, p) {
        return Some(HitTestResult::point(i));
    }
    match g.outline {
        Outline::Rect(rect) => rect_hit(rect, p, tolerance),
        Outline::Circle { center, radius } => {
            if (p.distance(center) - radius).abs() <= tolerance {
                Some(HitTestResult::line())
            } else {
                is_point_in_circle(p, center, radius).then(HitTestResult::shape)
            }
        }
        Outline::Triangle(tri) => {
            if near_polyline(&tri, true, p, tolerance) {
                Some(HitTestResult::line())
            } else {
                is_point_in_triangle(p, tri[0], tri[1], tri[2]).then(HitTestResult::shape)
            }
        }
    }
}

/// Outline then interior test for an axis-aligned box.
pub(crate) fn rect_hit(rect: BoundingBox, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if rect.edges().iter().any(|[a, b]| distance_to_segment(p, *a, *b) <= tolerance) {
        return Some(HitTestResult::line());
    }
    is_point_in_rectangle(p, rect.min, rect.max).then(HitTestResult::shape)
}

pub(crate) fn draw(g: &ShapeGeometry, options: &ToolOptions, surface: &mut dyn Surface) -> Result<(), DrawError> {
    match g.outline {
        Outline::Rect(rect) => {
            surface.set_fill(options.fill_color());
            surface.fill_rect(rect);
            apply_stroke(surface, options)?;
            surface.stroke_rect(rect);
        }
        Outline::Circle { center, radius } => {
            surface.set_fill(options.fill_color());
            surface.begin_path();
            surface.arc(center, radius)?;
            surface.fill();
            apply_stroke(surface, options)?;
            surface.stroke();
        }
        Outline::Triangle(tri) => {
            fill_polygon(surface, &tri, options.fill_color());
            apply_stroke(surface, options)?;
            stroke_polyline(surface, &tri, true);
        }
    }
    Ok(())
}
