//! Fibonacci retracement (2 anchors) and extension (3 anchors).
//!
//! Level prices are rounded to the tool's tick. Each level is a horizontal
//! segment across the anchors' pixel span, stretched to the pane edge on an
//! extended side. Only the level lines and the dashed trend line are hit.

#[cfg(test)]
#[path = "fib_test.rs"]
mod fib_test;

use crate::coords::{ChartHost, resolve_anchors};
use crate::error::DrawError;
use crate::geometry::{Point, round_to_min_move};
use crate::options::{LineStyle, ToolOptions};
use crate::render::{Label, LabelPlacement, Surface, apply_stroke, draw_label, stroke_polyline, stroke_segments};
use crate::tool::{HitTestResult, Tool, ToolKind};

use super::{near_polyline, near_segments, nearest_handle};

pub const RETRACEMENT_LEVELS: [f64; 11] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0, 1.618, 2.618, 3.618, 4.236];
pub const EXTENSION_LEVELS: [f64; 6] = [0.0, 0.618, 1.0, 1.618, 2.618, 4.236];

/// Price of one level.
///
/// Retracement: `p2 - (p2 - p1) * coeff`. Extension: `p3 + (p2 - p1) * coeff`.
#[must_use]
pub fn level_price(kind: ToolKind, prices: &[f64], coeff: f64, tick: f64) -> Option<f64> {
    let raw = match (kind, prices) {
        (ToolKind::FibRetracement, [p1, p2, ..]) => coeff.mul_add(-(p2 - p1), *p2),
        (ToolKind::FibExtension, [p1, p2, p3, ..]) => coeff.mul_add(p2 - p1, *p3),
        _ => return None,
    };
    Some(round_to_min_move(raw, tick))
}

/// `(coefficient, price)` for every configured level.
#[must_use]
pub fn levels(tool: &Tool) -> Option<Vec<(f64, f64)>> {
    let count = tool.kind.anchor_count()?;
    if !matches!(tool.kind, ToolKind::FibRetracement | ToolKind::FibExtension) || tool.anchors.len() < count {
        return None;
    }
    let prices: Vec<f64> = tool.anchors.iter().take(count).map(|a| a.price).collect();
    let coeffs = tool.options.levels().unwrap_or_else(|| match tool.kind {
        ToolKind::FibExtension => EXTENSION_LEVELS.to_vec(),
        _ => RETRACEMENT_LEVELS.to_vec(),
    });
    coeffs
        .into_iter()
        .map(|c| level_price(tool.kind, &prices, c, tool.min_move).map(|p| (c, p)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FibLevel {
    pub coeff: f64,
    pub price: f64,
    pub segment: [Point; 2],
    pub label: Option<Label>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FibGeometry {
    pub levels: Vec<FibLevel>,
    /// Dashed connector through the anchors.
    pub trend: Vec<Point>,
    pub handles: Vec<Point>,
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<FibGeometry> {
    let count = tool.kind.anchor_count()?;
    let handles = resolve_anchors(host, &tool.anchors, count)?;
    let options = &tool.options;
    let pane = host.pane_size();

    let min_x = handles.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = handles.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let x0 = if options.extend_left() { 0.0 } else { min_x };
    let x1 = if options.extend_right() { pane.width.max(max_x) } else { max_x };

    let font_size = options.font_size() * 0.85;
    let levels = levels(tool)?
        .into_iter()
        .filter_map(|(coeff, price)| {
            let y = host.price_to_coordinate(price).filter(|y| y.is_finite())?;
            let label = options.show_labels().then(|| {
                let text = format!("{coeff} ({})", host.format_price(price));
                let mut label = Label::new(&text, Point::new(x0, y), LabelPlacement::TopLeft, font_size);
                let h = label.bbox.height();
                label.bbox.min.y -= h;
                label.bbox.max.y -= h;
                label
            });
            Some(FibLevel { coeff, price, segment: [Point::new(x0, y), Point::new(x1, y)], label })
        })
        .collect();

    Some(FibGeometry { levels, trend: handles.clone(), handles })
}

pub(crate) fn hit_test(g: &FibGeometry, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if let Some(i) = nearest_handle(&g.handles, p) {
        return Some(HitTestResult::point(i));
    }
    let segments: Vec<[Point; 2]> = g.levels.iter().map(|l| l.segment).collect();
    (near_segments(&segments, p, tolerance) || near_polyline(&g.trend, false, p, tolerance)).then(HitTestResult::line)
}

pub(crate) fn draw(g: &FibGeometry, options: &ToolOptions, surface: &mut dyn Surface) -> Result<(), DrawError> {
    let width = options.line_width();
    surface.set_stroke(options.line_color(), width, &LineStyle::Dashed.dash(width))?;
    stroke_polyline(surface, &g.trend, false);

    apply_stroke(surface, options)?;
    let segments: Vec<[Point; 2]> = g.levels.iter().map(|l| l.segment).collect();
    stroke_segments(surface, &segments);
    for label in g.levels.iter().filter_map(|l| l.label.as_ref()) {
        draw_label(surface, label, "transparent", options.line_color())?;
    }
    Ok(())
}
