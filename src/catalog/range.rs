//! Measurement ranges: date range, price range, date-and-price range, measure.
//!
//! All four are a rectangle over two anchors with the eight rectangle
//! handles, direction arrows, and a statistics label. The label is drawn but
//! never hit.

#[cfg(test)]
#[path = "range_test.rs"]
mod range_test;

use serde::Serialize;

use crate::consts::GEOMETRY_EPSILON;
use crate::coords::{ChartHost, resolve_anchors};
use crate::error::DrawError;
use crate::geometry::{BoundingBox, Point, arrow_points, round_to_min_move};
use crate::options::ToolOptions;
use crate::render::{Label, LabelPlacement, Surface, apply_stroke, draw_label, stroke_segments};
use crate::tool::{HitTestResult, Tool, ToolKind};

use super::nearest_handle;
use super::shapes::{rect_handles, rect_hit};

/// Derived measurements between the two anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeStats {
    /// Whole bars between the anchors.
    pub bars: i64,
    /// Signed price change from the first to the second anchor, tick-rounded.
    pub price_change: f64,
    /// Change relative to the first anchor's price; `None` when that price is 0.
    pub percent_change: Option<f64>,
    /// Change expressed in ticks.
    pub ticks: i64,
}

#[must_use]
pub fn stats(tool: &Tool) -> Option<RangeStats> {
    if !matches!(
        tool.kind,
        ToolKind::DateRange | ToolKind::PriceRange | ToolKind::DatePriceRange | ToolKind::Measure
    ) {
        return None;
    }
    let (a0, a1) = (*tool.anchors.first()?, *tool.anchors.get(1)?);
    if !a0.is_finite() || !a1.is_finite() {
        return None;
    }
    let price_change = round_to_min_move(a1.price - a0.price, tool.min_move);
    let percent_change = (a0.price.abs() >= GEOMETRY_EPSILON).then(|| (a1.price - a0.price) / a0.price * 100.0);
    let ticks = if tool.min_move > 0.0 { (price_change / tool.min_move).round() } else { 0.0 };
    #[allow(clippy::cast_possible_truncation)]
    let (bars, ticks) = ((a1.logical - a0.logical).abs().round() as i64, ticks as i64);
    Some(RangeStats { bars, price_change, percent_change, ticks })
}

fn label_text(kind: ToolKind, s: &RangeStats, host: &dyn ChartHost) -> String {
    let percent = s.percent_change.map_or_else(String::new, |p| format!(" ({p:+.2}%)"));
    let price = format!("{}{percent}", host.format_price(s.price_change));
    match kind {
        ToolKind::DateRange => format!("{} bars", s.bars),
        ToolKind::PriceRange => format!("{price}\n{} ticks", s.ticks),
        _ => format!("{price}\n{} bars", s.bars),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeGeometry {
    pub rect: BoundingBox,
    /// Arrow shafts followed by their heads.
    pub arrows: Vec<[Point; 2]>,
    pub label: Option<Label>,
    pub handles: Vec<Point>,
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<RangeGeometry> {
    let pts = resolve_anchors(host, &tool.anchors, 2)?;
    let (p0, p1) = (pts[0], pts[1]);
    let rect = BoundingBox::from_corners(p0, p1);
    let center = rect.center();
    let width = tool.options.line_width();

    let mut arrows = Vec::new();
    let horizontal = matches!(tool.kind, ToolKind::DateRange | ToolKind::DatePriceRange | ToolKind::Measure);
    let vertical = matches!(tool.kind, ToolKind::PriceRange | ToolKind::DatePriceRange | ToolKind::Measure);
    if horizontal {
        let shaft = [Point::new(p0.x, center.y), Point::new(p1.x, center.y)];
        arrows.push(shaft);
        arrows.extend(arrow_points(shaft[0], shaft[1], width));
    }
    if vertical {
        let shaft = [Point::new(center.x, p0.y), Point::new(center.x, p1.y)];
        arrows.push(shaft);
        arrows.extend(arrow_points(shaft[0], shaft[1], width));
    }

    let label = match stats(tool) {
        Some(s) if tool.options.show_labels() => {
            let text = label_text(tool.kind, &s, host);
            let font_size = tool.options.font_size() * 0.85;
            let label = if p1.y <= p0.y {
                Label::new(&text, Point::new(center.x, rect.min.y), LabelPlacement::Above, font_size)
            } else {
                Label::new(&text, Point::new(center.x, rect.max.y), LabelPlacement::Below, font_size)
            };
            Some(label)
        }
        _ => None,
    };

    Some(RangeGeometry { rect, arrows, label, handles: rect_handles(&tool.anchors, [p0, p1]) })
}

pub(crate) fn hit_test(g: &RangeGeometry, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if let Some(i) = nearest_handle(&g.handles, p) {
        return Some(HitTestResult::point(i));
    }
    rect_hit(g.rect, p, tolerance)
}

pub(crate) fn draw(g: &RangeGeometry, options: &ToolOptions, surface: &mut dyn Surface) -> Result<(), DrawError> {
    surface.set_fill(options.fill_color());
    surface.fill_rect(g.rect);
    apply_stroke(surface, options)?;
    surface.stroke_rect(g.rect);
    stroke_segments(surface, &g.arrows);
    if let Some(label) = &g.label {
        draw_label(surface, label, options.label_background(), options.text_color())?;
    }
    Ok(())
}
