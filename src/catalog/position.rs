//! Long and short position overlays.
//!
//! Anchors are entry (0), stop (1), and target (2). While `auto_target` is
//! set the target tracks the stop at the `risk_reward` multiple; dragging the
//! target turns that off for good. Stops and targets are kept on the
//! direction-correct side of entry: for a long, stop below and target above.

#[cfg(test)]
#[path = "position_test.rs"]
mod position_test;

use tracing::debug;

use crate::consts::GEOMETRY_EPSILON;
use crate::coords::{ChartHost, LogicalPoint, resolve_anchors};
use crate::error::DrawError;
use crate::geometry::{BoundingBox, Point, calculate_risk_reward_target};
use crate::options::ToolOptions;
use crate::render::{Label, LabelPlacement, Surface, apply_stroke, draw_label, stroke_segments};
use crate::tool::{HitTestResult, Tool, ToolKind};

use super::{near_segments, nearest_handle};

fn is_long(tool: &Tool) -> bool {
    tool.kind == ToolKind::LongPosition
}

/// Smallest allowed gap between entry and stop or target.
fn min_gap(tool: &Tool) -> f64 {
    if tool.min_move > 0.0 { tool.min_move } else { GEOMETRY_EPSILON }
}

fn auto_target_point(tool: &Tool) -> Option<LogicalPoint> {
    let (entry, stop) = (*tool.anchors.first()?, *tool.anchors.get(1)?);
    let price = calculate_risk_reward_target(entry.price, stop.price, tool.options.risk_reward(), tool.min_move);
    Some(LogicalPoint::new(stop.logical, price))
}

/// Complete the anchor list. Two anchors get an auto target; a tool built
/// with its target already placed starts in manual mode. The stop and any
/// given target are first pulled onto the kind's side of entry.
pub(crate) fn normalize(tool: &mut Tool, constructing: bool) {
    if tool.anchors.len() < 2 {
        return;
    }
    let stop = clamp_stop(tool, tool.anchors[1].price);
    tool.anchors[1].price = stop;
    if tool.anchors.len() == 2 {
        if constructing {
            tool.auto_target = true;
        }
        if let Some(target) = auto_target_point(tool) {
            tool.anchors.push(target);
        }
        return;
    }
    if constructing {
        tool.auto_target = false;
    }
    let target = clamp_target(tool, tool.anchors[2].price);
    tool.anchors[2].price = target;
}

fn clamp_stop(tool: &Tool, price: f64) -> f64 {
    let entry = tool.anchors[0].price;
    if is_long(tool) { price.min(entry - min_gap(tool)) } else { price.max(entry + min_gap(tool)) }
}

fn clamp_target(tool: &Tool, price: f64) -> f64 {
    let entry = tool.anchors[0].price;
    if is_long(tool) { price.max(entry + min_gap(tool)) } else { price.min(entry - min_gap(tool)) }
}

pub(crate) fn update_anchor(tool: &mut Tool, index: usize, point: LogicalPoint) -> bool {
    if tool.anchors.len() < 3 {
        return false;
    }
    match index {
        0 => {
            let d_logical = point.logical - tool.anchors[0].logical;
            let d_price = point.price - tool.anchors[0].price;
            for a in &mut tool.anchors {
                *a = a.offset(d_logical, d_price);
            }
        }
        1 => {
            let price = clamp_stop(tool, point.price);
            tool.anchors[1] = LogicalPoint::new(point.logical, price);
            if tool.auto_target {
                if let Some(target) = auto_target_point(tool) {
                    tool.anchors[2].price = target.price;
                }
            } else {
                let target = clamp_target(tool, tool.anchors[2].price);
                tool.anchors[2].price = target;
            }
        }
        2 => {
            if tool.auto_target {
                debug!(id = %tool.id, "position target placed manually; auto target off");
            }
            tool.auto_target = false;
            let price = clamp_target(tool, point.price);
            tool.anchors[2] = LogicalPoint::new(point.logical, price);
        }
        _ => return false,
    }
    true
}

/// Risk, reward, and their ratio for the current anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionStats {
    pub risk: f64,
    pub reward: f64,
    /// `reward / risk`, or `None` with zero risk.
    pub ratio: Option<f64>,
}

#[must_use]
pub fn stats(anchors: &[LogicalPoint]) -> Option<PositionStats> {
    let [entry, stop, target] = match anchors {
        [a, b, c, ..] => [a.price, b.price, c.price],
        _ => return None,
    };
    let risk = (entry - stop).abs();
    let reward = (target - entry).abs();
    let ratio = (risk > GEOMETRY_EPSILON).then(|| reward / risk);
    Some(PositionStats { risk, reward, ratio })
}

fn percent(from: f64, to: f64) -> String {
    if from.abs() < GEOMETRY_EPSILON {
        return String::new();
    }
    format!(" ({:+.2}%)", (to - from) / from * 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionGeometry {
    pub profit: BoundingBox,
    pub loss: BoundingBox,
    pub entry_line: [Point; 2],
    pub labels: Vec<Label>,
    pub handles: Vec<Point>,
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<PositionGeometry> {
    let handles = resolve_anchors(host, &tool.anchors, 3)?;
    let (entry, stop, target) = (handles[0], handles[1], handles[2]);
    let x0 = entry.x;
    let x1 = entry.x.max(stop.x).max(target.x);
    let profit = BoundingBox::from_corners(Point::new(x0, entry.y), Point::new(x1, target.y));
    let loss = BoundingBox::from_corners(Point::new(x0, entry.y), Point::new(x1, stop.y));

    let mut labels = Vec::new();
    let options = &tool.options;
    if options.show_labels() {
        let prices = [tool.anchors[0].price, tool.anchors[1].price, tool.anchors[2].price];
        let font_size = options.font_size() * 0.85;
        let center_x = (x0 + x1) * 0.5;
        let (target_side, stop_side) = if target.y <= entry.y {
            (LabelPlacement::Above, LabelPlacement::Below)
        } else {
            (LabelPlacement::Below, LabelPlacement::Above)
        };
        let target_text = format!("Target: {}{}", host.format_price(prices[2]), percent(prices[0], prices[2]));
        let target_at = Point::new(center_x, box_edge(profit, target_side));
        labels.push(Label::new(&target_text, target_at, target_side, font_size));
        let stop_text = format!("Stop: {}{}", host.format_price(prices[1]), percent(prices[0], prices[1]));
        labels.push(Label::new(&stop_text, Point::new(center_x, box_edge(loss, stop_side)), stop_side, font_size));
        if let Some(ratio) = stats(&tool.anchors).and_then(|s| s.ratio) {
            let text = format!("R:R {ratio:.2}");
            labels.push(Label::new(&text, Point::new(x1, entry.y), LabelPlacement::Right, font_size));
        }
    }

    let entry_line = [Point::new(x0, entry.y), Point::new(x1, entry.y)];
    Some(PositionGeometry { profit, loss, entry_line, labels, handles })
}

/// The box edge a label placed at `side` attaches to.
fn box_edge(rect: BoundingBox, side: LabelPlacement) -> f64 {
    if side == LabelPlacement::Above { rect.min.y } else { rect.max.y }
}

pub(crate) fn hit_test(g: &PositionGeometry, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if let Some(i) = nearest_handle(&g.handles, p) {
        return Some(HitTestResult::point(i));
    }
    if near_segments(&[g.entry_line], p, tolerance) {
        return Some(HitTestResult::line());
    }
    (g.profit.contains(p) || g.loss.contains(p)).then(HitTestResult::shape)
}

pub(crate) fn draw(g: &PositionGeometry, options: &ToolOptions, surface: &mut dyn Surface) -> Result<(), DrawError> {
    surface.set_fill(options.profit_color());
    surface.fill_rect(g.profit);
    surface.set_fill(options.stop_color());
    surface.fill_rect(g.loss);
    apply_stroke(surface, options)?;
    stroke_segments(surface, &[g.entry_line]);
    for label in &g.labels {
        draw_label(surface, label, options.label_background(), options.text_color())?;
    }
    Ok(())
}
