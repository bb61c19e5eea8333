//! Chart patterns: Elliott wave, head and shoulders, XABCD.
//!
//! Each is a fixed-length anchor run drawn as a connected polyline with a
//! label on each labelled anchor. Labels go above swing highs and below
//! swing lows. Head and shoulders also fills the head triangle and draws a
//! dashed neckline through the two troughs, extended across the pane. XABCD
//! fills its two legs (X-A-B and B-C-D).

#[cfg(test)]
#[path = "pattern_test.rs"]
mod pattern_test;

use crate::coords::{ChartHost, resolve_anchors};
use crate::error::DrawError;
use crate::geometry::{Point, extend_and_clip_line_segment, is_point_in_triangle};
use crate::options::{LineStyle, ToolOptions};
use crate::render::{
    Label, LabelPlacement, Surface, apply_stroke, draw_label, fill_polygon, stroke_polyline, stroke_segments,
};
use crate::tool::{HitTestResult, Tool, ToolKind};

use super::{near_polyline, near_segments, nearest_handle};

const ELLIOTT_LABELS: [&str; 6] = ["(0)", "(1)", "(2)", "(3)", "(4)", "(5)"];
const HEAD_AND_SHOULDERS_LABELS: [(usize, &str); 3] = [(0, "LS"), (2, "Head"), (4, "RS")];
const XABCD_LABELS: [&str; 5] = ["X", "A", "B", "C", "D"];

#[derive(Debug, Clone, PartialEq)]
pub struct PatternGeometry {
    pub points: Vec<Point>,
    /// Filled triangles, drawn under the polyline.
    pub fills: Vec<[Point; 3]>,
    pub neckline: Option<[Point; 2]>,
    pub labels: Vec<Label>,
    pub handles: Vec<Point>,
}

/// Whether point `i` sits above its neighbours on screen.
fn is_peak(points: &[Point], i: usize) -> bool {
    let y = points[i].y;
    let prev = i.checked_sub(1).and_then(|j| points.get(j));
    let next = points.get(i + 1);
    match (prev, next) {
        (Some(a), Some(b)) => y <= a.y.min(b.y),
        (Some(n), None) | (None, Some(n)) => y <= n.y,
        (None, None) => true,
    }
}

fn label_at(points: &[Point], i: usize, text: &str, font_size: f64) -> Label {
    let placement = if is_peak(points, i) { LabelPlacement::Above } else { LabelPlacement::Below };
    Label::new(text, points[i], placement, font_size)
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<PatternGeometry> {
    let count = tool.kind.anchor_count()?;
    let points = resolve_anchors(host, &tool.anchors, count)?;
    let options = &tool.options;
    let font_size = options.font_size();
    let show = options.show_labels();

    let geometry = match tool.kind {
        ToolKind::ElliottWave => {
            let labels = if show {
                ELLIOTT_LABELS.iter().enumerate().map(|(i, t)| label_at(&points, i, t, font_size)).collect()
            } else {
                Vec::new()
            };
            PatternGeometry { fills: Vec::new(), neckline: None, labels, handles: points.clone(), points }
        }
        ToolKind::HeadAndShoulders => {
            let pane = host.pane_size();
            let neckline = extend_and_clip_line_segment(points[1], points[3], pane.width, pane.height, true, true);
            let labels = if show {
                HEAD_AND_SHOULDERS_LABELS.iter().map(|(i, t)| label_at(&points, *i, t, font_size)).collect()
            } else {
                Vec::new()
            };
            PatternGeometry {
                fills: vec![[points[1], points[2], points[3]]],
                neckline,
                labels,
                handles: points.clone(),
                points,
            }
        }
        ToolKind::XabcdPattern => {
            let labels = if show {
                XABCD_LABELS.iter().enumerate().map(|(i, t)| label_at(&points, i, t, font_size)).collect()
            } else {
                Vec::new()
            };
            PatternGeometry {
                fills: vec![[points[0], points[1], points[2]], [points[2], points[3], points[4]]],
                neckline: None,
                labels,
                handles: points.clone(),
                points,
            }
        }
        _ => return None,
    };
    Some(geometry)
}

pub(crate) fn hit_test(g: &PatternGeometry, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if let Some(i) = nearest_handle(&g.handles, p) {
        return Some(HitTestResult::point(i));
    }
    let neckline: Vec<[Point; 2]> = g.neckline.into_iter().collect();
    if near_polyline(&g.points, false, p, tolerance) || near_segments(&neckline, p, tolerance) {
        return Some(HitTestResult::line());
    }
    g.fills.iter().any(|[a, b, c]| is_point_in_triangle(p, *a, *b, *c)).then(HitTestResult::shape)
}

pub(crate) fn draw(g: &PatternGeometry, options: &ToolOptions, surface: &mut dyn Surface) -> Result<(), DrawError> {
    for fill in &g.fills {
        fill_polygon(surface, fill, options.fill_color());
    }
    apply_stroke(surface, options)?;
    stroke_polyline(surface, &g.points, false);
    if let Some(neckline) = g.neckline {
        let width = options.line_width();
        surface.set_stroke(options.line_color(), width, &LineStyle::Dashed.dash(width))?;
        stroke_segments(surface, &[neckline]);
    }
    for label in &g.labels {
        draw_label(surface, label, "transparent", options.line_color())?;
    }
    Ok(())
}
