//! Text annotations: text, callout, price label.
//!
//! Text boxes are sized from fixed glyph ratios so hit-testing needs no text
//! measurement. A hit on the box reports the anchor that owns it as a
//! `point` hit so dragging the box moves the text.

#[cfg(test)]
#[path = "annotation_test.rs"]
mod annotation_test;

use crate::coords::{ChartHost, resolve_anchors};
use crate::error::DrawError;
use crate::geometry::Point;
use crate::options::ToolOptions;
use crate::render::{Label, LabelPlacement, Surface, apply_stroke, draw_label, stroke_segments};
use crate::tool::{HitTestResult, Tool, ToolKind};

use super::{near_segments, nearest_handle};

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationGeometry {
    pub label: Label,
    /// Anchor index dragged when the box itself is grabbed.
    pub label_anchor: usize,
    /// Callout leader from the box to the target point.
    pub pointer: Option<[Point; 2]>,
    pub handles: Vec<Point>,
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<AnnotationGeometry> {
    let options = &tool.options;
    let font_size = options.font_size();
    match tool.kind {
        ToolKind::Text => {
            let handles = resolve_anchors(host, &tool.anchors, 1)?;
            let label = Label::new(options.text(), handles[0], LabelPlacement::TopLeft, font_size);
            Some(AnnotationGeometry { label, label_anchor: 0, pointer: None, handles })
        }
        ToolKind::Callout => {
            let handles = resolve_anchors(host, &tool.anchors, 2)?;
            let label = Label::new(options.text(), handles[1], LabelPlacement::TopLeft, font_size);
            let target = handles[0];
            let bbox = label.bbox;
            let attach = Point::new(target.x.clamp(bbox.min.x, bbox.max.x), target.y.clamp(bbox.min.y, bbox.max.y));
            let pointer = (attach.distance(target) > 0.0).then_some([attach, target]);
            Some(AnnotationGeometry { label, label_anchor: 1, pointer, handles })
        }
        ToolKind::PriceLabel => {
            let handles = resolve_anchors(host, &tool.anchors, 1)?;
            let text = if options.text().is_empty() {
                host.format_price(tool.anchors[0].price)
            } else {
                options.text().to_owned()
            };
            let label = Label::new(&text, handles[0], LabelPlacement::Above, font_size);
            let stem = Point::new(handles[0].x, label.bbox.max.y);
            Some(AnnotationGeometry { label, label_anchor: 0, pointer: Some([stem, handles[0]]), handles })
        }
        _ => None,
    }
}

pub(crate) fn hit_test(g: &AnnotationGeometry, p: Point, tolerance: f64) -> Option<HitTestResult> {
    if let Some(i) = nearest_handle(&g.handles, p) {
        return Some(HitTestResult::point(i));
    }
    if g.label.bbox.contains(p) {
        return Some(HitTestResult::point(g.label_anchor));
    }
    let pointer: Vec<[Point; 2]> = g.pointer.into_iter().collect();
    near_segments(&pointer, p, tolerance).then(HitTestResult::line)
}

pub(crate) fn draw(g: &AnnotationGeometry, options: &ToolOptions, surface: &mut dyn Surface) -> Result<(), DrawError> {
    if let Some(pointer) = g.pointer {
        apply_stroke(surface, options)?;
        stroke_segments(surface, &[pointer]);
    }
    draw_label(surface, &g.label, options.label_background(), options.text_color())
}
