use serde_json::json;

use super::*;
use crate::catalog::Geometry;
use crate::coords::{LinearScale, LogicalPoint};
use crate::recording::{Command, RecordingSurface};

fn host() -> LinearScale {
    LinearScale::new(800.0, 500.0).with_bars(0.0, 10.0).with_prices(100.0, 0.0)
}

fn lp(logical: f64, price: f64) -> LogicalPoint {
    LogicalPoint::new(logical, price)
}

fn geometry(tool: &Tool) -> &AnnotationGeometry {
    match tool.geometry() {
        Some(Geometry::Annotation(g)) => g,
        other => panic!("expected annotation geometry, got {other:?}"),
    }
}

// =============================================================
// Text
// =============================================================

#[test]
fn text_box_hangs_from_anchor() {
    let tool = Tool::new(&host(), ToolKind::Text, vec![lp(10.0, 80.0)], &json!({}));
    let g = geometry(&tool);
    assert_eq!(g.label.bbox.min, Point::new(100.0, 100.0));
    assert_eq!(g.label.lines, vec!["Text".to_owned()]);
    assert!(g.pointer.is_none());
}

#[test]
fn text_box_hit_drags_its_anchor() {
    let tool = Tool::new(&host(), ToolKind::Text, vec![lp(10.0, 80.0)], &json!({}));
    // 4 glyphs at 14px: 41.6 x 24.8
    assert_eq!(tool.tool_hit_test(101.0, 101.0), Some(HitTestResult::point(0)));
    assert_eq!(tool.tool_hit_test(130.0, 115.0), Some(HitTestResult::point(0)));
    assert_eq!(tool.tool_hit_test(150.0, 115.0), None);
}

#[test]
fn multiline_text_grows_the_box() {
    let one = Tool::new(&host(), ToolKind::Text, vec![lp(10.0, 80.0)], &json!({ "text": "abc" }));
    let two = Tool::new(&host(), ToolKind::Text, vec![lp(10.0, 80.0)], &json!({ "text": "abc\ndef" }));
    assert!(geometry(&two).label.bbox.height() > geometry(&one).label.bbox.height());
    assert_eq!(geometry(&two).label.bbox.width(), geometry(&one).label.bbox.width());
}

#[test]
fn transparent_text_draws_no_background() {
    let tool = Tool::new(&host(), ToolKind::Text, vec![lp(10.0, 80.0)], &json!({}));
    let mut surface = RecordingSurface::new();
    tool.draw(&mut surface).unwrap();
    assert_eq!(surface.texts(), vec!["Text"]);
    assert!(!surface.commands.iter().any(|c| matches!(c, Command::FillRect(_))));
}

// =============================================================
// Callout
// =============================================================

fn callout() -> Tool {
    // target (100, 100), bubble top-left (200, 200)
    Tool::new(&host(), ToolKind::Callout, vec![lp(10.0, 80.0), lp(20.0, 60.0)], &json!({}))
}

#[test]
fn callout_pointer_runs_from_bubble_to_target() {
    let tool = callout();
    assert_eq!(geometry(&tool).pointer, Some([Point::new(200.0, 200.0), Point::new(100.0, 100.0)]));
}

#[test]
fn callout_hits() {
    let tool = callout();
    assert_eq!(tool.tool_hit_test(240.0, 215.0), Some(HitTestResult::point(1)));
    assert_eq!(tool.tool_hit_test(201.0, 201.0), Some(HitTestResult::point(1)));
    assert_eq!(tool.tool_hit_test(101.0, 100.0), Some(HitTestResult::point(0)));
    assert_eq!(tool.tool_hit_test(150.0, 151.0), Some(HitTestResult::line()));
    assert_eq!(tool.tool_hit_test(150.0, 250.0), None);
}

#[test]
fn callout_over_its_target_has_no_pointer() {
    let tool = Tool::new(&host(), ToolKind::Callout, vec![lp(21.0, 59.0), lp(20.0, 60.0)], &json!({}));
    assert!(geometry(&tool).pointer.is_none());
}

#[test]
fn callout_draws_box_and_pointer() {
    let tool = callout();
    let mut surface = RecordingSurface::new();
    tool.draw(&mut surface).unwrap();
    assert_eq!(surface.stroke_count(), 1);
    assert!(surface.commands.iter().any(|c| matches!(c, Command::FillRect(_))));
    assert_eq!(surface.texts(), vec!["Callout"]);
}

// =============================================================
// Price label
// =============================================================

#[test]
fn price_label_formats_its_price() {
    let tool = Tool::new(&host(), ToolKind::PriceLabel, vec![lp(20.0, 60.0)], &json!({}));
    assert_eq!(geometry(&tool).label.lines, vec!["60.00".to_owned()]);
    // box sits above the anchor with a stem down to it
    assert!(geometry(&tool).label.bbox.max.y < 200.0);
    assert_eq!(geometry(&tool).pointer.map(|p| p[1]), Some(Point::new(200.0, 200.0)));
}

#[test]
fn price_label_text_override() {
    let tool = Tool::new(&host(), ToolKind::PriceLabel, vec![lp(20.0, 60.0)], &json!({ "text": "Entry" }));
    assert_eq!(geometry(&tool).label.lines, vec!["Entry".to_owned()]);
}

#[test]
fn price_label_follows_price_moves() {
    let mut tool = Tool::new(&host(), ToolKind::PriceLabel, vec![lp(20.0, 60.0)], &json!({}));
    tool.update_point_by_index(&host(), 0, lp(20.0, 42.5));
    assert_eq!(geometry(&tool).label.lines, vec!["42.50".to_owned()]);
}
