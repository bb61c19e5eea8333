#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::catalog::Geometry;
use crate::coords::LinearScale;
use crate::recording::RecordingSurface;
use crate::tool::ToolKind;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn host() -> LinearScale {
    LinearScale::new(800.0, 500.0).with_bars(0.0, 10.0).with_prices(100.0, 0.0)
}

fn lp(logical: f64, price: f64) -> LogicalPoint {
    LogicalPoint::new(logical, price)
}

/// Baseline (10, 80) -> (30, 60); parallel edge 20 below.
fn channel(options: serde_json::Value) -> Tool {
    Tool::new(&host(), ToolKind::ParallelChannel, vec![lp(10.0, 80.0), lp(30.0, 60.0), lp(20.0, 50.0)], &options)
}

fn geometry(tool: &Tool) -> &ChannelGeometry {
    match tool.geometry() {
        Some(Geometry::Channel(g)) => g,
        other => panic!("expected channel geometry, got {other:?}"),
    }
}

// =============================================================
// Offset and bounds
// =============================================================

#[test]
fn offset_projects_p3_onto_baseline() {
    let offset = channel_offset(&[lp(10.0, 80.0), lp(30.0, 60.0), lp(20.0, 50.0)]);
    assert!(offset.is_some_and(|o| approx_eq(o, -20.0)));
}

#[test]
fn offset_with_vertical_baseline_uses_zero_slope() {
    let offset = channel_offset(&[lp(10.0, 80.0), lp(10.0, 60.0), lp(15.0, 50.0)]);
    assert!(offset.is_some_and(|o| approx_eq(o, -30.0)));
}

#[test]
fn offset_needs_three_anchors() {
    assert!(channel_offset(&[lp(0.0, 1.0), lp(1.0, 2.0)]).is_none());
}

#[test]
fn bounds_inside_span() {
    let anchors = [lp(10.0, 80.0), lp(30.0, 60.0), lp(20.0, 50.0)];
    let (lo, hi) = channel_bounds_at(&anchors, 20.0).unwrap_or_default();
    assert!(approx_eq(lo, 50.0) && approx_eq(hi, 70.0));
    let (lo, hi) = channel_bounds_at(&anchors, 10.0).unwrap_or_default();
    assert!(approx_eq(lo, 60.0) && approx_eq(hi, 80.0));
}

#[test]
fn bounds_outside_span_are_none() {
    let anchors = [lp(10.0, 80.0), lp(30.0, 60.0), lp(20.0, 50.0)];
    assert!(channel_bounds_at(&anchors, 9.0).is_none());
    assert!(channel_bounds_at(&anchors, 31.0).is_none());
    assert!(channel_bounds_at(&anchors, f64::NAN).is_none());
}

#[test]
fn bounds_with_edge_above_baseline_are_ordered() {
    let anchors = [lp(10.0, 50.0), lp(30.0, 50.0), lp(20.0, 65.0)];
    assert_eq!(channel_bounds_at(&anchors, 15.0), Some((50.0, 65.0)));
}

// =============================================================
// Drag policy
// =============================================================

#[test]
fn baseline_drag_keeps_width() {
    let mut tool = channel(json!({}));
    assert!(tool.update_point_by_index(&host(), 1, lp(30.0, 90.0)));
    let offset = channel_offset(tool.anchors()).unwrap_or_default();
    assert!(approx_eq(offset, -20.0));
    assert_eq!(tool.anchors()[1], lp(30.0, 90.0));
    assert!(approx_eq(tool.anchors()[2].price, 65.0));
}

#[test]
fn first_anchor_drag_keeps_width() {
    let mut tool = channel(json!({}));
    tool.update_point_by_index(&host(), 0, lp(0.0, 70.0));
    assert!(channel_offset(tool.anchors()).is_some_and(|o| approx_eq(o, -20.0)));
}

#[test]
fn third_anchor_drag_changes_width() {
    let mut tool = channel(json!({}));
    tool.update_point_by_index(&host(), 2, lp(20.0, 40.0));
    assert!(channel_offset(tool.anchors()).is_some_and(|o| approx_eq(o, -30.0)));
}

#[test]
fn channel_index_out_of_range() {
    let mut tool = channel(json!({}));
    assert!(!tool.update_point_by_index(&host(), 3, lp(0.0, 0.0)));
}

// =============================================================
// Layout and hits
// =============================================================

#[test]
fn layout_places_parallel_edge() {
    let tool = channel(json!({}));
    let g = geometry(&tool);
    assert_eq!(g.top, [Point::new(100.0, 100.0), Point::new(300.0, 200.0)]);
    assert_eq!(g.bottom, [Point::new(100.0, 200.0), Point::new(300.0, 300.0)]);
    assert_eq!(g.middle, Some([Point::new(100.0, 150.0), Point::new(300.0, 250.0)]));
}

#[test]
fn middle_line_is_optional() {
    let tool = channel(json!({ "show_middle_line": false }));
    assert!(geometry(&tool).middle.is_none());
}

#[test]
fn hit_priority() {
    let tool = channel(json!({ "show_middle_line": false }));
    assert_eq!(tool.tool_hit_test(103.0, 101.0), Some(HitTestResult::point(0)));
    assert_eq!(tool.tool_hit_test(200.0, 152.0), Some(HitTestResult::line()));
    assert_eq!(tool.tool_hit_test(150.0, 170.0), Some(HitTestResult::shape()));
    assert_eq!(tool.tool_hit_test(250.0, 120.0), None);
    assert_eq!(tool.tool_hit_test(350.0, 250.0), None);
}

#[test]
fn draw_fills_and_strokes() {
    let tool = channel(json!({}));
    let mut surface = RecordingSurface::new();
    tool.draw(&mut surface).unwrap();
    assert_eq!(surface.fill_count(), 1);
    assert_eq!(surface.stroke_count(), 2);
}
