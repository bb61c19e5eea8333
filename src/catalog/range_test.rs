#![allow(clippy::float_cmp)]

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

/// (10, 50) -> (30, 60): pixels (100, 250) -> (300, 200).
fn range(kind: ToolKind) -> Tool {
    Tool::new(&host(), kind, vec![lp(10.0, 50.0), lp(30.0, 60.0)], &json!({}))
}

fn geometry(tool: &Tool) -> &RangeGeometry {
    match tool.geometry() {
        Some(Geometry::Range(g)) => g,
        other => panic!("expected range geometry, got {other:?}"),
    }
}

// =============================================================
// Stats
// =============================================================

#[test]
fn stats_measure_bars_change_and_ticks() {
    let s = range(ToolKind::DatePriceRange).range_stats();
    assert_eq!(s, Some(RangeStats { bars: 20, price_change: 10.0, percent_change: Some(20.0), ticks: 1000 }));
}

#[test]
fn stats_are_signed_by_anchor_order() {
    let tool = Tool::new(&host(), ToolKind::Measure, vec![lp(30.0, 60.0), lp(10.0, 45.0)], &json!({}));
    let s = tool.range_stats().unwrap_or_else(|| panic!("measure has stats"));
    assert_eq!(s.bars, 20);
    assert_eq!(s.price_change, -15.0);
    assert_eq!(s.percent_change, Some(-25.0));
    assert_eq!(s.ticks, -1500);
}

#[test]
fn zero_base_price_has_no_percent() {
    let tool = Tool::new(&host(), ToolKind::PriceRange, vec![lp(0.0, 0.0), lp(5.0, 10.0)], &json!({}));
    assert_eq!(tool.range_stats().and_then(|s| s.percent_change), None);
}

#[test]
fn non_range_kinds_have_no_stats() {
    let tool = Tool::new(&host(), ToolKind::TrendLine, vec![lp(10.0, 50.0), lp(30.0, 60.0)], &json!({}));
    assert!(tool.range_stats().is_none());
}

#[test]
fn stats_serialize_for_hosts() {
    let s = range(ToolKind::DateRange).range_stats();
    let value = serde_json::to_value(s).unwrap();
    assert_eq!(value["bars"], 20);
    assert_eq!(value["ticks"], 1000);
}

// =============================================================
// Labels
// =============================================================

fn texts(tool: &Tool) -> Vec<String> {
    let mut surface = RecordingSurface::new();
    tool.draw(&mut surface).unwrap();
    surface.texts().into_iter().map(str::to_owned).collect()
}

#[test]
fn label_text_per_kind() {
    assert_eq!(texts(&range(ToolKind::DateRange)), vec!["20 bars"]);
    assert_eq!(texts(&range(ToolKind::PriceRange)), vec!["10.00 (+20.00%)", "1000 ticks"]);
    assert_eq!(texts(&range(ToolKind::DatePriceRange)), vec!["10.00 (+20.00%)", "20 bars"]);
    assert_eq!(texts(&range(ToolKind::Measure)), vec!["10.00 (+20.00%)", "20 bars"]);
}

#[test]
fn label_sits_beyond_the_leading_edge() {
    let up = range(ToolKind::DatePriceRange);
    assert!(geometry(&up).label.as_ref().is_some_and(|l| l.bbox.max.y < 200.0));

    let down = Tool::new(&host(), ToolKind::DatePriceRange, vec![lp(10.0, 60.0), lp(30.0, 50.0)], &json!({}));
    assert!(geometry(&down).label.as_ref().is_some_and(|l| l.bbox.min.y > 250.0));
}

#[test]
fn labels_can_be_hidden() {
    let tool = Tool::new(
        &host(),
        ToolKind::DateRange,
        vec![lp(10.0, 50.0), lp(30.0, 60.0)],
        &json!({ "show_labels": false }),
    );
    assert!(geometry(&tool).label.is_none());
    assert!(texts(&tool).is_empty());
}

// =============================================================
// Geometry and hits
// =============================================================

#[test]
fn arrows_follow_measured_axes() {
    // each arrow is a shaft plus four head segments
    assert_eq!(geometry(&range(ToolKind::DateRange)).arrows.len(), 5);
    assert_eq!(geometry(&range(ToolKind::PriceRange)).arrows.len(), 5);
    assert_eq!(geometry(&range(ToolKind::DatePriceRange)).arrows.len(), 10);
}

#[test]
fn label_is_not_hittable() {
    let tool = range(ToolKind::DatePriceRange);
    let Some(bbox) = geometry(&tool).label.as_ref().map(|l| l.bbox) else {
        panic!("range label expected");
    };
    let inside = bbox.center();
    assert!(bbox.contains(inside));
    assert_eq!(tool.tool_hit_test(inside.x, inside.y), None);
}

#[test]
fn range_hit_priority() {
    let tool = range(ToolKind::DatePriceRange);
    assert_eq!(tool.tool_hit_test(299.0, 201.0), Some(HitTestResult::point(1)));
    assert_eq!(tool.tool_hit_test(202.0, 198.0), Some(HitTestResult::point(6)));
    assert_eq!(tool.tool_hit_test(150.0, 252.0), Some(HitTestResult::line()));
    assert_eq!(tool.tool_hit_test(150.0, 230.0), Some(HitTestResult::shape()));
}

#[test]
fn midpoint_drag_moves_one_edge() {
    let mut tool = range(ToolKind::DateRange);
    assert!(tool.update_point_by_index(&host(), 5, lp(35.0, 0.0)));
    assert_eq!(tool.anchors(), &[lp(10.0, 50.0), lp(35.0, 60.0)]);
    assert_eq!(tool.range_stats().map(|s| s.bars), Some(25));
}

#[test]
fn outline_that_hits_as_a_line_is_stroked() {
    let tool = range(ToolKind::DatePriceRange);
    assert_eq!(tool.tool_hit_test(150.0, 251.0), Some(HitTestResult::line()));
    let mut surface = RecordingSurface::new();
    tool.draw(&mut surface).unwrap();
    assert!(surface.commands.contains(&Command::StrokeRect(geometry(&tool).rect)));
}
