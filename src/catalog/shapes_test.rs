#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::catalog::Geometry;
use crate::coords::LinearScale;
use crate::recording::RecordingSurface;

fn host() -> LinearScale {
    LinearScale::new(800.0, 500.0).with_bars(0.0, 10.0).with_prices(100.0, 0.0)
}

fn lp(logical: f64, price: f64) -> LogicalPoint {
    LogicalPoint::new(logical, price)
}

/// Rectangle from (10, 80) to (30, 40): pixels (100, 100) to (300, 300).
fn rectangle() -> Tool {
    Tool::new(&host(), ToolKind::Rectangle, vec![lp(10.0, 80.0), lp(30.0, 40.0)], &json!({}))
}

// =============================================================
// Handle table
// =============================================================

#[test]
fn rect_handles_cover_corners_and_midpoints() {
    let tool = rectangle();
    let handles = tool.geometry().map(|g| g.handles().to_vec()).unwrap_or_default();
    assert_eq!(
        handles,
        vec![
            Point::new(100.0, 100.0),
            Point::new(300.0, 300.0),
            Point::new(100.0, 300.0),
            Point::new(300.0, 100.0),
            Point::new(100.0, 200.0),
            Point::new(300.0, 200.0),
            Point::new(200.0, 100.0),
            Point::new(200.0, 300.0),
        ]
    );
}

#[test]
fn midpoint_handles_follow_min_max_when_anchors_swap() {
    let tool = Tool::new(&host(), ToolKind::Rectangle, vec![lp(30.0, 40.0), lp(10.0, 80.0)], &json!({}));
    let handles = tool.geometry().map(|g| g.handles().to_vec()).unwrap_or_default();
    assert_eq!(handles[4], Point::new(100.0, 200.0));
    assert_eq!(handles[5], Point::new(300.0, 200.0));
    assert_eq!(handles[6], Point::new(200.0, 100.0));
    assert_eq!(handles[7], Point::new(200.0, 300.0));
}

#[test]
fn left_midpoint_moves_only_min_logical() {
    let mut tool = rectangle();
    assert!(tool.update_point_by_index(&host(), 4, lp(5.0, 12.0)));
    assert_eq!(tool.anchors(), &[lp(5.0, 80.0), lp(30.0, 40.0)]);
}

#[test]
fn left_midpoint_targets_min_anchor_even_when_second() {
    let mut tool = Tool::new(&host(), ToolKind::Rectangle, vec![lp(30.0, 40.0), lp(10.0, 80.0)], &json!({}));
    assert!(tool.update_point_by_index(&host(), 4, lp(5.0, 12.0)));
    assert_eq!(tool.anchors(), &[lp(30.0, 40.0), lp(5.0, 80.0)]);
}

#[test]
fn right_top_bottom_midpoints() {
    let mut tool = rectangle();
    tool.update_point_by_index(&host(), 5, lp(35.0, 0.0));
    assert_eq!(tool.anchors(), &[lp(10.0, 80.0), lp(35.0, 40.0)]);
    tool.update_point_by_index(&host(), 6, lp(0.0, 90.0));
    assert_eq!(tool.anchors(), &[lp(10.0, 90.0), lp(35.0, 40.0)]);
    tool.update_point_by_index(&host(), 7, lp(0.0, 30.0));
    assert_eq!(tool.anchors(), &[lp(10.0, 90.0), lp(35.0, 30.0)]);
}

#[test]
fn stored_corner_moves_both_axes_of_one_anchor() {
    let mut tool = rectangle();
    tool.update_point_by_index(&host(), 1, lp(40.0, 20.0));
    assert_eq!(tool.anchors(), &[lp(10.0, 80.0), lp(40.0, 20.0)]);
}

#[test]
fn derived_corners_split_across_anchors() {
    let mut tool = rectangle();
    tool.update_point_by_index(&host(), 2, lp(8.0, 35.0));
    assert_eq!(tool.anchors(), &[lp(8.0, 80.0), lp(30.0, 35.0)]);
    tool.update_point_by_index(&host(), 3, lp(32.0, 85.0));
    assert_eq!(tool.anchors(), &[lp(8.0, 85.0), lp(32.0, 35.0)]);
}

#[test]
fn dragging_a_handle_lands_it_under_the_pointer() {
    for index in 0..8 {
        let mut tool = rectangle();
        let target = lp(20.0, 60.0);
        tool.update_point_by_index(&host(), index, lp(37.0, 22.0));
        tool.update_point_by_index(&host(), index, target);
        let handle = tool.geometry().map(|g| g.handles()[index]);
        let expected = Point::new(200.0, 200.0);
        let h = handle.unwrap_or_default();
        let (x_moved, y_moved) = (RECT_HANDLES[index].logical != Slot::Fixed, RECT_HANDLES[index].price != Slot::Fixed);
        if x_moved {
            assert_eq!(h.x, expected.x, "handle {index} x");
        }
        if y_moved {
            assert_eq!(h.y, expected.y, "handle {index} y");
        }
    }
}

#[test]
fn edge_handles_pin_to_the_anchor_they_move() {
    let tool = rectangle();
    // corners map to themselves
    assert_eq!(tool.drag_index(0), 0);
    assert_eq!(tool.drag_index(3), 3);
    // left/right edges: logical of anchor 0 / 1; top/bottom: price of anchor 0 / 1
    assert_eq!(tool.drag_index(4), 8);
    assert_eq!(tool.drag_index(5), 9);
    assert_eq!(tool.drag_index(6), 10);
    assert_eq!(tool.drag_index(7), 11);

    let flipped = Tool::new(&host(), ToolKind::Rectangle, vec![lp(30.0, 40.0), lp(10.0, 80.0)], &json!({}));
    assert_eq!(flipped.drag_index(4), 9);
    assert_eq!(flipped.drag_index(7), 10);
}

#[test]
fn pinned_edge_survives_crossing_the_opposite_edge() {
    let mut tool = rectangle();
    let index = tool.drag_index(4);
    for (logical, expected) in [(35.0, [35.0, 30.0]), (36.0, [36.0, 30.0]), (5.0, [5.0, 30.0])] {
        assert!(tool.update_point_by_index(&host(), index, lp(logical, 0.0)));
        let span = [tool.anchors()[0].logical, tool.anchors()[1].logical];
        assert_eq!(span, expected);
        assert_eq!((tool.anchors()[0].price, tool.anchors()[1].price), (80.0, 40.0));
    }

    let mut tool = rectangle();
    let index = tool.drag_index(6);
    tool.update_point_by_index(&host(), index, lp(0.0, 20.0));
    tool.update_point_by_index(&host(), index, lp(0.0, 10.0));
    assert_eq!((tool.anchors()[0].price, tool.anchors()[1].price), (10.0, 40.0));
}

#[test]
fn rect_index_out_of_range_is_no_op() {
    let mut tool = rectangle();
    assert!(!tool.update_point_by_index(&host(), 12, lp(0.0, 0.0)));
    assert_eq!(tool.anchors(), &[lp(10.0, 80.0), lp(30.0, 40.0)]);
}

// =============================================================
// Rectangle hit priority
// =============================================================

#[test]
fn rect_interior_is_shape() {
    let tool = rectangle();
    assert_eq!(tool.tool_hit_test(150.0, 250.0), Some(HitTestResult::shape()));
}

#[test]
fn rect_anchor_wins_over_interior() {
    let tool = rectangle();
    // inside the box and within 8px of the top-left stored corner
    assert_eq!(tool.tool_hit_test(105.0, 105.0), Some(HitTestResult::point(0)));
    // inside the box and within 8px of the bottom midpoint
    assert_eq!(tool.tool_hit_test(202.0, 294.0), Some(HitTestResult::point(7)));
}

#[test]
fn rect_edge_is_line() {
    let tool = rectangle();
    assert_eq!(tool.tool_hit_test(150.0, 103.0), Some(HitTestResult::line()));
    assert_eq!(tool.tool_hit_test(297.0, 250.0), Some(HitTestResult::line()));
}

#[test]
fn rect_outside_misses() {
    let tool = rectangle();
    assert_eq!(tool.tool_hit_test(50.0, 50.0), None);
    assert_eq!(tool.tool_hit_test(320.0, 200.0), None);
}

// =============================================================
// Circle and triangle
// =============================================================

#[test]
fn circle_hits() {
    // center (200, 200), rim (300, 200): radius 100
    let tool = Tool::new(&host(), ToolKind::Circle, vec![lp(20.0, 60.0), lp(30.0, 60.0)], &json!({}));
    assert_eq!(tool.tool_hit_test(200.0, 200.0), Some(HitTestResult::point(0)));
    assert_eq!(tool.tool_hit_test(200.0, 102.0), Some(HitTestResult::line()));
    assert_eq!(tool.tool_hit_test(240.0, 230.0), Some(HitTestResult::shape()));
    assert_eq!(tool.tool_hit_test(400.0, 400.0), None);
}

#[test]
fn circle_center_drag_carries_rim() {
    let mut tool = Tool::new(&host(), ToolKind::Circle, vec![lp(20.0, 60.0), lp(30.0, 60.0)], &json!({}));
    tool.update_point_by_index(&host(), 0, lp(25.0, 50.0));
    assert_eq!(tool.anchors(), &[lp(25.0, 50.0), lp(35.0, 50.0)]);
    tool.update_point_by_index(&host(), 1, lp(25.0, 70.0));
    assert_eq!(tool.anchors()[1], lp(25.0, 70.0));
}

#[test]
fn triangle_hits() {
    // (100, 300), (300, 300), (200, 100)
    let tool = Tool::new(
        &host(),
        ToolKind::Triangle,
        vec![lp(10.0, 40.0), lp(30.0, 40.0), lp(20.0, 80.0)],
        &json!({}),
    );
    assert_eq!(tool.tool_hit_test(300.0, 298.0), Some(HitTestResult::point(1)));
    assert_eq!(tool.tool_hit_test(200.0, 302.0), Some(HitTestResult::line()));
    assert_eq!(tool.tool_hit_test(200.0, 250.0), Some(HitTestResult::shape()));
    assert_eq!(tool.tool_hit_test(120.0, 120.0), None);
}

#[test]
fn shapes_fill_then_stroke() {
    let tool = rectangle();
    let mut surface = RecordingSurface::new();
    tool.draw(&mut surface).unwrap();
    assert_eq!(surface.fill_count(), 1);
    assert!(matches!(tool.geometry(), Some(Geometry::Shape(ShapeGeometry { outline: Outline::Rect(_), .. }))));
    assert!(surface.commands.iter().any(|c| matches!(c, crate::recording::Command::StrokeRect(_))));
}
