#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn scale() -> LinearScale {
    LinearScale::new(800.0, 500.0).with_bars(0.0, 10.0).with_prices(100.0, 0.0)
}

// --- LogicalPoint ---

#[test]
fn logical_point_offset() {
    let p = LogicalPoint::new(2.0, 50.0).offset(1.5, -10.0);
    assert_eq!(p, LogicalPoint::new(3.5, 40.0));
}

#[test]
fn logical_point_non_finite() {
    assert!(!LogicalPoint::new(f64::NAN, 1.0).is_finite());
    assert!(!LogicalPoint::new(1.0, f64::INFINITY).is_finite());
    assert!(LogicalPoint::new(1.0, 2.0).is_finite());
}

#[test]
fn logical_point_serde_field_names() {
    let json = serde_json::to_value(LogicalPoint::new(1.0, 2.0)).unwrap_or_default();
    assert_eq!(json, serde_json::json!({ "logical": 1.0, "price": 2.0 }));
}

// --- ViewPoint ---

#[test]
fn view_point_resolved_requires_both_axes() {
    assert!(ViewPoint { x: Some(1.0), y: None }.resolved().is_none());
    assert!(ViewPoint { x: None, y: Some(1.0) }.resolved().is_none());
    assert_eq!(ViewPoint { x: Some(1.0), y: Some(2.0) }.resolved(), Some(Point::new(1.0, 2.0)));
}

// --- LinearScale ---

#[test]
fn scale_maps_logical_linearly() {
    let s = scale().with_bars(5.0, 8.0);
    assert_eq!(s.logical_to_coordinate(5.0), Some(0.0));
    assert_eq!(s.logical_to_coordinate(10.0), Some(40.0));
}

#[test]
fn scale_maps_price_top_to_zero() {
    let s = scale();
    assert_eq!(s.price_to_coordinate(100.0), Some(0.0));
    assert_eq!(s.price_to_coordinate(0.0), Some(500.0));
    assert_eq!(s.price_to_coordinate(50.0), Some(250.0));
}

#[test]
fn scale_inverses_round_trip() {
    let s = scale().with_bars(3.0, 7.0).with_prices(220.0, 180.0);
    for logical in [-4.0, 0.0, 3.0, 12.5] {
        let x = s.logical_to_coordinate(logical).unwrap_or(f64::NAN);
        assert!(s.coordinate_to_logical(x).is_some_and(|l| approx_eq(l, logical)));
    }
    for price in [180.0, 195.5, 220.0] {
        let y = s.price_to_coordinate(price).unwrap_or(f64::NAN);
        assert!(s.coordinate_to_price(y).is_some_and(|p| approx_eq(p, price)));
    }
}

#[test]
fn scale_collapsed_price_range_is_none() {
    let s = scale().with_prices(50.0, 50.0);
    assert!(s.price_to_coordinate(50.0).is_none());
    assert!(s.coordinate_to_price(10.0).is_none());
}

#[test]
fn scale_logical_range_limits_transform() {
    let s = scale().with_logical_range(10.0, 0.0);
    assert!(s.logical_to_coordinate(-1.0).is_none());
    assert!(s.logical_to_coordinate(11.0).is_none());
    assert_eq!(s.logical_to_coordinate(10.0), Some(100.0));
}

#[test]
fn scale_formats_with_tick_precision() {
    let s = scale().with_min_move(0.05);
    assert_eq!(s.format_price(123.4), "123.40");
    let s = scale().with_min_move(1.0);
    assert_eq!(s.format_price(123.4), "123");
}

#[test]
fn scale_reports_pane_size() {
    assert_eq!(scale().pane_size(), PaneSize::new(800.0, 500.0));
}

// --- Adapter ---

#[test]
fn point_to_coordinate_maps_both_axes() {
    let vp = point_to_coordinate(&scale(), LogicalPoint::new(3.0, 80.0));
    assert_eq!(vp, ViewPoint { x: Some(30.0), y: Some(100.0) });
}

#[test]
fn point_to_coordinate_nulls_both_axes_on_failure() {
    let s = scale().with_logical_range(0.0, 5.0);
    let vp = point_to_coordinate(&s, LogicalPoint::new(9.0, 80.0));
    assert_eq!(vp, ViewPoint::NONE);
}

#[test]
fn point_to_coordinate_rejects_nan() {
    let vp = point_to_coordinate(&scale(), LogicalPoint::new(f64::NAN, 80.0));
    assert_eq!(vp, ViewPoint::NONE);
}

#[test]
fn points_to_coordinates_preserves_nulls() {
    let s = scale().with_logical_range(0.0, 5.0);
    let pts = [LogicalPoint::new(1.0, 50.0), LogicalPoint::new(99.0, 50.0), LogicalPoint::new(2.0, 50.0)];
    let out = points_to_coordinates(&s, &pts);
    assert_eq!(out.len(), 3);
    assert!(out[0].resolved().is_some());
    assert_eq!(out[1], ViewPoint::NONE);
    assert!(out[2].resolved().is_some());
}

#[test]
fn resolve_anchors_requires_count() {
    let pts = [LogicalPoint::new(1.0, 50.0)];
    assert!(resolve_anchors(&scale(), &pts, 2).is_none());
    assert_eq!(resolve_anchors(&scale(), &pts, 1), Some(vec![Point::new(10.0, 250.0)]));
}

#[test]
fn resolve_anchors_fails_on_any_null() {
    let s = scale().with_logical_range(0.0, 5.0);
    let pts = [LogicalPoint::new(1.0, 50.0), LogicalPoint::new(50.0, 50.0)];
    assert!(resolve_anchors(&s, &pts, 2).is_none());
}

#[test]
fn coordinate_to_point_inverts_adapter() {
    let s = scale();
    let lp = coordinate_to_point(&s, Point::new(30.0, 100.0));
    assert_eq!(lp, Some(LogicalPoint::new(3.0, 80.0)));
}
