//! Geometry kernel: plain 2D value types and free functions over them.
//!
//! Everything here works in pixel space and knows nothing about tools,
//! hosts, or chart state. Degenerate inputs (coincident points, zero-length
//! directions, empty boxes) produce `None` or an empty result, never a panic.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, Mul, Sub};

use crate::consts::{ARROW_BASE_PX, ARROW_NOTCH_RATIO, GEOMETRY_EPSILON};

/// A point or vector in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `self + other * scale`.
    #[must_use]
    pub fn add_scaled(self, other: Point, scale: f64) -> Point {
        Point::new(other.x.mul_add(scale, self.x), other.y.mul_add(scale, self.y))
    }

    #[must_use]
    pub fn dot(self, other: Point) -> f64 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Z component of the 3D cross product.
    #[must_use]
    pub fn cross(self, other: Point) -> f64 {
        self.x.mul_add(other.y, -(self.y * other.x))
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    #[must_use]
    pub fn normalized(self) -> Option<Point> {
        let len = self.length();
        if len < GEOMETRY_EPSILON || !len.is_finite() {
            return None;
        }
        Some(Point::new(self.x / len, self.y / len))
    }

    /// The vector rotated 90° counter-clockwise (in a y-up frame).
    #[must_use]
    pub fn perpendicular(self) -> Point {
        Point::new(-self.y, self.x)
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() < GEOMETRY_EPSILON && (self.y - other.y).abs() < GEOMETRY_EPSILON
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Implicit line `a*x + b*y + c = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    #[must_use]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Box spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Viewport box `[0, 0, width, height]`.
    #[must_use]
    pub fn viewport(width: f64, height: f64) -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(width, height))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Inclusive containment with a small tolerance on every edge.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x - GEOMETRY_EPSILON
            && p.x <= self.max.x + GEOMETRY_EPSILON
            && p.y >= self.min.y - GEOMETRY_EPSILON
            && p.y <= self.max.y + GEOMETRY_EPSILON
    }

    /// The four edges in order: top, right, bottom, left.
    #[must_use]
    pub fn edges(&self) -> [[Point; 2]; 4] {
        let tl = self.min;
        let tr = Point::new(self.max.x, self.min.y);
        let br = self.max;
        let bl = Point::new(self.min.x, self.max.y);
        [[tl, tr], [tr, br], [br, bl], [bl, tl]]
    }
}

/// Line through two points, or `None` when they coincide.
#[must_use]
pub fn line_through_points(p0: Point, p1: Point) -> Option<Line> {
    if p0.approx_eq(p1) || !p0.is_finite() || !p1.is_finite() {
        return None;
    }
    Some(Line {
        a: p0.y - p1.y,
        b: p1.x - p0.x,
        c: p0.x.mul_add(p1.y, -(p1.x * p0.y)),
    })
}

/// Intersections of an infinite line with the boundary of a box.
///
/// Returns zero, one, or two points. Coincident hits (corners) are merged.
#[must_use]
pub fn intersect_line_and_box(line: &Line, bbox: &BoundingBox) -> Vec<Point> {
    let Line { a, b, c } = *line;
    let vertical = a.abs() >= GEOMETRY_EPSILON && b.abs() < GEOMETRY_EPSILON;
    let horizontal = b.abs() >= GEOMETRY_EPSILON && a.abs() < GEOMETRY_EPSILON;

    if a.abs() < GEOMETRY_EPSILON && b.abs() < GEOMETRY_EPSILON {
        return Vec::new();
    }
    if vertical {
        let x = -c / a;
        if x < bbox.min.x - GEOMETRY_EPSILON || x > bbox.max.x + GEOMETRY_EPSILON {
            return Vec::new();
        }
        return dedupe(vec![Point::new(x, bbox.min.y), Point::new(x, bbox.max.y)]);
    }
    if horizontal {
        let y = -c / b;
        if y < bbox.min.y - GEOMETRY_EPSILON || y > bbox.max.y + GEOMETRY_EPSILON {
            return Vec::new();
        }
        return dedupe(vec![Point::new(bbox.min.x, y), Point::new(bbox.max.x, y)]);
    }

    let mut hits = Vec::with_capacity(4);
    for x in [bbox.min.x, bbox.max.x] {
        let y = -a.mul_add(x, c) / b;
        let p = Point::new(x, y);
        if bbox.contains(p) {
            hits.push(p);
        }
    }
    for y in [bbox.min.y, bbox.max.y] {
        let x = -b.mul_add(y, c) / a;
        let p = Point::new(x, y);
        if bbox.contains(p) {
            hits.push(p);
        }
    }
    let mut out = dedupe(hits);
    out.truncate(2);
    out
}

fn dedupe(points: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if !out.iter().any(|q| q.approx_eq(p)) {
            out.push(p);
        }
    }
    out
}

/// Nearest boundary intersection of the ray from `origin` through `through`.
///
/// Only forward hits (`t >= 0`) count. Returns `None` for a zero-length
/// direction or when the ray misses the box.
#[must_use]
pub fn intersect_ray_and_box(origin: Point, through: Point, bbox: &BoundingBox) -> Option<Point> {
    forward_hits(origin, through, bbox)?
        .into_iter()
        .min_by(|(ta, _), (tb, _)| ta.total_cmp(tb))
        .map(|(_, p)| p)
}

/// Farthest forward boundary intersection; the exit point of a ray that may start outside the box.
fn intersect_ray_and_box_far(origin: Point, through: Point, bbox: &BoundingBox) -> Option<Point> {
    forward_hits(origin, through, bbox)?
        .into_iter()
        .max_by(|(ta, _), (tb, _)| ta.total_cmp(tb))
        .map(|(_, p)| p)
}

fn forward_hits(origin: Point, through: Point, bbox: &BoundingBox) -> Option<Vec<(f64, Point)>> {
    let dir = through - origin;
    let line = line_through_points(origin, through)?;
    let len_sq = dir.dot(dir);
    let hits: Vec<(f64, Point)> = intersect_line_and_box(&line, bbox)
        .into_iter()
        .map(|p| ((p - origin).dot(dir) / len_sq, p))
        .filter(|(t, _)| *t >= -GEOMETRY_EPSILON)
        .collect();
    Some(hits)
}

/// Resolve the drawn extent of a segment inside a `width` x `height` viewport.
///
/// - both extended: the full line clipped to the viewport;
/// - `extend_right` only: a ray from `p0` through `p1`;
/// - `extend_left` only: a ray from `p1` through `p0`;
/// - neither: the raw segment.
///
/// The result keeps the `p0 -> p1` orientation. Coincident endpoints yield `None`.
#[must_use]
pub fn extend_and_clip_line_segment(
    p0: Point,
    p1: Point,
    width: f64,
    height: f64,
    extend_left: bool,
    extend_right: bool,
) -> Option<[Point; 2]> {
    let line = line_through_points(p0, p1)?;
    if !extend_left && !extend_right {
        return Some([p0, p1]);
    }

    let bbox = BoundingBox::viewport(width, height);
    match (extend_left, extend_right) {
        (true, true) => {
            let hits = intersect_line_and_box(&line, &bbox);
            let (first, second) = match hits.as_slice() {
                [a, b] => (*a, *b),
                _ => return None,
            };
            let dir = p1 - p0;
            if (second - first).dot(dir) >= 0.0 {
                Some([first, second])
            } else {
                Some([second, first])
            }
        }
        (false, true) => Some([p0, ray_end(p0, p1, &bbox).unwrap_or(p1)]),
        (true, false) => Some([ray_end(p1, p0, &bbox).unwrap_or(p0), p1]),
        (false, false) => Some([p0, p1]),
    }
}

fn ray_end(origin: Point, through: Point, bbox: &BoundingBox) -> Option<Point> {
    if bbox.contains(origin) {
        intersect_ray_and_box(origin, through, bbox)
    } else {
        intersect_ray_and_box_far(origin, through, bbox)
    }
}

/// Arrowhead strokes for an arrow pointing from `from` to `to`.
///
/// Returns four point pairs: the two barbs (`barb -> tip`) followed by the
/// two notch edges (`barb -> notch`). The head grows with `stroke_width`
/// through a fixed spread table so thin lines still get a readable head.
/// Returns an empty vector for a zero-length arrow.
#[must_use]
pub fn arrow_points(from: Point, to: Point, stroke_width: f64) -> Vec<[Point; 2]> {
    let Some(dir) = (to - from).normalized() else {
        return Vec::new();
    };
    let width = stroke_width.max(1.0);
    let size = arrow_spread(width) * ARROW_BASE_PX * width;
    let base = to.add_scaled(dir, -size);
    let half = dir.perpendicular() * (size * 0.5);
    let left = base + half;
    let right = base - half;
    let notch = to.add_scaled(dir, -size * ARROW_NOTCH_RATIO);
    vec![[left, to], [right, to], [left, notch], [right, notch]]
}

#[allow(clippy::cast_possible_truncation)]
fn arrow_spread(width: f64) -> f64 {
    match width.round() as i64 {
        1 => 3.5,
        2 => 2.0,
        3 => 1.5,
        4 => 1.25,
        _ => 1.0,
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq < GEOMETRY_EPSILON * GEOMETRY_EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a.add_scaled(ab, t))
}

/// Inclusive containment in the rectangle spanned by two corners in any order.
#[must_use]
pub fn is_point_in_rectangle(p: Point, corner_a: Point, corner_b: Point) -> bool {
    BoundingBox::from_corners(corner_a, corner_b).contains(p)
}

#[must_use]
pub fn is_point_in_circle(p: Point, center: Point, radius: f64) -> bool {
    radius >= 0.0 && p.distance(center) <= radius
}

/// Barycentric point-in-triangle test. Degenerate triangles contain nothing.
#[must_use]
pub fn is_point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;
    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d02 = v0.dot(v2);
    let d11 = v1.dot(v1);
    let d12 = v1.dot(v2);
    let denom = d00.mul_add(d11, -(d01 * d01));
    if denom.abs() < GEOMETRY_EPSILON {
        return false;
    }
    let u = d11.mul_add(d02, -(d01 * d12)) / denom;
    let v = d00.mul_add(d12, -(d01 * d02)) / denom;
    u >= -GEOMETRY_EPSILON && v >= -GEOMETRY_EPSILON && u + v <= 1.0 + GEOMETRY_EPSILON
}

/// Round `price` to the nearest multiple of `tick`.
///
/// The result is snapped to the tick's decimal precision so that values such
/// as `100.05` come out exactly as written. A non-positive tick leaves the
/// price unchanged.
#[must_use]
pub fn round_to_min_move(price: f64, tick: f64) -> f64 {
    if tick.is_nan() || tick <= 0.0 || !tick.is_finite() || !price.is_finite() {
        return price;
    }
    let snapped = (price / tick).round() * tick;
    let factor = 10f64.powi(tick_precision(tick));
    (snapped * factor).round() / factor
}

/// Number of decimal places needed to represent `tick` (capped at 10).
#[must_use]
pub fn tick_precision(tick: f64) -> i32 {
    let mut scaled = tick;
    for decimals in 0..10 {
        if (scaled - scaled.round()).abs() < 1e-9 {
            return decimals;
        }
        scaled *= 10.0;
    }
    10
}

/// Profit target at `r_multiple` times the entry-to-stop distance.
///
/// A stop below entry is a long (target above entry); a stop above entry is a
/// short (target below entry). The result is rounded to `tick`.
#[must_use]
pub fn calculate_risk_reward_target(entry: f64, stop: f64, r_multiple: f64, tick: f64) -> f64 {
    let risk = (entry - stop).abs();
    let target = if stop <= entry {
        r_multiple.mul_add(risk, entry)
    } else {
        r_multiple.mul_add(-risk, entry)
    };
    round_to_min_move(target, tick)
}
