//! Coordinate adapter between logical chart space and pixel space.
//!
//! Tools store anchors as [`LogicalPoint`]s (fractional bar index + price).
//! Every frame they are mapped to [`ViewPoint`]s through a [`ChartHost`],
//! which owns the time and price scales. A transform that cannot be derived
//! (no data at that index, collapsed price range) yields `None`, and a
//! `ViewPoint` with either axis missing is treated as missing on both.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::{Deserialize, Serialize};

use crate::consts::GEOMETRY_EPSILON;
use crate::geometry::{Point, tick_precision};

/// A point in chart space: fractional bar index and price.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub logical: f64,
    pub price: f64,
}

impl LogicalPoint {
    #[must_use]
    pub fn new(logical: f64, price: f64) -> Self {
        Self { logical, price }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.logical.is_finite() && self.price.is_finite()
    }

    /// Shift by a logical and price delta.
    #[must_use]
    pub fn offset(self, d_logical: f64, d_price: f64) -> Self {
        Self::new(self.logical + d_logical, self.price + d_price)
    }
}

/// A point in pixel space whose axes may be unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewPoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl ViewPoint {
    /// The unresolved point `{x: None, y: None}`.
    pub const NONE: ViewPoint = ViewPoint { x: None, y: None };

    /// Both axes as a pixel [`Point`], or `None` if either is unresolved.
    #[must_use]
    pub fn resolved(self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// Size of the drawing pane in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PaneSize {
    pub width: f64,
    pub height: f64,
}

impl PaneSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Transforms and instrument metadata supplied by the hosting chart.
pub trait ChartHost {
    /// Pixel x of a logical bar index, if derivable.
    fn logical_to_coordinate(&self, logical: f64) -> Option<f64>;
    /// Pixel y of a price, if derivable.
    fn price_to_coordinate(&self, price: f64) -> Option<f64>;
    /// Logical bar index at pixel x.
    fn coordinate_to_logical(&self, x: f64) -> Option<f64>;
    /// Price at pixel y.
    fn coordinate_to_price(&self, y: f64) -> Option<f64>;
    /// Display string for a price (or price delta).
    fn format_price(&self, price: f64) -> String;
    /// Smallest valid price increment of the instrument.
    fn min_move(&self) -> f64;
    /// Current pane size in pixels.
    fn pane_size(&self) -> PaneSize;
}

/// Map a logical point to pixel space. Either axis failing nulls both.
#[must_use]
pub fn point_to_coordinate(host: &dyn ChartHost, point: LogicalPoint) -> ViewPoint {
    if !point.is_finite() {
        return ViewPoint::NONE;
    }
    match (host.logical_to_coordinate(point.logical), host.price_to_coordinate(point.price)) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => ViewPoint { x: Some(x), y: Some(y) },
        _ => ViewPoint::NONE,
    }
}

/// Element-wise [`point_to_coordinate`], preserving unresolved entries.
#[must_use]
pub fn points_to_coordinates(host: &dyn ChartHost, points: &[LogicalPoint]) -> Vec<ViewPoint> {
    points.iter().map(|p| point_to_coordinate(host, *p)).collect()
}

/// Resolve the first `count` anchors to pixels, or `None` if any is missing.
#[must_use]
pub fn resolve_anchors(host: &dyn ChartHost, points: &[LogicalPoint], count: usize) -> Option<Vec<Point>> {
    if points.len() < count {
        return None;
    }
    points_to_coordinates(host, &points[..count])
        .into_iter()
        .map(ViewPoint::resolved)
        .collect()
}

/// Map a pixel position back to chart space through the host inverses.
#[must_use]
pub fn coordinate_to_point(host: &dyn ChartHost, p: Point) -> Option<LogicalPoint> {
    let logical = host.coordinate_to_logical(p.x)?;
    let price = host.coordinate_to_price(p.y)?;
    let point = LogicalPoint::new(logical, price);
    point.is_finite().then_some(point)
}

/// A linear time/price scale usable as a [`ChartHost`].
///
/// `bar_spacing` is pixels per bar and `first_logical` is the logical index
/// drawn at `x = 0`. Prices map linearly so that `price_top` sits at `y = 0`
/// and `price_bottom` at `y = height`. When `logical_range` is set, indices
/// outside it have no coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub bar_spacing: f64,
    pub first_logical: f64,
    pub price_top: f64,
    pub price_bottom: f64,
    pub width: f64,
    pub height: f64,
    pub min_move: f64,
    pub logical_range: Option<(f64, f64)>,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self {
            bar_spacing: 10.0,
            first_logical: 0.0,
            price_top: 100.0,
            price_bottom: 0.0,
            width: 800.0,
            height: 500.0,
            min_move: 0.01,
            logical_range: None,
        }
    }
}

impl LinearScale {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ..Self::default() }
    }

    #[must_use]
    pub fn with_bars(mut self, first_logical: f64, bar_spacing: f64) -> Self {
        self.first_logical = first_logical;
        self.bar_spacing = bar_spacing;
        self
    }

    #[must_use]
    pub fn with_prices(mut self, price_top: f64, price_bottom: f64) -> Self {
        self.price_top = price_top;
        self.price_bottom = price_bottom;
        self
    }

    #[must_use]
    pub fn with_min_move(mut self, min_move: f64) -> Self {
        self.min_move = min_move;
        self
    }

    #[must_use]
    pub fn with_logical_range(mut self, from: f64, to: f64) -> Self {
        self.logical_range = Some((from.min(to), from.max(to)));
        self
    }

    fn price_span(&self) -> Option<f64> {
        let span = self.price_top - self.price_bottom;
        (span.abs() >= GEOMETRY_EPSILON && self.height > 0.0).then_some(span)
    }
}

impl ChartHost for LinearScale {
    fn logical_to_coordinate(&self, logical: f64) -> Option<f64> {
        if let Some((from, to)) = self.logical_range {
            if logical < from || logical > to {
                return None;
            }
        }
        Some((logical - self.first_logical) * self.bar_spacing)
    }

    fn price_to_coordinate(&self, price: f64) -> Option<f64> {
        let span = self.price_span()?;
        Some((self.price_top - price) / span * self.height)
    }

    fn coordinate_to_logical(&self, x: f64) -> Option<f64> {
        if self.bar_spacing.abs() < GEOMETRY_EPSILON {
            return None;
        }
        Some(x / self.bar_spacing + self.first_logical)
    }

    fn coordinate_to_price(&self, y: f64) -> Option<f64> {
        let span = self.price_span()?;
        Some(self.price_top - y / self.height * span)
    }

    fn format_price(&self, price: f64) -> String {
        let decimals = usize::try_from(tick_precision(self.min_move)).unwrap_or(2);
        format!("{price:.decimals$}")
    }

    fn min_move(&self) -> f64 {
        self.min_move
    }

    fn pane_size(&self) -> PaneSize {
        PaneSize::new(self.width, self.height)
    }
}
