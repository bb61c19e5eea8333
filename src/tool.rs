//! Tool primitive: the contract every drawing object implements.
//!
//! A [`Tool`] is one placed drawing. Its anchors live in logical space and are
//! the single source of truth; the pixel layout is a per-frame cache
//! ([`Geometry`]) rebuilt by [`Tool::update_view`] and read by both
//! [`Tool::tool_hit_test`] and [`Tool::draw`]. Per-kind behaviour (layout,
//! hit priority, drag policy, drawing) lives in [`crate::catalog`] and is
//! dispatched on [`ToolKind`].
//!
//! Nothing here fails: unresolved or degenerate anchors clear the cache, so
//! the tool draws nothing and hit-tests to `None`.

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;
use uuid::Uuid;

use crate::catalog::{self, Geometry};
use crate::catalog::range::RangeStats;
use crate::coords::{ChartHost, LogicalPoint};
use crate::error::{DrawError, ToolError};
use crate::geometry::Point;
use crate::options::ToolOptions;
use crate::render::{Surface, draw_handles};

/// Unique identifier for a placed tool.
pub type ToolId = Uuid;

/// The kind of a drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    TrendLine,
    Ray,
    ExtendedLine,
    HorizontalLine,
    HorizontalRay,
    VerticalLine,
    CrossLine,
    Rectangle,
    Circle,
    Triangle,
    ParallelChannel,
    FibRetracement,
    FibExtension,
    LongPosition,
    ShortPosition,
    /// Freehand stroke, smoothed by default.
    Brush,
    /// Wide translucent freehand stroke, smoothed by default.
    Highlighter,
    /// Straight-segment polyline.
    Path,
    Text,
    Callout,
    PriceLabel,
    DateRange,
    PriceRange,
    DatePriceRange,
    Measure,
    ElliottWave,
    HeadAndShoulders,
    /// Five-point harmonic pattern (X, A, B, C, D).
    XabcdPattern,
}

impl ToolKind {
    /// Every kind, in declaration order.
    pub const ALL: [ToolKind; 28] = [
        Self::TrendLine,
        Self::Ray,
        Self::ExtendedLine,
        Self::HorizontalLine,
        Self::HorizontalRay,
        Self::VerticalLine,
        Self::CrossLine,
        Self::Rectangle,
        Self::Circle,
        Self::Triangle,
        Self::ParallelChannel,
        Self::FibRetracement,
        Self::FibExtension,
        Self::LongPosition,
        Self::ShortPosition,
        Self::Brush,
        Self::Highlighter,
        Self::Path,
        Self::Text,
        Self::Callout,
        Self::PriceLabel,
        Self::DateRange,
        Self::PriceRange,
        Self::DatePriceRange,
        Self::Measure,
        Self::ElliottWave,
        Self::HeadAndShoulders,
        Self::XabcdPattern,
    ];

    /// The snake_case name used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrendLine => "trend_line",
            Self::Ray => "ray",
            Self::ExtendedLine => "extended_line",
            Self::HorizontalLine => "horizontal_line",
            Self::HorizontalRay => "horizontal_ray",
            Self::VerticalLine => "vertical_line",
            Self::CrossLine => "cross_line",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::ParallelChannel => "parallel_channel",
            Self::FibRetracement => "fib_retracement",
            Self::FibExtension => "fib_extension",
            Self::LongPosition => "long_position",
            Self::ShortPosition => "short_position",
            Self::Brush => "brush",
            Self::Highlighter => "highlighter",
            Self::Path => "path",
            Self::Text => "text",
            Self::Callout => "callout",
            Self::PriceLabel => "price_label",
            Self::DateRange => "date_range",
            Self::PriceRange => "price_range",
            Self::DatePriceRange => "date_price_range",
            Self::Measure => "measure",
            Self::ElliottWave => "elliott_wave",
            Self::HeadAndShoulders => "head_and_shoulders",
            Self::XabcdPattern => "xabcd_pattern",
        }
    }

    /// Number of anchors the kind is defined by, or `None` for freehand kinds.
    #[must_use]
    pub fn anchor_count(self) -> Option<usize> {
        match self {
            Self::HorizontalLine
            | Self::HorizontalRay
            | Self::VerticalLine
            | Self::CrossLine
            | Self::Text
            | Self::PriceLabel => Some(1),
            Self::TrendLine
            | Self::Ray
            | Self::ExtendedLine
            | Self::Rectangle
            | Self::Circle
            | Self::FibRetracement
            | Self::Callout
            | Self::DateRange
            | Self::PriceRange
            | Self::DatePriceRange
            | Self::Measure => Some(2),
            Self::Triangle | Self::ParallelChannel | Self::FibExtension | Self::LongPosition | Self::ShortPosition => {
                Some(3)
            }
            Self::HeadAndShoulders | Self::XabcdPattern => Some(5),
            Self::ElliottWave => Some(6),
            Self::Brush | Self::Highlighter | Self::Path => None,
        }
    }

    /// Whether the kind implies a single price per bar index (crossing alerts).
    #[must_use]
    pub fn is_line_like(self) -> bool {
        matches!(
            self,
            Self::TrendLine
                | Self::Ray
                | Self::ExtendedLine
                | Self::HorizontalLine
                | Self::HorizontalRay
                | Self::VerticalLine
                | Self::CrossLine
        )
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ToolError::UnknownKind(s.to_owned()))
    }
}

/// Which part of a tool was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    /// An anchor handle (or a text box standing in for one).
    Point,
    /// An outline or stroke.
    Line,
    /// The interior of a closed shape.
    Shape,
}

/// Result of a successful hit test. A miss is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitTestResult {
    #[serde(rename = "type")]
    pub kind: HitKind,
    /// Anchor index for [`HitKind::Point`] hits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl HitTestResult {
    #[must_use]
    pub fn point(index: usize) -> Self {
        Self { kind: HitKind::Point, index: Some(index) }
    }

    #[must_use]
    pub fn line() -> Self {
        Self { kind: HitKind::Line, index: None }
    }

    #[must_use]
    pub fn shape() -> Self {
        Self { kind: HitKind::Shape, index: None }
    }
}

/// A placed drawing tool.
#[derive(Debug, Clone)]
pub struct Tool {
    pub(crate) id: ToolId,
    pub(crate) kind: ToolKind,
    pub(crate) anchors: Vec<LogicalPoint>,
    pub(crate) options: ToolOptions,
    pub(crate) selected: bool,
    pub(crate) locked: bool,
    pub(crate) z_index: i64,
    /// Instrument tick captured at construction.
    pub(crate) min_move: f64,
    /// Position tools only: target follows the stop at the configured R-multiple.
    pub(crate) auto_target: bool,
    pub(crate) geometry: Option<Geometry>,
}

impl Tool {
    /// Construct a tool at drawing completion and compute its first view.
    ///
    /// `options` overlays the kind's defaults. Position tools given only
    /// entry and stop get an auto-computed target.
    #[must_use]
    pub fn new(host: &dyn ChartHost, kind: ToolKind, anchors: Vec<LogicalPoint>, options: &Value) -> Self {
        let mut tool = Self {
            id: Uuid::new_v4(),
            kind,
            anchors,
            options: ToolOptions::for_kind(kind, options),
            selected: false,
            locked: false,
            z_index: 0,
            min_move: host.min_move(),
            auto_target: false,
            geometry: None,
        };
        catalog::normalize_anchors(&mut tool, true);
        tool.update_view(host);
        tool
    }

    #[must_use]
    pub fn id(&self) -> ToolId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    #[must_use]
    pub fn anchors(&self) -> &[LogicalPoint] {
        &self.anchors
    }

    #[must_use]
    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    #[must_use]
    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        self.z_index = z_index;
    }

    #[must_use]
    pub fn min_move(&self) -> f64 {
        self.min_move
    }

    /// Position tools: whether the target still tracks the stop.
    #[must_use]
    pub fn is_auto_target(&self) -> bool {
        self.auto_target
    }

    /// The cached pixel layout from the last [`Tool::update_view`].
    #[must_use]
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Replace all anchors at once and refresh the view.
    pub fn update_points(&mut self, host: &dyn ChartHost, points: Vec<LogicalPoint>) {
        self.anchors = points;
        catalog::normalize_anchors(self, false);
        self.update_view(host);
    }

    /// Move one anchor under the kind's drag policy and refresh the view.
    ///
    /// Returns `false` (and changes nothing) for an out-of-range index or a
    /// non-finite point.
    pub fn update_point_by_index(&mut self, host: &dyn ChartHost, index: usize, point: LogicalPoint) -> bool {
        if !point.is_finite() {
            trace!(id = %self.id, index, "ignoring non-finite anchor");
            return false;
        }
        if !catalog::update_anchor(self, index, point) {
            trace!(id = %self.id, kind = %self.kind, index, "anchor index out of range");
            return false;
        }
        self.update_view(host);
        true
    }

    /// Index to pass to [`Tool::update_point_by_index`] for every move of a
    /// drag that grabbed handle `index`. Edge handles of rectangle-like kinds
    /// are bound to the stored anchor they move when the drag starts.
    #[must_use]
    pub fn drag_index(&self, index: usize) -> usize {
        catalog::drag_index(self, index)
    }

    /// Shift every anchor by a logical and price delta.
    pub fn translate(&mut self, host: &dyn ChartHost, d_logical: f64, d_price: f64) {
        if !d_logical.is_finite() || !d_price.is_finite() {
            return;
        }
        for a in &mut self.anchors {
            *a = a.offset(d_logical, d_price);
        }
        self.update_view(host);
    }

    /// Selection only changes presentation (handles are drawn when selected).
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Merge a partial style record. Returns `true` when the host should repaint.
    pub fn apply_options(&mut self, partial: &Value) -> bool {
        self.options.merge(partial)
    }

    /// Recompute the pixel layout from the current anchors.
    pub fn update_view(&mut self, host: &dyn ChartHost) {
        self.geometry = catalog::layout(self, host);
        if self.geometry.is_none() {
            trace!(id = %self.id, kind = %self.kind, "no layout for current view");
        }
    }

    /// Hit-test a pixel position against the cached layout.
    #[must_use]
    pub fn tool_hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        let geometry = self.geometry.as_ref()?;
        let p = Point::new(x, y);
        if !p.is_finite() {
            return None;
        }
        catalog::hit_test(self, geometry, p)
    }

    /// Hit-test anchor handles only.
    #[must_use]
    pub fn handle_hit_test(&self, x: f64, y: f64) -> Option<usize> {
        let geometry = self.geometry.as_ref()?;
        catalog::nearest_handle(geometry.handles(), Point::new(x, y))
    }

    /// Draw the cached layout. Handles are drawn while selected.
    ///
    /// # Errors
    ///
    /// Propagates [`DrawError`] from the surface.
    pub fn draw(&self, surface: &mut dyn Surface) -> Result<(), DrawError> {
        let Some(geometry) = &self.geometry else {
            return Ok(());
        };
        surface.save();
        let drawn = catalog::draw(self, geometry, surface);
        surface.restore();
        drawn?;
        if self.selected {
            draw_handles(surface, geometry.handles())?;
        }
        Ok(())
    }

    /// Price implied by the tool at a logical index (line-like kinds only).
    #[must_use]
    pub fn price_at_logical(&self, logical: f64) -> Option<f64> {
        catalog::lines::price_at_logical(self, logical)
    }

    /// `(coefficient, price)` pairs for Fibonacci kinds.
    #[must_use]
    pub fn fib_levels(&self) -> Option<Vec<(f64, f64)>> {
        catalog::fib::levels(self)
    }

    /// Derived measurements for range kinds.
    #[must_use]
    pub fn range_stats(&self) -> Option<RangeStats> {
        catalog::range::stats(self)
    }
}
