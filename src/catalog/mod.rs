//! Tool catalog: per-family layout, hit-testing, drag policy, and drawing.
//!
//! Each family module exposes the same four functions (`layout`, `hit_test`,
//! `draw`, `update_anchor`) over its own cached geometry type. This module
//! dispatches on [`ToolKind`] and holds the hit helpers the families share.
//!
//! | Module | Kinds |
//! |--------|-------|
//! | [`lines`] | trend line, ray, extended line, horizontal/vertical/cross lines |
//! | [`shapes`] | rectangle, circle, triangle |
//! | [`channel`] | parallel channel |
//! | [`fib`] | Fibonacci retracement and extension |
//! | [`position`] | long and short position |
//! | [`polyline`] | brush, highlighter, path |
//! | [`annotation`] | text, callout, price label |
//! | [`range`] | date, price, date-and-price ranges, measure |
//! | [`pattern`] | Elliott wave, head and shoulders, XABCD |

pub mod annotation;
pub mod channel;
pub mod fib;
pub mod lines;
pub mod pattern;
pub mod polyline;
pub mod position;
pub mod range;
pub mod shapes;

use crate::consts::{HANDLE_RADIUS_PX, LINE_TOLERANCE_PX};
use crate::coords::{ChartHost, LogicalPoint};
use crate::error::DrawError;
use crate::geometry::{Point, distance_to_segment};
use crate::options::ToolOptions;
use crate::render::Surface;
use crate::tool::{HitTestResult, Tool, ToolKind};

/// Cached pixel layout of a tool, one variant per family.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Line(lines::LineGeometry),
    Shape(shapes::ShapeGeometry),
    Channel(channel::ChannelGeometry),
    Fib(fib::FibGeometry),
    Position(position::PositionGeometry),
    Polyline(polyline::PolylineGeometry),
    Annotation(annotation::AnnotationGeometry),
    Range(range::RangeGeometry),
    Pattern(pattern::PatternGeometry),
}

impl Geometry {
    /// Pixel positions of the draggable handles, indexed like anchors.
    #[must_use]
    pub fn handles(&self) -> &[Point] {
        match self {
            Self::Line(g) => &g.handles,
            Self::Shape(g) => &g.handles,
            Self::Channel(g) => &g.handles,
            Self::Fib(g) => &g.handles,
            Self::Position(g) => &g.handles,
            Self::Polyline(g) => &g.handles,
            Self::Annotation(g) => &g.handles,
            Self::Range(g) => &g.handles,
            Self::Pattern(g) => &g.handles,
        }
    }
}

pub(crate) fn layout(tool: &Tool, host: &dyn ChartHost) -> Option<Geometry> {
    if tool.anchors.iter().any(|a| !a.is_finite()) {
        return None;
    }
    match tool.kind {
        ToolKind::TrendLine
        | ToolKind::Ray
        | ToolKind::ExtendedLine
        | ToolKind::HorizontalLine
        | ToolKind::HorizontalRay
        | ToolKind::VerticalLine
        | ToolKind::CrossLine => lines::layout(tool, host).map(Geometry::Line),
        ToolKind::Rectangle | ToolKind::Circle | ToolKind::Triangle => shapes::layout(tool, host).map(Geometry::Shape),
        ToolKind::ParallelChannel => channel::layout(tool, host).map(Geometry::Channel),
        ToolKind::FibRetracement | ToolKind::FibExtension => fib::layout(tool, host).map(Geometry::Fib),
        ToolKind::LongPosition | ToolKind::ShortPosition => position::layout(tool, host).map(Geometry::Position),
        ToolKind::Brush | ToolKind::Highlighter | ToolKind::Path => {
            polyline::layout(tool, host).map(Geometry::Polyline)
        }
        ToolKind::Text | ToolKind::Callout | ToolKind::PriceLabel => {
            annotation::layout(tool, host).map(Geometry::Annotation)
        }
        ToolKind::DateRange | ToolKind::PriceRange | ToolKind::DatePriceRange | ToolKind::Measure => {
            range::layout(tool, host).map(Geometry::Range)
        }
        ToolKind::ElliottWave | ToolKind::HeadAndShoulders | ToolKind::XabcdPattern => {
            pattern::layout(tool, host).map(Geometry::Pattern)
        }
    }
}

pub(crate) fn hit_test(tool: &Tool, geometry: &Geometry, p: Point) -> Option<HitTestResult> {
    let tolerance = line_tolerance(&tool.options);
    match geometry {
        Geometry::Line(g) => lines::hit_test(g, p, tolerance),
        Geometry::Shape(g) => shapes::hit_test(g, p, tolerance),
        Geometry::Channel(g) => channel::hit_test(g, p, tolerance),
        Geometry::Fib(g) => fib::hit_test(g, p, tolerance),
        Geometry::Position(g) => position::hit_test(g, p, tolerance),
        Geometry::Polyline(g) => polyline::hit_test(g, p, tolerance),
        Geometry::Annotation(g) => annotation::hit_test(g, p, tolerance),
        Geometry::Range(g) => range::hit_test(g, p, tolerance),
        Geometry::Pattern(g) => pattern::hit_test(g, p, tolerance),
    }
}

pub(crate) fn draw(tool: &Tool, geometry: &Geometry, surface: &mut dyn Surface) -> Result<(), DrawError> {
    let options = &tool.options;
    match geometry {
        Geometry::Line(g) => lines::draw(g, options, surface),
        Geometry::Shape(g) => shapes::draw(g, options, surface),
        Geometry::Channel(g) => channel::draw(g, options, surface),
        Geometry::Fib(g) => fib::draw(g, options, surface),
        Geometry::Position(g) => position::draw(g, options, surface),
        Geometry::Polyline(g) => polyline::draw(g, options, surface),
        Geometry::Annotation(g) => annotation::draw(g, options, surface),
        Geometry::Range(g) => range::draw(g, options, surface),
        Geometry::Pattern(g) => pattern::draw(g, options, surface),
    }
}

/// Apply the kind's drag policy to anchor `index`. Returns `false` if the
/// index addresses no anchor.
pub(crate) fn update_anchor(tool: &mut Tool, index: usize, point: LogicalPoint) -> bool {
    match tool.kind {
        kind if is_rect_like(kind) => shapes::drag_rect_handle(&mut tool.anchors, index, point),
        ToolKind::Circle => shapes::drag_circle(&mut tool.anchors, index, point),
        ToolKind::ParallelChannel => channel::update_anchor(&mut tool.anchors, index, point),
        ToolKind::LongPosition | ToolKind::ShortPosition => position::update_anchor(tool, index, point),
        _ => set_anchor(&mut tool.anchors, index, point),
    }
}

/// Kinds dragged through the rectangle handle table.
fn is_rect_like(kind: ToolKind) -> bool {
    matches!(
        kind,
        ToolKind::Rectangle | ToolKind::DateRange | ToolKind::PriceRange | ToolKind::DatePriceRange | ToolKind::Measure
    )
}

/// Anchor index to drive a whole drag with, given the handle grabbed.
pub(crate) fn drag_index(tool: &Tool, index: usize) -> usize {
    if is_rect_like(tool.kind) { shapes::pin_rect_handle(&tool.anchors, index) } else { index }
}

/// Fill in derived anchors after construction or a bulk replace.
pub(crate) fn normalize_anchors(tool: &mut Tool, constructing: bool) {
    if matches!(tool.kind, ToolKind::LongPosition | ToolKind::ShortPosition) {
        position::normalize(tool, constructing);
    }
}

/// Plain drag policy: the addressed anchor takes the new point.
pub(crate) fn set_anchor(anchors: &mut [LogicalPoint], index: usize, point: LogicalPoint) -> bool {
    match anchors.get_mut(index) {
        Some(slot) => {
            *slot = point;
            true
        }
        None => false,
    }
}

/// Outline hit tolerance for the tool's stroke width.
#[must_use]
pub fn line_tolerance(options: &ToolOptions) -> f64 {
    LINE_TOLERANCE_PX.max(options.line_width() / 2.0 + 2.0)
}

/// Index of the handle nearest to `p` within [`HANDLE_RADIUS_PX`].
#[must_use]
pub fn nearest_handle(handles: &[Point], p: Point) -> Option<usize> {
    handles
        .iter()
        .enumerate()
        .map(|(i, h)| (i, h.distance(p)))
        .filter(|(_, d)| *d <= HANDLE_RADIUS_PX)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Whether `p` lies within `tolerance` of any segment.
#[must_use]
pub fn near_segments(segments: &[[Point; 2]], p: Point, tolerance: f64) -> bool {
    segments.iter().any(|[a, b]| distance_to_segment(p, *a, *b) <= tolerance)
}

/// Whether `p` lies within `tolerance` of a connected run of points.
#[must_use]
pub fn near_polyline(points: &[Point], closed: bool, p: Point, tolerance: f64) -> bool {
    let open = points.windows(2).any(|w| distance_to_segment(p, w[0], w[1]) <= tolerance);
    if open || !closed {
        return open;
    }
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 2 => distance_to_segment(p, *last, *first) <= tolerance,
        _ => false,
    }
}
