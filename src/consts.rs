//! Shared numeric constants for the drawings crate.

// ── Geometry ────────────────────────────────────────────────────

/// Tolerance for coefficient, coincidence, and parallelism checks.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// Base arrowhead length per unit of stroke width, in pixels.
pub const ARROW_BASE_PX: f64 = 5.0;

/// Fraction of the arrowhead length at which the notch sits.
pub const ARROW_NOTCH_RATIO: f64 = 0.7;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit radius in pixels for anchor handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Minimum screen-space tolerance in pixels for outlines.
pub const LINE_TOLERANCE_PX: f64 = 5.0;

/// Radius in pixels of the drawn anchor handle circle.
pub const HANDLE_DRAW_RADIUS_PX: f64 = 5.0;

/// Number of line segments used to flatten one quadratic curve for hit-testing.
pub const CURVE_SAMPLES: usize = 8;

// ── Text metrics ────────────────────────────────────────────────

/// Estimated average glyph advance as a fraction of font size.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Line height as a fraction of font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Padding in pixels around label text.
pub const LABEL_PADDING_PX: f64 = 4.0;

/// Gap in pixels between a point and a label placed beside it.
pub const LABEL_OFFSET_PX: f64 = 8.0;

// ── Trading ─────────────────────────────────────────────────────

/// Default R-multiple for the auto-computed position target.
pub const DEFAULT_RISK_REWARD: f64 = 3.0;
