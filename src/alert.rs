//! Alert engine: does a bar satisfy a condition against a tool?
//!
//! Line-like tools imply one price per bar index and support the crossing
//! conditions. Rectangles and parallel channels imply a price zone over
//! their logical span and support the zone conditions. Evaluation is a pure
//! function of the tool, one bar, and its index: there is no bar history, so
//! entering and exiting compare the bar's own open and close.
//!
//! Anything that cannot be evaluated (other kinds, unset anchors, a
//! malformed bar, a condition the kind does not support) is a no-match.

#[cfg(test)]
#[path = "alert_test.rs"]
mod alert_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::channel::channel_bounds_at;
use crate::consts::GEOMETRY_EPSILON;
use crate::error::ToolError;
use crate::tool::{Tool, ToolId, ToolKind};

/// One OHLC price bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    #[must_use]
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self { open, high, low, close }
    }

    /// A bar with non-finite prices or `low > high` cannot be evaluated.
    #[must_use]
    pub fn is_void(&self) -> bool {
        ![self.open, self.high, self.low, self.close].iter().all(|v| v.is_finite()) || self.low > self.high
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    /// The bar's range touches the line.
    Crossing,
    /// Touches the line and closes at or above it.
    CrossingUp,
    /// Touches the line and closes at or below it.
    CrossingDown,
    /// Opens outside the zone and closes inside.
    Entering,
    /// Opens inside the zone and closes outside.
    Exiting,
    /// Closes inside the zone.
    Inside,
    /// Closes outside the zone.
    Outside,
}

impl AlertCondition {
    pub const ALL: [AlertCondition; 7] = [
        Self::Crossing,
        Self::CrossingUp,
        Self::CrossingDown,
        Self::Entering,
        Self::Exiting,
        Self::Inside,
        Self::Outside,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crossing => "crossing",
            Self::CrossingUp => "crossing_up",
            Self::CrossingDown => "crossing_down",
            Self::Entering => "entering",
            Self::Exiting => "exiting",
            Self::Inside => "inside",
            Self::Outside => "outside",
        }
    }

    /// Whether the condition tests a zone rather than a line.
    #[must_use]
    pub fn is_zone(self) -> bool {
        matches!(self, Self::Entering | Self::Exiting | Self::Inside | Self::Outside)
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertCondition {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ToolError::UnknownCondition(s.to_owned()))
    }
}

/// A standing alert: a condition watched on one tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRule {
    pub tool_id: ToolId,
    pub condition: AlertCondition,
}

impl AlertRule {
    #[must_use]
    pub fn new(tool_id: ToolId, condition: AlertCondition) -> Self {
        Self { tool_id, condition }
    }
}

/// Check whether `bar` at `logical_index` satisfies `condition` on `tool`.
#[must_use]
pub fn check_alert(tool: &Tool, bar: &Bar, logical_index: f64, condition: AlertCondition) -> bool {
    if bar.is_void() || !logical_index.is_finite() || tool.anchors.iter().any(|a| !a.is_finite()) {
        return false;
    }

    match tool.kind {
        ToolKind::VerticalLine => {
            condition == AlertCondition::Crossing
                && tool
                    .anchors
                    .first()
                    .is_some_and(|a| (a.logical.round() - logical_index.round()).abs() < GEOMETRY_EPSILON)
        }
        kind if kind.is_line_like() => tool
            .price_at_logical(logical_index)
            .is_some_and(|price| check_line(price, bar, condition)),
        ToolKind::Rectangle => {
            rectangle_zone(tool, logical_index).is_some_and(|(lo, hi)| check_zone(lo, hi, bar, condition))
        }
        ToolKind::ParallelChannel => channel_bounds_at(&tool.anchors, logical_index)
            .is_some_and(|(lo, hi)| check_zone(lo, hi, bar, condition)),
        _ => false,
    }
}

/// Crossing conditions against a single price.
fn check_line(price: f64, bar: &Bar, condition: AlertCondition) -> bool {
    let touched = bar.low <= price && price <= bar.high;
    match condition {
        AlertCondition::Crossing => touched,
        AlertCondition::CrossingUp => touched && bar.close >= price,
        AlertCondition::CrossingDown => touched && bar.close <= price,
        _ => false,
    }
}

/// Zone conditions against `[lo, hi]`.
fn check_zone(lo: f64, hi: f64, bar: &Bar, condition: AlertCondition) -> bool {
    let inside = |v: f64| lo <= v && v <= hi;
    match condition {
        AlertCondition::Inside => inside(bar.close),
        AlertCondition::Outside => !inside(bar.close),
        AlertCondition::Entering => !inside(bar.open) && inside(bar.close),
        AlertCondition::Exiting => inside(bar.open) && !inside(bar.close),
        _ => false,
    }
}

/// Price zone of a rectangle at `logical`, if within its logical span.
fn rectangle_zone(tool: &Tool, logical: f64) -> Option<(f64, f64)> {
    let (a0, a1) = (tool.anchors.first()?, tool.anchors.get(1)?);
    let (from, to) = (a0.logical.min(a1.logical), a0.logical.max(a1.logical));
    if logical < from - GEOMETRY_EPSILON || logical > to + GEOMETRY_EPSILON {
        return None;
    }
    Some((a0.price.min(a1.price), a0.price.max(a1.price)))
}
