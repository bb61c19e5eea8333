//! Style options: an open JSON record with typed accessors.
//!
//! Each tool owns a [`ToolOptions`] built from its kind's defaults overlaid
//! with the construction options. Later `apply_options` partials merge into
//! it key by key; a `null` value removes the key so the accessor default
//! applies again. Accessors never fail: a missing or mistyped key falls back
//! to a fixed default.

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::catalog::fib::{EXTENSION_LEVELS, RETRACEMENT_LEVELS};
use crate::tool::ToolKind;

/// Stroke dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Canvas dash array for this style at the given stroke width.
    #[must_use]
    pub fn dash(self, width: f64) -> Vec<f64> {
        let w = width.max(1.0);
        match self {
            Self::Solid => Vec::new(),
            Self::Dashed => vec![4.0 * w, 4.0 * w],
            Self::Dotted => vec![w, 2.0 * w],
        }
    }
}

/// A tool's style record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolOptions {
    value: Value,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self { value: json!({}) }
    }
}

impl ToolOptions {
    /// Defaults for `kind` overlaid with `overrides`.
    #[must_use]
    pub fn for_kind(kind: ToolKind, overrides: &Value) -> Self {
        let mut options = Self { value: defaults_for(kind) };
        options.merge(overrides);
        options
    }

    /// Merge a partial record. Returns `false` if `partial` is not a JSON object.
    pub fn merge(&mut self, partial: &Value) -> bool {
        let Some(incoming) = partial.as_object() else {
            return false;
        };
        if !self.value.is_object() {
            self.value = json!({});
        }
        if let Some(existing) = self.value.as_object_mut() {
            for (k, v) in incoming {
                if v.is_null() {
                    existing.remove(k);
                } else {
                    existing.insert(k.clone(), v.clone());
                }
            }
        }
        true
    }

    /// The raw JSON record.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.value.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.value
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.value.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Stroke color. Defaults to `"#2962FF"`.
    #[must_use]
    pub fn line_color(&self) -> &str {
        self.str_or("line_color", "#2962FF")
    }

    /// Stroke width in pixels, at least 1. Defaults to `1.0`.
    #[must_use]
    pub fn line_width(&self) -> f64 {
        self.f64_or("line_width", 1.0).max(1.0)
    }

    /// Dash pattern. Defaults to solid.
    #[must_use]
    pub fn line_style(&self) -> LineStyle {
        match self.value.get("line_style").and_then(Value::as_str) {
            Some("dashed") => LineStyle::Dashed,
            Some("dotted") => LineStyle::Dotted,
            _ => LineStyle::Solid,
        }
    }

    /// Fill color for closed shapes and zones.
    #[must_use]
    pub fn fill_color(&self) -> &str {
        self.str_or("fill_color", "rgba(41, 98, 255, 0.2)")
    }

    #[must_use]
    pub fn extend_left(&self) -> bool {
        self.bool_or("extend_left", false)
    }

    #[must_use]
    pub fn extend_right(&self) -> bool {
        self.bool_or("extend_right", false)
    }

    #[must_use]
    pub fn start_arrow(&self) -> bool {
        self.bool_or("start_arrow", false)
    }

    #[must_use]
    pub fn end_arrow(&self) -> bool {
        self.bool_or("end_arrow", false)
    }

    /// Label or body text. Empty when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.str_or("text", "")
    }

    /// Font size in pixels, clamped to `[8, 96]`. Defaults to `14.0`.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.f64_or("font_size", 14.0).clamp(8.0, 96.0)
    }

    #[must_use]
    pub fn text_color(&self) -> &str {
        self.str_or("text_color", "#FFFFFF")
    }

    /// Background behind labels and text boxes.
    #[must_use]
    pub fn label_background(&self) -> &str {
        self.str_or("label_background", "rgba(41, 98, 255, 0.85)")
    }

    #[must_use]
    pub fn show_labels(&self) -> bool {
        self.bool_or("show_labels", true)
    }

    /// Fibonacci coefficients, if overridden. Non-numeric entries are skipped.
    #[must_use]
    pub fn levels(&self) -> Option<Vec<f64>> {
        let arr = self.value.get("levels")?.as_array()?;
        Some(arr.iter().filter_map(Value::as_f64).filter(|v| v.is_finite()).collect())
    }

    /// Quadratic smoothing for freehand polylines.
    #[must_use]
    pub fn smooth(&self) -> bool {
        self.bool_or("smooth", false)
    }

    #[must_use]
    pub fn show_middle_line(&self) -> bool {
        self.bool_or("show_middle_line", true)
    }

    /// R-multiple for position targets. Defaults to `3.0`.
    #[must_use]
    pub fn risk_reward(&self) -> f64 {
        self.f64_or("risk_reward", crate::consts::DEFAULT_RISK_REWARD)
    }

    #[must_use]
    pub fn profit_color(&self) -> &str {
        self.str_or("profit_color", "rgba(8, 153, 129, 0.25)")
    }

    #[must_use]
    pub fn stop_color(&self) -> &str {
        self.str_or("stop_color", "rgba(242, 54, 69, 0.25)")
    }
}

/// Per-kind default record.
#[must_use]
pub fn defaults_for(kind: ToolKind) -> Value {
    match kind {
        ToolKind::Ray => json!({ "extend_right": true }),
        ToolKind::ExtendedLine => json!({ "extend_left": true, "extend_right": true }),
        ToolKind::HorizontalLine | ToolKind::HorizontalRay | ToolKind::VerticalLine | ToolKind::CrossLine => {
            json!({ "line_color": "#2962FF" })
        }
        ToolKind::Rectangle | ToolKind::Circle | ToolKind::Triangle => json!({
            "line_color": "#9C27B0",
            "fill_color": "rgba(156, 39, 176, 0.2)",
        }),
        ToolKind::ParallelChannel => json!({
            "fill_color": "rgba(41, 98, 255, 0.1)",
            "show_middle_line": true,
        }),
        ToolKind::FibRetracement => json!({
            "line_color": "#787B86",
            "levels": RETRACEMENT_LEVELS,
        }),
        ToolKind::FibExtension => json!({
            "line_color": "#787B86",
            "levels": EXTENSION_LEVELS,
        }),
        ToolKind::LongPosition | ToolKind::ShortPosition => json!({
            "line_color": "#787B86",
            "risk_reward": crate::consts::DEFAULT_RISK_REWARD,
        }),
        ToolKind::Brush => json!({ "smooth": true, "line_width": 2.0 }),
        ToolKind::Highlighter => json!({
            "smooth": true,
            "line_width": 12.0,
            "line_color": "rgba(255, 235, 59, 0.4)",
        }),
        ToolKind::Path => json!({ "smooth": false, "line_width": 2.0 }),
        ToolKind::Text => json!({ "text": "Text", "text_color": "#2962FF", "label_background": "transparent" }),
        ToolKind::Callout => json!({ "text": "Callout" }),
        ToolKind::PriceLabel => json!({}),
        ToolKind::DateRange | ToolKind::PriceRange | ToolKind::DatePriceRange => json!({
            "fill_color": "rgba(41, 98, 255, 0.15)",
        }),
        ToolKind::Measure => json!({
            "fill_color": "rgba(8, 153, 129, 0.15)",
            "line_color": "#089981",
        }),
        ToolKind::ElliottWave => json!({ "line_color": "#3D85C6" }),
        ToolKind::XabcdPattern => json!({
            "line_color": "#2962FF",
            "fill_color": "rgba(41, 98, 255, 0.15)",
        }),
        ToolKind::HeadAndShoulders => json!({
            "line_color": "#089981",
            "fill_color": "rgba(8, 153, 129, 0.2)",
        }),
        ToolKind::TrendLine => json!({}),
    }
}
