//! [`Surface`] implementation for the browser's 2D canvas context.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. Fallible canvas calls map their
//! `JsValue` error into [`DrawError::Surface`].

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::error::DrawError;
use crate::geometry::{BoundingBox, Point};
use crate::render::Surface;

fn js_err(e: JsValue) -> DrawError {
    DrawError::Surface(format!("{e:?}"))
}

impl Surface for CanvasRenderingContext2d {
    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn set_stroke(&mut self, color: &str, width: f64, dash: &[f64]) -> Result<(), DrawError> {
        self.set_stroke_style_str(color);
        self.set_line_width(width);
        let dash_array = js_sys::Array::new();
        for d in dash {
            dash_array.push(&JsValue::from_f64(*d));
        }
        self.set_line_dash(&dash_array).map_err(js_err)
    }

    fn set_fill(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_font(&mut self, size_px: f64) {
        CanvasRenderingContext2d::set_font(self, &format!("{size_px:.0}px sans-serif"));
        self.set_text_align("left");
        self.set_text_baseline("top");
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, p: Point) {
        CanvasRenderingContext2d::move_to(self, p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        CanvasRenderingContext2d::line_to(self, p.x, p.y);
    }

    fn quadratic_curve_to(&mut self, ctrl: Point, end: Point) {
        CanvasRenderingContext2d::quadratic_curve_to(self, ctrl.x, ctrl.y, end.x, end.y);
    }

    fn arc(&mut self, center: Point, radius: f64) -> Result<(), DrawError> {
        // Start a subpath at the rim so consecutive circles are not joined.
        CanvasRenderingContext2d::move_to(self, center.x + radius, center.y);
        CanvasRenderingContext2d::arc(self, center.x, center.y, radius, 0.0, 2.0 * PI).map_err(js_err)
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn fill_rect(&mut self, rect: BoundingBox) {
        CanvasRenderingContext2d::fill_rect(self, rect.min.x, rect.min.y, rect.width(), rect.height());
    }

    fn stroke_rect(&mut self, rect: BoundingBox) {
        CanvasRenderingContext2d::stroke_rect(self, rect.min.x, rect.min.y, rect.width(), rect.height());
    }

    fn fill_text(&mut self, text: &str, top_left: Point) -> Result<(), DrawError> {
        CanvasRenderingContext2d::fill_text(self, text, top_left.x, top_left.y).map_err(js_err)
    }
}
