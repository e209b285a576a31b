// Surface implementation over the browser's 2D canvas context.
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use crate::model::Rgb;

/// Looks up the 2D context of a canvas, if the browser provides one.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
}

impl Surface for CanvasRenderingContext2d {
    fn reset_transform(&mut self) {
        self.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    }

    fn translate(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::translate(self, x, y).ok();
    }

    fn scale(&mut self, s: f64) {
        CanvasRenderingContext2d::scale(self, s, s).ok();
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn clear(&mut self, w: f64, h: f64) {
        self.clear_rect(0.0, 0.0, w, h);
    }

    fn set_fill(&mut self, color: Rgb) {
        self.set_fill_style_str(&color.to_hex());
    }

    fn set_stroke(&mut self, color: Rgb) {
        self.set_stroke_style_str(&color.to_hex());
    }

    fn set_line_width(&mut self, w: f64) {
        CanvasRenderingContext2d::set_line_width(self, w.max(0.001));
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        let segments: js_sys::Array = pattern.iter().map(|v| wasm_bindgen::JsValue::from_f64(*v)).collect();
        CanvasRenderingContext2d::set_line_dash(self, &segments).ok();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::stroke_rect(self, x, y, w, h);
    }

    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.begin_path();
        self.move_to(x0, y0);
        self.line_to(x1, y1);
        self.stroke();
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64) {
        self.begin_path();
        self.arc(cx, cy, r, 0.0, std::f64::consts::PI * 2.0).ok();
        self.fill();
    }
}
