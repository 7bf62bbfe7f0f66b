//! Drawing surface the painter renders onto.
//!
//! Coordinates are view pixels, y down. Implementations keep a current color,
//! a stroke stack and a text size; the painter saves and restores what it
//! changes.

use crate::geom::{Point, Rect};
use treebolic_core::{Color, Stroke};

pub trait Graphics {
    fn set_color(&mut self, color: Color);
    fn color(&self) -> Color;

    fn push_stroke(&mut self);
    fn pop_stroke(&mut self);
    fn set_stroke(&mut self, stroke: Stroke, width: u32);

    fn set_text_size(&mut self, size: f32);
    fn string_width(&self, text: &str) -> f64;
    fn ascent(&self) -> f64;
    fn descent(&self) -> f64;

    /// Scale everything drawn afterwards by `factor` around `pivot`.
    fn set_zoom(&mut self, factor: f64, pivot: Point);

    fn draw_background(&mut self, color: Color, area: Rect);
    fn draw_line(&mut self, from: Point, to: Point);
    /// Arc of the ellipse inscribed in `frame`, angles in degrees.
    fn draw_arc(&mut self, frame: Rect, start: f64, extent: f64);
    fn draw_polygon(&mut self, points: &[Point]);
    fn fill_polygon(&mut self, points: &[Point]);
    fn draw_polyline(&mut self, points: &[Point]);
    fn draw_oval(&mut self, frame: Rect);
    fn fill_oval(&mut self, frame: Rect);
    fn draw_round_rect(&mut self, rect: Rect, radius: f64);
    fn fill_round_rect(&mut self, rect: Rect, radius: f64);

    /// Text with its baseline starting at `at`.
    fn draw_string(&mut self, text: &str, at: Point);
    /// Text rotated by `angle` radians around `pivot`, drawn at `offset` in
    /// the rotated frame.
    fn draw_string_rotated(&mut self, text: &str, pivot: Point, angle: f64, offset: Point);

    /// Natural size of the image behind `key`, if it can be loaded.
    fn image_size(&mut self, key: &str) -> Option<(f64, f64)>;
    fn draw_image(&mut self, key: &str, rect: Rect);
}
