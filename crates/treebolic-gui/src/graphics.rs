//! [`Graphics`] backend drawing onto an egui painter.

use crate::images::ImageCache;
use eframe::egui;
use eframe::egui::epaint::TextShape;
use treebolic_core::{Color, Stroke};
use treebolic_view::{Graphics, Point, Rect};

/// Segments per full turn when flattening arcs and ovals.
const ARC_SEGMENTS: f64 = 96.0;
const DASH: f32 = 6.0;
const DASH_GAP: f32 = 4.0;
const DOT_SPACING: f32 = 4.0;

#[derive(Debug, Clone, Copy)]
struct StrokeState {
    stroke: Stroke,
    width: u32,
}

impl Default for StrokeState {
    fn default() -> Self {
        Self {
            stroke: Stroke::Solid,
            width: 1,
        }
    }
}

pub struct EguiGraphics<'a> {
    painter: &'a egui::Painter,
    images: &'a mut ImageCache,
    /// Screen position of view pixel (0, 0).
    offset: egui::Vec2,
    color: Color,
    stroke: StrokeState,
    strokes: Vec<StrokeState>,
    text_size: f32,
    zoom: f32,
    pivot: egui::Pos2,
}

impl<'a> EguiGraphics<'a> {
    pub fn new(painter: &'a egui::Painter, images: &'a mut ImageCache, offset: egui::Vec2) -> Self {
        Self {
            painter,
            images,
            offset,
            color: Color::BLACK,
            stroke: StrokeState::default(),
            strokes: Vec::new(),
            text_size: 12.0,
            zoom: 1.0,
            pivot: egui::Pos2::ZERO,
        }
    }

    fn pos(&self, p: Point) -> egui::Pos2 {
        let p = egui::pos2(p.x as f32, p.y as f32);
        let zoomed = self.pivot + (p - self.pivot) * self.zoom;
        zoomed + self.offset
    }

    fn rect(&self, r: Rect) -> egui::Rect {
        egui::Rect::from_two_pos(
            self.pos(Point::new(r.x, r.y)),
            self.pos(Point::new(r.right(), r.bottom())),
        )
    }

    fn color32(&self) -> egui::Color32 {
        to_color32(self.color)
    }

    fn pen(&self) -> egui::Stroke {
        egui::Stroke::new(self.stroke.width as f32 * self.zoom, self.color32())
    }

    fn font(&self) -> egui::FontId {
        egui::FontId::proportional(self.text_size * self.zoom)
    }

    /// Open polyline in the current stroke.
    fn stroke_path(&self, points: Vec<egui::Pos2>) {
        if points.len() < 2 {
            return;
        }
        match self.stroke.stroke {
            Stroke::Solid => {
                self.painter.add(egui::Shape::line(points, self.pen()));
            }
            Stroke::Dash => {
                let z = self.zoom;
                self.painter
                    .extend(egui::Shape::dashed_line(&points, self.pen(), DASH * z, DASH_GAP * z));
            }
            Stroke::Dot => {
                let radius = (self.stroke.width as f32 * self.zoom / 2.0).max(0.5);
                self.painter.extend(egui::Shape::dotted_line(
                    &points,
                    self.color32(),
                    DOT_SPACING * self.zoom,
                    radius,
                ));
            }
        }
    }

    fn galley(&self, text: &str) -> std::sync::Arc<egui::Galley> {
        self.painter
            .layout_no_wrap(text.to_string(), self.font(), self.color32())
    }

    /// Row height of the current font in unzoomed pixels.
    fn row_height(&self) -> f64 {
        let galley = self
            .painter
            .layout_no_wrap("Mg".to_string(), egui::FontId::proportional(self.text_size), self.color32());
        galley.size().y as f64
    }
}

pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Points of the arc of the ellipse inscribed in `frame`, y down, angles in
/// degrees counterclockwise from 3 o'clock.
pub fn arc_points(frame: Rect, start: f64, extent: f64) -> Vec<Point> {
    let center = frame.center();
    let (rx, ry) = (frame.width / 2.0, frame.height / 2.0);
    let n = ((extent.abs() / 360.0 * ARC_SEGMENTS).ceil() as usize).max(2);
    (0..=n)
        .map(|i| {
            let theta = (start + extent * i as f64 / n as f64).to_radians();
            Point::new(center.x + rx * theta.cos(), center.y - ry * theta.sin())
        })
        .collect()
}

impl Graphics for EguiGraphics<'_> {
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn push_stroke(&mut self) {
        self.strokes.push(self.stroke);
    }

    fn pop_stroke(&mut self) {
        if let Some(stroke) = self.strokes.pop() {
            self.stroke = stroke;
        }
    }

    fn set_stroke(&mut self, stroke: Stroke, width: u32) {
        self.stroke = StrokeState { stroke, width };
    }

    fn set_text_size(&mut self, size: f32) {
        self.text_size = size.max(1.0);
    }

    fn string_width(&self, text: &str) -> f64 {
        let galley = self.painter.layout_no_wrap(
            text.to_string(),
            egui::FontId::proportional(self.text_size),
            self.color32(),
        );
        galley.size().x as f64
    }

    fn ascent(&self) -> f64 {
        self.row_height() * 0.8
    }

    fn descent(&self) -> f64 {
        self.row_height() * 0.2
    }

    fn set_zoom(&mut self, factor: f64, pivot: Point) {
        self.zoom = factor as f32;
        self.pivot = egui::pos2(pivot.x as f32, pivot.y as f32);
    }

    fn draw_background(&mut self, color: Color, area: Rect) {
        // background ignores zoom
        let min = egui::pos2(area.x as f32, area.y as f32) + self.offset;
        let rect = egui::Rect::from_min_size(min, egui::vec2(area.width as f32, area.height as f32));
        self.painter.rect_filled(rect, 0.0, to_color32(color));
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        self.stroke_path(vec![self.pos(from), self.pos(to)]);
    }

    fn draw_arc(&mut self, frame: Rect, start: f64, extent: f64) {
        let points = arc_points(frame, start, extent)
            .into_iter()
            .map(|p| self.pos(p))
            .collect();
        self.stroke_path(points);
    }

    fn draw_polygon(&mut self, points: &[Point]) {
        let points: Vec<_> = points.iter().map(|&p| self.pos(p)).collect();
        self.painter.add(egui::Shape::closed_line(points, self.pen()));
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        let points: Vec<_> = points.iter().map(|&p| self.pos(p)).collect();
        self.painter.add(egui::Shape::convex_polygon(
            points,
            self.color32(),
            egui::Stroke::NONE,
        ));
    }

    fn draw_polyline(&mut self, points: &[Point]) {
        let points = points.iter().map(|&p| self.pos(p)).collect();
        self.stroke_path(points);
    }

    fn draw_oval(&mut self, frame: Rect) {
        let rect = self.rect(frame);
        self.painter
            .add(egui::Shape::ellipse_stroke(rect.center(), rect.size() / 2.0, self.pen()));
    }

    fn fill_oval(&mut self, frame: Rect) {
        let rect = self.rect(frame);
        self.painter
            .add(egui::Shape::ellipse_filled(rect.center(), rect.size() / 2.0, self.color32()));
    }

    fn draw_round_rect(&mut self, rect: Rect, radius: f64) {
        let rect = self.rect(rect);
        self.painter.rect_stroke(
            rect,
            radius as f32 * self.zoom,
            self.pen(),
            egui::StrokeKind::Inside,
        );
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f64) {
        let rect = self.rect(rect);
        self.painter
            .rect_filled(rect, radius as f32 * self.zoom, self.color32());
    }

    fn draw_string(&mut self, text: &str, at: Point) {
        let top = Point::new(at.x, at.y - self.ascent());
        let galley = self.galley(text);
        self.painter.galley(self.pos(top), galley, self.color32());
    }

    fn draw_string_rotated(&mut self, text: &str, pivot: Point, angle: f64, offset: Point) {
        // top left of the text in the rotated frame, then back to view pixels
        let (x, y) = (offset.x, offset.y - self.ascent());
        let (sin, cos) = angle.sin_cos();
        let top = Point::new(pivot.x + x * cos - y * sin, pivot.y + x * sin + y * cos);
        let galley = self.galley(text);
        let shape = TextShape::new(self.pos(top), galley, self.color32()).with_angle(angle as f32);
        self.painter.add(shape);
    }

    fn image_size(&mut self, key: &str) -> Option<(f64, f64)> {
        self.images.size(self.painter.ctx(), key)
    }

    fn draw_image(&mut self, key: &str, rect: Rect) {
        let target = self.rect(rect);
        if let Some(texture) = self.images.texture(self.painter.ctx(), key) {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            self.painter
                .image(texture.id(), target, uv, egui::Color32::WHITE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_points_quarter() {
        let frame = Rect::new(0.0, 0.0, 20.0, 20.0);
        let points = arc_points(frame, 0.0, 90.0);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first.x - 20.0).abs() < 1e-9 && (first.y - 10.0).abs() < 1e-9);
        // counterclockwise on screen ends at the top
        assert!((last.x - 10.0).abs() < 1e-9 && last.y.abs() < 1e-9);
    }

    #[test]
    fn test_arc_points_negative_extent() {
        let frame = Rect::new(0.0, 0.0, 20.0, 10.0);
        let points = arc_points(frame, 0.0, -90.0);
        let last = points[points.len() - 1];
        assert!((last.x - 10.0).abs() < 1e-9 && (last.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_color_conversion() {
        let c = to_color32(Color::rgb(1, 2, 3));
        assert_eq!(c, egui::Color32::from_rgb(1, 2, 3));
    }
}
