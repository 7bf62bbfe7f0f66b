//! [`Graphics`] backend that writes an SVG document.
//!
//! Text metrics are approximated with a fixed pitch font, good enough for
//! label cropping and layout in offline renders.

use std::fmt::Write;
use std::path::PathBuf;
use treebolic_core::{Color, Stroke};
use treebolic_view::{Graphics, Point, Rect};

const CHAR_WIDTH: f64 = 0.6;
const ASCENT: f64 = 0.8;
const DESCENT: f64 = 0.2;

#[derive(Debug, Clone, Copy)]
struct Pen {
    stroke: Stroke,
    width: u32,
}

pub struct SvgGraphics {
    width: f64,
    height: f64,
    body: String,
    color: Color,
    pen: Pen,
    pens: Vec<Pen>,
    text_size: f32,
    /// Open zoom groups.
    groups: usize,
    image_dir: Option<PathBuf>,
}

impl SvgGraphics {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            color: Color::BLACK,
            pen: Pen {
                stroke: Stroke::Solid,
                width: 1,
            },
            pens: Vec::new(),
            text_size: 12.0,
            groups: 0,
            image_dir: None,
        }
    }

    pub fn with_image_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.image_dir = dir;
        self
    }

    /// Close the document and return it.
    pub fn finish(mut self) -> String {
        for _ in 0..self.groups {
            self.body.push_str("</g>\n");
        }
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
    }

    fn fill(&self) -> String {
        paint_attr("fill", self.color)
    }

    fn stroke(&self) -> String {
        let mut attrs = format!(
            "fill=\"none\" {} stroke-width=\"{}\"",
            paint_attr("stroke", self.color),
            self.pen.width
        );
        match self.pen.stroke {
            Stroke::Solid => {}
            Stroke::Dash => attrs.push_str(" stroke-dasharray=\"6,4\""),
            Stroke::Dot => attrs.push_str(" stroke-dasharray=\"1,3\" stroke-linecap=\"round\""),
        }
        attrs
    }

    fn element(&mut self, element: std::fmt::Arguments<'_>) {
        let _ = self.body.write_fmt(element);
        self.body.push('\n');
    }

    fn resolve(&self, key: &str) -> PathBuf {
        match &self.image_dir {
            Some(dir) => dir.join(key),
            None => PathBuf::from(key),
        }
    }
}

fn paint_attr(name: &str, color: Color) -> String {
    if color.a == 255 {
        format!("{name}=\"#{}\"", color.to_hex())
    } else {
        format!(
            "{name}=\"#{}\" {name}-opacity=\"{:.3}\"",
            color.to_hex(),
            color.a as f64 / 255.0
        )
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Point at `degrees` on the ellipse inscribed in `frame`, y down.
fn ellipse_point(frame: Rect, degrees: f64) -> Point {
    let c = frame.center();
    let theta = degrees.to_radians();
    Point::new(
        c.x + frame.width / 2.0 * theta.cos(),
        c.y - frame.height / 2.0 * theta.sin(),
    )
}

impl Graphics for SvgGraphics {
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn push_stroke(&mut self) {
        self.pens.push(self.pen);
    }

    fn pop_stroke(&mut self) {
        if let Some(pen) = self.pens.pop() {
            self.pen = pen;
        }
    }

    fn set_stroke(&mut self, stroke: Stroke, width: u32) {
        self.pen = Pen { stroke, width };
    }

    fn set_text_size(&mut self, size: f32) {
        self.text_size = size.max(1.0);
    }

    fn string_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.text_size as f64 * CHAR_WIDTH
    }

    fn ascent(&self) -> f64 {
        self.text_size as f64 * ASCENT
    }

    fn descent(&self) -> f64 {
        self.text_size as f64 * DESCENT
    }

    fn set_zoom(&mut self, factor: f64, pivot: Point) {
        self.groups += 1;
        self.element(format_args!(
            "<g transform=\"translate({x:.2} {y:.2}) scale({factor:.4}) translate({nx:.2} {ny:.2})\">",
            x = pivot.x,
            y = pivot.y,
            nx = -pivot.x,
            ny = -pivot.y
        ));
    }

    fn draw_background(&mut self, color: Color, area: Rect) {
        let fill = paint_attr("fill", color);
        self.element(format_args!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" {fill}/>",
            area.x, area.y, area.width, area.height
        ));
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        let stroke = self.stroke();
        self.element(format_args!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" {stroke}/>",
            from.x, from.y, to.x, to.y
        ));
    }

    fn draw_arc(&mut self, frame: Rect, start: f64, extent: f64) {
        if extent.abs() >= 360.0 {
            self.draw_oval(frame);
            return;
        }
        let from = ellipse_point(frame, start);
        let to = ellipse_point(frame, start + extent);
        let large = u8::from(extent.abs() > 180.0);
        // counterclockwise on screen is the negative sweep direction
        let sweep = u8::from(extent < 0.0);
        let stroke = self.stroke();
        self.element(format_args!(
            "<path d=\"M {:.2} {:.2} A {:.2} {:.2} 0 {large} {sweep} {:.2} {:.2}\" {stroke}/>",
            from.x,
            from.y,
            frame.width / 2.0,
            frame.height / 2.0,
            to.x,
            to.y
        ));
    }

    fn draw_polygon(&mut self, points: &[Point]) {
        let (points, stroke) = (points_attr(points), self.stroke());
        self.element(format_args!("<polygon points=\"{points}\" {stroke}/>"));
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        let (points, fill) = (points_attr(points), self.fill());
        self.element(format_args!("<polygon points=\"{points}\" {fill}/>"));
    }

    fn draw_polyline(&mut self, points: &[Point]) {
        let (points, stroke) = (points_attr(points), self.stroke());
        self.element(format_args!("<polyline points=\"{points}\" {stroke}/>"));
    }

    fn draw_oval(&mut self, frame: Rect) {
        let (c, stroke) = (frame.center(), self.stroke());
        self.element(format_args!(
            "<ellipse cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\" {stroke}/>",
            c.x,
            c.y,
            frame.width / 2.0,
            frame.height / 2.0
        ));
    }

    fn fill_oval(&mut self, frame: Rect) {
        let (c, fill) = (frame.center(), self.fill());
        self.element(format_args!(
            "<ellipse cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\" {fill}/>",
            c.x,
            c.y,
            frame.width / 2.0,
            frame.height / 2.0
        ));
    }

    fn draw_round_rect(&mut self, rect: Rect, radius: f64) {
        let stroke = self.stroke();
        self.element(format_args!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius:.2}\" {stroke}/>",
            rect.x, rect.y, rect.width, rect.height
        ));
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f64) {
        let fill = self.fill();
        self.element(format_args!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius:.2}\" {fill}/>",
            rect.x, rect.y, rect.width, rect.height
        ));
    }

    fn draw_string(&mut self, text: &str, at: Point) {
        let (fill, size, text) = (self.fill(), self.text_size, escape(text));
        self.element(format_args!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"monospace\" font-size=\"{size:.1}\" {fill}>{text}</text>",
            at.x, at.y
        ));
    }

    fn draw_string_rotated(&mut self, text: &str, pivot: Point, angle: f64, offset: Point) {
        let (fill, size, text) = (self.fill(), self.text_size, escape(text));
        self.element(format_args!(
            "<text x=\"{:.2}\" y=\"{:.2}\" transform=\"rotate({:.2} {:.2} {:.2})\" font-family=\"monospace\" font-size=\"{size:.1}\" {fill}>{text}</text>",
            pivot.x + offset.x,
            pivot.y + offset.y,
            angle.to_degrees(),
            pivot.x,
            pivot.y
        ));
    }

    fn image_size(&mut self, key: &str) -> Option<(f64, f64)> {
        let path = self.resolve(key);
        match image::image_dimensions(&path) {
            Ok((w, h)) => Some((w as f64, h as f64)),
            Err(e) => {
                tracing::debug!("No image at {}: {}", path.display(), e);
                None
            }
        }
    }

    fn draw_image(&mut self, key: &str, rect: Rect) {
        let href = escape(&self.resolve(key).to_string_lossy());
        self.element(format_args!(
            "<image href=\"{href}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"/>",
            rect.x, rect.y, rect.width, rect.height
        ));
    }
}
