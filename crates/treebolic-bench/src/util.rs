use treebolic_core::synthetic;
use treebolic_core::{Color, LayerOut, Model, Stroke};
use treebolic_view::{Graphics, PainterConfig, Point, Rect, View};

/// Balanced tree of about `4^depth` nodes, weighed and laid out.
pub fn prepared_model(depth: usize) -> (Model, LayerOut) {
    let mut model = synthetic::balanced(depth, 4);
    let layout = LayerOut::new();
    treebolic_core::prepare(&mut model, &layout);
    (model, layout)
}

/// View over a balanced tree, sized and placed.
pub fn sized_view(depth: usize, width: f64, height: f64) -> View {
    let model = synthetic::balanced(depth, 4);
    let mut view = View::new(model, LayerOut::new(), PainterConfig::default());
    view.resize(width, height);
    view.apply_null_transform();
    view
}

/// Surface that only counts draw calls, so paint benchmarks measure the
/// painter and not a rasterizer.
#[derive(Debug, Default)]
pub struct NullGraphics {
    pub calls: usize,
    text_size: f32,
    color: Option<Color>,
}

impl Graphics for NullGraphics {
    fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    fn color(&self) -> Color {
        self.color.unwrap_or(Color::BLACK)
    }

    fn push_stroke(&mut self) {}

    fn pop_stroke(&mut self) {}

    fn set_stroke(&mut self, _stroke: Stroke, _width: u32) {}

    fn set_text_size(&mut self, size: f32) {
        self.text_size = size;
    }

    fn string_width(&self, text: &str) -> f64 {
        text.len() as f64 * self.text_size as f64 * 0.6
    }

    fn ascent(&self) -> f64 {
        self.text_size as f64 * 0.8
    }

    fn descent(&self) -> f64 {
        self.text_size as f64 * 0.2
    }

    fn set_zoom(&mut self, _factor: f64, _pivot: Point) {}

    fn draw_background(&mut self, _color: Color, _area: Rect) {
        self.calls += 1;
    }

    fn draw_line(&mut self, _from: Point, _to: Point) {
        self.calls += 1;
    }

    fn draw_arc(&mut self, _frame: Rect, _start: f64, _extent: f64) {
        self.calls += 1;
    }

    fn draw_polygon(&mut self, _points: &[Point]) {
        self.calls += 1;
    }

    fn fill_polygon(&mut self, _points: &[Point]) {
        self.calls += 1;
    }

    fn draw_polyline(&mut self, _points: &[Point]) {
        self.calls += 1;
    }

    fn draw_oval(&mut self, _frame: Rect) {
        self.calls += 1;
    }

    fn fill_oval(&mut self, _frame: Rect) {
        self.calls += 1;
    }

    fn draw_round_rect(&mut self, _rect: Rect, _radius: f64) {
        self.calls += 1;
    }

    fn fill_round_rect(&mut self, _rect: Rect, _radius: f64) {
        self.calls += 1;
    }

    fn draw_string(&mut self, _text: &str, _at: Point) {
        self.calls += 1;
    }

    fn draw_string_rotated(&mut self, _text: &str, _pivot: Point, _angle: f64, _offset: Point) {
        self.calls += 1;
    }

    fn image_size(&mut self, _key: &str) -> Option<(f64, f64)> {
        None
    }

    fn draw_image(&mut self, _key: &str, _rect: Rect) {
        self.calls += 1;
    }
}
