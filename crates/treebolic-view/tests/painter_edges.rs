use treebolic_core::{
    Color, Edge, EdgeStyle, LayerOut, Model, MountPoint, NodeData, NodeId, Stroke, Terminator, TerminatorShape,
};
use treebolic_hyper::Complex;
use treebolic_view::painter::TERMINATOR_MIN_SPAN2;
use treebolic_view::{Graphics, PainterConfig, Point, Rect, View};

/// Records what the painter draws; text metrics are a fixed-pitch font.
#[derive(Default)]
struct Recorder {
    color: Option<Color>,
    text_size: f32,
    strokes: usize,
    lines: Vec<(Point, Point)>,
    arcs: Vec<Rect>,
    /// Node labels.
    strings: Vec<String>,
    /// Edge labels.
    rotated: Vec<String>,
    boxes: Vec<Rect>,
    fills: Vec<Vec<Point>>,
    outlines: usize,
    polylines: Vec<Vec<Point>>,
    /// Size reported for every image key.
    image: Option<(f64, f64)>,
    images: Vec<String>,
}

impl Recorder {
    fn edges(&self) -> usize {
        self.lines.len() + self.arcs.len()
    }
}

impl Graphics for Recorder {
    fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    fn color(&self) -> Color {
        self.color.unwrap_or(Color::BLACK)
    }

    fn push_stroke(&mut self) {
        self.strokes += 1;
    }

    fn pop_stroke(&mut self) {
        self.strokes -= 1;
    }

    fn set_stroke(&mut self, _stroke: Stroke, _width: u32) {}

    fn set_text_size(&mut self, size: f32) {
        self.text_size = size;
    }

    fn string_width(&self, text: &str) -> f64 {
        0.6 * f64::from(self.text_size) * text.chars().count() as f64
    }

    fn ascent(&self) -> f64 {
        0.8 * f64::from(self.text_size)
    }

    fn descent(&self) -> f64 {
        0.2 * f64::from(self.text_size)
    }

    fn set_zoom(&mut self, _factor: f64, _pivot: Point) {}

    fn draw_background(&mut self, _color: Color, _area: Rect) {}

    fn draw_line(&mut self, from: Point, to: Point) {
        self.lines.push((from, to));
    }

    fn draw_arc(&mut self, frame: Rect, _start: f64, _extent: f64) {
        self.arcs.push(frame);
    }

    fn draw_polygon(&mut self, _points: &[Point]) {
        self.outlines += 1;
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        self.fills.push(points.to_vec());
    }

    fn draw_polyline(&mut self, points: &[Point]) {
        self.polylines.push(points.to_vec());
    }

    fn draw_oval(&mut self, _frame: Rect) {}

    fn fill_oval(&mut self, _frame: Rect) {}

    fn draw_round_rect(&mut self, _rect: Rect, _radius: f64) {}

    fn fill_round_rect(&mut self, rect: Rect, _radius: f64) {
        self.boxes.push(rect);
    }

    fn draw_string(&mut self, text: &str, _at: Point) {
        self.strings.push(text.to_string());
    }

    fn draw_string_rotated(&mut self, text: &str, _pivot: Point, _angle: f64, _offset: Point) {
        self.rotated.push(text.to_string());
    }

    fn image_size(&mut self, _key: &str) -> Option<(f64, f64)> {
        self.image
    }

    fn draw_image(&mut self, key: &str, _rect: Rect) {
        self.images.push(key.to_string());
    }
}

fn three_nodes(label: &str) -> (Model, NodeId, NodeId) {
    let mut model = Model::new(NodeData::new("root").with_label(label));
    let root = model.root();
    let a = model.add_child(root, NodeData::new("a").with_label(label));
    let b = model.add_child(root, NodeData::new("b").with_label(label));
    (model, a, b)
}

/// Wider and taller than the whole view at any font scale.
fn big_label() -> String {
    vec!["a label far wider than the whole view"; 12].join("\n")
}

fn paint(model: Model, config: PainterConfig) -> (View, Recorder) {
    let mut view = View::new(model, LayerOut::new(), config);
    view.resize(800.0, 800.0);
    let mut g = Recorder::default();
    view.paint(&mut g);
    (view, g)
}

fn small_font() -> PainterConfig {
    PainterConfig {
        font_size: 10.0,
        ..Default::default()
    }
}

#[test]
fn test_separate_nodes_get_their_edges() {
    let (model, _, _) = three_nodes("n");
    let (view, g) = paint(model, small_font());
    assert_eq!(g.edges(), 2);
    assert_eq!(g.boxes.len(), 3);
    assert_eq!(g.strokes, 0);
    assert!(!view.needs_repaint());
    assert!(view.is_surface_valid());
}

#[test]
fn test_overlapping_nodes_suppress_edges() {
    let (model, _, _) = three_nodes(&big_label());
    let config = PainterConfig {
        font_size: 60.0,
        ..Default::default()
    };
    let (_, g) = paint(model, config);
    assert_eq!(g.edges(), 0);
    // nodes are still drawn
    assert_eq!(g.boxes.len(), 3);
}

#[test]
fn test_non_tree_edge_between_separate_nodes() {
    let (mut model, a, b) = three_nodes("n");
    model.add_edge(a, b);
    let (_, g) = paint(model, small_font());
    assert_eq!(g.edges(), 3);
}

#[test]
fn test_non_tree_edge_between_overlapping_nodes() {
    let (mut model, a, b) = three_nodes(&big_label());
    model.add_edge(a, b);
    let config = PainterConfig {
        font_size: 60.0,
        ..Default::default()
    };
    let (_, g) = paint(model, config);
    assert_eq!(g.edges(), 0);
}

#[test]
fn test_hidden_tree_edge_style() {
    let (model, _, _) = three_nodes("n");
    let config = PainterConfig {
        tree_edge_style: EdgeStyle::default().with_hidden(true),
        ..small_font()
    };
    let (_, g) = paint(model, config);
    assert_eq!(g.edges(), 0);
}

#[test]
fn test_dashed_style_restores_stroke() {
    let (mut model, a, _) = three_nodes("n");
    model[a].data.edge_style = Some(EdgeStyle::default().with_stroke(Stroke::Dash));
    let (_, g) = paint(model, small_font());
    assert_eq!(g.edges(), 2);
    assert_eq!(g.strokes, 0);
}

#[test]
fn test_edge_label_is_drawn() {
    let (mut model, a, _) = three_nodes("n");
    model[a].data.edge_label = Some("is-a".into());
    let (_, g) = paint(model, small_font());
    assert!(g.rotated.iter().any(|s| s == "is-a"));
}

fn triangle() -> Option<Terminator> {
    Some(Terminator {
        shape: TerminatorShape::Triangle,
        filled: true,
    })
}

fn arrow() -> Option<Terminator> {
    Some(Terminator {
        shape: TerminatorShape::Arrow,
        filled: false,
    })
}

/// Unlabeled root with one unlabeled child whose edge carries a triangle at
/// the parent end and an arrow at the child end.
fn terminated_edge() -> Model {
    let mut model = Model::new(NodeData::new("root"));
    let a = model.add_child(model.root(), NodeData::new("a"));
    model[a].data.edge_style = Some(
        EdgeStyle::default()
            .with_from_terminator(triangle())
            .with_to_terminator(arrow()),
    );
    model
}

fn straight() -> PainterConfig {
    PainterConfig {
        arc_edges: false,
        ..Default::default()
    }
}

#[test]
fn test_terminators_at_both_ends() {
    let (_, g) = paint(terminated_edge(), straight());
    assert_eq!(g.lines.len(), 1);
    let (from, to) = g.lines[0];
    assert!(from.distance_sq(to) >= TERMINATOR_MIN_SPAN2);

    assert_eq!(g.fills.len(), 1);
    assert_eq!(g.outlines, 0, "filled triangles are not outlined");
    assert_eq!(g.fills[0][0], from, "triangle tip sits on the parent end");
    assert_eq!(g.polylines.len(), 1);
    assert_eq!(g.polylines[0][1], to, "arrow tip sits on the child end");
    // the triangle opens towards the child
    let base = g.fills[0][1].midpoint(g.fills[0][2]);
    assert!(base.distance(to) < from.distance(to));
}

#[test]
fn test_terminators_skipped_on_short_edges() {
    let mut view = View::new(terminated_edge(), LayerOut::new(), straight());
    view.resize(60.0, 60.0);
    let mut g = Recorder::default();
    view.paint(&mut g);

    assert_eq!(g.lines.len(), 1);
    let (from, to) = g.lines[0];
    assert!(from.distance_sq(to) < TERMINATOR_MIN_SPAN2);
    assert!(g.fills.is_empty());
    assert!(g.polylines.is_empty());
}

#[test]
fn test_node_label_ellipsized_to_diameter() {
    let long = "x".repeat(200);
    let model = Model::new(NodeData::new("root").with_label(format!("{long}\n{long}")));
    let config = PainterConfig {
        ellipsize: true,
        ..Default::default()
    };
    let (view, g) = paint(model, config);

    assert_eq!(g.strings.len(), 2);
    for line in &g.strings {
        assert!(line.ends_with('…'), "{line}");
        assert!(line.chars().count() < 200);
    }
    let root = view.model().root();
    let layout = view.painter().node_layout(root).unwrap();
    assert_eq!(layout.label_width, layout.line_widths[0]);
    // extra lines are cut to the first one
    assert!(layout.line_widths[1] <= layout.line_widths[0]);
}

#[test]
fn test_node_label_kept_whole_without_ellipsize() {
    let long = "x".repeat(200);
    let model = Model::new(NodeData::new("root").with_label(long.clone()));
    let (_, g) = paint(model, PainterConfig::default());
    assert_eq!(g.strings, vec![long]);
}

#[test]
fn test_edge_label_fitted_to_edge() {
    let mut model = terminated_edge();
    let a = model.children(model.root())[0];
    let long = "relation ".repeat(20);
    model[a].data.edge_label = Some(long.clone());
    let (_, g) = paint(model, straight());

    assert_eq!(g.rotated.len(), 1);
    let fitted = &g.rotated[0];
    assert!(fitted.ends_with('…'));
    assert!(fitted.chars().count() < long.chars().count());
    assert!(fitted.starts_with("rel"));
}

#[test]
fn test_edge_to_grafted_placeholder_uses_mounted_root() {
    let mut model = Model::new(NodeData::new("root"));
    let root = model.root();
    let a = model.add_child(root, NodeData::new("a"));
    let placeholder = model.add_child(root, NodeData::new("remote"));
    model.add_child(root, NodeData::new("c"));
    model[placeholder].mount_point = Some(MountPoint::mounting("remote.json"));
    let sub = model.add_node(NodeData::new("sub"));
    model.add_child(sub, NodeData::new("sub1"));
    model.add_edge(a, placeholder);

    let config = PainterConfig {
        tree_edge_style: EdgeStyle::default().with_hidden(true),
        ..straight()
    };
    let mut view = View::new(model, LayerOut::new(), config);
    view.resize(800.0, 800.0);
    view.mount(placeholder, sub, Vec::new()).unwrap();
    // moves the tree, the detached placeholder stays behind
    view.move_to_center(a).unwrap();
    let mut g = Recorder::default();
    view.paint(&mut g);

    let model = view.model();
    let mapper = view.painter().mapper();
    assert_ne!(model[placeholder].location.hyper.center, model[sub].location.hyper.center);
    assert_eq!(g.lines.len(), 1);
    let (from, to) = g.lines[0];
    assert_eq!(from, mapper.to_view(model[a].location.euclidean.center));
    assert_eq!(to, mapper.to_view(model[sub].location.euclidean.center));
}

fn near_border(rect: Rect, p: Point) -> bool {
    rect.inflate(0.5).contains(p) && !rect.inflate(-0.5).contains(p)
}

#[test]
fn test_arc_edge_anchored_on_boxes_with_tangent_terminators() {
    let (mut model, a, b) = three_nodes("node");
    model.add_child(model.root(), NodeData::new("c").with_label("node"));
    let mut edge: Edge = model.new_edge(a, b);
    edge.style = Some(
        EdgeStyle::default()
            .with_from_terminator(triangle())
            .with_to_terminator(triangle()),
    );
    model.edges_mut().push(edge);

    let config = PainterConfig {
        tree_edge_style: EdgeStyle::default().with_hidden(true),
        ..small_font()
    };
    let (view, g) = paint(model, config);

    assert!(g.lines.is_empty());
    assert_eq!(g.arcs.len(), 1);
    let center = g.arcs[0].center();
    assert_eq!(g.fills.len(), 2);

    let spaces = [a, b].map(|n| view.painter().node_layout(n).and_then(|l| l.space()).unwrap());
    for (fill, space) in g.fills.iter().zip(spaces) {
        let tip = fill[0];
        assert!(near_border(space, tip), "{tip:?} not on {space:?}");
        // the terminator axis is tangent to the arc at its tip
        let axis = fill[1].midpoint(fill[2]);
        let (sx, sy) = (axis.x - tip.x, axis.y - tip.y);
        let (rx, ry) = (tip.x - center.x, tip.y - center.y);
        let cos = (sx * rx + sy * ry) / ((sx * sx + sy * sy).sqrt() * (rx * rx + ry * ry).sqrt());
        assert!(cos.abs() < 1e-3, "terminator not tangent: cos {cos}");
    }
}

fn bordered_parent(parent_at: Complex) -> Recorder {
    let mut model = Model::new(NodeData::new("root"));
    let a = model.add_child(model.root(), NodeData::new("a"));
    let a1 = model.add_child(a, NodeData::new("a1"));
    model[a1].data.edge_image_file = Some("edge.png".into());

    let mut view = View::new(model, LayerOut::new(), PainterConfig::default());
    view.resize(800.0, 800.0);
    view.model_mut()[a].location.hyper.place(parent_at);
    view.model_mut()[a1].location.hyper.place(Complex::new(0.5, 0.5));
    let mut g = Recorder {
        image: Some((20.0, 20.0)),
        ..Default::default()
    };
    view.paint(&mut g);
    g
}

#[test]
fn test_arc_edge_image_skipped_from_border_node() {
    let inside = bordered_parent(Complex::new(0.5, 0.0));
    assert!(!inside.arcs.is_empty());
    assert_eq!(inside.images, vec!["edge.png".to_string()]);

    let border = bordered_parent(Complex::new(0.97, 0.0));
    assert!(!border.arcs.is_empty());
    assert!(border.images.is_empty());
}
