//! Draws a laid-out tree onto a [`Graphics`] surface.
//!
//! A paint pass first maps every dirty node location to the Euclidean disk
//! and computes a [`NodeLayout`] per visible node (label box, wrapped lines,
//! image rectangle). Non-tree edges are drawn next, then the tree itself:
//! each node's edge to its parent, its subtree, and finally the node on top.
//! Layouts live in a side table owned by the painter and are rebuilt on
//! every pass.

use crate::arc_math::{mid_arc, tangent, text_tangent};
use crate::config::{PainterConfig, scaled};
use crate::crop::{arc_anchor, boxes_intersect, segment_anchor};
use crate::geom::{Arc2D, Point, Rect};
use crate::graphics::Graphics;
use crate::mapper::Mapper;
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::trace;
use treebolic_core::style::{STROKEMASK, STROKEWIDTHMASK};
use treebolic_core::{Color, Edge, EdgeStyle, Model, MountPoint, Node, NodeId, Terminator, TerminatorShape};
use treebolic_hyper::{Arc, Complex, map_to_euclidean};

/// Room kept free around an edge label.
pub const TEXT_PADDING: f64 = 25.0;
/// Terminators are skipped on edges shorter than this (squared pixels).
pub const TERMINATOR_MIN_SPAN2: f64 = 50.0 * 50.0;
pub const TERMINATOR_HEIGHT: f64 = 8.0;
pub const TERMINATOR_WIDTH: f64 = 5.0;
/// Fraction of the label's first line an image may cover.
pub const NODE_LABEL_OVERLAY: f64 = 0.2;
/// Images smaller than this on either side are not drawn.
pub const MIN_IMAGE_DIMENSION: f64 = 5.0;

const NODE_HORIZONTAL_PADDING: f64 = 4.0;
const NODE_TOP_PADDING: f64 = 1.0;
const NODE_BOTTOM_PADDING: f64 = 1.0;
const NODE_CORNER_RADIUS: f64 = 10.0;

const ELLIPSIS: &str = "…";
const AVERAGE_CHAR: &str = "x";

#[derive(Debug, Clone, PartialEq)]
pub struct NodeImage {
    pub key: String,
    /// Position and scaled size.
    pub rect: Rect,
    pub natural: (f64, f64),
}

/// Per-frame placement of a node's box, label and image.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    /// Combined image and label area, when the node has both.
    pub space: Option<Rect>,
    pub label_box: Option<Rect>,
    pub lines: Vec<String>,
    pub line_widths: Vec<f64>,
    pub label_width: f64,
    /// Baseline origin of the first line.
    pub label_at: Point,
    pub image: Option<NodeImage>,
    pub back_color: Color,
    pub fore_color: Color,
    pub text_size: f32,
    /// `Some(true)` for an expandable placeholder, `Some(false)` for a mounted root.
    pub mountable: Option<bool>,
}

impl NodeLayout {
    /// Rectangle edges are cropped against.
    pub fn space(&self) -> Option<Rect> {
        self.space.or(self.label_box)
    }
}

struct EdgeParts<'a> {
    label: Option<&'a str>,
    image: Option<(&'a str, f64)>,
    style: EdgeStyle,
    from_space: Option<Rect>,
    to_space: Option<Rect>,
    is_border: bool,
}

#[derive(Debug, Default)]
pub struct Painter {
    config: PainterConfig,
    mapper: Mapper,
    dragging: bool,
    layouts: HashMap<NodeId, NodeLayout>,
}

impl Painter {
    pub fn new(config: PainterConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PainterConfig {
        &mut self.config
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut Mapper {
        &mut self.mapper
    }

    pub fn setup(&mut self, width: f64, height: f64) {
        self.mapper.set_size(width, height);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn set_zoom(&mut self, factor: f64, pivot: Option<Point>) {
        self.config.set_zoom(factor, pivot);
    }

    /// Positive values set, negative values multiply by their magnitude,
    /// zero leaves the factor unchanged.
    pub fn set_scale_factors(&mut self, map: f64, font: f32, image: f32) {
        let factor = scaled(self.mapper.map_scale_factor(), map);
        self.mapper.set_map_scale_factor(factor);
        self.config.set_scale_factors(font, image);
    }

    pub fn node_layout(&self, id: NodeId) -> Option<&NodeLayout> {
        self.layouts.get(&id)
    }

    pub fn paint_background(&self, g: &mut dyn Graphics) {
        let origin = self.mapper.origin();
        let area = Rect::new(origin.x, origin.y, self.mapper.width(), self.mapper.height());
        g.draw_background(self.config.back_color, area);
        if let Some(key) = &self.config.background_image {
            g.draw_image(key, area);
        }
    }

    pub fn paint(&mut self, g: &mut dyn Graphics, model: &mut Model) {
        if self.config.zoom_factor != 1.0 {
            let pivot = self
                .config
                .zoom_pivot
                .unwrap_or_else(|| Point::new(self.mapper.width() / 2.0, self.mapper.height() / 2.0));
            g.set_zoom(self.config.zoom_factor, pivot);
        }

        let root = model.root();
        self.compute_tree(g, model, root);

        let edge_count = model.edges().len();
        for i in 0..edge_count {
            let edge = model.edges()[i].clone();
            self.draw_non_tree_edge(g, model, &edge);
        }

        self.draw_tree(g, model, root);
        trace!("Painted {} node layouts, {} edges", self.layouts.len(), edge_count);
    }

    fn compute_tree(&mut self, g: &mut dyn Graphics, model: &mut Model, root: NodeId) {
        self.layouts.clear();
        let ids: Vec<NodeId> = model.subtree(root).collect();
        for id in ids {
            let location = &mut model[id].location;
            if location.hyper.is_dirty {
                map_to_euclidean(location);
            }
            if let Some(layout) = self.compute_node_layout(g, &model[id]) {
                self.layouts.insert(id, layout);
            }
        }
    }

    fn draw_tree(&self, g: &mut dyn Graphics, model: &Model, root: NodeId) {
        enum Visit {
            Enter(NodeId),
            Leave(NodeId),
        }

        let mut stack = vec![Visit::Enter(root)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => {
                    if let Some(parent) = model.parent(id) {
                        self.draw_tree_edge(g, model, parent, id);
                    }
                    stack.push(Visit::Leave(id));
                    stack.extend(model.children(id).iter().rev().map(|&c| Visit::Enter(c)));
                }
                Visit::Leave(id) => {
                    if !model[id].location.hyper.is_border
                        && let Some(layout) = self.layouts.get(&id)
                    {
                        self.draw_node(g, layout);
                    }
                }
            }
        }
    }

    fn space_of(&self, id: NodeId) -> Option<Rect> {
        self.layouts.get(&id).and_then(NodeLayout::space)
    }

    // Sizes

    fn hyperdistance_to_size(&self, dist: f64) -> f32 {
        let scale = bucket(&self.config.font_downscaler, dist).unwrap_or(1.0);
        self.config.font_size * self.config.font_size_factor * self.config.font_scale_factor * scale
    }

    fn image_scale(&self, dist: f64) -> f64 {
        let mut scale = if self.config.downscale_images {
            bucket(&self.config.image_downscaler, dist).map_or(1.0, f64::from)
        } else {
            1.0
        };
        if scale == -1.0 {
            scale = 1.0 - dist;
        }
        scale * f64::from(self.config.image_scale_factor)
    }

    // Nodes

    fn compute_node_layout(&self, g: &mut dyn Graphics, node: &Node) -> Option<NodeLayout> {
        let location = &node.location;
        if location.hyper.is_border {
            return None;
        }
        let dist = location.hyper.dist;

        let text_size = self.hyperdistance_to_size(dist);
        g.set_text_size(text_size);

        let center = self.mapper.to_view(location.euclidean.center);
        let diameter = 2.0 * self.mapper.w_to_view(location.euclidean.radius);

        let image = node
            .data
            .image_file
            .as_deref()
            .or(self.config.default_node_image.as_deref())
            .and_then(|key| {
                let (w, h) = g.image_size(key)?;
                let scale = self.image_scale(dist);
                Some(NodeImage {
                    key: key.to_string(),
                    rect: Rect::new(0.0, 0.0, scale * w, scale * h),
                    natural: (w, h),
                })
            });

        let mut layout = NodeLayout {
            space: None,
            label_box: None,
            lines: Vec::new(),
            line_widths: Vec::new(),
            label_width: 0.0,
            label_at: center,
            image,
            back_color: node.data.back_color.unwrap_or(self.config.node_back_color),
            fore_color: node.data.fore_color.unwrap_or(self.config.node_fore_color),
            text_size,
            mountable: None,
        };

        let Some(lines) = self.make_label(node) else {
            if let Some(image) = &mut layout.image {
                image.rect.x = center.x - image.rect.width / 2.0;
                image.rect.y = center.y - image.rect.height / 2.0;
            }
            return Some(layout);
        };
        layout.lines = lines;

        self.measure_label(g, &mut layout);
        if layout.label_width > diameter && self.config.ellipsize {
            self.ellipsize_label(g, &mut layout, diameter);
        }
        let text_height = self.label_height(g, &layout);
        let ascent = g.ascent();

        let box_width = layout.label_width + 2.0 * NODE_HORIZONTAL_PADDING;
        let box_height = NODE_TOP_PADDING + text_height + g.descent() + NODE_BOTTOM_PADDING;
        let box_x = center.x - layout.label_width / 2.0 - NODE_HORIZONTAL_PADDING;
        let box_y = match &mut layout.image {
            None => center.y - text_height / 2.0 - NODE_TOP_PADDING,
            Some(image) => {
                // image on top, label below it, the pair centered on the node
                image.rect.x = center.x - image.rect.width / 2.0;
                let overlap = ascent * NODE_LABEL_OVERLAY;
                let combined = image.rect.height + box_height - overlap;
                let half = combined / 2.0;
                image.rect.y = center.y - half;
                let (space_x, space_width) = if image.rect.width > box_width {
                    (image.rect.x, image.rect.width)
                } else {
                    (box_x, box_width)
                };
                layout.space = Some(Rect::new(space_x, image.rect.y, space_width, combined));
                center.y + half - box_height
            }
        };

        layout.label_box = Some(Rect::new(box_x, box_y, box_width, box_height));
        layout.label_at = Point::new(box_x + NODE_HORIZONTAL_PADDING, box_y + NODE_TOP_PADDING + ascent);
        layout.mountable = node.mount_point.as_ref().map(MountPoint::is_mounting);
        Some(layout)
    }

    fn make_label(&self, node: &Node) -> Option<Vec<String>> {
        let label = node.label().filter(|l| !l.is_empty())?;
        let max_lines = self.config.label_max_lines;
        if max_lines == 1 {
            return Some(vec![label.replace('\n', " ")]);
        }
        let mut lines: Vec<String> = if max_lines == 0 {
            label.split('\n').map(String::from).collect()
        } else {
            label.splitn(max_lines, '\n').map(String::from).collect()
        };
        if max_lines > 1
            && lines.len() == max_lines
            && let Some(last) = lines.last_mut()
        {
            *last = ELLIPSIS.to_string();
        }
        Some(lines)
    }

    fn extra_line_size(&self, layout: &NodeLayout) -> f32 {
        layout.text_size * self.config.label_extra_line_factor
    }

    fn measure_label(&self, g: &mut dyn Graphics, layout: &mut NodeLayout) {
        let mut widths = Vec::with_capacity(layout.lines.len());
        if let Some(first) = layout.lines.first() {
            widths.push(g.string_width(first));
        }
        if layout.lines.len() > 1 {
            g.set_text_size(self.extra_line_size(layout));
            widths.extend(layout.lines[1..].iter().map(|line| g.string_width(line)));
            g.set_text_size(layout.text_size);
        }
        layout.label_width = widths.iter().copied().fold(0.0, f64::max);
        layout.line_widths = widths;
    }

    /// Truncate the first line to the node diameter and the extra lines to
    /// the first line.
    fn ellipsize_label(&self, g: &mut dyn Graphics, layout: &mut NodeLayout, diameter: f64) {
        if let Some(n) = chars_fitting(g, diameter)
            && truncate_with_ellipsis(&mut layout.lines[0], n)
        {
            layout.line_widths[0] = g.string_width(&layout.lines[0]);
        }
        let width = layout.line_widths[0];

        if layout.lines.len() > 1 {
            g.set_text_size(self.extra_line_size(layout));
            if let Some(n) = chars_fitting(g, width) {
                for i in 1..layout.lines.len() {
                    if truncate_with_ellipsis(&mut layout.lines[i], n) {
                        layout.line_widths[i] = g.string_width(&layout.lines[i]);
                    }
                }
            }
            g.set_text_size(layout.text_size);
        }
        layout.label_width = width;
    }

    fn label_height(&self, g: &mut dyn Graphics, layout: &NodeLayout) -> f64 {
        let mut height = g.ascent();
        if layout.lines.len() > 1 {
            g.set_text_size(self.extra_line_size(layout));
            height += g.ascent() * (layout.lines.len() - 1) as f64;
            g.set_text_size(layout.text_size);
        }
        height
    }

    fn draw_node(&self, g: &mut dyn Graphics, layout: &NodeLayout) {
        if let Some(rect) = layout.label_box {
            g.set_color(layout.back_color);
            g.fill_round_rect(rect, NODE_CORNER_RADIUS);
            g.set_color(layout.fore_color);
            if self.config.border {
                g.draw_round_rect(rect, NODE_CORNER_RADIUS);
            }
            if let Some(mounting) = layout.mountable {
                g.fill_polygon(&mount_indicator(rect, mounting));
            }
        }

        if let Some(image) = &layout.image
            && image.rect.width >= MIN_IMAGE_DIMENSION
            && image.rect.height >= MIN_IMAGE_DIMENSION
        {
            let rect = if self.config.downscale_images {
                image.rect
            } else {
                Rect::new(image.rect.x, image.rect.y, image.natural.0, image.natural.1)
            };
            g.draw_image(&image.key, rect);
        }

        if !layout.lines.is_empty() {
            self.draw_label(g, layout);
        }
    }

    fn draw_label(&self, g: &mut dyn Graphics, layout: &NodeLayout) {
        g.set_text_size(layout.text_size);
        let at = layout.label_at;
        let dx = (layout.label_width - layout.line_widths[0]) / 2.0;
        g.draw_string(&layout.lines[0], Point::new(at.x + dx, at.y));

        if layout.lines.len() > 1 {
            g.set_text_size(self.extra_line_size(layout));
            let step = g.ascent();
            let mut dy = step;
            for (line, width) in layout.lines.iter().zip(&layout.line_widths).skip(1) {
                let dx = (layout.label_width - width) / 2.0;
                g.draw_string(line, Point::new(at.x + dx, at.y + dy));
                dy += step;
            }
            g.set_text_size(layout.text_size);
        }
    }

    // Edges

    fn draw_tree_edge(&self, g: &mut dyn Graphics, model: &Model, parent: NodeId, id: NodeId) {
        let node = &model[id];
        g.set_color(node.data.edge_color.unwrap_or(self.config.tree_edge_color));

        let style = EdgeStyle::merge(self.config.tree_edge_style, node.data.edge_style);
        if style.is_hidden() {
            return;
        }
        let from_space = self.space_of(parent);
        let to_space = self.space_of(id);
        if boxes_intersect(from_space.as_ref(), to_space.as_ref()) {
            return;
        }

        let dist = node.location.hyper.dist;
        let image = node
            .data
            .edge_image_file
            .as_deref()
            .or(self.config.default_tree_edge_image.as_deref())
            .map(|key| (key, self.image_scale(dist)));
        let label = node.data.edge_label.as_deref();
        if label.is_some() {
            g.set_text_size(self.hyperdistance_to_size(dist));
        }

        let from = &model[parent].location;
        self.draw_edge(
            g,
            from.euclidean.center,
            node.location.euclidean.center,
            EdgeParts {
                label,
                image,
                style,
                from_space,
                to_space,
                is_border: from.hyper.is_border,
            },
        );
    }

    fn draw_non_tree_edge(&self, g: &mut dyn Graphics, model: &mut Model, edge: &Edge) {
        let style = EdgeStyle::merge(self.config.edge_style, edge.style);
        if style.is_hidden() {
            return;
        }

        let from = MountPoint::follow(model, edge.from, false, true);
        let to = MountPoint::follow(model, edge.to, false, true);
        for id in [from, to] {
            let location = &mut model[id].location;
            if location.hyper.is_dirty {
                map_to_euclidean(location);
            }
        }

        let from_space = self.space_of(from);
        let to_space = self.space_of(to);
        if boxes_intersect(from_space.as_ref(), to_space.as_ref()) {
            return;
        }

        let to_dist = model[to].location.hyper.dist;
        if edge.label.is_some() {
            g.set_text_size(self.hyperdistance_to_size(to_dist));
        }
        g.set_color(edge.color.unwrap_or(self.config.edge_color));
        let image = edge
            .image_file
            .as_deref()
            .or(self.config.default_edge_image.as_deref())
            .map(|key| (key, self.image_scale(to_dist)));

        self.draw_edge(
            g,
            model[from].location.euclidean.center,
            model[to].location.euclidean.center,
            EdgeParts {
                label: edge.label.as_deref(),
                image,
                style,
                from_space,
                to_space,
                is_border: false,
            },
        );
    }

    fn draw_edge(&self, g: &mut dyn Graphics, z1: Complex, z2: Complex, parts: EdgeParts<'_>) {
        let straight = (self.config.straight_edges_while_moving && self.dragging)
            || !self.config.arc_edges
            || parts.style.is_line();
        let arc = if straight { None } else { Some(Arc::new(z1, z2)) };
        match arc.filter(|arc| !arc.is_line()) {
            Some(arc) => self.draw_arc_edge(g, &arc, &parts),
            None => self.draw_line_edge(g, self.mapper.to_view(z1), self.mapper.to_view(z2), &parts),
        }
    }

    fn draw_line_edge(&self, g: &mut dyn Graphics, from: Point, to: Point, parts: &EdgeParts<'_>) {
        let from_anchor = if parts.is_border {
            None
        } else {
            segment_anchor(parts.from_space.as_ref(), to, from)
        };
        let to_anchor = segment_anchor(parts.to_space.as_ref(), from, to);
        let from = from_anchor.unwrap_or(from);
        let to = to_anchor.unwrap_or(to);

        stroked(g, parts.style, |g| g.draw_line(from, to));

        if let Some((key, scale)) = parts.image
            && !parts.is_border
        {
            self.draw_image_at(g, key, from.midpoint(to), scale);
        }

        self.draw_edge_ends(g, from, to, None, parts.style);

        if !parts.is_border
            && let Some(label) = parts.label.filter(|l| !l.is_empty())
        {
            let label = fit_label(g, label, from, to);
            let mut orientation = (from.y - to.y).atan2(from.x - to.x);
            if orientation < 0.0 {
                orientation += PI;
            }
            draw_text(g, &label, from.midpoint(to), orientation);
        }
    }

    fn to_arc2d(&self, arc: &Arc) -> Arc2D {
        let center = self.mapper.to_view(Complex::new(arc.x, arc.y));
        let corner = self.mapper.to_view(Complex::new(arc.x - arc.r, arc.y - arc.r));
        let mut arc2d = Arc2D::from_center(center, corner);
        // screen y runs down, so angles flip sign
        let mut start = (-arc.start).to_degrees();
        if start < 0.0 {
            start += 360.0;
        }
        arc2d.start = start;
        arc2d.extent = (-arc.angle).to_degrees();
        arc2d.counterclockwise = arc.counterclockwise();
        arc2d
    }

    fn draw_arc_edge(&self, g: &mut dyn Graphics, arc: &Arc, parts: &EdgeParts<'_>) {
        let mut arc2d = self.to_arc2d(arc);

        let from_anchor = (!parts.is_border)
            .then(|| arc_anchor(parts.from_space.as_ref(), &arc2d))
            .flatten()
            .unwrap_or_else(|| arc2d.start_point());
        let to_anchor = arc_anchor(parts.to_space.as_ref(), &arc2d).unwrap_or_else(|| arc2d.end_point());

        if arc2d.extent >= 0.0 {
            arc2d.set_angles(from_anchor, to_anchor);
        } else {
            arc2d.set_angles(to_anchor, from_anchor);
        }

        stroked(g, parts.style, |g| g.draw_arc(arc2d.frame, arc2d.start, arc2d.extent));

        if let Some((key, scale)) = parts.image
            && !parts.is_border
        {
            self.draw_image_at(g, key, mid_arc(&arc2d), scale);
        }

        self.draw_edge_ends(g, from_anchor, to_anchor, Some(&arc2d), parts.style);

        if !parts.is_border
            && let Some(label) = parts.label.filter(|l| !l.is_empty())
        {
            let label = fit_label(g, label, from_anchor, to_anchor);
            let mid = mid_arc(&arc2d);
            draw_text(g, &label, mid, text_tangent(&arc2d, mid));
        }
    }

    fn draw_image_at(&self, g: &mut dyn Graphics, key: &str, at: Point, scale: f64) {
        let Some((w, h)) = g.image_size(key) else {
            return;
        };
        let (w, h) = if scale == 1.0 || !self.config.downscale_images {
            (w, h)
        } else {
            (scale * w, scale * h)
        };
        if w < MIN_IMAGE_DIMENSION || h < MIN_IMAGE_DIMENSION {
            return;
        }
        g.draw_image(key, Rect::new(at.x - w / 2.0, at.y - h / 2.0, w, h));
    }

    fn draw_edge_ends(&self, g: &mut dyn Graphics, from: Point, to: Point, arc: Option<&Arc2D>, style: EdgeStyle) {
        let from_terminator = style.from_terminator();
        let to_terminator = style.to_terminator();
        if from_terminator.is_none() && to_terminator.is_none() {
            return;
        }
        if from.distance_sq(to) < TERMINATOR_MIN_SPAN2 {
            return;
        }

        let stroke_width = f64::from(style.stroke_width());
        let height = TERMINATOR_HEIGHT + stroke_width;
        let width = TERMINATOR_WIDTH + stroke_width;
        // s runs along the edge, d across it
        let frame = |orientation: f64| {
            (
                Point::new(height * orientation.cos(), height * orientation.sin()),
                Point::new(
                    width * (orientation + FRAC_PI_2).cos(),
                    width * (orientation + FRAC_PI_2).sin(),
                ),
            )
        };
        let ((s1, d1), (s2, d2)) = match arc {
            None => {
                let (s, d) = frame((to.y - from.y).atan2(to.x - from.x));
                ((s, d), (Point::new(-s.x, -s.y), d))
            }
            Some(arc) => (frame(tangent(arc, from, true)), frame(tangent(arc, to, false))),
        };

        if let Some(terminator) = from_terminator {
            self.draw_terminator(g, terminator, from, s1, d1, height);
        }
        if let Some(terminator) = to_terminator {
            self.draw_terminator(g, terminator, to, s2, d2, height);
        }
    }

    fn draw_terminator(&self, g: &mut dyn Graphics, terminator: Terminator, p: Point, s: Point, d: Point, size: f64) {
        let at = |ks: f64, kd: f64| Point::new(p.x + ks * s.x + kd * d.x, p.y + ks * s.y + kd * d.y);
        match terminator.shape {
            TerminatorShape::Triangle => {
                self.fill_polygon(g, terminator.filled, &[p, at(1.0, 1.0), at(1.0, -1.0)]);
            }
            TerminatorShape::Diamond => {
                self.fill_polygon(g, terminator.filled, &[p, at(1.0, 1.0), at(2.0, 0.0), at(1.0, -1.0)]);
            }
            TerminatorShape::Circle => {
                let c = at(0.5, 0.0);
                let frame = Rect::new(c.x - size / 2.0, c.y - size / 2.0, size, size);
                if terminator.filled {
                    g.fill_oval(frame);
                } else {
                    let color = g.color();
                    g.set_color(self.config.back_color);
                    g.fill_oval(frame);
                    g.set_color(color);
                    g.draw_oval(frame);
                }
            }
            TerminatorShape::Arrow => g.draw_polyline(&[at(1.0, 1.0), p, at(1.0, -1.0)]),
            TerminatorShape::Hook => g.draw_polyline(&[at(1.0, 1.0), p]),
        }
    }

    /// Unfilled shapes are blanked with the background before outlining.
    fn fill_polygon(&self, g: &mut dyn Graphics, filled: bool, points: &[Point]) {
        if filled {
            g.fill_polygon(points);
        } else {
            let color = g.color();
            g.set_color(self.config.back_color);
            g.fill_polygon(points);
            g.set_color(color);
            g.draw_polygon(points);
        }
    }
}

fn bucket(table: &[f32], dist: f64) -> Option<f32> {
    let last = table.len().checked_sub(1)?;
    let index = ((dist * table.len() as f64).round().max(0.0) as usize).min(last);
    Some(table[index])
}

fn stroked(g: &mut dyn Graphics, style: EdgeStyle, draw: impl FnOnce(&mut dyn Graphics)) {
    if style.0 & (STROKEMASK | STROKEWIDTHMASK) == 0 {
        draw(g);
        return;
    }
    g.push_stroke();
    g.set_stroke(style.stroke(), style.stroke_width());
    draw(g);
    g.pop_stroke();
}

/// Triangle beside a node box: pointing down on a placeholder that can be
/// expanded, up on a mounted root.
fn mount_indicator(rect: Rect, mounting: bool) -> [Point; 3] {
    let half_width = 3.0;
    let height = 2.0 * half_width;
    let margin = 2.0;
    let x0 = rect.right() + 5.0;
    let y0 = rect.y + margin;
    let xs = [x0 - half_width, x0, x0 + half_width];
    let ys = if mounting {
        let y2 = y0 + rect.height - 2.0 * margin;
        let y1 = y2 - height;
        [y1, y2, y1]
    } else {
        let y1 = y0 + height;
        [y1, y0, y1]
    };
    [
        Point::new(xs[0], ys[0]),
        Point::new(xs[1], ys[1]),
        Point::new(xs[2], ys[2]),
    ]
}

/// How many average characters fit before a trailing ellipsis in `span`.
fn chars_fitting(g: &dyn Graphics, span: f64) -> Option<usize> {
    let unit = g.string_width(AVERAGE_CHAR);
    if unit <= 0.0 {
        return None;
    }
    let dots = g.string_width(ELLIPSIS);
    Some((((span - dots) / unit).floor() as i64).max(1) as usize)
}

fn truncate_with_ellipsis(text: &mut String, chars: usize) -> bool {
    if text.chars().count() <= chars {
        return false;
    }
    let mut truncated: String = text.chars().take(chars).collect();
    truncated.push_str(ELLIPSIS);
    *text = truncated;
    true
}

/// Shorten an edge label to the distance between its ends.
fn fit_label(g: &dyn Graphics, label: &str, from: Point, to: Point) -> String {
    let span = from.distance(to) - TEXT_PADDING;
    let mut text = label.to_string();
    if g.string_width(label) > span
        && let Some(n) = chars_fitting(g, span)
    {
        truncate_with_ellipsis(&mut text, n);
    }
    text
}

/// Text centered on `at` and rotated to `orientation`, flipped so it never
/// reads upside down.
fn draw_text(g: &mut dyn Graphics, text: &str, at: Point, orientation: f64) {
    let width = g.string_width(text);
    let (orientation, y_shift) = if orientation > FRAC_PI_2 {
        (orientation + PI, -g.ascent())
    } else {
        (orientation, g.descent())
    };
    g.draw_string_rotated(text, at, orientation, Point::new(-width / 2.0, -y_shift));
}
