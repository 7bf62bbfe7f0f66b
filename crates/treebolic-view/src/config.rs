//! Rendering options handed to the painter at construction.

use crate::geom::Point;
use treebolic_core::{Color, EdgeStyle, Settings};

pub const DEFAULT_FONT_SIZE: f32 = 20.0;
pub const DEFAULT_FONT_FACE: &str = "SansSerif";
pub const FONT_DOWNSCALER: [f32; 5] = [1.0, 0.9, 0.8, 0.7, 0.6];
pub const IMAGE_DOWNSCALER: [f32; 7] = [1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4];
pub const DEFAULT_EXTRA_LINE_FACTOR: f32 = 0.6;

/// Everything the painter needs besides the surface and the tree.
///
/// Downscaler tables are indexed by a node's distance to the disk center; an
/// image table entry of exactly `-1` means "scale by `1 - distance`".
#[derive(Debug, Clone, PartialEq)]
pub struct PainterConfig {
    pub back_color: Color,
    pub fore_color: Color,
    pub node_back_color: Color,
    pub node_fore_color: Color,
    pub tree_edge_color: Color,
    pub edge_color: Color,

    pub tree_edge_style: EdgeStyle,
    pub edge_style: EdgeStyle,
    pub arc_edges: bool,
    pub straight_edges_while_moving: bool,

    pub font_face: String,
    pub font_size: f32,
    pub font_size_factor: f32,
    pub font_scale_factor: f32,
    pub downscale_fonts: bool,
    pub font_downscaler: Vec<f32>,

    pub image_scale_factor: f32,
    pub downscale_images: bool,
    pub image_downscaler: Vec<f32>,

    pub border: bool,
    pub ellipsize: bool,
    /// Zero means unlimited.
    pub label_max_lines: usize,
    pub label_extra_line_factor: f32,

    pub zoom_factor: f64,
    /// Zoom pivot in view pixels; the view center when unset.
    pub zoom_pivot: Option<Point>,

    pub background_image: Option<String>,
    pub default_node_image: Option<String>,
    pub default_tree_edge_image: Option<String>,
    pub default_edge_image: Option<String>,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            back_color: Color::WHITE,
            fore_color: Color::BLACK,
            node_back_color: Color::WHITE,
            node_fore_color: Color::BLACK,
            tree_edge_color: Color::GRAY,
            edge_color: Color::DARK_GRAY,
            tree_edge_style: EdgeStyle::default(),
            edge_style: EdgeStyle::default(),
            arc_edges: true,
            straight_edges_while_moving: false,
            font_face: DEFAULT_FONT_FACE.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_size_factor: 1.0,
            font_scale_factor: 1.0,
            downscale_fonts: true,
            font_downscaler: FONT_DOWNSCALER.to_vec(),
            image_scale_factor: 1.0,
            downscale_images: true,
            image_downscaler: IMAGE_DOWNSCALER.to_vec(),
            border: false,
            ellipsize: false,
            label_max_lines: 0,
            label_extra_line_factor: DEFAULT_EXTRA_LINE_FACTOR,
            zoom_factor: 1.0,
            zoom_pivot: None,
            background_image: None,
            default_node_image: None,
            default_tree_edge_image: None,
            default_edge_image: None,
        }
    }
}

impl PainterConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut config = Self::default();
        config.apply(settings);
        config
    }

    /// Overlay the options set in `settings`.
    pub fn apply(&mut self, settings: &Settings) {
        self.set_colors(settings);

        if let Some(face) = &settings.font_face {
            self.font_face = face.clone();
        }
        if let Some(size) = settings.font_size {
            self.font_size = size;
        }
        if let Some(factor) = settings.font_size_factor {
            self.font_size_factor = factor;
        }
        self.set_font_downscaling(settings.downscale_fonts, settings.font_downscaler.as_deref());

        if let Some(flag) = settings.downscale_images {
            self.downscale_images = flag;
        }
        if let Some(table) = &settings.image_downscaler {
            self.image_downscaler = table.clone();
        }

        if let Some(flag) = settings.node_border {
            self.border = flag;
        }
        if let Some(flag) = settings.node_ellipsize {
            self.ellipsize = flag;
        }
        if let Some(lines) = settings.label_max_lines {
            self.label_max_lines = lines;
        }
        if let Some(factor) = settings.label_extra_line_factor {
            self.label_extra_line_factor = factor;
        }

        if let Some(flag) = settings.edges_as_arcs {
            self.arc_edges = flag;
        }
        if let Some(style) = settings.tree_edge_style {
            self.tree_edge_style = style;
        }
        if let Some(style) = settings.edge_style {
            self.edge_style = style;
        }
    }

    fn set_colors(&mut self, settings: &Settings) {
        for (slot, value) in [
            (&mut self.back_color, settings.back_color),
            (&mut self.fore_color, settings.fore_color),
            (&mut self.node_back_color, settings.node_back_color),
            (&mut self.node_fore_color, settings.node_fore_color),
            (&mut self.tree_edge_color, settings.tree_edge_color),
            (&mut self.edge_color, settings.edge_color),
        ] {
            if let Some(color) = value {
                *slot = color;
            }
        }
    }

    /// Turning font downscaling off flattens the table to a single `1`.
    pub fn set_font_downscaling(&mut self, flag: Option<bool>, table: Option<&[f32]>) {
        self.downscale_fonts = flag.unwrap_or(true);
        self.font_downscaler = match (self.downscale_fonts, table) {
            (true, Some(table)) if !table.is_empty() => table.to_vec(),
            (true, _) => FONT_DOWNSCALER.to_vec(),
            (false, _) => vec![1.0],
        };
    }

    /// A non-negative factor sets the zoom, a negative one multiplies the
    /// current zoom by its magnitude.
    pub fn set_zoom(&mut self, factor: f64, pivot: Option<Point>) {
        if factor >= 0.0 {
            self.zoom_factor = factor;
        } else {
            self.zoom_factor *= -factor;
        }
        if pivot.is_some() {
            self.zoom_pivot = pivot;
        }
    }

    /// Same convention as [`PainterConfig::set_zoom`]; zero leaves the value alone.
    pub fn set_scale_factors(&mut self, font: f32, image: f32) {
        self.font_scale_factor = scaled(self.font_scale_factor, font);
        self.image_scale_factor = scaled(self.image_scale_factor, image);
    }
}

pub(crate) fn scaled<T>(current: T, factor: T) -> T
where
    T: Copy + PartialOrd + Default + std::ops::Mul<Output = T> + std::ops::Neg<Output = T>,
{
    let zero = T::default();
    if factor == zero {
        current
    } else if factor > zero {
        factor
    } else {
        current * -factor
    }
}
