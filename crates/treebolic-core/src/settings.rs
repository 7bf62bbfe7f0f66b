use crate::error::{ModelError, Result};
use crate::{Color, EdgeStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use treebolic_hyper::Complex;

/// User-facing display options. Every field is optional: unset options keep
/// the engine defaults when applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Colors
    pub back_color: Option<Color>,
    pub fore_color: Option<Color>,
    pub node_back_color: Option<Color>,
    pub node_fore_color: Option<Color>,
    pub tree_edge_color: Option<Color>,
    pub edge_color: Option<Color>,

    // Fonts
    pub font_face: Option<String>,
    pub font_size: Option<f32>,
    pub font_size_factor: Option<f32>,
    pub downscale_fonts: Option<bool>,
    pub font_downscaler: Option<Vec<f32>>,
    pub downscale_images: Option<bool>,
    pub image_downscaler: Option<Vec<f32>>,

    // Layout
    /// One of `n`, `s`, `e`, `w`, `r` (radial).
    pub orientation: Option<String>,
    /// Factor applied to the default node distance.
    pub expansion: Option<f64>,
    /// Factor applied to the default child sweep.
    pub sweep: Option<f64>,

    // Behaviour
    pub preserve_orientation: Option<bool>,
    pub focus_on_hover: Option<bool>,
    /// Id of the node to focus initially.
    pub focus: Option<String>,
    pub x_move_to: Option<f64>,
    pub y_move_to: Option<f64>,
    pub x_shift: Option<f64>,
    pub y_shift: Option<f64>,

    // Nodes
    pub node_border: Option<bool>,
    pub node_ellipsize: Option<bool>,
    pub label_max_lines: Option<usize>,
    pub label_extra_line_factor: Option<f32>,

    // Edges
    pub edges_as_arcs: Option<bool>,
    pub tree_edge_style: Option<EdgeStyle>,
    pub edge_style: Option<EdgeStyle>,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&text)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| ModelError::SettingsIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layout orientation as a disk direction. Defaults to radial.
    pub fn orientation(&self) -> Result<Complex> {
        match self.orientation.as_deref() {
            None => Ok(Complex::ZERO),
            Some(s) => parse_orientation(s),
        }
    }
}

/// Direction in which a tree grows: towards the bottom for `n` (root at the
/// north), and so on. `r` places the root at the center.
pub fn parse_orientation(s: &str) -> Result<Complex> {
    match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('n') => Ok(Complex::SOUTH),
        Some('s') => Ok(Complex::NORTH),
        Some('e') => Ok(Complex::EAST),
        Some('w') => Ok(Complex::WEST),
        Some('r') => Ok(Complex::ZERO),
        _ => Err(ModelError::InvalidOrientation(s.to_string())),
    }
}
