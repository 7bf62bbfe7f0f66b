use crate::mount::MountPoint;
use crate::{Color, EdgeStyle, NodeId};
use serde::{Deserialize, Serialize};
use treebolic_hyper::Location;

/// Displayable attributes of a node, including the decorations of the edge
/// that links it to its parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub label: Option<String>,
    pub content: Option<String>,
    pub link: Option<String>,
    pub target: Option<String>,
    pub back_color: Option<Color>,
    pub fore_color: Option<Color>,
    pub image_file: Option<String>,

    // Edge to parent
    pub edge_label: Option<String>,
    pub edge_color: Option<Color>,
    pub edge_style: Option<EdgeStyle>,
    pub edge_image_file: Option<String>,
}

impl NodeData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub location: Location,
    pub weight: f64,
    pub children_weight: f64,
    pub min_weight: f64,
    pub mount_point: Option<MountPoint>,
}

impl Node {
    pub fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            location: Location::default(),
            weight: 0.0,
            children_weight: 0.0,
            min_weight: 0.0,
            mount_point: None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.data.label.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
