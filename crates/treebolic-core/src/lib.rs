//! Tree model for the hyperbolic browser: node arena, non-tree edges, edge
//! styles, settings, mounting, and the layout/transform passes that position
//! nodes on the Poincaré disk.

pub mod color;
pub mod error;
pub mod finder;
pub mod graph;
pub mod layout;
pub mod load_balancer;
pub mod model;
pub mod mount;
pub mod node;
pub mod settings;
pub mod style;
pub mod synthetic;
pub mod transformer;
pub mod weigher;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use color::Color;
pub use error::{ModelError, Result};
pub use graph::{Graph, GraphEdge};
pub use layout::LayerOut;
pub use load_balancer::{GroupNode, LoadBalancer};
pub use model::{Edge, Model, Subtree};
pub use mount::{MountPoint, graft, mounted_edges, prune};
pub use node::{Node, NodeData};
pub use settings::{Settings, parse_orientation};
pub use style::{EdgeStyle, Stroke, Terminator, TerminatorShape};
pub use transformer::Transformer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Weigh and lay out the tree rooted at the model root.
pub fn prepare(model: &mut Model, layout: &LayerOut) {
    let root = model.root();
    weigher::weigh(model, root);
    layout.layout(model, root);
    tracing::debug!("Laid out {} nodes", model.subtree(root).count());
}
