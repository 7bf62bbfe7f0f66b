//! Lazy subtree splicing.
//!
//! A `Mounting` placeholder may be swapped for the root of a separately built
//! subtree (`graft`) and swapped back (`prune`). The two nodes reference each
//! other through their mount points while grafted.

use crate::model::{Edge, Model};
use crate::{EdgeId, NodeId};
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum MountPoint {
    Mounting {
        url: String,
        /// Mount as soon as the tree is shown.
        now: bool,
        half_wedge: f64,
        orientation: f64,
        mounted: Option<NodeId>,
    },
    Mounted {
        mounting: NodeId,
        /// Non-tree edges brought in with the subtree.
        mounted_edges: Vec<EdgeId>,
    },
}

impl MountPoint {
    pub fn mounting(url: impl Into<String>) -> Self {
        MountPoint::Mounting {
            url: url.into(),
            now: false,
            half_wedge: 0.0,
            orientation: 0.0,
            mounted: None,
        }
    }

    pub fn is_mounting(&self) -> bool {
        matches!(self, MountPoint::Mounting { .. })
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self, MountPoint::Mounted { .. })
    }

    /// Resolve an edge endpoint across a mount.
    ///
    /// With `down`, a grafted placeholder resolves to its mounted root. With
    /// `up`, a mounted root resolves to its placeholder. The cross-reference
    /// must be consistent both ways, otherwise `node` is returned unchanged.
    pub fn follow(model: &Model, node: NodeId, up: bool, down: bool) -> NodeId {
        match model.get(node).and_then(|n| n.mount_point.as_ref()) {
            Some(MountPoint::Mounting {
                mounted: Some(mounted),
                ..
            }) if down => {
                if let Some(MountPoint::Mounted { mounting, .. }) = model[*mounted].mount_point
                    && mounting == node
                {
                    return *mounted;
                }
                node
            }
            Some(MountPoint::Mounted { mounting, .. }) if up => {
                if let Some(MountPoint::Mounting {
                    mounted: Some(mounted),
                    ..
                }) = model[*mounting].mount_point
                    && mounted == node
                {
                    return *mounting;
                }
                node
            }
            _ => node,
        }
    }
}

/// Replace the `mounting` placeholder with the detached subtree rooted at
/// `mounted`, appending `mounted_edges` to the model's edge list.
///
/// Returns `false` and leaves the model untouched when `mounting` has no
/// parent or is not a `Mounting` point, and when `mounted` already carries a
/// mount point or is not a detached subtree root. A subtree that contains
/// `mounting` is refused as well, since grafting it would close a cycle.
pub fn graft(model: &mut Model, mounting: NodeId, mounted: NodeId, mounted_edges: Vec<Edge>) -> bool {
    let (Some(mounting_node), Some(mounted_node)) = (model.get(mounting), model.get(mounted)) else {
        return false;
    };
    let Some(parent) = mounting_node.parent else {
        debug!("graft: placeholder {} has no parent", mounting);
        return false;
    };
    if !matches!(mounting_node.mount_point, Some(MountPoint::Mounting { .. })) {
        debug!("graft: {} is not a mounting point", mounting);
        return false;
    }
    if mounted_node.mount_point.is_some() {
        debug!("graft: {} already carries a mount point", mounted);
        return false;
    }
    if mounted_node.parent.is_some() || mounted == model.root() {
        debug!("graft: {} is attached to the tree", mounted);
        return false;
    }
    if is_ancestor(model, mounted, parent) {
        debug!("graft: {} contains placeholder {}", mounted, mounting);
        return false;
    }

    if let Some(index) = model[parent].children.iter().position(|&c| c == mounting) {
        model[parent].children[index] = mounted;
    }

    let decorations = model[mounting].data.clone();
    let target = &mut model[mounted];
    target.parent = Some(parent);
    target.data.edge_label = decorations.edge_label;
    target.data.edge_style = decorations.edge_style;
    target.data.edge_color = decorations.edge_color;
    target.data.edge_image_file = decorations.edge_image_file;
    target.mount_point = Some(MountPoint::Mounted {
        mounting,
        mounted_edges: mounted_edges.iter().map(|e| e.id).collect(),
    });

    if let Some(MountPoint::Mounting { mounted: slot, .. }) = &mut model[mounting].mount_point {
        *slot = Some(mounted);
    }

    let count = mounted_edges.len();
    model.edges_mut().extend(mounted_edges);
    debug!("Grafted {} at {} with {} edges", mounted, mounting, count);
    true
}

/// Undo a graft: put the placeholder back in place of `mounted` and drop
/// every edge the mount introduced, including those of mounts nested inside
/// the pruned subtree.
///
/// Returns the restored placeholder, or `None` if the cross-reference between
/// the two mount points is missing or inconsistent.
pub fn prune(model: &mut Model, mounted: NodeId) -> Option<NodeId> {
    let node = model.get(mounted)?;
    let parent = node.parent?;
    let Some(MountPoint::Mounted { mounting, .. }) = &node.mount_point else {
        return None;
    };
    let mounting = *mounting;
    match model.get(mounting).and_then(|n| n.mount_point.as_ref()) {
        Some(MountPoint::Mounting {
            mounted: Some(back), ..
        }) if *back == mounted => {}
        _ => {
            warn!("prune: inconsistent mount cross-reference between {} and {}", mounted, mounting);
            return None;
        }
    }

    let doomed = doomed_edges(model, mounted);

    if let Some(index) = model[parent].children.iter().position(|&c| c == mounted) {
        model[parent].children[index] = mounting;
    }
    model[mounting].parent = Some(parent);
    if let Some(MountPoint::Mounting { mounted: slot, .. }) = &mut model[mounting].mount_point {
        *slot = None;
    }
    model[mounted].mount_point = None;
    model[mounted].parent = None;

    let before = model.edges().len();
    model.edges_mut().retain(|e| !doomed.contains(&e.id));
    debug!(
        "Pruned {} back to {}, removed {} edges",
        mounted,
        mounting,
        before - model.edges().len()
    );
    Some(mounting)
}

/// The non-tree edges a [`prune`] of `mounted` would drop: those its own
/// mount brought in plus those of every mount nested inside it. Collect them
/// before pruning to graft the same subtree back later.
pub fn mounted_edges(model: &Model, mounted: NodeId) -> Vec<Edge> {
    let doomed = doomed_edges(model, mounted);
    model
        .edges()
        .iter()
        .filter(|e| doomed.contains(&e.id))
        .cloned()
        .collect()
}

fn doomed_edges(model: &Model, mounted: NodeId) -> HashSet<EdgeId> {
    model
        .subtree(mounted)
        .filter_map(|id| match &model[id].mount_point {
            Some(MountPoint::Mounted { mounted_edges, .. }) => Some(mounted_edges),
            _ => None,
        })
        .flatten()
        .copied()
        .collect()
}

fn is_ancestor(model: &Model, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = model.parent(id);
    }
    false
}
