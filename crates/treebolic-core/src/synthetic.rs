//! Generated trees for demos and benchmarks.
//!
//! Node ids are dotted paths (`n`, `n.0`, `n.0.2`, ...) so they are stable
//! across runs and easy to address from links and searches. Fan-outs wider
//! than the load balancer's first limit are regrouped under group nodes.

use crate::load_balancer::LoadBalancer;
use crate::{Model, MountPoint, NodeData, NodeId};

/// Shape of a generated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeShape {
    pub depth: usize,
    pub fanout: usize,
    /// Every n-th leaf becomes a mount placeholder. Zero disables mounting.
    pub mount_every: usize,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            depth: 3,
            fanout: 4,
            mount_every: 0,
        }
    }
}

/// Balanced tree with `fanout` children per inner node.
pub fn balanced(depth: usize, fanout: usize) -> Model {
    generate(TreeShape {
        depth,
        fanout,
        mount_every: 0,
    })
}

pub fn generate(shape: TreeShape) -> Model {
    let mut model = Model::new(node_data("n", 0));
    let root = model.root();
    let mut leaves = 0;
    grow(&mut model, root, "n", shape, &mut leaves);
    LoadBalancer::default().balance_subtree(&mut model, root);
    tracing::debug!("Generated {} nodes ({:?})", model.node_count(), shape);
    model
}

/// Build a detached subtree for `url`, ready to be grafted at a mount
/// placeholder.
pub fn subtree(model: &mut Model, url: &str, depth: usize, fanout: usize) -> NodeId {
    let prefix = format!("{url}:n");
    let root = model.add_node(node_data(&prefix, 0));
    let shape = TreeShape {
        depth,
        fanout,
        mount_every: 0,
    };
    let mut leaves = 0;
    grow(model, root, &prefix, shape, &mut leaves);
    LoadBalancer::default().balance_subtree(model, root);
    root
}

struct Frame {
    parent: NodeId,
    path: String,
    level: usize,
    next: usize,
}

/// Depth-first growth, children in order, so arena order is pre-order.
fn grow(model: &mut Model, root: NodeId, root_path: &str, shape: TreeShape, leaves: &mut usize) {
    let mut frames = vec![Frame {
        parent: root,
        path: root_path.to_string(),
        level: 1,
        next: 0,
    }];
    while let Some(frame) = frames.last_mut() {
        if frame.level > shape.depth || frame.next == shape.fanout {
            frames.pop();
            continue;
        }
        let i = frame.next;
        frame.next += 1;
        let (parent, level) = (frame.parent, frame.level);
        let child_path = format!("{}.{i}", frame.path);

        let mut data = node_data(&child_path, level);
        if i == 0 && level > 1 {
            // back to the top, exercises bookmark links
            data.link = Some("#n".to_string());
        }
        let child = model.add_child(parent, data);
        if level == shape.depth {
            *leaves += 1;
            if shape.mount_every > 0 && *leaves % shape.mount_every == 0 {
                model[child].mount_point = Some(MountPoint::mounting(format!("mount/{child_path}")));
            }
        }
        frames.push(Frame {
            parent: child,
            path: child_path,
            level: level + 1,
            next: 0,
        });
    }
}

fn node_data(id: &str, level: usize) -> NodeData {
    let label = id.rsplit(':').next().unwrap_or(id).to_string();
    NodeData::new(id)
        .with_label(label)
        .with_content(format!("Level {level} node {id}"))
}
