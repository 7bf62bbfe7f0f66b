use crate::node::{Node, NodeData};
use crate::{Color, EdgeId, EdgeStyle, NodeId};
use std::collections::HashMap;
use std::ops::{Index, IndexMut};

/// Non-tree edge between two arbitrary nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub label: Option<String>,
    pub color: Option<Color>,
    pub style: Option<EdgeStyle>,
    pub image_file: Option<String>,
}

/// Node arena plus the shared list of non-tree edges.
///
/// Nodes are never freed: a subtree built for mounting lives in the arena
/// detached (no parent) until it is grafted, and returns to that state when
/// pruned.
#[derive(Debug)]
pub struct Model {
    nodes: Vec<Node>,
    root: NodeId,
    edges: Vec<Edge>,
    next_edge: usize,
    ids: HashMap<String, NodeId>,
}

impl Model {
    pub fn new(root: NodeData) -> Self {
        let mut model = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            edges: Vec::new(),
            next_edge: 0,
            ids: HashMap::new(),
        };
        model.root = model.add_node(root);
        model
    }

    /// Add a detached node.
    pub fn add_node(&mut self, data: NodeData) -> NodeId {
        let idx = NodeId(self.nodes.len());
        if !data.id.is_empty() && self.ids.insert(data.id.clone(), idx).is_some() {
            tracing::warn!("Duplicate node id {:?}, lookups now resolve to {}", data.id, idx);
        }
        self.nodes.push(Node::new(data));
        idx
    }

    pub fn add_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let child = self.add_node(data);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        child
    }

    /// Allocate an edge without inserting it into the shared list.
    pub fn new_edge(&mut self, from: NodeId, to: NodeId) -> Edge {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        Edge {
            id,
            from,
            to,
            label: None,
            color: None,
            style: None,
            image_file: None,
        }
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> EdgeId {
        let edge = self.new_edge(from, to);
        let id = edge.id;
        self.edges.push(edge);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.edges
    }

    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Pre-order walk of the subtree rooted at `start`.
    pub fn subtree(&self, start: NodeId) -> Subtree<'_> {
        Subtree {
            model: self,
            stack: vec![start],
        }
    }

    /// Every node id in the arena, attached or not.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(p) = current {
            depth += 1;
            current = self.parent(p);
        }
        depth
    }
}

pub struct Subtree<'a> {
    model: &'a Model,
    stack: Vec<NodeId>,
}

impl Iterator for Subtree<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.model.children(id).iter().rev().copied());
        Some(id)
    }
}

impl Index<NodeId> for Model {
    type Output = Node;
    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeId> for Model {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}
