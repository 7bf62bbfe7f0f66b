//! Converts a general graph into a browsable tree.
//!
//! A breadth-first spanning tree from the root supplies parent/child links,
//! edges being followed in either direction. Edges flagged as tree edges are
//! preferred from each node. Every edge left out of the spanning tree becomes
//! a non-tree edge of the model.

use crate::error::{ModelError, Result};
use crate::{Color, EdgeStyle, Model, NodeData, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Index into `Graph::nodes`.
    pub from: usize,
    pub to: usize,
    /// Preferred for the spanning tree when set.
    #[serde(default)]
    pub is_tree_edge: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub style: Option<EdgeStyle>,
    #[serde(default)]
    pub image_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::GraphIo {
            path: path.to_path_buf(),
            source,
        })?;
        let graph: Graph = serde_json::from_str(&text)?;
        debug!("Loaded graph with {} nodes from {}", graph.nodes.len(), path.display());
        Ok(graph)
    }

    fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.nodes.len()];
        for edge in &self.edges {
            degrees[edge.to] += 1;
        }
        degrees
    }

    /// The single node without incoming edges, or the least targeted node
    /// when every node has some.
    pub fn find_root(&self) -> Result<usize> {
        self.check()?;
        let degrees = self.in_degrees();
        let sources: Vec<usize> = (0..degrees.len()).filter(|&i| degrees[i] == 0).collect();
        match sources.as_slice() {
            [root] => Ok(*root),
            [] => (0..degrees.len()).min_by_key(|&i| degrees[i]).ok_or(ModelError::EmptyGraph),
            _ => Err(ModelError::NoSingleRoot(
                sources.iter().map(|&i| self.nodes[i].id.clone()).collect(),
            )),
        }
    }

    pub fn to_model(&self) -> Result<Model> {
        let root = self.find_root()?;
        self.to_model_from(root)
    }

    /// Span the graph from `root`. Nodes unreachable from it are left out.
    pub fn to_model_from(&self, root: usize) -> Result<Model> {
        self.check()?;
        if root >= self.nodes.len() {
            return Err(ModelError::EmptyGraph);
        }

        // incident edges per node, tree edges first
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (i, edge) in self.edges.iter().enumerate() {
            incident[edge.from].push(i);
            if edge.to != edge.from {
                incident[edge.to].push(i);
            }
        }
        for list in &mut incident {
            list.sort_by_key(|&i| !self.edges[i].is_tree_edge);
        }

        let mut model = Model::new(self.nodes[root].clone());
        let mut ids: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        ids[root] = Some(model.root());
        let mut spanning = vec![false; self.edges.len()];
        let mut queue = VecDeque::from([root]);
        while let Some(at) = queue.pop_front() {
            let Some(parent) = ids[at] else { continue };
            for &e in &incident[at] {
                let edge = &self.edges[e];
                let other = if edge.from == at { edge.to } else { edge.from };
                if ids[other].is_some() {
                    continue;
                }
                let mut data = self.nodes[other].clone();
                data.edge_label = edge.label.clone();
                data.edge_color = edge.color;
                data.edge_style = edge.style;
                data.edge_image_file = edge.image_file.clone();
                ids[other] = Some(model.add_child(parent, data));
                spanning[e] = true;
                queue.push_back(other);
            }
        }

        for (e, edge) in self.edges.iter().enumerate() {
            if spanning[e] {
                continue;
            }
            let (Some(from), Some(to)) = (ids[edge.from], ids[edge.to]) else {
                warn!("Dropping edge {} outside the spanning tree", e);
                continue;
            };
            let mut non_tree = model.new_edge(from, to);
            non_tree.label = edge.label.clone();
            non_tree.color = edge.color;
            non_tree.style = edge.style;
            non_tree.image_file = edge.image_file.clone();
            model.edges_mut().push(non_tree);
        }

        let reached = ids.iter().filter(|id| id.is_some()).count();
        if reached < self.nodes.len() {
            warn!("{} nodes unreachable from {}", self.nodes.len() - reached, self.nodes[root].id);
        }
        debug!("Spanned {} nodes, {} non-tree edges", reached, model.edges().len());
        Ok(model)
    }

    fn check(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(ModelError::EmptyGraph);
        }
        for (i, edge) in self.edges.iter().enumerate() {
            for node in [edge.from, edge.to] {
                if node >= self.nodes.len() {
                    return Err(ModelError::DanglingEdge { edge: i, node });
                }
            }
        }
        Ok(())
    }
}
