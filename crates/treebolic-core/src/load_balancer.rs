//! Regroups overly wide child lists under intermediate group nodes.
//!
//! Each level of the hierarchy caps how many nodes sit side by side: level 0
//! is the layer just above the original nodes, the last limit holds for every
//! level above it. Group nodes are labelled with the truncated range of keys
//! they span, a key being the node label (or id when unlabelled).

use crate::{Color, EdgeStyle, Model, NodeData, NodeId};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_LIMITS: [usize; 2] = [10, 3];
pub const DEFAULT_TRUNCATE_AT: usize = 3;

/// Decorations given to every group node, and to the edges of its members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupNode {
    pub label: Option<String>,
    pub back_color: Option<Color>,
    pub fore_color: Option<Color>,
    pub edge_color: Option<Color>,
    pub edge_style: Option<EdgeStyle>,
    pub image_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoadBalancer {
    limits: Vec<usize>,
    truncate_at: usize,
    group: GroupNode,
}

impl Default for LoadBalancer {
    fn default() -> Self {
        Self::new(DEFAULT_LIMITS.to_vec(), DEFAULT_TRUNCATE_AT)
    }
}

impl LoadBalancer {
    /// Empty `limits` falls back to the defaults; limits below 2 are raised
    /// to 2 so every level shrinks the list. A zero `truncate_at` falls back
    /// to the default.
    pub fn new(limits: Vec<usize>, truncate_at: usize) -> Self {
        let limits = if limits.is_empty() {
            DEFAULT_LIMITS.to_vec()
        } else {
            limits.into_iter().map(|l| l.max(2)).collect()
        };
        let truncate_at = if truncate_at == 0 { DEFAULT_TRUNCATE_AT } else { truncate_at };
        Self {
            limits,
            truncate_at,
            group: GroupNode::default(),
        }
    }

    pub fn set_group_node(&mut self, group: GroupNode) {
        self.group = group;
    }

    pub fn limit(&self, level: usize) -> usize {
        self.limits[level.min(self.limits.len() - 1)]
    }

    /// Balance the children of `parent` in place. Returns false when they
    /// already fit.
    pub fn balance(&self, model: &mut Model, parent: NodeId) -> bool {
        if model.children(parent).len() <= self.limit(0) {
            return false;
        }
        let children = std::mem::take(&mut model[parent].children);
        let top = self.build_hierarchy(model, children, 0);
        for &node in &top {
            model[node].parent = Some(parent);
        }
        debug!("Balanced {} into {} groups", parent, top.len());
        model[parent].children = top;
        true
    }

    /// Balance every node of the subtree rooted at `root` whose fan-out
    /// exceeds the level 0 limit. Returns the number of nodes regrouped.
    pub fn balance_subtree(&self, model: &mut Model, root: NodeId) -> usize {
        let wide: Vec<NodeId> = model
            .subtree(root)
            .filter(|&id| model.children(id).len() > self.limit(0))
            .collect();
        wide.into_iter().filter(|&id| self.balance(model, id)).count()
    }

    /// Group `nodes` level by level until at most `limit(level)` remain at
    /// the top. Returned nodes are detached; grouped members are reparented
    /// to their group.
    pub fn build_hierarchy(&self, model: &mut Model, nodes: Vec<NodeId>, level: usize) -> Vec<NodeId> {
        let mut keys = HashMap::new();
        let mut nodes = nodes;
        let mut level = level;
        while nodes.len() > self.limit(level) {
            nodes = self.group_level(model, &nodes, level, &mut keys);
            level += 1;
        }
        nodes
    }

    fn group_level(
        &self,
        model: &mut Model,
        nodes: &[NodeId],
        level: usize,
        keys: &mut HashMap<NodeId, String>,
    ) -> Vec<NodeId> {
        let count = nodes.len();
        let mut size = self.limit(level);
        // a lone trailing node would make a group of one
        if count % size == 1 && size > 2 {
            size -= 1;
        }

        let mut groups = Vec::with_capacity(count.div_ceil(size));
        let mut start = 0;
        while start < count {
            let mut end = (start + size).min(count);
            // keep adjacent equal keys in one group
            if end < count && key(model, keys, nodes[end - 1]) == key(model, keys, nodes[end]) {
                end += 1;
            }
            let members = &nodes[start..end];
            let first = key(model, keys, members[0]);
            let last = key(model, keys, members[members.len() - 1]);
            let range = format!("{}-{}", left(&first, self.truncate_at), left(&last, self.truncate_at)).to_lowercase();

            let first_id = model[members[0]].data.id.clone();
            let mut data = NodeData::new(format!("{first_id}~{level}-{start}"));
            data.label = self.group.label.clone();
            data.content = Some(format!("{range}\n{first}\n{last}"));
            data.back_color = self.group.back_color;
            data.fore_color = self.group.fore_color;
            data.image_file = self.group.image_file.clone();
            data.edge_label = Some(left(&first, self.truncate_at).to_string());
            let group = model.add_node(data);

            for &member in members {
                let node = &mut model[member];
                node.parent = Some(group);
                node.data.edge_color = self.group.edge_color;
                node.data.edge_style = self.group.edge_style;
            }
            model[group].children = members.to_vec();
            keys.insert(group, range);
            groups.push(group);
            start = end;
        }
        debug!("Level {}: {} nodes in {} groups", level, count, groups.len());
        groups
    }
}

fn key(model: &Model, keys: &HashMap<NodeId, String>, node: NodeId) -> String {
    if let Some(key) = keys.get(&node) {
        return key.clone();
    }
    let data = &model[node].data;
    data.label.clone().unwrap_or_else(|| data.id.clone())
}

fn left(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((at, _)) => &s[..at],
        None => s,
    }
}
