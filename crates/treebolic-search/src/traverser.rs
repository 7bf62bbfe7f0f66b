use crate::generator::{Generator, Interrupted, Yielder};
use crate::matcher::Matcher;
use treebolic_core::{Model, NodeData, NodeId};

/// Pre-order walk over a subtree that yields the nodes `matcher` accepts.
/// A node is tested before its children are visited.
pub struct Traverser<'a, M: Matcher> {
    model: &'a Model,
    matcher: M,
    stack: Vec<NodeId>,
}

impl<'a, M: Matcher> Traverser<'a, M> {
    pub fn new(model: &'a Model, start: NodeId, matcher: M) -> Self {
        Self {
            model,
            matcher,
            stack: vec![start],
        }
    }
}

impl<M: Matcher> Iterator for Traverser<'_, M> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.stack.pop() {
            self.stack
                .extend(self.model.children(id).iter().rev().copied());
            if self.model.get(id).is_some_and(|n| self.matcher.matches(&n.data)) {
                return Some(id);
            }
        }
        None
    }
}

struct SnapshotNode {
    id: NodeId,
    data: NodeData,
    children: Vec<usize>,
}

/// Run the same search on a producer thread over a snapshot of the subtree,
/// so the result can be kept and resumed across frames while the model keeps
/// changing.
pub fn spawn_traverser(
    model: &Model,
    start: NodeId,
    matcher: Box<dyn Matcher>,
) -> Generator<NodeId> {
    let snapshot = snapshot(model, start);
    Generator::new(move |yielder: &Yielder<NodeId>| traverse(&snapshot, matcher.as_ref(), yielder))
}

fn traverse(nodes: &[SnapshotNode], matcher: &dyn Matcher, yielder: &Yielder<NodeId>) -> Result<(), Interrupted> {
    let mut stack: Vec<usize> = if nodes.is_empty() { Vec::new() } else { vec![0] };
    while let Some(index) = stack.pop() {
        yielder.check()?;
        let node = &nodes[index];
        if matcher.matches(&node.data) {
            yielder.yield_item(node.id)?;
        }
        stack.extend(node.children.iter().rev().copied());
    }
    Ok(())
}

fn snapshot(model: &Model, start: NodeId) -> Vec<SnapshotNode> {
    let mut nodes: Vec<SnapshotNode> = Vec::new();
    let Some(root) = model.get(start) else {
        return nodes;
    };
    nodes.push(SnapshotNode {
        id: start,
        data: root.data.clone(),
        children: Vec::new(),
    });
    let mut pending = vec![0usize];
    while let Some(index) = pending.pop() {
        let id = nodes[index].id;
        for &child in model.children(id) {
            let slot = nodes.len();
            nodes.push(SnapshotNode {
                id: child,
                data: model[child].data.clone(),
                children: Vec::new(),
            });
            nodes[index].children.push(slot);
            pending.push(slot);
        }
    }
    nodes
}
