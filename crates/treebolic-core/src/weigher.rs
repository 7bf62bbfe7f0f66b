use crate::{Model, NodeId};

/// Assign layout weights bottom-up: leaves weigh 1, inner nodes grow with the
/// log of their children's total. Nodes whose weight was preset to a negative
/// value keep it; its magnitude is used when sharing out the wedge.
pub fn weigh(model: &mut Model, node: NodeId) {
    // reversed pre-order visits every child before its parent
    let order: Vec<NodeId> = model.subtree(node).collect();
    for &id in order.iter().rev() {
        weigh_node(model, id);
    }
}

fn weigh_node(model: &mut Model, node: NodeId) {
    let mut sum = 0.0;
    let mut min_weight = 1000.0_f64;
    for &child in model.children(node) {
        let weight = model[child].weight.abs();
        sum += weight;
        min_weight = min_weight.min(weight);
    }
    let n = &mut model[node];
    if n.children.is_empty() {
        n.children_weight = 0.0;
        n.min_weight = 1.0;
        if n.weight >= 0.0 {
            n.weight = 1.0;
        }
        return;
    }
    n.children_weight = sum;
    n.min_weight = min_weight;
    if n.weight >= 0.0 {
        n.weight = 1f64.max((1.0 + sum).ln());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeData;

    #[test]
    fn test_weights() {
        let mut model = Model::new(NodeData::new("root"));
        let root = model.root();
        let a = model.add_child(root, NodeData::new("a"));
        let b = model.add_child(root, NodeData::new("b"));
        for i in 0..9 {
            model.add_child(a, NodeData::new(format!("a{i}")));
        }
        model[b].weight = -3.0;
        weigh(&mut model, root);

        assert_eq!(model[a].children_weight, 9.0);
        assert!((model[a].weight - 10f64.ln()).abs() < 1e-12);
        assert_eq!(model[b].weight, -3.0);
        assert!((model[root].children_weight - (10f64.ln() + 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_deep_chain() {
        let mut model = Model::new(NodeData::new("root"));
        let mut tip = model.root();
        for i in 0..100_000 {
            tip = model.add_child(tip, NodeData::new(format!("c{i}")));
        }
        let root = model.root();
        weigh(&mut model, root);
        assert_eq!(model[tip].weight, 1.0);
        assert_eq!(model[model.root()].children_weight, 1.0);
    }
}
