use crate::{Model, NodeId};
use std::collections::HashMap;
use treebolic_hyper::Complex;

/// Node whose hyperbolic circle contains `point`, preferring the closest
/// center when circles overlap. Border nodes are never hit.
///
/// Each subtree reports its closest candidate only when `point` falls inside
/// that candidate's circle; the parent then competes with what its children
/// reported.
pub fn find_node_at(model: &Model, start: NodeId, point: Complex) -> Option<NodeId> {
    model.get(start)?;
    let order: Vec<NodeId> = model.subtree(start).collect();
    let mut found: HashMap<NodeId, Option<NodeId>> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        let hyper = &model[id].location.hyper;
        let mut best = (!hyper.is_border).then_some(id);
        let mut best_distance = (hyper.center - point).abs2();

        for child in model.children(id) {
            let Some(candidate) = found.remove(child).flatten() else {
                continue;
            };
            let circle = &model[candidate].location.hyper;
            if circle.is_border {
                continue;
            }
            let distance = (circle.center - point).abs2();
            if best.is_none() || distance < best_distance {
                best = Some(candidate);
                best_distance = distance;
            }
        }

        let hit = best.filter(|&b| {
            let radius = model[b].location.euclidean.radius;
            radius * radius > best_distance
        });
        found.insert(id, hit);
    }
    found.remove(&start).flatten()
}

/// Pre-order search by node id string, limited to the subtree under `start`.
pub fn find_node_by_id(model: &Model, start: NodeId, id: &str) -> Option<NodeId> {
    model.subtree(start).find(|&n| model[n].data.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LayerOut, NodeData, weigher};
    use treebolic_hyper::map_to_euclidean;

    fn laid_out() -> Model {
        let mut model = Model::new(NodeData::new("root"));
        let root = model.root();
        for i in 0..3 {
            let c = model.add_child(root, NodeData::new(format!("c{i}")));
            model.add_child(c, NodeData::new(format!("g{i}")));
        }
        weigher::weigh(&mut model, root);
        LayerOut::new().layout(&mut model, root);
        let ids: Vec<NodeId> = model.subtree(root).collect();
        for id in ids {
            map_to_euclidean(&mut model[id].location);
        }
        model
    }

    #[test]
    fn test_hit_node_center() {
        let model = laid_out();
        let root = model.root();
        for id in model.subtree(root) {
            let center = model[id].location.euclidean.center;
            assert_eq!(find_node_at(&model, root, center), Some(id));
        }
    }

    #[test]
    fn test_miss_outside() {
        let model = laid_out();
        assert_eq!(find_node_at(&model, model.root(), Complex::new(0.0, 0.99)), None);
    }

    #[test]
    fn test_deep_chain() {
        let mut model = Model::new(NodeData::new("root"));
        let mut tip = model.root();
        for i in 0..100_000 {
            tip = model.add_child(tip, NodeData::new(format!("c{i}")));
        }
        let root = model.root();
        model[root].location.euclidean.radius = 0.1;
        assert_eq!(find_node_at(&model, root, Complex::ZERO), Some(root));
    }

    #[test]
    fn test_find_by_id() {
        let model = laid_out();
        let root = model.root();
        let g1 = find_node_by_id(&model, root, "g1").unwrap();
        assert_eq!(model[g1].data.id, "g1");
        assert_eq!(find_node_by_id(&model, root, "nope"), None);
    }
}
