//! Hyperbolic cone layout.
//!
//! Each node's children are spread over a wedge around the node's growth
//! direction, at a hyperbolic distance that shrinks as the fan gets crowded.
//! Wedge shares follow the weights computed by [`crate::weigher`].

use crate::settings::Settings;
use crate::{Model, MountPoint, NodeId};
use std::f64::consts::{FRAC_PI_2, PI};
use treebolic_hyper::distance::e2h;
use treebolic_hyper::{Complex, HyperTranslation};

const KSI: f64 = 4.0;
const DEFAULT_EXPANSION: f64 = 0.3;
const DEFAULT_RADIAL_ROOT_SWEEP: f64 = PI;
const DEFAULT_ORIENTED_ROOT_SWEEP: f64 = FRAC_PI_2;
const DEFAULT_CHILD_SWEEP: f64 = FRAC_PI_2;

#[derive(Debug, Clone)]
pub struct LayerOut {
    orientation: Complex,
    root_sweep: f64,
    node_distance: f64,
    node_sweep: f64,
    sweep_factor: f64,
    radius: f64,
    clockwise: bool,
}

impl Default for LayerOut {
    fn default() -> Self {
        let mut layout = Self {
            orientation: Complex::ZERO,
            root_sweep: DEFAULT_RADIAL_ROOT_SWEEP,
            node_distance: 0.0,
            node_sweep: 0.0,
            sweep_factor: 0.0,
            radius: 0.0,
            clockwise: false,
        };
        layout.set_orientation(Complex::ZERO);
        layout.set_expansion(DEFAULT_EXPANSION);
        layout.set_child_sweep(DEFAULT_CHILD_SWEEP);
        layout
    }
}

impl LayerOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orientation(&self) -> Complex {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Complex) {
        self.orientation = orientation;
        self.clockwise = !(orientation == Complex::NORTH || orientation == Complex::EAST);
    }

    pub fn is_radial(&self) -> bool {
        self.orientation == Complex::ZERO
    }

    pub fn expansion(&self) -> f64 {
        self.node_distance
    }

    pub fn set_expansion(&mut self, expansion: f64) {
        self.node_distance = expansion;
        self.radius = e2h(expansion);
    }

    pub fn root_sweep(&self) -> f64 {
        self.root_sweep
    }

    pub fn set_root_sweep(&mut self, sweep: f64) {
        self.root_sweep = sweep;
    }

    pub fn child_sweep(&self) -> f64 {
        self.node_sweep
    }

    pub fn set_child_sweep(&mut self, sweep: f64) {
        self.node_sweep = sweep;
        self.sweep_factor = PI - sweep;
    }

    /// Apply orientation, expansion factor and sweep factor from settings.
    pub fn apply(&mut self, settings: &Settings) -> crate::Result<()> {
        if settings.orientation.is_some() {
            self.set_orientation(settings.orientation()?);
        }
        let radial = self.is_radial();

        self.set_expansion(DEFAULT_EXPANSION);
        if let Some(factor) = settings.expansion.filter(|f| *f > 0.0) {
            self.set_expansion(DEFAULT_EXPANSION * factor);
        }

        self.set_root_sweep(if radial {
            DEFAULT_RADIAL_ROOT_SWEEP
        } else {
            DEFAULT_ORIENTED_ROOT_SWEEP
        });
        self.set_child_sweep(DEFAULT_CHILD_SWEEP);
        if let Some(factor) = settings.sweep.filter(|f| *f > 0.0) {
            self.set_child_sweep(DEFAULT_CHILD_SWEEP * factor);
        }
        Ok(())
    }

    /// Lay out the whole tree with `root` at the disk center.
    pub fn layout(&self, model: &mut Model, root: NodeId) {
        model[root].location.set(Complex::ZERO, self.radius);
        self.layout_children(model, root, self.root_sweep, self.orientation.arg());
    }

    /// Lay out a subtree in place, e.g. a freshly mounted one, inside the
    /// wedge reserved for it.
    pub fn layout_subtree(
        &self,
        model: &mut Model,
        node: NodeId,
        center: Complex,
        half_wedge: f64,
        orientation: f64,
    ) {
        model[node].location.set(center, self.radius);
        self.layout_children(model, node, half_wedge, orientation);
    }

    fn layout_children(&self, model: &mut Model, node: NodeId, half_wedge: f64, orientation: f64) {
        let step = |share: f64| if self.clockwise { share } else { -share };
        let mut pending = vec![(node, half_wedge, orientation)];
        while let Some((node, half_wedge, orientation)) = pending.pop() {
            let children = model.children(node).to_vec();
            if children.is_empty() {
                continue;
            }
            let center = model[node].location.hyper.center;
            let children_weight = model[node].children_weight;
            let node_distance = self.compute_distance(children.len());
            let radius = e2h(node_distance / 2.0);

            let mut sweeper = orientation - step(half_wedge);
            for &child in &children {
                let share = if children_weight > 0.0 {
                    model[child].weight.abs() / children_weight
                } else {
                    1.0 / children.len() as f64
                };
                let child_half_wedge_share = half_wedge * share;
                sweeper += step(child_half_wedge_share);

                let child_center =
                    HyperTranslation::map_by(Complex::from_arg_abs(sweeper, node_distance), center);
                model[child].location.set(child_center, radius);

                let child_orientation = compute_orientation(center, child_center, sweeper);
                let child_half_wedge = compute_wedge(node_distance, child_half_wedge_share);
                model[child].location.half_wedge = child_half_wedge;
                model[child].location.orientation = child_orientation;
                record_mount_wedge(model, child, child_half_wedge, child_orientation);

                pending.push((child, child_half_wedge, child_orientation));
                sweeper += step(child_half_wedge_share);
            }
        }
    }

    fn compute_distance(&self, child_count: usize) -> f64 {
        let l1 = 1.0 - 1.0 / KSI - self.node_distance;
        let l2 = (KSI * self.sweep_factor / (KSI - 1.0 + child_count as f64)).cos();
        self.node_distance + l1 * l2
    }
}

/// Growth direction at `center`: the parent's direction carried along the
/// translation from `parent_center` to `center`.
fn compute_orientation(parent_center: Complex, center: Complex, orientation: f64) -> f64 {
    HyperTranslation::map2(Complex::from_arg(orientation), parent_center, -center).arg()
}

fn compute_wedge(node_distance: f64, wedge: f64) -> f64 {
    HyperTranslation::map_by(Complex::from_arg(-wedge), Complex::new(-node_distance, 0.0))
        .arg()
        .abs()
}

/// Store the wedge on the placeholder that owns `node`'s slot, following a
/// mounted root back to its placeholder.
fn record_mount_wedge(model: &mut Model, node: NodeId, half_wedge: f64, orientation: f64) {
    let mut current = node;
    loop {
        match &mut model[current].mount_point {
            Some(MountPoint::Mounting {
                half_wedge: hw,
                orientation: o,
                ..
            }) => {
                *hw = half_wedge;
                *o = orientation;
                return;
            }
            Some(MountPoint::Mounted { mounting, .. }) => current = *mounting,
            None => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeData, weigher};

    fn star(n: usize) -> Model {
        let mut model = Model::new(NodeData::new("root"));
        let root = model.root();
        for i in 0..n {
            let child = model.add_child(root, NodeData::new(format!("c{i}")));
            model.add_child(child, NodeData::new(format!("g{i}")));
        }
        weigher::weigh(&mut model, root);
        model
    }

    #[test]
    fn test_nodes_stay_inside_disk() {
        let mut model = star(6);
        let root = model.root();
        LayerOut::new().layout(&mut model, root);
        assert_eq!(model[root].location.hyper.center, Complex::ZERO);
        for id in model.subtree(root) {
            let center = model[id].location.hyper.center;
            assert!(center.abs() < 1.0, "{id} escaped the disk: {center}");
        }
    }

    #[test]
    fn test_radial_children_are_spread() {
        let mut model = star(4);
        let root = model.root();
        LayerOut::new().layout(&mut model, root);
        let args: Vec<f64> = model
            .children(root)
            .iter()
            .map(|&c| model[c].location.hyper.center.arg())
            .collect();
        for pair in args.windows(2) {
            assert!((pair[0] - pair[1]).abs() > 0.1);
        }
    }

    #[test]
    fn test_oriented_layout_grows_south() {
        let mut model = star(3);
        let root = model.root();
        let mut layout = LayerOut::new();
        layout
            .apply(&Settings {
                orientation: Some("north".into()),
                ..Default::default()
            })
            .unwrap();
        layout.layout(&mut model, root);
        for &child in model.children(root) {
            assert!(model[child].location.hyper.center.im < 0.0);
        }
    }

    #[test]
    fn test_deep_chain() {
        let mut model = Model::new(NodeData::new("root"));
        let mut tip = model.root();
        for i in 0..100_000 {
            tip = model.add_child(tip, NodeData::new(format!("c{i}")));
        }
        let root = model.root();
        weigher::weigh(&mut model, root);
        LayerOut::new().layout(&mut model, root);
        let first = model.children(root)[0];
        let center = model[first].location.hyper.center;
        assert!(center.abs() > 0.0 && center.abs() < 1.0);
        assert_ne!(model[tip].location.hyper.center, Complex::ZERO);
    }

    #[test]
    fn test_mounting_point_gets_wedge() {
        let mut model = star(2);
        let root = model.root();
        let first = model.children(root)[0];
        model[first].mount_point = Some(MountPoint::mounting("more"));
        LayerOut::new().layout(&mut model, root);
        match &model[first].mount_point {
            Some(MountPoint::Mounting { half_wedge, .. }) => assert!(*half_wedge > 0.0),
            other => panic!("unexpected mount point {other:?}"),
        }
    }
}
