use crate::{Model, NodeId};
use treebolic_hyper::{Complex, HyperTransform, HyperTranslation};

/// Holds the current view transform and pushes it onto node locations.
#[derive(Debug, Clone)]
pub struct Transformer {
    transform: HyperTransform,
    preserve_orientation: bool,
}

impl Default for Transformer {
    fn default() -> Self {
        Self {
            transform: HyperTransform::IDENTITY,
            preserve_orientation: true,
        }
    }
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform_value(&self) -> HyperTransform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: HyperTransform) {
        self.transform = transform;
    }

    pub fn compose(&mut self, transform: &HyperTransform) {
        self.transform = self.transform.compose(transform);
    }

    pub fn preserve_orientation(&self) -> bool {
        self.preserve_orientation
    }

    pub fn set_preserve_orientation(&mut self, preserve: bool) {
        self.preserve_orientation = preserve;
    }

    /// Transform that carries `from` to `to`.
    ///
    /// When orientation is preserved the tree keeps growing in the layout
    /// direction; radial layouts keep the image of the root pointing the same
    /// way instead.
    pub fn make_transform(&self, from: Complex, to: Complex, orientation: Complex) -> HyperTransform {
        if !self.preserve_orientation {
            return HyperTransform::from_translation(HyperTranslation::euclidean(from, to));
        }
        if orientation == Complex::ZERO {
            let root = self.transform.map(Complex::ZERO);
            return HyperTransform::radial_orientation_preserving(from, to, root);
        }
        HyperTransform::orientation_preserving(from, to, orientation)
    }

    /// Place every node under `root` at the image of its laid-out center.
    pub fn transform(&self, model: &mut Model, root: NodeId) {
        let ids: Vec<NodeId> = model.subtree(root).collect();
        for id in ids {
            let hyper = &mut model[id].location.hyper;
            let center = self.transform.map(hyper.center0);
            hyper.place(center);
        }
        model[root].location.hyper.is_border = false;
    }

    /// Drop the transform and put every node back at its laid-out center.
    pub fn reset(&mut self, model: &mut Model, root: NodeId) {
        let ids: Vec<NodeId> = model.subtree(root).collect();
        for id in ids {
            model[id].location.hyper.reset();
        }
        self.transform = HyperTransform::IDENTITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LayerOut, NodeData, weigher};

    fn laid_out() -> (Model, NodeId) {
        let mut model = Model::new(NodeData::new("root"));
        let root = model.root();
        let a = model.add_child(root, NodeData::new("a"));
        model.add_child(root, NodeData::new("b"));
        model.add_child(a, NodeData::new("a1"));
        weigher::weigh(&mut model, root);
        LayerOut::new().layout(&mut model, root);
        (model, a)
    }

    #[test]
    fn test_make_transform_reaches_target() {
        let (model, a) = laid_out();
        let transformer = Transformer::new();
        let from = model[a].location.hyper.center0;
        let t = transformer.make_transform(from, Complex::ZERO, Complex::ZERO);
        assert!(t.map(from).abs() < 1e-9);
    }

    #[test]
    fn test_transform_and_reset() {
        let (mut model, a) = laid_out();
        let root = model.root();
        let mut transformer = Transformer::new();
        let from = model[a].location.hyper.center0;
        let t = transformer.make_transform(from, Complex::ZERO, Complex::ZERO);
        transformer.set_transform(t);
        transformer.transform(&mut model, root);
        assert!(model[a].location.hyper.center.abs() < 1e-9);
        assert!(!model[root].location.hyper.is_border);

        transformer.reset(&mut model, root);
        assert_eq!(model[a].location.hyper.center, from);
        assert_eq!(transformer.transform_value(), HyperTransform::IDENTITY);
    }

    #[test]
    fn test_plain_translation_when_not_preserving() {
        let mut transformer = Transformer::new();
        transformer.set_preserve_orientation(false);
        let from = Complex::new(0.3, 0.2);
        let t = transformer.make_transform(from, Complex::ZERO, Complex::SOUTH);
        assert!(t.map(from).abs() < 1e-9);
    }
}
