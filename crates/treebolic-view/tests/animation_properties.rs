use proptest::prelude::*;
use std::time::{Duration, Instant};
use treebolic_core::{LayerOut, Model, NodeData, Transformer};
use treebolic_hyper::distance::hyperbolic_distance;
use treebolic_hyper::{Complex, HyperRotation, HyperTransform};
use treebolic_view::{AnimationTransforms, PainterConfig, View};

proptest! {
    #[test]
    fn prop_steps_cover_the_whole_move(
        r in 0.05f64..0.9,
        angle in -3.1f64..3.1,
        steps in 1usize..12,
    ) {
        let from = Complex::from_arg_abs(angle, r);
        let transformer = Transformer::new();
        let transforms = AnimationTransforms::make(from, Complex::ZERO, &transformer, Complex::ZERO, Some(steps))
            .expect("distinct points animate");

        prop_assert_eq!(transforms.len(), steps);
        let last = transforms.transforms[steps - 1].map(from);
        prop_assert!(last.abs() < 1e-6);

        let first = transforms.transforms[0].map(from);
        prop_assert!(
            hyperbolic_distance(first, Complex::ZERO) < hyperbolic_distance(from, Complex::ZERO)
        );
    }

    #[test]
    fn prop_steps_compose_with_current_transform(
        r in 0.05f64..0.8,
        angle in -3.1f64..3.1,
        turn in -3.1f64..3.1,
    ) {
        let mut transformer = Transformer::new();
        transformer.set_transform(HyperTransform::from_rotation(HyperRotation(Complex::from_arg(turn))));
        let laid_out = Complex::from_arg_abs(angle, r);
        let from = transformer.transform_value().map(laid_out);

        let transforms = AnimationTransforms::make(from, Complex::ZERO, &transformer, Complex::ZERO, Some(3))
            .expect("distinct points animate");
        let last = transforms.transforms.last().expect("non-empty");
        prop_assert!(last.map(laid_out).abs() < 1e-6);
    }
}

#[test]
fn test_focus_child_reaches_view_center_in_four_steps() {
    let mut model = Model::new(NodeData::new("root"));
    let root = model.root();
    let a = model.add_child(root, NodeData::new("a"));
    model.add_child(root, NodeData::new("b"));

    let mut view = View::new(model, LayerOut::new(), PainterConfig::default());
    view.resize(600.0, 600.0);

    let from = view.model()[a].location.hyper.center;
    assert!(from.abs() > 0.1);

    let clock = Instant::now();
    let steps = view.animate(from, Complex::ZERO, Some(4), clock, Duration::ZERO);
    assert_eq!(steps, Some(4));

    assert!(!view.tick(clock + Duration::from_secs(2)));
    let mut location = view.model()[a].location;
    treebolic_hyper::map_to_euclidean(&mut location);
    let center = view.painter().mapper().to_view(location.euclidean.center);
    assert!((center.x - 300.0).abs() < 1.0, "x = {}", center.x);
    assert!((center.y - 300.0).abs() < 1.0, "y = {}", center.y);
}
