use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use treebolic_bench::util;
use treebolic_core::Transformer;
use treebolic_hyper::Complex;
use treebolic_view::AnimationTransforms;

fn bench_transform_tree(c: &mut Criterion) {
    let (mut model, layout) = util::prepared_model(6);
    let mut transformer = Transformer::new();
    let translation = transformer.make_transform(Complex::new(0.3, -0.2), Complex::ZERO, layout.orientation());
    transformer.set_transform(translation);
    let root = model.root();

    c.bench_function("transform_4k_nodes", |b| {
        b.iter(|| {
            transformer.transform(black_box(&mut model), root);
        })
    });
}

fn bench_animation_steps(c: &mut Criterion) {
    let transformer = Transformer::new();
    c.bench_function("animation_transforms_32_steps", |b| {
        b.iter(|| {
            let steps = AnimationTransforms::make(
                black_box(Complex::new(0.6, 0.5)),
                Complex::ZERO,
                &transformer,
                Complex::ZERO,
                Some(32),
            );
            black_box(steps);
        })
    });
}

criterion_group!(benches, bench_transform_tree, bench_animation_steps);
criterion_main!(benches);
