use criterion::{criterion_group, criterion_main, Criterion};
use heightmap3d::{
    heightmap::{meshgrid, GridAxis},
    kdtree::KdTree,
};
use ndarray::{stack, Array1, Array2, Axis};
use ndarray_rand::{rand_distr::Uniform, RandomExt};
use pprof::criterion::{Output, PProfProfiler};
use rand::{rngs::SmallRng, SeedableRng};

/// Grid nodes of a 25.6 m wide map at 0.1 m, as `[n * n, 2]` queries.
fn grid_nodes() -> Array2<f32> {
    let axis = GridAxis::new(12.8, 256);
    let (x, y) = meshgrid(&axis, &axis);
    let x = x.iter().copied().collect::<Array1<f32>>();
    let y = y.iter().copied().collect::<Array1<f32>>();
    stack(Axis(1), &[x.view(), y.view()]).unwrap()
}

fn kdtree_benchmark(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(5);
    let samples = Array2::random_using((100000, 2), Uniform::new(-12.8, 12.8), &mut rng);
    let nodes = grid_nodes();

    c.bench_function("kdtree creation", |b| {
        b.iter(|| KdTree::new(&samples.view()).unwrap());
    });

    c.bench_function("kdtree grid node search", |b| {
        let tree = KdTree::new(&samples.view()).unwrap();
        b.iter(|| tree.nearest(&nodes.view()));
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = kdtree_benchmark
}

criterion_main!(benches);
