use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use id3_trees::{DecisionTree, Fit, Sample};
use ndarray::{concatenate, Array, Array2, Axis};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::{StandardNormal, Uniform};
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;

fn generate_blobs(means: &Array2<f64>, samples: usize, mut rng: &mut SmallRng) -> Array2<f64> {
    let out = means
        .axis_iter(Axis(0))
        .map(|mean| Array::random_using((samples, 4), StandardNormal, &mut rng) + mean)
        .collect::<Vec<_>>();
    let out2 = out.iter().map(|x| x.view()).collect::<Vec<_>>();

    concatenate(Axis(0), &out2).unwrap()
}

fn decision_tree_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    // Controls how many samples for each class are generated
    let training_set_sizes = &[100, 1000, 10000];

    let n_features = 4;

    // Use the default configuration
    let hyperparams = DecisionTree::<f64>::params();

    let mut group = c.benchmark_group("decision_tree");

    for n in training_set_sizes.iter() {
        let centroids = Array2::random_using((2, n_features), Uniform::new(-30., 30.), &mut rng);

        let train_x = generate_blobs(&centroids, *n, &mut rng);
        let train_y = (0..2 * n).map(|i| i >= *n).collect::<Vec<bool>>();
        let samples = Sample::from_records(&train_x, &train_y).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &samples, |b, s| {
            b.iter(|| hyperparams.fit(s))
        });
    }

    group.finish();
}

criterion_group!(benches, decision_tree_bench);
criterion_main!(benches);
