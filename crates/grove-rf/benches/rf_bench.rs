//! Criterion benchmarks for grove-rf: tree and forest training and prediction.

use criterion::{Criterion, criterion_group, criterion_main};

use grove_data::make_classification;
use grove_rf::{DecisionTreeConfig, FeatureSampling, RandomForestConfig};

fn bench_tree_fit(c: &mut Criterion) {
    let ds = make_classification(500, 20, 5, 5, 42).unwrap();
    let cfg = DecisionTreeConfig::new(10).unwrap();

    c.bench_function("tree_fit_500x20_5class", |b| {
        b.iter(|| cfg.fit(ds.features(), ds.labels()).unwrap());
    });
}

fn bench_rf_train(c: &mut Criterion) {
    let ds = make_classification(500, 20, 5, 5, 42).unwrap();
    let per_tree = RandomForestConfig::new(50).unwrap().with_seed(42);
    let per_split = per_tree.clone().with_feature_sampling(FeatureSampling::PerSplit);

    c.bench_function("rf_train_500x20_5class_50trees_per_tree", |b| {
        b.iter(|| per_tree.fit(ds.features(), ds.labels()).unwrap());
    });
    c.bench_function("rf_train_500x20_5class_50trees_per_split", |b| {
        b.iter(|| per_split.fit(ds.features(), ds.labels()).unwrap());
    });
}

fn bench_rf_predict_batch(c: &mut Criterion) {
    let ds = make_classification(500, 20, 5, 5, 42).unwrap();
    let cfg = RandomForestConfig::new(50).unwrap().with_seed(42);
    let forest = cfg.fit(ds.features(), ds.labels()).unwrap().into_forest();

    c.bench_function("rf_predict_batch_500x20_50trees", |b| {
        b.iter(|| forest.predict_batch(ds.features()).unwrap());
    });
}

criterion_group!(benches, bench_tree_fit, bench_rf_train, bench_rf_predict_batch);
criterion_main!(benches);
