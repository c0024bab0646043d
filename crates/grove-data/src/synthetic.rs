//! Deterministic synthetic datasets for tests, benchmarks and demos.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use tracing::debug;

use crate::dataset::{ClassificationDataset, Dataset, RegressionDataset};
use crate::DataError;

/// Distance between the centres of adjacent classes on informative columns.
const CLASS_SHIFT: f64 = 3.0;
/// Width of the uniform noise added to every column.
const NOISE_WIDTH: f64 = 0.5;

fn feature_names(n_features: usize) -> Vec<String> {
    (0..n_features).map(|f| format!("f{f}")).collect()
}

fn invalid(name: &'static str, reason: impl Into<String>) -> DataError {
    DataError::InvalidGenerator {
        name,
        reason: reason.into(),
    }
}

/// Generate a seeded multi-class dataset.
///
/// Labels are assigned round-robin (`i % n_classes`). The first
/// `n_informative` columns are `label * 3.0 + U[0, 0.5)`; the remaining
/// columns are pure `U[0, 0.5)` noise. Class names are `class_0`,
/// `class_1`, and so on.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DataError::InvalidGenerator`] | `n_samples == 0`, `n_features == 0`, `n_informative` outside `[1, n_features]`, or `n_classes < 2` |
pub fn make_classification(
    n_samples: usize,
    n_features: usize,
    n_informative: usize,
    n_classes: usize,
    seed: u64,
) -> Result<ClassificationDataset, DataError> {
    if n_samples == 0 {
        return Err(invalid("n_samples", "must be at least 1"));
    }
    if n_features == 0 {
        return Err(invalid("n_features", "must be at least 1"));
    }
    if n_informative == 0 || n_informative > n_features {
        return Err(invalid(
            "n_informative",
            format!("{n_informative} not in [1, {n_features}]"),
        ));
    }
    if n_classes < 2 {
        return Err(invalid("n_classes", "must be at least 2"));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % n_classes;
        labels.push(class);
        let row: Vec<f64> = (0..n_features)
            .map(|f| {
                let base = if f < n_informative {
                    class as f64 * CLASS_SHIFT
                } else {
                    0.0
                };
                base + rng.r#gen::<f64>() * NOISE_WIDTH
            })
            .collect();
        features.push(row);
    }
    debug!(
        n_samples,
        n_features,
        n_informative,
        n_classes,
        seed,
        "synthetic classification generated"
    );

    let class_names = (0..n_classes).map(|c| format!("class_{c}")).collect();
    ClassificationDataset::new(feature_names(n_features), features, labels, class_names)
}

/// Generate a seeded linear regression problem.
///
/// Features are standard normal, coefficients are drawn from `U[0, 100)`,
/// and `y = x · coef + noise * N(0, 1)`. Returns the dataset together
/// with the true coefficients.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DataError::InvalidGenerator`] | `n_samples == 0`, `n_features == 0`, or `noise` negative or non-finite |
pub fn make_regression(
    n_samples: usize,
    n_features: usize,
    noise: f64,
    seed: u64,
) -> Result<(RegressionDataset, Vec<f64>), DataError> {
    if n_samples == 0 {
        return Err(invalid("n_samples", "must be at least 1"));
    }
    if n_features == 0 {
        return Err(invalid("n_features", "must be at least 1"));
    }
    if !(noise.is_finite() && noise >= 0.0) {
        return Err(invalid("noise", format!("{noise} is not a finite non-negative value")));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let features: Vec<Vec<f64>> = (0..n_samples)
        .map(|_| (0..n_features).map(|_| rng.sample(StandardNormal)).collect())
        .collect();
    let coefficients: Vec<f64> = (0..n_features).map(|_| rng.gen_range(0.0..100.0)).collect();

    let targets: Vec<f64> = features
        .iter()
        .map(|row| {
            let signal: f64 = row.iter().zip(&coefficients).map(|(x, c)| x * c).sum();
            let eps: f64 = rng.sample(StandardNormal);
            signal + noise * eps
        })
        .collect();
    debug!(n_samples, n_features, noise, seed, "synthetic regression generated");

    let dataset = Dataset::new(feature_names(n_features), features, targets)?;
    Ok((dataset, coefficients))
}
