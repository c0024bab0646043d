//! Random Forest training with parallel tree construction.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use crate::config::{FeatureSampling, OobMode, RandomForestConfig};
use crate::error::{RfError, validate_training_data};
use crate::importance::aggregate_importances;
use crate::oob::compute_oob;
use crate::result::{RandomForestResult, TrainingMetadata};
use crate::split::sample_features;
use crate::tree::{DecisionTree, DecisionTreeConfig, to_columns};

/// A fitted Random Forest ensemble.
#[derive(Debug, Clone)]
pub struct RandomForest {
    pub(crate) trees: Vec<DecisionTree>,
    pub(crate) n_features: usize,
    pub(crate) n_classes: usize,
}

/// The random draws for one tree, made before any tree is fitted.
#[derive(Debug, Clone)]
struct TreePlan {
    bootstrap_indices: Vec<usize>,
    oob_indices: Vec<usize>,
    feature_subset: Option<Vec<usize>>,
    split_seed: u64,
}

/// Draw `n_samples` row indices uniformly with replacement, plus the rows never drawn.
pub(crate) fn bootstrap_sample(n_samples: usize, rng: &mut impl Rng) -> (Vec<usize>, Vec<usize>) {
    let mut in_bag = vec![false; n_samples];
    let mut bootstrap_indices = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let idx = rng.gen_range(0..n_samples);
        bootstrap_indices.push(idx);
        in_bag[idx] = true;
    }
    let oob_indices: Vec<usize> = (0..n_samples).filter(|&i| !in_bag[i]).collect();
    (bootstrap_indices, oob_indices)
}

/// Make every tree's random draws from the master generator, in tree order.
///
/// Tree `t`'s bootstrap is drawn first, then its feature subset (`PerTree`)
/// or its split seed (`PerSplit`), before tree `t + 1` draws anything.
fn plan_trees(
    config: &RandomForestConfig,
    n_samples: usize,
    n_features: usize,
    max_features: usize,
) -> Vec<TreePlan> {
    let mut master_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let all_features: Vec<usize> = (0..n_features).collect();

    (0..config.n_trees)
        .map(|_| {
            let (bootstrap_indices, oob_indices) = bootstrap_sample(n_samples, &mut master_rng);
            let (feature_subset, split_seed) = match config.feature_sampling {
                FeatureSampling::PerTree => (
                    Some(sample_features(&all_features, max_features, &mut master_rng)),
                    0,
                ),
                FeatureSampling::PerSplit => (None, master_rng.r#gen()),
            };
            TreePlan {
                bootstrap_indices,
                oob_indices,
                feature_subset,
                split_seed,
            }
        })
        .collect()
}

/// Train the Random Forest ensemble.
#[instrument(skip_all, fields(n_trees = config.n_trees, n_samples = features.len()))]
pub(crate) fn train(
    config: &RandomForestConfig,
    features: &[Vec<f64>],
    labels: &[usize],
) -> Result<RandomForestResult, RfError> {
    let n_features = validate_training_data(features, labels)?;
    let n_samples = features.len();

    let template = DecisionTreeConfig::new(config.max_depth)?
        .with_min_samples_split(config.min_samples_split)
        .with_criterion(config.criterion);
    template.validate()?;

    let max_features_resolved = config.max_features.resolve(n_features)?;
    let n_classes = labels.iter().max().copied().unwrap_or(0) + 1;

    info!(
        n_trees = config.n_trees,
        n_samples,
        n_features,
        n_classes,
        max_features = max_features_resolved,
        feature_sampling = ?config.feature_sampling,
        "training random forest"
    );

    let plans = plan_trees(config, n_samples, n_features, max_features_resolved);
    let columns = to_columns(features, n_features);

    let per_split = match config.feature_sampling {
        FeatureSampling::PerTree => None,
        FeatureSampling::PerSplit => Some(max_features_resolved),
    };

    // Each tree reads only its own plan and the shared immutable columns.
    let fitted: Vec<DecisionTree> = plans
        .as_slice()
        .into_par_iter()
        .map(|plan| {
            template
                .clone()
                .with_feature_subset(plan.feature_subset.clone())
                .with_max_features_per_split(per_split)
                .with_seed(plan.split_seed)
                .fit_columns(&columns, labels, &plan.bootstrap_indices)
        })
        .collect::<Result<_, _>>()?;

    debug!(n_trees_trained = fitted.len(), "tree training complete");

    let per_tree_importances: Vec<Vec<f64>> =
        fitted.iter().map(|t| t.feature_importances()).collect();
    let importances = aggregate_importances(&per_tree_importances, n_features);

    let oob_score = if config.oob_mode == OobMode::Enabled {
        let oob_indices_per_tree: Vec<&[usize]> =
            plans.iter().map(|p| p.oob_indices.as_slice()).collect();
        Some(compute_oob(
            &fitted,
            features,
            labels,
            n_classes,
            &oob_indices_per_tree,
        )?)
    } else {
        None
    };

    let forest = RandomForest {
        trees: fitted,
        n_features,
        n_classes,
    };

    let metadata = TrainingMetadata {
        n_trees: config.n_trees,
        n_features,
        n_classes,
        n_samples,
        max_features_resolved,
        feature_sampling: config.feature_sampling,
    };

    info!(
        oob_accuracy = oob_score.as_ref().map(|s| s.accuracy),
        "random forest training complete"
    );

    Ok(RandomForestResult::new(forest, importances, oob_score, metadata))
}
