//! Configuration builder for Random Forest training.

use crate::error::RfError;
use crate::result::RandomForestResult;
use crate::split::SplitCriterion;

/// Strategy for determining how many features each tree (or split) may use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxFeatures {
    /// Floor of the square root of total features, at least 1.
    Sqrt,
    /// Floor of log base 2 of total features, at least 1.
    Log2,
    /// A fraction of total features (must be in (0.0, 1.0]), at least 1.
    Fraction(f64),
    /// A fixed count.
    Fixed(usize),
    /// All features (no subsampling).
    All,
}

impl MaxFeatures {
    /// Resolve the strategy to a concrete count for `n_features` columns.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidMaxFeatures`] when the result is outside
    /// `[1, n_features]` or a fraction is outside `(0.0, 1.0]`.
    pub fn resolve(self, n_features: usize) -> Result<usize, RfError> {
        let n = n_features as f64;
        let resolved = match self {
            MaxFeatures::Sqrt => (n.sqrt().floor() as usize).max(1),
            MaxFeatures::Log2 => (n.log2().floor().max(0.0) as usize).max(1),
            MaxFeatures::Fraction(f) if f > 0.0 && f <= 1.0 => ((n * f).floor() as usize).max(1),
            MaxFeatures::Fraction(_) => 0,
            MaxFeatures::Fixed(k) => k,
            MaxFeatures::All => n_features,
        };
        if resolved == 0 || resolved > n_features {
            return Err(RfError::InvalidMaxFeatures {
                max_features: resolved,
                n_features,
            });
        }
        Ok(resolved)
    }
}

/// Where feature subsampling happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureSampling {
    /// Each tree draws one feature subset and splits only on it.
    #[default]
    PerTree,
    /// Each tree sees every feature; every node draws fresh candidates.
    PerSplit,
}

/// Whether to compute out-of-bag evaluation during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OobMode {
    /// Compute OOB accuracy and confusion matrix.
    Enabled,
    /// Skip OOB evaluation.
    Disabled,
}

/// Configuration for Random Forest training.
///
/// Construct via [`RandomForestConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter            | Default     |
/// |----------------------|-------------|
/// | `max_features`       | `Sqrt`      |
/// | `feature_sampling`   | `PerTree`   |
/// | `max_depth`          | 10          |
/// | `min_samples_split`  | 2           |
/// | `criterion`          | `Gini`      |
/// | `seed`               | 42          |
/// | `oob_mode`           | `Disabled`  |
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    pub(crate) n_trees: usize,
    pub(crate) max_features: MaxFeatures,
    pub(crate) feature_sampling: FeatureSampling,
    pub(crate) max_depth: usize,
    pub(crate) min_samples_split: usize,
    pub(crate) criterion: SplitCriterion,
    pub(crate) seed: u64,
    pub(crate) oob_mode: OobMode,
}

impl RandomForestConfig {
    /// Create a new config with the given number of trees.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidTreeCount`] if `n_trees` is zero.
    pub fn new(n_trees: usize) -> Result<Self, RfError> {
        if n_trees == 0 {
            return Err(RfError::InvalidTreeCount { n_trees });
        }
        Ok(Self {
            n_trees,
            max_features: MaxFeatures::Sqrt,
            feature_sampling: FeatureSampling::PerTree,
            max_depth: 10,
            min_samples_split: 2,
            criterion: SplitCriterion::Gini,
            seed: 42,
            oob_mode: OobMode::Disabled,
        })
    }

    // --- Setters ---

    /// Set the max features strategy.
    #[must_use]
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set whether features are subsampled once per tree or at every split.
    #[must_use]
    pub fn with_feature_sampling(mut self, feature_sampling: FeatureSampling) -> Self {
        self.feature_sampling = feature_sampling;
        self
    }

    /// Set the maximum depth of every tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the split quality criterion.
    #[must_use]
    pub fn with_criterion(mut self, criterion: SplitCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Set the random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the OOB evaluation mode.
    #[must_use]
    pub fn with_oob_mode(mut self, oob_mode: OobMode) -> Self {
        self.oob_mode = oob_mode;
        self
    }

    // --- Getters ---

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    /// Return the max features strategy.
    #[must_use]
    pub fn max_features(&self) -> MaxFeatures {
        self.max_features
    }

    /// Return the feature sampling mode.
    #[must_use]
    pub fn feature_sampling(&self) -> FeatureSampling {
        self.feature_sampling
    }

    /// Return the maximum depth of every tree.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the minimum samples required to split a node.
    #[must_use]
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Return the split criterion.
    #[must_use]
    pub fn criterion(&self) -> SplitCriterion {
        self.criterion
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Return the OOB evaluation mode.
    #[must_use]
    pub fn oob_mode(&self) -> OobMode {
        self.oob_mode
    }

    /// Train a Random Forest on the provided dataset.
    ///
    /// `features[sample_idx][feature_idx]` — row-major layout.
    /// `labels[sample_idx]` — class labels (zero-based).
    ///
    /// # Errors
    ///
    /// | Variant                              | When                                              |
    /// |--------------------------------------|---------------------------------------------------|
    /// | [`RfError::EmptyDataset`]            | `features` is empty                               |
    /// | [`RfError::LabelCountMismatch`]      | `labels.len() != features.len()`                  |
    /// | [`RfError::ZeroFeatures`]            | rows have zero feature columns                    |
    /// | [`RfError::FeatureCountMismatch`]    | rows have inconsistent lengths                    |
    /// | [`RfError::NonFiniteValue`]          | any value is NaN or infinite                      |
    /// | [`RfError::LabelOutOfRange`]         | a label exceeds `MAX_CLASS_LABEL`                 |
    /// | [`RfError::InvalidMaxDepth`]         | `max_depth` is zero                               |
    /// | [`RfError::InvalidMinSamplesSplit`]  | `min_samples_split` < 2                           |
    /// | [`RfError::InvalidMaxFeatures`]      | resolved max_features is outside [1, n_features]  |
    /// | [`RfError::OobEvaluationFailed`]     | OOB enabled but no sample has any OOB tree        |
    pub fn fit(
        &self,
        features: &[Vec<f64>],
        labels: &[usize],
    ) -> Result<RandomForestResult, RfError> {
        crate::forest::train(self, features, labels)
    }
}
