//! Error types for grove-linear.

/// Errors from linear and logistic regression training and prediction.
#[derive(Debug, thiserror::Error)]
pub enum LinearError {
    /// Returned when the learning rate is not a finite positive number.
    #[error("learning_rate must be finite and > 0, got {learning_rate}")]
    InvalidLearningRate {
        /// The rejected learning rate.
        learning_rate: f64,
    },

    /// Returned when the iteration count is zero.
    #[error("n_iters must be >= 1, got {n_iters}")]
    InvalidIterations {
        /// The rejected iteration count.
        n_iters: usize,
    },

    /// Returned when the training set has no samples.
    #[error("empty dataset: no samples provided")]
    EmptyDataset,

    /// Returned when samples have zero feature columns.
    #[error("samples have zero features")]
    ZeroFeatures,

    /// Returned when the target count does not match the sample count.
    #[error("target count mismatch: {n_samples} samples but {n_targets} targets")]
    TargetCountMismatch {
        /// Number of feature rows.
        n_samples: usize,
        /// Number of targets.
        n_targets: usize,
    },

    /// Returned when a training row has a different width than the first row.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        got: usize,
        /// Index of the offending row.
        sample_index: usize,
    },

    /// Returned when a prediction row has the wrong width.
    #[error("prediction sample has {got} features, model expects {expected}")]
    PredictionFeatureMismatch {
        /// Number of features the model was trained on.
        expected: usize,
        /// Width of the offending row.
        got: usize,
    },

    /// Returned when a feature value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// Row of the offending value.
        sample_index: usize,
        /// Column of the offending value.
        feature_index: usize,
    },

    /// Returned when a regression target is NaN or infinite.
    #[error("non-finite target at sample {sample_index}")]
    NonFiniteTarget {
        /// Row of the offending target.
        sample_index: usize,
    },

    /// Returned when a logistic regression label is not 0 or 1.
    #[error("label {label} at sample {sample_index} is not 0 or 1")]
    InvalidLabel {
        /// Row of the offending label.
        sample_index: usize,
        /// The offending label.
        label: usize,
    },

    /// Returned when `predict` is called before a successful `fit`.
    #[error("{estimator} is not fitted; call fit first")]
    NotFitted {
        /// Name of the estimator.
        estimator: &'static str,
    },

    /// Returned when the training loss stops being finite.
    #[error("gradient descent diverged at iteration {iteration} (loss {loss}); lower the learning rate")]
    Diverged {
        /// Zero-based iteration at which the loss became non-finite.
        iteration: usize,
        /// The non-finite loss value.
        loss: f64,
    },
}
