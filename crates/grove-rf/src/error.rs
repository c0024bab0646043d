/// Broad category of an [`RfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid hyperparameters.
    Config,
    /// Training or inference data does not match the model's expectations.
    Input,
    /// The model was used before it was trained.
    State,
}

/// Errors from decision tree and Random Forest operations.
#[derive(Debug, thiserror::Error)]
pub enum RfError {
    /// Returned when n_trees is zero.
    #[error("n_trees must be at least 1, got {n_trees}")]
    InvalidTreeCount {
        /// The invalid n_trees value provided.
        n_trees: usize,
    },

    /// Returned when max_depth is zero.
    #[error("max_depth must be at least 1, got {max_depth}")]
    InvalidMaxDepth {
        /// The invalid max_depth value provided.
        max_depth: usize,
    },

    /// Returned when min_samples_split is less than 2.
    #[error("min_samples_split must be at least 2, got {min_samples_split}")]
    InvalidMinSamplesSplit {
        /// The invalid min_samples_split value provided.
        min_samples_split: usize,
    },

    /// Returned when max_features resolves to 0 or exceeds n_features.
    #[error("max_features resolved to {max_features}, but must be in [1, {n_features}]")]
    InvalidMaxFeatures {
        /// The resolved max_features value.
        max_features: usize,
        /// The number of features in the dataset.
        n_features: usize,
    },

    /// Returned when a tree's feature subset is empty, repeats an index, or
    /// names a column the data does not have.
    #[error("invalid feature subset {subset:?} for {n_features} features")]
    InvalidFeatureSubset {
        /// The rejected subset.
        subset: Vec<usize>,
        /// The number of features in the dataset.
        n_features: usize,
    },

    /// Returned when the training dataset has zero samples.
    #[error("training dataset has zero samples")]
    EmptyDataset,

    /// Returned when the training dataset has zero feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when the number of labels differs from the number of rows.
    #[error("{n_samples} samples but {n_labels} labels")]
    LabelCountMismatch {
        /// Number of feature rows.
        n_samples: usize,
        /// Number of labels.
        n_labels: usize,
    },

    /// Returned when a sample has a different number of features than expected.
    #[error("sample {sample_index} has {got} features, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the sample.
        got: usize,
        /// The zero-based index of the offending sample.
        sample_index: usize,
    },

    /// Returned when a sample has a different number of features at prediction time.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when a training value is NaN or infinite.
    #[error("non-finite value at sample {sample_index}, feature {feature_index}")]
    NonFiniteValue {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The zero-based index of the offending feature column.
        feature_index: usize,
    },

    /// Returned when a class label exceeds [`MAX_CLASS_LABEL`].
    #[error("label {label} at sample {sample_index} exceeds the maximum class label {max_label}")]
    LabelOutOfRange {
        /// The zero-based index of the offending sample.
        sample_index: usize,
        /// The offending label.
        label: usize,
        /// The largest accepted label.
        max_label: usize,
    },

    /// Returned when `predict` is called on an estimator that has not been fitted.
    #[error("{estimator} has not been fitted")]
    NotFitted {
        /// Name of the estimator type.
        estimator: &'static str,
    },

    /// Returned when OOB evaluation fails (no sample has any OOB tree).
    #[error("OOB evaluation failed: {reason}")]
    OobEvaluationFailed {
        /// Human-readable description of why OOB evaluation failed.
        reason: String,
    },
}

impl RfError {
    /// Classify this error as a configuration, input, or state failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RfError::InvalidTreeCount { .. }
            | RfError::InvalidMaxDepth { .. }
            | RfError::InvalidMinSamplesSplit { .. }
            | RfError::InvalidMaxFeatures { .. }
            | RfError::InvalidFeatureSubset { .. } => ErrorKind::Config,
            RfError::EmptyDataset
            | RfError::ZeroFeatures
            | RfError::LabelCountMismatch { .. }
            | RfError::FeatureCountMismatch { .. }
            | RfError::PredictionFeatureMismatch { .. }
            | RfError::NonFiniteValue { .. }
            | RfError::LabelOutOfRange { .. }
            | RfError::OobEvaluationFailed { .. } => ErrorKind::Input,
            RfError::NotFitted { .. } => ErrorKind::State,
        }
    }
}

/// Largest class label accepted for training.
///
/// Per-node class counts are dense vectors of length `max_label + 1`.
pub const MAX_CLASS_LABEL: usize = u16::MAX as usize;

/// Validate a row-major training set and return `n_features`.
pub(crate) fn validate_training_data(
    features: &[Vec<f64>],
    labels: &[usize],
) -> Result<usize, RfError> {
    if features.is_empty() {
        return Err(RfError::EmptyDataset);
    }
    if features.len() != labels.len() {
        return Err(RfError::LabelCountMismatch {
            n_samples: features.len(),
            n_labels: labels.len(),
        });
    }

    if let Some((sample_index, &label)) = labels
        .iter()
        .enumerate()
        .find(|&(_, &l)| l > MAX_CLASS_LABEL)
    {
        return Err(RfError::LabelOutOfRange {
            sample_index,
            label,
            max_label: MAX_CLASS_LABEL,
        });
    }

    let n_features = features[0].len();
    if n_features == 0 {
        return Err(RfError::ZeroFeatures);
    }

    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(RfError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        for (feature_index, &val) in row.iter().enumerate() {
            if !val.is_finite() {
                return Err(RfError::NonFiniteValue {
                    sample_index,
                    feature_index,
                });
            }
        }
    }

    Ok(n_features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(RfError::InvalidMaxDepth { max_depth: 0 }.kind(), ErrorKind::Config);
        assert_eq!(RfError::EmptyDataset.kind(), ErrorKind::Input);
        assert_eq!(
            RfError::NotFitted { estimator: "DecisionTreeClassifier" }.kind(),
            ErrorKind::State
        );
    }

    #[test]
    fn label_mismatch_detected() {
        let err = validate_training_data(&[vec![1.0], vec![2.0]], &[0]).unwrap_err();
        assert!(matches!(
            err,
            RfError::LabelCountMismatch { n_samples: 2, n_labels: 1 }
        ));
    }

    #[test]
    fn ragged_rows_detected() {
        let err = validate_training_data(&[vec![1.0, 2.0], vec![3.0]], &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            RfError::FeatureCountMismatch { expected: 2, got: 1, sample_index: 1 }
        ));
    }

    #[test]
    fn oversized_labels_rejected() {
        for label in [MAX_CLASS_LABEL + 1, 1usize << 61, usize::MAX] {
            let err = validate_training_data(&[vec![0.0], vec![1.0]], &[0, label]).unwrap_err();
            assert!(matches!(
                err,
                RfError::LabelOutOfRange { sample_index: 1, max_label: MAX_CLASS_LABEL, .. }
            ));
            assert_eq!(err.kind(), ErrorKind::Input);
        }
        assert!(validate_training_data(&[vec![0.0]], &[MAX_CLASS_LABEL]).is_ok());
    }

    #[test]
    fn valid_data_returns_width() {
        let n = validate_training_data(&[vec![1.0, 2.0, 3.0]], &[4]).unwrap();
        assert_eq!(n, 3);
    }
}
