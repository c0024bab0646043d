//! In-memory datasets and seeded train/test splitting.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::DataError;

/// A row-major feature matrix with one target per row.
///
/// `features[i]` has one value per entry of `feature_names`, and
/// `targets[i]` is its target.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<T> {
    feature_names: Vec<String>,
    features: Vec<Vec<f64>>,
    targets: Vec<T>,
}

/// A dataset with real-valued targets.
pub type RegressionDataset = Dataset<f64>;

impl<T: Clone> Dataset<T> {
    /// Create a dataset, checking that rows and targets line up.
    ///
    /// # Errors
    ///
    /// | Variant                            | Condition                                    |
    /// |------------------------------------|----------------------------------------------|
    /// | [`DataError::LengthMismatch`]      | `features.len() != targets.len()`            |
    /// | [`DataError::RowWidthMismatch`]    | a row length differs from `feature_names`    |
    pub fn new(
        feature_names: Vec<String>,
        features: Vec<Vec<f64>>,
        targets: Vec<T>,
    ) -> Result<Self, DataError> {
        if features.len() != targets.len() {
            return Err(DataError::LengthMismatch {
                expected: features.len(),
                got: targets.len(),
            });
        }
        if let Some((row_index, row)) = features
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != feature_names.len())
        {
            return Err(DataError::RowWidthMismatch {
                row_index,
                expected: feature_names.len(),
                got: row.len(),
            });
        }
        Ok(Self {
            feature_names,
            features,
            targets,
        })
    }

    /// Shuffle rows with a seeded RNG and split off `test_fraction` of them.
    ///
    /// Returns `(train, test)`. The test side receives
    /// `round(n_samples * test_fraction)` rows.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidSplit`] if `test_fraction` is outside
    /// `(0, 1)` or either side would be empty.
    pub fn split(&self, test_fraction: f64, seed: u64) -> Result<(Self, Self), DataError> {
        let n_samples = self.n_samples();
        let invalid = DataError::InvalidSplit {
            test_fraction,
            n_samples,
        };
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(invalid);
        }
        let n_test = (n_samples as f64 * test_fraction).round() as usize;
        if n_test == 0 || n_test >= n_samples {
            return Err(invalid);
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
        let (test_idx, train_idx) = indices.split_at(n_test);
        debug!(n_train = train_idx.len(), n_test, seed, "dataset split");

        Ok((self.subset(train_idx), self.subset(test_idx)))
    }

    /// Build a new dataset from the given row indices, in order.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i].clone()).collect(),
        }
    }
}

impl<T> Dataset<T> {
    /// Return the feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the feature matrix (row-major).
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Return the targets, one per row.
    #[must_use]
    pub fn targets(&self) -> &[T] {
        &self.targets
    }

    /// Return the number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// A dataset whose targets are dense class indices into `class_names`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationDataset {
    data: Dataset<usize>,
    class_names: Vec<String>,
}

impl ClassificationDataset {
    /// Create a classification dataset.
    ///
    /// # Errors
    ///
    /// Everything [`Dataset::new`] rejects, plus
    /// [`DataError::LabelOutOfRange`] when a label is not below
    /// `class_names.len()`.
    pub fn new(
        feature_names: Vec<String>,
        features: Vec<Vec<f64>>,
        labels: Vec<usize>,
        class_names: Vec<String>,
    ) -> Result<Self, DataError> {
        if let Some(&label) = labels.iter().find(|&&l| l >= class_names.len()) {
            return Err(DataError::LabelOutOfRange {
                label,
                n_classes: class_names.len(),
            });
        }
        Ok(Self {
            data: Dataset::new(feature_names, features, labels)?,
            class_names,
        })
    }

    /// Shuffle and split, keeping the full class list on both sides.
    ///
    /// # Errors
    ///
    /// See [`Dataset::split`].
    pub fn split(&self, test_fraction: f64, seed: u64) -> Result<(Self, Self), DataError> {
        let (train, test) = self.data.split(test_fraction, seed)?;
        Ok((
            Self {
                data: train,
                class_names: self.class_names.clone(),
            },
            Self {
                data: test,
                class_names: self.class_names.clone(),
            },
        ))
    }

    /// Return the underlying labelled dataset.
    #[must_use]
    pub fn data(&self) -> &Dataset<usize> {
        &self.data
    }

    /// Return the feature matrix (row-major).
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        self.data.features()
    }

    /// Return the class label of each row.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        self.data.targets()
    }

    /// Return the feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        self.data.feature_names()
    }

    /// Return the class names; label `i` means `class_names()[i]`.
    #[must_use]
    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.class_names.len()
    }

    /// Return the number of rows.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.data.n_samples()
    }
}
