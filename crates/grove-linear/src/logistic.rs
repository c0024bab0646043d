//! Binary logistic regression fitted by gradient descent.

use tracing::{info, instrument};

use crate::descent::{self, Link, LinearModel};
use crate::error::LinearError;

/// Probability at or above which `predict` returns label 1.
const DECISION_THRESHOLD: f64 = 0.5;

/// Binary logistic regression trained with full-batch gradient descent on
/// cross-entropy. Labels must be 0 or 1.
///
/// # Defaults
///
/// | Parameter  | Default |
/// |------------|---------|
/// | `n_iters`  | 1000    |
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    learning_rate: f64,
    n_iters: usize,
    model: Option<LinearModel>,
}

impl LogisticRegression {
    /// Create an untrained classifier with the given learning rate.
    ///
    /// # Errors
    ///
    /// Returns [`LinearError::InvalidLearningRate`] unless `learning_rate`
    /// is finite and positive.
    pub fn new(learning_rate: f64) -> Result<Self, LinearError> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(LinearError::InvalidLearningRate { learning_rate });
        }
        Ok(Self {
            learning_rate,
            n_iters: 1000,
            model: None,
        })
    }

    /// Set the number of gradient steps.
    #[must_use]
    pub fn with_n_iters(mut self, n_iters: usize) -> Self {
        self.n_iters = n_iters;
        self
    }

    /// Fit weights and bias, replacing any previous model.
    ///
    /// On error the classifier is left untrained.
    ///
    /// # Errors
    ///
    /// Same as [`LinearRegression::fit`](crate::LinearRegression::fit),
    /// with [`LinearError::InvalidLabel`] in place of `NonFiniteTarget`.
    #[instrument(
        skip_all,
        fields(
            n_samples = features.len(),
            learning_rate = self.learning_rate,
            n_iters = self.n_iters
        )
    )]
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), LinearError> {
        self.model = None;
        if self.n_iters == 0 {
            return Err(LinearError::InvalidIterations { n_iters: 0 });
        }
        let n_features = descent::validate(features, labels.len())?;
        if let Some((sample_index, &label)) = labels.iter().enumerate().find(|&(_, &l)| l > 1) {
            return Err(LinearError::InvalidLabel {
                sample_index,
                label,
            });
        }

        let targets: Vec<f64> = labels.iter().map(|&l| l as f64).collect();
        let model = descent::fit(
            features,
            &targets,
            n_features,
            self.learning_rate,
            self.n_iters,
            Link::Logistic,
        )?;
        info!(bias = model.bias, "logistic regression fitted");
        self.model = Some(model);
        Ok(())
    }

    /// Return `P(label = 1)` for every row.
    ///
    /// # Errors
    ///
    /// | Variant                                     | When                      |
    /// |---------------------------------------------|---------------------------|
    /// | [`LinearError::NotFitted`]                  | no successful `fit` yet   |
    /// | [`LinearError::PredictionFeatureMismatch`]  | a row has the wrong width |
    pub fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, LinearError> {
        self.fitted()?.predict(features, Link::Logistic)
    }

    /// Return label 1 where the probability is at least 0.5, else 0.
    ///
    /// # Errors
    ///
    /// Same as [`predict_proba`](Self::predict_proba).
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, LinearError> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| usize::from(p >= DECISION_THRESHOLD))
            .collect())
    }

    /// Return the learned weights, one per feature.
    ///
    /// # Errors
    ///
    /// Returns [`LinearError::NotFitted`] before a successful `fit`.
    pub fn weights(&self) -> Result<&[f64], LinearError> {
        Ok(&self.fitted()?.weights)
    }

    /// Return the learned bias.
    ///
    /// # Errors
    ///
    /// Returns [`LinearError::NotFitted`] before a successful `fit`.
    pub fn bias(&self) -> Result<f64, LinearError> {
        Ok(self.fitted()?.bias)
    }

    /// Return `true` once a `fit` call has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Return the learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Return the number of gradient steps.
    #[must_use]
    pub fn n_iters(&self) -> usize {
        self.n_iters
    }

    fn fitted(&self) -> Result<&LinearModel, LinearError> {
        self.model.as_ref().ok_or(LinearError::NotFitted {
            estimator: "LogisticRegression",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f64>>, Vec<usize>) {
        let features: Vec<Vec<f64>> = (-10..=10)
            .filter(|&i| i != 0)
            .map(|i| vec![i as f64 * 0.5])
            .collect();
        let labels = features.iter().map(|r| usize::from(r[0] > 0.0)).collect();
        (features, labels)
    }

    #[test]
    fn separates_one_dimensional_classes() {
        let (features, labels) = separable();
        let mut clf = LogisticRegression::new(0.1).unwrap();
        clf.fit(&features, &labels).unwrap();
        assert_eq!(clf.predict(&features).unwrap(), labels);
        assert!(clf.weights().unwrap()[0] > 0.0);
    }

    #[test]
    fn probabilities_are_monotone_and_bounded() {
        let (features, labels) = separable();
        let mut clf = LogisticRegression::new(0.1).unwrap().with_n_iters(200);
        clf.fit(&features, &labels).unwrap();
        let probs = clf.predict_proba(&features).unwrap();
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert!(probs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn non_binary_label_rejected() {
        let mut clf = LogisticRegression::new(0.1).unwrap();
        let err = clf.fit(&[vec![0.0], vec![1.0]], &[0, 2]).unwrap_err();
        assert!(matches!(err, LinearError::InvalidLabel { sample_index: 1, label: 2 }));
        assert!(!clf.is_fitted());
    }

    #[test]
    fn predict_before_fit_fails() {
        let clf = LogisticRegression::new(0.1).unwrap();
        assert!(matches!(
            clf.predict(&[vec![0.0]]),
            Err(LinearError::NotFitted { estimator: "LogisticRegression" })
        ));
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut clf = LogisticRegression::new(0.1).unwrap().with_n_iters(1);
        // symmetric labels keep the first step at zero weight and zero bias
        clf.fit(&[vec![-1.0], vec![1.0], vec![1.0], vec![-1.0]], &[0, 1, 0, 1]).unwrap();
        assert_eq!(clf.predict_proba(&[vec![5.0]]).unwrap(), vec![0.5]);
        assert_eq!(clf.predict(&[vec![5.0]]).unwrap(), vec![1]);
    }
}
