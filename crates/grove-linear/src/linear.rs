//! Ordinary least squares fitted by gradient descent.

use tracing::{info, instrument};

use crate::descent::{self, Link, LinearModel};
use crate::error::LinearError;

/// Linear regression trained with full-batch gradient descent on MSE.
///
/// # Defaults
///
/// | Parameter  | Default |
/// |------------|---------|
/// | `n_iters`  | 1000    |
#[derive(Debug, Clone)]
pub struct LinearRegression {
    learning_rate: f64,
    n_iters: usize,
    model: Option<LinearModel>,
}

impl LinearRegression {
    /// Create an untrained regressor with the given learning rate.
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
    /// On error the regressor is left untrained.
    ///
    /// # Errors
    ///
    /// | Variant                                | When                                 |
    /// |----------------------------------------|--------------------------------------|
    /// | [`LinearError::InvalidIterations`]     | `n_iters` is zero                    |
    /// | [`LinearError::EmptyDataset`]          | `features` is empty                  |
    /// | [`LinearError::TargetCountMismatch`]   | `targets.len() != features.len()`    |
    /// | [`LinearError::ZeroFeatures`]          | rows have no columns                 |
    /// | [`LinearError::FeatureCountMismatch`]  | rows have inconsistent lengths       |
    /// | [`LinearError::NonFiniteValue`]        | a feature is NaN or infinite         |
    /// | [`LinearError::NonFiniteTarget`]       | a target is NaN or infinite          |
    /// | [`LinearError::Diverged`]              | the loss became non-finite           |
    #[instrument(
        skip_all,
        fields(
            n_samples = features.len(),
            learning_rate = self.learning_rate,
            n_iters = self.n_iters
        )
    )]
    pub fn fit(&mut self, features: &[Vec<f64>], targets: &[f64]) -> Result<(), LinearError> {
        self.model = None;
        if self.n_iters == 0 {
            return Err(LinearError::InvalidIterations { n_iters: 0 });
        }
        let n_features = descent::validate(features, targets.len())?;
        if let Some(sample_index) = targets.iter().position(|y| !y.is_finite()) {
            return Err(LinearError::NonFiniteTarget { sample_index });
        }

        let model = descent::fit(
            features,
            targets,
            n_features,
            self.learning_rate,
            self.n_iters,
            Link::Identity,
        )?;
        info!(bias = model.bias, "linear regression fitted");
        self.model = Some(model);
        Ok(())
    }

    /// Predict `x · w + b` for every row.
    ///
    /// # Errors
    ///
    /// | Variant                                     | When                      |
    /// |---------------------------------------------|---------------------------|
    /// | [`LinearError::NotFitted`]                  | no successful `fit` yet   |
    /// | [`LinearError::PredictionFeatureMismatch`]  | a row has the wrong width |
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, LinearError> {
        self.fitted()?.predict(features, Link::Identity)
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
            estimator: "LinearRegression",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> (Vec<Vec<f64>>, Vec<f64>) {
        // y = 2x + 1 on x in [-1, 1]
        let features: Vec<Vec<f64>> = (0..21).map(|i| vec![-1.0 + i as f64 * 0.1]).collect();
        let targets = features.iter().map(|r| 2.0 * r[0] + 1.0).collect();
        (features, targets)
    }

    #[test]
    fn invalid_learning_rate_rejected() {
        for lr in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                LinearRegression::new(lr),
                Err(LinearError::InvalidLearningRate { .. })
            ));
        }
    }

    #[test]
    fn recovers_line() {
        let (features, targets) = line();
        let mut reg = LinearRegression::new(0.1).unwrap().with_n_iters(5000);
        reg.fit(&features, &targets).unwrap();
        assert!((reg.weights().unwrap()[0] - 2.0).abs() < 1e-6);
        assert!((reg.bias().unwrap() - 1.0).abs() < 1e-6);

        let preds = reg.predict(&[vec![3.0]]).unwrap();
        assert!((preds[0] - 7.0).abs() < 1e-5);
    }

    #[test]
    fn predict_before_fit_fails() {
        let reg = LinearRegression::new(0.01).unwrap();
        assert!(matches!(
            reg.predict(&[vec![1.0]]),
            Err(LinearError::NotFitted { estimator: "LinearRegression" })
        ));
        assert!(reg.weights().is_err());
    }

    #[test]
    fn zero_iterations_rejected() {
        let (features, targets) = line();
        let mut reg = LinearRegression::new(0.1).unwrap().with_n_iters(0);
        assert!(matches!(
            reg.fit(&features, &targets),
            Err(LinearError::InvalidIterations { n_iters: 0 })
        ));
    }

    #[test]
    fn non_finite_target_rejected() {
        let mut reg = LinearRegression::new(0.1).unwrap();
        let err = reg.fit(&[vec![1.0], vec![2.0]], &[1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, LinearError::NonFiniteTarget { sample_index: 1 }));
    }

    #[test]
    fn failed_refit_clears_model() {
        let (features, targets) = line();
        let mut reg = LinearRegression::new(0.1).unwrap();
        reg.fit(&features, &targets).unwrap();
        assert!(reg.is_fitted());
        assert!(reg.fit(&features, &targets[..3]).is_err());
        assert!(!reg.is_fitted());
    }

    #[test]
    fn prediction_width_checked() {
        let (features, targets) = line();
        let mut reg = LinearRegression::new(0.1).unwrap();
        reg.fit(&features, &targets).unwrap();
        assert!(matches!(
            reg.predict(&[vec![1.0, 2.0]]),
            Err(LinearError::PredictionFeatureMismatch { expected: 1, got: 2 })
        ));
    }
}
