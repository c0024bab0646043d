//! Batch gradient descent shared by the linear and logistic models.

use tracing::debug;

use crate::error::LinearError;

/// Floor and ceiling applied to probabilities inside the log loss.
const PROB_EPS: f64 = 1e-15;

/// Logistic function evaluated without overflowing `exp`.
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Maps the linear score `x · w + b` to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    /// Prediction is the score; loss is mean squared error.
    Identity,
    /// Prediction is `sigmoid(score)`; loss is binary cross-entropy.
    Logistic,
}

impl Link {
    fn apply(self, z: f64) -> f64 {
        match self {
            Link::Identity => z,
            Link::Logistic => sigmoid(z),
        }
    }

    fn loss(self, predicted: &[f64], targets: &[f64]) -> f64 {
        let n = targets.len() as f64;
        let total: f64 = match self {
            Link::Identity => predicted
                .iter()
                .zip(targets)
                .map(|(p, y)| (p - y).powi(2))
                .sum(),
            Link::Logistic => predicted
                .iter()
                .zip(targets)
                .map(|(&p, &y)| {
                    let p = p.clamp(PROB_EPS, 1.0 - PROB_EPS);
                    -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
                })
                .sum(),
        };
        total / n
    }
}

/// Learned weights and bias of a linear score.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinearModel {
    pub(crate) weights: Vec<f64>,
    pub(crate) bias: f64,
}

impl LinearModel {
    /// `x · w + b` for a row of the right width.
    pub(crate) fn score(&self, row: &[f64]) -> f64 {
        row.iter().zip(&self.weights).map(|(x, w)| x * w).sum::<f64>() + self.bias
    }

    /// Apply `link` to the score of every row, checking row widths.
    pub(crate) fn predict(
        &self,
        features: &[Vec<f64>],
        link: Link,
    ) -> Result<Vec<f64>, LinearError> {
        features
            .iter()
            .map(|row| {
                if row.len() != self.weights.len() {
                    return Err(LinearError::PredictionFeatureMismatch {
                        expected: self.weights.len(),
                        got: row.len(),
                    });
                }
                Ok(link.apply(self.score(row)))
            })
            .collect()
    }
}

/// Check shape and finiteness of a training set; returns `n_features`.
pub(crate) fn validate(features: &[Vec<f64>], n_targets: usize) -> Result<usize, LinearError> {
    let Some(first) = features.first() else {
        return Err(LinearError::EmptyDataset);
    };
    if n_targets != features.len() {
        return Err(LinearError::TargetCountMismatch {
            n_samples: features.len(),
            n_targets,
        });
    }
    let n_features = first.len();
    if n_features == 0 {
        return Err(LinearError::ZeroFeatures);
    }
    for (sample_index, row) in features.iter().enumerate() {
        if row.len() != n_features {
            return Err(LinearError::FeatureCountMismatch {
                expected: n_features,
                got: row.len(),
                sample_index,
            });
        }
        if let Some(feature_index) = row.iter().position(|v| !v.is_finite()) {
            return Err(LinearError::NonFiniteValue {
                sample_index,
                feature_index,
            });
        }
    }
    Ok(n_features)
}

/// Run `n_iters` full-batch gradient steps from zero weights.
///
/// For both links the gradient has the same form:
/// `dw = (1/n) Xᵀ(ŷ − y)`, `db = (1/n) Σ(ŷ − y)`.
pub(crate) fn fit(
    features: &[Vec<f64>],
    targets: &[f64],
    n_features: usize,
    learning_rate: f64,
    n_iters: usize,
    link: Link,
) -> Result<LinearModel, LinearError> {
    let n = features.len() as f64;
    let log_every = (n_iters / 10).max(1);
    let mut model = LinearModel {
        weights: vec![0.0; n_features],
        bias: 0.0,
    };
    let mut predicted = vec![0.0; features.len()];

    for iteration in 0..n_iters {
        for (p, row) in predicted.iter_mut().zip(features) {
            *p = link.apply(model.score(row));
        }

        let loss = link.loss(&predicted, targets);
        if !loss.is_finite() {
            return Err(LinearError::Diverged { iteration, loss });
        }
        if iteration % log_every == 0 {
            debug!(iteration, loss, "gradient descent step");
        }

        let mut grad_w = vec![0.0; n_features];
        let mut grad_b = 0.0;
        for ((row, &p), &y) in features.iter().zip(&predicted).zip(targets) {
            let residual = p - y;
            for (g, x) in grad_w.iter_mut().zip(row) {
                *g += residual * x;
            }
            grad_b += residual;
        }

        for (w, g) in model.weights.iter_mut().zip(&grad_w) {
            *w -= learning_rate * g / n;
        }
        model.bias -= learning_rate * grad_b / n;
    }

    if model.weights.iter().any(|w| !w.is_finite()) || !model.bias.is_finite() {
        return Err(LinearError::Diverged {
            iteration: n_iters,
            loss: f64::NAN,
        });
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert!((sigmoid(0.0) - 0.5).abs() < f64::EPSILON);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn log_loss_is_finite_for_saturated_predictions() {
        let loss = Link::Logistic.loss(&[0.0, 1.0], &[1.0, 0.0]);
        assert!(loss.is_finite());
        assert!(loss > 30.0);
    }

    #[test]
    fn validate_reports_first_problem() {
        assert!(matches!(validate(&[], 0), Err(LinearError::EmptyDataset)));
        assert!(matches!(
            validate(&[vec![1.0]], 2),
            Err(LinearError::TargetCountMismatch { n_samples: 1, n_targets: 2 })
        ));
        assert!(matches!(validate(&[vec![]], 1), Err(LinearError::ZeroFeatures)));
        assert!(matches!(
            validate(&[vec![1.0, 2.0], vec![1.0]], 2),
            Err(LinearError::FeatureCountMismatch { sample_index: 1, .. })
        ));
        assert!(matches!(
            validate(&[vec![1.0, f64::NAN]], 1),
            Err(LinearError::NonFiniteValue { sample_index: 0, feature_index: 1 })
        ));
        assert_eq!(validate(&[vec![1.0, 2.0]], 1).unwrap(), 2);
    }

    #[test]
    fn single_step_matches_hand_computed_gradient() {
        // x = [1, 2], y = [2, 4]; from zero weights ŷ = 0, residuals = [-2, -4]
        // dw = (1*-2 + 2*-4) / 2 = -5, db = -3
        let model = fit(&[vec![1.0], vec![2.0]], &[2.0, 4.0], 1, 0.1, 1, Link::Identity).unwrap();
        assert!((model.weights[0] - 0.5).abs() < 1e-12);
        assert!((model.bias - 0.3).abs() < 1e-12);
    }

    #[test]
    fn exploding_steps_report_divergence() {
        let features: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 * 100.0]).collect();
        let targets: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let err = fit(&features, &targets, 1, 10.0, 500, Link::Identity).unwrap_err();
        assert!(matches!(err, LinearError::Diverged { .. }));
    }
}
