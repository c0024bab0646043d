//! Stateful `fit` / `predict` estimators over the tree and forest builders.

use tracing::debug;

use crate::config::RandomForestConfig;
use crate::error::RfError;
use crate::result::RandomForestResult;
use crate::tree::{DecisionTree, DecisionTreeConfig};

/// A decision tree classifier that is trained in place.
///
/// `predict` fails with [`RfError::NotFitted`] until a `fit` call succeeds.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    config: DecisionTreeConfig,
    tree: Option<DecisionTree>,
}

impl DecisionTreeClassifier {
    /// Wrap a tree configuration in an untrained classifier.
    #[must_use]
    pub fn new(config: DecisionTreeConfig) -> Self {
        Self { config, tree: None }
    }

    /// Train on `features` / `labels`, replacing any previous model.
    ///
    /// On error the classifier is left untrained.
    ///
    /// # Errors
    ///
    /// Any error from [`DecisionTreeConfig::fit`].
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), RfError> {
        self.tree = None;
        let tree = self.config.fit(features, labels)?;
        debug!(n_nodes = tree.n_nodes(), depth = tree.depth(), "decision tree classifier fitted");
        self.tree = Some(tree);
        Ok(())
    }

    /// Predict one label per row of `features`.
    ///
    /// # Errors
    ///
    /// | Variant                                   | When                          |
    /// |-------------------------------------------|-------------------------------|
    /// | [`RfError::NotFitted`]                    | no successful `fit` yet       |
    /// | [`RfError::PredictionFeatureMismatch`]    | a row has the wrong width     |
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, RfError> {
        self.fitted()?.predict_batch(features)
    }

    /// Return the fitted tree.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::NotFitted`] before a successful `fit`.
    pub fn fitted(&self) -> Result<&DecisionTree, RfError> {
        self.tree.as_ref().ok_or(RfError::NotFitted {
            estimator: "DecisionTreeClassifier",
        })
    }

    /// Return `true` once a `fit` call has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &DecisionTreeConfig {
        &self.config
    }
}

/// A Random Forest classifier that is trained in place.
///
/// `predict` fails with [`RfError::NotFitted`] until a `fit` call succeeds.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    config: RandomForestConfig,
    result: Option<RandomForestResult>,
}

impl RandomForestClassifier {
    /// Wrap a forest configuration in an untrained classifier.
    #[must_use]
    pub fn new(config: RandomForestConfig) -> Self {
        Self {
            config,
            result: None,
        }
    }

    /// Train on `features` / `labels`, replacing any previous model.
    ///
    /// On error the classifier is left untrained.
    ///
    /// # Errors
    ///
    /// Any error from [`RandomForestConfig::fit`].
    pub fn fit(&mut self, features: &[Vec<f64>], labels: &[usize]) -> Result<(), RfError> {
        self.result = None;
        self.result = Some(self.config.fit(features, labels)?);
        Ok(())
    }

    /// Predict one label per row of `features` by majority vote.
    ///
    /// # Errors
    ///
    /// | Variant                                   | When                          |
    /// |-------------------------------------------|-------------------------------|
    /// | [`RfError::NotFitted`]                    | no successful `fit` yet       |
    /// | [`RfError::PredictionFeatureMismatch`]    | a row has the wrong width     |
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, RfError> {
        self.fitted()?.forest().predict_batch(features)
    }

    /// Return the training result (forest, importances, OOB score, metadata).
    ///
    /// # Errors
    ///
    /// Returns [`RfError::NotFitted`] before a successful `fit`.
    pub fn fitted(&self) -> Result<&RandomForestResult, RfError> {
        self.result.as_ref().ok_or(RfError::NotFitted {
            estimator: "RandomForestClassifier",
        })
    }

    /// Return `true` once a `fit` call has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.result.is_some()
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &RandomForestConfig {
        &self.config
    }
}
