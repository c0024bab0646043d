//! Prediction methods for the Random Forest ensemble.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::RfError;
use crate::forest::RandomForest;
use crate::split::majority_class;
use crate::tree::DecisionTree;

/// How the trees of a forest voted for one sample.
#[derive(Debug, Clone)]
pub struct ClassDistribution {
    votes: Vec<usize>,
    probs: Vec<f64>,
}

impl ClassDistribution {
    pub(crate) fn from_votes(votes: Vec<usize>) -> Self {
        let total: usize = votes.iter().sum();
        let probs = if total == 0 {
            vec![0.0; votes.len()]
        } else {
            votes.iter().map(|&v| v as f64 / total as f64).collect()
        };
        Self { votes, probs }
    }

    /// Return the majority class; ties go to the smallest label.
    #[must_use]
    pub fn predicted_class(&self) -> usize {
        majority_class(&self.votes)
    }

    /// Return the top-k classes sorted by descending vote share.
    ///
    /// Classes with equal share keep ascending label order.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<(usize, f64)> {
        let mut indexed: Vec<(usize, f64)> = self.probs.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
        indexed.truncate(k);
        indexed
    }

    /// Return the raw vote count per class.
    #[must_use]
    pub fn votes(&self) -> &[usize] {
        &self.votes
    }

    /// Return the fraction of trees voting for each class.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }
}

impl RandomForest {
    /// Predict the class label for a single sample by majority vote.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<usize, RfError> {
        Ok(self.vote_distribution(sample)?.predicted_class())
    }

    /// Collect one vote per tree for a single sample.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn vote_distribution(&self, sample: &[f64]) -> Result<ClassDistribution, RfError> {
        if sample.len() != self.n_features {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }

        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            votes[tree.predict_unchecked(sample)] += 1;
        }

        Ok(ClassDistribution::from_votes(votes))
    }

    /// Predict class labels for a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] if any sample has the wrong feature count.
    pub fn predict_batch(&self, features: &[Vec<f64>]) -> Result<Vec<usize>, RfError> {
        features
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }

    /// Return vote distributions for a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] if any sample has the wrong feature count.
    pub fn vote_distribution_batch(
        &self,
        features: &[Vec<f64>],
    ) -> Result<Vec<ClassDistribution>, RfError> {
        features
            .into_par_iter()
            .map(|sample| self.vote_distribution(sample))
            .collect()
    }

    /// Return the number of features this forest was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Return the number of trees in the ensemble.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Return the fitted trees in training order.
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{FeatureIndex, Impurity, Node, NodeIndex};

    fn constant_tree(class: usize, n_features: usize) -> DecisionTree {
        DecisionTree {
            nodes: vec![Node::Leaf {
                prediction: class,
                impurity: Impurity::new(0.0),
                n_samples: 1,
            }],
            n_features,
            n_classes: class + 1,
            feature_subset: (0..n_features).collect(),
        }
    }

    fn stump(n_features: usize) -> DecisionTree {
        // x[0] < 0.0 -> class 0, else class 1
        DecisionTree {
            nodes: vec![
                Node::Split {
                    feature: FeatureIndex::new(0),
                    threshold: 0.0,
                    left: NodeIndex::new(1),
                    right: NodeIndex::new(2),
                    impurity: Impurity::new(0.5),
                    n_samples: 2,
                    gain: 0.5,
                },
                Node::Leaf {
                    prediction: 0,
                    impurity: Impurity::new(0.0),
                    n_samples: 1,
                },
                Node::Leaf {
                    prediction: 1,
                    impurity: Impurity::new(0.0),
                    n_samples: 1,
                },
            ],
            n_features,
            n_classes: 2,
            feature_subset: (0..n_features).collect(),
        }
    }

    fn forest(trees: Vec<DecisionTree>, n_classes: usize) -> RandomForest {
        RandomForest {
            trees,
            n_features: 1,
            n_classes,
        }
    }

    #[test]
    fn strict_majority_wins() {
        let f = forest(
            vec![
                constant_tree(2, 1),
                constant_tree(2, 1),
                constant_tree(2, 1),
                constant_tree(0, 1),
                constant_tree(1, 1),
            ],
            3,
        );
        assert_eq!(f.predict(&[0.0]).unwrap(), 2);
    }

    #[test]
    fn vote_tie_goes_to_smallest_label() {
        let f = forest(
            vec![
                constant_tree(2, 1),
                constant_tree(1, 1),
                constant_tree(2, 1),
                constant_tree(1, 1),
            ],
            3,
        );
        assert_eq!(f.predict(&[0.0]).unwrap(), 1);
    }

    #[test]
    fn votes_follow_tree_routing() {
        let f = forest(vec![stump(1), stump(1), constant_tree(0, 1)], 2);
        assert_eq!(f.predict_batch(&[vec![-1.0], vec![1.0]]).unwrap(), vec![0, 1]);
        let dist = f.vote_distribution(&[1.0]).unwrap();
        assert_eq!(dist.votes(), &[1, 2]);
        assert!((dist.as_slice()[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn top_k_orders_by_share_then_label() {
        let dist = ClassDistribution::from_votes(vec![1, 3, 1, 0]);
        let top = dist.top_k(3);
        assert_eq!(top.iter().map(|&(c, _)| c).collect::<Vec<_>>(), vec![1, 0, 2]);
    }

    #[test]
    fn batch_matches_individual() {
        let f = forest(vec![stump(1), constant_tree(1, 1)], 2);
        let queries: Vec<Vec<f64>> = (-3..4).map(|i| vec![i as f64]).collect();
        let batch = f.vote_distribution_batch(&queries).unwrap();
        for (sample, dist) in queries.iter().zip(&batch) {
            assert_eq!(dist.votes(), f.vote_distribution(sample).unwrap().votes());
        }
    }

    #[test]
    fn width_mismatch_rejected() {
        let f = forest(vec![constant_tree(0, 1)], 1);
        let err = f.predict_batch(&[vec![0.0, 1.0]]).unwrap_err();
        assert!(matches!(
            err,
            RfError::PredictionFeatureMismatch { expected: 1, got: 2 }
        ));
    }
}
