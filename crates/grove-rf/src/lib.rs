//! Decision tree and Random Forest classification: train, predict, inspect.
//!
//! Provides a hand-rolled CART decision tree with Gini/Entropy split
//! criteria and a bagged Random Forest with per-tree or per-split feature
//! subsampling, parallel training via rayon, majority-vote prediction,
//! out-of-bag evaluation, and feature importance.

mod config;
mod error;
mod estimator;
mod forest;
mod importance;
mod node;
mod oob;
mod predict;
mod result;
mod split;
mod tree;

pub use config::{FeatureSampling, MaxFeatures, OobMode, RandomForestConfig};
pub use error::{ErrorKind, MAX_CLASS_LABEL, RfError};
pub use estimator::{DecisionTreeClassifier, RandomForestClassifier};
pub use forest::RandomForest;
pub use importance::RankedFeature;
pub use node::{FeatureIndex, Impurity, Node, NodeIndex};
pub use oob::OobScore;
pub use predict::ClassDistribution;
pub use result::{RandomForestResult, TrainingMetadata};
pub use split::{SplitCriterion, majority_class};
pub use tree::{DecisionTree, DecisionTreeConfig};
