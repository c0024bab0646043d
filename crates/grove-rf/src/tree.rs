use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, instrument};

use crate::{
    RfError,
    error::validate_training_data,
    node::{FeatureIndex, Node, NodeIndex},
    split::{SplitCriterion, find_best_split, majority_class, sample_features},
};

/// Configuration for a single CART decision tree.
///
/// Construct via [`DecisionTreeConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter                 | Default               |
/// |---------------------------|-----------------------|
/// | `min_samples_split`       | 2                     |
/// | `criterion`               | `Gini`                |
/// | `feature_subset`          | `None` (all features) |
/// | `max_features_per_split`  | `None` (no sampling)  |
/// | `seed`                    | 42                    |
#[derive(Debug, Clone)]
pub struct DecisionTreeConfig {
    pub(crate) max_depth: usize,
    pub(crate) min_samples_split: usize,
    pub(crate) criterion: SplitCriterion,
    pub(crate) feature_subset: Option<Vec<usize>>,
    pub(crate) max_features_per_split: Option<usize>,
    pub(crate) seed: u64,
}

impl DecisionTreeConfig {
    /// Create a new config with the given depth limit (the root is depth 0).
    ///
    /// # Errors
    ///
    /// Returns [`RfError::InvalidMaxDepth`] if `max_depth` is zero.
    pub fn new(max_depth: usize) -> Result<Self, RfError> {
        if max_depth == 0 {
            return Err(RfError::InvalidMaxDepth { max_depth });
        }
        Ok(Self {
            max_depth,
            min_samples_split: 2,
            criterion: SplitCriterion::Gini,
            feature_subset: None,
            max_features_per_split: None,
            seed: 42,
        })
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

    /// Restrict the tree to a fixed set of feature columns.
    ///
    /// `None` lets the tree split on every column.
    #[must_use]
    pub fn with_feature_subset(mut self, feature_subset: Option<Vec<usize>>) -> Self {
        self.feature_subset = feature_subset;
        self
    }

    /// Draw this many candidate features (from the allowed set) at every node.
    ///
    /// `None` considers every allowed feature at every node.
    #[must_use]
    pub fn with_max_features_per_split(mut self, max_features: Option<usize>) -> Self {
        self.max_features_per_split = max_features;
        self
    }

    /// Set the seed for per-split feature sampling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the maximum depth.
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

    /// Return the fixed feature subset, if any.
    #[must_use]
    pub fn feature_subset(&self) -> Option<&[usize]> {
        self.feature_subset.as_deref()
    }

    /// Return the per-split feature sample size, if set.
    #[must_use]
    pub fn max_features_per_split(&self) -> Option<usize> {
        self.max_features_per_split
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Train a decision tree on the provided row-major dataset.
    ///
    /// `features[sample_idx][feature_idx]` — row-major layout.
    /// `labels[sample_idx]` — class labels (zero-based).
    ///
    /// # Errors
    ///
    /// | Variant                              | When                                           |
    /// |--------------------------------------|------------------------------------------------|
    /// | [`RfError::EmptyDataset`]            | `features` is empty                            |
    /// | [`RfError::LabelCountMismatch`]      | `labels.len() != features.len()`               |
    /// | [`RfError::ZeroFeatures`]            | rows have zero feature columns                 |
    /// | [`RfError::FeatureCountMismatch`]    | rows have inconsistent lengths                 |
    /// | [`RfError::NonFiniteValue`]          | any value is NaN or infinite                   |
    /// | [`RfError::LabelOutOfRange`]         | a label exceeds `MAX_CLASS_LABEL`              |
    /// | [`RfError::InvalidMaxDepth`]         | `max_depth` is zero                            |
    /// | [`RfError::InvalidMinSamplesSplit`]  | `min_samples_split` < 2                        |
    /// | [`RfError::InvalidFeatureSubset`]    | subset is empty, repeats, or is out of range   |
    /// | [`RfError::InvalidMaxFeatures`]      | per-split sample size outside [1, subset size] |
    #[instrument(skip(self, features, labels), fields(n_samples = features.len()))]
    pub fn fit(&self, features: &[Vec<f64>], labels: &[usize]) -> Result<DecisionTree, RfError> {
        let n_features = validate_training_data(features, labels)?;
        let columns = to_columns(features, n_features);
        let sample_indices: Vec<usize> = (0..features.len()).collect();
        self.fit_columns(&columns, labels, &sample_indices)
    }

    /// Train on pre-validated column-major data, using only `sample_indices`.
    ///
    /// Indices may repeat (bootstrap samples); each occurrence counts as one sample.
    pub(crate) fn fit_columns(
        &self,
        columns: &[Vec<f64>],
        labels: &[usize],
        sample_indices: &[usize],
    ) -> Result<DecisionTree, RfError> {
        self.validate()?;
        let n_features = columns.len();
        let allowed = self.allowed_features(n_features)?;

        if let Some(k) = self.max_features_per_split
            && (k == 0 || k > allowed.len())
        {
            return Err(RfError::InvalidMaxFeatures {
                max_features: k,
                n_features: allowed.len(),
            });
        }

        let n_classes = sample_indices
            .iter()
            .map(|&si| labels[si])
            .max()
            .unwrap_or(0)
            + 1;

        let mut builder = TreeBuilder {
            columns,
            labels,
            n_classes,
            config: self,
            allowed: &allowed,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
            arena: Vec::new(),
        };
        builder.build(sample_indices, 0);
        let nodes = builder.arena;

        debug!(
            n_nodes = nodes.len(),
            n_classes,
            n_allowed_features = allowed.len(),
            "decision tree built"
        );

        Ok(DecisionTree {
            nodes,
            n_features,
            n_classes,
            feature_subset: allowed,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), RfError> {
        if self.max_depth == 0 {
            return Err(RfError::InvalidMaxDepth { max_depth: 0 });
        }
        if self.min_samples_split < 2 {
            return Err(RfError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }
        Ok(())
    }

    /// Resolve the feature subset to a sorted list of usable column indices.
    fn allowed_features(&self, n_features: usize) -> Result<Vec<usize>, RfError> {
        let Some(subset) = &self.feature_subset else {
            return Ok((0..n_features).collect());
        };
        let mut sorted = subset.clone();
        sorted.sort_unstable();
        sorted.dedup();
        let out_of_range = sorted.last().is_some_and(|&f| f >= n_features);
        if sorted.is_empty() || sorted.len() != subset.len() || out_of_range {
            return Err(RfError::InvalidFeatureSubset {
                subset: subset.clone(),
                n_features,
            });
        }
        Ok(sorted)
    }
}

/// Transpose row-major features into one `Vec` per column.
pub(crate) fn to_columns(features: &[Vec<f64>], n_features: usize) -> Vec<Vec<f64>> {
    (0..n_features)
        .map(|feat_idx| features.iter().map(|row| row[feat_idx]).collect())
        .collect()
}

/// Recursive state for growing one tree into an arena.
struct TreeBuilder<'a> {
    columns: &'a [Vec<f64>],
    labels: &'a [usize],
    n_classes: usize,
    config: &'a DecisionTreeConfig,
    allowed: &'a [usize],
    rng: ChaCha8Rng,
    arena: Vec<Node>,
}

impl TreeBuilder<'_> {
    /// Grow the subtree for `sample_indices` at `depth` and return its index.
    fn build(&mut self, sample_indices: &[usize], depth: usize) -> NodeIndex {
        let n_samples = sample_indices.len();

        let mut class_counts = vec![0usize; self.n_classes];
        for &si in sample_indices {
            class_counts[self.labels[si]] += 1;
        }
        let impurity = self.config.criterion.impurity(&class_counts, n_samples);
        let prediction = majority_class(&class_counts);

        let depth_reached = depth >= self.config.max_depth;
        let too_few = n_samples < self.config.min_samples_split;
        let pure = class_counts.iter().filter(|&&c| c > 0).count() <= 1;

        if depth_reached || too_few || pure {
            return self.push(Node::Leaf {
                prediction,
                impurity,
                n_samples,
            });
        }

        let candidates = match self.config.max_features_per_split {
            Some(k) => sample_features(self.allowed, k, &mut self.rng),
            None => self.allowed.to_vec(),
        };

        let split = find_best_split(
            self.columns,
            self.labels,
            sample_indices,
            self.n_classes,
            self.config.criterion,
            &candidates,
        );

        let split = match split {
            Some(s) if s.gain > 0.0 => s,
            _ => {
                return self.push(Node::Leaf {
                    prediction,
                    impurity,
                    n_samples,
                });
            }
        };

        // Reserve the parent slot so the root stays at index 0.
        let node_idx = self.push(Node::Leaf {
            prediction,
            impurity,
            n_samples,
        });

        let left = self.build(&split.left_indices, depth + 1);
        let right = self.build(&split.right_indices, depth + 1);

        self.arena[node_idx.index()] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            impurity,
            n_samples,
            gain: split.gain,
        };

        node_idx
    }

    fn push(&mut self, node: Node) -> NodeIndex {
        let idx = NodeIndex::new(self.arena.len());
        self.arena.push(node);
        idx
    }
}

/// A fitted CART decision tree.
///
/// Stored as an arena-based `Vec<Node>` with the root at [`NodeIndex::ROOT`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) n_features: usize,
    pub(crate) n_classes: usize,
    pub(crate) feature_subset: Vec<usize>,
}

impl DecisionTree {
    /// Predict the class label for a single sample.
    ///
    /// Traverses from the root: at each `Split`, goes left when
    /// `sample[feature] < threshold`, right otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`RfError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<usize, RfError> {
        if sample.len() != self.n_features {
            return Err(RfError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        Ok(self.predict_unchecked(sample))
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

    /// Traverse without checking the sample width.
    pub(crate) fn predict_unchecked(&self, sample: &[f64]) -> usize {
        let mut idx = NodeIndex::ROOT;
        loop {
            match &self.nodes[idx.index()] {
                Node::Leaf { prediction, .. } => return *prediction,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    idx = if sample[feature.index()] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Compute Mean Decrease in Impurity (MDI) feature importances.
    ///
    /// Each `Split` contributes `gain * n_samples` to its feature; totals are
    /// normalized to sum to 1.0. Returns a `Vec` of length `n_features`; all
    /// zeros when the tree is a single leaf.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.n_features];
        for node in &self.nodes {
            if let Node::Split {
                feature,
                gain,
                n_samples,
                ..
            } = node
            {
                totals[feature.index()] += gain * *n_samples as f64;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }
        totals
    }

    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[NodeIndex::ROOT.index()]
    }

    /// Return the node at `index`, if it exists.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.index())
    }

    /// Return all nodes in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the number of features this tree was trained on.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of classes seen during training (max label + 1).
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Return the sorted feature columns this tree was allowed to split on.
    #[must_use]
    pub fn feature_subset(&self) -> &[usize] {
        &self.feature_subset
    }

    /// Return the features actually used by split nodes, in arena order.
    #[must_use]
    pub fn split_features(&self) -> Vec<FeatureIndex> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf { .. } => None,
            })
            .collect()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-node tree (just a root leaf) has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0usize;
        let mut queue = VecDeque::new();
        queue.push_back((NodeIndex::ROOT, 0usize));

        while let Some((idx, d)) = queue.pop_front() {
            match self.nodes[idx.index()].children() {
                None => max_depth = max_depth.max(d),
                Some((left, right)) => {
                    queue.push_back((left, d + 1));
                    queue.push_back((right, d + 1));
                }
            }
        }

        max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(max_depth: usize) -> DecisionTreeConfig {
        DecisionTreeConfig::new(max_depth).unwrap()
    }

    #[test]
    fn zero_depth_rejected() {
        let err = DecisionTreeConfig::new(0).unwrap_err();
        assert!(matches!(err, RfError::InvalidMaxDepth { max_depth: 0 }));
    }

    #[test]
    fn min_samples_split_below_two_rejected() {
        let err = tree(3)
            .with_min_samples_split(1)
            .fit(&[vec![0.0], vec![1.0]], &[0, 1])
            .unwrap_err();
        assert!(matches!(
            err,
            RfError::InvalidMinSamplesSplit { min_samples_split: 1 }
        ));
    }

    #[test]
    fn empty_dataset_error() {
        let features: Vec<Vec<f64>> = vec![];
        let labels: Vec<usize> = vec![];
        let err = tree(3).fit(&features, &labels).unwrap_err();
        assert!(matches!(err, RfError::EmptyDataset));
    }

    #[test]
    fn label_count_mismatch_error() {
        let err = tree(3).fit(&[vec![1.0], vec![2.0]], &[0]).unwrap_err();
        assert!(matches!(err, RfError::LabelCountMismatch { .. }));
    }

    #[test]
    fn non_finite_value_error() {
        let features = vec![vec![1.0, f64::NAN], vec![3.0, 4.0]];
        let err = tree(3).fit(&features, &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            RfError::NonFiniteValue { sample_index: 0, feature_index: 1 }
        ));
    }

    #[test]
    fn huge_labels_are_input_errors() {
        for label in [usize::MAX, 1usize << 61, 1_000_000_000] {
            let err = tree(2).fit(&[vec![0.0], vec![1.0]], &[0, label]).unwrap_err();
            assert!(matches!(err, RfError::LabelOutOfRange { sample_index: 1, .. }));
        }
    }

    #[test]
    fn largest_accepted_label_trains() {
        let fitted = tree(2)
            .fit(&[vec![0.0], vec![1.0]], &[0, crate::MAX_CLASS_LABEL])
            .unwrap();
        assert_eq!(fitted.n_classes(), crate::MAX_CLASS_LABEL + 1);
        assert_eq!(fitted.predict(&[1.5]).unwrap(), crate::MAX_CLASS_LABEL);
    }

    #[test]
    fn pure_dataset_single_leaf() {
        let features = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let labels = vec![2, 2, 2];
        let fitted = tree(5).fit(&features, &labels).unwrap();
        assert_eq!(fitted.n_nodes(), 1);
        assert_eq!(fitted.root().prediction(), Some(2));
        let preds = fitted
            .predict_batch(&[vec![-100.0, 0.0], vec![2.0, 3.0], vec![1e9, 1e9]])
            .unwrap();
        assert_eq!(preds, vec![2, 2, 2]);
    }

    #[test]
    fn single_sample_is_leaf() {
        let fitted = tree(4).fit(&[vec![3.0, 1.0]], &[7]).unwrap();
        assert!(fitted.root().is_leaf());
        assert_eq!(fitted.root().prediction(), Some(7));
    }

    #[test]
    fn depth_one_stump_on_four_points() {
        let features = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
        let labels = vec![0, 0, 1, 1];
        let fitted = tree(1).fit(&features, &labels).unwrap();

        match fitted.root() {
            Node::Split {
                feature,
                threshold,
                left,
                right,
                gain,
                ..
            } => {
                assert_eq!(feature.index(), 0);
                assert!((threshold - 1.5).abs() < f64::EPSILON);
                assert!(*gain > 0.0);
                assert_eq!(fitted.node(*left).unwrap().prediction(), Some(0));
                assert_eq!(fitted.node(*right).unwrap().prediction(), Some(1));
            }
            Node::Leaf { .. } => panic!("root should split"),
        }

        let preds = fitted.predict_batch(&[vec![0.5], vec![2.7]]).unwrap();
        assert_eq!(preds, vec![0, 1]);
    }

    #[test]
    fn threshold_value_routes_right() {
        let features = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
        let fitted = tree(1).fit(&features, &[0, 0, 1, 1]).unwrap();
        assert_eq!(fitted.predict(&[1.5]).unwrap(), 1);
        assert_eq!(fitted.predict(&[1.499]).unwrap(), 0);
    }

    #[test]
    fn leaf_majority_tie_goes_to_smallest_label() {
        // Identical features: no split possible, 2 vs 2 tie.
        let features = vec![vec![1.0], vec![1.0], vec![1.0], vec![1.0]];
        let fitted = tree(3).fit(&features, &[3, 1, 3, 1]).unwrap();
        assert_eq!(fitted.n_nodes(), 1);
        assert_eq!(fitted.predict(&[1.0]).unwrap(), 1);
    }

    #[test]
    fn xor_needs_depth_two() {
        let features = vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ];
        let labels = vec![0, 1, 1, 0];
        // No single cut improves purity on XOR, so the root stays a leaf.
        let fitted = tree(5).fit(&features, &labels).unwrap();
        assert_eq!(fitted.depth(), 0);
        assert_eq!(fitted.predict(&[1.0, 1.0]).unwrap(), 0);
    }

    #[test]
    fn no_leaf_exceeds_max_depth() {
        let features: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64, (i % 7) as f64]).collect();
        let labels: Vec<usize> = (0..64).map(|i| (i / 3) % 4).collect();
        for max_depth in 1..6 {
            let fitted = tree(max_depth).fit(&features, &labels).unwrap();
            assert!(fitted.depth() <= max_depth, "depth {} > {max_depth}", fitted.depth());
        }
    }

    #[test]
    fn min_samples_split_stops_growth() {
        let features = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
        let fitted = tree(5)
            .with_min_samples_split(5)
            .fit(&features, &[0, 0, 1, 1])
            .unwrap();
        assert_eq!(fitted.n_nodes(), 1);
    }

    #[test]
    fn feature_subset_restricts_splits() {
        // Column 0 separates the classes; column 1 is only partially useful.
        let features = vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![2.0, 0.0],
            vec![3.0, 1.0],
        ];
        let labels = vec![0, 0, 1, 1];
        let fitted = tree(3)
            .with_feature_subset(Some(vec![1]))
            .fit(&features, &labels)
            .unwrap();
        assert!(fitted.split_features().iter().all(|f| f.index() == 1));
        assert_eq!(fitted.feature_subset(), &[1]);
        // Prediction still takes full-width rows.
        assert!(fitted.predict(&[0.0]).is_err());
    }

    #[test]
    fn invalid_feature_subsets_rejected() {
        let features = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        for subset in [vec![], vec![0, 0], vec![2]] {
            let err = tree(3)
                .with_feature_subset(Some(subset))
                .fit(&features, &[0, 1])
                .unwrap_err();
            assert!(matches!(err, RfError::InvalidFeatureSubset { .. }));
        }
    }

    #[test]
    fn entropy_criterion_separates() {
        let features = vec![
            vec![1.0, 0.0],
            vec![2.0, 0.0],
            vec![3.0, 0.0],
            vec![10.0, 0.0],
            vec![11.0, 0.0],
            vec![12.0, 0.0],
        ];
        let labels = vec![0, 0, 0, 1, 1, 1];
        let fitted = tree(4)
            .with_criterion(SplitCriterion::Entropy)
            .fit(&features, &labels)
            .unwrap();
        assert_eq!(fitted.predict(&[2.0, 0.0]).unwrap(), 0);
        assert_eq!(fitted.predict(&[11.0, 0.0]).unwrap(), 1);
        match fitted.root() {
            Node::Split { gain, .. } => assert!((gain - 1.0).abs() < 1e-12),
            Node::Leaf { .. } => panic!("root should split"),
        }
    }

    #[test]
    fn per_split_sampling_is_seeded() {
        let features: Vec<Vec<f64>> = (0..40)
            .map(|i| vec![i as f64, (i * 7 % 11) as f64, (i * 3 % 5) as f64])
            .collect();
        let labels: Vec<usize> = (0..40).map(|i| (i * 7 % 11) % 3).collect();
        let config = tree(6).with_max_features_per_split(Some(1)).with_seed(9);
        let a = config.fit(&features, &labels).unwrap();
        let b = config.fit(&features, &labels).unwrap();
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn per_split_sample_larger_than_subset_rejected() {
        let err = tree(3)
            .with_feature_subset(Some(vec![0]))
            .with_max_features_per_split(Some(2))
            .fit(&[vec![0.0, 1.0], vec![1.0, 0.0]], &[0, 1])
            .unwrap_err();
        assert!(matches!(err, RfError::InvalidMaxFeatures { .. }));
    }

    #[test]
    fn feature_importances_sum_to_one() {
        let features = vec![
            vec![1.0, 100.0],
            vec![2.0, 200.0],
            vec![3.0, 300.0],
            vec![10.0, 100.0],
            vec![11.0, 200.0],
            vec![12.0, 300.0],
        ];
        let labels = vec![0, 0, 0, 1, 1, 1];
        let fitted = tree(4).fit(&features, &labels).unwrap();
        let importances = fitted.feature_importances();
        let sum: f64 = importances.iter().sum();
        assert!((sum - 1.0).abs() < 1e-10, "sum = {sum}");
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn prediction_feature_mismatch() {
        let features = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let fitted = tree(2).fit(&features, &[0, 1]).unwrap();
        let err = fitted.predict(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            RfError::PredictionFeatureMismatch { expected: 2, got: 1 }
        ));
    }
}
