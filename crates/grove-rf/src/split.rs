use rand::Rng;

use crate::node::{FeatureIndex, Impurity};

/// Criterion for measuring the quality of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitCriterion {
    /// Gini impurity: 1 - Σ(p_i²)
    #[default]
    Gini,
    /// Information entropy in bits: -Σ(p_i · log2(p_i))
    Entropy,
}

impl SplitCriterion {
    /// Compute the impurity of a node from its class counts.
    ///
    /// Returns [`Impurity::new(0.0)`] when `n_samples` is zero.
    #[must_use]
    pub fn impurity(&self, class_counts: &[usize], n_samples: usize) -> Impurity {
        if n_samples == 0 {
            return Impurity::new(0.0);
        }
        let n = n_samples as f64;
        let value = match self {
            SplitCriterion::Gini => {
                let sum_sq: f64 = class_counts
                    .iter()
                    .map(|&c| {
                        let p = c as f64 / n;
                        p * p
                    })
                    .sum();
                1.0 - sum_sq
            }
            SplitCriterion::Entropy => {
                -class_counts
                    .iter()
                    .filter(|&&c| c > 0)
                    .map(|&c| {
                        let p = c as f64 / n;
                        p * p.log2()
                    })
                    .sum::<f64>()
            }
        };
        // 1 - Σp² can land a hair below zero for a pure node.
        Impurity::new(value.max(0.0))
    }

    /// Information gain of partitioning `parent` into `left` and `right`.
    ///
    /// Children are weighted by the fraction of parent samples they receive.
    /// The class-count slices must all have the same length and
    /// `left[c] + right[c] == parent[c]` for every class.
    #[must_use]
    pub fn information_gain(&self, parent: &[usize], left: &[usize], right: &[usize]) -> f64 {
        let n_left: usize = left.iter().sum();
        let n_right: usize = right.iter().sum();
        let n = n_left + n_right;
        if n == 0 {
            return 0.0;
        }
        let parent_impurity = self.impurity(parent, n).value();
        let left_impurity = self.impurity(left, n_left).value();
        let right_impurity = self.impurity(right, n_right).value();
        parent_impurity
            - (n_left as f64 / n as f64) * left_impurity
            - (n_right as f64 / n as f64) * right_impurity
    }
}

/// Most frequent class in `class_counts`; ties go to the smallest label.
///
/// Returns 0 for an empty or all-zero histogram.
#[must_use]
pub fn majority_class(class_counts: &[usize]) -> usize {
    let mut best = 0;
    for (class, &count) in class_counts.iter().enumerate() {
        if count > class_counts[best] {
            best = class;
        }
    }
    best
}

/// Result of finding the best split for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    pub(crate) feature: FeatureIndex,
    pub(crate) threshold: f64,
    pub(crate) gain: f64,
    pub(crate) left_indices: Vec<usize>,
    pub(crate) right_indices: Vec<usize>,
}

/// Find the split with the highest information gain.
///
/// Scans `candidate_features` in the order given (callers pass them sorted
/// ascending). For each feature the `(value, label)` pairs are sorted and
/// every midpoint between consecutive distinct values is tried with
/// incremental class count updates. A candidate replaces the current best
/// only on strictly greater gain, so ties resolve to the lowest feature and
/// then the lowest threshold.
///
/// Returns `None` when every candidate feature is constant over the subset.
///
/// # Column-major layout
///
/// `features` is column-major: `features[feature_idx][sample_idx]`.
pub(crate) fn find_best_split(
    features: &[Vec<f64>],
    labels: &[usize],
    sample_indices: &[usize],
    n_classes: usize,
    criterion: SplitCriterion,
    candidate_features: &[usize],
) -> Option<SplitResult> {
    let n_samples = sample_indices.len();
    if n_samples < 2 || candidate_features.is_empty() {
        return None;
    }

    let mut parent_counts = vec![0usize; n_classes];
    for &si in sample_indices {
        parent_counts[labels[si]] += 1;
    }
    let parent_impurity = criterion.impurity(&parent_counts, n_samples).value();
    let n = n_samples as f64;

    let mut best: Option<(FeatureIndex, f64, f64)> = None;

    for &feat_idx in candidate_features {
        let feat_col = &features[feat_idx];

        let mut sorted: Vec<(f64, usize)> = sample_indices
            .iter()
            .map(|&si| (feat_col[si], labels[si]))
            .collect();
        sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut left_counts = vec![0usize; n_classes];
        let mut right_counts = parent_counts.clone();

        for i in 0..(n_samples - 1) {
            let (val_i, class_i) = sorted[i];
            left_counts[class_i] += 1;
            right_counts[class_i] -= 1;

            let val_next = sorted[i + 1].0;
            if val_i == val_next {
                continue;
            }

            let n_left = i + 1;
            let n_right = n_samples - n_left;
            let left_impurity = criterion.impurity(&left_counts, n_left).value();
            let right_impurity = criterion.impurity(&right_counts, n_right).value();
            let gain = parent_impurity
                - (n_left as f64 / n) * left_impurity
                - (n_right as f64 / n) * right_impurity;

            let is_better = match best {
                Some((_, _, best_gain)) => gain > best_gain,
                None => true,
            };
            if is_better {
                best = Some((FeatureIndex::new(feat_idx), midpoint(val_i, val_next), gain));
            }
        }
    }

    let (feature, threshold, gain) = best?;

    let feat_col = &features[feature.index()];
    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = sample_indices
        .iter()
        .partition(|&&si| feat_col[si] < threshold);

    Some(SplitResult {
        feature,
        threshold,
        gain,
        left_indices,
        right_indices,
    })
}

/// Midpoint of two consecutive distinct values, nudged up to `hi` when
/// rounding would collapse it onto `lo`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid > lo { mid } else { hi }
}

/// Draw `k` distinct entries from `pool` and return them sorted ascending.
///
/// Partial Fisher-Yates: only the first `k` positions are shuffled, so the
/// generator is advanced exactly `min(k, pool.len())` times.
pub(crate) fn sample_features(pool: &[usize], k: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut order = pool.to_vec();
    let take = k.min(order.len());
    for i in 0..take {
        let j = rng.gen_range(i..order.len());
        order.swap(i, j);
    }
    order.truncate(take);
    order.sort_unstable();
    order
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{SplitCriterion, find_best_split, majority_class, sample_features};

    #[test]
    fn gini_pure() {
        let imp = SplitCriterion::Gini.impurity(&[10, 0, 0], 10);
        assert!((imp.value() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn gini_binary_balanced() {
        let imp = SplitCriterion::Gini.impurity(&[5, 5], 10);
        assert!((imp.value() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn gini_three_class_uniform() {
        let imp = SplitCriterion::Gini.impurity(&[100, 100, 100], 300);
        assert!((imp.value() - (1.0 - 3.0 * (1.0 / 3.0_f64).powi(2))).abs() < 1e-10);
    }

    #[test]
    fn entropy_pure() {
        let imp = SplitCriterion::Entropy.impurity(&[0, 7, 0], 7);
        assert!((imp.value() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn entropy_binary_balanced_is_one_bit() {
        let imp = SplitCriterion::Entropy.impurity(&[5, 5], 10);
        assert!((imp.value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn entropy_four_way_uniform_is_two_bits() {
        let imp = SplitCriterion::Entropy.impurity(&[2, 2, 2, 2], 8);
        assert!((imp.value() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn gain_is_non_negative_for_every_partition() {
        // Exhaustively split a small multiset and check both criteria.
        let labels = [0usize, 0, 1, 2, 1, 0, 2, 2];
        let n_classes = 3;
        for criterion in [SplitCriterion::Gini, SplitCriterion::Entropy] {
            for mask in 1u32..(1 << labels.len()) - 1 {
                let mut parent = vec![0; n_classes];
                let mut left = vec![0; n_classes];
                let mut right = vec![0; n_classes];
                for (i, &l) in labels.iter().enumerate() {
                    parent[l] += 1;
                    if mask & (1 << i) != 0 {
                        left[l] += 1;
                    } else {
                        right[l] += 1;
                    }
                }
                let gain = criterion.information_gain(&parent, &left, &right);
                assert!(gain >= -1e-12, "{criterion:?} mask {mask:b}: gain {gain}");
            }
        }
    }

    #[test]
    fn gain_zero_when_children_mirror_parent() {
        for criterion in [SplitCriterion::Gini, SplitCriterion::Entropy] {
            let gain = criterion.information_gain(&[4, 2], &[2, 1], &[2, 1]);
            assert!(gain.abs() < 1e-12, "{criterion:?}: {gain}");
        }
    }

    #[test]
    fn gain_of_perfect_split_equals_parent_impurity() {
        let gain = SplitCriterion::Gini.information_gain(&[3, 3], &[3, 0], &[0, 3]);
        assert!((gain - 0.5).abs() < 1e-12);
    }

    #[test]
    fn majority_ties_go_to_smallest_label() {
        assert_eq!(majority_class(&[0, 3, 3]), 1);
        assert_eq!(majority_class(&[2, 1, 2]), 0);
        assert_eq!(majority_class(&[0, 0, 5]), 2);
        assert_eq!(majority_class(&[]), 0);
    }

    #[test]
    fn separable_data_finds_midpoint() {
        let features = vec![vec![0.0, 1.0, 2.0, 3.0]];
        let labels = vec![0, 0, 1, 1];
        let sample_indices: Vec<usize> = (0..4).collect();

        let split = find_best_split(
            &features,
            &labels,
            &sample_indices,
            2,
            SplitCriterion::Gini,
            &[0],
        )
        .expect("should find a split");

        assert_eq!(split.feature.index(), 0);
        assert!((split.threshold - 1.5).abs() < f64::EPSILON);
        assert!((split.gain - 0.5).abs() < 1e-12);
        assert_eq!(split.left_indices, vec![0, 1]);
        assert_eq!(split.right_indices, vec![2, 3]);
    }

    #[test]
    fn equal_gain_prefers_lowest_feature() {
        // Both columns separate the classes perfectly.
        let features = vec![vec![1.0, 2.0, 8.0, 9.0], vec![10.0, 20.0, 80.0, 90.0]];
        let labels = vec![0, 0, 1, 1];
        let sample_indices: Vec<usize> = (0..4).collect();

        let split = find_best_split(
            &features,
            &labels,
            &sample_indices,
            2,
            SplitCriterion::Gini,
            &[0, 1],
        )
        .unwrap();
        assert_eq!(split.feature.index(), 0);
    }

    #[test]
    fn equal_gain_prefers_lowest_threshold() {
        // Labels 0,1,0: cutting at 1.5 and at 2.5 both isolate one sample
        // of a 2:1 mix and tie on gain.
        let features = vec![vec![1.0, 2.0, 3.0]];
        let labels = vec![1, 0, 1];
        let sample_indices: Vec<usize> = (0..3).collect();

        let split = find_best_split(
            &features,
            &labels,
            &sample_indices,
            2,
            SplitCriterion::Gini,
            &[0],
        )
        .unwrap();
        assert!((split.threshold - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn constant_feature_returns_none() {
        let features = vec![vec![5.0, 5.0, 5.0, 5.0]];
        let labels = vec![0, 0, 1, 1];
        let sample_indices: Vec<usize> = (0..4).collect();

        let result = find_best_split(
            &features,
            &labels,
            &sample_indices,
            2,
            SplitCriterion::Gini,
            &[0],
        );
        assert!(result.is_none());
    }

    #[test]
    fn feature_sample_is_sorted_distinct_subset() {
        let pool: Vec<usize> = (0..10).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let drawn = sample_features(&pool, 4, &mut rng);
        assert_eq!(drawn.len(), 4);
        assert!(drawn.windows(2).all(|w| w[0] < w[1]));
        assert!(drawn.iter().all(|f| pool.contains(f)));
    }

    #[test]
    fn feature_sample_of_whole_pool_is_pool() {
        let pool = vec![0, 1, 2];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(sample_features(&pool, 3, &mut rng), pool);
    }
}
