//! Feature importance aggregation across trees.

/// A ranked feature with its column index, importance score, and rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFeature {
    /// Zero-based feature column.
    pub feature: usize,
    /// Normalized importance score (sums to 1.0 across all features).
    pub importance: f64,
    /// 1-based rank (1 = most important).
    pub rank: usize,
}

/// Aggregate per-tree feature importances into ranked features.
///
/// Sums importances across all trees, normalizes to sum to 1.0, sorts
/// descending by importance (ties keep column order), and assigns 1-based ranks.
pub(crate) fn aggregate_importances(
    per_tree: &[Vec<f64>],
    n_features: usize,
) -> Vec<RankedFeature> {
    if per_tree.is_empty() || n_features == 0 {
        return vec![];
    }

    let mut totals = vec![0.0f64; n_features];
    for tree_imp in per_tree {
        for (total, &val) in totals.iter_mut().zip(tree_imp) {
            *total += val;
        }
    }

    let sum: f64 = totals.iter().sum();
    if sum > 0.0 {
        totals.iter_mut().for_each(|v| *v /= sum);
    }

    let mut features: Vec<RankedFeature> = totals
        .into_iter()
        .enumerate()
        .map(|(feature, importance)| RankedFeature {
            feature,
            importance,
            rank: 0,
        })
        .collect();

    features.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    for (i, feat) in features.iter_mut().enumerate() {
        feat.rank = i + 1;
    }

    features
}
