//! Out-of-bag (OOB) evaluation for Random Forest.

use crate::error::RfError;
use crate::split::majority_class;
use crate::tree::DecisionTree;

/// Out-of-bag evaluation result.
#[derive(Debug, Clone)]
pub struct OobScore {
    /// OOB accuracy (fraction of correctly predicted OOB samples).
    pub accuracy: f64,
    /// OOB confusion matrix: `confusion_matrix[true][predicted]`.
    pub confusion_matrix: Vec<Vec<usize>>,
    /// Number of samples that had at least one OOB tree.
    pub n_oob_samples: usize,
}

/// Compute out-of-bag predictions and accuracy.
///
/// For each sample, only trees whose bootstrap missed it vote (majority,
/// ties to the smallest label). Samples with no OOB tree are skipped.
pub(crate) fn compute_oob(
    trees: &[DecisionTree],
    features: &[Vec<f64>],
    labels: &[usize],
    n_classes: usize,
    oob_indices_per_tree: &[&[usize]],
) -> Result<OobScore, RfError> {
    let n_samples = features.len();

    let mut oob_votes: Vec<Vec<usize>> = vec![vec![0; n_classes]; n_samples];
    let mut has_oob = vec![false; n_samples];

    for (tree, oob_indices) in trees.iter().zip(oob_indices_per_tree) {
        for &sample_idx in *oob_indices {
            let pred = tree.predict_unchecked(&features[sample_idx]);
            oob_votes[sample_idx][pred] += 1;
            has_oob[sample_idx] = true;
        }
    }

    let n_oob_samples = has_oob.iter().filter(|&&h| h).count();
    if n_oob_samples == 0 {
        return Err(RfError::OobEvaluationFailed {
            reason: "no sample has any OOB tree".to_string(),
        });
    }

    let mut confusion = vec![vec![0usize; n_classes]; n_classes];
    let mut correct = 0usize;

    for (i, votes) in oob_votes.iter().enumerate() {
        if !has_oob[i] {
            continue;
        }
        let predicted = majority_class(votes);
        confusion[labels[i]][predicted] += 1;
        if predicted == labels[i] {
            correct += 1;
        }
    }

    Ok(OobScore {
        accuracy: correct as f64 / n_oob_samples as f64,
        confusion_matrix: confusion,
        n_oob_samples,
    })
}
