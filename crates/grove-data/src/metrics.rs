//! Evaluation metrics: accuracy, mean squared error, confusion matrix.

use std::fmt;

use crate::DataError;

fn check_lengths(expected: usize, got: usize) -> Result<(), DataError> {
    if expected != got {
        return Err(DataError::LengthMismatch { expected, got });
    }
    if expected == 0 {
        return Err(DataError::EmptyInput);
    }
    Ok(())
}

/// Fraction of predictions equal to the true label.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DataError::LengthMismatch`] | Slices differ in length |
/// | [`DataError::EmptyInput`] | Both slices are empty |
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> Result<f64, DataError> {
    check_lengths(y_true.len(), y_pred.len())?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Mean of the squared differences between targets and predictions.
///
/// # Errors
///
/// Same as [`accuracy`].
pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64, DataError> {
    check_lengths(y_true.len(), y_pred.len())?;
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    Ok(sum / y_true.len() as f64)
}

/// A confusion matrix for multi-class classification.
///
/// Entry `matrix[true_class][predicted_class]` counts how many samples
/// with true label `true_class` were predicted as `predicted_class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    matrix: Vec<Vec<usize>>,
}

/// Per-class precision, recall, and F1 score.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    /// The class index.
    pub class: usize,
    /// TP / (TP + FP), or 0.0 when the class is never predicted.
    pub precision: f64,
    /// TP / (TP + FN), or 0.0 when the class never occurs.
    pub recall: f64,
    /// Harmonic mean of precision and recall, or 0.0 when both are zero.
    pub f1: f64,
    /// Number of true samples in this class.
    pub support: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl ConfusionMatrix {
    /// Build a confusion matrix from true and predicted labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DataError::LengthMismatch`] | Slices differ in length |
    /// | [`DataError::EmptyInput`] | Zero labels provided |
    /// | [`DataError::LabelOutOfRange`] | A label is `>= n_classes` |
    pub fn from_labels(
        y_true: &[usize],
        y_pred: &[usize],
        n_classes: usize,
    ) -> Result<Self, DataError> {
        check_lengths(y_true.len(), y_pred.len())?;
        let mut matrix = vec![vec![0usize; n_classes]; n_classes];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            let label = t.max(p);
            if label >= n_classes {
                return Err(DataError::LabelOutOfRange { label, n_classes });
            }
            matrix[t][p] += 1;
        }
        Ok(Self { matrix })
    }

    /// Proportion of samples on the diagonal.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let correct: usize = (0..self.n_classes()).map(|i| self.matrix[i][i]).sum();
        ratio(correct, self.total())
    }

    /// Per-class precision, recall, F1, and support.
    #[must_use]
    pub fn class_metrics(&self) -> Vec<ClassMetrics> {
        (0..self.n_classes())
            .map(|c| {
                let tp = self.matrix[c][c];
                let predicted: usize = self.matrix.iter().map(|row| row[c]).sum();
                let support: usize = self.matrix[c].iter().sum();
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    class: c,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect()
    }

    /// Unweighted mean of the per-class F1 scores.
    #[must_use]
    pub fn macro_f1(&self) -> f64 {
        let metrics = self.class_metrics();
        if metrics.is_empty() {
            return 0.0;
        }
        metrics.iter().map(|m| m.f1).sum::<f64>() / metrics.len() as f64
    }

    /// Return the underlying matrix rows.
    #[must_use]
    pub fn as_rows(&self) -> &[Vec<usize>] {
        &self.matrix
    }

    /// Return the number of classes.
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.matrix.len()
    }

    /// Return the number of samples counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8}", "")?;
        for j in 0..self.n_classes() {
            write!(f, " pred_{j:>3}")?;
        }
        writeln!(f)?;

        for (i, row) in self.matrix.iter().enumerate() {
            write!(f, "true_{i:>3}")?;
            for val in row {
                write!(f, " {val:>8}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_counts_matches() {
        let acc = accuracy(&[0, 1, 1, 2], &[0, 1, 2, 2]).unwrap();
        assert!((acc - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn accuracy_rejects_bad_input() {
        assert!(matches!(
            accuracy(&[0, 1], &[0]),
            Err(DataError::LengthMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(accuracy(&[], &[]), Err(DataError::EmptyInput)));
    }

    #[test]
    fn mse_known_value() {
        let mse = mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 4.0, 0.0]).unwrap();
        assert!((mse - 13.0 / 3.0).abs() < 1e-12);
        assert!(mean_squared_error(&[], &[]).is_err());
    }

    #[test]
    fn perfect_predictions() {
        let labels = [0, 0, 1, 1, 2, 2];
        let cm = ConfusionMatrix::from_labels(&labels, &labels, 3).unwrap();
        assert!((cm.accuracy() - 1.0).abs() < f64::EPSILON);
        assert!((cm.macro_f1() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn known_confusion_matrix() {
        // each class: two hits, one miss, one false alarm
        let y_true = [0, 0, 0, 1, 1, 1, 2, 2, 2];
        let y_pred = [0, 0, 1, 1, 1, 2, 2, 2, 0];
        let cm = ConfusionMatrix::from_labels(&y_true, &y_pred, 3).unwrap();
        let metrics = cm.class_metrics();
        assert!((metrics[0].precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics[0].recall - 2.0 / 3.0).abs() < 1e-10);
        assert_eq!(metrics[0].support, 3);
        assert!((cm.accuracy() - 6.0 / 9.0).abs() < 1e-10);
        assert_eq!(cm.total(), 9);
    }

    #[test]
    fn rows_are_true_labels() {
        let cm = ConfusionMatrix::from_labels(&[0, 0, 1, 1], &[0, 1, 0, 1], 2).unwrap();
        assert_eq!(cm.as_rows(), &[vec![1, 1], vec![1, 1]]);
    }

    #[test]
    fn absent_class_scores_zero() {
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 1], 3).unwrap();
        let metrics = cm.class_metrics();
        assert_eq!(metrics[2].support, 0);
        assert_eq!(metrics[2].f1, 0.0);
    }

    #[test]
    fn out_of_range_label_rejected() {
        let err = ConfusionMatrix::from_labels(&[0, 1], &[0, 3], 2).unwrap_err();
        assert!(matches!(err, DataError::LabelOutOfRange { label: 3, n_classes: 2 }));
    }

    #[test]
    fn display_has_headers() {
        let cm = ConfusionMatrix::from_labels(&[0, 1], &[0, 1], 2).unwrap();
        let text = cm.to_string();
        assert!(text.contains("pred_"));
        assert!(text.contains("true_"));
    }
}
