//! CSV dataset reader with full input validation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::dataset::{ClassificationDataset, Dataset, RegressionDataset};
use crate::DataError;

/// Reads a headered CSV whose last column is the target.
///
/// Expected CSV format:
/// - Header row required: `feature1,feature2,...,featureN,target`
/// - Every feature cell must parse to a finite `f64`
/// - All rows must have as many columns as the header
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DataError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`DataError::CsvParse`] | Malformed CSV record |
/// | [`DataError::TooFewColumns`] | Header has fewer than two columns |
/// | [`DataError::EmptyFile`] | Zero data rows after header |
/// | [`DataError::InconsistentRowLength`] | Row has different column count than header |
/// | [`DataError::NonFiniteValue`] | Numeric cell is NaN, Inf, or unparseable |
pub struct DatasetReader {
    path: PathBuf,
}

/// Parsed CSV before the target column is interpreted.
struct RawTable {
    feature_names: Vec<String>,
    features: Vec<Vec<f64>>,
    targets: Vec<String>,
}

impl DatasetReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read a classification dataset.
    ///
    /// Distinct target strings are sorted and numbered from zero, so the
    /// label of a row is the position of its target in `class_names`.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read_classification(&self) -> Result<ClassificationDataset, DataError> {
        let raw = self.read_raw()?;

        let mut class_index: BTreeMap<&str, usize> =
            raw.targets.iter().map(|t| (t.as_str(), 0)).collect();
        for (index, slot) in class_index.values_mut().enumerate() {
            *slot = index;
        }
        let class_names: Vec<String> = class_index
            .keys()
            .map(|name| (*name).to_string())
            .collect();
        let labels: Vec<usize> = raw.targets.iter().map(|t| class_index[t.as_str()]).collect();

        info!(
            n_samples = labels.len(),
            n_features = raw.feature_names.len(),
            n_classes = class_names.len(),
            "classification dataset loaded"
        );
        ClassificationDataset::new(raw.feature_names, raw.features, labels, class_names)
    }

    /// Read a regression dataset; the target column must be numeric.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read_regression(&self) -> Result<RegressionDataset, DataError> {
        let raw = self.read_raw()?;
        let target_col = raw.feature_names.len();

        let targets = raw
            .targets
            .iter()
            .enumerate()
            .map(|(row_index, t)| self.parse_finite(t, row_index, target_col))
            .collect::<Result<Vec<f64>, _>>()?;

        info!(
            n_samples = targets.len(),
            n_features = raw.feature_names.len(),
            "regression dataset loaded"
        );
        Dataset::new(raw.feature_names, raw.features, targets)
    }

    fn read_raw(&self) -> Result<RawTable, DataError> {
        let file = std::fs::File::open(&self.path).map_err(|e| DataError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible so ragged rows surface as InconsistentRowLength
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?;
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");
        if expected_cols < 2 {
            return Err(DataError::TooFewColumns {
                path: self.path.clone(),
                got: expected_cols,
            });
        }
        let target_col = expected_cols - 1;
        let feature_names: Vec<String> = header.iter().take(target_col).map(String::from).collect();

        let mut features = Vec::new();
        let mut targets = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            if record.len() != expected_cols {
                return Err(DataError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let row = record
                .iter()
                .take(target_col)
                .enumerate()
                .map(|(col_index, raw)| self.parse_finite(raw, row_index, col_index))
                .collect::<Result<Vec<f64>, _>>()?;
            features.push(row);
            targets.push(record.get(target_col).unwrap_or_default().to_string());
        }

        if features.is_empty() {
            return Err(DataError::EmptyFile {
                path: self.path.clone(),
            });
        }

        Ok(RawTable {
            feature_names,
            features,
            targets,
        })
    }

    fn parse_finite(
        &self,
        raw: &str,
        row_index: usize,
        col_index: usize,
    ) -> Result<f64, DataError> {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(DataError::NonFiniteValue {
                path: self.path.clone(),
                row_index,
                col_index,
                raw: raw.to_string(),
            }),
        }
    }

    fn csv_error(&self, e: csv::Error) -> DataError {
        DataError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
