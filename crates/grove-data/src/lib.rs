//! Dataset loading, splitting, synthetic generation and evaluation metrics.

mod dataset;
mod error;
mod metrics;
mod reader;
mod synthetic;

pub use dataset::{ClassificationDataset, Dataset, RegressionDataset};
pub use error::DataError;
pub use metrics::{ClassMetrics, ConfusionMatrix, accuracy, mean_squared_error};
pub use reader::DatasetReader;
pub use synthetic::{make_classification, make_regression};
