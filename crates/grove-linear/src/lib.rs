//! Gradient-descent linear and logistic regression.
//!
//! Both models start from zero weights and take full-batch gradient steps
//! for a fixed number of iterations, logging the loss as they go.

mod descent;
mod error;
mod linear;
mod logistic;

pub use descent::sigmoid;
pub use error::LinearError;
pub use linear::LinearRegression;
pub use logistic::LogisticRegression;
