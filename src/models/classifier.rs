//! Invocation contract for a pre-fitted binary classifier.

use crate::domain::ModelInputRow;
use crate::error::ModelError;

/// Default decision threshold on P(Default).
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Raw classifier output for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class: 1 = default, 0 = no default.
    pub label: u8,
    /// Probability of class 1.
    pub probability: f64,
}

/// A loaded, read-only binary classifier.
///
/// Implementations must be deterministic: the same row always yields the same
/// prediction. They hold no per-request state, so one instance can be shared
/// across threads.
pub trait Classifier: Send + Sync {
    /// Feature names the classifier was fitted with, in order.
    fn feature_names(&self) -> Vec<&str>;

    /// Whether `category` was part of the training domain of `feature`.
    fn knows_category(&self, feature: &str, category: &str) -> bool;

    /// Probability cut-off above which the positive class is predicted.
    fn threshold(&self) -> f64 {
        DEFAULT_THRESHOLD
    }

    fn predict(&self, row: &ModelInputRow) -> Result<Prediction, ModelError>;
}
