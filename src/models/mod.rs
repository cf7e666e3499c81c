//! Classifier seam and the bundled logistic-regression implementation.
//!
//! The scoring engine only talks to `Classifier`; the artifact format lives
//! behind it so another model family can be dropped in without touching the
//! feature pipeline.

pub mod classifier;
pub mod logistic;

pub use classifier::*;
pub use logistic::*;
