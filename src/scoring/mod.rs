//! Risk scoring: validate an applicant, derive features, invoke the classifier.

pub mod engine;
pub mod validation;

pub use engine::{ScoreError, ScoringEngine};
pub use validation::validate_applicant;
