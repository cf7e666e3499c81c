//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - closed categorical domains (`HomeOwnership`, `LoanIntent`, `LoanGrade`, `DtiBand`, ...)
//! - analytics column selectors (`NumericColumn`, `CategoricalColumn`)
//! - applicant, dataset and scoring types (`ApplicantInput`, `BorrowerRecord`, `ScoredApplicant`)

pub mod category;
pub mod columns;
pub mod types;

pub use category::*;
pub use columns::*;
pub use types::*;
