//! Closed categorical domains for applicant attributes.
//!
//! Each enum lists exactly the categories the scoring model was trained on.
//! Raw strings from a form or a CSV cell are matched case-insensitively after
//! trimming; anything else is a `ValidationError::UnknownCategory`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A categorical attribute with a fixed, enumerable set of codes.
pub trait Category: Copy + Sized + 'static {
    /// Column / feature name the category is stored under.
    const FIELD: &'static str;
    /// Every member, in display order.
    const ALL: &'static [Self];

    /// Canonical code as it appears in the dataset and model artifact.
    fn code(self) -> &'static str;

    /// Parse a raw value into a member of the domain.
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownCategory {
                field: Self::FIELD,
                value: trimmed.to_string(),
                allowed: Self::ALL
                    .iter()
                    .map(|c| c.code())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HomeOwnership {
    Rent,
    Own,
    Mortgage,
    Other,
}

impl Category for HomeOwnership {
    const FIELD: &'static str = "person_home_ownership";
    const ALL: &'static [Self] = &[Self::Rent, Self::Own, Self::Mortgage, Self::Other];

    fn code(self) -> &'static str {
        match self {
            Self::Rent => "RENT",
            Self::Own => "OWN",
            Self::Mortgage => "MORTGAGE",
            Self::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanIntent {
    Personal,
    Education,
    Medical,
    Venture,
    HomeImprovement,
    DebtConsolidation,
}

impl Category for LoanIntent {
    const FIELD: &'static str = "loan_intent";
    const ALL: &'static [Self] = &[
        Self::Personal,
        Self::Education,
        Self::Medical,
        Self::Venture,
        Self::HomeImprovement,
        Self::DebtConsolidation,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Education => "EDUCATION",
            Self::Medical => "MEDICAL",
            Self::Venture => "VENTURE",
            Self::HomeImprovement => "HOMEIMPROVEMENT",
            Self::DebtConsolidation => "DEBTCONSOLIDATION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanGrade {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Category for LoanGrade {
    const FIELD: &'static str = "loan_grade";
    const ALL: &'static [Self] = &[
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
    ];

    fn code(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
        }
    }
}

/// Historical default indicator from the credit bureau (`Y` / `N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefaultOnFile {
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl Category for DefaultOnFile {
    const FIELD: &'static str = "cb_person_default_on_file";
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn code(self) -> &'static str {
        match self {
            Self::Yes => "Y",
            Self::No => "N",
        }
    }
}

/// Debt-to-income risk bucket of `loan_percent_income`.
///
/// Intervals are lower-exclusive, upper-inclusive:
/// `(0, 0.2]`, `(0.2, 0.4]`, `(0.4, 0.6]`, `(0.6, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DtiBand {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl DtiBand {
    /// Upper (inclusive) edge of each band, in band order.
    pub const UPPER_EDGES: [f64; 4] = [0.2, 0.4, 0.6, 1.0];

    /// Strict bucketing: `None` outside `(0, 1]` (and for NaN).
    pub fn bucket(ratio: f64) -> Option<Self> {
        if !(ratio > 0.0) {
            return None;
        }
        Self::ALL
            .iter()
            .zip(Self::UPPER_EDGES)
            .find(|(_, upper)| ratio <= *upper)
            .map(|(band, _)| *band)
    }

    /// Bucketing used for model input: ratios above 1 clamp into `VeryHigh`.
    ///
    /// Returns `None` only for non-positive or NaN ratios, which validated
    /// input cannot produce.
    pub fn bucket_clamped(ratio: f64) -> Option<Self> {
        if ratio > 1.0 {
            return Some(Self::VeryHigh);
        }
        Self::bucket(ratio)
    }
}

impl Category for DtiBand {
    const FIELD: &'static str = "dti_band";
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    fn code(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}
