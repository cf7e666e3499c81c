//! Shared domain types.
//!
//! - raw and validated applicant attributes (`ApplicantForm`, `ApplicantInput`)
//! - derived features and the fixed model-input row (`EngineeredFeatures`, `ModelInputRow`)
//! - dataset rows (`BorrowerRecord`)
//! - scoring outputs (`Decision`, `ScoredApplicant`)

use serde::{Deserialize, Serialize};

use crate::domain::category::{
    Category, DefaultOnFile, DtiBand, HomeOwnership, LoanGrade, LoanIntent,
};
use crate::domain::columns::{CategoricalColumn, NumericColumn};
use crate::error::ValidationError;

/// Applicant attributes as typed by an analyst: numbers plus free-text categories.
///
/// Nothing here is trusted; `scoring::validate_applicant` turns it into an `ApplicantInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantForm {
    pub age: f64,
    pub income: f64,
    pub home_ownership: String,
    pub emp_length: f64,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub loan_intent: String,
    pub loan_grade: String,
    pub credit_hist_length: f64,
    pub default_on_file: String,
}

impl Default for ApplicantForm {
    fn default() -> Self {
        Self {
            age: 30.0,
            income: 50_000.0,
            home_ownership: HomeOwnership::Rent.code().to_string(),
            emp_length: 5.0,
            loan_amount: 20_000.0,
            interest_rate: 10.0,
            loan_intent: LoanIntent::Personal.code().to_string(),
            loan_grade: LoanGrade::A.code().to_string(),
            credit_hist_length: 5.0,
            default_on_file: DefaultOnFile::Yes.code().to_string(),
        }
    }
}

/// A validated applicant: every number checked, every category in its domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    pub age: f64,
    pub income: f64,
    pub home_ownership: HomeOwnership,
    pub emp_length: f64,
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub loan_intent: LoanIntent,
    pub loan_grade: LoanGrade,
    pub credit_hist_length: f64,
    pub default_on_file: DefaultOnFile,
}

/// Features computed from raw attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    pub loan_percent_income: f64,
    pub emp_length_missing: u8,
    pub income_stability: f64,
    pub dti_band: DtiBand,
}

/// Whether a model feature is a number or a category code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

/// One cell of the model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Category(&'static str),
}

/// The single row handed to the classifier.
///
/// Field order is fixed by `FEATURE_NAMES`; a model artifact must declare the
/// same names in the same order to be loadable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInputRow {
    pub person_age: f64,
    pub person_income: f64,
    pub person_home_ownership: HomeOwnership,
    pub person_emp_length: f64,
    pub loan_amnt: f64,
    pub loan_int_rate: f64,
    pub loan_intent: LoanIntent,
    pub loan_grade: LoanGrade,
    pub cb_person_cred_hist_length: f64,
    pub cb_person_default_on_file: DefaultOnFile,
    pub loan_percent_income: f64,
    pub emp_length_missing: u8,
    pub income_stability: f64,
    pub dti_band: DtiBand,
}

impl ModelInputRow {
    pub const FEATURE_NAMES: [&'static str; 14] = [
        "person_age",
        "person_income",
        "person_home_ownership",
        "person_emp_length",
        "loan_amnt",
        "loan_int_rate",
        "loan_intent",
        "loan_grade",
        "cb_person_cred_hist_length",
        "cb_person_default_on_file",
        "loan_percent_income",
        "emp_length_missing",
        "income_stability",
        "dti_band",
    ];

    /// Kind of each feature, aligned with `FEATURE_NAMES`.
    pub const FEATURE_KINDS: [FeatureKind; 14] = [
        FeatureKind::Numeric,
        FeatureKind::Numeric,
        FeatureKind::Categorical,
        FeatureKind::Numeric,
        FeatureKind::Numeric,
        FeatureKind::Numeric,
        FeatureKind::Categorical,
        FeatureKind::Categorical,
        FeatureKind::Numeric,
        FeatureKind::Categorical,
        FeatureKind::Numeric,
        FeatureKind::Numeric,
        FeatureKind::Numeric,
        FeatureKind::Categorical,
    ];

    pub fn assemble(input: &ApplicantInput, features: &EngineeredFeatures) -> Self {
        Self {
            person_age: input.age,
            person_income: input.income,
            person_home_ownership: input.home_ownership,
            person_emp_length: input.emp_length,
            loan_amnt: input.loan_amount,
            loan_int_rate: input.interest_rate,
            loan_intent: input.loan_intent,
            loan_grade: input.loan_grade,
            cb_person_cred_hist_length: input.credit_hist_length,
            cb_person_default_on_file: input.default_on_file,
            loan_percent_income: features.loan_percent_income,
            emp_length_missing: features.emp_length_missing,
            income_stability: features.income_stability,
            dti_band: features.dti_band,
        }
    }

    /// Cell values in `FEATURE_NAMES` order.
    pub fn values(&self) -> [FeatureValue; 14] {
        use FeatureValue::{Category as Cat, Numeric as Num};
        [
            Num(self.person_age),
            Num(self.person_income),
            Cat(self.person_home_ownership.code()),
            Num(self.person_emp_length),
            Num(self.loan_amnt),
            Num(self.loan_int_rate),
            Cat(self.loan_intent.code()),
            Cat(self.loan_grade.code()),
            Num(self.cb_person_cred_hist_length),
            Cat(self.cb_person_default_on_file.code()),
            Num(self.loan_percent_income),
            Num(f64::from(self.emp_length_missing)),
            Num(self.income_stability),
            Cat(self.dti_band.code()),
        ]
    }

    /// `(name, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> {
        Self::FEATURE_NAMES.into_iter().zip(self.values())
    }
}

/// One row of the borrower dataset, as loaded.
///
/// Numeric cells are optional because the public dataset has blanks (notably
/// `person_emp_length` and `loan_int_rate`). Categorical cells keep the raw
/// string so analytics can count whatever the file actually contains.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BorrowerRecord {
    pub age: Option<f64>,
    pub income: Option<f64>,
    pub home_ownership: Option<String>,
    pub emp_length: Option<f64>,
    pub loan_amount: Option<f64>,
    pub interest_rate: Option<f64>,
    pub loan_intent: Option<String>,
    pub loan_grade: Option<String>,
    pub credit_hist_length: Option<f64>,
    pub default_on_file: Option<String>,
    pub loan_percent_income: Option<f64>,
    pub emp_length_missing: Option<f64>,
    pub income_stability: Option<f64>,
    pub dti_band: Option<String>,
    /// Known outcome: 1 = defaulted, 0 = repaid.
    pub loan_status: u8,
}

impl BorrowerRecord {
    pub fn numeric(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::PersonAge => self.age,
            NumericColumn::PersonIncome => self.income,
            NumericColumn::PersonEmpLength => self.emp_length,
            NumericColumn::LoanAmnt => self.loan_amount,
            NumericColumn::LoanIntRate => self.interest_rate,
            NumericColumn::LoanStatus => Some(f64::from(self.loan_status)),
            NumericColumn::LoanPercentIncome => self.loan_percent_income,
            NumericColumn::CbPersonCredHistLength => self.credit_hist_length,
            NumericColumn::EmpLengthMissing => self.emp_length_missing,
            NumericColumn::IncomeStability => self.income_stability,
        }
    }

    pub fn categorical(&self, column: CategoricalColumn) -> Option<&str> {
        let value = match column {
            CategoricalColumn::PersonHomeOwnership => &self.home_ownership,
            CategoricalColumn::LoanIntent => &self.loan_intent,
            CategoricalColumn::LoanGrade => &self.loan_grade,
            CategoricalColumn::CbPersonDefaultOnFile => &self.default_on_file,
            CategoricalColumn::DtiBand => &self.dti_band,
        };
        value.as_deref()
    }

    /// Rebuild the raw applicant attributes of this borrower.
    ///
    /// Fails when a raw cell is blank or a category is outside the model's domain.
    pub fn applicant_input(&self) -> Result<ApplicantInput, ValidationError> {
        fn req(value: Option<f64>, field: &'static str) -> Result<f64, ValidationError> {
            value.ok_or(ValidationError::Missing { field })
        }
        fn cat<T: Category>(value: &Option<String>) -> Result<T, ValidationError> {
            let raw = value
                .as_deref()
                .ok_or(ValidationError::Missing { field: T::FIELD })?;
            T::parse(raw)
        }

        Ok(ApplicantInput {
            age: req(self.age, "person_age")?,
            income: req(self.income, "person_income")?,
            home_ownership: cat(&self.home_ownership)?,
            emp_length: req(self.emp_length, "person_emp_length")?,
            loan_amount: req(self.loan_amount, "loan_amnt")?,
            interest_rate: req(self.interest_rate, "loan_int_rate")?,
            loan_intent: cat(&self.loan_intent)?,
            loan_grade: cat(&self.loan_grade)?,
            credit_hist_length: req(self.credit_hist_length, "cb_person_cred_hist_length")?,
            default_on_file: cat(&self.default_on_file)?,
        })
    }
}

/// Classifier verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Default,
    NoDefault,
}

impl Decision {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Decision::Default
        } else {
            Decision::NoDefault
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Decision::Default => 1,
            Decision::NoDefault => 0,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Decision::Default => "High Risk of Default",
            Decision::NoDefault => "Low Risk Borrower",
        }
    }
}

/// A scored applicant. Built per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredApplicant {
    pub input: ApplicantInput,
    pub features: EngineeredFeatures,
    pub decision: Decision,
    /// Probability of the positive (`Default`) class.
    pub probability: f64,
    /// Decision threshold the classifier applied.
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BorrowerRecord {
        BorrowerRecord {
            age: Some(25.0),
            income: Some(40_000.0),
            home_ownership: Some("RENT".to_string()),
            emp_length: Some(2.0),
            loan_amount: Some(8_000.0),
            interest_rate: Some(11.5),
            loan_intent: Some("EDUCATION".to_string()),
            loan_grade: Some("B".to_string()),
            credit_hist_length: Some(3.0),
            default_on_file: Some("N".to_string()),
            loan_percent_income: Some(0.2),
            emp_length_missing: Some(0.0),
            income_stability: Some(40_000.0 / 3.0),
            dti_band: Some("Low".to_string()),
            loan_status: 1,
        }
    }

    #[test]
    fn record_column_access() {
        let r = record();
        assert_eq!(r.numeric(NumericColumn::LoanAmnt), Some(8_000.0));
        assert_eq!(r.numeric(NumericColumn::LoanStatus), Some(1.0));
        assert_eq!(r.categorical(CategoricalColumn::LoanGrade), Some("B"));
    }

    #[test]
    fn record_to_applicant_input() {
        let input = record().applicant_input().unwrap();
        assert_eq!(input.loan_intent, LoanIntent::Education);
        assert_eq!(input.default_on_file, DefaultOnFile::No);

        let mut missing = record();
        missing.emp_length = None;
        assert_eq!(
            missing.applicant_input().unwrap_err(),
            ValidationError::Missing { field: "person_emp_length" }
        );
    }

    #[test]
    fn model_row_values_follow_schema_order() {
        let input = record().applicant_input().unwrap();
        let features = EngineeredFeatures {
            loan_percent_income: 0.2,
            emp_length_missing: 0,
            income_stability: 1.0,
            dti_band: DtiBand::Low,
        };
        let row = ModelInputRow::assemble(&input, &features);
        let fields: Vec<_> = row.fields().collect();
        assert_eq!(fields.len(), 14);
        assert_eq!(fields[0], ("person_age", FeatureValue::Numeric(25.0)));
        assert_eq!(fields[2], ("person_home_ownership", FeatureValue::Category("RENT")));
        assert_eq!(fields[13], ("dti_band", FeatureValue::Category("Low")));

        for (value, kind) in row.values().iter().zip(ModelInputRow::FEATURE_KINDS) {
            let matches = matches!(
                (value, kind),
                (FeatureValue::Numeric(_), FeatureKind::Numeric)
                    | (FeatureValue::Category(_), FeatureKind::Categorical)
            );
            assert!(matches);
        }
    }

    #[test]
    fn decision_labels() {
        assert_eq!(Decision::from_label(1), Decision::Default);
        assert_eq!(Decision::from_label(0), Decision::NoDefault);
        assert_eq!(Decision::Default.label(), 1);
    }
}
