//! Column selectors for the analytics layer.
//!
//! These mirror the dataset's numeric and categorical column sets so front-ends
//! can only offer selections that exist.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum NumericColumn {
    PersonAge,
    PersonIncome,
    PersonEmpLength,
    LoanAmnt,
    LoanIntRate,
    LoanStatus,
    LoanPercentIncome,
    CbPersonCredHistLength,
    EmpLengthMissing,
    IncomeStability,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 10] = [
        NumericColumn::PersonAge,
        NumericColumn::PersonIncome,
        NumericColumn::PersonEmpLength,
        NumericColumn::LoanAmnt,
        NumericColumn::LoanIntRate,
        NumericColumn::LoanStatus,
        NumericColumn::LoanPercentIncome,
        NumericColumn::CbPersonCredHistLength,
        NumericColumn::EmpLengthMissing,
        NumericColumn::IncomeStability,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::PersonAge => "person_age",
            NumericColumn::PersonIncome => "person_income",
            NumericColumn::PersonEmpLength => "person_emp_length",
            NumericColumn::LoanAmnt => "loan_amnt",
            NumericColumn::LoanIntRate => "loan_int_rate",
            NumericColumn::LoanStatus => "loan_status",
            NumericColumn::LoanPercentIncome => "loan_percent_income",
            NumericColumn::CbPersonCredHistLength => "cb_person_cred_hist_length",
            NumericColumn::EmpLengthMissing => "emp_length_missing",
            NumericColumn::IncomeStability => "income_stability",
        }
    }

    /// Cycle to the next column (TUI selectors).
    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum CategoricalColumn {
    PersonHomeOwnership,
    LoanIntent,
    LoanGrade,
    CbPersonDefaultOnFile,
    DtiBand,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 5] = [
        CategoricalColumn::PersonHomeOwnership,
        CategoricalColumn::LoanIntent,
        CategoricalColumn::LoanGrade,
        CategoricalColumn::CbPersonDefaultOnFile,
        CategoricalColumn::DtiBand,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoricalColumn::PersonHomeOwnership => "person_home_ownership",
            CategoricalColumn::LoanIntent => "loan_intent",
            CategoricalColumn::LoanGrade => "loan_grade",
            CategoricalColumn::CbPersonDefaultOnFile => "cb_person_default_on_file",
            CategoricalColumn::DtiBand => "dti_band",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, -1)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], cur: T, step: isize) -> T {
    let n = all.len() as isize;
    let idx = all.iter().position(|c| *c == cur).unwrap_or(0) as isize;
    all[(idx + step).rem_euclid(n) as usize]
}
