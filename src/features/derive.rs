//! Engineered features from raw applicant attributes.
//!
//! Everything here is a pure function of its arguments: no I/O, no clock, no
//! randomness. Repeated calls with the same input return bit-identical output.

use crate::domain::{ApplicantInput, BorrowerRecord, Category, DtiBand, EngineeredFeatures};
use crate::error::ValidationError;

/// Derive the engineered features of a validated applicant.
pub fn derive(input: &ApplicantInput) -> Result<EngineeredFeatures, ValidationError> {
    derive_from_parts(input.income, input.emp_length, input.loan_amount)
}

/// Derive engineered features from the three attributes they depend on.
///
/// Preconditions: `income > 0`, `loan_amount > 0`, `emp_length >= 0`, all finite.
/// Violations are reported rather than producing NaN or infinite features.
pub fn derive_from_parts(
    income: f64,
    emp_length: f64,
    loan_amount: f64,
) -> Result<EngineeredFeatures, ValidationError> {
    check_positive("person_income", income)?;
    check_positive("loan_amnt", loan_amount)?;
    if !emp_length.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "person_emp_length",
        });
    }
    if emp_length < 0.0 {
        return Err(ValidationError::Negative {
            field: "person_emp_length",
            value: emp_length,
        });
    }

    let loan_percent_income = loan_amount / income;
    let dti_band = DtiBand::bucket_clamped(loan_percent_income).ok_or(ValidationError::NonPositive {
        field: "loan_percent_income",
        value: loan_percent_income,
    })?;

    Ok(EngineeredFeatures {
        loan_percent_income,
        emp_length_missing: u8::from(emp_length == 0.0),
        income_stability: income / (emp_length + 1.0),
        dti_band,
    })
}

/// Fill any blank engineered cells of a dataset row from its raw cells.
///
/// Stored values are left untouched. A blank employment length counts as
/// missing (`emp_length_missing = 1`, stability over one year). The stored
/// `dti_band` uses strict bucketing, so ratios outside `(0, 1]` stay blank as
/// they do in the source data.
pub fn fill_record_features(record: &mut BorrowerRecord) {
    let (Some(income), Some(loan_amount)) = (record.income, record.loan_amount) else {
        return;
    };
    if !(income > 0.0 && loan_amount > 0.0) {
        return;
    }

    let ratio = loan_amount / income;
    let emp_length = record.emp_length.unwrap_or(0.0).max(0.0);

    if record.loan_percent_income.is_none() {
        record.loan_percent_income = Some(ratio);
    }
    if record.emp_length_missing.is_none() {
        record.emp_length_missing = Some(if emp_length == 0.0 { 1.0 } else { 0.0 });
    }
    if record.income_stability.is_none() {
        record.income_stability = Some(income / (emp_length + 1.0));
    }
    if record.dti_band.is_none() {
        let stored = record.loan_percent_income.unwrap_or(ratio);
        record.dti_band = DtiBand::bucket(stored).map(|b| b.code().to_string());
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(())
}
