use crate::domain::{
    ApplicantForm, ApplicantInput, Category, DefaultOnFile, HomeOwnership, LoanGrade, LoanIntent,
};
use crate::error::ValidationError;

/// Validate raw applicant attributes.
/// Returns all validation errors at once (not just the first).
pub fn validate_applicant(form: &ApplicantForm) -> Result<ApplicantInput, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let age = collect(&mut errors, positive("person_age", form.age));
    let income = collect(&mut errors, positive("person_income", form.income));
    let emp_length = collect(&mut errors, non_negative("person_emp_length", form.emp_length));
    let loan_amount = collect(&mut errors, positive("loan_amnt", form.loan_amount));
    let interest_rate = collect(&mut errors, non_negative("loan_int_rate", form.interest_rate));
    let credit_hist_length = collect(
        &mut errors,
        non_negative("cb_person_cred_hist_length", form.credit_hist_length),
    );

    let home_ownership = collect(&mut errors, HomeOwnership::parse(&form.home_ownership));
    let loan_intent = collect(&mut errors, LoanIntent::parse(&form.loan_intent));
    let loan_grade = collect(&mut errors, LoanGrade::parse(&form.loan_grade));
    let default_on_file = collect(&mut errors, DefaultOnFile::parse(&form.default_on_file));

    match (
        age,
        income,
        emp_length,
        loan_amount,
        interest_rate,
        credit_hist_length,
        home_ownership,
        loan_intent,
        loan_grade,
        default_on_file,
    ) {
        (
            Some(age),
            Some(income),
            Some(emp_length),
            Some(loan_amount),
            Some(interest_rate),
            Some(credit_hist_length),
            Some(home_ownership),
            Some(loan_intent),
            Some(loan_grade),
            Some(default_on_file),
        ) if errors.is_empty() => Ok(ApplicantInput {
            age,
            income,
            home_ownership,
            emp_length,
            loan_amount,
            interest_rate,
            loan_intent,
            loan_grade,
            credit_hist_length,
            default_on_file,
        }),
        _ => Err(errors),
    }
}

fn collect<T>(errors: &mut Vec<ValidationError>, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(value)
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}
