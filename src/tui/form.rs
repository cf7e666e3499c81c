//! Applicant form editing for the "Model Prediction" page.
//!
//! Numeric fields step within the dashboard's slider ranges with ←/→ and can
//! also be typed in; typed values are passed through unchanged so validation
//! sees exactly what the analyst entered. Categorical fields cycle through
//! their trained domain.

use crate::domain::{ApplicantForm, Category, DefaultOnFile, HomeOwnership, LoanGrade, LoanIntent};
use crate::report::fmt_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Income,
    Age,
    EmpLength,
    CreditHist,
    InterestRate,
    LoanAmount,
    HomeOwnership,
    LoanIntent,
    LoanGrade,
    PastDefault,
}

/// `(min, max, step)` for a numeric field.
type Range = (f64, f64, f64);

impl FormField {
    pub const ALL: [FormField; 10] = [
        FormField::Income,
        FormField::Age,
        FormField::EmpLength,
        FormField::CreditHist,
        FormField::InterestRate,
        FormField::LoanAmount,
        FormField::HomeOwnership,
        FormField::LoanIntent,
        FormField::LoanGrade,
        FormField::PastDefault,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Income => "Annual Income",
            FormField::Age => "Age",
            FormField::EmpLength => "Employment Length",
            FormField::CreditHist => "Credit History Length",
            FormField::InterestRate => "Interest Rate (%)",
            FormField::LoanAmount => "Loan Amount",
            FormField::HomeOwnership => "Home Ownership",
            FormField::LoanIntent => "Loan Intent",
            FormField::LoanGrade => "Loan Grade",
            FormField::PastDefault => "Past Default",
        }
    }

    fn range(self) -> Option<Range> {
        match self {
            FormField::Income => Some((1_000.0, 1_000_000.0, 1_000.0)),
            FormField::Age => Some((18.0, 75.0, 1.0)),
            FormField::EmpLength => Some((0.0, 40.0, 1.0)),
            FormField::CreditHist => Some((1.0, 40.0, 1.0)),
            FormField::InterestRate => Some((5.0, 35.0, 0.5)),
            FormField::LoanAmount => Some((500.0, 500_000.0, 500.0)),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.range().is_some()
    }

    fn numeric_mut(self, form: &mut ApplicantForm) -> Option<&mut f64> {
        match self {
            FormField::Income => Some(&mut form.income),
            FormField::Age => Some(&mut form.age),
            FormField::EmpLength => Some(&mut form.emp_length),
            FormField::CreditHist => Some(&mut form.credit_hist_length),
            FormField::InterestRate => Some(&mut form.interest_rate),
            FormField::LoanAmount => Some(&mut form.loan_amount),
            _ => None,
        }
    }

    pub fn numeric(self, form: &ApplicantForm) -> Option<f64> {
        match self {
            FormField::Income => Some(form.income),
            FormField::Age => Some(form.age),
            FormField::EmpLength => Some(form.emp_length),
            FormField::CreditHist => Some(form.credit_hist_length),
            FormField::InterestRate => Some(form.interest_rate),
            FormField::LoanAmount => Some(form.loan_amount),
            _ => None,
        }
    }

    pub fn display(self, form: &ApplicantForm) -> String {
        match self {
            FormField::Income => fmt_money(form.income),
            FormField::LoanAmount => fmt_money(form.loan_amount),
            FormField::InterestRate => format!("{:.1}", form.interest_rate),
            FormField::Age => format!("{}", form.age),
            FormField::EmpLength => format!("{}", form.emp_length),
            FormField::CreditHist => format!("{}", form.credit_hist_length),
            FormField::HomeOwnership => form.home_ownership.clone(),
            FormField::LoanIntent => form.loan_intent.clone(),
            FormField::LoanGrade => form.loan_grade.clone(),
            FormField::PastDefault => form.default_on_file.clone(),
        }
    }

    /// ←/→: step a numeric field within its range, or cycle a category.
    pub fn step(self, form: &mut ApplicantForm, delta: i32) {
        if let (Some((min, max, step)), Some(value)) = (self.range(), self.numeric_mut(form)) {
            let next = (*value + f64::from(delta) * step).clamp(min, max);
            *value = (next / step).round() * step;
            return;
        }
        match self {
            FormField::HomeOwnership => cycle_code::<HomeOwnership>(&mut form.home_ownership, delta),
            FormField::LoanIntent => cycle_code::<LoanIntent>(&mut form.loan_intent, delta),
            FormField::LoanGrade => cycle_code::<LoanGrade>(&mut form.loan_grade, delta),
            FormField::PastDefault => cycle_code::<DefaultOnFile>(&mut form.default_on_file, delta),
            _ => {}
        }
    }

    /// Set a typed value. Returns `false` for categorical fields.
    pub fn set_numeric(self, form: &mut ApplicantForm, value: f64) -> bool {
        match self.numeric_mut(form) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

fn cycle_code<C: Category>(current: &mut String, delta: i32) {
    let codes: Vec<&'static str> = C::ALL.iter().map(|c| c.code()).collect();
    let n = codes.len() as i32;
    let next = match codes.iter().position(|c| c.eq_ignore_ascii_case(current.trim())) {
        Some(idx) => (idx as i32 + delta).rem_euclid(n) as usize,
        None => 0,
    };
    *current = codes[next].to_string();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_steps_clamp_to_slider_range() {
        let mut form = ApplicantForm::default();
        FormField::Age.step(&mut form, 1);
        assert_eq!(form.age, 31.0);

        form.age = 75.0;
        FormField::Age.step(&mut form, 1);
        assert_eq!(form.age, 75.0);

        FormField::InterestRate.step(&mut form, -1);
        assert_eq!(form.interest_rate, 9.5);

        form.emp_length = 0.0;
        FormField::EmpLength.step(&mut form, -1);
        assert_eq!(form.emp_length, 0.0);
    }

    #[test]
    fn categories_cycle_through_domain() {
        let mut form = ApplicantForm::default();
        FormField::HomeOwnership.step(&mut form, 1);
        assert_eq!(form.home_ownership, "OWN");
        FormField::HomeOwnership.step(&mut form, -2);
        assert_eq!(form.home_ownership, "OTHER");

        FormField::PastDefault.step(&mut form, 1);
        assert_eq!(form.default_on_file, "N");

        form.loan_grade = "zz".to_string();
        FormField::LoanGrade.step(&mut form, 1);
        assert_eq!(form.loan_grade, "A");
    }

    #[test]
    fn typed_values_are_not_clamped() {
        let mut form = ApplicantForm::default();
        assert!(FormField::Income.set_numeric(&mut form, -5.0));
        assert_eq!(form.income, -5.0);
        assert!(!FormField::LoanGrade.set_numeric(&mut form, 1.0));
        assert_eq!(FormField::Income.display(&form), "-$5");
    }
}
