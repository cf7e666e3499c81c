//! Synthetic borrower generation.
//!
//! Produces a dataset shaped like the public credit-risk table (same columns,
//! similar marginals, blanks in employment length and interest rate) so the
//! dashboard and tests can run offline. Output depends only on `(count, seed)`.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{LogNormal, Normal};

use crate::domain::{BorrowerRecord, Category, HomeOwnership, LoanGrade, LoanIntent};
use crate::error::{AppError, EXIT_INPUT, EXIT_RUNTIME};
use crate::features::fill_record_features;

/// Share of rows with a blank employment length.
const EMP_LENGTH_BLANK_RATE: f64 = 0.03;
/// Share of rows with a blank interest rate.
const INT_RATE_BLANK_RATE: f64 = 0.10;

const HOME_WEIGHTS: [(HomeOwnership, f64); 4] = [
    (HomeOwnership::Rent, 0.50),
    (HomeOwnership::Mortgage, 0.41),
    (HomeOwnership::Own, 0.08),
    (HomeOwnership::Other, 0.01),
];

/// Grade mix and the typical interest rate (%) charged at each grade.
const GRADE_PROFILE: [(LoanGrade, f64, f64); 7] = [
    (LoanGrade::A, 0.33, 7.3),
    (LoanGrade::B, 0.32, 11.0),
    (LoanGrade::C, 0.20, 13.5),
    (LoanGrade::D, 0.11, 15.4),
    (LoanGrade::E, 0.03, 17.0),
    (LoanGrade::F, 0.007, 18.6),
    (LoanGrade::G, 0.003, 20.3),
];

/// Generate `count` borrowers from a seeded RNG.
pub fn generate_borrowers(count: usize, seed: u64) -> Result<Vec<BorrowerRecord>, AppError> {
    if count == 0 {
        return Err(AppError::new(EXIT_INPUT, "Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let dists = Distributions::new()?;

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(draw_borrower(&mut rng, &dists));
    }
    Ok(records)
}

struct Distributions {
    age: Normal<f64>,
    income: LogNormal<f64>,
    emp_length: Normal<f64>,
    loan_amount: LogNormal<f64>,
    rate_noise: Normal<f64>,
    history_noise: Normal<f64>,
    home: WeightedIndex<f64>,
    grade: WeightedIndex<f64>,
}

impl Distributions {
    fn new() -> Result<Self, AppError> {
        Ok(Self {
            age: Normal::new(27.7, 6.3).map_err(dist_err)?,
            income: LogNormal::new(55_000f64.ln(), 0.55).map_err(dist_err)?,
            emp_length: Normal::new(4.8, 4.1).map_err(dist_err)?,
            loan_amount: LogNormal::new(8_000f64.ln(), 0.6).map_err(dist_err)?,
            rate_noise: Normal::new(0.0, 1.0).map_err(dist_err)?,
            history_noise: Normal::new(2.0, 1.5).map_err(dist_err)?,
            home: WeightedIndex::new(HOME_WEIGHTS.iter().map(|(_, w)| *w))
                .map_err(dist_err)?,
            grade: WeightedIndex::new(GRADE_PROFILE.iter().map(|(_, w, _)| *w))
                .map_err(dist_err)?,
        })
    }
}

fn dist_err(e: impl std::fmt::Display) -> AppError {
    AppError::new(EXIT_RUNTIME, format!("Sample distribution error: {e}"))
}

fn draw_borrower(rng: &mut StdRng, d: &Distributions) -> BorrowerRecord {
    let age = d.age.sample(rng).clamp(20.0, 80.0).round();
    let income = d.income.sample(rng).max(4_000.0).round();
    let emp_length = d.emp_length.sample(rng).clamp(0.0, 40.0).round();

    let home = HOME_WEIGHTS[d.home.sample(rng)].0;
    let intent = LoanIntent::ALL[rng.gen_range(0..LoanIntent::ALL.len())];
    let grade_idx = d.grade.sample(rng);
    let (grade, _, base_rate) = GRADE_PROFILE[grade_idx];

    let loan_amount = (d.loan_amount.sample(rng).clamp(500.0, 35_000.0) / 25.0).round() * 25.0;
    let interest_rate = ((base_rate + d.rate_noise.sample(rng)).clamp(5.4, 23.2) * 100.0).round() / 100.0;
    let history = ((age - 20.0) * 0.6 + d.history_noise.sample(rng))
        .clamp(2.0, 30.0)
        .round();

    let prior_default = rng.gen_bool(0.10 + 0.05 * grade_idx as f64);
    let status = draw_status(
        rng,
        loan_amount / income,
        grade_idx,
        home == HomeOwnership::Rent,
        prior_default,
    );

    let emp_blank = rng.gen_bool(EMP_LENGTH_BLANK_RATE);
    let rate_blank = rng.gen_bool(INT_RATE_BLANK_RATE);

    let mut record = BorrowerRecord {
        age: Some(age),
        income: Some(income),
        home_ownership: Some(home.code().to_string()),
        emp_length: (!emp_blank).then_some(emp_length),
        loan_amount: Some(loan_amount),
        interest_rate: (!rate_blank).then_some(interest_rate),
        loan_intent: Some(intent.code().to_string()),
        loan_grade: Some(grade.code().to_string()),
        credit_hist_length: Some(history),
        default_on_file: Some(if prior_default { "Y" } else { "N" }.to_string()),
        loan_status: status,
        ..BorrowerRecord::default()
    };
    fill_record_features(&mut record);
    record
}

/// Default outcome from a simple logistic risk curve.
fn draw_status(rng: &mut StdRng, ratio: f64, grade_idx: usize, renter: bool, prior_default: bool) -> u8 {
    let z = -3.0
        + 4.5 * ratio
        + 0.35 * grade_idx as f64
        + if renter { 0.6 } else { 0.0 }
        + if prior_default { 0.5 } else { 0.0 };
    let p = 1.0 / (1.0 + (-z).exp());
    u8::from(rng.r#gen::<f64>() < p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DefaultOnFile, DtiBand};

    #[test]
    fn same_seed_same_sample() {
        let a = generate_borrowers(200, 42).unwrap();
        let b = generate_borrowers(200, 42).unwrap();
        assert_eq!(a, b);

        let c = generate_borrowers(200, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = generate_borrowers(0, 1).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn rows_stay_in_trained_domains() {
        for r in generate_borrowers(500, 9).unwrap() {
            assert!(HomeOwnership::parse(r.home_ownership.as_deref().unwrap()).is_ok());
            assert!(LoanIntent::parse(r.loan_intent.as_deref().unwrap()).is_ok());
            assert!(LoanGrade::parse(r.loan_grade.as_deref().unwrap()).is_ok());
            assert!(DefaultOnFile::parse(r.default_on_file.as_deref().unwrap()).is_ok());
            if let Some(band) = r.dti_band.as_deref() {
                assert!(DtiBand::parse(band).is_ok());
            }

            let income = r.income.unwrap();
            let loan = r.loan_amount.unwrap();
            assert!(income > 0.0 && loan > 0.0);
            assert_eq!(r.loan_percent_income, Some(loan / income));
            assert!(r.income_stability.is_some());
            assert!(r.emp_length_missing.is_some());
        }
    }

    #[test]
    fn default_rate_is_plausible() {
        let sample = generate_borrowers(2_000, 5).unwrap();
        let defaults = sample.iter().filter(|r| r.loan_status == 1).count();
        let rate = defaults as f64 / sample.len() as f64;
        assert!((0.05..0.5).contains(&rate), "rate={rate}");
    }
}
