//! Scoring engine.
//!
//! Pipeline per request:
//! validate -> derive features -> assemble `ModelInputRow` -> domain check ->
//! classifier -> `ScoredApplicant`.
//!
//! The engine owns its classifier and nothing else; every request is
//! independent, so a shared reference can serve any number of callers.

use thiserror::Error;
use tracing::debug;

use crate::domain::{
    ApplicantForm, ApplicantInput, Decision, FeatureValue, ModelInputRow, ScoredApplicant,
};
use crate::error::{AppError, EXIT_INPUT, ModelError, ValidationError};
use crate::features::derive;
use crate::models::Classifier;
use crate::scoring::validation::validate_applicant;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl From<ValidationError> for ScoreError {
    fn from(err: ValidationError) -> Self {
        ScoreError::Invalid(vec![err])
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::Invalid(errors) => AppError::new(
                EXIT_INPUT,
                format!("Invalid applicant input: {}", join_errors(&errors)),
            ),
            ScoreError::Model(e) => e.into(),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct ScoringEngine<C: Classifier> {
    classifier: C,
}

impl<C: Classifier> ScoringEngine<C> {
    /// Wrap a classifier, refusing one whose feature schema differs from `ModelInputRow`.
    pub fn new(classifier: C) -> Result<Self, ModelError> {
        let declared = classifier.feature_names();
        let expected = ModelInputRow::FEATURE_NAMES;
        if declared.len() != expected.len() {
            return Err(ModelError::FeatureCount {
                expected: expected.len(),
                found: declared.len(),
            });
        }
        for (position, (want, got)) in expected.iter().zip(&declared).enumerate() {
            if want != got {
                return Err(ModelError::SchemaMismatch {
                    position,
                    expected: (*want).to_string(),
                    found: (*got).to_string(),
                });
            }
        }
        Ok(Self { classifier })
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Score raw form input (validation included).
    pub fn score_form(&self, form: &ApplicantForm) -> Result<ScoredApplicant, ScoreError> {
        let input = validate_applicant(form).map_err(ScoreError::Invalid)?;
        self.score(&input)
    }

    /// Score an already-typed applicant.
    pub fn score(&self, input: &ApplicantInput) -> Result<ScoredApplicant, ScoreError> {
        let features = derive(input)?;
        let row = ModelInputRow::assemble(input, &features);
        self.check_domains(&row)?;

        let prediction = self.classifier.predict(&row)?;
        let probability = prediction.probability;
        if !(probability.is_finite() && (0.0..=1.0).contains(&probability)) {
            return Err(ModelError::BadProbability(probability).into());
        }

        let decision = Decision::from_label(prediction.label);
        debug!(
            probability,
            decision = ?decision,
            dti_band = ?features.dti_band,
            "scored applicant"
        );

        Ok(ScoredApplicant {
            input: *input,
            features,
            decision,
            probability,
            threshold: self.classifier.threshold(),
        })
    }

    /// Reject categories the classifier never saw during training.
    fn check_domains(&self, row: &ModelInputRow) -> Result<(), ValidationError> {
        for (name, value) in row.fields() {
            if let FeatureValue::Category(code) = value {
                if !self.classifier.knows_category(name, code) {
                    return Err(ValidationError::UnseenByModel {
                        field: name,
                        value: code.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DtiBand, HomeOwnership, LoanGrade};
    use crate::models::{LogisticModel, Prediction};

    fn bundled_engine() -> ScoringEngine<LogisticModel> {
        ScoringEngine::new(LogisticModel::bundled().unwrap()).unwrap()
    }

    /// Returns a fixed probability and records nothing.
    struct FixedClassifier {
        names: Vec<&'static str>,
        probability: f64,
        refuse_home: Option<&'static str>,
    }

    impl FixedClassifier {
        fn new(probability: f64) -> Self {
            Self {
                names: ModelInputRow::FEATURE_NAMES.to_vec(),
                probability,
                refuse_home: None,
            }
        }
    }

    impl Classifier for FixedClassifier {
        fn feature_names(&self) -> Vec<&str> {
            self.names.clone()
        }

        fn knows_category(&self, feature: &str, category: &str) -> bool {
            !(feature == "person_home_ownership" && Some(category) == self.refuse_home)
        }

        fn predict(&self, _row: &ModelInputRow) -> Result<Prediction, ModelError> {
            Ok(Prediction {
                label: u8::from(self.probability >= self.threshold()),
                probability: self.probability,
            })
        }
    }

    #[test]
    fn worked_example_features_reach_the_result() {
        let engine = ScoringEngine::new(FixedClassifier::new(0.7)).unwrap();
        let form = ApplicantForm {
            emp_length: 0.0,
            ..ApplicantForm::default()
        };
        let scored = engine.score_form(&form).unwrap();
        assert_eq!(scored.features.loan_percent_income, 0.4);
        assert_eq!(scored.features.dti_band, DtiBand::Medium);
        assert_eq!(scored.features.emp_length_missing, 1);
        assert_eq!(scored.features.income_stability, 50_000.0);
        assert_eq!(scored.decision, Decision::Default);
        assert_eq!(scored.probability, 0.7);
    }

    #[test]
    fn invalid_input_never_reaches_classifier() {
        let engine = ScoringEngine::new(FixedClassifier::new(0.1)).unwrap();
        let form = ApplicantForm {
            income: -1.0,
            home_ownership: "CASTLE".to_string(),
            ..ApplicantForm::default()
        };
        match engine.score_form(&form).unwrap_err() {
            ScoreError::Invalid(errors) => {
                assert_eq!(errors.len(), 2);
                let msg = ScoreError::Invalid(errors).to_string();
                assert!(msg.contains("person_income"));
                assert!(msg.contains("person_home_ownership"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unseen_category_is_rejected() {
        let mut classifier = FixedClassifier::new(0.1);
        classifier.refuse_home = Some("OTHER");
        let engine = ScoringEngine::new(classifier).unwrap();
        let form = ApplicantForm {
            home_ownership: "other".to_string(),
            ..ApplicantForm::default()
        };
        match engine.score_form(&form).unwrap_err() {
            ScoreError::Invalid(errors) => assert_eq!(
                errors,
                vec![ValidationError::UnseenByModel {
                    field: "person_home_ownership",
                    value: "OTHER".to_string(),
                }]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn schema_mismatch_is_fatal() {
        let mut classifier = FixedClassifier::new(0.5);
        classifier.names.swap(12, 13);
        assert!(matches!(
            ScoringEngine::new(classifier),
            Err(ModelError::SchemaMismatch { position: 12, .. })
        ));
    }

    #[test]
    fn out_of_range_probability_is_an_error() {
        let engine = ScoringEngine::new(FixedClassifier::new(1.5)).unwrap();
        assert!(matches!(
            engine.score_form(&ApplicantForm::default()),
            Err(ScoreError::Model(ModelError::BadProbability(_)))
        ));
    }

    #[test]
    fn bundled_model_is_deterministic_and_bounded() {
        let engine = bundled_engine();
        let form = ApplicantForm::default();
        let a = engine.score_form(&form).unwrap();
        let b = engine.score_form(&form).unwrap();
        assert_eq!(a.probability.to_bits(), b.probability.to_bits());
        assert_eq!(a.decision, b.decision);
        assert!((0.0..=1.0).contains(&a.probability));
        assert_eq!(a.decision == Decision::Default, a.probability >= a.threshold);
    }

    #[test]
    fn bundled_model_separates_clear_cases() {
        let engine = bundled_engine();

        let safe = ApplicantForm {
            age: 40.0,
            income: 120_000.0,
            home_ownership: "MORTGAGE".to_string(),
            emp_length: 10.0,
            loan_amount: 5_000.0,
            interest_rate: 7.0,
            loan_grade: "A".to_string(),
            credit_hist_length: 10.0,
            default_on_file: "N".to_string(),
            ..ApplicantForm::default()
        };
        let scored = engine.score_form(&safe).unwrap();
        assert_eq!(scored.decision, Decision::NoDefault);
        assert!(scored.probability < 0.1);

        let risky = ApplicantForm {
            age: 23.0,
            income: 30_000.0,
            emp_length: 0.0,
            loan_amount: 40_000.0,
            interest_rate: 22.0,
            loan_grade: "G".to_string(),
            credit_hist_length: 2.0,
            ..ApplicantForm::default()
        };
        let scored = engine.score_form(&risky).unwrap();
        assert_eq!(scored.features.dti_band, DtiBand::VeryHigh);
        assert_eq!(scored.decision, Decision::Default);
        assert!(scored.probability > 0.9);
        assert_eq!(scored.input.home_ownership, HomeOwnership::Rent);
        assert_eq!(scored.input.loan_grade, LoanGrade::G);
    }
}
