//! Standardized logistic-regression classifier loaded from a JSON artifact.
//!
//! Artifact layout:
//!
//! ```text
//! {
//!   "format": "credit-risk/logistic-v1",
//!   "feature_names": ["person_age", ..., "dti_band"],
//!   "numeric": { "person_age": { "mean": 27.7, "scale": 6.3, "coef": -0.05 }, ... },
//!   "categorical": { "loan_grade": { "A": -0.9, ..., "G": 2.0 }, ... },
//!   "intercept": -1.6,
//!   "threshold": 0.5
//! }
//! ```
//!
//! The score is `intercept + Σ coef_i * (x_i - mean_i) / scale_i + Σ w[feature][category]`,
//! mapped through the logistic function. The keys of each categorical map are
//! the training domain of that feature.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::domain::{FeatureKind, FeatureValue, ModelInputRow};
use crate::error::ModelError;
use crate::models::classifier::{Classifier, DEFAULT_THRESHOLD, Prediction};

pub const LOGISTIC_FORMAT: &str = "credit-risk/logistic-v1";

/// The artifact shipped in `assets/`, compiled into the binary.
pub const BUNDLED_ARTIFACT: &str = include_str!("../../assets/credit_risk_model.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericParam {
    pub mean: f64,
    pub scale: f64,
    pub coef: f64,
}

/// On-disk form of the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub format: String,
    pub feature_names: Vec<String>,
    pub numeric: BTreeMap<String, NumericParam>,
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// A validated logistic model, with parameters laid out in schema order.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    feature_names: Vec<String>,
    mean: DVector<f64>,
    scale: DVector<f64>,
    coef: DVector<f64>,
    /// `(feature, category -> weight)` in schema order.
    categorical: Vec<(String, HashMap<String, f64>)>,
    intercept: f64,
    threshold: f64,
}

impl LogisticModel {
    /// Load and validate an artifact from disk.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: LogisticArtifact = serde_json::from_reader(BufReader::new(file))?;
        Self::from_artifact(artifact)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: LogisticArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    /// The compiled-in artifact, used when the default model path is absent.
    pub fn bundled() -> Result<Self, ModelError> {
        Self::from_json(BUNDLED_ARTIFACT)
    }

    /// Check the artifact against `ModelInputRow`'s schema and resolve its parameters.
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, ModelError> {
        if artifact.format != LOGISTIC_FORMAT {
            return Err(ModelError::Format(artifact.format));
        }

        let expected = ModelInputRow::FEATURE_NAMES;
        if artifact.feature_names.len() != expected.len() {
            return Err(ModelError::FeatureCount {
                expected: expected.len(),
                found: artifact.feature_names.len(),
            });
        }
        for (position, (want, got)) in expected.iter().zip(&artifact.feature_names).enumerate() {
            if *want != got.as_str() {
                return Err(ModelError::SchemaMismatch {
                    position,
                    expected: (*want).to_string(),
                    found: got.clone(),
                });
            }
        }

        let mut mean = Vec::new();
        let mut scale = Vec::new();
        let mut coef = Vec::new();
        let mut categorical = Vec::new();

        for (name, kind) in expected.iter().zip(ModelInputRow::FEATURE_KINDS) {
            match kind {
                FeatureKind::Numeric => {
                    let p = artifact
                        .numeric
                        .get(*name)
                        .ok_or_else(|| ModelError::MissingFeature((*name).to_string()))?;
                    let usable = p.mean.is_finite()
                        && p.coef.is_finite()
                        && p.scale.is_finite()
                        && p.scale > 0.0;
                    if !usable {
                        return Err(ModelError::BadParameter((*name).to_string()));
                    }
                    mean.push(p.mean);
                    scale.push(p.scale);
                    coef.push(p.coef);
                }
                FeatureKind::Categorical => {
                    let weights = artifact
                        .categorical
                        .get(*name)
                        .filter(|w| !w.is_empty())
                        .ok_or_else(|| ModelError::MissingFeature((*name).to_string()))?;
                    if weights.values().any(|w| !w.is_finite()) {
                        return Err(ModelError::BadParameter((*name).to_string()));
                    }
                    let weights = weights.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    categorical.push(((*name).to_string(), weights));
                }
            }
        }

        if !artifact.intercept.is_finite() {
            return Err(ModelError::BadParameter("intercept".to_string()));
        }
        if !(artifact.threshold > 0.0 && artifact.threshold < 1.0) {
            return Err(ModelError::BadParameter("threshold".to_string()));
        }

        Ok(Self {
            feature_names: artifact.feature_names,
            mean: DVector::from_vec(mean),
            scale: DVector::from_vec(scale),
            coef: DVector::from_vec(coef),
            categorical,
            intercept: artifact.intercept,
            threshold: artifact.threshold,
        })
    }

    /// Linear score (log-odds of default) for one row.
    pub fn decision_function(&self, row: &ModelInputRow) -> Result<f64, ModelError> {
        let mut numeric = Vec::with_capacity(self.coef.len());
        let mut cat_idx = 0usize;
        let mut z = self.intercept;

        for (name, value) in row.fields() {
            match value {
                FeatureValue::Numeric(x) => numeric.push(x),
                FeatureValue::Category(code) => {
                    let (_, weights) = &self.categorical[cat_idx];
                    cat_idx += 1;
                    z += weights
                        .get(code)
                        .copied()
                        .ok_or_else(|| ModelError::MissingFeature(format!("{name}={code}")))?;
                }
            }
        }

        let x = DVector::from_vec(numeric);
        let standardized = (x - &self.mean).component_div(&self.scale);
        z += standardized.dot(&self.coef);
        Ok(z)
    }
}

impl Classifier for LogisticModel {
    fn feature_names(&self) -> Vec<&str> {
        self.feature_names.iter().map(String::as_str).collect()
    }

    fn knows_category(&self, feature: &str, category: &str) -> bool {
        self.categorical
            .iter()
            .find(|(name, _)| name == feature)
            .is_some_and(|(_, weights)| weights.contains_key(category))
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn predict(&self, row: &ModelInputRow) -> Result<Prediction, ModelError> {
        let z = self.decision_function(row)?;
        let probability = sigmoid(z);
        if !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::BadProbability(probability));
        }
        Ok(Prediction {
            label: u8::from(probability >= self.threshold),
            probability,
        })
    }
}

/// Logistic function, stable for large `|z|`.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DefaultOnFile, DtiBand, HomeOwnership, LoanGrade, LoanIntent};

    /// Artifact whose only non-zero weight is on `loan_grade`.
    fn grade_only_artifact() -> LogisticArtifact {
        let mut numeric = BTreeMap::new();
        let mut categorical = BTreeMap::new();
        for (name, kind) in ModelInputRow::FEATURE_NAMES.iter().zip(ModelInputRow::FEATURE_KINDS) {
            match kind {
                FeatureKind::Numeric => {
                    numeric.insert(
                        (*name).to_string(),
                        NumericParam { mean: 0.0, scale: 1.0, coef: 0.0 },
                    );
                }
                FeatureKind::Categorical => {
                    categorical.insert((*name).to_string(), BTreeMap::new());
                }
            }
        }
        let domains: [(&str, &[&str]); 5] = [
            ("person_home_ownership", &["RENT", "OWN", "MORTGAGE", "OTHER"]),
            ("loan_intent", &["PERSONAL", "EDUCATION", "MEDICAL", "VENTURE", "HOMEIMPROVEMENT", "DEBTCONSOLIDATION"]),
            ("loan_grade", &["A", "B", "C", "D", "E", "F", "G"]),
            ("cb_person_default_on_file", &["Y", "N"]),
            ("dti_band", &["Low", "Medium", "High", "Very High"]),
        ];
        for (feature, codes) in domains {
            let map = categorical.get_mut(feature).unwrap();
            for code in codes {
                let w = if feature == "loan_grade" && *code == "G" { 3.0 } else { 0.0 };
                map.insert((*code).to_string(), w);
            }
        }
        LogisticArtifact {
            format: LOGISTIC_FORMAT.to_string(),
            feature_names: ModelInputRow::FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            numeric,
            categorical,
            intercept: -1.0,
            threshold: 0.5,
        }
    }

    fn row(grade: LoanGrade) -> ModelInputRow {
        ModelInputRow {
            person_age: 30.0,
            person_income: 50_000.0,
            person_home_ownership: HomeOwnership::Rent,
            person_emp_length: 5.0,
            loan_amnt: 20_000.0,
            loan_int_rate: 10.0,
            loan_intent: LoanIntent::Personal,
            loan_grade: grade,
            cb_person_cred_hist_length: 5.0,
            cb_person_default_on_file: DefaultOnFile::No,
            loan_percent_income: 0.4,
            emp_length_missing: 0,
            income_stability: 50_000.0 / 6.0,
            dti_band: DtiBand::Medium,
        }
    }

    #[test]
    fn sigmoid_is_bounded_and_symmetric() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-15);
        assert!(sigmoid(1_000.0) <= 1.0);
        assert!(sigmoid(-1_000.0) >= 0.0);
    }

    #[test]
    fn predicts_from_categorical_weights() {
        let model = LogisticModel::from_artifact(grade_only_artifact()).unwrap();

        let low = model.predict(&row(LoanGrade::A)).unwrap();
        assert!((low.probability - sigmoid(-1.0)).abs() < 1e-12);
        assert_eq!(low.label, 0);

        let high = model.predict(&row(LoanGrade::G)).unwrap();
        assert!((high.probability - sigmoid(2.0)).abs() < 1e-12);
        assert_eq!(high.label, 1);
    }

    #[test]
    fn numeric_features_are_standardized() {
        let mut artifact = grade_only_artifact();
        artifact.numeric.insert(
            "loan_int_rate".to_string(),
            NumericParam { mean: 8.0, scale: 4.0, coef: 2.0 },
        );
        let model = LogisticModel::from_artifact(artifact).unwrap();
        // (10 - 8) / 4 * 2 = 1.0 on top of the -1.0 intercept.
        let z = model.decision_function(&row(LoanGrade::A)).unwrap();
        assert!(z.abs() < 1e-12);
    }

    #[test]
    fn rejects_reordered_schema() {
        let mut artifact = grade_only_artifact();
        artifact.feature_names.swap(0, 1);
        match LogisticModel::from_artifact(artifact).unwrap_err() {
            ModelError::SchemaMismatch { position, expected, found } => {
                assert_eq!(position, 0);
                assert_eq!(expected, "person_age");
                assert_eq!(found, "person_income");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut artifact = grade_only_artifact();
        artifact.format = "sklearn-pickle".to_string();
        assert!(matches!(LogisticModel::from_artifact(artifact), Err(ModelError::Format(_))));

        let mut artifact = grade_only_artifact();
        artifact.numeric.get_mut("person_age").unwrap().scale = 0.0;
        assert!(matches!(LogisticModel::from_artifact(artifact), Err(ModelError::BadParameter(_))));

        let mut artifact = grade_only_artifact();
        artifact.categorical.remove("dti_band");
        assert!(matches!(LogisticModel::from_artifact(artifact), Err(ModelError::MissingFeature(_))));

        let mut artifact = grade_only_artifact();
        artifact.feature_names.pop();
        assert!(matches!(
            LogisticModel::from_artifact(artifact),
            Err(ModelError::FeatureCount { expected: 14, found: 13 })
        ));
    }

    #[test]
    fn knows_training_domain() {
        let mut artifact = grade_only_artifact();
        artifact.categorical.get_mut("person_home_ownership").unwrap().remove("OTHER");
        let model = LogisticModel::from_artifact(artifact).unwrap();
        assert!(model.knows_category("person_home_ownership", "RENT"));
        assert!(!model.knows_category("person_home_ownership", "OTHER"));
        assert!(!model.knows_category("no_such_feature", "RENT"));

        let err = model
            .predict(&ModelInputRow {
                person_home_ownership: HomeOwnership::Other,
                ..row(LoanGrade::A)
            })
            .unwrap_err();
        assert!(matches!(err, ModelError::MissingFeature(_)));
    }

    #[test]
    fn threshold_defaults_when_absent() {
        let mut value = serde_json::to_value(grade_only_artifact()).unwrap();
        value.as_object_mut().unwrap().remove("threshold");
        let model = LogisticModel::from_json(&value.to_string()).unwrap();
        assert_eq!(model.threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn bundled_artifact_loads() {
        let model = LogisticModel::bundled().unwrap();
        assert_eq!(model.feature_names(), ModelInputRow::FEATURE_NAMES.to_vec());
    }
}
