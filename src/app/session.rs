//! One process run: the dataset store plus the scoring engine.
//!
//! CLI handlers and the TUI both go through `Session`, so dataset loading,
//! model loading and scoring happen one way regardless of the front-end.

use std::path::Path;

use tracing::{info, warn};

use crate::analytics::Aggregator;
use crate::config::{DEFAULT_MODEL_PATH, Settings};
use crate::data::{Dataset, DatasetStore};
use crate::domain::{ApplicantForm, ScoredApplicant};
use crate::error::AppError;
use crate::models::LogisticModel;
use crate::scoring::ScoringEngine;

pub struct Session {
    store: DatasetStore,
    /// A model that failed to load only disables scoring.
    engine: Result<ScoringEngine<LogisticModel>, AppError>,
}

impl Session {
    /// Build a session from resolved settings. The dataset is fetched on first use.
    pub fn open(settings: &Settings) -> Self {
        let store = settings.dataset_store();
        let engine = load_engine(&settings.model_path);
        Self::new(store, engine)
    }

    pub fn new(store: DatasetStore, engine: Result<ScoringEngine<LogisticModel>, AppError>) -> Self {
        if let Err(e) = &engine {
            warn!(error = %e, "scoring disabled");
        }
        Self { store, engine }
    }

    pub fn dataset(&self) -> Result<&Dataset, AppError> {
        self.store.load()
    }

    pub fn aggregator(&self) -> Result<Aggregator<'_>, AppError> {
        Ok(Aggregator::new(self.dataset()?.records()))
    }

    pub fn source_description(&self) -> String {
        self.store.describe()
    }

    pub fn engine(&self) -> Result<&ScoringEngine<LogisticModel>, AppError> {
        self.engine.as_ref().map_err(Clone::clone)
    }

    pub fn score(&self, form: &ApplicantForm) -> Result<ScoredApplicant, AppError> {
        let scored = self.engine()?.score_form(form)?;
        info!(
            probability = scored.probability,
            decision = scored.decision.headline(),
            "applicant scored"
        );
        Ok(scored)
    }
}

/// Load the classifier at `path`. The default path falls back to the
/// compiled-in artifact when the file is not present.
pub fn load_engine(path: &Path) -> Result<ScoringEngine<LogisticModel>, AppError> {
    let model = if path == Path::new(DEFAULT_MODEL_PATH) && !path.exists() {
        info!("model file not found, using bundled artifact");
        LogisticModel::bundled()?
    } else {
        LogisticModel::from_path(path)?
    };
    let engine = ScoringEngine::new(model)?;
    info!(path = %path.display(), "model loaded");
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Decision;
    use crate::error::{EXIT_INPUT, EXIT_RUNTIME};

    fn session_with(engine: Result<ScoringEngine<LogisticModel>, AppError>) -> Session {
        Session::new(DatasetStore::synthetic(200, 7), engine)
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn store_and_engine_can_be_shared_across_threads() {
        assert_send_sync::<DatasetStore>();
        assert_send_sync::<ScoringEngine<LogisticModel>>();
        assert_send_sync::<Session>();
    }

    #[test]
    fn scores_with_the_bundled_model() {
        let engine = ScoringEngine::new(LogisticModel::bundled().unwrap()).unwrap();
        let session = session_with(Ok(engine));
        let scored = session.score(&ApplicantForm::default()).unwrap();
        assert!((0.0..=1.0).contains(&scored.probability));
        assert_eq!(scored.decision == Decision::Default, scored.probability >= scored.threshold);
    }

    #[test]
    fn missing_model_disables_scoring_only() {
        let engine = load_engine(Path::new("does/not/exist.json"));
        let session = session_with(engine);

        let err = session.score(&ApplicantForm::default()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_RUNTIME);

        let kpis = session.aggregator().unwrap().kpis();
        assert_eq!(kpis.records, 200);
    }

    #[test]
    fn invalid_form_is_an_input_error() {
        let engine = ScoringEngine::new(LogisticModel::bundled().unwrap()).unwrap();
        let session = session_with(Ok(engine));
        let form = ApplicantForm {
            income: 0.0,
            ..ApplicantForm::default()
        };
        let err = session.score(&form).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(err.to_string().contains("person_income"));
    }
}
