//! Session configuration.
//!
//! Values come from (highest priority first):
//! 1. CLI flags
//! 2. process environment
//! 3. a `.env` file in the working directory
//! 4. built-in defaults

use std::path::PathBuf;

use tracing::info;

use crate::cli::GlobalArgs;
use crate::data::{DataSource, DatasetStore};

pub const ENV_DATA_SOURCE: &str = "CRISK_DATA_SOURCE";
pub const ENV_MODEL_PATH: &str = "CRISK_MODEL_PATH";
pub const ENV_LOG: &str = "CRISK_LOG";

pub const DEFAULT_MODEL_PATH: &str = "assets/credit_risk_model.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_source: DataSource,
    pub model_path: PathBuf,
    /// `tracing` env-filter directive, if the user set one.
    pub log_filter: Option<String>,
    /// Replace the dataset with this many synthetic borrowers.
    pub synthetic: Option<usize>,
    pub seed: u64,
}

impl Settings {
    /// Resolve settings from CLI flags, the environment and `.env`.
    pub fn resolve(args: &GlobalArgs) -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(args, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an explicit environment lookup.
    pub fn from_lookup(args: &GlobalArgs, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_source = args
            .data
            .clone()
            .or_else(|| non_empty(ENV_DATA_SOURCE))
            .map(|raw| DataSource::parse(&raw))
            .unwrap_or_default();

        let model_path = args
            .model
            .clone()
            .or_else(|| non_empty(ENV_MODEL_PATH).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        Self {
            data_source,
            model_path,
            log_filter: non_empty(ENV_LOG),
            synthetic: args.synthetic,
            seed: args.seed,
        }
    }

    pub fn dataset_store(&self) -> DatasetStore {
        let store = match self.synthetic {
            Some(count) => DatasetStore::synthetic(count, self.seed),
            None => DatasetStore::new(self.data_source.clone()),
        };
        info!(source = %store.describe(), model = %self.model_path.display(), "configuration resolved");
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args() -> GlobalArgs {
        GlobalArgs {
            data: None,
            model: None,
            synthetic: None,
            seed: 42,
        }
    }

    #[test]
    fn defaults_without_env_or_flags() {
        let s = Settings::from_lookup(&args(), |_| None);
        assert_eq!(s.data_source, DataSource::default());
        assert_eq!(s.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(s.log_filter, None);
    }

    #[test]
    fn env_overrides_defaults_and_flags_override_env() {
        let env = HashMap::from([
            (ENV_DATA_SOURCE, "/tmp/from-env.csv"),
            (ENV_MODEL_PATH, "/tmp/env-model.json"),
            (ENV_LOG, "debug"),
        ]);
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());

        let s = Settings::from_lookup(&args(), lookup);
        assert_eq!(s.data_source, DataSource::File(PathBuf::from("/tmp/from-env.csv")));
        assert_eq!(s.model_path, PathBuf::from("/tmp/env-model.json"));
        assert_eq!(s.log_filter.as_deref(), Some("debug"));

        let flags = GlobalArgs {
            data: Some("https://example.org/x.csv".to_string()),
            model: Some(PathBuf::from("cli-model.json")),
            ..args()
        };
        let s = Settings::from_lookup(&flags, lookup);
        assert_eq!(s.data_source, DataSource::Url("https://example.org/x.csv".to_string()));
        assert_eq!(s.model_path, PathBuf::from("cli-model.json"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let s = Settings::from_lookup(&args(), |_| Some("  ".to_string()));
        assert_eq!(s.data_source, DataSource::default());
        assert_eq!(s.log_filter, None);
    }

    #[test]
    fn synthetic_flag_selects_generated_store() {
        let flags = GlobalArgs {
            synthetic: Some(25),
            ..args()
        };
        let store = Settings::from_lookup(&flags, |_| None).dataset_store();
        assert_eq!(store.load().unwrap().len(), 25);
    }
}
