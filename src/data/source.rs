//! Where the borrower CSV comes from: a public URL or a local file.

use std::fmt;
use std::path::PathBuf;

use reqwest::blocking::Client;
use tracing::info;

use crate::error::{AppError, EXIT_INPUT, EXIT_RUNTIME};

/// Public copy of the credit-risk dataset the dashboard was built on.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/Anurag-Patil-Git/Credit-Risk-Prediction-ML-Project/main/credit_risk_dataset.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched; anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(raw.to_string())
        } else {
            DataSource::File(PathBuf::from(raw))
        }
    }

    /// Read the whole CSV body. One attempt, no retry.
    pub fn fetch(&self) -> Result<String, AppError> {
        match self {
            DataSource::Url(url) => fetch_url(url),
            DataSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                AppError::new(
                    EXIT_INPUT,
                    format!("Failed to open dataset '{}': {e}", path.display()),
                )
            }),
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Url(DEFAULT_DATA_URL.to_string())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn fetch_url(url: &str) -> Result<String, AppError> {
    info!(url, "fetching dataset");
    let resp = Client::new()
        .get(url)
        .send()
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Dataset request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::new(
            EXIT_RUNTIME,
            format!("Dataset request failed with status {}.", resp.status()),
        ));
    }

    resp.text()
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to read dataset response: {e}")))
}
