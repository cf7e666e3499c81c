//! Dataset Store: the borrower table, loaded once per session.
//!
//! Loading is all-or-nothing. A failed fetch or parse leaves the store empty
//! and returns the error; the next `load()` call tries again only because the
//! caller asked. A successful load is cached and every later call returns the
//! same records.
//!
//! Ingest policy:
//! - index-artifact columns (`Unnamed...`, or a blank first header) are dropped
//! - blank numeric and categorical cells stay `None`
//! - rows with an unparsable number or a blank/invalid target are skipped and
//!   reported as `RowError`s
//! - engineered columns absent from the header are derived by the feature
//!   deriver; blank cells of a column the file does carry stay `None`

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::data::sample::generate_borrowers;
use crate::data::source::DataSource;
use crate::domain::BorrowerRecord;
use crate::error::{AppError, EXIT_INPUT, EXIT_NO_DATA};
use crate::features::fill_record_features;

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "person_age",
    "person_income",
    "person_home_ownership",
    "person_emp_length",
    "loan_amnt",
    "loan_int_rate",
    "loan_intent",
    "loan_grade",
    "cb_person_cred_hist_length",
    "cb_person_default_on_file",
    "loan_status",
];

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// What happened during a load.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub origin: String,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Columns kept, in file order.
    pub columns: Vec<String>,
    /// Index-artifact columns that were stripped.
    pub dropped_columns: Vec<String>,
    pub row_errors: Vec<RowError>,
    pub loaded_at: DateTime<Utc>,
}

/// The loaded borrower table. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<BorrowerRecord>,
    summary: LoadSummary,
}

impl Dataset {
    pub fn records(&self) -> &[BorrowerRecord] {
        &self.records
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Source(DataSource),
    Synthetic { count: usize, seed: u64 },
}

/// Lazily-loaded, cached dataset.
#[derive(Debug)]
pub struct DatasetStore {
    origin: Origin,
    cell: OnceLock<Dataset>,
}

impl DatasetStore {
    pub fn new(source: DataSource) -> Self {
        Self {
            origin: Origin::Source(source),
            cell: OnceLock::new(),
        }
    }

    /// A store backed by `generate_borrowers(count, seed)` instead of a CSV.
    pub fn synthetic(count: usize, seed: u64) -> Self {
        Self {
            origin: Origin::Synthetic { count, seed },
            cell: OnceLock::new(),
        }
    }

    /// Load the dataset, or return the cached one.
    pub fn load(&self) -> Result<&Dataset, AppError> {
        if let Some(dataset) = self.cell.get() {
            return Ok(dataset);
        }
        let dataset = match &self.origin {
            Origin::Source(source) => {
                let body = source.fetch()?;
                parse_dataset(&body, &source.to_string())?
            }
            Origin::Synthetic { count, seed } => synthetic_dataset(*count, *seed)?,
        };
        Ok(self.cell.get_or_init(|| dataset))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn describe(&self) -> String {
        match &self.origin {
            Origin::Source(source) => source.to_string(),
            Origin::Synthetic { count, seed } => format!("synthetic (n={count}, seed={seed})"),
        }
    }
}

fn synthetic_dataset(count: usize, seed: u64) -> Result<Dataset, AppError> {
    let records = generate_borrowers(count, seed)?;
    let summary = LoadSummary {
        origin: format!("synthetic (n={count}, seed={seed})"),
        rows_read: records.len(),
        rows_used: records.len(),
        columns: all_columns(),
        dropped_columns: Vec::new(),
        row_errors: Vec::new(),
        loaded_at: Utc::now(),
    };
    info!(rows = records.len(), seed, "generated synthetic dataset");
    Ok(Dataset { records, summary })
}

fn all_columns() -> Vec<String> {
    let mut columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    for engineered in ENGINEERED_COLUMNS {
        columns.push(engineered.to_string());
    }
    columns
}

const ENGINEERED_COLUMNS: [&str; 4] = [
    "loan_percent_income",
    "emp_length_missing",
    "income_stability",
    "dti_band",
];

/// Parse a borrower CSV body.
pub fn parse_dataset(body: &str, origin: &str) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read dataset headers: {e}")))?
        .clone();

    let layout = HeaderLayout::from_headers(&headers);
    if !layout.dropped.is_empty() {
        info!(columns = ?layout.dropped, "dropped index columns");
    }
    for column in REQUIRED_COLUMNS {
        if !layout.index.contains_key(column) {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Dataset is missing required column: `{column}`"),
            ));
        }
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Data starts on line 2.
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&row, &layout.index) {
            Ok(mut record) => {
                fill_absent_columns(&mut record, &layout.absent_engineered);
                records.push(record);
            }
            Err(message) => {
                debug!(line, %message, "skipping row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    if !row_errors.is_empty() {
        warn!(skipped = row_errors.len(), "some dataset rows were skipped");
    }

    if records.is_empty() {
        return Err(AppError::new(EXIT_NO_DATA, "No valid rows in dataset."));
    }

    let summary = LoadSummary {
        origin: origin.to_string(),
        rows_read,
        rows_used: records.len(),
        columns: layout.kept,
        dropped_columns: layout.dropped,
        row_errors,
        loaded_at: Utc::now(),
    };
    info!(
        rows_read = summary.rows_read,
        rows_used = summary.rows_used,
        "dataset loaded"
    );

    Ok(Dataset { records, summary })
}

struct HeaderLayout {
    kept: Vec<String>,
    dropped: Vec<String>,
    index: HashMap<String, usize>,
    /// Engineered columns the file does not carry.
    absent_engineered: Vec<&'static str>,
}

impl HeaderLayout {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut kept = Vec::new();
        let mut dropped = Vec::new();
        let mut index = HashMap::new();
        for (idx, raw) in headers.iter().enumerate() {
            let name = raw.trim().trim_start_matches('\u{feff}');
            if is_index_artifact(idx, name) {
                dropped.push(name.to_string());
                continue;
            }
            kept.push(name.to_string());
            index.insert(name.to_ascii_lowercase(), idx);
        }
        let absent_engineered = ENGINEERED_COLUMNS
            .into_iter()
            .filter(|c| !index.contains_key(*c))
            .collect();
        Self {
            kept,
            dropped,
            index,
            absent_engineered,
        }
    }
}

/// `Unnamed: 0` style columns written by dataframe exports.
fn is_index_artifact(position: usize, name: &str) -> bool {
    name.starts_with("Unnamed") || (position == 0 && name.is_empty())
}

/// Derive the engineered columns listed in `absent`; other cells keep what the file holds.
fn fill_absent_columns(record: &mut BorrowerRecord, absent: &[&str]) {
    if absent.is_empty() {
        return;
    }
    let mut derived = record.clone();
    fill_record_features(&mut derived);
    for column in absent {
        match *column {
            "loan_percent_income" => record.loan_percent_income = derived.loan_percent_income,
            "emp_length_missing" => record.emp_length_missing = derived.emp_length_missing,
            "income_stability" => record.income_stability = derived.income_stability,
            "dti_band" => record.dti_band = derived.dti_band.take(),
            _ => {}
        }
    }
}

fn parse_row(record: &StringRecord, index: &HashMap<String, usize>) -> Result<BorrowerRecord, String> {
    let num = |column: &str| parse_opt_f64(get_optional(record, index, column), column);
    let cat = |column: &str| get_optional(record, index, column).map(str::to_string);

    Ok(BorrowerRecord {
        age: num("person_age")?,
        income: num("person_income")?,
        home_ownership: cat("person_home_ownership"),
        emp_length: num("person_emp_length")?,
        loan_amount: num("loan_amnt")?,
        interest_rate: num("loan_int_rate")?,
        loan_intent: cat("loan_intent"),
        loan_grade: cat("loan_grade"),
        credit_hist_length: num("cb_person_cred_hist_length")?,
        default_on_file: cat("cb_person_default_on_file"),
        loan_percent_income: num("loan_percent_income")?,
        emp_length_missing: num("emp_length_missing")?,
        income_stability: num("income_stability")?,
        dti_band: get_optional(record, index, "dti_band").map(str::to_string),
        loan_status: parse_target(get_required(record, index, "loan_status")?)?,
    })
}

fn get_optional<'a>(
    record: &'a StringRecord,
    index: &HashMap<String, usize>,
    column: &str,
) -> Option<&'a str> {
    let idx = *index.get(column)?;
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn get_required<'a>(
    record: &'a StringRecord,
    index: &HashMap<String, usize>,
    column: &str,
) -> Result<&'a str, String> {
    get_optional(record, index, column).ok_or_else(|| format!("Missing `{column}` value."))
}

fn parse_opt_f64(raw: Option<&str>, column: &str) -> Result<Option<f64>, String> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("Invalid number '{raw}' in `{column}`."))?;
    if !value.is_finite() {
        return Err(format!("Non-finite value in `{column}`."));
    }
    Ok(Some(value))
}

fn parse_target(raw: &str) -> Result<u8, String> {
    match raw.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => Err(format!("Invalid `loan_status` '{raw}' (expected 0 or 1).")),
    }
}
