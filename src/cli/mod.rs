//! Command-line parsing for the credit-risk explorer.
//!
//! Parsing is kept apart from dispatch (`crate::app`) and from the analytics
//! and scoring code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ApplicantForm, CategoricalColumn, NumericColumn};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "crisk", version, about = "Credit risk explorer and default-risk scorer")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Dataset CSV: an http(s) URL or a local path [env: CRISK_DATA_SOURCE].
    #[arg(long, global = true, value_name = "URL|PATH")]
    pub data: Option<String>,

    /// Classifier artifact (JSON) [env: CRISK_MODEL_PATH].
    #[arg(long, global = true, value_name = "JSON")]
    pub model: Option<PathBuf>,

    /// Use N synthetic borrowers instead of the dataset.
    #[arg(long, global = true, value_name = "N")]
    pub synthetic: Option<usize>,

    /// Seed for `--synthetic`.
    #[arg(long, global = true, default_value_t = 42)]
    pub seed: u64,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dataset KPIs, shape and feature catalogue.
    Summary,
    /// Histogram of a numeric column.
    Hist(HistArgs),
    /// Value counts of a categorical column.
    Counts(CountsArgs),
    /// Scatter of two numeric columns, marked by loan status.
    Scatter(ScatterArgs),
    /// Box summary of a numeric column per category.
    Box(BoxArgs),
    /// Score a hypothetical applicant.
    Score(ScoreArgs),
    /// Launch the interactive dashboard.
    Tui,
}

#[derive(Debug, Clone, Args)]
pub struct HistArgs {
    #[arg(long, value_enum)]
    pub column: NumericColumn,

    #[arg(long, default_value_t = 40)]
    pub bins: usize,

    /// Bar width (columns).
    #[arg(long, default_value_t = 50)]
    pub width: usize,
}

#[derive(Debug, Clone, Args)]
pub struct CountsArgs {
    #[arg(long, value_enum)]
    pub column: CategoricalColumn,
}

#[derive(Debug, Clone, Args)]
pub struct ScatterArgs {
    #[arg(long, value_enum, default_value_t = NumericColumn::PersonAge)]
    pub x: NumericColumn,

    #[arg(long, value_enum, default_value_t = NumericColumn::PersonIncome)]
    pub y: NumericColumn,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 24)]
    pub height: usize,
}

#[derive(Debug, Clone, Args)]
pub struct BoxArgs {
    #[arg(long, value_enum)]
    pub category: CategoricalColumn,

    #[arg(long, value_enum)]
    pub numeric: NumericColumn,
}

/// Applicant attributes. Defaults match the dashboard's prediction form.
#[derive(Debug, Clone, Args)]
pub struct ScoreArgs {
    /// Annual income.
    #[arg(long, default_value_t = 50_000.0)]
    pub income: f64,

    #[arg(long, default_value_t = 30.0)]
    pub age: f64,

    /// Employment length (years).
    #[arg(long, default_value_t = 5.0)]
    pub emp_length: f64,

    /// Credit history length (years).
    #[arg(long, default_value_t = 5.0)]
    pub credit_hist: f64,

    /// Interest rate (%).
    #[arg(long, default_value_t = 10.0)]
    pub interest_rate: f64,

    #[arg(long, default_value_t = 20_000.0)]
    pub loan_amount: f64,

    /// RENT, OWN, MORTGAGE or OTHER.
    #[arg(long, default_value = "RENT")]
    pub home_ownership: String,

    /// PERSONAL, EDUCATION, MEDICAL, VENTURE, HOMEIMPROVEMENT or DEBTCONSOLIDATION.
    #[arg(long, default_value = "PERSONAL")]
    pub loan_intent: String,

    /// A to G.
    #[arg(long, default_value = "A")]
    pub loan_grade: String,

    /// Prior default on file (Y or N).
    #[arg(long, default_value = "Y")]
    pub past_default: String,

    /// Print the scored applicant as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ScoreArgs {
    pub fn to_form(&self) -> ApplicantForm {
        ApplicantForm {
            age: self.age,
            income: self.income,
            home_ownership: self.home_ownership.clone(),
            emp_length: self.emp_length,
            loan_amount: self.loan_amount,
            interest_rate: self.interest_rate,
            loan_intent: self.loan_intent.clone(),
            loan_grade: self.loan_grade.clone(),
            credit_hist_length: self.credit_hist,
            default_on_file: self.past_default.clone(),
        }
    }
}

/// Rewrite argv so `crisk` with no subcommand opens the dashboard.
///
/// - `crisk`                    -> `crisk tui`
/// - `crisk --synthetic 500`    -> `crisk tui --synthetic 500`
/// - `crisk --help/--version`   -> unchanged
pub fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    if matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help") {
        return argv;
    }

    if arg1.starts_with('-') && !argv.iter().skip(1).any(|a| is_subcommand(a)) {
        argv.insert(1, "tui".to_string());
    }
    argv
}

fn is_subcommand(arg: &str) -> bool {
    matches!(
        arg,
        "summary" | "hist" | "counts" | "scatter" | "box" | "score" | "tui"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_dashboard() {
        assert_eq!(rewrite_args(argv(&["crisk"])), argv(&["crisk", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["crisk", "--synthetic", "500"])),
            argv(&["crisk", "tui", "--synthetic", "500"])
        );
        assert_eq!(
            rewrite_args(argv(&["crisk", "--synthetic", "500", "summary"])),
            argv(&["crisk", "--synthetic", "500", "summary"])
        );
        assert_eq!(rewrite_args(argv(&["crisk", "--help"])), argv(&["crisk", "--help"]));
    }

    #[test]
    fn score_defaults_match_form_defaults() {
        let cli = Cli::parse_from(["crisk", "score"]);
        let Command::Score(args) = cli.command else {
            panic!("expected score");
        };
        assert_eq!(args.to_form(), ApplicantForm::default());
    }

    #[test]
    fn column_names_are_snake_case() {
        let cli = Cli::parse_from(["crisk", "hist", "--column", "loan_percent_income", "--data", "x.csv"]);
        let Command::Hist(args) = cli.command else {
            panic!("expected hist");
        };
        assert_eq!(args.column, NumericColumn::LoanPercentIncome);
        assert_eq!(args.bins, 40);
        assert_eq!(cli.global.data.as_deref(), Some("x.csv"));
    }
}
