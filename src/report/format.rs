//! Formatted terminal output for the CLI.
//!
//! All formatting lives here so analytics and scoring stay free of
//! presentation concerns and output changes stay localized.

use std::collections::HashMap;

use crate::analytics::{BoxSummary, HistogramBin, Kpis, sorted_counts};
use crate::data::Dataset;
use crate::domain::{CategoricalColumn, Category, NumericColumn, ScoredApplicant};
use crate::plot::bar;

/// Column groups shown on the "About Dataset" page.
pub const FEATURE_CATALOGUE: [(&str, &[(&str, &str)]); 4] = [
    (
        "Borrower Demographics",
        &[
            ("person_age", "Age of the borrower"),
            ("person_income", "Annual income"),
            ("person_home_ownership", "Housing status (Rent, Own, Mortgage, Other)"),
            ("person_emp_length", "Employment duration in years"),
        ],
    ),
    (
        "Loan Details",
        &[
            ("loan_amnt", "Loan amount requested"),
            ("loan_int_rate", "Interest rate applied"),
            ("loan_intent", "Purpose of loan"),
            ("loan_grade", "Credit grade assigned"),
        ],
    ),
    (
        "Credit History",
        &[
            ("cb_person_cred_hist_length", "Length of credit history"),
            ("cb_person_default_on_file", "Historical default indicator"),
        ],
    ),
    (
        "Engineered Features",
        &[
            ("loan_percent_income", "Loan amount as % of income"),
            ("emp_length_missing", "Indicator for missing employment length"),
            ("income_stability", "Stability proxy using income & employment"),
            ("dti_band", "Debt-to-income risk category"),
        ],
    ),
];

/// KPI line shared by the CLI summary and the dashboard header.
pub fn format_kpis(kpis: &Kpis) -> String {
    format!(
        "Total Customers: {} | Average Income: {} | Default Rate: {} | Avg Loan Amount: {}",
        fmt_count(kpis.records),
        kpis.mean_income.map(fmt_money).unwrap_or_else(|| "-".to_string()),
        kpis.default_rate
            .map(|r| format!("{:.1}%", r * 100.0))
            .unwrap_or_else(|| "-".to_string()),
        kpis.mean_loan_amount.map(fmt_money).unwrap_or_else(|| "-".to_string()),
    )
}

/// Dataset overview: KPIs, shape, target, load notes and the feature catalogue.
pub fn format_summary(dataset: &Dataset, kpis: &Kpis) -> String {
    let summary = dataset.summary();
    let mut out = String::new();

    out.push_str("=== crisk - Credit Risk Analytics ===\n");
    out.push_str(&format_kpis(kpis));
    out.push_str("\n\n");

    out.push_str("Dataset Summary:\n");
    out.push_str(&format!("- Total Records  : {}\n", fmt_count(dataset.len())));
    out.push_str(&format!("- Total Features : {}\n", summary.columns.len()));
    out.push_str("- Target Variable: loan_status (0 = No Default, 1 = Default)\n");
    if let Some(rate) = kpis.default_rate {
        out.push_str(&format!("- Default Rate   : {:.2}%\n", rate * 100.0));
    }
    out.push_str(&format!("- Source         : {}\n", summary.origin));
    out.push_str(&format!(
        "- Loaded at      : {}\n",
        summary.loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if !summary.dropped_columns.is_empty() {
        let dropped: Vec<String> = summary
            .dropped_columns
            .iter()
            .map(|c| if c.is_empty() { "(blank)".to_string() } else { c.clone() })
            .collect();
        out.push_str(&format!("- Dropped columns: {}\n", dropped.join(", ")));
    }
    if !summary.row_errors.is_empty() {
        out.push_str(&format!(
            "- Skipped rows   : {} of {}\n",
            summary.row_errors.len(),
            summary.rows_read
        ));
        for e in summary.row_errors.iter().take(5) {
            out.push_str(&format!("    line {}: {}\n", e.line, e.message));
        }
    }

    out.push_str("\nFeature Categories:\n");
    for (group, columns) in FEATURE_CATALOGUE {
        out.push_str(&format!("{group}\n"));
        for (name, description) in columns {
            out.push_str(&format!("  {name:<28} {description}\n"));
        }
    }

    out
}

pub fn format_histogram(column: NumericColumn, bins: &[HistogramBin], bar_width: usize) -> String {
    let mut out = format!("Histogram: {} ({} bins)\n", column.name(), bins.len());
    if bins.is_empty() {
        out.push_str("(no values)\n");
        return out;
    }

    let max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    out.push_str(&format!("{:>14} {:>14} {:>8}\n", "from", "to", "count"));
    out.push_str(&format!("{:-<14} {:-<14} {:-<8}\n", "", "", ""));
    for b in bins {
        let line = format!(
            "{:>14} {:>14} {:>8} {}",
            fmt_num(b.lower),
            fmt_num(b.upper),
            b.count,
            bar(b.count as f64, max, bar_width)
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn format_counts(column: CategoricalColumn, counts: &HashMap<String, usize>, bar_width: usize) -> String {
    let mut out = format!("Value counts: {}\n", column.name());
    let rows = sorted_counts(counts);
    if rows.is_empty() {
        out.push_str("(no values)\n");
        return out;
    }

    let total: usize = rows.iter().map(|(_, n)| n).sum();
    let max = rows.first().map(|(_, n)| *n).unwrap_or(0) as f64;
    out.push_str(&format!("{:<20} {:>8} {:>7}\n", "value", "count", "share"));
    out.push_str(&format!("{:-<20} {:-<8} {:-<7}\n", "", "", ""));
    for (value, n) in &rows {
        let line = format!(
            "{:<20} {:>8} {:>6.1}% {}",
            truncate(value, 20),
            n,
            *n as f64 / total as f64 * 100.0,
            bar(*n as f64, max, bar_width)
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn format_box_table(
    category: CategoricalColumn,
    numeric: NumericColumn,
    summaries: &[(String, BoxSummary)],
) -> String {
    let mut out = format!("Box summary: {} by {}\n", numeric.name(), category.name());
    if summaries.is_empty() {
        out.push_str("(no values)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<20} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
        "group", "n", "min", "q1", "median", "q3", "max"
    ));
    out.push_str(&format!(
        "{:-<20} {:-<7} {:-<12} {:-<12} {:-<12} {:-<12} {:-<12}\n",
        "", "", "", "", "", "", ""
    ));
    for (group, s) in summaries {
        out.push_str(&format!(
            "{:<20} {:>7} {:>12} {:>12} {:>12} {:>12} {:>12}\n",
            truncate(group, 20),
            s.count,
            fmt_num(s.min),
            fmt_num(s.q1),
            fmt_num(s.median),
            fmt_num(s.q3),
            fmt_num(s.max),
        ));
    }
    out
}

pub fn format_scored(scored: &ScoredApplicant) -> String {
    let input = &scored.input;
    let f = &scored.features;
    let mut out = String::new();

    out.push_str("=== Credit Default Prediction ===\n");
    out.push_str(&format!("{}\n", scored.decision.headline()));
    out.push_str(&format!("Default Probability: {:.2}%\n", scored.probability * 100.0));
    out.push_str(&format!("Decision threshold : {:.2}%\n", scored.threshold * 100.0));

    out.push_str("\nApplicant:\n");
    out.push_str(&format!(
        "  age {} | income {} | {} | employed {} yrs | history {} yrs | past default {}\n",
        fmt_num(input.age),
        fmt_money(input.income),
        input.home_ownership.code(),
        fmt_num(input.emp_length),
        fmt_num(input.credit_hist_length),
        input.default_on_file.code(),
    ));
    out.push_str(&format!(
        "  loan {} at {:.2}% | intent {} | grade {}\n",
        fmt_money(input.loan_amount),
        input.interest_rate,
        input.loan_intent.code(),
        input.loan_grade.code(),
    ));

    out.push_str("\nEngineered features:\n");
    out.push_str(&format!("  {:<20} {:.4}\n", "loan_percent_income", f.loan_percent_income));
    out.push_str(&format!("  {:<20} {}\n", "dti_band", f.dti_band.code()));
    out.push_str(&format!("  {:<20} {}\n", "emp_length_missing", f.emp_length_missing));
    out.push_str(&format!("  {:<20} {:.2}\n", "income_stability", f.income_stability));

    out
}

/// `$12,345` style, rounded to whole units.
pub fn fmt_money(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(v.abs().round() as u64))
}

/// `32,581` style.
pub fn fmt_count(n: usize) -> String {
    group_thousands(n as u64)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Integers without decimals, everything else with up to four.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
