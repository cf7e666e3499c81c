//! Analytics Aggregator: read-only statistics over the loaded borrowers.
//!
//! Every call recomputes from the records; nothing is cached. Missing cells are
//! skipped, so a column that is blank everywhere gives an empty result.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::analytics::stats::{self, BoxSummary, HistogramBin};
use crate::domain::{BorrowerRecord, CategoricalColumn, NumericColumn};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    pub records: usize,
    pub mean_income: Option<f64>,
    pub mean_loan_amount: Option<f64>,
    /// `count(loan_status == 1) / records`.
    pub default_rate: Option<f64>,
}

/// One scatter point, tagged with the borrower's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub label: u8,
}

/// Numeric values split by category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupedDistribution {
    pub groups: BTreeMap<String, Vec<f64>>,
}

impl GroupedDistribution {
    /// Box summary per group, in category order.
    pub fn box_summaries(&self) -> Vec<(String, BoxSummary)> {
        self.groups
            .iter()
            .filter_map(|(k, v)| stats::box_summary(v).map(|s| (k.clone(), s)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    records: &'a [BorrowerRecord],
}

impl<'a> Aggregator<'a> {
    pub fn new(records: &'a [BorrowerRecord]) -> Self {
        Self { records }
    }

    pub fn column(&self, column: NumericColumn) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(|r| r.numeric(column))
            .filter(|v| v.is_finite())
            .collect()
    }

    pub fn histogram(&self, column: NumericColumn, bins: usize) -> Vec<HistogramBin> {
        stats::histogram(&self.column(column), bins)
    }

    pub fn value_counts(&self, column: CategoricalColumn) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for value in self.records.iter().filter_map(|r| r.categorical(column)) {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Rows where both `x` and `y` are present.
    pub fn scatter_pairs(&self, x: NumericColumn, y: NumericColumn) -> Vec<ScatterPoint> {
        self.records
            .iter()
            .filter_map(|r| {
                let (xv, yv) = (r.numeric(x)?, r.numeric(y)?);
                (xv.is_finite() && yv.is_finite()).then_some(ScatterPoint {
                    x: xv,
                    y: yv,
                    label: r.loan_status,
                })
            })
            .collect()
    }

    pub fn grouped_distribution(
        &self,
        category: CategoricalColumn,
        numeric: NumericColumn,
    ) -> GroupedDistribution {
        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for r in self.records {
            let (Some(key), Some(value)) = (r.categorical(category), r.numeric(numeric)) else {
                continue;
            };
            if value.is_finite() {
                groups.entry(key.to_string()).or_default().push(value);
            }
        }
        GroupedDistribution { groups }
    }

    pub fn kpis(&self) -> Kpis {
        let records = self.records.len();
        let defaults = self.records.iter().filter(|r| r.loan_status == 1).count();
        Kpis {
            records,
            mean_income: stats::mean(self.records.iter().filter_map(|r| r.income)),
            mean_loan_amount: stats::mean(self.records.iter().filter_map(|r| r.loan_amount)),
            default_rate: (records > 0).then(|| defaults as f64 / records as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn borrower(grade: &str, income: Option<f64>, loan: f64, status: u8) -> BorrowerRecord {
        BorrowerRecord {
            income,
            loan_amount: Some(loan),
            loan_grade: Some(grade.to_string()),
            loan_status: status,
            ..BorrowerRecord::default()
        }
    }

    fn sample() -> Vec<BorrowerRecord> {
        vec![
            borrower("A", Some(40_000.0), 5_000.0, 0),
            borrower("A", Some(60_000.0), 7_000.0, 1),
            borrower("B", None, 9_000.0, 0),
        ]
    }

    #[test]
    fn value_counts_counts_each_category() {
        let records = sample();
        let counts = Aggregator::new(&records).value_counts(CategoricalColumn::LoanGrade);
        assert_eq!(
            counts,
            HashMap::from([("A".to_string(), 2), ("B".to_string(), 1)])
        );
    }

    #[test]
    fn kpis_match_definitions() {
        let records = sample();
        let k = Aggregator::new(&records).kpis();
        assert_eq!(k.records, 3);
        assert_eq!(k.mean_income, Some(50_000.0));
        assert_eq!(k.mean_loan_amount, Some(7_000.0));
        assert_eq!(k.default_rate, Some(1.0 / 3.0));
    }

    #[test]
    fn empty_selection_is_empty_not_error() {
        let records: Vec<BorrowerRecord> = Vec::new();
        let agg = Aggregator::new(&records);
        assert!(agg.histogram(NumericColumn::PersonAge, 40).is_empty());
        assert!(agg.value_counts(CategoricalColumn::LoanGrade).is_empty());
        assert!(agg.scatter_pairs(NumericColumn::PersonAge, NumericColumn::LoanAmnt).is_empty());
        assert!(agg.grouped_distribution(CategoricalColumn::LoanGrade, NumericColumn::LoanAmnt).is_empty());
        assert_eq!(agg.kpis().default_rate, None);

        // A column blank in every row behaves the same way.
        let records = sample();
        assert!(Aggregator::new(&records).histogram(NumericColumn::PersonAge, 40).is_empty());
    }

    #[test]
    fn scatter_skips_incomplete_rows_and_keeps_labels() {
        let records = sample();
        let points = Aggregator::new(&records)
            .scatter_pairs(NumericColumn::PersonIncome, NumericColumn::LoanAmnt);
        assert_eq!(
            points,
            vec![
                ScatterPoint { x: 40_000.0, y: 5_000.0, label: 0 },
                ScatterPoint { x: 60_000.0, y: 7_000.0, label: 1 },
            ]
        );
    }

    #[test]
    fn grouped_distribution_splits_by_category() {
        let records = sample();
        let grouped = Aggregator::new(&records)
            .grouped_distribution(CategoricalColumn::LoanGrade, NumericColumn::LoanAmnt);
        assert_eq!(grouped.groups["A"], vec![5_000.0, 7_000.0]);
        assert_eq!(grouped.groups["B"], vec![9_000.0]);

        let boxes = grouped.box_summaries();
        assert_eq!(boxes[0].0, "A");
        assert_eq!(boxes[0].1.median, 6_000.0);
        assert_eq!(boxes[1].1.min, 9_000.0);
    }

    #[test]
    fn histogram_of_target_is_two_bins() {
        let records = sample();
        let bins = Aggregator::new(&records).histogram(NumericColumn::LoanStatus, 2);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![2, 1]);
    }
}
