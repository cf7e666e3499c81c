//! Analytics aggregation over the borrower dataset.

pub mod aggregator;
pub mod stats;

pub use aggregator::*;
pub use stats::{BoxSummary, HistogramBin, MAX_HISTOGRAM_BINS, sorted_counts};
