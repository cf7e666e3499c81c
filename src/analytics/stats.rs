//! Plain statistics over `f64` slices.
//!
//! Inputs may contain non-finite values; they are ignored. Empty input gives an
//! empty (or `None`) result rather than an error.

use std::collections::HashMap;

use serde::Serialize;

/// One equal-width histogram bin. `upper` is exclusive except on the last bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Five-number summary of one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Upper limit on histogram resolution.
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

/// Equal-width histogram over `[min, max]`.
///
/// All-identical values give a single bin holding every value. `bins` is
/// capped at `MAX_HISTOGRAM_BINS`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.min(MAX_HISTOGRAM_BINS);
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (min, max) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count,
        })
        .collect()
}

/// Min, quartiles (linear interpolation) and max.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    Some(BoxSummary {
        count: sorted.len(),
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Quantile of an ascending, non-empty slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Counts ordered by count (descending), then by name.
pub fn sorted_counts(counts: &HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 5.0];
        let bins = histogram(&values, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].lower, 1.0);
        assert_eq!(bins[3].upper, 5.0);
        // The maximum lands in the last bin.
        assert_eq!(bins[3].count, 2);
    }

    #[test]
    fn histogram_single_value_is_one_bin() {
        let bins = histogram(&[7.0, 7.0, 7.0], 40);
        assert_eq!(
            bins,
            vec![HistogramBin { lower: 7.0, upper: 7.0, count: 3 }]
        );
    }

    #[test]
    fn histogram_degenerate_inputs_are_empty() {
        assert!(histogram(&[], 10).is_empty());
        assert!(histogram(&[f64::NAN], 10).is_empty());
        assert!(histogram(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn histogram_caps_huge_bin_counts() {
        let bins = histogram(&[1.0, 2.0], usize::MAX);
        assert_eq!(bins.len(), MAX_HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn box_summary_interpolates_quartiles() {
        let s = box_summary(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(s.count, 5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.q3, 4.0);
        assert_eq!(s.max, 5.0);

        let s = box_summary(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 3.25);

        assert!(box_summary(&[]).is_none());
    }

    #[test]
    fn mean_skips_non_finite() {
        assert_eq!(mean([1.0, f64::NAN, 3.0]), Some(2.0));
        assert_eq!(mean(Vec::<f64>::new()), None);
    }

    #[test]
    fn sorted_counts_orders_by_count_then_name() {
        let counts = HashMap::from([
            ("B".to_string(), 1),
            ("A".to_string(), 2),
            ("C".to_string(), 1),
        ]);
        assert_eq!(
            sorted_counts(&counts),
            vec![("A".to_string(), 2), ("B".to_string(), 1), ("C".to_string(), 1)]
        );
    }
}
