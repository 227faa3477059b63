// crates/cohort-drift/src/metrics.rs
//
// Population Stability Index.
//
// PSI < 0.1         -> no significant shift
// 0.1 <= PSI < 0.2  -> moderate shift
// PSI >= 0.2        -> significant shift

use serde::{Deserialize, Serialize};

use crate::config::{PSI_EDGE_MARGIN, PSI_PROPORTION_FLOOR};

/// Interpretation band for a PSI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsiBand {
    /// PSI < 0.1.
    Stable,
    /// 0.1 <= PSI < 0.2.
    Moderate,
    /// PSI >= 0.2.
    Significant,
}

impl PsiBand {
    /// Classify a PSI value into its interpretation band.
    pub fn classify(psi: f64) -> Self {
        if psi >= 0.2 {
            PsiBand::Significant
        } else if psi >= 0.1 {
            PsiBand::Moderate
        } else {
            PsiBand::Stable
        }
    }
}

/// Compute the PSI between a baseline (`expected`) and a current (`actual`)
/// sample using `bins` equal-width buckets and the default margins.
pub fn compute_psi(expected: &[f64], actual: &[f64], bins: usize) -> f64 {
    compute_psi_with(expected, actual, bins, PSI_EDGE_MARGIN, PSI_PROPORTION_FLOOR)
}

/// Compute the PSI with explicit bucket-range widening and proportion floor.
///
/// Buckets span the union range of both samples, widened by `edge_margin`
/// on each end. Each bucket proportion is clipped to at least
/// `proportion_floor` before the per-bucket term
/// `(actual - expected) * ln(actual / expected)` is summed, so a bucket that
/// is empty on both sides contributes 0 and a bucket populated on one side
/// only contributes a bounded amount.
///
/// Non-finite values are ignored. Returns 0.0 when either sample is empty or
/// `bins` is 0.
pub fn compute_psi_with(
    expected: &[f64],
    actual: &[f64],
    bins: usize,
    edge_margin: f64,
    proportion_floor: f64,
) -> f64 {
    let expected: Vec<f64> = expected.iter().copied().filter(|v| v.is_finite()).collect();
    let actual: Vec<f64> = actual.iter().copied().filter(|v| v.is_finite()).collect();
    if expected.is_empty() || actual.is_empty() || bins == 0 {
        return 0.0;
    }

    let lo = expected
        .iter()
        .chain(actual.iter())
        .copied()
        .fold(f64::INFINITY, f64::min)
        - edge_margin;
    let hi = expected
        .iter()
        .chain(actual.iter())
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
        + edge_margin;

    let edges = bucket_edges(lo, hi, bins);
    let expected_pct = bucket_proportions(&expected, &edges, proportion_floor);
    let actual_pct = bucket_proportions(&actual, &edges, proportion_floor);

    expected_pct
        .iter()
        .zip(actual_pct.iter())
        .map(|(e, a)| (a - e) * (a / e).ln())
        .sum()
}

/// `bins + 1` evenly spaced edges from `lo` to `hi` inclusive.
fn bucket_edges(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let step = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + step * i as f64).collect();
    edges.push(hi);
    edges
}

/// Index of the bucket holding `value`.
///
/// Buckets are half-open `[e_i, e_{i+1})` except the last, which is closed,
/// matching the usual histogram convention. Values outside the range are
/// clamped to the first or last bucket.
fn bucket_index(value: f64, edges: &[f64]) -> usize {
    let bins = edges.len() - 1;
    let lo = edges[0];
    let width = edges[bins] - lo;
    if !(width > 0.0) {
        return 0;
    }

    let guess = ((value - lo) / width * bins as f64).floor();
    let mut idx = if guess < 0.0 {
        0
    } else {
        (guess as usize).min(bins - 1)
    };

    // Correct floating-point misplacement against the actual edges.
    if idx > 0 && value < edges[idx] {
        idx -= 1;
    } else if idx + 1 < bins && value >= edges[idx + 1] {
        idx += 1;
    }
    idx
}

/// Fraction of `values` per bucket, each clipped to `[floor, 1]`.
fn bucket_proportions(values: &[f64], edges: &[f64], floor: f64) -> Vec<f64> {
    let bins = edges.len() - 1;
    let mut counts = vec![0usize; bins];
    for &v in values {
        counts[bucket_index(v, edges)] += 1;
    }
    let total = values.len() as f64;
    counts
        .into_iter()
        .map(|c| (c as f64 / total).clamp(floor, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{normal_sample, stratified_normal};

    #[test]
    fn identical_distributions_low_psi() {
        let data = normal_sample(50.0, 10.0, 1000, 42);
        let psi = compute_psi(&data, &data, 10);
        assert!(psi.abs() < 1e-12, "PSI of a sample with itself should be 0, got {}", psi);
    }

    #[test]
    fn different_distributions_high_psi() {
        let baseline = normal_sample(50.0, 10.0, 1000, 42);
        let shifted = normal_sample(80.0, 10.0, 1000, 43);
        let psi = compute_psi(&baseline, &shifted, 10);
        assert!(psi > 0.2, "3 sigma shift should exceed 0.2, got {}", psi);
    }

    #[test]
    fn moderate_shift_is_noticeable_but_bounded() {
        let baseline = normal_sample(50.0, 10.0, 1000, 42);
        let shifted = normal_sample(55.0, 10.0, 1000, 43);
        let psi = compute_psi(&baseline, &shifted, 10);
        assert!(psi > 0.0 && psi < 1.0, "half sigma shift gave {}", psi);
    }

    #[test]
    fn psi_grows_with_mean_separation() {
        let baseline = stratified_normal(50.0, 10.0, 1000, 1);
        let psi_at = |shift: f64| {
            let current = stratified_normal(50.0 + 10.0 * shift, 10.0, 1000, 2);
            compute_psi(&baseline, &current, 10)
        };

        let p0 = psi_at(0.0);
        let p1 = psi_at(1.0);
        let p3 = psi_at(3.0);
        let p5 = psi_at(5.0);

        assert!(p0 < 0.05, "no shift should be near zero, got {}", p0);
        assert!(p1 > p0, "1 sigma ({}) should exceed 0 sigma ({})", p1, p0);
        assert!(p3 > 0.2 && p3 > p1, "3 sigma gave {}", p3);
        assert!(p5 > p3, "5 sigma ({}) should exceed 3 sigma ({})", p5, p3);
    }

    #[test]
    fn zero_variance_completes() {
        let constant = vec![7.0; 50];
        assert_eq!(compute_psi(&constant, &constant, 10), 0.0);

        let other = vec![9.0; 50];
        let psi = compute_psi(&constant, &other, 10);
        assert!(psi.is_finite() && psi > 0.0);
    }

    #[test]
    fn disjoint_buckets_contribute_bounded_amount() {
        // Each sample fills exactly one bucket the other leaves empty:
        // two terms of (1 - 1e-4) * ln(1 / 1e-4).
        let psi = compute_psi(&[0.0; 10], &[10.0; 10], 10);
        let expected = 2.0 * (1.0 - 1e-4) * (1.0f64 / 1e-4).ln();
        assert!((psi - expected).abs() < 1e-9, "got {}, expected {}", psi, expected);
    }

    #[test]
    fn known_value_for_alternating_buckets() {
        // Baseline: 10 values at the centre of each of 10 buckets.
        // Current: 14 / 6 values alternating across the same buckets.
        let expected: Vec<f64> = (0..10)
            .flat_map(|i| std::iter::repeat(i as f64 + 0.5).take(10))
            .collect();
        let actual: Vec<f64> = (0..10)
            .flat_map(|i| std::iter::repeat(i as f64 + 0.5).take(if i % 2 == 0 { 14 } else { 6 }))
            .collect();

        let psi = compute_psi(&expected, &actual, 10);
        let analytic = 5.0 * 0.04 * (1.4f64).ln() + 5.0 * 0.04 * (1.0f64 / 0.6).ln();
        assert!((psi - analytic).abs() < 1e-9, "got {}, expected {}", psi, analytic);
        assert_eq!(PsiBand::classify(psi), PsiBand::Moderate);
    }

    #[test]
    fn empty_input_or_zero_bins_is_zero() {
        assert_eq!(compute_psi(&[], &[1.0, 2.0], 10), 0.0);
        assert_eq!(compute_psi(&[1.0, 2.0], &[], 10), 0.0);
        assert_eq!(compute_psi(&[1.0, 2.0], &[1.0, 3.0], 0), 0.0);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let clean = vec![1.0, 2.0, 3.0, 4.0];
        let dirty = vec![1.0, f64::NAN, 2.0, 3.0, f64::INFINITY, 4.0];
        assert_eq!(compute_psi(&clean, &dirty, 4), 0.0);
    }

    #[test]
    fn upper_edge_value_lands_in_last_bucket() {
        let edges = bucket_edges(0.0, 10.0, 10);
        assert_eq!(bucket_index(10.0, &edges), 9);
        assert_eq!(bucket_index(0.0, &edges), 0);
        assert_eq!(bucket_index(1.0, &edges), 1);
        assert_eq!(bucket_index(9.999, &edges), 9);
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(PsiBand::classify(0.0), PsiBand::Stable);
        assert_eq!(PsiBand::classify(0.0999), PsiBand::Stable);
        assert_eq!(PsiBand::classify(0.1), PsiBand::Moderate);
        assert_eq!(PsiBand::classify(0.2), PsiBand::Significant);
    }
}
