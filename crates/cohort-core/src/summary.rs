// crates/cohort-core/src/summary.rs
//
// Descriptive statistics over a sample of non-missing values.

/// Arithmetic mean. `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard deviation with divisor `n - ddof`.
///
/// `ddof = 0` gives the population deviation used for stored baselines,
/// `ddof = 1` the sample deviation reported for current data. `None` when
/// `n <= ddof`.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    let n = values.len();
    if n <= ddof {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_sq / (n - ddof) as f64).sqrt())
}

/// Median; the mean of the two middle values for an even-sized sample.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Smallest and largest value. `None` for an empty sample.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Already far beyond the requested precision.
        return value;
    }
    scaled.round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v), Some(5.0));
        assert!((std_dev(&v, 0).unwrap() - 2.0).abs() < 1e-12);
        assert!((std_dev(&v, 1).unwrap() - 2.138089935).abs() < 1e-8);
    }

    #[test]
    fn empty_and_singleton_samples() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(min_max(&[]), None);
        assert_eq!(std_dev(&[3.0], 1), None);
        assert_eq!(std_dev(&[3.0], 0), Some(0.0));
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn min_max_unsorted() {
        assert_eq!(min_max(&[3.0, -1.0, 8.5, 0.0]), Some((-1.0, 8.5)));
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.1234567, 6), 0.123457);
        assert_eq!(round_to(-20.00004, 4), -20.0);
    }

    #[test]
    fn rounding_huge_values_keeps_them_finite() {
        assert_eq!(round_to(1e305, 4), 1e305);
        assert_eq!(round_to(-f64::MAX, 6), -f64::MAX);
        assert!(round_to(f64::NAN, 4).is_nan());
    }
}
