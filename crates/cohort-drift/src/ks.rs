// crates/cohort-drift/src/ks.rs
//
// Two-sample Kolmogorov-Smirnov test.
//
// The statistic is the largest distance between the two empirical CDFs.
//
// When n * m <= EXACT_MAX_PRODUCT the two-sided p-value is exact: the share
// of monotone lattice paths from (0, 0) to (n, m) that touch a point with
// |i/n - j/m| >= D. Larger samples use the asymptotic Kolmogorov
// distribution with Stephens' correction:
//
//   n_e    = n * m / (n + m)
//   lambda = (sqrt(n_e) + 0.12 + 0.11 / sqrt(n_e)) * D
//   p      = Q_KS(lambda) = 2 * sum_{k>=1} (-1)^(k-1) * exp(-2 k^2 lambda^2)

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{KsMethod, KS_ALPHA};

/// Relative convergence tolerance against the previous term.
const SERIES_TERM_EPS: f64 = 1e-3;
/// Relative convergence tolerance against the running sum.
const SERIES_SUM_EPS: f64 = 1e-8;
/// Maximum number of series terms before giving up (p-value 1).
const SERIES_MAX_TERMS: u32 = 100;
/// Largest `n * m` for which the exact distribution is used.
pub const EXACT_MAX_PRODUCT: usize = 10_000;
/// Slack when comparing lattice distances against D, which is itself a
/// difference of two fractions.
const LATTICE_TOLERANCE: f64 = 1e-12;

/// Outcome of a KS test at a given significance level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KsResult {
    /// Supremum distance between the empirical CDFs, in [0, 1].
    pub statistic: f64,
    /// Probability of a statistic at least this large under the null, in [0, 1].
    pub p_value: f64,
    /// `p_value < alpha`.
    pub drift_detected: bool,
}

impl KsResult {
    /// The fail-open result used when the test cannot run: no evidence of
    /// drift is claimed.
    pub fn unavailable() -> Self {
        Self {
            statistic: 0.0,
            p_value: 1.0,
            drift_detected: false,
        }
    }
}

/// Run the KS test at the default significance level (`KS_ALPHA`).
pub fn compute_ks(expected: &[f64], actual: &[f64]) -> KsResult {
    compute_ks_with(expected, actual, KS_ALPHA, KsMethod::Auto)
}

/// Run the KS test with an explicit significance level and strategy.
///
/// Fails open (see [`KsResult::unavailable`]) when the strategy is
/// `Disabled`, when either sample has no finite values, or when the
/// computation does not produce finite numbers.
pub fn compute_ks_with(expected: &[f64], actual: &[f64], alpha: f64, method: KsMethod) -> KsResult {
    if method == KsMethod::Disabled {
        debug!("KS test disabled, failing open");
        return KsResult::unavailable();
    }

    let mut expected: Vec<f64> = expected.iter().copied().filter(|v| v.is_finite()).collect();
    let mut actual: Vec<f64> = actual.iter().copied().filter(|v| v.is_finite()).collect();
    if expected.is_empty() || actual.is_empty() {
        debug!("KS test needs non-empty samples, failing open");
        return KsResult::unavailable();
    }
    expected.sort_by(f64::total_cmp);
    actual.sort_by(f64::total_cmp);

    let statistic = ks_statistic_sorted(&expected, &actual);
    let p_value = ks_p_value(statistic, expected.len(), actual.len());
    if !statistic.is_finite() || !p_value.is_finite() {
        debug!("KS test produced a non-finite result, failing open");
        return KsResult::unavailable();
    }

    KsResult {
        statistic,
        p_value,
        drift_detected: p_value < alpha,
    }
}

/// KS statistic for two unsorted samples.
pub fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);
    ks_statistic_sorted(&a, &b)
}

/// KS statistic for two ascending samples.
///
/// Both CDFs are evaluated after consuming every copy of the current
/// smallest value, so ties across samples are handled correctly.
fn ks_statistic_sorted(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len();
    let m = b.len();
    if n == 0 || m == 0 {
        return 0.0;
    }

    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;
    while i < n && j < m {
        let x = a[i].min(b[j]);
        while i < n && a[i] <= x {
            i += 1;
        }
        while j < m && b[j] <= x {
            j += 1;
        }
        let gap = (i as f64 / n as f64 - j as f64 / m as f64).abs();
        d = d.max(gap);
    }
    d
}

/// Two-sided p-value for statistic `d` with sample sizes `n`, `m`.
///
/// Exact for small samples, asymptotic otherwise.
pub fn ks_p_value(d: f64, n: usize, m: usize) -> f64 {
    if n == 0 || m == 0 {
        return 1.0;
    }
    if n.saturating_mul(m) <= EXACT_MAX_PRODUCT {
        exact_p_value(d, n, m)
    } else {
        asymptotic_p_value(d, n, m)
    }
}

/// Exact two-sided p-value: P(D_{n,m} >= d) under the null.
///
/// Walks the (n + 1) x (m + 1) lattice one row at a time, carrying for each
/// point the number of paths that already touched the boundary and the
/// number that have not. Only sums of non-negative counts are formed, so
/// small p-values keep their relative precision.
pub fn exact_p_value(d: f64, n: usize, m: usize) -> f64 {
    if n == 0 || m == 0 || d <= 0.0 {
        return 1.0;
    }
    let limit = d - LATTICE_TOLERANCE;
    let (nf, mf) = (n as f64, m as f64);

    let mut touched = vec![0.0f64; m + 1];
    let mut clear = vec![0.0f64; m + 1];
    for i in 0..=n {
        for j in 0..=m {
            let (mut t, mut c) = if i == 0 && j == 0 {
                (0.0, 1.0)
            } else {
                // `touched[j]` / `clear[j]` still hold row i - 1 here, while
                // index j - 1 was already advanced to row i.
                let up = if i > 0 { (touched[j], clear[j]) } else { (0.0, 0.0) };
                let left = if j > 0 { (touched[j - 1], clear[j - 1]) } else { (0.0, 0.0) };
                (up.0 + left.0, up.1 + left.1)
            };
            if (i as f64 / nf - j as f64 / mf).abs() >= limit {
                t += c;
                c = 0.0;
            }
            touched[j] = t;
            clear[j] = c;
        }
    }

    (touched[m] / binomial(n + m, n)).clamp(0.0, 1.0)
}

/// C(total, k) as a float. Fits comfortably for any lattice allowed on the
/// exact path (the largest, 100 x 100, is about 9e58).
fn binomial(total: usize, k: usize) -> f64 {
    let k = k.min(total - k);
    (1..=k).fold(1.0, |acc, i| acc * (total - k + i) as f64 / i as f64)
}

/// Asymptotic two-sided p-value with Stephens' correction.
pub fn asymptotic_p_value(d: f64, n: usize, m: usize) -> f64 {
    if n == 0 || m == 0 {
        return 1.0;
    }
    let en = ((n as f64 * m as f64) / (n + m) as f64).sqrt();
    kolmogorov_survival((en + 0.12 + 0.11 / en) * d)
}

/// Survival function of the Kolmogorov distribution, Q_KS(lambda).
///
/// Returns 1.0 when the alternating series does not converge, which is the
/// regime of small lambda where the true value is indistinguishable from 1.
pub fn kolmogorov_survival(lambda: f64) -> f64 {
    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut prev_term: f64 = 0.0;

    for k in 1..=SERIES_MAX_TERMS {
        let kf = f64::from(k);
        let term = fac * (a2 * kf * kf).exp();
        sum += term;
        if term.abs() <= SERIES_TERM_EPS * prev_term || term.abs() <= SERIES_SUM_EPS * sum {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        prev_term = term.abs();
    }
    1.0
}
