// crates/cohort-drift/src/testing.rs
//
// Seeded sample generators shared by the unit tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use statrs::distribution::{ContinuousCDF, Normal as NormalCdf};

/// `n` draws from N(mean, sd^2).
pub fn normal_sample(mean: f64, sd: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// `n` stratified draws from N(mean, sd^2): one uniform draw inside each of
/// `n` equal-probability strata, mapped through the normal quantile function.
///
/// Two stratified samples of the same distribution have empirical CDFs
/// within 2/n of each other, which keeps "no drift" assertions stable.
pub fn stratified_normal(mean: f64, sd: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = NormalCdf::new(mean, sd).unwrap();
    (0..n)
        .map(|i| {
            let u: f64 = rng.gen_range(1e-9..1.0);
            normal.inverse_cdf((i as f64 + u) / n as f64)
        })
        .collect()
}

#[test]
fn stratified_sample_is_ascending_and_centred() {
    let sample = stratified_normal(35.0, 10.0, 500, 7);
    assert!(sample.windows(2).all(|w| w[0] < w[1]));
    let mean = sample.iter().sum::<f64>() / sample.len() as f64;
    assert!((mean - 35.0).abs() < 0.5, "mean {}", mean);
    // The strata straddling the median bracket the centre.
    assert!(sample[249] <= 35.0 && sample[250] >= 35.0);
}
