//! Log-domain helpers for occupancy normalization.
//!
//! Unnormalized state weights such as aⁿ/n!, C(m,n)·ρⁿ, or ρⁿ overflow
//! `f64` for server counts and capacities in the hundreds. Each weight is
//! kept as a logarithm, built from its predecessor by a single addition,
//! and normalized with log-sum-exp.

/// Natural log of the weights `termₙ = termₙ₋₁ · ratio(n)` for `n = 0..=last`,
/// with `term₀ = 1`.
///
/// `log_ratio(n)` must return `ln(termₙ / termₙ₋₁)` for `n ≥ 1`.
pub(crate) fn log_terms(last: usize, log_ratio: impl Fn(usize) -> f64) -> Vec<f64> {
    let mut terms = Vec::with_capacity(last + 1);
    let mut current = 0.0;
    terms.push(current);
    for n in 1..=last {
        current += log_ratio(n);
        terms.push(current);
    }
    terms
}

/// `ln(Σ exp(xᵢ))`, stable for large magnitudes.
///
/// Returns `-∞` for an empty input or when every term is `-∞`.
pub(crate) fn log_sum_exp(values: impl IntoIterator<Item = f64> + Clone) -> f64 {
    let max = values
        .clone()
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let sum: f64 = values.into_iter().map(|v| (v - max).exp()).sum();
    max + sum.ln()
}

/// Converts log-weights into a probability vector summing to 1.
pub(crate) fn normalize(log_weights: &[f64]) -> Vec<f64> {
    let log_total = log_sum_exp(log_weights.iter().copied());
    log_weights
        .iter()
        .map(|&w| (w - log_total).exp())
        .collect()
}

/// Below this, `ln(n!)` is summed exactly.
const STIRLING_THRESHOLD: u64 = 16;

/// `ln(n!)` in constant time.
///
/// Small `n` are summed directly; larger `n` use the Stirling series
/// `n ln n − n + ½ ln(2πn) + 1/(12n) − 1/(360n³) + 1/(1260n⁵)`,
/// whose truncation error is below 1e-12 from the threshold on.
pub(crate) fn ln_factorial(n: u64) -> f64 {
    if n < STIRLING_THRESHOLD {
        return (2..=n).map(|i| (i as f64).ln()).sum();
    }
    let x = n as f64;
    let inv = x.recip();
    let inv2 = inv * inv;
    let correction = inv * (1.0 / 12.0 - inv2 * (1.0 / 360.0 - inv2 / 1260.0));
    x * x.ln() - x + 0.5 * (std::f64::consts::TAU * x).ln() + correction
}

/// Mean of a distribution over `0..dist.len()`.
pub(crate) fn mean(dist: &[f64]) -> f64 {
    dist.iter().enumerate().map(|(n, p)| n as f64 * p).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_terms_factorial_ratio() {
        // aⁿ/n! with a = 2: 1, 2, 2, 4/3
        let a: f64 = 2.0;
        let terms = log_terms(3, |n| a.ln() - (n as f64).ln());
        let plain: Vec<f64> = terms.iter().map(|t| t.exp()).collect();
        assert!((plain[0] - 1.0).abs() < 1e-12);
        assert!((plain[1] - 2.0).abs() < 1e-12);
        assert!((plain[2] - 2.0).abs() < 1e-12);
        assert!((plain[3] - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_sum_exp_large_values() {
        // exp(1000) overflows, the log-domain sum does not
        let lse = log_sum_exp([1000.0, 1000.0]);
        assert!((lse - (1000.0 + 2f64.ln())).abs() < 1e-9);
        assert_eq!(log_sum_exp(Vec::<f64>::new()), f64::NEG_INFINITY);
        assert_eq!(log_sum_exp([f64::NEG_INFINITY]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_normalize() {
        let dist = normalize(&[0.0, 2f64.ln(), 0.0]);
        assert!((dist[0] - 0.25).abs() < 1e-12);
        assert!((dist[1] - 0.5).abs() < 1e-12);
        assert!((dist[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_with_zero_weights() {
        let dist = normalize(&[0.0, f64::NEG_INFINITY]);
        assert_eq!(dist, vec![1.0, 0.0]);
    }

    #[test]
    fn test_ln_factorial() {
        assert_eq!(ln_factorial(0), 0.0);
        assert_eq!(ln_factorial(1), 0.0);
        assert!((ln_factorial(5) - 120f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_ln_factorial_series_matches_sum() {
        let mut exact = 0.0;
        for n in 1..=300u64 {
            exact += (n as f64).ln();
            let approx = ln_factorial(n);
            assert!((approx - exact).abs() < 1e-9 * exact.max(1.0), "n = {n}");
        }
    }

    #[test]
    fn test_ln_factorial_huge_argument() {
        let v = ln_factorial(u64::MAX);
        assert!(v.is_finite() && v > 0.0);
    }

    #[test]
    fn test_mean() {
        assert!((mean(&[0.25, 0.5, 0.25]) - 1.0).abs() < 1e-12);
    }
}
