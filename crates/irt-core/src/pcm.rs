//! Partial Credit Model category response functions
//!
//! For an item with thresholds `δ_1..δ_m` the probability of category `k` is
//! proportional to `exp(Σ_{j=1..k} (θ − δ_j))`, the empty sum for `k = 0`
//! being zero. Exponents are shifted by their maximum before `exp` so the
//! normalization cannot overflow at extreme `θ`.

/// Moments of the category index under the model at a given `θ`
///
/// For the PCM the derivatives of the item log-likelihood with respect to
/// `θ` are the cumulants of the category index, so these four numbers are
/// everything the score, information and Warm correction need.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryMoments {
    /// Expected category `E[k]`
    pub mean: f64,
    /// `Var[k]`, the item Fisher information
    pub variance: f64,
    /// Third central moment, the derivative of the information
    pub third_central: f64,
    /// Fourth cumulant `μ4 − 3·Var²`, the second derivative of the information
    pub fourth_cumulant: f64,
}

impl CategoryMoments {
    /// Moments from a normalized probability vector
    pub fn from_probabilities(probs: &[f64]) -> Self {
        let mean: f64 = probs
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum();

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for (k, p) in probs.iter().enumerate() {
            let d = k as f64 - mean;
            let d2 = d * d;
            m2 += p * d2;
            m3 += p * d2 * d;
            m4 += p * d2 * d2;
        }

        Self {
            mean,
            variance: m2.max(0.0),
            third_central: m3,
            fourth_cumulant: m4 - 3.0 * m2 * m2,
        }
    }
}

/// Unnormalized log-numerators `Σ_{j≤k}(θ − δ_j)` written into `out`
///
/// `out` must have `thresholds.len() + 1` slots. Returns the maximum.
fn cumulative_exponents(thresholds: &[f64], theta: f64, out: &mut [f64]) -> f64 {
    debug_assert_eq!(out.len(), thresholds.len() + 1);
    out[0] = 0.0;
    let mut acc = 0.0;
    let mut max = 0.0_f64;
    for (j, delta) in thresholds.iter().enumerate() {
        acc += theta - delta;
        out[j + 1] = acc;
        max = max.max(acc);
    }
    max
}

/// Category probabilities written into `out` (length `thresholds.len() + 1`)
pub fn category_probabilities_into(thresholds: &[f64], theta: f64, out: &mut [f64]) {
    let max = cumulative_exponents(thresholds, theta, out);
    let mut total = 0.0;
    for v in out.iter_mut() {
        *v = (*v - max).exp();
        total += *v;
    }
    for v in out.iter_mut() {
        *v /= total;
    }
}

/// Category probabilities for one item at `theta`
pub fn category_probabilities(thresholds: &[f64], theta: f64) -> Vec<f64> {
    let mut out = vec![0.0; thresholds.len() + 1];
    category_probabilities_into(thresholds, theta, &mut out);
    out
}

/// `log P(category | θ)` computed with log-sum-exp
///
/// Stays finite where the probability itself would underflow to zero.
pub fn log_category_probability(thresholds: &[f64], theta: f64, category: usize) -> f64 {
    let mut eta = vec![0.0; thresholds.len() + 1];
    let max = cumulative_exponents(thresholds, theta, &mut eta);
    let log_norm = max + eta.iter().map(|e| (e - max).exp()).sum::<f64>().ln();
    eta[category] - log_norm
}

/// Category moments for one item at `theta`
pub fn category_moments(thresholds: &[f64], theta: f64) -> CategoryMoments {
    let probs = category_probabilities(thresholds, theta);
    CategoryMoments::from_probabilities(&probs)
}
