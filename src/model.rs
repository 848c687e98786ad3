//! Exact single-round transition law.
//!
//! A team holding `p` active players out of `b` balls moves to `j` active
//! players with probability
//!
//! ```text
//! f(j, p, b) = C(p, j) * P(p, j) * P(b - p, p - j) / P(b, p)
//! ```
//!
//! where `P(n, k)` is the falling factorial `n * (n - 1) * ... * (n - k + 1)`.

use crate::types::GameError;

/// Falling factorial `n * (n - 1) * ... * (n - k + 1)`.
///
/// Zero when `k > n` (choosing more than available), one when `k == 0`.
pub fn falling_factorial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    ((n - k + 1)..=n).fold(1.0, |acc, i| acc * i as f64)
}

/// Binomial coefficient `C(n, k)`, zero when `k > n`
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    // Exact in integers: each partial product is itself a binomial coefficient
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * (n - i) as u128 / (i + 1) as u128;
    }
    result as f64
}

/// Probability that a team with `p` active players ends the round with `j`.
///
/// Fails when `p` or `j` lies outside the population `0..=b`. Transitions that
/// are merely impossible (`j > p`, or more misses than free balls) are `Ok(0.0)`.
pub fn transition_probability(j: usize, p: usize, b: usize) -> Result<f64, GameError> {
    if p > b || j > b {
        return Err(GameError::IndexOutOfRange { j, p, b });
    }
    Ok(probability_in_range(j, p, b))
}

fn probability_in_range(j: usize, p: usize, b: usize) -> f64 {
    if j > p {
        return 0.0;
    }
    let numerator =
        binomial(p, j) * falling_factorial(p, j) * falling_factorial(b - p, p - j);
    numerator / falling_factorial(b, p)
}

/// Full `b x b` table, rows indexed by current count and columns by next count
pub fn transition_table(b: usize) -> Vec<Vec<f64>> {
    (0..b)
        .map(|p| (0..b).map(|j| probability_in_range(j, p, b)).collect())
        .collect()
}
