use serde::{Deserialize, Serialize};
use statrs::function::factorial::binomial;

/// Chance of finishing with at least `threshold` wins.
///
/// Every remaining game is treated as an independent coin flip, so this
/// ignores opponent strength and which matchups are left. Exact scenario
/// enumeration supersedes it once available.
///
/// # Arguments
/// * `wins` - Wins so far
/// * `played` - Games played so far
/// * `threshold` - Total wins needed
/// * `games_per_competitor` - Length of the regular phase
///
/// # Returns
/// Probability in `[0, 1]`
pub fn qualification_chance(wins: u32, played: u32, threshold: u32, games_per_competitor: u32) -> f64 {
    let needed = threshold.saturating_sub(wins);
    if needed == 0 {
        return 1.0;
    }
    let remaining = games_per_competitor.saturating_sub(played);
    if needed > remaining {
        return 0.0;
    }

    let outcomes: f64 = (needed..=remaining)
        .map(|i| binomial(remaining as u64, i as u64))
        .sum();
    outcomes / 2f64.powi(remaining as i32)
}

/// Win totals that matter for one league format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Wins that guarantee at least a tiebreaker
    pub contention: u32,
    /// Wins that guarantee a playoff spot outright
    pub safety: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChanceEstimate {
    pub contention: f64,
    pub safety: f64,
}

/// Estimate both thresholds for a competitor's current record.
pub fn estimate(wins: u32, played: u32, thresholds: Thresholds, games_per_competitor: u32) -> ChanceEstimate {
    ChanceEstimate {
        contention: qualification_chance(wins, played, thresholds.contention, games_per_competitor),
        safety: qualification_chance(wins, played, thresholds.safety, games_per_competitor),
    }
}
