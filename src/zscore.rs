// Z-score primitives and the per-category pool pass.
//
// The scoring engine consumes pre-computed per-category z-scores; this
// module is the upstream step that produces them, standardizing each raw
// stat value against the comparison pool for the current league context.

use crate::config::CategorySettings;
use crate::player::{LeagueContext, Player, StatPathResolver};
use crate::pool::{build_comparison_pool, pool_rule};
use std::collections::BTreeMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single statistical category across the
/// comparison pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator), since the pool
/// represents the full relevant player universe rather than a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero (guarding
/// against division by zero).
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

// ---------------------------------------------------------------------------
// Pool pass over a player set
// ---------------------------------------------------------------------------

/// Extract the stats-map key from a resolved stat path (`stats.<KEY>`).
/// Paths outside the stats map cannot receive z-scores and are skipped.
fn stats_key(path: &str) -> Option<&str> {
    path.strip_prefix("stats.")
        .map(|rest| rest.split('.').next().unwrap_or(rest))
        .filter(|k| !k.is_empty())
}

/// Standardize every enabled category for every player against the
/// comparison pool for this league context.
///
/// Returns the pool size. A return of 0 (no rule configured, or no eligible
/// players) means nothing was written and the pass cannot score z-scores;
/// callers fall back to returning players unscored.
pub fn apply_pool_zscores(
    players: &mut [Player],
    categories: &CategorySettings,
    resolver: &dyn StatPathResolver,
    league: &LeagueContext,
) -> usize {
    let Some(rule) = pool_rule(league) else {
        debug!(
            sport = league.sport.as_str(),
            format = league.format.as_str(),
            "no comparison pool rule configured"
        );
        return 0;
    };

    // Resolve each enabled category to its stats-map key up front.
    let keys: Vec<(String, String)> = categories
        .enabled_iter()
        .filter_map(|(cat, _)| {
            let path = resolver.stat_path(cat, league.sport, league.format)?;
            let key = stats_key(&path)?.to_string();
            Some((cat.to_string(), key))
        })
        .collect();

    // Pool stats per category, computed while the pool borrow is live.
    let (pool_size, stats_by_category) = {
        let pool = build_comparison_pool(players, &rule);
        if pool.is_empty() {
            return 0;
        }
        let mut stats_by_category: BTreeMap<String, PoolStats> = BTreeMap::new();
        for (category, key) in &keys {
            let values: Vec<f64> = pool
                .iter()
                .filter_map(|p| p.stat_value(key))
                .filter(|v| v.is_finite())
                .collect();
            stats_by_category.insert(category.clone(), compute_pool_stats(&values));
        }
        (pool.len(), stats_by_category)
    };

    // Standardize every player (including those outside the pool) against
    // the pool stats.
    for player in players.iter_mut() {
        for (category, key) in &keys {
            let stats = &stats_by_category[category];
            if let Some(line) = player.stats.get_mut(key.as_str()) {
                line.z_score = line.value.map(|v| compute_zscore(v, stats));
            }
        }
    }

    pool_size
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
