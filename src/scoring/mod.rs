// Scoring engine: weighted z-score sums, sport adjustments, cohort rescale.
//
// `score_players` scores a roster whose z-scores are already populated;
// `rank_players` is the full pass (comparison pool -> z-scores -> scores)
// run on every recomputation.

pub mod adjust;
pub mod scale;
pub mod weights;

use crate::config::CategorySettings;
use crate::player::{LeagueContext, Player, StatPathResolver};
use crate::zscore::apply_pool_zscores;
use thiserror::Error;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Internal scoring failures. These never cross the public boundary: the
/// entry points log and degrade to an unscored result instead.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("category `{category}` has invalid multiplier {multiplier}")]
    InvalidMultiplier { category: String, multiplier: f64 },

    #[error("non-finite adjusted sum for player `{player_id}`")]
    NonFiniteSum { player_id: String },
}

// ---------------------------------------------------------------------------
// Scoring over pre-computed z-scores
// ---------------------------------------------------------------------------

/// Score a roster of players whose per-category z-scores are already
/// populated, attaching the final `[5.0, 99.9]` display score to each.
///
/// Pure and deterministic: identical inputs produce identical outputs, with
/// all tie-breaking by player id. On any internal failure the input players
/// are returned unmodified (graceful degradation, never a panic or error to
/// the caller).
pub fn score_players(
    mut players: Vec<Player>,
    categories: &CategorySettings,
    resolver: &dyn StatPathResolver,
    league: &LeagueContext,
) -> Vec<Player> {
    if players.is_empty() {
        return players;
    }
    match compute_scores(&players, categories, resolver, league) {
        Ok(scores) => {
            for (player, score) in players.iter_mut().zip(scores) {
                player.z_score_sum = Some(score);
            }
            players
        }
        Err(error) => {
            warn!(%error, "scoring pass failed; returning players unscored");
            players
        }
    }
}

/// Steps A-C over the whole cohort. Returns one score per player, in input
/// order.
fn compute_scores(
    players: &[Player],
    categories: &CategorySettings,
    resolver: &dyn StatPathResolver,
    league: &LeagueContext,
) -> Result<Vec<f64>, ScoreError> {
    for (category, setting) in categories.enabled_iter() {
        if !setting.multiplier.is_finite() || setting.multiplier <= 0.0 {
            return Err(ScoreError::InvalidMultiplier {
                category: category.to_string(),
                multiplier: setting.multiplier,
            });
        }
    }

    let mut adjusted = Vec::with_capacity(players.len());
    for player in players {
        let raw = weights::raw_zscore_sum(player, categories, resolver, league);
        let sum = adjust::adjusted_sum(raw, player, players, league);
        if !sum.is_finite() {
            return Err(ScoreError::NonFiniteSum {
                player_id: player.id.clone(),
            });
        }
        adjusted.push(sum);
    }

    Ok(scale::rescale_cohort(&adjusted))
}

// ---------------------------------------------------------------------------
// Full ranking pass
// ---------------------------------------------------------------------------

/// The complete recomputation pass: build the comparison pool, standardize
/// every enabled category against it, score, and sort descending by final
/// score (id tie-break).
///
/// An empty comparison pool (no rule for the sport/format, or no eligible
/// players) skips z-score computation entirely and returns the players
/// unscored, in their input order.
pub fn rank_players(
    mut players: Vec<Player>,
    categories: &CategorySettings,
    resolver: &dyn StatPathResolver,
    league: &LeagueContext,
) -> Vec<Player> {
    if players.is_empty() {
        return players;
    }

    let pool_size = apply_pool_zscores(&mut players, categories, resolver, league);
    if pool_size == 0 {
        warn!(
            sport = league.sport.as_str(),
            format = league.format.as_str(),
            "empty comparison pool; returning players unscored"
        );
        return players;
    }

    let mut players = score_players(players, categories, resolver, league);
    adjust::sort_by_score_desc(&mut players);
    players
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
