// Step A: category weighting and the raw weighted z-score sum.

use crate::config::CategorySettings;
use crate::player::{category, stat_at_path, Format, LeagueContext, Player, ScoringType, Sport, StatPathResolver};

/// Baseline weight for the points-per-game category under points scoring.
const PPG_WEIGHT: f64 = 5.0;

/// Dynasty points leagues weight PPG by position.
fn dynasty_ppg_weight(position: Option<&str>) -> f64 {
    match position {
        Some("QB") => 4.0,
        Some("RB") => 5.5,
        Some("WR") => 5.2,
        Some("TE") => 5.0,
        _ => PPG_WEIGHT,
    }
}

/// Secondary points-league indicator categories and their fixed weights.
fn points_indicator_weight(category: &str) -> Option<f64> {
    match category {
        "OPG" => Some(0.75),
        "PR%" => Some(0.6),
        "YD%" => Some(0.5),
        "PPS" => Some(0.5),
        "OPE" => Some(0.5),
        "TD%" => Some(0.5),
        "BP%" => Some(0.5),
        "TO%" => Some(0.5),
        _ => None,
    }
}

/// Weight applied to a category's z-score before the user multiplier.
///
/// Under categories scoring no weighting applies at all; under points
/// scoring, PPG and the indicator categories carry fixed weights and
/// everything else is unweighted.
pub fn category_weight(cat: &str, position: Option<&str>, league: &LeagueContext) -> f64 {
    match league.scoring {
        ScoringType::Categories => 1.0,
        ScoringType::Points => {
            if cat == category::PPG {
                match league.format {
                    Format::Dynasty => dynasty_ppg_weight(position),
                    Format::Redraft => PPG_WEIGHT,
                }
            } else {
                points_indicator_weight(cat).unwrap_or(1.0)
            }
        }
    }
}

/// Read the pre-computed z-score for a category via the resolver's stat
/// path, defaulting to 0.0 when the path, the stat, or the z-score is
/// absent (a missing category is neutral, never an error).
fn category_zscore(
    player: &Player,
    cat: &str,
    resolver: &dyn StatPathResolver,
    sport: Sport,
    format: Format,
) -> f64 {
    let Some(path) = resolver.stat_path(cat, sport, format) else {
        return 0.0;
    };
    stat_at_path(player, &format!("{}.zScore", path)).unwrap_or(0.0)
}

/// The weighted raw z-score sum for one player: for each enabled category,
/// `zScore * categoryWeight * userMultiplier`, summed in category-key order.
pub fn raw_zscore_sum(
    player: &Player,
    categories: &CategorySettings,
    resolver: &dyn StatPathResolver,
    league: &LeagueContext,
) -> f64 {
    let position = player.info.resolved_position();
    categories
        .enabled_iter()
        .map(|(cat, setting)| {
            let z = category_zscore(player, cat, resolver, league.sport, league.format);
            z * category_weight(cat, position, league) * setting.multiplier
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
