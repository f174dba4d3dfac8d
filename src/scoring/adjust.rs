// Step B: sport-specific multiplicative adjustments.
//
// Applied in a fixed order (age, then PPR, then QB tiering) because each
// step operates on the running adjusted sum, not the raw sum.

use crate::player::{category, FlexSetting, Format, LeagueContext, Player, Sport};
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Age adjustment (NFL dynasty)
// ---------------------------------------------------------------------------

/// Per-position age thresholds and per-year rates.
struct AgeCurve {
    youth_age: f64,
    youth_rate: f64,
    decline_age: f64,
    decline_rate: f64,
}

fn age_curve(position: &str) -> Option<AgeCurve> {
    match position {
        "RB" => Some(AgeCurve {
            youth_age: 25.0,
            youth_rate: 0.12,
            decline_age: 26.0,
            decline_rate: 0.18,
        }),
        "WR" => Some(AgeCurve {
            youth_age: 28.0,
            youth_rate: 0.10,
            decline_age: 29.0,
            decline_rate: 0.12,
        }),
        "TE" => Some(AgeCurve {
            youth_age: 27.0,
            youth_rate: 0.08,
            decline_age: 28.0,
            decline_rate: 0.11,
        }),
        "QB" => Some(AgeCurve {
            youth_age: 32.0,
            youth_rate: 0.06,
            decline_age: 33.0,
            decline_rate: 0.08,
        }),
        _ => None,
    }
}

/// Multiplier never drops below this floor under decline compounding.
const AGE_MULTIPLIER_FLOOR: f64 = 0.1;

/// Age multiplier for an NFL dynasty player.
///
/// Decline compounds super-linearly with years over the threshold
/// (`rate *= 1 + 0.1 * years_over`); the youth boost compounds similarly
/// (`rate *= 1 + 0.05 * years_under`) but applies only to a positive raw
/// sum; boosting a negative sum would improperly improve a bad player.
fn age_multiplier(curve: &AgeCurve, age: f64, raw_sum: f64) -> f64 {
    if age > curve.decline_age {
        let years_over = age - curve.decline_age;
        let rate = curve.decline_rate * (1.0 + 0.1 * years_over);
        return (1.0 - rate * years_over).max(AGE_MULTIPLIER_FLOOR);
    }
    if age < curve.youth_age && raw_sum > 0.0 {
        let years_under = curve.youth_age - age;
        let rate = curve.youth_rate * (1.0 + 0.05 * years_under);
        return 1.0 + rate * years_under;
    }
    1.0
}

/// Apply the age adjustment. Only NFL dynasty has an age model today; every
/// other sport/format combination is an explicit no-op.
pub fn apply_age_adjustment(sum: f64, player: &Player, raw_sum: f64, league: &LeagueContext) -> f64 {
    match (league.sport, league.format) {
        (Sport::Nfl, Format::Dynasty) => {
            let Some(position) = player.info.resolved_position() else {
                return sum;
            };
            let Some(curve) = age_curve(position) else {
                return sum;
            };
            let Some(age) = player.info.age else {
                return sum;
            };
            sum * age_multiplier(&curve, age, raw_sum)
        }
        // TODO: NFL redraft age discounting for RBs past the cliff.
        (Sport::Nfl, Format::Redraft) => sum,
        // TODO: NBA dynasty age curves.
        (Sport::Nba, _) => sum,
        // TODO: MLB dynasty age curves.
        (Sport::Mlb, _) => sum,
    }
}

// ---------------------------------------------------------------------------
// PPR adjustment (NFL)
// ---------------------------------------------------------------------------

const RECEPTION_THRESHOLD: f64 = 35.0;
const TARGET_THRESHOLD: f64 = 60.0;
const RECEPTION_BOOST_CAP: f64 = 0.22;
const TARGET_BOOST_CAP: f64 = 0.15;
const PER_TARGET_BOOST: f64 = 0.0015;
/// Target-share boost per percentage point over the position threshold.
const PER_SHARE_POINT_BOOST: f64 = 0.015;

struct PprProfile {
    base_boost: f64,
    per_catch_boost: f64,
    share_threshold: f64,
    share_boost_cap: f64,
}

fn ppr_profile(position: &str) -> Option<PprProfile> {
    match position {
        "WR" => Some(PprProfile {
            base_boost: 0.08,
            per_catch_boost: 0.0020,
            share_threshold: 14.0,
            share_boost_cap: 0.15,
        }),
        "TE" => Some(PprProfile {
            base_boost: 0.09,
            per_catch_boost: 0.0030,
            share_threshold: 14.0,
            share_boost_cap: 0.15,
        }),
        "RB" => Some(PprProfile {
            base_boost: 0.06,
            per_catch_boost: 0.0025,
            share_threshold: 9.0,
            share_boost_cap: 0.18,
        }),
        _ => None,
    }
}

/// Apply the reception-economy adjustment for NFL leagues, scaled by the
/// PPR setting. The base positional boost and the three volume boosts are
/// layered multiplicatively, each computed from the current running sum.
pub fn apply_ppr_adjustment(sum: f64, player: &Player, league: &LeagueContext) -> f64 {
    if league.sport != Sport::Nfl {
        return sum;
    }
    let ppr = league.ppr.multiplier();
    if ppr == 0.0 {
        return sum;
    }
    let Some(position) = player.info.resolved_position() else {
        return sum;
    };
    let Some(profile) = ppr_profile(position) else {
        return sum;
    };

    let mut adjusted = sum * (1.0 + profile.base_boost * ppr);

    // Reception volume.
    if let Some(receptions) = player.stat_value(category::RECEPTIONS) {
        if receptions > RECEPTION_THRESHOLD {
            let boost = ((receptions - RECEPTION_THRESHOLD) * profile.per_catch_boost)
                .min(RECEPTION_BOOST_CAP);
            adjusted *= 1.0 + boost * ppr;
        }
    }

    // Target volume.
    if let Some(targets) = player.stat_value(category::TARGETS) {
        if targets > TARGET_THRESHOLD {
            let boost = ((targets - TARGET_THRESHOLD) * PER_TARGET_BOOST).min(TARGET_BOOST_CAP);
            adjusted *= 1.0 + boost * ppr;
        }
    }

    // Target share (a percentage value, e.g. 16.5).
    if let Some(share) = player.stat_value(category::TARGET_SHARE) {
        if share > profile.share_threshold {
            let boost = ((share - profile.share_threshold) * PER_SHARE_POINT_BOOST)
                .min(profile.share_boost_cap);
            adjusted *= 1.0 + boost * ppr;
        }
    }

    adjusted
}

// ---------------------------------------------------------------------------
// QB tiering (NFL)
// ---------------------------------------------------------------------------

struct QbTierTable {
    /// Inclusive rank cutoffs for the top three tiers.
    cutoffs: [u32; 3],
    /// Multipliers top tier to bottom tier.
    multipliers: [f64; 4],
}

fn qb_tier_table(format: Format, flex: FlexSetting) -> QbTierTable {
    match (format, flex) {
        (Format::Dynasty, FlexSetting::Superflex) => QbTierTable {
            cutoffs: [5, 15, 24],
            multipliers: [2.6, 1.8, 1.2, 0.9],
        },
        (Format::Dynasty, FlexSetting::Standard) => QbTierTable {
            cutoffs: [3, 8, 15],
            multipliers: [1.3, 0.9, 0.7, 0.5],
        },
        (Format::Redraft, FlexSetting::Superflex) => QbTierTable {
            cutoffs: [5, 12, 20],
            multipliers: [2.5, 1.9, 1.4, 1.1],
        },
        (Format::Redraft, FlexSetting::Standard) => QbTierTable {
            cutoffs: [3, 8, 15],
            multipliers: [1.3, 1.0, 0.7, 0.5],
        },
    }
}

/// The tier multiplier for a QB position-rank. Cutoffs are inclusive of the
/// tier they define; a QB with no resolvable rank gets the bottom tier (the
/// conservative default, not an error).
fn qb_tier_multiplier(table: &QbTierTable, position_rank: Option<u32>) -> f64 {
    let Some(rank) = position_rank else {
        return table.multipliers[3];
    };
    if rank <= table.cutoffs[0] {
        table.multipliers[0]
    } else if rank <= table.cutoffs[1] {
        table.multipliers[1]
    } else if rank <= table.cutoffs[2] {
        table.multipliers[2]
    } else {
        table.multipliers[3]
    }
}

/// A QB's 1-based rank among ranked QBs in the full player set, sorted by
/// the `rank` field (id tie-break). Falls back to the player's own overall
/// rank when they are absent from the sorted list.
pub fn qb_position_rank(player: &Player, all_players: &[Player]) -> Option<u32> {
    let mut quarterbacks: Vec<(u32, &str)> = all_players
        .iter()
        .filter(|p| p.info.resolved_position() == Some("QB"))
        .filter_map(|p| p.rank.map(|r| (r, p.id.as_str())))
        .collect();
    quarterbacks.sort_by(|(ra, ia), (rb, ib)| ra.cmp(rb).then_with(|| ia.cmp(ib)));

    quarterbacks
        .iter()
        .position(|(_, id)| *id == player.id)
        .map(|i| i as u32 + 1)
        .or(player.rank)
}

/// Apply QB tiering for NFL leagues; non-QB players pass through unchanged.
pub fn apply_qb_tier(
    sum: f64,
    player: &Player,
    all_players: &[Player],
    league: &LeagueContext,
) -> f64 {
    if league.sport != Sport::Nfl {
        return sum;
    }
    if player.info.resolved_position() != Some("QB") {
        return sum;
    }
    let table = qb_tier_table(league.format, league.flex);
    sum * qb_tier_multiplier(&table, qb_position_rank(player, all_players))
}

// ---------------------------------------------------------------------------
// Full Step B pipeline
// ---------------------------------------------------------------------------

/// Run the full adjustment pipeline over a raw weighted sum.
pub fn adjusted_sum(
    raw_sum: f64,
    player: &Player,
    all_players: &[Player],
    league: &LeagueContext,
) -> f64 {
    let sum = apply_age_adjustment(raw_sum, player, raw_sum, league);
    let sum = apply_ppr_adjustment(sum, player, league);
    apply_qb_tier(sum, player, all_players, league)
}

/// Sort players descending by final score, tie-break by id. Unscored
/// players sort after scored ones.
pub fn sort_by_score_desc(players: &mut [Player]) {
    players.sort_by(|a, b| {
        match (a.z_score_sum, b.z_score_sum) {
            (Some(sa), Some(sb)) => sb.partial_cmp(&sa).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| a.id.cmp(&b.id))
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
