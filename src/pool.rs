// Comparison pool selection.
//
// The pool is the reference population whose mean/stdev define every
// category z-score for a pass. It is rebuilt whenever sport, format, or the
// underlying player set changes; it is never cached across those changes.

use crate::player::{stat_at_path, Format, LeagueContext, Player, ScoringType, Sport};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// Rule types
// ---------------------------------------------------------------------------

/// Per-group cut for a positional pool rule. `sort_by` overrides the
/// rule-level sort path when present.
#[derive(Debug, Clone)]
pub struct GroupRule {
    pub key: &'static str,
    pub top_n: usize,
    pub sort_by: Option<String>,
}

/// How the comparison pool is cut from the full player universe for one
/// sport+format combination.
#[derive(Debug, Clone)]
pub enum PoolRule {
    /// Single top-N cut across all eligible players.
    Overall { sort_by: String, top_n: usize },
    /// Per-position-group top-N cuts, unioned. Groups are position-disjoint
    /// by construction, so no dedup is needed.
    Positional {
        sort_by: String,
        groups: Vec<GroupRule>,
        grouper: fn(&str) -> Option<&'static str>,
    },
}

// ---------------------------------------------------------------------------
// Static rule tables
// ---------------------------------------------------------------------------

fn nfl_group(position: &str) -> Option<&'static str> {
    match position {
        "QB" => Some("quarterbacks"),
        "RB" => Some("backs"),
        "WR" | "TE" => Some("receivers"),
        _ => None,
    }
}

fn nba_group(position: &str) -> Option<&'static str> {
    match position {
        "PG" | "SG" | "G" => Some("guards"),
        "SF" | "PF" | "F" => Some("forwards"),
        "C" => Some("centers"),
        _ => None,
    }
}

fn mlb_group(position: &str) -> Option<&'static str> {
    match position {
        "SP" | "RP" | "P" => Some("pitchers"),
        _ => Some("hitters"),
    }
}

/// Resolve the comparison-pool rule for a sport+format+scoring combination.
///
/// NBA dynasty and redraft share a single rule under categories scoring (the
/// pool definition is identical for both formats), so both remap to the same
/// entry. Returns `None` for combinations with no configured pool; callers
/// must treat that as "cannot compute z-scores this pass".
pub fn pool_rule_for(sport: Sport, format: Format, scoring: ScoringType) -> Option<PoolRule> {
    let ecr_path = match format {
        Format::Dynasty => "info.dynastyEcrRank",
        Format::Redraft => "info.redraftEcrRank",
    };

    match sport {
        Sport::Nfl => Some(PoolRule::Positional {
            sort_by: ecr_path.to_string(),
            groups: vec![
                GroupRule {
                    key: "quarterbacks",
                    top_n: 32,
                    sort_by: None,
                },
                GroupRule {
                    key: "backs",
                    top_n: 70,
                    sort_by: None,
                },
                GroupRule {
                    key: "receivers",
                    top_n: 110,
                    sort_by: None,
                },
            ],
            grouper: nfl_group,
        }),
        Sport::Nba => match scoring {
            // Dynasty and redraft collapse to the same categories pool.
            ScoringType::Categories => Some(PoolRule::Positional {
                sort_by: "info.redraftEcrRank".to_string(),
                groups: vec![
                    GroupRule {
                        key: "guards",
                        top_n: 60,
                        sort_by: None,
                    },
                    GroupRule {
                        key: "forwards",
                        top_n: 60,
                        sort_by: None,
                    },
                    GroupRule {
                        key: "centers",
                        top_n: 30,
                        sort_by: None,
                    },
                ],
                grouper: nba_group,
            }),
            ScoringType::Points => Some(PoolRule::Overall {
                sort_by: ecr_path.to_string(),
                top_n: 150,
            }),
        },
        Sport::Mlb => Some(PoolRule::Positional {
            sort_by: ecr_path.to_string(),
            groups: vec![
                GroupRule {
                    key: "hitters",
                    top_n: 160,
                    sort_by: None,
                },
                GroupRule {
                    key: "pitchers",
                    top_n: 140,
                    sort_by: None,
                },
            ],
            grouper: mlb_group,
        }),
    }
}

/// Convenience wrapper taking the full league context.
pub fn pool_rule(league: &LeagueContext) -> Option<PoolRule> {
    pool_rule_for(league.sport, league.format, league.scoring)
}

// ---------------------------------------------------------------------------
// Pool construction
// ---------------------------------------------------------------------------

/// Sort ascending by the pre-resolved sort value, tie-break by id.
fn sort_by_value_then_id(entries: &mut Vec<(f64, &Player)>) {
    entries.sort_by(|(va, a), (vb, b)| {
        va.partial_cmp(vb)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Build the comparison pool from the full player universe.
///
/// A player is eligible only with a non-null resolved position and a numeric
/// value at the rule's sort path; anyone failing either check is silently
/// excluded. An empty eligible set yields an empty pool.
pub fn build_comparison_pool<'a>(all_players: &'a [Player], rule: &PoolRule) -> Vec<&'a Player> {
    match rule {
        PoolRule::Overall { sort_by, top_n } => {
            let mut eligible: Vec<(f64, &Player)> = all_players
                .iter()
                .filter(|p| p.info.resolved_position().is_some())
                .filter_map(|p| stat_at_path(p, sort_by).map(|v| (v, p)))
                .filter(|(v, _)| v.is_finite())
                .collect();
            sort_by_value_then_id(&mut eligible);
            eligible.truncate(*top_n);
            let pool: Vec<&Player> = eligible.into_iter().map(|(_, p)| p).collect();
            debug!(pool_size = pool.len(), "built overall comparison pool");
            pool
        }
        PoolRule::Positional {
            sort_by,
            groups,
            grouper,
        } => {
            // Partition eligible players by group key; players whose grouper
            // result has no matching group entry are dropped.
            let mut by_group: BTreeMap<&'static str, Vec<&Player>> = BTreeMap::new();
            for player in all_players {
                let Some(position) = player.info.resolved_position() else {
                    continue;
                };
                let Some(key) = grouper(position) else {
                    continue;
                };
                if groups.iter().any(|g| g.key == key) {
                    by_group.entry(key).or_default().push(player);
                }
            }

            let mut pool: Vec<&Player> = Vec::new();
            for group in groups {
                let Some(members) = by_group.get(group.key) else {
                    continue;
                };
                let sort_path = group.sort_by.as_deref().unwrap_or(sort_by);
                let mut eligible: Vec<(f64, &Player)> = members
                    .iter()
                    .filter_map(|p| stat_at_path(p, sort_path).map(|v| (v, *p)))
                    .filter(|(v, _)| v.is_finite())
                    .collect();
                sort_by_value_then_id(&mut eligible);
                eligible.truncate(group.top_n);
                pool.extend(eligible.into_iter().map(|(_, p)| p));
            }
            debug!(pool_size = pool.len(), "built positional comparison pool");
            pool
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerInfo;

    fn player(id: &str, position: Option<&str>, redraft_rank: Option<f64>) -> Player {
        Player {
            id: id.into(),
            info: PlayerInfo {
                primary_position: position.map(String::from),
                redraft_ecr_rank: redraft_rank,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn overall_rule(top_n: usize) -> PoolRule {
        PoolRule::Overall {
            sort_by: "info.redraftEcrRank".into(),
            top_n,
        }
    }

    #[test]
    fn overall_pool_takes_top_n_ascending() {
        let players = vec![
            player("a", Some("WR"), Some(30.0)),
            player("b", Some("RB"), Some(5.0)),
            player("c", Some("QB"), Some(12.0)),
            player("d", Some("TE"), Some(50.0)),
        ];
        let pool = build_comparison_pool(&players, &overall_rule(2));
        let ids: Vec<&str> = pool.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn overall_pool_excludes_missing_position_and_sort_value() {
        let players = vec![
            player("a", None, Some(1.0)),
            player("b", Some("WR"), None),
            player("c", Some("RB"), Some(2.0)),
        ];
        let pool = build_comparison_pool(&players, &overall_rule(10));
        let ids: Vec<&str> = pool.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn overall_pool_tie_break_is_lexicographic_id() {
        let players = vec![
            player("zeta", Some("WR"), Some(7.0)),
            player("alpha", Some("WR"), Some(7.0)),
            player("mid", Some("WR"), Some(7.0)),
        ];
        let pool = build_comparison_pool(&players, &overall_rule(2));
        let ids: Vec<&str> = pool.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mid"]);
    }

    #[test]
    fn positional_pool_cuts_per_group() {
        let players = vec![
            player("pg1", Some("PG"), Some(1.0)),
            player("sg1", Some("SG"), Some(3.0)),
            player("sg2", Some("SG"), Some(9.0)),
            player("c1", Some("C"), Some(4.0)),
            player("c2", Some("C"), Some(2.0)),
            player("sf1", Some("SF"), Some(5.0)),
        ];
        let rule = PoolRule::Positional {
            sort_by: "info.redraftEcrRank".into(),
            groups: vec![
                GroupRule {
                    key: "guards",
                    top_n: 2,
                    sort_by: None,
                },
                GroupRule {
                    key: "centers",
                    top_n: 1,
                    sort_by: None,
                },
            ],
            grouper: nba_group,
        };
        let pool = build_comparison_pool(&players, &rule);
        let ids: Vec<&str> = pool.iter().map(|p| p.id.as_str()).collect();
        // sf1 is dropped: "forwards" has no group entry in this rule.
        assert_eq!(ids, vec!["pg1", "sg1", "c2"]);
    }

    #[test]
    fn positional_group_sort_by_overrides_rule_level() {
        let mut a = player("a", Some("QB"), Some(1.0));
        a.stats
            .insert("PPG".into(), crate::player::StatLine::from_value(10.0));
        let mut b = player("b", Some("QB"), Some(2.0));
        b.stats
            .insert("PPG".into(), crate::player::StatLine::from_value(5.0));
        let players = vec![a, b];

        let rule = PoolRule::Positional {
            sort_by: "info.redraftEcrRank".into(),
            groups: vec![GroupRule {
                key: "quarterbacks",
                top_n: 1,
                sort_by: Some("stats.PPG.value".into()),
            }],
            grouper: nfl_group,
        };
        let pool = build_comparison_pool(&players, &rule);
        // Ascending by PPG value: b (5.0) is selected first.
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].id, "b");
    }

    #[test]
    fn empty_universe_yields_empty_pool() {
        let pool = build_comparison_pool(&[], &overall_rule(10));
        assert!(pool.is_empty());
    }

    #[test]
    fn nba_categories_rule_is_format_independent() {
        let dynasty = pool_rule_for(Sport::Nba, Format::Dynasty, ScoringType::Categories);
        let redraft = pool_rule_for(Sport::Nba, Format::Redraft, ScoringType::Categories);
        let (Some(PoolRule::Positional { sort_by: a, .. }), Some(PoolRule::Positional { sort_by: b, .. })) =
            (dynasty, redraft)
        else {
            panic!("expected positional rules for NBA categories");
        };
        assert_eq!(a, b);
    }

    #[test]
    fn nfl_rule_sorts_by_format_specific_ecr() {
        let Some(PoolRule::Positional { sort_by, .. }) =
            pool_rule_for(Sport::Nfl, Format::Dynasty, ScoringType::Points)
        else {
            panic!("expected NFL positional rule");
        };
        assert_eq!(sort_by, "info.dynastyEcrRank");
    }
}
