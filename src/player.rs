// Domain types for the valuation engine: players, stat lines, and the
// sport/format/scoring enums that select the rule tables.
//
// Player records arrive from external systems as camelCase JSON documents
// (see `loader`), so the serde renames here define the ingestion contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// League context enums
// ---------------------------------------------------------------------------

/// Sport a ranking pass is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Nfl,
    Nba,
    Mlb,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Nfl => "nfl",
            Sport::Nba => "nba",
            Sport::Mlb => "mlb",
        }
    }
}

/// League format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Dynasty,
    Redraft,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Dynasty => "dynasty",
            Format::Redraft => "redraft",
        }
    }
}

/// How the league scores: fantasy-points totals or head-to-head categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringType {
    Points,
    Categories,
}

/// Points-per-reception setting for NFL leagues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PprSetting {
    Zero,
    Half,
    Full,
}

impl PprSetting {
    /// The per-reception scoring multiplier this setting represents.
    pub fn multiplier(&self) -> f64 {
        match self {
            PprSetting::Zero => 0.0,
            PprSetting::Half => 0.5,
            PprSetting::Full => 1.0,
        }
    }
}

/// Whether the league starts a superflex (QB-eligible flex) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexSetting {
    Standard,
    Superflex,
}

/// The per-pass engine configuration: everything the scoring pipeline needs
/// to select weight tables, adjustments, and comparison-pool rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueContext {
    pub sport: Sport,
    pub format: Format,
    pub scoring: ScoringType,
    pub ppr: PprSetting,
    pub flex: FlexSetting,
}

impl Default for LeagueContext {
    fn default() -> Self {
        LeagueContext {
            sport: Sport::Nfl,
            format: Format::Redraft,
            scoring: ScoringType::Points,
            ppr: PprSetting::Full,
            flex: FlexSetting::Standard,
        }
    }
}

// ---------------------------------------------------------------------------
// Category keys
// ---------------------------------------------------------------------------

/// Category abbreviations the engine reads by name (weight tables and the
/// PPR volume boosts). All other categories are opaque strings.
pub mod category {
    pub const PPG: &str = "PPG";
    pub const RECEPTIONS: &str = "REC";
    pub const TARGETS: &str = "TGT";
    pub const TARGET_SHARE: &str = "TS%";
}

// ---------------------------------------------------------------------------
// Stat lines
// ---------------------------------------------------------------------------

/// A single stat category's raw value and its z-score against the current
/// comparison pool. Either side may be absent: `value` when the provider has
/// no data for the player, `z_score` before a ranking pass has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(rename = "zScore", default)]
    pub z_score: Option<f64>,
}

impl StatLine {
    pub fn from_value(value: f64) -> Self {
        StatLine {
            value: Some(value),
            z_score: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Player identity
// ---------------------------------------------------------------------------

/// Identity and bio fields as supplied by external providers. Every field is
/// nullable at the wire level; consumers go through the `resolved_*` policy
/// methods instead of reading the raw fields where multiple sources overlap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub primary_position: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team_abbreviation: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub redraft_ecr_rank: Option<f64>,
    #[serde(default)]
    pub dynasty_ecr_rank: Option<f64>,
}

impl PlayerInfo {
    /// Display name resolution, in precedence order:
    /// `displayName`, `fullName`, `firstName lastName`.
    pub fn resolved_name(&self) -> Option<String> {
        if let Some(name) = &self.display_name {
            return Some(name.clone());
        }
        if let Some(name) = &self.full_name {
            return Some(name.clone());
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            _ => None,
        }
    }

    /// Position resolution: `primaryPosition`, then `position`.
    pub fn resolved_position(&self) -> Option<&str> {
        self.primary_position
            .as_deref()
            .or(self.position.as_deref())
    }

    /// Team resolution: `teamAbbreviation`, then `team`.
    pub fn resolved_team(&self) -> Option<&str> {
        self.team_abbreviation.as_deref().or(self.team.as_deref())
    }

    /// Age resolution: the provider-stated `age`, else years between
    /// `birthDate` and `as_of`. Returns `None` when neither is present.
    pub fn resolved_age(&self, as_of: NaiveDate) -> Option<f64> {
        if self.age.is_some() {
            return self.age;
        }
        let birth = self.birth_date?;
        let days = as_of.signed_duration_since(birth).num_days();
        if days < 0 {
            return None;
        }
        Some((days as f64 / 365.25).floor())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A per-sport athlete being scored. Constructed fresh for every ranking
/// pass; this crate never persists players.
///
/// `stats` is a `BTreeMap` so category iteration order is deterministic.
/// All tie-breaking elsewhere in the engine is by `id`, never by map order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub user_rank: Option<u32>,
    /// Overall positional ranking (1-based), supplied by the caller. Feeds
    /// QB tiering.
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub info: PlayerInfo,
    #[serde(default)]
    pub stats: BTreeMap<String, StatLine>,
    #[serde(default)]
    pub draft_mode_available: bool,
    /// Final scaled score in [5.0, 99.9]. `None` until a scoring pass runs,
    /// and left `None` when a pass degrades (empty pool, internal error).
    #[serde(rename = "zScoreSum", default, skip_serializing_if = "Option::is_none")]
    pub z_score_sum: Option<f64>,
}

impl Player {
    /// Raw stat value for a category key, if present and numeric.
    pub fn stat_value(&self, category: &str) -> Option<f64> {
        self.stats.get(category).and_then(|s| s.value)
    }

    /// Pre-computed z-score for a category key, if present.
    pub fn stat_zscore(&self, category: &str) -> Option<f64> {
        self.stats.get(category).and_then(|s| s.z_score)
    }
}

// ---------------------------------------------------------------------------
// Dotted stat paths
// ---------------------------------------------------------------------------

/// Resolve a dotted stat path against a player.
///
/// Supported shapes:
/// - `stats.<CAT>.value` / `stats.<CAT>.zScore`
/// - `info.redraftEcrRank`, `info.dynastyEcrRank`, `info.age`
///
/// Unknown paths and missing values both resolve to `None`; path resolution
/// is never an error condition.
pub fn stat_at_path(player: &Player, path: &str) -> Option<f64> {
    let mut parts = path.split('.');
    match parts.next()? {
        "stats" => {
            let category = parts.next()?;
            let field = parts.next()?;
            let line = player.stats.get(category)?;
            match field {
                "value" => line.value,
                "zScore" => line.z_score,
                _ => None,
            }
        }
        "info" => match parts.next()? {
            "redraftEcrRank" => player.info.redraft_ecr_rank,
            "dynastyEcrRank" => player.info.dynasty_ecr_rank,
            "age" => player.info.age,
            _ => None,
        },
        _ => None,
    }
}

/// Maps a category abbreviation to the dotted path of its stat record.
///
/// Supplied by the caller; the engine treats the mapping as opaque. The
/// returned path addresses the stat record itself (e.g. `stats.PPG`); the
/// engine appends `.value` / `.zScore` as needed.
pub trait StatPathResolver {
    fn stat_path(&self, category: &str, sport: Sport, format: Format) -> Option<String>;
}

/// Default mapping: category `C` lives at `stats.C` for every sport/format.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStatPaths;

impl StatPathResolver for DefaultStatPaths {
    fn stat_path(&self, category: &str, _sport: Sport, _format: Format) -> Option<String> {
        Some(format!("stats.{}", category))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
