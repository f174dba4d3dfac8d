// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod config;
pub mod loader;
pub mod player;
pub mod pool;
pub mod scoring;
pub mod zscore;

pub use config::{CategorySetting, CategorySettings, Settings};
pub use player::{
    DefaultStatPaths, FlexSetting, Format, LeagueContext, Player, PlayerInfo, PprSetting,
    ScoringType, Sport, StatLine, StatPathResolver,
};
pub use scoring::{rank_players, score_players};
