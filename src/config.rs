// Settings loading and parsing (rankings.toml).
//
// Covers the two user-editable inputs the engine consumes: the league
// context (sport/format/scoring/ppr/flex) and per-category enablement and
// multipliers. Comparison-pool rule tables are static code (`pool`), not
// user configuration.

use crate::player::{category, LeagueContext};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse settings file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Category settings
// ---------------------------------------------------------------------------

/// Per-category user settings. Only enabled categories contribute to the
/// weighted sum; `multiplier` may be any positive real (the UI offers
/// discrete presets, the engine accepts arbitrary positive values).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CategorySetting {
    pub enabled: bool,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

impl Default for CategorySetting {
    fn default() -> Self {
        CategorySetting {
            enabled: true,
            multiplier: 1.0,
        }
    }
}

/// User-editable category configuration, keyed by category abbreviation.
/// `BTreeMap` keeps iteration deterministic across passes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CategorySettings {
    pub categories: BTreeMap<String, CategorySetting>,
}

impl CategorySettings {
    /// Build settings with the given categories enabled at multiplier 1.0.
    pub fn enabled(categories: &[&str]) -> Self {
        let categories = categories
            .iter()
            .map(|c| (c.to_string(), CategorySetting::default()))
            .collect();
        CategorySettings { categories }
    }

    /// Iterate enabled categories in key order.
    pub fn enabled_iter(&self) -> impl Iterator<Item = (&str, &CategorySetting)> {
        self.categories
            .iter()
            .filter(|(_, s)| s.enabled)
            .map(|(k, s)| (k.as_str(), s))
    }

    pub fn get(&self, category: &str) -> Option<&CategorySetting> {
        self.categories.get(category)
    }

    pub fn set(&mut self, category: &str, setting: CategorySetting) {
        self.categories.insert(category.to_string(), setting);
    }
}

// ---------------------------------------------------------------------------
// Assembled settings
// ---------------------------------------------------------------------------

/// Everything loaded from rankings.toml.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub league: LeagueContext,
    pub categories: CategorySettings,
}

impl Default for Settings {
    /// A standard NFL redraft points profile with the usual display
    /// categories enabled.
    fn default() -> Self {
        Settings {
            league: LeagueContext::default(),
            categories: CategorySettings::enabled(&[
                category::PPG,
                "OPG",
                "PR%",
                "YD%",
                category::RECEPTIONS,
                category::TARGETS,
            ]),
        }
    }
}

/// Raw deserialization target for the whole settings file.
#[derive(Debug, Deserialize)]
struct SettingsFile {
    league: LeagueContext,
    #[serde(default)]
    categories: CategorySettings,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate settings from a TOML file:
///
/// ```toml
/// [league]
/// sport = "nfl"
/// format = "redraft"
/// scoring = "points"
/// ppr = "full"
/// flex = "standard"
///
/// [categories.PPG]
/// enabled = true
/// multiplier = 1.5
/// ```
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let text = read_file(path)?;
    let file: SettingsFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let settings = Settings {
        league: file.league,
        categories: file.categories,
    };
    validate(&settings)?;
    Ok(settings)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    for (category, setting) in &settings.categories.categories {
        if !setting.multiplier.is_finite() || setting.multiplier <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: format!("categories.{}.multiplier", category),
                message: format!(
                    "multiplier must be a positive number, got {}",
                    setting.multiplier
                ),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{FlexSetting, Format, PprSetting, ScoringType, Sport};

    fn parse(text: &str) -> Result<Settings, ConfigError> {
        let file: SettingsFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("rankings.toml"),
            source: e,
        })?;
        let settings = Settings {
            league: file.league,
            categories: file.categories,
        };
        validate(&settings)?;
        Ok(settings)
    }

    #[test]
    fn parses_full_settings_file() {
        let settings = parse(
            r#"
            [league]
            sport = "nfl"
            format = "dynasty"
            scoring = "points"
            ppr = "half"
            flex = "superflex"

            [categories.PPG]
            enabled = true
            multiplier = 1.5

            [categories.OPG]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.league.sport, Sport::Nfl);
        assert_eq!(settings.league.format, Format::Dynasty);
        assert_eq!(settings.league.scoring, ScoringType::Points);
        assert_eq!(settings.league.ppr, PprSetting::Half);
        assert_eq!(settings.league.flex, FlexSetting::Superflex);

        let ppg = settings.categories.get("PPG").unwrap();
        assert!(ppg.enabled);
        assert_eq!(ppg.multiplier, 1.5);

        // Omitted multiplier defaults to 1.0.
        let opg = settings.categories.get("OPG").unwrap();
        assert!(!opg.enabled);
        assert_eq!(opg.multiplier, 1.0);
    }

    #[test]
    fn rejects_non_positive_multiplier() {
        let err = parse(
            r#"
            [league]
            sport = "nba"
            format = "redraft"
            scoring = "categories"
            ppr = "zero"
            flex = "standard"

            [categories.PTS]
            enabled = true
            multiplier = 0.0
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "categories.PTS.multiplier");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn enabled_iter_skips_disabled_categories() {
        let mut settings = CategorySettings::enabled(&["HR", "PTS", "SB"]);
        settings.set(
            "PTS",
            CategorySetting {
                enabled: false,
                multiplier: 1.0,
            },
        );
        let enabled: Vec<&str> = settings.enabled_iter().map(|(k, _)| k).collect();
        assert_eq!(enabled, vec!["HR", "SB"]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_settings(Path::new("/nonexistent/rankings.toml")).unwrap_err();
        match err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("rankings.toml"));
            }
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }
}
