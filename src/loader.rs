// Player document ingestion.
//
// Upstream systems hand the engine an array of camelCase JSON documents
// (one per player). Deserialization is tolerant: unknown fields are
// ignored, nullable fields stay `None`, and missing ages are resolved from
// birth dates once at load time rather than ad hoc per pass.

use crate::player::Player;
use chrono::NaiveDate;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed player JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse a JSON array of player documents.
///
/// Players without an id are dropped with a warning; they cannot take part
/// in deterministic tie-breaking.
pub fn players_from_json(text: &str) -> Result<Vec<Player>, LoadError> {
    let players: Vec<Player> = serde_json::from_str(text)?;
    let (players, dropped): (Vec<Player>, Vec<Player>) =
        players.into_iter().partition(|p| !p.id.is_empty());
    if !dropped.is_empty() {
        warn!(count = dropped.len(), "dropped player documents with empty id");
    }
    Ok(players)
}

/// Parse player documents and resolve each player's age as of the given
/// date (stated age wins; otherwise computed from the birth date).
pub fn players_from_json_as_of(text: &str, as_of: NaiveDate) -> Result<Vec<Player>, LoadError> {
    let mut players = players_from_json(text)?;
    for player in &mut players {
        player.info.age = player.info.resolved_age(as_of);
    }
    Ok(players)
}

/// Load player documents from a file.
pub fn load_players(path: &Path) -> Result<Vec<Player>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    players_from_json(&text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"
    [
        {
            "id": "p-100",
            "rank": 4,
            "userRank": 7,
            "info": {
                "providerId": "ext-100",
                "fullName": "Test Receiver",
                "primaryPosition": "WR",
                "teamAbbreviation": "MIN",
                "age": 26,
                "redraftEcrRank": 4
            },
            "stats": {
                "PPG": { "value": 17.9, "zScore": null },
                "REC": { "value": 103 }
            },
            "draftModeAvailable": true,
            "extraneousField": { "ignored": true }
        },
        {
            "id": "p-101",
            "info": {
                "fullName": "Sparse Player",
                "birthDate": "2002-03-01"
            }
        }
    ]
    "#;

    #[test]
    fn parses_external_document_shape() {
        let players = players_from_json(DOCUMENT).unwrap();
        assert_eq!(players.len(), 2);

        let wr = &players[0];
        assert_eq!(wr.id, "p-100");
        assert_eq!(wr.rank, Some(4));
        assert_eq!(wr.user_rank, Some(7));
        assert_eq!(wr.info.resolved_position(), Some("WR"));
        assert_eq!(wr.info.resolved_team(), Some("MIN"));
        assert_eq!(wr.stat_value("PPG"), Some(17.9));
        assert!(wr.stat_zscore("PPG").is_none());
        assert_eq!(wr.stat_value("REC"), Some(103.0));
        assert!(wr.draft_mode_available);
        assert!(wr.z_score_sum.is_none());

        let sparse = &players[1];
        assert!(sparse.info.primary_position.is_none());
        assert!(sparse.stats.is_empty());
        assert!(!sparse.draft_mode_available);
    }

    #[test]
    fn age_resolved_at_load_time() {
        let as_of = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let players = players_from_json_as_of(DOCUMENT, as_of).unwrap();
        // Stated age wins.
        assert_eq!(players[0].info.age, Some(26.0));
        // Birth-date fallback fills missing ages.
        assert_eq!(players[1].info.age, Some(24.0));
    }

    #[test]
    fn empty_id_documents_are_dropped() {
        let players = players_from_json(r#"[{ "id": "" }, { "id": "ok" }]"#).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, "ok");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(players_from_json("{ not json").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_players(Path::new("/nonexistent/players.json")).unwrap_err();
        match err {
            LoadError::Io { path, .. } => assert!(path.contains("players.json")),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
