// Error taxonomy for draft commands, persistence, and the injury feed.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::draft::pick::Position;

/// Errors raised by draft commands. Every variant except `Persistence` is
/// raised before the pick history is touched.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown player: {name}")]
    UnknownPlayer { name: String },

    #[error("{name} was already drafted at pick #{pick_number}")]
    PlayerAlreadyDrafted { name: String, pick_number: u32 },

    #[error("team {team_id} is full at {position}: {count} of {cap} slots used")]
    RosterFull {
        team_id: u32,
        position: Position,
        count: u32,
        cap: u32,
    },

    #[error("{name} is not eligible at {position}")]
    PositionNotEligible { name: String, position: Position },

    #[error("draft is complete after {total_picks} picks")]
    DraftComplete { total_picks: u32 },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl DraftError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Snapshot read/write failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

/// Failures from the external injury feed. Always recovered by the caller.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("injury feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("injury feed timed out after {0:?}")]
    Timeout(Duration),

    #[error("injury feed returned status {status}")]
    Status { status: u16 },

    #[error("malformed injury feed payload: {0}")]
    Malformed(String),

    #[error("injury feed disabled")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_full_message_names_team_and_position() {
        let err = DraftError::RosterFull {
            team_id: 3,
            position: Position::Def,
            count: 6,
            cap: 6,
        };
        let msg = err.to_string();
        assert!(msg.contains("team 3"));
        assert!(msg.contains("DEF"));
        assert!(msg.contains("6 of 6"));
    }

    #[test]
    fn persistence_error_converts_into_draft_error() {
        let err: DraftError = PersistenceError::corrupt("bad pick order").into();
        assert!(matches!(err, DraftError::Persistence(PersistenceError::Corrupt(_))));
        assert_eq!(err.to_string(), "corrupt snapshot: bad pick order");
    }
}
