use std::io;

use thiserror::Error;

/// Failures that end a play session.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("missing capability: {0}")]
    MissingCapability(&'static str),
    #[error("random source failure: {0}")]
    RandomSource(String),
    #[error("invalid board: {0}")]
    InvalidBoard(String),
    #[error("display error: {0}")]
    Display(#[from] io::Error),
}

/// Failures while reading or rewriting the record file.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt leaderboard record at byte {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },
    #[error("invalid player name {0:?}")]
    InvalidName(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
    #[error("config validation error: {0}")]
    Invalid(String),
}
