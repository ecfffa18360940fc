use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or evaluating a league.
///
/// Roster and schedule errors are fatal for the computation that hit them.
/// Ties that no tie-break level can order are not errors; they are reported
/// on the resulting table instead.
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("game {index} names unknown competitor {name:?}")]
    UnknownCompetitor { index: usize, name: String },

    #[error("alias {alias:?} points at unknown competitor {target:?}")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("competitor {0:?} appears twice in the roster")]
    DuplicateCompetitor(String),

    #[error("game {index} has inconsistent result flags (home: {home:?}, away: {away:?})")]
    InconsistentResult {
        index: usize,
        home: Option<bool>,
        away: Option<bool>,
    },

    #[error("game {index} pits {name:?} against itself")]
    SelfMatch { index: usize, name: String },

    #[error("{name:?} is scheduled for {scheduled} games, more than the {limit} allowed")]
    TooManyGames {
        name: String,
        scheduled: u32,
        limit: u32,
    },

    #[error("{remaining} undecided games exceed the exhaustive limit of {limit}")]
    TooManyRemainingGames { remaining: usize, limit: usize },

    #[error("scenario key {key:?} is not a {width}-digit binary string")]
    InvalidScenarioKey { key: String, width: usize },

    #[error("prefix {prefix:?} does not fit {width} remaining games")]
    InvalidPrefix { prefix: String, width: usize },

    #[error("game {0} is not one of the undecided games of this scenario set")]
    UnknownFixedGame(usize),

    #[error("game {0} is not an undecided game of this schedule")]
    NotUndecided(usize),

    #[error("scenario artifact lists competitor {competitor} but covers only {competitors}")]
    ArtifactCompetitor { competitor: usize, competitors: usize },

    #[error("invalid config field `{field}`: {message}")]
    InvalidConfig { field: &'static str, message: String },

    #[error("failed to read config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to (de)serialize scenario artifact: {0}")]
    Artifact(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LeagueError>;
