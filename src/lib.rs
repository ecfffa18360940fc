//! League Core - standings, tie-breaks and playoff odds for round-robin leagues.
//!
//! The pipeline folds a chronological game list into per-competitor records,
//! orders them by record, breaks ties (head-to-head, Strength-of-Victory,
//! victory time) and labels every competitor safe, tied or out relative to
//! the playoff cutoff. On top of that sit an exhaustive scenario enumerator
//! over the remaining games and a closed-form binomial estimator.
//!
//! Python bindings are available behind the `python` feature.

pub mod aggregate;
pub mod competitor;
pub mod config;
pub mod constants;
pub mod error;
pub mod estimator;
pub mod history;
pub mod league;
pub mod ranking;
pub mod scenarios;
pub mod schedule;
pub mod standings;

#[cfg(feature = "python")]
mod python;

pub use aggregate::{aggregate, GameResult, Record};
pub use competitor::{Competitor, CompetitorId, Roster};
pub use config::{LeagueConfig, RosterConfig};
pub use constants::{GAMES_PER_COMPETITOR, MAX_EXHAUSTIVE_GAMES, QUALIFYING_SLOTS, RECENT_FORM_GAMES};
pub use error::{LeagueError, Result};
pub use estimator::{estimate, qualification_chance, ChanceEstimate, Thresholds};
pub use history::{summarize, SplitLabel, SplitStandings, StatusSummary};
pub use league::League;
pub use ranking::{resolve, Resolution, Resolved};
pub use scenarios::{sample_odds, ScenarioSet, Selection, StatusOdds};
pub use schedule::{Fixture, GameRecord, Schedule, Side};
pub use standings::{RankedEntry, Standings, Status};
