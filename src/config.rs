//! League and roster configuration, loaded from TOML.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::competitor::{Competitor, Roster};
use crate::constants::{GAMES_PER_COMPETITOR, MAX_EXHAUSTIVE_GAMES, QUALIFYING_SLOTS, RECENT_FORM_GAMES};
use crate::error::{LeagueError, Result};

/// Format of the regular phase: schedule length, playoff spots and how far the
/// scenario enumerator may go.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub games_per_competitor: u32,
    pub qualifying_slots: usize,
    pub max_exhaustive_games: usize,
    /// Wins over the last N games as an extra primary-sort key. Off unless set.
    pub recent_form_games: Option<usize>,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            games_per_competitor: GAMES_PER_COMPETITOR,
            qualifying_slots: QUALIFYING_SLOTS,
            max_exhaustive_games: MAX_EXHAUSTIVE_GAMES,
            recent_form_games: None,
        }
    }
}

impl LeagueConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: LeagueConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&read_config(path.as_ref())?)
    }

    /// Same format, with equal records also compared on the last four games.
    pub fn with_recent_form(self) -> Self {
        Self {
            recent_form_games: Some(RECENT_FORM_GAMES),
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.games_per_competitor == 0 {
            return Err(LeagueError::InvalidConfig {
                field: "games_per_competitor",
                message: "must be at least 1".to_string(),
            });
        }
        if self.qualifying_slots == 0 {
            return Err(LeagueError::InvalidConfig {
                field: "qualifying_slots",
                message: "must be at least 1".to_string(),
            });
        }
        // Scenario keys are indexed into a usize bitmask.
        if self.max_exhaustive_games >= usize::BITS as usize {
            return Err(LeagueError::InvalidConfig {
                field: "max_exhaustive_games",
                message: format!("must be below {}", usize::BITS),
            });
        }
        if self.recent_form_games == Some(0) {
            return Err(LeagueError::InvalidConfig {
                field: "recent_form_games",
                message: "window must cover at least one game".to_string(),
            });
        }
        Ok(())
    }
}

/// One `[[competitors]]` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub name: String,
    pub short: String,
    #[serde(default)]
    pub logo: String,
}

/// Roster file: the competitors plus former names that map onto them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    pub competitors: Vec<CompetitorEntry>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl RosterConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&read_config(path.as_ref())?)
    }

    /// Build the roster, checking names are unique and aliases point at a
    /// known competitor.
    pub fn into_roster(self) -> Result<Roster> {
        let competitors = self
            .competitors
            .into_iter()
            .map(|c| Competitor::new(c.name, c.short, c.logo))
            .collect();
        let mut roster = Roster::new(competitors)?;
        for (alias, target) in self.aliases {
            roster.add_alias(&alias, &target)?;
        }
        Ok(roster)
    }
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| LeagueError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })
}
