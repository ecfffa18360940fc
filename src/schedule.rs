use serde::{Deserialize, Serialize};

use crate::competitor::{CompetitorId, Roster};
use crate::config::LeagueConfig;
use crate::error::{LeagueError, Result};

/// A game as delivered by the statistics feed: names plus tri-state result
/// flags. Unplayed games carry `None` on both sides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub home: String,
    pub away: String,
    pub home_won: Option<bool>,
    pub away_won: Option<bool>,
    /// Game length in minutes
    pub duration: f64,
}

impl GameRecord {
    pub fn played(home: &str, away: &str, home_won: bool, duration: f64) -> Self {
        GameRecord {
            home: home.to_string(),
            away: away.to_string(),
            home_won: Some(home_won),
            away_won: Some(!home_won),
            duration,
        }
    }

    pub fn unplayed(home: &str, away: &str) -> Self {
        GameRecord {
            home: home.to_string(),
            away: away.to_string(),
            home_won: None,
            away_won: None,
            duration: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

/// A validated game slot in the season schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: CompetitorId,
    pub away: CompetitorId,
    pub winner: Option<Side>,
    pub duration: f64,
}

impl Fixture {
    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn involves(&self, id: CompetitorId) -> bool {
        self.home == id || self.away == id
    }

    pub fn winner_id(&self) -> Option<CompetitorId> {
        self.winner.map(|side| match side {
            Side::Home => self.home,
            Side::Away => self.away,
        })
    }
}

/// The full season schedule in chronological order, played and unplayed games
/// alike. Positions are stable, so an undecided game is addressed by its index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    fixtures: Vec<Fixture>,
}

impl Schedule {
    /// Validate raw records against the roster.
    ///
    /// Every name must resolve (directly or through an alias), result flags
    /// must be complementary or both unset, and no competitor may be scheduled
    /// for more games than the league format allows.
    pub fn from_records(roster: &Roster, records: &[GameRecord], config: &LeagueConfig) -> Result<Self> {
        let mut scheduled = vec![0u32; roster.len()];
        let mut fixtures = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let home = resolve(roster, index, &record.home)?;
            let away = resolve(roster, index, &record.away)?;
            if home == away {
                return Err(LeagueError::SelfMatch {
                    index,
                    name: record.home.clone(),
                });
            }

            let winner = match (record.home_won, record.away_won) {
                (None, None) => None,
                (Some(true), Some(false)) => Some(Side::Home),
                (Some(false), Some(true)) => Some(Side::Away),
                (home_flag, away_flag) => {
                    return Err(LeagueError::InconsistentResult {
                        index,
                        home: home_flag,
                        away: away_flag,
                    })
                }
            };

            for id in [home, away] {
                scheduled[id.index()] += 1;
                if scheduled[id.index()] > config.games_per_competitor {
                    return Err(LeagueError::TooManyGames {
                        name: roster.get(id).name.clone(),
                        scheduled: scheduled[id.index()],
                        limit: config.games_per_competitor,
                    });
                }
            }

            fixtures.push(Fixture {
                home,
                away,
                winner,
                duration: record.duration,
            });
        }

        Ok(Schedule { fixtures })
    }

    pub fn from_fixtures(fixtures: Vec<Fixture>) -> Self {
        Schedule { fixtures }
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Indices of the undecided games, in schedule order.
    pub fn remaining(&self) -> Vec<usize> {
        self.fixtures
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_decided())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn decided_count(&self) -> usize {
        self.fixtures.iter().filter(|f| f.is_decided()).count()
    }

    /// Copy of this schedule with the given game slots decided.
    ///
    /// Hypothetical games keep the duration of their slot. Indices are taken
    /// as given, so they should come from [`remaining`](Self::remaining).
    ///
    /// # Panics
    /// If an index is past the end of the schedule.
    pub fn with_outcomes(&self, outcomes: impl IntoIterator<Item = (usize, Side)>) -> Schedule {
        let mut fixtures = self.fixtures.clone();
        for (index, side) in outcomes {
            fixtures[index].winner = Some(side);
        }
        Schedule { fixtures }
    }

    /// Copy of this schedule with one undecided game decided.
    pub fn decide(&self, game: usize, side: Side) -> Result<Schedule> {
        match self.fixtures.get(game) {
            Some(fixture) if !fixture.is_decided() => Ok(self.with_outcomes([(game, side)])),
            _ => Err(LeagueError::NotUndecided(game)),
        }
    }
}

fn resolve(roster: &Roster, index: usize, name: &str) -> Result<CompetitorId> {
    roster
        .resolve(name)
        .ok_or_else(|| LeagueError::UnknownCompetitor {
            index,
            name: name.to_string(),
        })
}
