use tracing::{debug, warn};

use crate::aggregate::{aggregate, Record};
use crate::competitor::{CompetitorId, Roster};
use crate::config::LeagueConfig;
use crate::error::Result;
use crate::estimator::{estimate, ChanceEstimate, Thresholds};
use crate::scenarios::{sample_odds, ScenarioSet, StatusOdds};
use crate::schedule::{GameRecord, Schedule, Side};
use crate::standings::Standings;

/// A league season: roster, format and the schedule so far.
#[derive(Clone, Debug)]
pub struct League {
    roster: Roster,
    config: LeagueConfig,
    schedule: Schedule,
}

impl League {
    /// Validate the config and game records and build the season.
    pub fn new(roster: Roster, config: LeagueConfig, records: &[GameRecord]) -> Result<Self> {
        config.validate()?;
        let schedule = Schedule::from_records(&roster, records, &config)?;
        debug!(
            games = schedule.len(),
            decided = schedule.decided_count(),
            "league schedule loaded"
        );
        Ok(League {
            roster,
            config,
            schedule,
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Current table.
    pub fn standings(&self) -> Standings {
        let standings = Standings::compute(&self.schedule, self.roster.len(), &self.config);
        for entry in standings.entries().iter().filter(|e| e.irreducible) {
            warn!(
                competitor = %self.roster.get(entry.competitor).name,
                rank = entry.rank,
                "irreducible tie in current standings"
            );
        }
        standings
    }

    pub fn records(&self) -> Vec<Record> {
        aggregate(&self.schedule, self.roster.len())
    }

    /// Exhaustive scenario set over the undecided games.
    pub fn scenarios(&self) -> Result<ScenarioSet> {
        ScenarioSet::enumerate(&self.schedule, self.roster.len(), &self.config)
    }

    /// Status odds: exact when the remaining games can be enumerated,
    /// otherwise sampled from `samples` simulated seasons.
    pub fn odds(&self, samples: usize, seed: Option<u64>) -> Result<Vec<StatusOdds>> {
        if self.schedule.remaining().len() <= self.config.max_exhaustive_games {
            Ok(self.scenarios()?.all().odds())
        } else {
            Ok(sample_odds(
                &self.schedule,
                self.roster.len(),
                &self.config,
                samples,
                seed,
            ))
        }
    }

    /// Closed-form chances for one competitor, `None` for an id outside the
    /// roster.
    pub fn estimate(&self, id: CompetitorId, thresholds: Thresholds) -> Option<ChanceEstimate> {
        let records = self.records();
        let record = records.get(id.index())?;
        Some(estimate(
            record.wins(),
            record.played(),
            thresholds,
            self.config.games_per_competitor,
        ))
    }

    /// Create a modified copy with one more game decided.
    ///
    /// Fails with [`NotUndecided`](crate::error::LeagueError::NotUndecided)
    /// unless `game` indexes an unplayed game.
    pub fn with_outcome(&self, game: usize, side: Side) -> Result<Self> {
        Ok(League {
            roster: self.roster.clone(),
            config: self.config.clone(),
            schedule: self.schedule.decide(game, side)?,
        })
    }
}
