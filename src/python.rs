//! Python bindings, built with the `python` feature.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::competitor::{Competitor, Roster};
use crate::config::LeagueConfig;
use crate::constants::{GAMES_PER_COMPETITOR, MAX_EXHAUSTIVE_GAMES, QUALIFYING_SLOTS};
use crate::error::LeagueError;
use crate::estimator::qualification_chance;
use crate::league::League;
use crate::scenarios::StatusOdds;
use crate::schedule::GameRecord;

impl From<LeagueError> for PyErr {
    fn from(err: LeagueError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// A league season built from (name, short, logo) competitors and
/// (home, away, home_won, away_won, minutes) games.
#[pyclass(name = "League")]
pub struct PyLeague {
    inner: League,
}

#[pymethods]
impl PyLeague {
    #[new]
    #[pyo3(signature = (competitors, games, qualifying_slots = QUALIFYING_SLOTS, games_per_competitor = GAMES_PER_COMPETITOR))]
    fn new(
        competitors: Vec<(String, String, String)>,
        games: Vec<(String, String, Option<bool>, Option<bool>, f64)>,
        qualifying_slots: usize,
        games_per_competitor: u32,
    ) -> PyResult<Self> {
        let roster = Roster::new(
            competitors
                .into_iter()
                .map(|(name, short, logo)| Competitor::new(name, short, logo))
                .collect(),
        )?;
        let records: Vec<GameRecord> = games
            .into_iter()
            .map(|(home, away, home_won, away_won, duration)| GameRecord {
                home,
                away,
                home_won,
                away_won,
                duration,
            })
            .collect();
        let config = LeagueConfig {
            qualifying_slots,
            games_per_competitor,
            ..LeagueConfig::default()
        };
        Ok(PyLeague {
            inner: League::new(roster, config, &records)?,
        })
    }

    /// Current table as (name, rank, status) tuples.
    fn standings(&self) -> Vec<(String, usize, String)> {
        let roster = self.inner.roster();
        self.inner
            .standings()
            .entries()
            .iter()
            .map(|e| (roster.get(e.competitor).name.clone(), e.rank, e.status.to_string()))
            .collect()
    }

    /// Exact (name, safe, tied, out) odds over scenarios starting with `prefix`.
    #[pyo3(signature = (prefix = ""))]
    fn scenario_odds(&self, prefix: &str) -> PyResult<Vec<(String, f64, f64, f64)>> {
        let set = self.inner.scenarios()?;
        let odds = set.with_prefix(prefix)?.odds();
        Ok(self.named(odds))
    }

    /// Sampled odds for schedules too long to enumerate.
    #[pyo3(signature = (samples = 10_000, seed = None))]
    fn odds(&self, samples: usize, seed: Option<u64>) -> PyResult<Vec<(String, f64, f64, f64)>> {
        let odds = self.inner.odds(samples, seed)?;
        Ok(self.named(odds))
    }

    /// Scenario set serialized as JSON.
    fn scenarios_json(&self) -> PyResult<String> {
        Ok(self.inner.scenarios()?.to_json()?)
    }

    fn __repr__(&self) -> String {
        format!(
            "League({} competitors, {} games, {} undecided)",
            self.inner.roster().len(),
            self.inner.schedule().len(),
            self.inner.schedule().remaining().len()
        )
    }
}

impl PyLeague {
    fn named(&self, odds: Vec<StatusOdds>) -> Vec<(String, f64, f64, f64)> {
        let roster = self.inner.roster();
        odds.into_iter()
            .map(|o| (roster.get(o.competitor).name.clone(), o.safe, o.tied, o.out))
            .collect()
    }
}

/// Closed-form chance of reaching `threshold` wins.
#[pyfunction]
#[pyo3(signature = (wins, played, threshold, games_per_competitor = GAMES_PER_COMPETITOR))]
fn py_qualification_chance(wins: u32, played: u32, threshold: u32, games_per_competitor: u32) -> f64 {
    qualification_chance(wins, played, threshold, games_per_competitor)
}

/// Python module definition
#[pymodule]
fn league_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLeague>()?;
    m.add_function(wrap_pyfunction!(py_qualification_chance, m)?)?;

    m.add("GAMES_PER_COMPETITOR", GAMES_PER_COMPETITOR)?;
    m.add("QUALIFYING_SLOTS", QUALIFYING_SLOTS)?;
    m.add("MAX_EXHAUSTIVE_GAMES", MAX_EXHAUSTIVE_GAMES)?;

    Ok(())
}
