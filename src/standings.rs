use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregate::{aggregate, Record};
use crate::competitor::{CompetitorId, Roster};
use crate::config::LeagueConfig;
use crate::ranking::{head_to_head_winner, resolve, Resolved};
use crate::schedule::Schedule;

/// Where a record leaves a competitor relative to the playoff cutoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Safe,
    Tied,
    Out,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Safe, Status::Tied, Status::Out];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Safe => "safe",
            Status::Tied => "tied",
            Status::Out => "out",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub competitor: CompetitorId,
    pub rank: usize,
    pub status: Status,
    pub wins: u32,
    pub losses: u32,
    /// Set when no tie-break level could separate this entry from a neighbour.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub irreducible: bool,
}

/// A complete league table: every competitor exactly once, best first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Standings {
    entries: Vec<RankedEntry>,
}

impl Standings {
    /// Run the full pipeline: aggregate, sort, break ties, assign status.
    pub fn compute(schedule: &Schedule, competitors: usize, config: &LeagueConfig) -> Self {
        let records = aggregate(schedule, competitors);
        let resolved = resolve(&records, config.recent_form_games);
        Self::assign(&records, &resolved, config.qualifying_slots)
    }

    /// Turn a resolved ordering into ranks and statuses.
    ///
    /// Everyone with the same win count as the first entry below the cutoff is
    /// tied, and tied entries share the best rank among them. The one
    /// exception is a pair straddling the cutoff whose direct meetings were
    /// won by the upper entry: that pair is split into safe and out.
    pub fn assign(records: &[Record], resolved: &Resolved, qualifying_slots: usize) -> Self {
        let order = resolved.order();
        let cutoff = qualifying_slots;

        let mut tied = vec![false; order.len()];
        if order.len() > cutoff {
            let boundary_wins = records[order[cutoff].index()].wins();
            for (i, id) in order.iter().enumerate() {
                tied[i] = records[id.index()].wins() == boundary_wins;
            }

            let tied_positions: Vec<usize> = (0..order.len()).filter(|&i| tied[i]).collect();
            if cutoff > 0
                && tied_positions == [cutoff - 1, cutoff]
                && head_to_head_winner(records, order[cutoff - 1], order[cutoff]) == Some(order[cutoff - 1])
            {
                tied[cutoff - 1] = false;
                tied[cutoff] = false;
            }
        }

        let first_tied = tied.iter().position(|&t| t).unwrap_or(0);
        let entries = order
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let record = &records[id.index()];
                let status = if tied[i] {
                    Status::Tied
                } else if i < cutoff {
                    Status::Safe
                } else {
                    Status::Out
                };
                RankedEntry {
                    competitor: id,
                    rank: if tied[i] { first_tied + 1 } else { i + 1 },
                    status,
                    wins: record.wins(),
                    losses: record.losses(),
                    irreducible: resolved.is_irreducible(id),
                }
            })
            .collect();

        Standings { entries }
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: CompetitorId) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.competitor == id)
    }

    pub fn status_of(&self, id: CompetitorId) -> Option<Status> {
        self.entry(id).map(|e| e.status)
    }

    /// Competitor ids in table order.
    pub fn order(&self) -> Vec<CompetitorId> {
        self.entries.iter().map(|e| e.competitor).collect()
    }

    /// Plain-text table, one line per entry.
    pub fn render(&self, roster: &Roster) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "{:>2}. {:<4} {}-{} {}",
                    e.rank,
                    roster.get(e.competitor).short,
                    e.wins,
                    e.losses,
                    e.status
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
