//! Cross-split summaries: how often a competitor's record has been good enough.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::competitor::CompetitorId;
use crate::scenarios::tally;
use crate::standings::Standings;

pub const SPLIT_NAMES: [&str; 2] = ["Spring", "Summer"];

/// Identifies one half of a split, e.g. `2021/Summer/2`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SplitLabel {
    pub year: u16,
    pub split: String,
    pub half: u8,
}

impl SplitLabel {
    pub fn new(year: u16, split: &str, half: u8) -> Self {
        SplitLabel {
            year,
            split: split.to_string(),
            half,
        }
    }

    /// Every split half from `first` to `last` inclusive, in calendar order.
    pub fn seasons(first: u16, last: u16) -> Vec<SplitLabel> {
        let mut labels = Vec::new();
        for year in first..=last {
            for split in SPLIT_NAMES {
                for half in [1, 2] {
                    labels.push(SplitLabel::new(year, split, half));
                }
            }
        }
        labels
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.split, self.half)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitStandings {
    pub label: SplitLabel,
    pub standings: Standings,
}

/// Whole-number percentages of splits a competitor finished safe, tied or out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub competitor: CompetitorId,
    pub splits: usize,
    pub safe: f64,
    pub tied: f64,
    pub out: f64,
}

/// Share as a percentage, rounded to whole percent.
pub fn percentage(share: f64) -> f64 {
    (share * 100.0).round()
}

pub fn summarize(history: &[SplitStandings], competitors: usize) -> Vec<StatusSummary> {
    tally(history.iter().map(|s| &s.standings), competitors)
        .into_iter()
        .map(|odds| StatusSummary {
            competitor: odds.competitor,
            splits: odds.scenarios,
            safe: percentage(odds.safe),
            tied: percentage(odds.tied),
            out: percentage(odds.out),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::schedule::{Fixture, Schedule, Side};

    fn ladder(order: &[usize]) -> Standings {
        // order[0] beats everyone, order[1] everyone but order[0], ...
        let mut fixtures = Vec::new();
        for (i, &a) in order.iter().enumerate() {
            for &b in &order[i + 1..] {
                fixtures.push(Fixture {
                    home: CompetitorId(a),
                    away: CompetitorId(b),
                    winner: Some(Side::Home),
                    duration: 30.0,
                });
            }
        }
        Standings::compute(&Schedule::from_fixtures(fixtures), order.len(), &LeagueConfig::default())
    }

    #[test]
    fn test_seasons() {
        let labels = SplitLabel::seasons(2019, 2022);
        assert_eq!(labels.len(), 16);
        assert_eq!(labels[0].to_string(), "2019/Spring/1");
        assert_eq!(labels[3].to_string(), "2019/Summer/2");
        assert_eq!(labels[15].to_string(), "2022/Summer/2");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1.0 / 3.0), 33.0);
        assert_eq!(percentage(0.0), 0.0);
        assert_eq!(percentage(0.875), 88.0);
    }

    #[test]
    fn test_summarize() {
        let history = vec![
            SplitStandings {
                label: SplitLabel::new(2020, "Spring", 1),
                standings: ladder(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
            },
            SplitStandings {
                label: SplitLabel::new(2020, "Spring", 2),
                standings: ladder(&[9, 1, 2, 3, 4, 5, 6, 7, 8, 0]),
            },
            SplitStandings {
                label: SplitLabel::new(2020, "Summer", 1),
                standings: ladder(&[1, 2, 3, 4, 5, 6, 7, 0, 9, 8]),
            },
            SplitStandings {
                label: SplitLabel::new(2020, "Summer", 2),
                standings: ladder(&[1, 2, 3, 4, 5, 6, 7, 9, 0, 8]),
            },
        ];
        let summary = summarize(&history, 10);

        assert_eq!(summary[0].splits, 4);
        // first, last, eighth, ninth
        assert_eq!((summary[0].safe, summary[0].tied, summary[0].out), (50.0, 25.0, 25.0));
        assert_eq!(summary[1].safe, 100.0);
        for s in &summary {
            assert_eq!(s.safe + s.tied + s.out, 100.0);
        }
    }
}
