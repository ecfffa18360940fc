use serde::{Deserialize, Serialize};

use crate::competitor::CompetitorId;
use crate::schedule::{Schedule, Side};

/// One decided game from a competitor's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub opponent: CompetitorId,
    pub won: bool,
    pub duration: f64,
}

/// A competitor's decided games in chronological order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub games: Vec<GameResult>,
}

impl Record {
    pub fn played(&self) -> u32 {
        self.games.len() as u32
    }

    pub fn wins(&self) -> u32 {
        self.games.iter().filter(|g| g.won).count() as u32
    }

    pub fn losses(&self) -> u32 {
        self.games.iter().filter(|g| !g.won).count() as u32
    }

    /// Wins among the most recent `window` games.
    pub fn recent_wins(&self, window: usize) -> u32 {
        let start = self.games.len().saturating_sub(window);
        self.games[start..].iter().filter(|g| g.won).count() as u32
    }

    /// Summed length of all won games, in minutes.
    pub fn victory_time(&self) -> f64 {
        self.games.iter().filter(|g| g.won).map(|g| g.duration).sum()
    }

    /// Wins against any competitor in `opponents`.
    pub fn wins_against(&self, opponents: &[CompetitorId]) -> u32 {
        self.games
            .iter()
            .filter(|g| g.won && opponents.contains(&g.opponent))
            .count() as u32
    }

    /// (wins, losses) against a single opponent.
    pub fn head_to_head(&self, opponent: CompetitorId) -> (u32, u32) {
        self.games
            .iter()
            .filter(|g| g.opponent == opponent)
            .fold((0, 0), |(w, l), g| if g.won { (w + 1, l) } else { (w, l + 1) })
    }
}

/// Fold the decided games of a schedule into one record per competitor.
///
/// Records are indexed by [`CompetitorId`]; undecided games are skipped.
pub fn aggregate(schedule: &Schedule, competitors: usize) -> Vec<Record> {
    let mut records = vec![Record::default(); competitors];
    for fixture in schedule.fixtures() {
        let Some(winner) = fixture.winner else {
            continue;
        };
        let home_won = winner == Side::Home;
        records[fixture.home.index()].games.push(GameResult {
            opponent: fixture.away,
            won: home_won,
            duration: fixture.duration,
        });
        records[fixture.away.index()].games.push(GameResult {
            opponent: fixture.home,
            won: !home_won,
            duration: fixture.duration,
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Fixture;

    fn fixture(home: usize, away: usize, winner: Option<Side>, duration: f64) -> Fixture {
        Fixture {
            home: CompetitorId(home),
            away: CompetitorId(away),
            winner,
            duration,
        }
    }

    #[test]
    fn test_aggregate_symmetric() {
        let schedule = Schedule::from_fixtures(vec![
            fixture(0, 1, Some(Side::Home), 30.0),
            fixture(1, 2, Some(Side::Away), 25.0),
            fixture(0, 2, None, 0.0),
        ]);
        let records = aggregate(&schedule, 3);

        assert_eq!((records[0].wins(), records[0].losses()), (1, 0));
        assert_eq!((records[1].wins(), records[1].losses()), (0, 2));
        assert_eq!((records[2].wins(), records[2].losses()), (1, 0));

        let total_wins: u32 = records.iter().map(Record::wins).sum();
        let total_losses: u32 = records.iter().map(Record::losses).sum();
        assert_eq!(total_wins as usize, schedule.decided_count());
        assert_eq!(total_losses as usize, schedule.decided_count());
    }

    #[test]
    fn test_chronological_order_preserved() {
        let schedule = Schedule::from_fixtures(vec![
            fixture(0, 1, Some(Side::Away), 30.0),
            fixture(0, 2, Some(Side::Home), 40.0),
            fixture(0, 3, Some(Side::Home), 20.0),
        ]);
        let records = aggregate(&schedule, 4);
        let opponents: Vec<_> = records[0].games.iter().map(|g| g.opponent.index()).collect();
        assert_eq!(opponents, vec![1, 2, 3]);
        assert_eq!(records[0].recent_wins(2), 2);
        assert_eq!(records[0].recent_wins(10), 2);
        assert!((records[0].victory_time() - 60.0).abs() < 1e-10);
    }

    #[test]
    fn test_head_to_head() {
        let schedule = Schedule::from_fixtures(vec![
            fixture(0, 1, Some(Side::Home), 30.0),
            fixture(1, 0, Some(Side::Home), 30.0),
            fixture(0, 1, Some(Side::Away), 30.0),
        ]);
        let records = aggregate(&schedule, 2);
        assert_eq!(records[0].head_to_head(CompetitorId(1)), (1, 2));
        assert_eq!(records[1].wins_against(&[CompetitorId(0)]), 2);
    }
}
