/// Games each competitor plays in a single round robin of ten
pub const GAMES_PER_COMPETITOR: u32 = 9;

/// Positions that qualify for the playoffs
pub const QUALIFYING_SLOTS: usize = 8;

/// Largest number of undecided games enumerated exhaustively (2^15 scenarios)
pub const MAX_EXHAUSTIVE_GAMES: usize = 15;

/// Window used by the recent-form key when a league enables it
pub const RECENT_FORM_GAMES: usize = 4;

/// Number of scenarios in an exhaustive enumeration of `remaining` games,
/// or `None` if it does not fit in a `usize`.
pub fn scenario_count(remaining: usize) -> Option<usize> {
    u32::try_from(remaining)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_count() {
        assert_eq!(scenario_count(0), Some(1));
        assert_eq!(scenario_count(MAX_EXHAUSTIVE_GAMES), Some(32768));
        assert_eq!(scenario_count(usize::BITS as usize), None);
    }
}
