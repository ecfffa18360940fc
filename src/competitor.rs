use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{LeagueError, Result};

/// Index of a competitor in its [`Roster`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(pub usize);

impl CompetitorId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A league member: full name, short code and a logo reference for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub short: String,
    pub logo: String,
}

impl Competitor {
    pub fn new(name: impl Into<String>, short: impl Into<String>, logo: impl Into<String>) -> Self {
        Competitor {
            name: name.into(),
            short: short.into(),
            logo: logo.into(),
        }
    }
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.short)
    }
}

/// The fixed cohort of a league.
///
/// Ids are assigned in insertion order and never change. Former names of an
/// organisation can be registered as aliases so historical game records
/// resolve onto the current competitor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Roster {
    competitors: Vec<Competitor>,
    aliases: HashMap<String, String>,
}

impl Roster {
    pub fn new(competitors: Vec<Competitor>) -> Result<Self> {
        for (i, competitor) in competitors.iter().enumerate() {
            if competitors[..i].iter().any(|c| c.name == competitor.name) {
                return Err(LeagueError::DuplicateCompetitor(competitor.name.clone()));
            }
        }
        Ok(Roster {
            competitors,
            aliases: HashMap::new(),
        })
    }

    /// Register `alias` as a former name of the competitor called `target`.
    pub fn add_alias(&mut self, alias: &str, target: &str) -> Result<()> {
        if self.position(target).is_none() {
            return Err(LeagueError::UnknownAliasTarget {
                alias: alias.to_string(),
                target: target.to_string(),
            });
        }
        self.aliases.insert(alias.to_string(), target.to_string());
        Ok(())
    }

    /// Look a competitor up by current name or alias.
    pub fn resolve(&self, name: &str) -> Option<CompetitorId> {
        let name = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.position(name)
    }

    pub fn get(&self, id: CompetitorId) -> &Competitor {
        &self.competitors[id.0]
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = CompetitorId> {
        (0..self.competitors.len()).map(CompetitorId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CompetitorId, &Competitor)> {
        self.competitors
            .iter()
            .enumerate()
            .map(|(i, c)| (CompetitorId(i), c))
    }

    fn position(&self, name: &str) -> Option<CompetitorId> {
        self.competitors
            .iter()
            .position(|c| c.name == name)
            .map(CompetitorId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_roster() -> Roster {
        Roster::new(vec![
            Competitor::new("G2 Esports", "G2", "g2.png"),
            Competitor::new("Fnatic", "FNC", "fnc.png"),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_by_name() {
        let roster = make_roster();
        assert_eq!(roster.resolve("Fnatic"), Some(CompetitorId(1)));
        assert_eq!(roster.resolve("Misfits Gaming"), None);
    }

    #[test]
    fn test_resolve_alias() {
        let mut roster = make_roster();
        roster.add_alias("Fnatic Academy", "Fnatic").unwrap();
        assert_eq!(roster.resolve("Fnatic Academy"), Some(CompetitorId(1)));
        assert_eq!(roster.get(CompetitorId(1)).short, "FNC");
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = Roster::new(vec![
            Competitor::new("KOI", "KOI", ""),
            Competitor::new("KOI", "KOI2", ""),
        ])
        .unwrap_err();
        assert!(matches!(err, LeagueError::DuplicateCompetitor(name) if name == "KOI"));
    }

    #[test]
    fn test_display() {
        let roster = make_roster();
        assert_eq!(roster.get(CompetitorId(0)).to_string(), "G2 Esports (G2)");
    }
}
