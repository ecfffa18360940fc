//! Primary sort and tie-break resolution.
//!
//! Competitors are first ordered by record. Each group of identical records is
//! then broken by, in order:
//!
//! 1. head-to-head wins inside the group, recursing into every smaller sub-group
//!    that is still level (a two-member group uses its direct meetings);
//! 2. Strength-of-Victory, once head-to-head is circular for a whole group;
//! 3. total victory time, shortest first.
//!
//! Strength-of-Victory depends on placements, which depend on the resolution,
//! so [`resolve`] runs twice: once against placements taken from the primary
//! groups, then again against the placements of the first pass.

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use tracing::debug;

use crate::aggregate::Record;
use crate::competitor::CompetitorId;

/// Outcome of resolving one primary-sort group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    Single(CompetitorId),
    /// Members in resolved order. `unresolved` is set when some of them could
    /// not be separated by any tie-break level and keep their input order.
    Group {
        members: Vec<CompetitorId>,
        unresolved: bool,
    },
}

impl Resolution {
    pub fn members(&self) -> &[CompetitorId] {
        match self {
            Resolution::Single(id) => std::slice::from_ref(id),
            Resolution::Group { members, .. } => members,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Resolution::Group { unresolved: true, .. })
    }
}

/// Final ordering of a league table.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub resolutions: Vec<Resolution>,
    /// Sets of competitors left irreducibly tied, each in fallback order.
    pub irreducible: Vec<Vec<CompetitorId>>,
}

impl Resolved {
    pub fn order(&self) -> Vec<CompetitorId> {
        self.resolutions
            .iter()
            .flat_map(|r| r.members().iter().copied())
            .collect()
    }

    pub fn is_irreducible(&self, id: CompetitorId) -> bool {
        self.irreducible.iter().any(|set| set.contains(&id))
    }
}

/// Primary-sort key: competitors with games first, then wins descending,
/// losses ascending and, if enabled, recent wins descending.
fn compare_records(a: &Record, b: &Record, recent_form: Option<usize>) -> Ordering {
    let has_games = |r: &Record| r.played() > 0;
    has_games(b)
        .cmp(&has_games(a))
        .then(b.wins().cmp(&a.wins()))
        .then(a.losses().cmp(&b.losses()))
        .then_with(|| match recent_form {
            Some(window) => b.recent_wins(window).cmp(&a.recent_wins(window)),
            None => Ordering::Equal,
        })
}

/// Sort competitors by record and group identical records.
///
/// Ties keep roster order, which is the fallback for irreducible groups.
pub fn primary_groups(records: &[Record], recent_form: Option<usize>) -> Vec<Vec<CompetitorId>> {
    let mut ids: Vec<CompetitorId> = (0..records.len()).map(CompetitorId).collect();
    ids.sort_by(|a, b| compare_records(&records[a.index()], &records[b.index()], recent_form));

    let mut groups: Vec<Vec<CompetitorId>> = Vec::new();
    for id in ids {
        match groups.last_mut() {
            Some(group)
                if compare_records(&records[group[0].index()], &records[id.index()], recent_form)
                    == Ordering::Equal =>
            {
                group.push(id)
            }
            _ => groups.push(vec![id]),
        }
    }
    groups
}

/// 1-based table position of every competitor, indexed by id.
#[derive(Clone, Debug, PartialEq)]
pub struct Placements(Vec<usize>);

impl Placements {
    /// Provisional placements: every member of a group shares the group's
    /// best position.
    pub fn from_groups(groups: &[Vec<CompetitorId>]) -> Self {
        let total = groups.iter().map(Vec::len).sum();
        let mut positions = vec![0; total];
        let mut next = 1;
        for group in groups {
            for id in group {
                positions[id.index()] = next;
            }
            next += group.len();
        }
        Placements(positions)
    }

    pub fn from_order(order: &[CompetitorId]) -> Self {
        let mut positions = vec![0; order.len()];
        for (i, id) in order.iter().enumerate() {
            positions[id.index()] = i + 1;
        }
        Placements(positions)
    }

    pub fn position(&self, id: CompetitorId) -> usize {
        self.0[id.index()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Strength-of-Victory of one record.
///
/// A win over the competitor at position `p` of an `n`-entry table is worth
/// `n + 1 - p`, so beating the leader counts most.
pub fn strength_of_victory(record: &Record, placements: &Placements) -> u32 {
    let n = placements.len();
    record
        .games
        .iter()
        .filter(|g| g.won)
        .map(|g| (n + 1 - placements.position(g.opponent)) as u32)
        .sum()
}

/// Winner of the direct meetings between `a` and `b`, if they are decisive.
pub fn head_to_head_winner(records: &[Record], a: CompetitorId, b: CompetitorId) -> Option<CompetitorId> {
    let (wins, losses) = records[a.index()].head_to_head(b);
    match wins.cmp(&losses) {
        Ordering::Greater => Some(a),
        Ordering::Less => Some(b),
        Ordering::Equal => None,
    }
}

/// Victory time with a total order, so it can sit in a sort key.
#[derive(Clone, Copy, Debug)]
struct Minutes(f64);

impl PartialEq for Minutes {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Minutes {}

impl PartialOrd for Minutes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Minutes {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Stable sort of `group` by `key`, split into runs of equal keys.
fn partition_by<K: Ord>(group: &[CompetitorId], key: impl Fn(CompetitorId) -> K) -> Vec<Vec<CompetitorId>> {
    let mut keyed: Vec<(K, CompetitorId)> = group.iter().map(|&id| (key(id), id)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut tiers: Vec<(K, Vec<CompetitorId>)> = Vec::new();
    for (k, id) in keyed {
        match tiers.last_mut() {
            Some((last, members)) if *last == k => members.push(id),
            _ => tiers.push((k, vec![id])),
        }
    }
    tiers.into_iter().map(|(_, members)| members).collect()
}

/// Tie-break state for one resolution pass.
struct TieBreaker<'a> {
    records: &'a [Record],
    sov: Vec<u32>,
}

impl<'a> TieBreaker<'a> {
    fn new(records: &'a [Record], placements: &Placements) -> Self {
        let sov = records
            .iter()
            .map(|r| strength_of_victory(r, placements))
            .collect();
        TieBreaker { records, sov }
    }

    /// Order a group of equal records into tiers. A tier with more than one
    /// member is irreducible.
    ///
    /// Every recursive call works on a strictly smaller group, and the
    /// victory-based levels never recurse, so this always terminates.
    fn resolve(&self, group: &[CompetitorId]) -> Vec<Vec<CompetitorId>> {
        match group.len() {
            0 => Vec::new(),
            1 => vec![group.to_vec()],
            2 => match head_to_head_winner(self.records, group[0], group[1]) {
                Some(winner) => {
                    let loser = if winner == group[0] { group[1] } else { group[0] };
                    vec![vec![winner], vec![loser]]
                }
                None => self.by_victory(group),
            },
            _ => {
                let tiers = partition_by(group, |id| Reverse(self.records[id.index()].wins_against(group)));
                if tiers.len() == 1 {
                    debug!(size = group.len(), "circular head-to-head, escalating to strength of victory");
                    return self.by_victory(group);
                }
                tiers.iter().flat_map(|tier| self.resolve(tier)).collect()
            }
        }
    }

    fn by_victory(&self, group: &[CompetitorId]) -> Vec<Vec<CompetitorId>> {
        let tiers = partition_by(group, |id| {
            (
                Reverse(self.sov[id.index()]),
                Minutes(self.records[id.index()].victory_time()),
            )
        });
        for tier in tiers.iter().filter(|t| t.len() > 1) {
            debug!(members = ?tier, "group tied after every tie-break level");
        }
        tiers
    }
}

fn resolve_groups(groups: &[Vec<CompetitorId>], breaker: &TieBreaker<'_>) -> Resolved {
    let mut resolutions = Vec::with_capacity(groups.len());
    let mut irreducible = Vec::new();

    for group in groups {
        if let [id] = group.as_slice() {
            resolutions.push(Resolution::Single(*id));
            continue;
        }
        let tiers = breaker.resolve(group);
        let mut unresolved = false;
        for tier in tiers.iter().filter(|t| t.len() > 1) {
            unresolved = true;
            irreducible.push(tier.clone());
        }
        resolutions.push(Resolution::Group {
            members: tiers.into_iter().flatten().collect(),
            unresolved,
        });
    }

    Resolved {
        resolutions,
        irreducible,
    }
}

/// Resolve the full table ordering from per-competitor records.
pub fn resolve(records: &[Record], recent_form: Option<usize>) -> Resolved {
    let groups = primary_groups(records, recent_form);
    let provisional = Placements::from_groups(&groups);
    let first = resolve_groups(&groups, &TieBreaker::new(records, &provisional));
    let refined = Placements::from_order(&first.order());
    resolve_groups(&groups, &TieBreaker::new(records, &refined))
}
