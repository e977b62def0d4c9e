// Roster requirements and per-team position bookkeeping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::pick::{DraftHistory, Position};
use crate::error::DraftError;

/// Extra slots per position on top of the starters when no policy is given.
pub const DEFAULT_BENCH_EXTRA: u32 = 2;

/// Most players any single position may require or hold per team.
pub const MAX_PER_POSITION: u32 = 50;

/// How many bench slots each position gets beyond its starters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BenchPolicy {
    /// A fixed number of extra slots for every position.
    Flat { extra: u32 },
    /// A bench of `bench_size` shared across positions; each position may
    /// carry up to `bench_size / 2 + 1` of it.
    Shared { bench_size: u32 },
}

impl Default for BenchPolicy {
    fn default() -> Self {
        BenchPolicy::Flat {
            extra: DEFAULT_BENCH_EXTRA,
        }
    }
}

impl BenchPolicy {
    /// Bench allowance applied to a single position.
    pub fn allowance(&self) -> u32 {
        match *self {
            BenchPolicy::Flat { extra } => extra,
            BenchPolicy::Shared { bench_size } => bench_size / 2 + 1,
        }
    }
}

/// Starters per position, the bench policy, and optional absolute caps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRequirement {
    pub starters: BTreeMap<Position, u32>,
    #[serde(default)]
    pub bench: BenchPolicy,
    /// Absolute per-position ceilings that replace `starters + bench`
    /// (e.g. `RUC = 2`).
    #[serde(default)]
    pub caps: BTreeMap<Position, u32>,
}

impl Default for RosterRequirement {
    fn default() -> Self {
        RosterRequirement::new(4, 6, 1, 4)
    }
}

impl RosterRequirement {
    /// Starters for DEF/MID/RUC/FWD with the default bench policy.
    pub fn new(def: u32, mid: u32, ruc: u32, fwd: u32) -> Self {
        let starters = BTreeMap::from([
            (Position::Def, def),
            (Position::Mid, mid),
            (Position::Ruc, ruc),
            (Position::Fwd, fwd),
        ]);
        RosterRequirement {
            starters,
            bench: BenchPolicy::default(),
            caps: BTreeMap::new(),
        }
    }

    pub fn with_bench(mut self, bench: BenchPolicy) -> Self {
        self.bench = bench;
        self
    }

    pub fn with_cap(mut self, position: Position, cap: u32) -> Self {
        self.caps.insert(position, cap);
        self
    }

    /// Required on-field starters at `position` for one team.
    pub fn starters_for(&self, position: Position) -> u32 {
        self.starters.get(&position).copied().unwrap_or(0)
    }

    /// Maximum players one team may hold at `position`.
    pub fn cap_for(&self, position: Position) -> u32 {
        self.caps
            .get(&position)
            .copied()
            .unwrap_or_else(|| self.starters_for(position).saturating_add(self.bench.allowance()))
    }

    pub fn total_starters(&self) -> u32 {
        Position::ALL
            .iter()
            .fold(0u32, |total, &p| total.saturating_add(self.starters_for(p)))
    }

    /// Total players one team can roster across all positions.
    pub fn roster_size(&self) -> u32 {
        Position::ALL
            .iter()
            .fold(0u32, |total, &p| total.saturating_add(self.cap_for(p)))
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        for (&position, &starters) in &self.starters {
            if starters > MAX_PER_POSITION {
                return Err(DraftError::invalid_config(format!(
                    "{position} requires {starters} starters, above the limit of {MAX_PER_POSITION}"
                )));
            }
        }
        let allowance = self.bench.allowance();
        if allowance > MAX_PER_POSITION {
            return Err(DraftError::invalid_config(format!(
                "bench allowance {allowance} is above the limit of {MAX_PER_POSITION}"
            )));
        }
        if self.total_starters() == 0 {
            return Err(DraftError::invalid_config(
                "roster requires at least one starter",
            ));
        }
        for (&position, &cap) in &self.caps {
            let starters = self.starters_for(position);
            if cap > MAX_PER_POSITION {
                return Err(DraftError::invalid_config(format!(
                    "{position} cap {cap} is above the limit of {MAX_PER_POSITION}"
                )));
            }
            if cap < starters {
                return Err(DraftError::invalid_config(format!(
                    "{position} cap {cap} is below its {starters} required starters"
                )));
            }
        }
        Ok(())
    }
}

/// Read-only view over a pick history answering per-team position counts.
///
/// Borrows the history rather than caching counts, so it always reflects the
/// picks exactly as they stand.
#[derive(Debug, Clone, Copy)]
pub struct RosterTracker<'a> {
    history: &'a DraftHistory,
}

impl<'a> RosterTracker<'a> {
    pub fn new(history: &'a DraftHistory) -> Self {
        RosterTracker { history }
    }

    /// Players `team_id` has drafted into `position`.
    pub fn count_at(&self, team_id: u32, position: Position) -> u32 {
        self.history
            .team_picks(team_id)
            .filter(|p| p.position == position)
            .count() as u32
    }

    /// Per-position counts for one team, zero-filled for every position.
    pub fn team_counts(&self, team_id: u32) -> BTreeMap<Position, u32> {
        let mut counts: BTreeMap<Position, u32> =
            Position::ALL.iter().map(|&p| (p, 0)).collect();
        for pick in self.history.team_picks(team_id) {
            *counts.entry(pick.position).or_insert(0) += 1;
        }
        counts
    }

    /// Players drafted into `position` across the whole league.
    pub fn drafted_at(&self, position: Position) -> u32 {
        self.history
            .picks()
            .iter()
            .filter(|p| p.position == position)
            .count() as u32
    }

    pub fn team_total(&self, team_id: u32) -> u32 {
        self.history.team_picks(team_id).count() as u32
    }

    pub fn can_draft(&self, team_id: u32, position: Position, requirement: &RosterRequirement) -> bool {
        self.count_at(team_id, position) < requirement.cap_for(position)
    }

    /// Like [`can_draft`](Self::can_draft) but reports why a pick is refused.
    pub fn check_can_draft(
        &self,
        team_id: u32,
        position: Position,
        requirement: &RosterRequirement,
    ) -> Result<(), DraftError> {
        let count = self.count_at(team_id, position);
        let cap = requirement.cap_for(position);
        if count >= cap {
            return Err(DraftError::RosterFull {
                team_id,
                position,
                count,
                cap,
            });
        }
        Ok(())
    }

    /// The subset of `eligible` positions `team_id` can still fill.
    pub fn legal_positions(
        &self,
        team_id: u32,
        eligible: &[Position],
        requirement: &RosterRequirement,
    ) -> Vec<Position> {
        eligible
            .iter()
            .copied()
            .filter(|&pos| self.can_draft(team_id, pos, requirement))
            .collect()
    }

    /// Whether `team_id` has no room left at any position.
    pub fn is_team_full(&self, team_id: u32, requirement: &RosterRequirement) -> bool {
        Position::ALL
            .iter()
            .all(|&pos| !self.can_draft(team_id, pos, requirement))
    }
}
