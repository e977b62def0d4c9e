// Value over replacement player (VORP).
//
// A pure function of (player pool, pick history, configuration): every call
// recomputes baselines and rankings from scratch, so undo and reset never
// need any invalidation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::draft::pick::Position;
use crate::draft::roster::RosterTracker;
use crate::draft::state::DraftState;
use crate::injury::{HealthStatus, InjuryReport};
use crate::players::{Player, PlayerPool};
use crate::valuation::rating::RatingModel;

/// Baseline used for a position with no remaining players.
pub const DEFAULT_BASELINE: f64 = 80.0;

/// VORP assigned to a player the team cannot legally roster anywhere.
/// Sorts below every real value.
pub const INELIGIBLE_VORP: f64 = f64::NEG_INFINITY;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How deep into the remaining pool the replacement player sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BaselinePolicy {
    /// Depth = `starters * num_teams - drafted_at_position`.
    #[default]
    Dynamic,
    /// Fixed depth into the remaining players at each position.
    Static { depth: usize },
}

/// Baseline policy plus the fallback value for empty positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineSettings {
    pub policy: BaselinePolicy,
    pub default_baseline: f64,
}

impl Default for BaselineSettings {
    fn default() -> Self {
        BaselineSettings {
            policy: BaselinePolicy::Dynamic,
            default_baseline: DEFAULT_BASELINE,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One undrafted player's value from a given team's point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer {
    pub name: String,
    pub club: String,
    pub positions: Vec<Position>,
    pub rating: f64,
    /// [`INELIGIBLE_VORP`] when `best_position` is `None`.
    pub vorp: f64,
    pub best_position: Option<Position>,
    pub health: HealthStatus,
}

impl RankedPlayer {
    pub fn is_eligible(&self) -> bool {
        self.best_position.is_some()
    }
}

/// Replacement level and the depth it was taken at, for one position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub value: f64,
    /// 1-based rank of the replacement player among remaining eligible
    /// players. 0 when the position has no remaining players.
    pub depth: usize,
    /// Remaining players eligible at the position.
    pub supply: usize,
}

// ---------------------------------------------------------------------------
// Valuator
// ---------------------------------------------------------------------------

/// Borrowed view of everything the valuation reads.
pub struct Valuator<'a> {
    pool: &'a PlayerPool,
    state: &'a DraftState,
    rating: &'a dyn RatingModel,
    injuries: &'a InjuryReport,
    settings: BaselineSettings,
}

impl<'a> Valuator<'a> {
    pub fn new(
        pool: &'a PlayerPool,
        state: &'a DraftState,
        rating: &'a dyn RatingModel,
        injuries: &'a InjuryReport,
        settings: BaselineSettings,
    ) -> Self {
        Valuator {
            pool,
            state,
            rating,
            injuries,
            settings,
        }
    }

    fn rate(&self, player: &Player) -> f64 {
        self.rating.rate(player, self.injuries.get(&player.name))
    }

    /// Undrafted players paired with their rating, in pool order.
    fn rated_available(&self) -> Vec<(&'a Player, f64)> {
        self.pool
            .available(&self.state.history)
            .map(|p| (p, self.rate(p)))
            .collect()
    }

    /// League-wide players still needed at `position`, at least 1.
    pub fn remaining_demand(&self, position: Position) -> usize {
        let config = &self.state.config;
        let demand = config.roster.starters_for(position).saturating_mul(config.num_teams);
        let drafted = RosterTracker::new(&self.state.history).drafted_at(position);
        demand.saturating_sub(drafted).max(1) as usize
    }

    fn baseline_depth(&self, position: Position) -> usize {
        match self.settings.policy {
            BaselinePolicy::Dynamic => self.remaining_demand(position),
            BaselinePolicy::Static { depth } => depth.max(1),
        }
    }

    fn baselines_from(&self, rated: &[(&Player, f64)]) -> BTreeMap<Position, Baseline> {
        let mut baselines = BTreeMap::new();
        for position in Position::ALL {
            let mut ratings: Vec<f64> = rated
                .iter()
                .filter(|(p, _)| p.is_eligible(position))
                .map(|&(_, r)| r)
                .collect();
            ratings.sort_by(|a, b| b.total_cmp(a));

            let baseline = if ratings.is_empty() {
                Baseline {
                    value: self.settings.default_baseline,
                    depth: 0,
                    supply: 0,
                }
            } else {
                let depth = self.baseline_depth(position).min(ratings.len());
                Baseline {
                    value: ratings[depth - 1],
                    depth,
                    supply: ratings.len(),
                }
            };
            baselines.insert(position, baseline);
        }
        baselines
    }

    /// Replacement level at every position given the current history.
    pub fn baselines(&self) -> BTreeMap<Position, Baseline> {
        self.baselines_from(&self.rated_available())
    }

    /// Rank every undrafted player.
    ///
    /// With `team_id`, only positions that team can still legally fill count
    /// toward a player's VORP; without it every eligible position counts.
    pub fn rank(&self, team_id: Option<u32>) -> Vec<RankedPlayer> {
        let rated = self.rated_available();
        let baselines = self.baselines_from(&rated);
        let tracker = RosterTracker::new(&self.state.history);
        let roster = &self.state.config.roster;

        let mut ranked: Vec<RankedPlayer> = rated
            .iter()
            .map(|&(player, rating)| {
                let candidates = match team_id {
                    Some(team) => tracker.legal_positions(team, &player.positions, roster),
                    None => player.positions.clone(),
                };

                let mut best: Option<(Position, f64)> = None;
                for pos in candidates {
                    let value = rating - baselines[&pos].value;
                    // Strict comparison keeps the earlier listed position on ties.
                    if best.map_or(true, |(_, v)| value > v) {
                        best = Some((pos, value));
                    }
                }

                RankedPlayer {
                    name: player.name.clone(),
                    club: player.club.clone(),
                    positions: player.positions.clone(),
                    rating,
                    vorp: best.map_or(INELIGIBLE_VORP, |(_, v)| v),
                    best_position: best.map(|(pos, _)| pos),
                    health: self.injuries.status_for(&player.name),
                }
            })
            .collect();

        ranked.sort_by(compare_ranked);
        ranked
    }

    /// Highest-ranked player `team_id` may legally draft.
    pub fn best_for_team(&self, team_id: u32) -> Option<RankedPlayer> {
        self.rank(Some(team_id))
            .into_iter()
            .find(RankedPlayer::is_eligible)
    }

    /// Best legal position for one player from `team_id`'s point of view.
    pub fn best_position_for(&self, team_id: u32, player: &Player) -> Option<Position> {
        let baselines = self.baselines();
        let rating = self.rate(player);
        let tracker = RosterTracker::new(&self.state.history);
        let mut best: Option<(Position, f64)> = None;
        for pos in tracker.legal_positions(team_id, &player.positions, &self.state.config.roster) {
            let value = rating - baselines[&pos].value;
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((pos, value));
            }
        }
        best.map(|(pos, _)| pos)
    }

    /// Ratings of every remaining player eligible at `position`, highest first.
    pub fn remaining_ratings(&self, position: Position) -> Vec<f64> {
        let mut ratings: Vec<f64> = self
            .rated_available()
            .into_iter()
            .filter(|(p, _)| p.is_eligible(position))
            .map(|(_, r)| r)
            .collect();
        ratings.sort_by(|a, b| b.total_cmp(a));
        ratings
    }

    pub fn state(&self) -> &DraftState {
        self.state
    }
}

/// VORP descending, then rating descending, then name ascending.
pub fn compare_ranked(a: &RankedPlayer, b: &RankedPlayer) -> Ordering {
    b.vorp
        .total_cmp(&a.vorp)
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| a.name.cmp(&b.name))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
