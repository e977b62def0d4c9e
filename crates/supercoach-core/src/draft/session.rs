// The draft command surface.
//
// Every mutating command is one atomic step: validate against the current
// history, append or remove, persist, return. Validation failures leave the
// history untouched; persistence failures are logged and never undo a
// command.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::pick::{DraftHistory, Pick, Position};
use super::roster::RosterTracker;
use super::state::{DraftConfig, DraftSnapshot, DraftState};
use crate::error::DraftError;
use crate::injury::InjuryReport;
use crate::players::{Player, PlayerPool};
use crate::store::SnapshotStore;
use crate::valuation::rating::{RatingModel, WeightedRating};
use crate::valuation::scarcity::{compute_scarcity, ScarcityEntry};
use crate::valuation::vorp::{Baseline, BaselineSettings, RankedPlayer, Valuator};

// ---------------------------------------------------------------------------
// Simulation results
// ---------------------------------------------------------------------------

/// Why a simulation run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStop {
    /// The target slot is on the clock.
    ReachedSlot,
    /// No undrafted players remain.
    PoolExhausted,
    /// The team on the clock cannot legally roster any remaining player.
    NoEligiblePlayer { team_id: u32 },
    /// Every roster is full.
    DraftComplete,
    /// The loop bound was hit without reaching the target.
    IterationLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub picks_made: u32,
    pub stop: SimulationStop,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A live draft: the persisted state plus the collaborators used to value
/// and store it.
pub struct DraftSession {
    state: DraftState,
    pool: PlayerPool,
    rating: Box<dyn RatingModel + Send + Sync>,
    baseline: BaselineSettings,
    injuries: InjuryReport,
    store: Box<dyn SnapshotStore>,
}

impl DraftSession {
    /// Start an empty draft.
    pub fn new(
        config: DraftConfig,
        pool: PlayerPool,
        store: Box<dyn SnapshotStore>,
    ) -> Result<Self, DraftError> {
        config.validate()?;
        Ok(DraftSession {
            state: DraftState::new(config),
            pool,
            rating: Box::new(WeightedRating::default()),
            baseline: BaselineSettings::default(),
            injuries: InjuryReport::default(),
            store,
        })
    }

    /// Resume the draft held by `store`, or start fresh with `config` when
    /// the store is empty or unreadable.
    pub fn restore(
        config: DraftConfig,
        pool: PlayerPool,
        store: Box<dyn SnapshotStore>,
    ) -> Result<Self, DraftError> {
        let mut session = DraftSession::new(config, pool, store)?;
        match session.store.load().and_then(|snap| snap.map(DraftSnapshot::into_state).transpose()) {
            Ok(Some(state)) => {
                info!(
                    "Resumed draft with {} picks ({} teams, slot {})",
                    state.history.len(),
                    state.config.num_teams,
                    state.config.my_slot
                );
                session.state = state;
            }
            Ok(None) => debug!("no saved draft; starting fresh"),
            Err(e) => warn!("could not restore saved draft ({}); starting fresh", e),
        }
        Ok(session)
    }

    pub fn with_rating<R>(mut self, rating: R) -> Self
    where
        R: RatingModel + Send + Sync + 'static,
    {
        self.rating = Box::new(rating);
        self
    }

    pub fn with_baseline(mut self, baseline: BaselineSettings) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_injuries(mut self, injuries: InjuryReport) -> Self {
        self.injuries = injuries;
        self
    }

    // -- Commands -----------------------------------------------------------

    /// Record a pick for the team on the clock.
    ///
    /// With `position` of `None` the player goes into their best-valued
    /// position that the team can still fill.
    pub fn confirm_pick(
        &mut self,
        player_name: &str,
        position: Option<Position>,
    ) -> Result<Pick, DraftError> {
        let result = self.validate_pick(player_name, position);
        let (team_id, position) = match result {
            Ok(ok) => ok,
            Err(e) => {
                info!("Pick of '{}' rejected: {}", player_name, e);
                return Err(e);
            }
        };

        let pick = self
            .state
            .history
            .push(team_id, player_name.to_string(), position)
            .clone();
        info!(
            "Pick #{}: team {} took {} at {}",
            pick.pick_number, pick.team_id, pick.player_name, pick.position
        );
        self.persist();
        Ok(pick)
    }

    fn validate_pick(
        &self,
        player_name: &str,
        position: Option<Position>,
    ) -> Result<(u32, Position), DraftError> {
        let total_picks = self.state.config.total_picks();
        if self.state.is_complete() {
            return Err(DraftError::DraftComplete { total_picks });
        }

        let player = self
            .pool
            .get(player_name)
            .ok_or_else(|| DraftError::UnknownPlayer {
                name: player_name.to_string(),
            })?;

        if let Some(existing) = self.state.history.find_player(player_name) {
            return Err(DraftError::PlayerAlreadyDrafted {
                name: player_name.to_string(),
                pick_number: existing.pick_number,
            });
        }

        let team_id = self.state.team_on_clock()?;
        let tracker = RosterTracker::new(&self.state.history);
        let roster = &self.state.config.roster;

        let position = match position {
            Some(pos) => {
                if !player.is_eligible(pos) {
                    return Err(DraftError::PositionNotEligible {
                        name: player_name.to_string(),
                        position: pos,
                    });
                }
                tracker.check_can_draft(team_id, pos, roster)?;
                pos
            }
            None => match self.valuator().best_position_for(team_id, player) {
                Some(pos) => pos,
                None => return Err(self.roster_full_for(team_id, player)),
            },
        };
        Ok((team_id, position))
    }

    /// The error for a player none of whose positions the team can fill,
    /// reported against their primary position.
    fn roster_full_for(&self, team_id: u32, player: &Player) -> DraftError {
        let position = player.primary_position().unwrap_or(Position::Mid);
        let tracker = RosterTracker::new(&self.state.history);
        DraftError::RosterFull {
            team_id,
            position,
            count: tracker.count_at(team_id, position),
            cap: self.state.config.roster.cap_for(position),
        }
    }

    /// Remove the most recent pick. `None` when the history is empty.
    pub fn undo_last_pick(&mut self) -> Option<Pick> {
        let removed = self.state.history.pop()?;
        info!(
            "Undid pick #{} ({} to team {})",
            removed.pick_number, removed.player_name, removed.team_id
        );
        self.persist();
        Some(removed)
    }

    /// Clear the pick history and the stored snapshot. Configuration and
    /// team names are kept.
    pub fn reset_draft(&mut self) {
        let cleared = self.state.history.len();
        self.state.history.clear();
        if let Err(e) = self.store.clear() {
            warn!("failed to clear saved draft: {}", e);
        }
        info!("Draft reset ({} picks cleared)", cleared);
    }

    /// Auto-draft for every other team until `target_slot` is on the clock.
    ///
    /// Each team takes its highest-VORP legal player at that player's best
    /// legal position, and every simulated pick is persisted as it is made.
    /// The loop is bounded by the total number of picks in the draft.
    pub fn simulate_to_slot(&mut self, target_slot: u32) -> Result<SimulationReport, DraftError> {
        let num_teams = self.state.config.num_teams;
        if target_slot == 0 || target_slot > num_teams {
            return Err(DraftError::invalid_config(format!(
                "target slot {target_slot} is outside 1..={num_teams}"
            )));
        }

        let limit = self.state.config.total_picks();
        let mut picks_made = 0;
        let mut stop = SimulationStop::IterationLimit;

        for _ in 0..=limit {
            if self.state.is_complete() {
                stop = SimulationStop::DraftComplete;
                break;
            }
            let team_id = self.state.team_on_clock()?;
            if team_id == target_slot {
                stop = SimulationStop::ReachedSlot;
                break;
            }
            if self.pool.available(&self.state.history).next().is_none() {
                stop = SimulationStop::PoolExhausted;
                break;
            }
            let Some((name, position)) = self
                .valuator()
                .best_for_team(team_id)
                .and_then(|p| p.best_position.map(|pos| (p.name, pos)))
            else {
                stop = SimulationStop::NoEligiblePlayer { team_id };
                break;
            };

            let pick = self.state.history.push(team_id, name, position);
            debug!(
                "Simulated pick #{}: team {} took {} at {}",
                pick.pick_number, pick.team_id, pick.player_name, pick.position
            );
            self.persist();
            picks_made += 1;
        }

        info!(
            "Simulated {} picks toward slot {} (stopped: {:?})",
            picks_made, target_slot, stop
        );
        Ok(SimulationReport { picks_made, stop })
    }

    /// Simulate until the user's own slot is on the clock.
    pub fn simulate_to_my_turn(&mut self) -> Result<SimulationReport, DraftError> {
        self.simulate_to_slot(self.state.config.my_slot)
    }

    /// Replace the configuration, mid-draft if need be.
    ///
    /// Rejected if the existing picks would not fit the new shape: a pick by
    /// a team beyond the new team count, or a team already over a new cap.
    pub fn set_configuration(&mut self, config: DraftConfig) -> Result<(), DraftError> {
        config.validate()?;
        for pick in self.state.history.picks() {
            if pick.team_id > config.num_teams {
                return Err(DraftError::invalid_config(format!(
                    "pick #{} was made by team {}, but the new league has {} teams",
                    pick.pick_number, pick.team_id, config.num_teams
                )));
            }
        }
        let tracker = RosterTracker::new(&self.state.history);
        for team_id in 1..=config.num_teams {
            for (position, count) in tracker.team_counts(team_id) {
                let cap = config.roster.cap_for(position);
                if count > cap {
                    return Err(DraftError::invalid_config(format!(
                        "team {team_id} already has {count} {position} players, above the new cap of {cap}"
                    )));
                }
            }
        }

        info!(
            "Configuration updated: {} teams, slot {}, roster size {}",
            config.num_teams,
            config.my_slot,
            config.roster.roster_size()
        );
        let num_teams = config.num_teams;
        self.state.config = config;
        self.state.team_names.retain(|&id, _| id <= num_teams);
        self.persist();
        Ok(())
    }

    /// Set or (with an empty name) clear a team's display name.
    pub fn set_team_name(&mut self, team_id: u32, name: &str) -> Result<(), DraftError> {
        if team_id == 0 || team_id > self.state.config.num_teams {
            return Err(DraftError::invalid_config(format!(
                "team {team_id} is outside 1..={}",
                self.state.config.num_teams
            )));
        }
        let name = name.trim();
        if name.is_empty() {
            self.state.team_names.remove(&team_id);
        } else {
            self.state.team_names.insert(team_id, name.to_string());
        }
        self.persist();
        Ok(())
    }

    /// Replace the health data used for annotations and rating penalties.
    pub fn set_injuries(&mut self, injuries: InjuryReport) {
        info!("Applied injury report with {} entries", injuries.len());
        self.injuries = injuries;
    }

    // -- Persistence --------------------------------------------------------

    /// Write the current state to the store.
    pub fn save_snapshot(&self) -> Result<(), DraftError> {
        self.store.save(&DraftSnapshot::capture(&self.state))?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save_snapshot() {
            warn!("failed to save draft snapshot: {}", e);
        }
    }

    // -- Queries ------------------------------------------------------------

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn config(&self) -> &DraftConfig {
        &self.state.config
    }

    pub fn history(&self) -> &DraftHistory {
        &self.state.history
    }

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    pub fn injuries(&self) -> &InjuryReport {
        &self.injuries
    }

    pub fn next_pick_number(&self) -> u32 {
        self.state.next_pick_number()
    }

    pub fn current_round(&self) -> Result<u32, DraftError> {
        self.state.current_round()
    }

    pub fn team_on_clock(&self) -> Result<u32, DraftError> {
        self.state.team_on_clock()
    }

    pub fn is_my_turn(&self) -> bool {
        self.state.is_my_turn()
    }

    pub fn my_next_pick(&self) -> Result<u32, DraftError> {
        self.state.my_next_pick()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn team_name(&self, team_id: u32) -> String {
        self.state.team_name(team_id)
    }

    /// A team's picks, in draft order.
    pub fn team_roster(&self, team_id: u32) -> Vec<&Pick> {
        self.state.history.team_picks(team_id).collect()
    }

    pub fn team_counts(&self, team_id: u32) -> BTreeMap<Position, u32> {
        RosterTracker::new(&self.state.history).team_counts(team_id)
    }

    pub fn valuator(&self) -> Valuator<'_> {
        Valuator::new(
            &self.pool,
            &self.state,
            &*self.rating,
            &self.injuries,
            self.baseline,
        )
    }

    /// Ranked available players from `team_id`'s point of view, or neutral
    /// when `None`.
    pub fn rankings_for(&self, team_id: Option<u32>) -> Vec<RankedPlayer> {
        self.valuator().rank(team_id)
    }

    pub fn baselines(&self) -> BTreeMap<Position, Baseline> {
        self.valuator().baselines()
    }

    pub fn scarcity(&self) -> Vec<ScarcityEntry> {
        compute_scarcity(&self.valuator())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
