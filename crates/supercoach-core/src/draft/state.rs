// Draft configuration, the persisted draft state, and its snapshot envelope.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pick::DraftHistory;
use super::roster::RosterRequirement;
use super::turn;
use crate::error::{DraftError, PersistenceError};

/// Largest league the draft engine accepts.
pub const MAX_TEAMS: u32 = 20;

/// League shape for one draft: team count, the user's slot, roster rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftConfig {
    pub num_teams: u32,
    /// 1-based team id the user controls.
    pub my_slot: u32,
    pub roster: RosterRequirement,
}

impl DraftConfig {
    /// Build and validate a configuration.
    pub fn new(num_teams: u32, my_slot: u32, roster: RosterRequirement) -> Result<Self, DraftError> {
        let config = DraftConfig {
            num_teams,
            my_slot,
            roster,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.num_teams == 0 || self.num_teams > MAX_TEAMS {
            return Err(DraftError::invalid_config(format!(
                "team count must be between 1 and {MAX_TEAMS}, got {}",
                self.num_teams
            )));
        }
        if self.my_slot == 0 || self.my_slot > self.num_teams {
            return Err(DraftError::invalid_config(format!(
                "draft slot {} is outside 1..={}",
                self.my_slot, self.num_teams
            )));
        }
        self.roster.validate()?;
        if self.num_teams.checked_mul(self.roster.roster_size()).is_none() {
            return Err(DraftError::invalid_config(format!(
                "{} teams of {} players is too large a draft",
                self.num_teams,
                self.roster.roster_size()
            )));
        }
        Ok(())
    }

    /// Picks needed to fill every roster in the league.
    pub fn total_picks(&self) -> u32 {
        self.num_teams.saturating_mul(self.roster.roster_size())
    }
}

/// Everything that defines a draft in progress. Rankings and counts are
/// always derived from this, never stored alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    pub config: DraftConfig,
    pub history: DraftHistory,
    /// Optional display names by team id.
    #[serde(default)]
    pub team_names: BTreeMap<u32, String>,
}

impl DraftState {
    pub fn new(config: DraftConfig) -> Self {
        DraftState {
            config,
            history: DraftHistory::new(),
            team_names: BTreeMap::new(),
        }
    }

    /// Display name for a team, falling back to "Team N".
    pub fn team_name(&self, team_id: u32) -> String {
        self.team_names
            .get(&team_id)
            .cloned()
            .unwrap_or_else(|| format!("Team {team_id}"))
    }

    pub fn next_pick_number(&self) -> u32 {
        self.history.next_pick_number()
    }

    pub fn current_round(&self) -> Result<u32, DraftError> {
        turn::round_for_pick(self.next_pick_number(), self.config.num_teams)
    }

    /// Team whose turn it is for the next pick.
    pub fn team_on_clock(&self) -> Result<u32, DraftError> {
        turn::team_for_pick(self.next_pick_number(), self.config.num_teams)
    }

    pub fn is_my_turn(&self) -> bool {
        self.team_on_clock()
            .map(|team| team == self.config.my_slot)
            .unwrap_or(false)
    }

    /// Next pick number (at or after the current one) that belongs to the user.
    pub fn my_next_pick(&self) -> Result<u32, DraftError> {
        turn::next_pick_for_slot(
            self.next_pick_number(),
            self.config.my_slot,
            self.config.num_teams,
        )
    }

    pub fn is_complete(&self) -> bool {
        self.history.len() as u32 >= self.config.total_picks()
    }

    /// Check that the history is consistent with the configuration.
    pub fn check_consistency(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for pick in self.history.picks() {
            if pick.team_id > self.config.num_teams {
                return Err(format!(
                    "pick #{} belongs to team {} but the league has {} teams",
                    pick.pick_number, pick.team_id, self.config.num_teams
                ));
            }
            if !seen.insert(pick.player_name.as_str()) {
                return Err(format!(
                    "{} appears twice in the pick history",
                    pick.player_name
                ));
            }
        }
        Ok(())
    }
}

/// Current snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The wholesale, last-writer-wins record written to a snapshot store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: DraftState,
}

impl DraftSnapshot {
    pub fn capture(state: &DraftState) -> Self {
        DraftSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            state: state.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot. Out-of-order pick numbers surface as `Corrupt`.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                PersistenceError::corrupt(e.to_string())
            } else {
                PersistenceError::Serialization(e)
            }
        })
    }

    /// Unwrap the state after checking version and internal consistency.
    pub fn into_state(self) -> Result<DraftState, PersistenceError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        self.state
            .config
            .validate()
            .map_err(|e| PersistenceError::corrupt(e.to_string()))?;
        self.state
            .check_consistency()
            .map_err(PersistenceError::corrupt)?;
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::Position;

    fn ten_team_config() -> DraftConfig {
        DraftConfig::new(10, 5, RosterRequirement::default()).unwrap()
    }

    #[test]
    fn config_rejects_bad_slot_and_team_count() {
        assert!(DraftConfig::new(0, 1, RosterRequirement::default()).is_err());
        assert!(DraftConfig::new(21, 1, RosterRequirement::default()).is_err());
        assert!(DraftConfig::new(10, 0, RosterRequirement::default()).is_err());
        assert!(DraftConfig::new(10, 11, RosterRequirement::default()).is_err());
        assert!(DraftConfig::new(1, 1, RosterRequirement::default()).is_ok());
    }

    #[test]
    fn config_rejects_oversized_roster() {
        let roster = RosterRequirement::new(1, 500_000_000, 1, 1);
        assert!(matches!(
            DraftConfig::new(10, 1, roster),
            Err(DraftError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn largest_valid_league_fits_total_picks() {
        let roster = RosterRequirement::new(50, 50, 50, 50)
            .with_bench(crate::draft::roster::BenchPolicy::Flat { extra: 50 });
        let config = DraftConfig::new(MAX_TEAMS, 1, roster).unwrap();
        assert_eq!(config.total_picks(), MAX_TEAMS * 4 * 100);
    }

    #[test]
    fn total_picks_is_teams_times_roster_size() {
        assert_eq!(ten_team_config().total_picks(), 10 * 23);
    }

    #[test]
    fn turn_helpers_follow_history_length() {
        let mut state = DraftState::new(ten_team_config());
        assert_eq!(state.next_pick_number(), 1);
        assert_eq!(state.team_on_clock().unwrap(), 1);
        assert_eq!(state.my_next_pick().unwrap(), 5);
        assert!(!state.is_my_turn());

        for i in 0..4 {
            let team = state.team_on_clock().unwrap();
            state.history.push(team, format!("P{i}"), Position::Mid);
        }
        assert!(state.is_my_turn());
        assert_eq!(state.my_next_pick().unwrap(), 5);

        let team = state.team_on_clock().unwrap();
        state.history.push(team, "P4".into(), Position::Mid);
        assert_eq!(state.my_next_pick().unwrap(), 16);
        assert_eq!(state.current_round().unwrap(), 1);
    }

    #[test]
    fn team_name_falls_back() {
        let mut state = DraftState::new(ten_team_config());
        state.team_names.insert(3, "Magpies".into());
        assert_eq!(state.team_name(3), "Magpies");
        assert_eq!(state.team_name(4), "Team 4");
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut state = DraftState::new(ten_team_config());
        state.history.push(1, "A".into(), Position::Def);
        state.history.push(2, "B".into(), Position::Ruc);
        state.team_names.insert(5, "Mine".into());
        let json = DraftSnapshot::capture(&state).to_json().unwrap();
        let restored = DraftSnapshot::from_json(&json).unwrap().into_state().unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn snapshot_rejects_team_outside_league() {
        let mut state = DraftState::new(ten_team_config());
        state.history.push(12, "A".into(), Position::Def);
        let snapshot = DraftSnapshot::capture(&state);
        assert!(matches!(
            snapshot.into_state(),
            Err(PersistenceError::Corrupt(_))
        ));
    }

    #[test]
    fn snapshot_rejects_unknown_version() {
        let mut snapshot = DraftSnapshot::capture(&DraftState::new(ten_team_config()));
        snapshot.version = 99;
        assert!(matches!(
            snapshot.into_state(),
            Err(PersistenceError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn snapshot_with_gapped_pick_numbers_is_corrupt() {
        let json = r#"{
            "version": 1,
            "saved_at": "2026-01-01T00:00:00Z",
            "state": {
                "config": {"num_teams": 2, "my_slot": 1, "roster": {"starters": {"MID": 1}}},
                "history": [
                    {"pick_number": 2, "team_id": 1, "player_name": "A", "position": "MID"}
                ]
            }
        }"#;
        assert!(matches!(
            DraftSnapshot::from_json(json),
            Err(PersistenceError::Corrupt(_))
        ));
    }
}
