// Message types exchanged between the app loop and the TUI.
//
// The TUI sends `UserCommand`s; the app loop answers with `UiUpdate`s
// carrying a full `AppSnapshot` that the TUI renders without further
// computation.

use std::collections::BTreeMap;

use supercoach_core::draft::pick::{Pick, Position};
use supercoach_core::valuation::scarcity::ScarcityEntry;
use supercoach_core::valuation::vorp::RankedPlayer;

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

/// Commands the TUI forwards to the app loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Draft a player for the team on the clock. `None` drafts at the
    /// player's best legal position.
    DraftPlayer {
        player_name: String,
        position: Option<Position>,
    },
    Undo,
    /// Run the other teams' picks until the user's slot is on the clock.
    SimulateToMySlot,
    /// Clear the pick history (already confirmed in the TUI).
    Reset,
    Quit,
}

// ---------------------------------------------------------------------------
// app -> TUI
// ---------------------------------------------------------------------------

/// Updates pushed from the app loop to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    /// One-line message for the help bar, e.g. a rejected pick.
    Notice(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Which tab is shown in the main panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabId {
    #[default]
    Available,
    DraftLog,
    Teams,
}

impl TabId {
    pub fn next(self) -> Self {
        match self {
            TabId::Available => TabId::DraftLog,
            TabId::DraftLog => TabId::Teams,
            TabId::Teams => TabId::Available,
        }
    }
}

/// A pick with the drafting team's display name resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub pick: Pick,
    pub team_name: String,
}

/// The user's roster at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterLine {
    pub position: Position,
    pub players: Vec<String>,
    pub starters: u32,
    pub cap: u32,
}

/// Position counts for one team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSummary {
    pub team_id: u32,
    pub name: String,
    pub counts: BTreeMap<Position, u32>,
    pub total: u32,
    pub roster_size: u32,
}

/// Everything the TUI draws, computed in one pass by the app loop.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    pub league_name: String,
    /// Number of the next pick (one past the picks made).
    pub next_pick: u32,
    pub total_picks: u32,
    /// `None` once the draft is complete.
    pub current_round: Option<u32>,
    pub on_clock: Option<(u32, String)>,
    pub my_slot: u32,
    pub my_next_pick: Option<u32>,
    pub is_complete: bool,
    /// Undrafted players ranked for the team on the clock.
    pub available: Vec<RankedPlayer>,
    pub draft_log: Vec<LogEntry>,
    pub my_roster: Vec<RosterLine>,
    pub teams: Vec<TeamSummary>,
    pub scarcity: Vec<ScarcityEntry>,
    /// Players in the current injury report; 0 when the feed is off.
    pub injury_count: usize,
}

impl AppSnapshot {
    pub fn is_my_turn(&self) -> bool {
        self.on_clock
            .as_ref()
            .is_some_and(|(team, _)| *team == self.my_slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycle_wraps() {
        let mut tab = TabId::default();
        assert_eq!(tab, TabId::Available);
        for _ in 0..3 {
            tab = tab.next();
        }
        assert_eq!(tab, TabId::Available);
        assert_eq!(TabId::Available.next(), TabId::DraftLog);
    }

    #[test]
    fn my_turn_follows_clock() {
        let mut snap = AppSnapshot {
            my_slot: 3,
            ..AppSnapshot::default()
        };
        assert!(!snap.is_my_turn());
        snap.on_clock = Some((3, "Mine".into()));
        assert!(snap.is_my_turn());
        snap.on_clock = Some((4, "Team 4".into()));
        assert!(!snap.is_my_turn());
    }
}
