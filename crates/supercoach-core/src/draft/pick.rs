// Positions, individual pick records, and the append-only pick history.

use serde::{Deserialize, Serialize};
use std::fmt;

/// On-field positions a player can be drafted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Def,
    Mid,
    Ruc,
    Fwd,
}

impl Position {
    /// All positions in display order.
    pub const ALL: [Position; 4] = [Position::Def, Position::Mid, Position::Ruc, Position::Fwd];

    /// Parse a single position tag. Accepts the common long forms
    /// ("DEFENDER", "RUCK", ...) as well as the three-letter tags.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "DEF" | "DEFENDER" | "D" => Some(Position::Def),
            "MID" | "MIDFIELDER" | "M" => Some(Position::Mid),
            "RUC" | "RUCK" | "R" => Some(Position::Ruc),
            "FWD" | "FORWARD" | "F" => Some(Position::Fwd),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Def => "DEF",
            Position::Mid => "MID",
            Position::Ruc => "RUC",
            Position::Fwd => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Parse a slash-delimited eligibility list such as `"MID/FWD"`.
///
/// Unknown tags are dropped and duplicates collapsed; the first-listed
/// position stays first so it can serve as the primary position.
pub fn parse_positions(s: &str) -> Vec<Position> {
    let mut positions = Vec::new();
    for tag in s.split('/') {
        if let Some(pos) = Position::from_str_pos(tag) {
            if !positions.contains(&pos) {
                positions.push(pos);
            }
        }
    }
    positions
}

/// Format a position list as a compact string (e.g. "MID/FWD").
pub fn format_positions(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "--".to_string();
    }
    positions
        .iter()
        .map(|p| p.display_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// A single recorded draft selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    /// 1-based position of this pick in the history.
    pub pick_number: u32,
    /// Team that made the selection, in `1..=num_teams`.
    pub team_id: u32,
    pub player_name: String,
    /// The position the player was drafted into. Counts only toward this one.
    pub position: Position,
}

/// Ordered, append-only record of every pick made so far.
///
/// `pick_number` is always assigned from the sequence itself, and
/// deserialization rejects any history where `pick_number != index + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Pick>", into = "Vec<Pick>")]
pub struct DraftHistory {
    picks: Vec<Pick>,
}

impl DraftHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn last(&self) -> Option<&Pick> {
        self.picks.last()
    }

    /// The 1-based number the next pick will receive.
    pub fn next_pick_number(&self) -> u32 {
        self.picks.len() as u32 + 1
    }

    /// Find the pick that took `player_name`, if any.
    pub fn find_player(&self, player_name: &str) -> Option<&Pick> {
        self.picks.iter().find(|p| p.player_name == player_name)
    }

    pub fn is_drafted(&self, player_name: &str) -> bool {
        self.find_player(player_name).is_some()
    }

    /// Picks made by a single team, in draft order.
    pub fn team_picks(&self, team_id: u32) -> impl Iterator<Item = &Pick> {
        self.picks.iter().filter(move |p| p.team_id == team_id)
    }

    /// Append a pick, numbering it from the current length.
    pub(crate) fn push(&mut self, team_id: u32, player_name: String, position: Position) -> &Pick {
        let pick = Pick {
            pick_number: self.next_pick_number(),
            team_id,
            player_name,
            position,
        };
        self.picks.push(pick);
        &self.picks[self.picks.len() - 1]
    }

    /// Remove and return the most recent pick.
    pub(crate) fn pop(&mut self) -> Option<Pick> {
        self.picks.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.picks.clear();
    }
}

impl TryFrom<Vec<Pick>> for DraftHistory {
    type Error = String;

    fn try_from(picks: Vec<Pick>) -> Result<Self, Self::Error> {
        for (idx, pick) in picks.iter().enumerate() {
            let expected = idx as u32 + 1;
            if pick.pick_number != expected {
                return Err(format!(
                    "pick #{} found at position {} in history",
                    pick.pick_number, expected
                ));
            }
            if pick.team_id == 0 {
                return Err(format!("pick #{} has team id 0", pick.pick_number));
            }
        }
        Ok(DraftHistory { picks })
    }
}

impl From<DraftHistory> for Vec<Pick> {
    fn from(history: DraftHistory) -> Self {
        history.picks
    }
}
