// Player pool loading and lookup.
//
// Reads a player statistics CSV into a normalized, immutable pool. Numeric
// columns are coerced leniently: missing, blank or non-numeric cells become 0.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::draft::pick::{parse_positions, DraftHistory, Position};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One athlete and the raw statistics the rating model consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique key for the session.
    pub name: String,
    pub club: String,
    /// Eligible positions, primary first.
    pub positions: Vec<Position>,
    pub season_avg: f64,
    /// Recent-form average (e.g. last three games).
    pub form_avg: f64,
    pub games: u32,
    pub kick_ins: f64,
    pub contested: f64,
}

impl Player {
    pub fn new(name: impl Into<String>, positions: Vec<Position>, season_avg: f64) -> Self {
        Player {
            name: name.into(),
            club: String::new(),
            positions,
            season_avg,
            form_avg: 0.0,
            games: 0,
            kick_ins: 0.0,
            contested: 0.0,
        }
    }

    pub fn with_form(mut self, form_avg: f64) -> Self {
        self.form_avg = form_avg;
        self
    }

    pub fn with_games(mut self, games: u32) -> Self {
        self.games = games;
        self
    }

    pub fn with_kick_ins(mut self, kick_ins: f64) -> Self {
        self.kick_ins = kick_ins;
        self
    }

    pub fn with_contested(mut self, contested: f64) -> Self {
        self.contested = contested;
        self
    }

    pub fn primary_position(&self) -> Option<Position> {
        self.positions.first().copied()
    }

    pub fn is_eligible(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }
}

/// The loaded player table, in file order, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: Vec<Player>,
    by_name: HashMap<String, usize>,
}

impl PlayerPool {
    /// Build a pool, keeping the first row for any duplicated name.
    pub fn from_players(players: Vec<Player>) -> Self {
        let mut pool = PlayerPool::default();
        for player in players {
            if pool.by_name.contains_key(&player.name) {
                warn!("duplicate player '{}' ignored", player.name);
                continue;
            }
            pool.by_name.insert(player.name.clone(), pool.players.len());
            pool.players.push(player);
        }
        pool
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.by_name.get(name).map(|&idx| &self.players[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Players not yet taken in `history`.
    pub fn available<'a>(&'a self, history: &'a DraftHistory) -> impl Iterator<Item = &'a Player> {
        self.players
            .iter()
            .filter(move |p| !history.is_drafted(&p.name))
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlayerDataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

/// Every column is read as text so a bad cell downgrades to 0 instead of
/// rejecting the row. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    #[serde(default, alias = "full_name", alias = "Name", alias = "Player")]
    name: Option<String>,
    #[serde(default, alias = "First Name", alias = "FirstName")]
    first_name: Option<String>,
    #[serde(default, alias = "Last Name", alias = "LastName")]
    last_name: Option<String>,
    #[serde(default, alias = "Team", alias = "team")]
    club: Option<String>,
    #[serde(default, alias = "Positions", alias = "position", alias = "Pos", alias = "POS")]
    positions: Option<String>,
    #[serde(default, alias = "Avg", alias = "AVG", alias = "avg", alias = "Average")]
    season_avg: Option<String>,
    #[serde(default, alias = "L3", alias = "Last3", alias = "form", alias = "Form", alias = "form_avg")]
    recent: Option<String>,
    #[serde(default, alias = "Games", alias = "GP", alias = "games_played", alias = "Gms")]
    games: Option<String>,
    #[serde(default, alias = "KI", alias = "KickIns")]
    kick_ins: Option<String>,
    #[serde(default, alias = "CP", alias = "Contested")]
    contested: Option<String>,
}

/// Parse a numeric cell, falling back to 0 for blank or malformed values.
fn lenient_f64(cell: Option<&str>) -> f64 {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn lenient_u32(cell: Option<&str>) -> u32 {
    let value = lenient_f64(cell);
    if value <= 0.0 {
        0
    } else {
        value.round() as u32
    }
}

fn display_name(raw: &RawPlayerRow) -> String {
    if let Some(name) = raw.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    let first = raw.first_name.as_deref().unwrap_or("").trim();
    let last = raw.last_name.as_deref().unwrap_or("").trim();
    format!("{first} {last}").trim().to_string()
}

fn player_from_row(raw: RawPlayerRow) -> Option<Player> {
    let name = display_name(&raw);
    if name.is_empty() {
        warn!("skipping player row with no name");
        return None;
    }
    let positions = parse_positions(raw.positions.as_deref().unwrap_or(""));
    if positions.is_empty() {
        warn!(
            "skipping player '{}': no recognised position in {:?}",
            name, raw.positions
        );
        return None;
    }
    Some(Player {
        name,
        club: raw.club.as_deref().unwrap_or("").trim().to_string(),
        positions,
        season_avg: lenient_f64(raw.season_avg.as_deref()),
        form_avg: lenient_f64(raw.recent.as_deref()),
        games: lenient_u32(raw.games.as_deref()),
        kick_ins: lenient_f64(raw.kick_ins.as_deref()),
        contested: lenient_f64(raw.contested.as_deref()),
    })
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => {
                if let Some(player) = player_from_row(raw) {
                    players.push(player);
                }
            }
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(players)
}

/// Load a player pool from CSV text (useful for tests and embedded data).
pub fn load_players_from_str(data: &str) -> Result<PlayerPool, PlayerDataError> {
    let players = load_players_from_reader(data.as_bytes()).map_err(|e| PlayerDataError::Csv {
        path: "<inline>".into(),
        source: e,
    })?;
    Ok(PlayerPool::from_players(players))
}

/// Load the player pool from a CSV file on disk.
pub fn load_players(path: &Path) -> Result<PlayerPool, PlayerDataError> {
    let path_str = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| PlayerDataError::Io {
        path: path_str.clone(),
        source: e,
    })?;
    let players = load_players_from_reader(file).map_err(|e| PlayerDataError::Csv {
        path: path_str.clone(),
        source: e,
    })?;
    let pool = PlayerPool::from_players(players);
    info!("Loaded {} players from {}", pool.len(), path_str);
    Ok(pool)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
