// SQLite persistence layer for draft state.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::draft::pick::{Pick, Position};
use crate::draft::state::DraftSnapshot;
use crate::error::PersistenceError;
use crate::store::SnapshotStore;

/// SQLite-backed snapshot store.
///
/// The snapshot JSON lives in a `draft_state` key/value table; the picks are
/// mirrored into `draft_picks` so the history can be inspected with plain SQL.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Key in `draft_state` holding the full snapshot.
    const SNAPSHOT_KEY: &'static str = "snapshot";

    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS draft_picks (
                pick_number INTEGER PRIMARY KEY,
                team_id     INTEGER NOT NULL,
                player_name TEXT NOT NULL,
                position    TEXT NOT NULL,
                recorded_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        debug!("opened draft database at {path}");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// A poisoned lock still guards a usable connection; every write runs in
    /// a transaction.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Persist a raw string under `key`, replacing any previous value.
    fn save_state(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.conn().execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load a previously saved value by `key`.
    fn load_state(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM draft_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// The mirrored pick rows, in pick order.
    pub fn load_picks(&self) -> Result<Vec<Pick>, PersistenceError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT pick_number, team_id, player_name, position
             FROM draft_picks ORDER BY pick_number",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(pick_number, team_id, player_name, position)| {
                let position = Position::from_str_pos(&position).ok_or_else(|| {
                    PersistenceError::corrupt(format!(
                        "pick #{pick_number} has unknown position `{position}`"
                    ))
                })?;
                Ok(Pick {
                    pick_number,
                    team_id,
                    player_name,
                    position,
                })
            })
            .collect()
    }
}

impl SnapshotStore for Database {
    fn save(&self, snapshot: &DraftSnapshot) -> Result<(), PersistenceError> {
        let json = snapshot.to_json()?;
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![Self::SNAPSHOT_KEY, json],
        )?;
        tx.execute("DELETE FROM draft_picks", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO draft_picks (pick_number, team_id, player_name, position)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for pick in snapshot.state.history.picks() {
                insert.execute(params![
                    pick.pick_number,
                    pick.team_id,
                    pick.player_name,
                    pick.position.display_str(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// The snapshot must agree with the `draft_picks` mirror written in the
    /// same transaction; a mismatch means the file was edited underneath us.
    fn load(&self) -> Result<Option<DraftSnapshot>, PersistenceError> {
        let Some(json) = self.load_state(Self::SNAPSHOT_KEY)? else {
            return Ok(None);
        };
        let snapshot = DraftSnapshot::from_json(&json)?;
        let mirrored = self.load_picks()?;
        if mirrored.as_slice() != snapshot.state.history.picks() {
            return Err(PersistenceError::corrupt(format!(
                "draft_picks holds {} picks but the snapshot holds {}",
                mirrored.len(),
                snapshot.state.history.len()
            )));
        }
        Ok(Some(snapshot))
    }

    /// Delete all draft picks and draft state.
    fn clear(&self) -> Result<(), PersistenceError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM draft_picks", [])?;
        tx.execute("DELETE FROM draft_state", [])?;
        tx.commit()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
