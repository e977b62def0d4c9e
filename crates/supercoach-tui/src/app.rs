// Application state and orchestration logic.
//
// The central event loop that applies user commands from the TUI to the
// draft session, folds in the injury report when the background fetch
// finishes, and pushes a fresh snapshot to the TUI after every change.

use tokio::sync::mpsc;
use tracing::{info, warn};

use supercoach_core::draft::pick::Position;
use supercoach_core::draft::session::{DraftSession, SimulationReport, SimulationStop};
use supercoach_core::injury::InjuryReport;

use crate::protocol::{
    AppSnapshot, LogEntry, Notice, RosterLine, TeamSummary, UiUpdate, UserCommand,
};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub session: DraftSession,
    pub league_name: String,
}

impl AppState {
    pub fn new(session: DraftSession, league_name: impl Into<String>) -> Self {
        AppState {
            session,
            league_name: league_name.into(),
        }
    }

    /// Build an `AppSnapshot` from the current session.
    ///
    /// Rankings are computed for the team on the clock so that the top row
    /// is always a legal pick for whoever is drafting.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let session = &self.session;
        let config = session.config();
        let is_complete = session.is_complete();
        let total_picks = config.total_picks();

        let on_clock = session
            .team_on_clock()
            .ok()
            .map(|team| (team, session.team_name(team)));
        let current_round = if is_complete {
            None
        } else {
            session.current_round().ok()
        };
        let my_next_pick = if is_complete {
            None
        } else {
            session
                .my_next_pick()
                .ok()
                .filter(|&pick| pick <= total_picks)
        };

        let draft_log = session
            .history()
            .picks()
            .iter()
            .map(|pick| LogEntry {
                pick: pick.clone(),
                team_name: session.team_name(pick.team_id),
            })
            .collect();

        let my_picks = session.team_roster(config.my_slot);
        let my_roster = Position::ALL
            .iter()
            .map(|&position| RosterLine {
                position,
                players: my_picks
                    .iter()
                    .filter(|p| p.position == position)
                    .map(|p| p.player_name.clone())
                    .collect(),
                starters: config.roster.starters_for(position),
                cap: config.roster.cap_for(position),
            })
            .collect();

        let roster_size = config.roster.roster_size();
        let teams = (1..=config.num_teams)
            .map(|team_id| {
                let counts = session.team_counts(team_id);
                TeamSummary {
                    team_id,
                    name: session.team_name(team_id),
                    total: counts.values().sum(),
                    counts,
                    roster_size,
                }
            })
            .collect();

        AppSnapshot {
            league_name: self.league_name.clone(),
            next_pick: session.next_pick_number(),
            total_picks,
            current_round,
            my_slot: config.my_slot,
            my_next_pick,
            is_complete,
            available: session.rankings_for(on_clock.as_ref().map(|(team, _)| *team)),
            on_clock,
            draft_log,
            my_roster,
            teams,
            scarcity: session.scarcity(),
            injury_count: session.injuries().len(),
        }
    }

    /// Apply one command to the session and describe the outcome.
    ///
    /// Returns `None` for commands with nothing to report (`Quit`).
    pub fn apply_command(&mut self, cmd: UserCommand) -> Option<Notice> {
        match cmd {
            UserCommand::DraftPlayer {
                player_name,
                position,
            } => match self.session.confirm_pick(&player_name, position) {
                Ok(pick) => Some(Notice::info(format!(
                    "#{} {}: {} ({})",
                    pick.pick_number,
                    self.session.team_name(pick.team_id),
                    pick.player_name,
                    pick.position
                ))),
                Err(e) => Some(Notice::error(e.to_string())),
            },
            UserCommand::Undo => Some(match self.session.undo_last_pick() {
                Some(pick) => Notice::info(format!(
                    "Undid #{} {}",
                    pick.pick_number, pick.player_name
                )),
                None => Notice::info("Nothing to undo"),
            }),
            UserCommand::SimulateToMySlot => Some(match self.session.simulate_to_my_turn() {
                Ok(report) => Notice::info(self.describe_simulation(&report)),
                Err(e) => Notice::error(e.to_string()),
            }),
            UserCommand::Reset => {
                self.session.reset_draft();
                Some(Notice::info("Draft reset"))
            }
            UserCommand::Quit => None,
        }
    }

    fn describe_simulation(&self, report: &SimulationReport) -> String {
        let outcome = match report.stop {
            SimulationStop::ReachedSlot => "you're on the clock".to_string(),
            SimulationStop::PoolExhausted => "player pool exhausted".to_string(),
            SimulationStop::NoEligiblePlayer { team_id } => format!(
                "no legal player left for {}",
                self.session.team_name(team_id)
            ),
            SimulationStop::DraftComplete => "draft complete".to_string(),
            SimulationStop::IterationLimit => "stopped at the pick limit".to_string(),
        };
        format!("Simulated {} picks; {}", report.picks_made, outcome)
    }

    /// Replace the injury report. Returns a notice when it carries data.
    pub fn apply_injuries(&mut self, report: InjuryReport) -> Option<Notice> {
        let count = report.len();
        self.session.set_injuries(report);
        (count > 0).then(|| Notice::info(format!("Injury report loaded ({count} players)")))
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. The injury report from the background fetch (at most one)
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut feed_rx: mpsc::Receiver<InjuryReport>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    send_snapshot(state.build_snapshot(), &ui_tx).await;

    // Once the feed task is done, stop polling its closed channel.
    let mut feed_open = true;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        if let Some(notice) = state.apply_command(cmd) {
                            let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
                        }
                        send_snapshot(state.build_snapshot(), &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            report = feed_rx.recv(), if feed_open => {
                match report {
                    Some(report) => {
                        if let Some(notice) = state.apply_injuries(report) {
                            let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
                        }
                        send_snapshot(state.build_snapshot(), &ui_tx).await;
                    }
                    None => feed_open = false,
                }
            }
        }
    }

    if let Err(e) = state.session.save_snapshot() {
        warn!("final snapshot save failed: {}", e);
    }
    info!("Application event loop exiting");
    Ok(())
}

/// The session is `Send` but not `Sync`, so the snapshot is built before
/// the await rather than holding a borrow across it.
async fn send_snapshot(snapshot: AppSnapshot, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(snapshot))).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
