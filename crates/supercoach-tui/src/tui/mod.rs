// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest `AppSnapshot` plus purely
// local concerns (tab, selection, filter). The app loop pushes `UiUpdate`
// messages over an mpsc channel; the TUI applies them and re-renders at
// ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use supercoach_core::draft::pick::Position;
use supercoach_core::valuation::vorp::RankedPlayer;

use crate::protocol::{AppSnapshot, Notice, TabId, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the last snapshot from the app loop plus view settings.
#[derive(Default)]
pub struct ViewState {
    pub snapshot: AppSnapshot,
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    /// Row of the highlighted player in the filtered available list.
    pub selected: usize,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    /// Current filter/search text.
    pub filter_text: String,
    /// Whether the filter input is active.
    pub filter_mode: bool,
    /// Position filter for the available players table.
    pub position_filter: Option<Position>,
    /// Reset requested; waiting for y/n.
    pub confirm_reset: bool,
    /// Last message from the app loop.
    pub notice: Option<Notice>,
}

impl ViewState {
    /// Replace the snapshot, keeping the selection inside the new list.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.snapshot = snapshot;
        self.clamp_selection();
    }

    /// Available players after the position and text filters.
    pub fn filtered_players(&self) -> Vec<&RankedPlayer> {
        widgets::available::filter_players(
            &self.snapshot.available,
            self.position_filter,
            &self.filter_text,
        )
    }

    pub fn selected_player(&self) -> Option<&RankedPlayer> {
        self.filtered_players().get(self.selected).copied()
    }

    pub fn clamp_selection(&mut self) {
        let len = self.filtered_players().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::Notice(notice) => state.notice = Some(notice),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.active_tab {
        TabId::Available => widgets::available::render(frame, layout.main_panel, state),
        TabId::DraftLog => widgets::draft_log::render(frame, layout.main_panel, state),
        TabId::Teams => widgets::teams::render(frame, layout.main_panel, state),
    }
    widgets::roster::render(frame, layout.roster, state);
    widgets::scarcity::render(frame, layout.scarcity, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_reset {
        widgets::reset_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
