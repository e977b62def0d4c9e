// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app loop, or into local ViewState mutations (tab switching, selection,
// filtering).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use supercoach_core::draft::pick::Position;

use super::ViewState;
use crate::protocol::{TabId, UserCommand};

/// Page size for PageUp/PageDown.
const PAGE_SIZE: usize = 20;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app loop. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both press and release.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_reset {
        return handle_confirm_reset(key_event, view_state);
    }

    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Tab => {
            view_state.active_tab = view_state.active_tab.next();
            None
        }
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Available;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::DraftLog;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::Teams;
            None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            move_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            move_down(view_state, PAGE_SIZE);
            None
        }

        KeyCode::Enter => draft_selected(view_state, None),
        KeyCode::Char('d') => draft_selected(view_state, Some(Position::Def)),
        KeyCode::Char('m') => draft_selected(view_state, Some(Position::Mid)),
        KeyCode::Char('r') => draft_selected(view_state, Some(Position::Ruc)),
        KeyCode::Char('f') => draft_selected(view_state, Some(Position::Fwd)),

        KeyCode::Char('u') => Some(UserCommand::Undo),
        KeyCode::Char('s') => Some(UserCommand::SimulateToMySlot),
        KeyCode::Char('X') => {
            view_state.confirm_reset = true;
            None
        }

        KeyCode::Char('/') => {
            if view_state.active_tab == TabId::Available {
                view_state.filter_mode = true;
            }
            None
        }
        KeyCode::Char('p') => {
            cycle_position_filter(view_state);
            None
        }
        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.position_filter = None;
            view_state.notice = None;
            None
        }

        KeyCode::Char('q') => Some(UserCommand::Quit),

        _ => None,
    }
}

/// Draft the highlighted player. Only meaningful on the players tab.
fn draft_selected(view_state: &ViewState, position: Option<Position>) -> Option<UserCommand> {
    if view_state.active_tab != TabId::Available {
        return None;
    }
    view_state
        .selected_player()
        .map(|player| UserCommand::DraftPlayer {
            player_name: player.name.clone(),
            position,
        })
}

/// `y` confirms the reset; `n` or Esc cancels; everything else is blocked.
fn handle_confirm_reset(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_state.confirm_reset = false;
            Some(UserCommand::Reset)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_reset = false;
            None
        }
        _ => None,
    }
}

/// Printable characters extend the filter; Backspace removes; Enter keeps
/// the filter and leaves filter mode; Esc clears it.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
            view_state.selected = 0;
        }
        _ => {}
    }
    view_state.clamp_selection();
    None
}

/// None -> DEF -> MID -> RUC -> FWD -> None
fn cycle_position_filter(view_state: &mut ViewState) {
    view_state.position_filter = match view_state.position_filter {
        None => Some(Position::ALL[0]),
        Some(current) => Position::ALL
            .iter()
            .position(|&p| p == current)
            .and_then(|i| Position::ALL.get(i + 1).copied()),
    };
    view_state.selected = 0;
}

fn active_widget_key(view_state: &ViewState) -> &'static str {
    match view_state.active_tab {
        TabId::Available => "available",
        TabId::DraftLog => "draft_log",
        TabId::Teams => "teams",
    }
}

/// On the players tab the arrows move the selection; elsewhere they scroll.
fn move_up(view_state: &mut ViewState, lines: usize) {
    if view_state.active_tab == TabId::Available {
        view_state.selected = view_state.selected.saturating_sub(lines);
        return;
    }
    let key = active_widget_key(view_state);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_sub(lines);
}

fn move_down(view_state: &mut ViewState, lines: usize) {
    if view_state.active_tab == TabId::Available {
        view_state.selected = view_state.selected.saturating_add(lines);
        view_state.clamp_selection();
        return;
    }
    let key = active_widget_key(view_state);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_add(lines);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::sample_snapshot;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn loaded_state() -> ViewState {
        let mut state = ViewState::default();
        state.apply_snapshot(sample_snapshot());
        state
    }

    // -- Tabs --

    #[test]
    fn number_keys_switch_tabs() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('2')), &mut state);
        assert_eq!(state.active_tab, TabId::DraftLog);
        handle_key(key(KeyCode::Char('3')), &mut state);
        assert_eq!(state.active_tab, TabId::Teams);
        handle_key(key(KeyCode::Char('1')), &mut state);
        assert_eq!(state.active_tab, TabId::Available);
    }

    #[test]
    fn tab_key_cycles() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.active_tab, TabId::DraftLog);
    }

    // -- Selection and scroll --

    #[test]
    fn arrows_move_selection_within_bounds() {
        let mut state = loaded_state();
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.selected, 0);
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.selected, 2);
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.selected, 3);
        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn arrows_scroll_other_tabs() {
        let mut state = loaded_state();
        state.active_tab = TabId::DraftLog;
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.scroll_offset.get("draft_log"), Some(&2));
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.scroll_offset.get("draft_log"), Some(&0));
        assert_eq!(state.selected, 0);
    }

    // -- Draft commands --

    #[test]
    fn enter_drafts_selected_at_best_position() {
        let mut state = loaded_state();
        handle_key(key(KeyCode::Down), &mut state);
        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(
            cmd,
            Some(UserCommand::DraftPlayer {
                player_name: "Jack Sinclair".to_string(),
                position: None,
            })
        );
    }

    #[test]
    fn position_keys_draft_at_that_position() {
        let expected = [
            ('d', Position::Def),
            ('m', Position::Mid),
            ('r', Position::Ruc),
            ('f', Position::Fwd),
        ];
        for (c, pos) in expected {
            let mut state = loaded_state();
            let cmd = handle_key(key(KeyCode::Char(c)), &mut state);
            assert_eq!(
                cmd,
                Some(UserCommand::DraftPlayer {
                    player_name: "Marcus Bontempelli".to_string(),
                    position: Some(pos),
                })
            );
        }
    }

    #[test]
    fn draft_keys_do_nothing_without_players_or_off_tab() {
        let mut empty = ViewState::default();
        assert!(handle_key(key(KeyCode::Enter), &mut empty).is_none());

        let mut state = loaded_state();
        state.active_tab = TabId::Teams;
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
    }

    #[test]
    fn undo_and_simulate_keys() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('u')), &mut state), Some(UserCommand::Undo));
        assert_eq!(
            handle_key(key(KeyCode::Char('s')), &mut state),
            Some(UserCommand::SimulateToMySlot)
        );
    }

    // -- Reset confirmation --

    #[test]
    fn reset_requires_confirmation() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('X')), &mut state).is_none());
        assert!(state.confirm_reset);

        // Other keys are swallowed while the dialog is up.
        assert!(handle_key(key(KeyCode::Char('u')), &mut state).is_none());
        assert!(state.confirm_reset);

        assert_eq!(handle_key(key(KeyCode::Char('y')), &mut state), Some(UserCommand::Reset));
        assert!(!state.confirm_reset);
    }

    #[test]
    fn reset_can_be_cancelled() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('X')), &mut state);
        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert!(!state.confirm_reset);
    }

    // -- Filter mode --

    #[test]
    fn slash_enters_filter_mode_only_on_players_tab() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('/')), &mut state);
        assert!(state.filter_mode);

        let mut state = ViewState::default();
        state.active_tab = TabId::DraftLog;
        handle_key(key(KeyCode::Char('/')), &mut state);
        assert!(!state.filter_mode);
    }

    #[test]
    fn filter_mode_captures_command_letters() {
        let mut state = loaded_state();
        state.filter_mode = true;
        for c in "sinc".chars() {
            assert!(handle_key(key(KeyCode::Char(c)), &mut state).is_none());
        }
        assert_eq!(state.filter_text, "sinc");
        handle_key(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.filter_text, "sin");
        handle_key(key(KeyCode::Enter), &mut state);
        assert!(!state.filter_mode);
        assert_eq!(state.filter_text, "sin");
        assert_eq!(state.selected_player().unwrap().name, "Jack Sinclair");
    }

    #[test]
    fn filter_mode_esc_clears() {
        let mut state = ViewState::default();
        state.filter_mode = true;
        state.filter_text = "abc".to_string();
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.filter_mode);
        assert!(state.filter_text.is_empty());
    }

    #[test]
    fn p_cycles_position_filter() {
        let mut state = ViewState::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            handle_key(key(KeyCode::Char('p')), &mut state);
            seen.push(state.position_filter);
        }
        assert_eq!(
            seen,
            vec![
                Some(Position::Def),
                Some(Position::Mid),
                Some(Position::Ruc),
                Some(Position::Fwd),
                None
            ]
        );
    }

    // -- Quit --

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut state = ViewState::default();
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), Some(UserCommand::Quit));
        state.filter_mode = true;
        assert_eq!(handle_key(ctrl_key(KeyCode::Char('c')), &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert!(handle_key(event, &mut state).is_none());
    }
}
