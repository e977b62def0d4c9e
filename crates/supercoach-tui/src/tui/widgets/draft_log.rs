// Draft log widget: completed picks, most recent first.
//
// Each line: "#{pick} R{round} {team}: {player} ({pos})". The user's own
// picks are highlighted.

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use supercoach_core::draft::turn;

use crate::protocol::LogEntry;
use crate::tui::ViewState;

/// Render the draft log into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let log = &state.snapshot.draft_log;
    if log.is_empty() {
        let paragraph = Paragraph::new("  No picks yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Draft Log"));
        frame.render_widget(paragraph, area);
        return;
    }

    let num_teams = state.snapshot.teams.len() as u32;
    let my_slot = state.snapshot.my_slot;

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = log.len();
    let max_offset = total.saturating_sub(visible_rows);
    let scroll_offset = state
        .scroll_offset
        .get("draft_log")
        .copied()
        .unwrap_or(0)
        .min(max_offset);

    let items: Vec<ListItem> = log
        .iter()
        .rev()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(|entry| {
            let style = if entry.pick.team_id == my_slot {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(format_entry(entry, num_teams), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Draft Log ({})", total)),
    );
    frame.render_widget(list, area);

    if total > visible_rows {
        let mut scrollbar_state = ScrollbarState::new(max_offset).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

pub fn format_entry(entry: &LogEntry, num_teams: u32) -> String {
    let pick = &entry.pick;
    let round = turn::round_for_pick(pick.pick_number, num_teams)
        .map(|r| format!("R{r} "))
        .unwrap_or_default();
    format!(
        "#{} {}{}: {} ({})",
        pick.pick_number, round, entry.team_name, pick.player_name, pick.position
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::sample_snapshot;
    use supercoach_core::draft::pick::{Pick, Position};

    #[test]
    fn format_entry_includes_round() {
        let entry = LogEntry {
            pick: Pick {
                pick_number: 11,
                team_id: 10,
                player_name: "Tim English".to_string(),
                position: Position::Ruc,
            },
            team_name: "Team 10".to_string(),
        };
        assert_eq!(format_entry(&entry, 10), "#11 R2 Team 10: Tim English (RUC)");
        // Without a team count the round is omitted.
        assert_eq!(format_entry(&entry, 0), "#11 Team 10: Tim English (RUC)");
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_with_overflowing_scroll() {
        let backend = ratatui::backend::TestBackend::new(80, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.apply_snapshot(sample_snapshot());
        state.scroll_offset.insert("draft_log".to_string(), 99);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
