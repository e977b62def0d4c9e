// Teams widget: every team's position counts and roster fill.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use supercoach_core::draft::pick::Position;

use crate::protocol::TeamSummary;
use crate::tui::ViewState;

/// Render the teams overview into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut header_cells = vec![Cell::from("Team")];
    header_cells.extend(Position::ALL.iter().map(|p| Cell::from(p.display_str())));
    header_cells.push(Cell::from("Filled"));
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let on_clock = state.snapshot.on_clock.as_ref().map(|(team, _)| *team);

    let rows: Vec<Row> = if state.snapshot.teams.is_empty() {
        vec![Row::new(vec![Cell::from("  No team data available")])]
    } else {
        state
            .snapshot
            .teams
            .iter()
            .map(|team| {
                let mut cells = vec![Cell::from(team_label(team, state.snapshot.my_slot))];
                cells.extend(
                    Position::ALL
                        .iter()
                        .map(|p| Cell::from(team.counts.get(p).copied().unwrap_or(0).to_string())),
                );
                cells.push(Cell::from(format!("{}/{}", team.total, team.roster_size)));
                let style = if Some(team.team_id) == on_clock {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Row::new(cells).style(style)
            })
            .collect()
    };

    let widths = [
        Constraint::Min(18),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Teams"));
    frame.render_widget(table, area);
}

/// "3. Name", with a star on the user's own team.
pub fn team_label(team: &TeamSummary, my_slot: u32) -> String {
    let marker = if team.team_id == my_slot { "*" } else { "" };
    format!("{}. {}{}", team.team_id, team.name, marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::sample_snapshot;

    #[test]
    fn label_marks_my_team() {
        let snap = sample_snapshot();
        assert_eq!(team_label(&snap.teams[1], 2), "2. Team 2*");
        assert_eq!(team_label(&snap.teams[0], 2), "1. Team 1");
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
    fn render_does_not_panic_with_teams() {
        let backend = ratatui::backend::TestBackend::new(80, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.apply_snapshot(sample_snapshot());
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
