// Roster widget: the user's picks grouped by position against caps.
//
// "MID 2/3 (6 starters)" followed by the players at that position. A
// position at its cap is shown in green.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::protocol::RosterLine;
use crate::tui::ViewState;

/// Render the roster sidebar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("My Roster");
    if state.snapshot.my_roster.is_empty() {
        let paragraph = Paragraph::new("  No roster data.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let lines: Vec<Line> = state
        .snapshot
        .my_roster
        .iter()
        .flat_map(roster_lines)
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn roster_lines(line: &RosterLine) -> Vec<Line<'static>> {
    let filled = line.players.len() as u32;
    let color = if filled >= line.cap {
        Color::Green
    } else if filled >= line.starters {
        Color::Cyan
    } else {
        Color::White
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{} ", line.position.display_str()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format_fill(line), Style::default().fg(color)),
    ])];
    lines.extend(
        line.players
            .iter()
            .map(|name| Line::from(Span::raw(format!("  {name}")))),
    );
    lines
}

pub fn format_fill(line: &RosterLine) -> String {
    format!(
        "{}/{} ({} starters)",
        line.players.len(),
        line.cap,
        line.starters
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::sample_snapshot;
    use supercoach_core::draft::pick::Position;

    #[test]
    fn fill_text() {
        let line = RosterLine {
            position: Position::Mid,
            players: vec!["A".into(), "B".into()],
            starters: 6,
            cap: 8,
        };
        assert_eq!(format_fill(&line), "2/8 (6 starters)");
        assert_eq!(roster_lines(&line).len(), 3);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(40, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        state.apply_snapshot(sample_snapshot());
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
