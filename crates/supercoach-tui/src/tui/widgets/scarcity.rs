// Scarcity widget: one row per position.
//
// "MID ████████   HIGH  9 left / 7 needed (b/l 82.5)"
// Color: Red=Critical, Yellow=High, Blue=Medium, Green=Low

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use supercoach_core::valuation::scarcity::{ScarcityEntry, ScarcityUrgency};

use crate::tui::ViewState;

/// Render the scarcity rows into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL).title("Scarcity");
    if state.snapshot.scarcity.is_empty() {
        let paragraph = Paragraph::new("  No scarcity data.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .snapshot
        .scarcity
        .iter()
        .map(format_scarcity_entry)
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn format_scarcity_entry(entry: &ScarcityEntry) -> ListItem<'static> {
    let color = urgency_color(entry.urgency);
    let spans = vec![
        Span::styled(
            format!("{:>3} ", entry.position.display_str()),
            Style::default().fg(Color::White),
        ),
        Span::styled(urgency_bar(entry.above_baseline), Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(
            format!("{:>8}", entry.urgency.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " {} left / {} needed (b/l {:.1})",
                entry.supply, entry.remaining_demand, entry.baseline
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    ListItem::new(Line::from(spans))
}

pub fn urgency_color(urgency: ScarcityUrgency) -> Color {
    match urgency {
        ScarcityUrgency::Critical => Color::Red,
        ScarcityUrgency::High => Color::Yellow,
        ScarcityUrgency::Medium => Color::Blue,
        ScarcityUrgency::Low => Color::Green,
    }
}

/// Ten-cell gauge of players above the baseline, full at 10 or more.
pub fn urgency_bar(above_baseline: usize) -> String {
    const WIDTH: usize = 10;
    let filled = above_baseline.min(WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::sample_snapshot;

    #[test]
    fn urgency_colors() {
        assert_eq!(urgency_color(ScarcityUrgency::Critical), Color::Red);
        assert_eq!(urgency_color(ScarcityUrgency::High), Color::Yellow);
        assert_eq!(urgency_color(ScarcityUrgency::Medium), Color::Blue);
        assert_eq!(urgency_color(ScarcityUrgency::Low), Color::Green);
    }

    #[test]
    fn bar_fills_and_caps() {
        assert_eq!(urgency_bar(0), "░░░░░░░░░░");
        assert_eq!(urgency_bar(3), "███░░░░░░░");
        assert_eq!(urgency_bar(25), "██████████");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(60, 10);
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
