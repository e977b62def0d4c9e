// Reset confirmation overlay widget.
//
// Renders a centered modal dialog asking the user to confirm clearing the
// draft. Displayed on top of the main layout when
// `ViewState::confirm_reset` is true.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_WIDTH: u16 = 36;
const DIALOG_HEIGHT: u16 = 5;

/// Render the reset confirmation overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Span::styled(
            " Reset draft? ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));

    let text = vec![
        Line::from("  Every pick will be cleared."),
        Line::from(vec![
            Span::raw("  Continue? ("),
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("/"),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(")"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// A centered rectangle of the given size, clamped to `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);

    Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let result = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        assert_eq!(result.width, DIALOG_WIDTH);
        assert_eq!(result.height, DIALOG_HEIGHT);
        // Within one cell, depending on how the odd remainder is split.
        assert!(result.x.abs_diff((80 - DIALOG_WIDTH) / 2) <= 1);
        assert!(result.y.abs_diff((24 - DIALOG_HEIGHT) / 2) <= 1);
    }

    #[test]
    fn centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 20, 3);
        let result = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        assert_eq!(result.width, 20);
        assert_eq!(result.height, 3);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, frame.area())).unwrap();
    }
}
