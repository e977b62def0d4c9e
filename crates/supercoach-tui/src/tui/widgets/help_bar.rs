// Help bar widget: the last notice from the app loop, or key hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::NoticeLevel;
use crate::tui::ViewState;

const KEY_HINTS: &str =
    " Enter:Draft best | d/m/r/f:Draft at pos | u:Undo | s:Sim to me | X:Reset | /:Filter | p:Pos | Tab | q:Quit";
const FILTER_HINTS: &str = " Type to filter | Enter:Keep | Esc:Clear";

/// Render the help bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = if state.filter_mode {
        Line::from(Span::styled(
            format!("{FILTER_HINTS} | /{}", state.filter_text),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(notice) = &state.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        Line::from(Span::styled(
            format!(" {}", notice.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            KEY_HINTS,
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        ))
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
