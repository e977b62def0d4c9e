// Status bar widget: draft progress, team on the clock, tab indicator.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{AppSnapshot, TabId};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [league] [pick/round] [on the clock] [my next pick] | [tabs]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snap = &state.snapshot;
    let mut spans = vec![
        Span::styled(
            format!(" {} ", snap.league_name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(progress_text(snap), Style::default().fg(Color::White)),
        Span::styled(" | ", Style::default().fg(Color::Gray)),
    ];

    let (clock, clock_style) = clock_text(snap);
    spans.push(Span::styled(clock, clock_style));
    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.extend(tab_spans(state.active_tab));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// "Pick 12/230 R2", or "Draft complete (230 picks)".
pub fn progress_text(snap: &AppSnapshot) -> String {
    if snap.is_complete {
        return format!("Draft complete ({} picks)", snap.total_picks);
    }
    match snap.current_round {
        Some(round) => format!("Pick {}/{} R{}", snap.next_pick, snap.total_picks, round),
        None => format!("Pick {}/{}", snap.next_pick, snap.total_picks),
    }
}

/// Who is picking, highlighted when it's the user.
pub fn clock_text(snap: &AppSnapshot) -> (String, Style) {
    if snap.is_my_turn() {
        return (
            "YOUR PICK".to_string(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );
    }
    let text = match (&snap.on_clock, snap.my_next_pick) {
        (Some((_, name)), Some(mine)) => format!("On the clock: {name} | You pick at #{mine}"),
        (Some((_, name)), None) => format!("On the clock: {name}"),
        (None, _) => "--".to_string(),
    };
    (text, Style::default().fg(Color::Yellow))
}

/// "[1:Players] [2:Log] [3:Teams]" with the active tab highlighted.
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let tabs = [
        (TabId::Available, "1:Players"),
        (TabId::DraftLog, "2:Log"),
        (TabId::Teams, "3:Teams"),
    ];

    let mut spans = Vec::new();
    for (tab_id, label) in tabs {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans
}
