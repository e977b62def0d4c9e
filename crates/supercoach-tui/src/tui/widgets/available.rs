// Available players widget: ranked table of undrafted players.
//
// Rank, Name, Club, Pos, Rating, VORP, Best, Health. Rows the team on the
// clock cannot roster are dimmed and sorted last by the valuator.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use supercoach_core::draft::pick::{format_positions, Position};
use supercoach_core::injury::HealthStatus;
use supercoach_core::valuation::vorp::RankedPlayer;

use crate::tui::ViewState;

/// Render the available players table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let filtered = state.filtered_players();

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Club"),
        Cell::from("Pos"),
        Cell::from("Rating"),
        Cell::from("VORP"),
        Cell::from("Best"),
        Cell::from("Health"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = filtered
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if p.is_eligible() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(p.name.clone()),
                Cell::from(p.club.clone()),
                Cell::from(format_positions(&p.positions)),
                Cell::from(format!("{:.1}", p.rating)),
                Cell::from(format_vorp(p)),
                Cell::from(p.best_position.map_or("--", |pos| pos.display_str())),
                Cell::from(p.health.label()).style(Style::default().fg(health_color(p.health))),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(18),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(state, filtered.len())),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !filtered.is_empty() {
        table_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Filter players by position and case-insensitive name search.
pub fn filter_players<'a>(
    players: &'a [RankedPlayer],
    position_filter: Option<Position>,
    filter_text: &str,
) -> Vec<&'a RankedPlayer> {
    let text_lower = filter_text.to_lowercase();

    players
        .iter()
        .filter(|p| position_filter.map_or(true, |pos| p.positions.contains(&pos)))
        .filter(|p| text_lower.is_empty() || p.name.to_lowercase().contains(&text_lower))
        .collect()
}

/// VORP with one decimal, or `--` for players the team cannot roster.
pub fn format_vorp(player: &RankedPlayer) -> String {
    if player.is_eligible() && player.vorp.is_finite() {
        format!("{:+.1}", player.vorp)
    } else {
        "--".to_string()
    }
}

pub fn health_color(status: HealthStatus) -> Color {
    match status {
        HealthStatus::Fit => Color::Green,
        HealthStatus::Test | HealthStatus::Managed => Color::Yellow,
        HealthStatus::Out => Color::Red,
        HealthStatus::Unknown => Color::DarkGray,
    }
}

fn build_title(state: &ViewState, filtered_count: usize) -> Line<'static> {
    let mut title = String::from("Available Players");
    if let Some((_, name)) = &state.snapshot.on_clock {
        title.push_str(&format!(" for {name}"));
    }
    if let Some(pos) = state.position_filter {
        title.push_str(&format!(" [{}]", pos.display_str()));
    }
    if !state.filter_text.is_empty() {
        title.push_str(&format!(" \"{}\"", state.filter_text));
    }
    title.push_str(&format!(" ({filtered_count})"));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
