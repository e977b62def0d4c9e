// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the draft dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Main Panel (65%)         | Sidebar (35%)          |
// |                          | +- Roster (55%) ------+|
// |                          | +- Scarcity (45%) ----+|
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: pick counter, round, team on the clock.
    pub status_bar: Rect,
    /// Tab-switched content: players, draft log, teams.
    pub main_panel: Rect,
    /// Right sidebar top: user's roster against caps.
    pub roster: Rect,
    /// Right sidebar bottom: positional scarcity.
    pub scarcity: Rect,
    /// Bottom row: last notice or keyboard hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // main + sidebar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(vertical[1]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(horizontal[1]);

    AppLayout {
        status_bar: vertical[0],
        main_panel: horizontal[0],
        roster: sidebar[0],
        scarcity: sidebar[1],
        help_bar: vertical[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("main_panel", layout.main_panel),
            ("roster", layout.roster),
            ("scarcity", layout.scarcity),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn bars_are_one_row() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.help_bar.y, 49);
    }

    #[test]
    fn main_panel_is_wider_than_sidebar() {
        let layout = build_layout(test_area());
        assert!(layout.main_panel.width > layout.roster.width);
        assert_eq!(layout.roster.x, layout.scarcity.x);
        assert_eq!(
            layout.main_panel.width + layout.roster.width,
            test_area().width
        );
    }

    #[test]
    fn sidebar_stacks_roster_above_scarcity() {
        let layout = build_layout(test_area());
        assert!(layout.roster.y < layout.scarcity.y);
        assert_eq!(layout.roster.y + layout.roster.height, layout.scarcity.y);
    }
}
