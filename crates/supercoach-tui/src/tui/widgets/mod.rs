// TUI widget modules for each dashboard panel.

pub mod available;
pub mod draft_log;
pub mod help_bar;
pub mod reset_confirm;
pub mod roster;
pub mod scarcity;
pub mod status_bar;
pub mod teams;
