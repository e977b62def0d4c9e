// Library root: exposes the app loop, protocol, and TUI so the binary and
// tests share one module tree.

pub mod app;
pub mod protocol;
pub mod tui;
