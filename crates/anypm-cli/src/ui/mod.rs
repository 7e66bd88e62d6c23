//! Terminal presentation: live progress on stderr, final summary on stdout.

pub mod render;
pub mod reporter;
pub mod theme;

use std::io::IsTerminal;

pub use render::{render_outcomes, render_plan};
pub use reporter::TerminalReporter;
pub use theme::Theme;

/// Colour stdout only when it is a terminal and `NO_COLOR` is unset.
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
