//! Live progress on stderr.
//!
//! Status lines go to stderr so that stdout carries only the final summary
//! (or JSON). Download progress redraws a single line and is only shown when
//! stderr is a terminal.

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anypm_core::Reporter;
use anypm_schema::Ecosystem;
use crossterm::QueueableCommand;
use crossterm::cursor::MoveToColumn;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};

use super::theme::{Theme, format_size};

#[derive(Debug)]
pub struct TerminalReporter {
    theme: Theme,
    interactive: bool,
    color: bool,
    // Whether the cursor is sitting on an unfinished progress line.
    progress_open: AtomicBool,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        let interactive = std::io::stderr().is_terminal();
        Self {
            theme: Theme::default(),
            interactive,
            color: interactive && std::env::var_os("NO_COLOR").is_none(),
            progress_open: AtomicBool::new(false),
        }
    }

    fn line(&self, icon: &str, icon_color: crossterm::style::Color, identifier: &str, msg: &str) {
        let mut err = std::io::stderr().lock();
        self.close_progress(&mut err);
        let _ = if self.color {
            writeln!(
                err,
                "{} {} {}",
                icon.with(icon_color),
                identifier.with(self.theme.colors.identifier),
                msg.with(self.theme.colors.secondary)
            )
        } else {
            writeln!(err, "{icon} {identifier} {msg}")
        };
    }

    fn close_progress(&self, err: &mut impl Write) {
        if self.progress_open.swap(false, Ordering::Relaxed) {
            let _ = err.queue(MoveToColumn(0));
            let _ = err.queue(Clear(ClearType::CurrentLine));
            let _ = err.flush();
        }
    }
}

impl Reporter for TerminalReporter {
    fn detected(&self, identifier: &str, ecosystem: Ecosystem) {
        tracing::debug!(identifier, %ecosystem, "detected");
    }

    fn installing(&self, identifier: &str, ecosystem: Ecosystem) {
        let icon = self.theme.icons.active;
        self.line(icon, self.theme.colors.active, identifier, &format!("via {ecosystem}"));
    }

    fn downloading(&self, identifier: &str, current: u64, total: Option<u64>) {
        if !self.interactive {
            return;
        }
        let size = match total {
            Some(total) if total > 0 => format!("{} / {}", format_size(current), format_size(total)),
            _ => format_size(current),
        };
        let mut err = std::io::stderr().lock();
        let _ = err.queue(MoveToColumn(0));
        let _ = err.queue(Clear(ClearType::CurrentLine));
        let _ = write!(err, "{} {identifier} fetching {size}", self.theme.icons.pending);
        let _ = err.flush();
        self.progress_open.store(true, Ordering::Relaxed);
    }

    fn retrying(&self, identifier: &str, attempt: u32, delay: Duration) {
        let msg = format!("attempt {attempt} failed, retrying in {}s", delay.as_secs_f32());
        self.line(self.theme.icons.warning, self.theme.colors.warning, identifier, &msg);
    }

    fn verifying(&self, identifier: &str) {
        self.line(self.theme.icons.info, self.theme.colors.active, identifier, "verifying checksum");
    }

    fn done(&self, _identifier: &str, _detail: Option<&str>) {
        self.close_progress(&mut std::io::stderr().lock());
    }

    fn failed(&self, _identifier: &str, _reason: &str) {
        self.close_progress(&mut std::io::stderr().lock());
    }
}
