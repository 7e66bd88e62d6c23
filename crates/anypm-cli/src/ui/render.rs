//! Pure rendering of final results.
//!
//! Nothing here writes to a stream; callers print the returned string once,
//! after the batch has finished.

use std::fmt::Write as _;

use anypm_core::PlannedRequest;
use anypm_schema::InstallOutcome;
use crossterm::style::{Color, Stylize};

use super::theme::Theme;

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.with(color).to_string()
    } else {
        text.to_string()
    }
}

/// One line per outcome in input order, then a one-line tally.
pub fn render_outcomes(outcomes: &[InstallOutcome], theme: &Theme, color: bool) -> String {
    let mut out = String::new();

    for outcome in outcomes {
        let id = paint(outcome.identifier(), theme.colors.identifier, color);
        match outcome.failure_reason() {
            None => {
                let icon = paint(theme.icons.success, theme.colors.success, color);
                let _ = write!(out, "{icon} {id}");
                if let Some(detail) = outcome.detail() {
                    let _ = write!(out, " {}", paint(&format!("-> {detail}"), theme.colors.secondary, color));
                }
                out.push('\n');
            }
            Some(reason) => {
                let icon = paint(theme.icons.error, theme.colors.error, color);
                let _ = writeln!(out, "{icon} {id}: {reason}");
            }
        }
    }

    let failed = outcomes.iter().filter(|o| !o.success()).count();
    let installed = outcomes.len() - failed;
    let tally = format!("{installed} installed, {failed} failed");
    let tally_color = if failed == 0 {
        theme.colors.success
    } else {
        theme.colors.error
    };
    let _ = writeln!(out, "\n{}", paint(&tally, tally_color, color));
    out
}

/// What a dry run would do, one line per identifier.
pub fn render_plan(plan: &[PlannedRequest], theme: &Theme, color: bool) -> String {
    let mut out = String::new();
    for entry in plan {
        let id = paint(&entry.identifier, theme.colors.identifier, color);
        match (&entry.ecosystem, &entry.reason) {
            (Some(eco), None) => {
                let icon = paint(theme.icons.pending, theme.colors.active, color);
                let eco = paint(&format!("via {eco}"), theme.colors.secondary, color);
                let _ = writeln!(out, "{icon} {id} {eco}");
            }
            (_, Some(reason)) => {
                let icon = paint(theme.icons.warning, theme.colors.warning, color);
                let _ = writeln!(out, "{icon} {id}: {reason}");
            }
            (None, None) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anypm_schema::{Ecosystem, FailureKind};

    #[test]
    fn test_outcomes_in_order_with_tally() {
        let outcomes = vec![
            InstallOutcome::succeeded("npm:left-pad", None),
            InstallOutcome::failed("pip:", FailureKind::EmptyIdentifier, "empty package name"),
            InstallOutcome::succeeded("gh:acme/tool", Some("/c/tool.tar.gz".to_string())),
        ];

        let text = render_outcomes(&outcomes, &Theme::default(), false);

        assert_eq!(
            text,
            "✓ npm:left-pad\n\
             ✗ pip:: empty package name\n\
             ✓ gh:acme/tool -> /c/tool.tar.gz\n\
             \n\
             2 installed, 1 failed\n"
        );
    }

    #[test]
    fn test_plain_output_has_no_escapes() {
        let outcomes = vec![
            InstallOutcome::succeeded("x", None),
            InstallOutcome::failed("y", FailureKind::Fatal, "fatal: boom"),
        ];
        let plain = render_outcomes(&outcomes, &Theme::default(), false);
        assert!(!plain.contains('\x1b'));
    }

    #[test]
    fn test_plan_lines() {
        let plan = vec![
            PlannedRequest {
                identifier: "left-pad".to_string(),
                ecosystem: Some(Ecosystem::Npm),
                reason: None,
            },
            PlannedRequest {
                identifier: "git".to_string(),
                ecosystem: Some(Ecosystem::SystemTool),
                reason: Some("'git' is a system tool; install it with your OS package manager".to_string()),
            },
        ];

        let text = render_plan(&plan, &Theme::default(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "○ left-pad via npm");
        assert!(lines[1].starts_with("⚠ git: 'git' is a system tool"));
    }
}
