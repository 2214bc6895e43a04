//! Terminal rendering for the tirestock CLI.
//!
//! Handlers never call `println!` directly. Text mode prints indented,
//! coloured lines; `--json` turns every notice into a
//! `{"type": ..., "payload": ...}` line next to the command's own result
//! object; `--quiet` keeps warnings, errors and command results only.
//! Errors always go to stderr.

use std::fmt::Display;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// Presentation flags taken from the global CLI options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Count of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT: RwLock<OutputConfig> = parking_lot::const_rwlock(OutputConfig::new(false, false, 0));

/// Install the flags for the rest of the process.
pub fn configure(config: OutputConfig) {
    *OUTPUT.write() = config;
}

fn current() -> OutputConfig {
    *OUTPUT.read()
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn verbosity() -> u8 {
    current().verbose
}

/// Kinds of one-line notices a handler can print.
#[derive(Debug, Clone, Copy)]
enum Notice {
    Success,
    Warning,
    Note,
    Hint,
}

impl Notice {
    fn kind(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Note => "note",
            Self::Hint => "hint",
        }
    }

    /// Warnings survive `--quiet`.
    fn is_essential(self) -> bool {
        matches!(self, Self::Warning)
    }

    fn render(self, message: &str) -> String {
        match self {
            Self::Success => format!("{} {message}", "✓".green()),
            Self::Warning => format!("{} {message}", "!".yellow().bold()),
            Self::Note => format!("{}", message.dimmed()),
            Self::Hint => format!("{} {}", "hint:".cyan(), message.dimmed()),
        }
    }
}

fn json_line(kind: &str, payload: Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

fn print_notice(notice: Notice, message: &str) {
    let config = current();
    if config.json {
        json_line(notice.kind(), json!({ "message": message }));
    } else if !config.quiet || notice.is_essential() {
        println!("  {}", notice.render(message));
    }
}

/// Text mode output that `--quiet` hides.
fn shows_text() -> bool {
    let config = current();
    !config.json && !config.quiet
}

pub fn success(message: &str) {
    print_notice(Notice::Success, message);
}

pub fn warning(message: &str) {
    print_notice(Notice::Warning, message);
}

pub fn note(message: &str) {
    print_notice(Notice::Note, message);
}

/// A follow-up suggestion, e.g. restocking a tire that went low.
pub fn hint(message: &str) {
    print_notice(Notice::Hint, message);
}

/// Report a failed command on stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {message}", "✗".red().bold());
    }
}

/// One `label value` row of a detail view such as a tire or a movement.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    if is_json() {
        json_line("field", json!({ "label": label, "value": value }));
    } else if shows_text() {
        println!("  {:<14} {value}", label.dimmed());
    }
}

/// Heading above a table or a group of fields.
pub fn section(title: &str) {
    if is_json() {
        json_line("section", json!({ "title": title }));
    } else if shows_text() {
        println!();
        println!("{}", title.bold().underline());
    }
}

/// The command's result object; always printed, even with `--quiet`.
pub fn json_output(value: Value) {
    println!("{value}");
}

/// Print a `tabled` table in text mode.
pub fn table(table: &tabled::Table) {
    if !shows_text() {
        return;
    }
    for line in table.to_string().lines() {
        println!("  {line}");
    }
}

/// Spinner shown while tires are copied to the hosted backend.
///
/// Hidden in JSON and quiet mode so scripted runs see no control codes.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = if shows_text() {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["◐", "◓", "◑", "◒", "●"]),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    } else {
        ProgressBar::hidden()
    };
    bar.set_message(message.to_string());
    bar
}

/// Stop a spinner and leave the failure on screen.
pub fn spinner_fail(bar: &ProgressBar, message: &str) {
    if is_json() {
        json_line("progress_failed", json!({ "message": message }));
        bar.finish_and_clear();
    } else {
        bar.abandon_with_message(format!("{} {message}", "✗".red()));
    }
}

fn styled(value: impl Display, paint: fn(&str) -> String) -> String {
    let value = value.to_string();
    if is_json() {
        value
    } else {
        paint(&value)
    }
}

/// Healthy stock, entradas, the hosted backend.
pub fn positive(value: impl Display) -> String {
    styled(value, |v| v.green().to_string())
}

/// Low stock and removals.
pub fn negative(value: impl Display) -> String {
    styled(value, |v| v.red().to_string())
}

pub fn highlight(value: impl Display) -> String {
    styled(value, |v| v.cyan().bold().to_string())
}

pub fn muted(value: impl Display) -> String {
    styled(value, |v| v.dimmed().to_string())
}

/// Money with two decimals.
#[must_use]
pub fn money(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(money(dec!(350)), "$350.00");
        assert_eq!(money(dec!(89.999)), "$90.00");
    }

    #[test]
    fn only_warnings_survive_quiet() {
        assert!(Notice::Warning.is_essential());
        for notice in [Notice::Success, Notice::Note, Notice::Hint] {
            assert!(!notice.is_essential(), "{} is hidden by --quiet", notice.kind());
        }
    }
}
