//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.
//!
//! Progress goes to stderr: stdout carries the public key or stack document.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` (suppressed when `ctx.quiet`)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            eprintln!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            eprintln!("  {} {message}", "✓".style(self.ctx.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        if !self.ctx.quiet {
            eprintln!("  {} {message}", "!".style(self.ctx.styles.warning));
        }
    }
}

/// Reporter that discards everything; used in `--json` mode.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Reporter selected by output mode.
pub enum Reporter<'a> {
    /// Human progress on stderr.
    Terminal(TerminalReporter<'a>),
    /// `--json` or `--quiet`.
    Silent(SilentReporter),
}

impl ProgressReporter for Reporter<'_> {
    fn step(&self, message: &str) {
        match self {
            Self::Terminal(r) => r.step(message),
            Self::Silent(r) => r.step(message),
        }
    }

    fn success(&self, message: &str) {
        match self {
            Self::Terminal(r) => r.success(message),
            Self::Silent(r) => r.success(message),
        }
    }

    fn warn(&self, message: &str) {
        match self {
            Self::Terminal(r) => r.warn(message),
            Self::Silent(r) => r.warn(message),
        }
    }
}
