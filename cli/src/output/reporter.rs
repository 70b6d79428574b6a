//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::domain::Stage;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `stage()` prints `"[n/4] {stage}"`
/// - `step()` starts a spinner on a TTY, otherwise prints `"  → {message}"`
/// - `stream()` prints `"  → {message}"` and leaves the console to the child
/// - `success()` / `skipped()` finish the spinner or print `✓` / `·`
///
/// Everything is suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            spinner: RefCell::new(None),
        }
    }

    fn take_spinner(&self) -> Option<ProgressBar> {
        self.spinner.borrow_mut().take()
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn stage(&self, stage: Stage) {
        if self.ctx.quiet {
            return;
        }
        let n = Stage::ALL.iter().position(|s| *s == stage).map_or(0, |i| i + 1);
        println!(
            "{} {}",
            format!("[{n}/{}]", Stage::ALL.len()).style(self.ctx.styles.dim),
            stage.style(self.ctx.styles.header)
        );
    }

    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if self.ctx.show_progress() {
            if let Some(previous) = self.spinner.replace(Some(progress::spinner(message))) {
                previous.finish_and_clear();
            }
        } else {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn stream(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        if let Some(pb) = self.take_spinner() {
            pb.finish_and_clear();
        }
        println!("  {} {message}", "→".style(self.ctx.styles.info));
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        match self.take_spinner() {
            Some(pb) => progress::finish_ok(&pb, message),
            None => println!("  {} {message}", "✓".style(self.ctx.styles.success)),
        }
    }

    fn skipped(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        match self.take_spinner() {
            Some(pb) => progress::finish_skipped(&pb, message),
            None => println!(
                "  {} {}",
                "·".style(self.ctx.styles.dim),
                format!("{message} (already converged)").style(self.ctx.styles.dim)
            ),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    /// A spinner still running here belongs to the step that failed.
    fn drop(&mut self) {
        if let Some(pb) = self.spinner.get_mut().take() {
            progress::finish_failed(&pb);
        }
    }
}
