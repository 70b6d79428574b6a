//! Typed error enums.
//!
//! Nothing here is recovered locally: every error aborts the current stage
//! and the whole run. All types implement `thiserror::Error` and convert to
//! `anyhow::Error` at the CLI boundary via `?`.

use std::io;
use std::path::PathBuf;

use kitchen_common::TopologyError;
use thiserror::Error;

use crate::domain::step::Stage;

// ── Command errors ────────────────────────────────────────────────────────────

/// A shell command could not be run or exited unsuccessfully.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` timed out after {secs}s")]
    TimedOut { command: String, secs: u64 },

    #[error("`{command}` {}", describe_exit(.code, .output))]
    Failed {
        command: String,
        /// `None` when the child was killed by a signal.
        code: Option<i32>,
        /// Captured stdout followed by stderr, trimmed.
        output: String,
    },
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>, output: &str) -> String {
    let status = match *code {
        Some(c) => format!("exited with status {c}"),
        None => "was terminated by a signal".to_string(),
    };
    if output.is_empty() {
        status
    } else {
        format!("{status}:\n{output}")
    }
}

// ── File errors ───────────────────────────────────────────────────────────────

/// A managed file could not be inspected or replaced.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ── Service errors ────────────────────────────────────────────────────────────

/// An SMF operation failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("cannot query state of {fmri}")]
    Query {
        fmri: String,
        #[source]
        source: CommandError,
    },

    #[error("cannot enable {fmri}")]
    Enable {
        fmri: String,
        #[source]
        source: CommandError,
    },

    #[error("cannot set {property}")]
    SetProperty {
        property: String,
        #[source]
        source: CommandError,
    },

    #[error("cannot refresh {fmri}")]
    Refresh {
        fmri: String,
        #[source]
        source: CommandError,
    },
}

// ── Fact errors ───────────────────────────────────────────────────────────────

/// Live host facts could not be resolved.
#[derive(Debug, Error)]
pub enum FactError {
    #[error("cannot read resolver configuration {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ── Run errors ────────────────────────────────────────────────────────────────

/// The failure of a single step, whatever its kind.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Fact(#[from] FactError),
}

/// Terminal failure of a run: the stage it stopped in and why.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("stage {stage} failed at step '{step}'")]
    StageFailed {
        stage: Stage,
        step: String,
        #[source]
        cause: StepError,
    },
}

impl ProvisionError {
    /// The stage the run stopped in.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            ProvisionError::StageFailed { stage, .. } => *stage,
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// The configuration file parsed but describes something unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid network topology: {0}")]
    Topology(#[from] TopologyError),

    #[error("{field} must be an absolute path, got {}", .path.display())]
    RelativePath { field: &'static str, path: PathBuf },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("commands.timeout_secs must be greater than zero")]
    ZeroTimeout,
}
