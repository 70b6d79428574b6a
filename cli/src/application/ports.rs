//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::io;
use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::domain::{CommandError, FactError, KitchenConfig, Stage};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts shell execution so the host can be swapped for a simulation.
///
/// Both methods return the child's `Output` whatever its exit status;
/// deciding what a non-zero status means is the caller's job.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run `script` with `/bin/sh -c`, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot be spawned or the command exceeds
    /// the runner's timeout. On timeout the child must be killed.
    async fn run_shell(&self, script: &str) -> Result<Output, CommandError>;

    /// Run `script` with `/bin/sh -c`, echoing output to the console line by
    /// line as it is produced while also capturing it. No timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot be spawned.
    async fn run_shell_streaming(&self, script: &str) -> Result<Output, CommandError>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the host filesystem operations the provisioner needs.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file. `Ok(None)` when it does not exist.
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Replace `path` with `content` so readers see either the old or the new
    /// file, never a partial one. `mode` is applied to the new file.
    fn write_atomic(&self, path: &Path, content: &[u8], mode: u32) -> io::Result<()>;
}

impl<T: LocalFs + ?Sized> LocalFs for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        (**self).read(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn write_atomic(&self, path: &Path, content: &[u8], mode: u32) -> io::Result<()> {
        (**self).write_atomic(path, content, mode)
    }
}

// ── Fact Provider Port ────────────────────────────────────────────────────────

/// Live host configuration that generated content depends on.
#[cfg_attr(test, mockall::automock)]
pub trait FactProvider {
    /// The host's DNS domain, or `"local"` when none is configured.
    fn domain_name(&self) -> Result<String, FactError>;

    /// Configured name server addresses in resolver order. May be empty.
    fn name_servers(&self) -> Result<Vec<String>, FactError>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// A stage is about to start.
    fn stage(&self, stage: Stage);
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// A step whose child output follows directly on the console.
    fn stream(&self, message: &str);
    /// The current step changed the host.
    fn success(&self, message: &str);
    /// The current step was already converged.
    fn skipped(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading of the provisioner configuration.
pub trait ConfigStore {
    /// Load and validate the configuration, falling back to defaults when
    /// the file does not exist.
    fn load(&self) -> Result<KitchenConfig>;
    /// The file the configuration is read from.
    fn path(&self) -> &Path;
}
