//! Guarded command execution.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::process::Output;

use tracing::{debug, info};

use crate::application::ports::{CommandRunner, LocalFs};
use crate::domain::{CommandError, CommandSpec, Guard, StepOutcome};

/// Converge a guarded command.
///
/// When the guard is satisfied nothing else runs and the outcome is
/// `Skipped`. A failing check command is the normal "not yet applied" signal,
/// not an error.
///
/// # Errors
///
/// Returns an error if a command cannot be run, times out, or the apply
/// command exits non-zero.
pub async fn run_command(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    spec: &CommandSpec,
) -> Result<StepOutcome, CommandError> {
    if let Some(guard) = &spec.guard {
        if guard_satisfied(runner, fs, guard).await? {
            debug!(command = %spec.command, "guard satisfied, skipping");
            return Ok(StepOutcome::Skipped);
        }
    }

    let output = if spec.live_stream {
        runner.run_shell_streaming(&spec.command).await?
    } else {
        runner.run_shell(&spec.command).await?
    };
    ensure_success(&spec.command, &output)?;
    info!(command = %spec.command, "applied");
    Ok(StepOutcome::Applied)
}

/// Evaluate a guard without running the guarded command.
///
/// # Errors
///
/// Returns an error only if a check command cannot be run at all.
pub async fn guard_satisfied(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    guard: &Guard,
) -> Result<bool, CommandError> {
    match guard {
        Guard::Command(check) => {
            let output = runner.run_shell(check).await?;
            debug!(check = %check, status = ?output.status.code(), "guard evaluated");
            Ok(output.status.success())
        }
        Guard::PathExists(path) => {
            let exists = fs.exists(path);
            debug!(path = %path.display(), exists, "guard evaluated");
            Ok(exists)
        }
    }
}

/// Turn a non-zero exit into `CommandError::Failed`.
///
/// # Errors
///
/// Returns an error carrying the exit code and captured output.
pub fn ensure_success(command: &str, output: &Output) -> Result<(), CommandError> {
    if output.status.success() {
        return Ok(());
    }
    Err(CommandError::Failed {
        command: command.to_string(),
        code: output.status.code(),
        output: combined_output(output),
    })
}

/// Stdout followed by stderr, lossily decoded and trimmed.
#[must_use]
pub fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let (stdout, stderr) = (stdout.trim(), stderr.trim());
    match (stdout.is_empty(), stderr.is_empty()) {
        (true, _) => stderr.to_string(),
        (false, true) => stdout.to_string(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}
