//! Idempotent file materialization.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use tracing::{debug, info};

use crate::application::ports::LocalFs;
use crate::domain::{FileError, FileSpec, StepOutcome};

/// Whether the file already holds exactly `spec.content`.
///
/// # Errors
///
/// Returns an error if the existing file cannot be read (for example when
/// the path is a directory).
pub fn is_current(fs: &impl LocalFs, spec: &FileSpec) -> Result<bool, FileError> {
    let existing = fs.read(&spec.path).map_err(|source| FileError::Read {
        path: spec.path.clone(),
        source,
    })?;
    Ok(existing.as_deref() == Some(spec.content.as_bytes()))
}

/// Converge a file to `spec.content`.
///
/// Leaves the filesystem untouched when the content already matches.
/// Otherwise creates missing parent directories and atomically replaces the
/// file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a parent directory cannot be
/// created, or the new content cannot be written.
pub fn write_file(fs: &impl LocalFs, spec: &FileSpec) -> Result<StepOutcome, FileError> {
    if is_current(fs, spec)? {
        debug!(path = %spec.path.display(), "content unchanged");
        return Ok(StepOutcome::Skipped);
    }

    if let Some(parent) = spec.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !fs.exists(parent) {
            fs.create_dir_all(parent)
                .map_err(|source| FileError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
    }

    fs.write_atomic(&spec.path, spec.content.as_bytes(), spec.mode)
        .map_err(|source| FileError::Write {
            path: spec.path.clone(),
            source,
        })?;
    info!(path = %spec.path.display(), bytes = spec.content.len(), "file written");
    Ok(StepOutcome::Applied)
}
