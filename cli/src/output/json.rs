//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one JSON document to stdout:
//! the command's result on success, or the error object below on failure.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::ProvisionError;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Machine-readable code for a failed command.
///
/// Provisioning failures are coded by stage (`configure_nat_failed`); any
/// other error is `error`.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> String {
    err.downcast_ref::<ProvisionError>()
        .map_or_else(|| "error".to_string(), |e| format!("{}_failed", e.stage()))
}

/// Pretty-print any serializable result.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}
