//! Configuration schema and validation.
//!
//! Pure functions only: no I/O and no async.

use std::path::{Path, PathBuf};

use kitchen_common::{NetworkTopology, ZoneTemplate};
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Where the configuration lives when neither `--config` nor
/// `KITCHEN_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/kitchen/config.yaml";

/// Default limit for a single captured command, in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 600;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration. Every field has a default, so an empty or
/// missing file describes the stock kitchen topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KitchenConfig {
    pub network: NetworkTopology,
    pub zone: ZoneTemplate,
    pub paths: PathsConfig,
    pub commands: CommandsConfig,
}

/// Host files read or written by the provisioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Resolver configuration the DHCP facts are read from.
    pub resolv_conf: PathBuf,
    pub ipnat_conf: PathBuf,
    pub dhcpd_conf: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            resolv_conf: PathBuf::from("/etc/resolv.conf"),
            ipnat_conf: PathBuf::from("/etc/ipf/ipnat.conf"),
            dhcpd_conf: PathBuf::from("/etc/inet/dhcpd4.conf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Limit for captured commands. Streamed commands are unbounded.
    pub timeout_secs: u64,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

impl KitchenConfig {
    /// Check the configuration for values that would produce a broken host.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.validate()?;

        if self.zone.name.trim().is_empty() {
            return Err(ConfigError::Empty { field: "zone.name" });
        }
        if self.zone.brand.trim().is_empty() {
            return Err(ConfigError::Empty { field: "zone.brand" });
        }

        for (field, path) in [
            ("zone.zonepath", &self.zone.zonepath),
            ("zone.profile_path", &self.zone.profile_path),
            ("zone.manifest_path", &self.zone.manifest_path),
            ("paths.resolv_conf", &self.paths.resolv_conf),
            ("paths.ipnat_conf", &self.paths.ipnat_conf),
            ("paths.dhcpd_conf", &self.paths.dhcpd_conf),
        ] {
            require_absolute(field, path)?;
        }

        if self.commands.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

fn require_absolute(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(ConfigError::RelativePath {
            field,
            path: path.to_path_buf(),
        })
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
