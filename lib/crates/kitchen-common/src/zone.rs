use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The reusable template zone: its zonecfg profile plus the system identity
/// baked into it at install time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTemplate {
    /// Zone name passed to `zonecfg -z` / `zoneadm -z`.
    pub name: String,
    pub brand: String,
    /// Zone root. Its existence means the zone is already installed.
    pub zonepath: PathBuf,
    /// Where the zonecfg command file is written.
    pub profile_path: PathBuf,
    /// Where the sysconfig profile manifest is written.
    pub manifest_path: PathBuf,
    /// Link name of the anet as seen inside the zone.
    pub anet_linkname: String,
    pub hostname: String,
    pub locale: String,
    pub timezone: String,
}

impl Default for ZoneTemplate {
    fn default() -> Self {
        Self {
            name: "template".to_string(),
            brand: "solaris".to_string(),
            zonepath: PathBuf::from("/zones/template"),
            profile_path: PathBuf::from("/root/template.profile"),
            manifest_path: PathBuf::from("/root/template.xml"),
            anet_linkname: "net0".to_string(),
            hostname: "template".to_string(),
            locale: "en_US.UTF-8".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}
