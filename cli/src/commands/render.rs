//! `kitchen render` — print a generated file without touching the host.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::app::AppContext;
use crate::application::services::facts;
use crate::domain::templates;
use crate::output::json;

/// Files the provisioner generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratedFile {
    /// NAT rule (`ipnat.conf`)
    Ipnat,
    /// DHCP server configuration (`dhcpd4.conf`); reads the resolver file
    Dhcpd,
    /// zonecfg command file for the template zone
    Profile,
    /// System configuration profile for the template zone
    Manifest,
}

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Which file to render
    #[arg(value_enum)]
    pub file: GeneratedFile,
}

/// Run the render command.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or, for `dhcpd`, the
/// resolver configuration cannot be read.
pub fn run(app: &AppContext, args: &RenderArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let (path, content): (PathBuf, String) = match args.file {
        GeneratedFile::Ipnat => (
            config.paths.ipnat_conf.clone(),
            templates::ipnat_conf(&config.network),
        ),
        GeneratedFile::Dhcpd => {
            let facts = facts::gather(&app.facts(&config))?;
            (
                config.paths.dhcpd_conf.clone(),
                templates::dhcpd_conf(&config.network, &facts),
            )
        }
        GeneratedFile::Profile => (
            config.zone.profile_path.clone(),
            templates::zone_profile(&config.zone, &config.network),
        ),
        GeneratedFile::Manifest => (
            config.zone.manifest_path.clone(),
            templates::sysconfig_manifest(&config.zone),
        ),
    };

    if app.is_json() {
        let doc = serde_json::json!({ "path": path, "content": content });
        println!("{}", json::to_pretty(&doc)?);
    } else {
        print!("{content}");
    }
    Ok(ExitCode::SUCCESS)
}
