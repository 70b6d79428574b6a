//! `kitchen config` — inspect the effective configuration.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file merged over defaults)
    Show,
    /// Print the configuration file path
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or serialized.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Path => show_path(app),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;
    let path = app.config_store.path();
    if app.is_json() {
        println!("{}", json::to_pretty(&config)?);
    } else {
        let yaml = serde_yaml::to_string(&config).context("cannot serialize config")?;
        app.human().render_config(&yaml, path);
    }
    Ok(ExitCode::SUCCESS)
}

fn show_path(app: &AppContext) -> Result<ExitCode> {
    let path = app.config_store.path();
    if app.is_json() {
        let doc = serde_json::json!({ "path": path, "exists": path.exists() });
        println!("{}", json::to_pretty(&doc)?);
    } else {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
