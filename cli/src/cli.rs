//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::output::json;

/// Idempotent provisioning of a NAT network and template zone
#[derive(Parser)]
#[command(
    name = "kitchen",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Configuration file
    #[arg(long, global = true, env = "KITCHEN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the network, NAT, DHCP server and template zone
    Provision,

    /// Show which steps a provision run would change
    Plan,

    /// Print a generated configuration file
    Render(commands::render::RenderArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// In JSON mode failures are printed as a JSON error object and turned
    /// into a failing exit code here.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails in human mode.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            config,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
            config,
        });

        let result = match command {
            Command::Provision => commands::provision::run(&app).await,
            Command::Plan => commands::plan::run(&app).await,
            Command::Render(args) => commands::render::run(&app, &args),
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version => commands::version::run(&app),
        };

        match result {
            Err(e) if app.is_json() => {
                tracing::debug!(error = ?e, "command failed");
                println!("{}", json::format_error(&format!("{e:#}"), &json::error_code(&e))?);
                Ok(ExitCode::FAILURE)
            }
            other => other,
        }
    }
}
