//! `kitchen provision` — converge the host.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::provision::Provisioner;
use crate::infra::fs::HostFs;
use crate::output::json;
use crate::output::reporter::TerminalReporter;

/// Run the provision command.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the confirmation
/// prompt fails, or any stage fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;

    let prompt = format!(
        "Provision network {} on {} and zone '{}' on this host?",
        config.network.subnet_cidr(),
        config.network.vnic,
        config.zone.name
    );
    if !app.confirm(&prompt, true)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let runner = app.runner(&config);
    let facts = app.facts(&config);
    let reporter = TerminalReporter::new(&app.output);
    let report = Provisioner::new(&config, &runner, &HostFs, &facts, &reporter)
        .provision()
        .await?;
    drop(reporter);

    if app.is_json() {
        println!("{}", json::to_pretty(&report)?);
    } else {
        app.human().render_report(&report);
    }
    Ok(ExitCode::SUCCESS)
}
