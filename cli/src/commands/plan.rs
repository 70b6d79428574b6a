//! `kitchen plan` — report what a provision run would do.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::provision::Provisioner;
use crate::infra::fs::HostFs;
use crate::output::json;
use crate::output::reporter::TerminalReporter;

/// Run the plan command. Only read-only queries reach the host.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or a predicate
/// cannot be evaluated.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_config()?;
    let runner = app.runner(&config);
    let facts = app.facts(&config);
    let reporter = TerminalReporter::new(&app.output);

    let plan = Provisioner::new(&config, &runner, &HostFs, &facts, &reporter)
        .plan()
        .await?;

    if app.is_json() {
        println!("{}", json::to_pretty(&serde_json::json!({ "stages": plan }))?);
    } else {
        app.human().render_plan(&plan);
    }
    Ok(ExitCode::SUCCESS)
}
