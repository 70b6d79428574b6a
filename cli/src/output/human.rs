//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::domain::{PlanStatus, ProvisionReport, StagePlan};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("kitchen {version}");
    }

    /// Summarise a completed run. Per-step lines were already printed by the
    /// progress reporter.
    pub fn render_report(&self, report: &ProvisionReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.success(&summary_line(report));
    }

    /// Render a dry run, one line per step.
    pub fn render_plan(&self, plan: &[StagePlan]) {
        if self.ctx.quiet {
            return;
        }
        for stage in plan {
            self.ctx.header(stage.stage.name());
            for step in &stage.steps {
                let (marker, label, style) = match step.status {
                    PlanStatus::Converged => ("·", "converged", self.ctx.styles.dim),
                    PlanStatus::Pending => ("+", "pending", self.ctx.styles.pending),
                    PlanStatus::Always => ("~", "always", self.ctx.styles.warning),
                };
                println!(
                    "  {} {:<10} {}",
                    marker.style(style),
                    label.style(style),
                    step.step
                );
            }
        }
        let pending = count(plan, PlanStatus::Pending);
        println!();
        if pending == 0 {
            self.ctx.success("host is converged");
        } else {
            self.ctx.info(&format!(
                "{pending} {} pending",
                if pending == 1 { "step" } else { "steps" }
            ));
        }
    }

    /// Render the effective configuration as YAML.
    pub fn render_config(&self, yaml: &str, path: &Path) {
        if !self.ctx.quiet {
            println!(
                "{}",
                format!("# {}", path.display()).style(self.ctx.styles.dim)
            );
        }
        print!("{yaml}");
    }
}

/// `"provisioned: 3 applied, 9 already converged"`.
#[must_use]
pub fn summary_line(report: &ProvisionReport) -> String {
    format!(
        "provisioned: {} applied, {} already converged",
        report.applied(),
        report.skipped()
    )
}

fn count(plan: &[StagePlan], status: PlanStatus) -> usize {
    plan.iter()
        .flat_map(|s| &s.steps)
        .filter(|s| s.status == status)
        .count()
}
