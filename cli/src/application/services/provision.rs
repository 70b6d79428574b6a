//! Application service — the provisioning use-case.
//!
//! Runs the four stages in order, converging every step and stopping at the
//! first failure. Nothing is rolled back: converged steps stay in place and
//! their predicates make a re-run skip them.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use tracing::{Instrument, info, info_span};

use crate::application::ports::{CommandRunner, FactProvider, LocalFs, ProgressReporter};
use crate::application::services::{command, facts, materialize, smf};
use crate::domain::stages;
use crate::domain::{
    Action, KitchenConfig, PlanStatus, PlannedStep, ProvisionError, ProvisionReport, Stage,
    StagePlan, StageReport, Step, StepError, StepOutcome, StepReport,
};

/// Step name reported when fact resolution fails before any step runs.
pub const RESOLVE_FACTS_STEP: &str = "resolve host facts";

/// The provisioning orchestrator.
///
/// Generic over its ports so tests can drive it against a simulated host.
pub struct Provisioner<'a, R, F, P, Rep> {
    config: &'a KitchenConfig,
    runner: &'a R,
    fs: &'a F,
    facts: &'a P,
    reporter: &'a Rep,
}

impl<'a, R, F, P, Rep> Provisioner<'a, R, F, P, Rep>
where
    R: CommandRunner,
    F: LocalFs,
    P: FactProvider,
    Rep: ProgressReporter,
{
    pub fn new(
        config: &'a KitchenConfig,
        runner: &'a R,
        fs: &'a F,
        facts: &'a P,
        reporter: &'a Rep,
    ) -> Self {
        Self {
            config,
            runner,
            fs,
            facts,
            reporter,
        }
    }

    /// Run every stage in order.
    ///
    /// # Errors
    ///
    /// Returns the stage and step that failed; later stages are never
    /// entered.
    pub async fn provision(&self) -> Result<ProvisionReport, ProvisionError> {
        let mut report = ProvisionReport::default();
        for stage in Stage::ALL {
            let stage_report = self
                .run_stage(stage)
                .instrument(info_span!("stage", %stage))
                .await?;
            report.stages.push(stage_report);
        }
        info!(
            applied = report.applied(),
            skipped = report.skipped(),
            "provisioning complete"
        );
        Ok(report)
    }

    /// Evaluate every step's predicate without changing the host.
    ///
    /// # Errors
    ///
    /// Returns an error if a predicate cannot be evaluated (a check command
    /// cannot be spawned, a file cannot be read, facts are unavailable).
    pub async fn plan(&self) -> Result<Vec<StagePlan>, ProvisionError> {
        let mut plan = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            let mut planned = Vec::new();
            for step in self.steps(stage)? {
                let status =
                    self.evaluate(&step)
                        .await
                        .map_err(|cause| ProvisionError::StageFailed {
                            stage,
                            step: step.name.clone(),
                            cause,
                        })?;
                planned.push(PlannedStep {
                    step: step.name,
                    status,
                });
            }
            plan.push(StagePlan {
                stage,
                steps: planned,
            });
        }
        Ok(plan)
    }

    async fn run_stage(&self, stage: Stage) -> Result<StageReport, ProvisionError> {
        self.reporter.stage(stage);
        let steps = self.steps(stage)?;
        let mut report = StageReport {
            stage,
            steps: Vec::with_capacity(steps.len()),
        };
        for step in steps {
            if step.is_streamed() {
                self.reporter.stream(&step.name);
            } else {
                self.reporter.step(&step.name);
            }
            let outcome = self
                .apply(&step)
                .await
                .map_err(|cause| ProvisionError::StageFailed {
                    stage,
                    step: step.name.clone(),
                    cause,
                })?;
            match outcome {
                StepOutcome::Applied => self.reporter.success(&step.name),
                StepOutcome::Skipped => self.reporter.skipped(&step.name),
            }
            report.steps.push(StepReport {
                step: step.name,
                outcome,
            });
        }
        Ok(report)
    }

    /// Build a stage's steps from configuration and, where needed, live facts.
    fn steps(&self, stage: Stage) -> Result<Vec<Step>, ProvisionError> {
        let steps = match stage {
            Stage::CreateNetwork => stages::network_steps(self.config),
            Stage::ConfigureNat => stages::nat_steps(self.config),
            Stage::ConfigureDhcpd => {
                let facts =
                    facts::gather(self.facts).map_err(|cause| ProvisionError::StageFailed {
                        stage,
                        step: RESOLVE_FACTS_STEP.to_string(),
                        cause: cause.into(),
                    })?;
                stages::dhcpd_steps(self.config, &facts)
            }
            Stage::CreateTemplateZone => stages::zone_steps(self.config),
        };
        Ok(steps)
    }

    async fn apply(&self, step: &Step) -> Result<StepOutcome, StepError> {
        let outcome = match &step.action {
            Action::Command(spec) => command::run_command(self.runner, self.fs, spec).await?,
            Action::File(spec) => materialize::write_file(self.fs, spec)?,
            Action::EnableService(spec) => smf::enable_service(self.runner, spec).await?,
            Action::SetProperty(spec) => smf::set_property(self.runner, spec).await?,
        };
        Ok(outcome)
    }

    async fn evaluate(&self, step: &Step) -> Result<PlanStatus, StepError> {
        let converged = match &step.action {
            Action::Command(spec) => match &spec.guard {
                None => return Ok(PlanStatus::Always),
                Some(guard) => command::guard_satisfied(self.runner, self.fs, guard).await?,
            },
            Action::File(spec) => materialize::is_current(self.fs, spec)?,
            Action::EnableService(spec) => {
                smf::service_state(self.runner, spec).await?.as_deref() == Some("online")
            }
            Action::SetProperty(spec) => {
                smf::property_value(self.runner, spec).await?.as_deref()
                    == Some(spec.value.as_str())
            }
        };
        Ok(if converged {
            PlanStatus::Converged
        } else {
            PlanStatus::Pending
        })
    }
}
