//! Convergence steps and the specs they carry.
//!
//! A run is built from fresh `Step` values every time; nothing here performs
//! I/O. Command strings are rendered here so the exact text sent to the shell
//! (and used for idempotence checks) is testable without a host.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

// ── Stages ───────────────────────────────────────────────────────────────────

/// The four provisioning stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CreateNetwork,
    ConfigureNat,
    ConfigureDhcpd,
    CreateTemplateZone,
}

impl Stage {
    /// Every stage in the order a run attempts them.
    pub const ALL: [Stage; 4] = [
        Stage::CreateNetwork,
        Stage::ConfigureNat,
        Stage::ConfigureDhcpd,
        Stage::CreateTemplateZone,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Stage::CreateNetwork => "create_network",
            Stage::ConfigureNat => "configure_nat",
            Stage::ConfigureDhcpd => "configure_dhcpd",
            Stage::CreateTemplateZone => "create_template_zone",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Specs ────────────────────────────────────────────────────────────────────

/// Idempotence predicate for a command step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Skip the command when this shell command exits 0.
    Command(String),
    /// Skip the command when this path exists.
    PathExists(PathBuf),
}

/// A shell command plus its "already satisfied" guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: String,
    pub guard: Option<Guard>,
    /// Echo child output to the console as it is produced.
    pub live_stream: bool,
}

impl CommandSpec {
    /// An unguarded command, run on every pass.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            guard: None,
            live_stream: false,
        }
    }

    /// Skip the command when `check` succeeds.
    #[must_use]
    pub fn unless(mut self, check: impl Into<String>) -> Self {
        self.guard = Some(Guard::Command(check.into()));
        self
    }

    /// Skip the command when `path` exists.
    #[must_use]
    pub fn unless_exists(mut self, path: impl Into<PathBuf>) -> Self {
        self.guard = Some(Guard::PathExists(path.into()));
        self
    }

    #[must_use]
    pub fn streamed(mut self) -> Self {
        self.live_stream = true;
        self
    }
}

/// Desired content of a file on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
    /// Permission bits applied when the file is (re)written.
    pub mode: u32,
}

impl FileSpec {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            mode: 0o644,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }
}

/// An SMF service instance that should be enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub fmri: String,
}

impl ServiceSpec {
    #[must_use]
    pub fn new(fmri: impl Into<String>) -> Self {
        Self { fmri: fmri.into() }
    }

    #[must_use]
    pub fn state_query(&self) -> String {
        format!("svcs -H -o state {}", shell_quote(&self.fmri))
    }

    #[must_use]
    pub fn enable_command(&self) -> String {
        format!("svcadm enable -s {}", shell_quote(&self.fmri))
    }
}

/// An SMF property that should hold a given value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    pub fmri: String,
    /// `property_group/name`.
    pub property: String,
    pub value_type: String,
    pub value: String,
}

impl PropertySpec {
    /// An `astring` property.
    #[must_use]
    pub fn new(
        fmri: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            fmri: fmri.into(),
            property: property.into(),
            value_type: "astring".to_string(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn setprop_command(&self) -> String {
        format!(
            "svccfg -s {} setprop {} = {}: {}",
            shell_quote(&self.fmri),
            shell_quote(&self.property),
            self.value_type,
            shell_quote(&self.value)
        )
    }

    #[must_use]
    pub fn refresh_command(&self) -> String {
        format!("svcadm refresh {}", shell_quote(&self.fmri))
    }

    #[must_use]
    pub fn getprop_command(&self) -> String {
        format!(
            "svcprop -p {} {}",
            shell_quote(&self.property),
            shell_quote(&self.fmri)
        )
    }
}

impl fmt::Display for PropertySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.fmri, self.property)
    }
}

// ── Steps ────────────────────────────────────────────────────────────────────

/// What a step does when its predicate is not yet satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Command(CommandSpec),
    File(FileSpec),
    EnableService(ServiceSpec),
    SetProperty(PropertySpec),
}

/// An atomic unit of convergence work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub action: Action,
}

impl Step {
    #[must_use]
    pub fn new(name: impl Into<String>, action: Action) -> Self {
        Self {
            name: name.into(),
            action,
        }
    }

    /// Whether the step streams child output to the console.
    #[must_use]
    pub fn is_streamed(&self) -> bool {
        matches!(&self.action, Action::Command(spec) if spec.live_stream)
    }
}

// ── Outcomes and reports ─────────────────────────────────────────────────────

/// Result of converging a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The host was changed.
    Applied,
    /// The predicate was already satisfied; nothing ran.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub steps: Vec<StepReport>,
}

/// Everything a successful run did, stage by stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub stages: Vec<StageReport>,
}

impl ProvisionReport {
    fn count(&self, outcome: StepOutcome) -> usize {
        self.stages
            .iter()
            .flat_map(|s| &s.steps)
            .filter(|s| s.outcome == outcome)
            .count()
    }

    /// Number of steps that changed the host.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.count(StepOutcome::Applied)
    }

    /// Number of steps whose predicate was already satisfied.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(StepOutcome::Skipped)
    }
}

/// Dry-run verdict for a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Predicate satisfied; a run would skip it.
    Converged,
    /// A run would change the host.
    Pending,
    /// Unguarded; a run always re-applies it.
    Always,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub step: String,
    pub status: PlanStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagePlan {
    pub stage: Stage,
    pub steps: Vec<PlannedStep>,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Quote `s` for `/bin/sh` unless it is made only of characters the shell
/// treats literally.
#[must_use]
pub fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@' | '%' | '+' | '=' | ',')
        });
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
