//! Domain layer — pure provisioning logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`
//! sockets. All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod resolver;
pub mod stages;
pub mod step;
pub mod templates;

pub use config::KitchenConfig;
pub use error::{
    CommandError, ConfigError, FactError, FileError, ProvisionError, ServiceError, StepError,
};
pub use step::{
    Action, CommandSpec, FileSpec, Guard, PlanStatus, PlannedStep, PropertySpec,
    ProvisionReport, ServiceSpec, Stage, StagePlan, StageReport, Step, StepOutcome, StepReport,
};
pub use templates::HostFacts;
