//! SMF service control: enabling instances and setting properties.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use tracing::{debug, info};

use crate::application::ports::CommandRunner;
use crate::application::services::command::ensure_success;
use crate::domain::{PropertySpec, ServiceError, ServiceSpec, StepOutcome};

/// Current state of a service instance (`online`, `disabled`, ...).
///
/// `Ok(None)` when `svcs` does not know the instance.
///
/// # Errors
///
/// Returns an error if `svcs` cannot be run at all.
pub async fn service_state(
    runner: &impl CommandRunner,
    spec: &ServiceSpec,
) -> Result<Option<String>, ServiceError> {
    let output = runner
        .run_shell(&spec.state_query())
        .await
        .map_err(|source| ServiceError::Query {
            fmri: spec.fmri.clone(),
            source,
        })?;
    if !output.status.success() {
        return Ok(None);
    }
    let state = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(Some(state).filter(|s| !s.is_empty()))
}

/// Enable a service instance and wait for it to come online.
///
/// Already-online instances are skipped. Anything else (disabled, offline,
/// maintenance, unknown) gets `svcadm enable -s`, which is harmless to
/// repeat on an enabled instance.
///
/// # Errors
///
/// Returns an error if the state query cannot run or `svcadm` fails.
pub async fn enable_service(
    runner: &impl CommandRunner,
    spec: &ServiceSpec,
) -> Result<StepOutcome, ServiceError> {
    let state = service_state(runner, spec).await?;
    if state.as_deref() == Some("online") {
        debug!(fmri = %spec.fmri, "already online");
        return Ok(StepOutcome::Skipped);
    }

    let command = spec.enable_command();
    let enable = |source| ServiceError::Enable {
        fmri: spec.fmri.clone(),
        source,
    };
    let output = runner.run_shell(&command).await.map_err(enable)?;
    ensure_success(&command, &output).map_err(enable)?;
    info!(fmri = %spec.fmri, previous = ?state, "service enabled");
    Ok(StepOutcome::Applied)
}

/// Current value of a property, `Ok(None)` when it is unset.
///
/// # Errors
///
/// Returns an error if `svcprop` cannot be run at all.
pub async fn property_value(
    runner: &impl CommandRunner,
    spec: &PropertySpec,
) -> Result<Option<String>, ServiceError> {
    let output = runner
        .run_shell(&spec.getprop_command())
        .await
        .map_err(|source| ServiceError::Query {
            fmri: spec.fmri.clone(),
            source,
        })?;
    if !output.status.success() {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
}

/// Set a property and refresh the instance so it takes effect.
///
/// Always applied: the property is desired state, not a one-time action.
///
/// # Errors
///
/// Returns an error if `svccfg` or `svcadm refresh` fails.
pub async fn set_property(
    runner: &impl CommandRunner,
    spec: &PropertySpec,
) -> Result<StepOutcome, ServiceError> {
    let setprop = spec.setprop_command();
    let set_err = |source| ServiceError::SetProperty {
        property: spec.to_string(),
        source,
    };
    let output = runner.run_shell(&setprop).await.map_err(set_err)?;
    ensure_success(&setprop, &output).map_err(set_err)?;

    let refresh = spec.refresh_command();
    let refresh_err = |source| ServiceError::Refresh {
        fmri: spec.fmri.clone(),
        source,
    };
    let output = runner.run_shell(&refresh).await.map_err(refresh_err)?;
    ensure_success(&refresh, &output).map_err(refresh_err)?;

    info!(property = %spec, value = %spec.value, "property set");
    Ok(StepOutcome::Applied)
}
