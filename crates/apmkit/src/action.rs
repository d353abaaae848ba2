//! Install, upgrade and uninstall, each guarded by a probe.
//!
//! Every function runs at most one probe and at most one mutating command.
//! A failed command stops the pass and its outcome becomes the result.
//! When nothing needs doing the result carries no output at all.
//! There is no re-probe after a mutation; the exit code is trusted.

use crate::backend::CommandRunner;
use crate::command::ApmCommand;
use crate::error::Result;
use crate::probe::{check_installed, check_outdated};
use crate::types::{PackageName, ReconciliationResult};

/// Ensure `name` is installed.
pub fn install(runner: &dyn CommandRunner, name: &PackageName) -> Result<ReconciliationResult> {
    let probe = check_installed(runner, name)?;

    if !probe.is_success() {
        return Ok(ReconciliationResult::check_failed(probe.outcome));
    }

    if probe.found {
        log::info!("{name} is already installed");
        return Ok(ReconciliationResult::converged());
    }

    log::info!("installing {name}");
    mutate(runner, ApmCommand::Install(name.clone()))
}

/// Ensure `name` is installed at its newest version.
///
/// When no upgrade is listed the package is either current or missing;
/// the upgrade listing cannot tell which, so [`install`] decides.
pub fn upgrade(runner: &dyn CommandRunner, name: &PackageName) -> Result<ReconciliationResult> {
    let probe = check_outdated(runner, name)?;

    if !probe.is_success() {
        return Ok(ReconciliationResult::check_failed(probe.outcome));
    }

    if !probe.found {
        log::debug!("no upgrade listed for {name}, falling back to install");
        return install(runner, name);
    }

    log::info!("upgrading {name}");
    mutate(runner, ApmCommand::Upgrade(name.clone()))
}

/// Ensure `name` is not installed.
pub fn uninstall(runner: &dyn CommandRunner, name: &PackageName) -> Result<ReconciliationResult> {
    let probe = check_installed(runner, name)?;

    if !probe.is_success() {
        return Ok(ReconciliationResult::check_failed(probe.outcome));
    }

    if !probe.found {
        log::info!("{name} is not installed");
        return Ok(ReconciliationResult::converged());
    }

    log::info!("uninstalling {name}");
    mutate(runner, ApmCommand::Uninstall(name.clone()))
}

fn mutate(runner: &dyn CommandRunner, command: ApmCommand) -> Result<ReconciliationResult> {
    let outcome = runner.run(&command)?;

    if !outcome.is_success() {
        log::warn!("{} exited with {}", command, outcome.exit_code);
    }

    Ok(ReconciliationResult::mutated(outcome))
}
