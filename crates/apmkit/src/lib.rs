//! # apmkit
//!
//! Converge a single Atom package, managed by `apm`, to a desired state.
//!
//! This crate provides:
//! - Status probes that scan `apm list` and `apm upgrade --list` output
//! - Guarded install, upgrade and uninstall actions
//! - A [`Client`] that maps a [`DesiredState`] onto the right action
//!
//! All process spawning goes through the [`CommandRunner`] port, so the
//! decision logic can be driven by a fake in tests.
//!
//! ## Example
//!
//! ```no_run
//! use apmkit::{Client, DesiredState, PackageName};
//!
//! let client = Client::new();
//! let name = PackageName::new("minimap").expect("valid name");
//!
//! let result = client.reconcile(&name, DesiredState::Latest).expect("apm not available");
//! if result.changed {
//!     println!("{name} upgraded");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod backend;
pub mod command;
pub mod error;
pub mod probe;
pub mod types;

#[cfg(test)]
mod testing;

pub use backend::CommandRunner;
pub use command::ApmCommand;
pub use error::{Error, Result};
pub use types::{CommandOutcome, DesiredState, PackageName, ReconciliationResult};

use backend::process::ProcessRunner;

/// Reconciles packages through a [`CommandRunner`].
///
/// The client never probes on its own; it dispatches to exactly one action
/// per call and returns that action's verdict.
pub struct Client {
    runner: Box<dyn CommandRunner>,
}

impl Client {
    /// Create a client that runs `apm` from PATH.
    pub fn new() -> Self {
        Self::with_runner(Box::new(backend::default_runner()))
    }

    /// Create a client that runs the given apm executable.
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self::with_runner(Box::new(ProcessRunner::new(executable)))
    }

    /// Create a client with a custom runner (useful for testing).
    pub fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Bring `name` into `state`.
    ///
    /// A non-zero `exit_code` in the result means the pass failed; `Err`
    /// means a command could not be run at all.
    pub fn reconcile(
        &self,
        name: &PackageName,
        state: DesiredState,
    ) -> Result<ReconciliationResult> {
        log::debug!("reconciling {name} to {state}");

        let result = match state {
            DesiredState::Present => self.install(name),
            DesiredState::Latest => self.upgrade(name),
            DesiredState::Absent => self.uninstall(name),
        }?;

        log::debug!(
            "{name}: rc={} changed={}",
            result.exit_code,
            result.changed
        );
        Ok(result)
    }

    /// Ensure `name` is installed.
    pub fn install(&self, name: &PackageName) -> Result<ReconciliationResult> {
        action::install(self.runner.as_ref(), name)
    }

    /// Ensure `name` is installed and current.
    pub fn upgrade(&self, name: &PackageName) -> Result<ReconciliationResult> {
        action::upgrade(self.runner.as_ref(), name)
    }

    /// Ensure `name` is not installed.
    pub fn uninstall(&self, name: &PackageName) -> Result<ReconciliationResult> {
        action::uninstall(self.runner.as_ref(), name)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
