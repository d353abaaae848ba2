//! Command execution port.
//!
//! The [`CommandRunner`] trait is the only way the reconciliation logic
//! reaches the outside world, allowing for different implementations
//! (real subprocesses, scripted fakes for testing).

pub mod process;

use crate::command::ApmCommand;
use crate::error::Result;
use crate::types::CommandOutcome;

/// Runs one apm command to completion and reports what happened.
///
/// A command that starts and exits non-zero is `Ok` with that exit code.
/// `Err` is reserved for commands that could not be run at all.
pub trait CommandRunner: Send + Sync {
    /// Run the command, blocking until it exits.
    fn run(&self, command: &ApmCommand) -> Result<CommandOutcome>;
}

impl<F> CommandRunner for F
where
    F: Fn(&ApmCommand) -> Result<CommandOutcome> + Send + Sync,
{
    fn run(&self, command: &ApmCommand) -> Result<CommandOutcome> {
        self(command)
    }
}

/// Get the default runner (real `apm` on PATH).
pub fn default_runner() -> process::ProcessRunner {
    process::ProcessRunner::new(process::DEFAULT_EXECUTABLE)
}
