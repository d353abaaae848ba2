//! Real apm backend using subprocesses.

use crate::backend::CommandRunner;
use crate::command::ApmCommand;
use crate::error::{Error, Result};
use crate::types::CommandOutcome;
use std::process::{Command, ExitStatus, Stdio};

/// Executable used when none is configured.
pub const DEFAULT_EXECUTABLE: &str = "apm";

/// Runner that executes real `apm` commands.
///
/// There is no timeout: a hung apm hangs the caller.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Path or name of the apm executable
    executable: String,
}

impl ProcessRunner {
    /// Create a runner for the given executable.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLE)
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &ApmCommand) -> Result<CommandOutcome> {
        let args = command.args();
        log::debug!("running: {} {}", self.executable, args.join(" "));

        let output = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::from_spawn(&self.executable, e))?;

        let outcome = CommandOutcome {
            exit_code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        log::debug!("{} exited with {}", command, outcome.exit_code);
        Ok(outcome)
    }
}

/// Numeric exit code, with signals reported as negative numbers.
fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    status.code().unwrap_or(-1)
}
