//! Core types for apm package reconciliation.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Name of an apm package.
///
/// Guaranteed non-empty and free of whitespace, so it can be matched as a
/// single token in apm's listing output and passed as one argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Validate and wrap a package name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(Error::InvalidName {
                reason: "name must not be empty".to_string(),
            });
        }

        if name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidName {
                reason: format!("{name:?} contains whitespace"),
            });
        }

        Ok(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Target condition for a package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// Installed, any version
    #[default]
    Present,
    /// Installed and up to date
    Latest,
    /// Not installed
    Absent,
}

impl DesiredState {
    /// Every accepted value, in the order they are listed to users.
    pub const ALL: [DesiredState; 3] = [Self::Present, Self::Latest, Self::Absent];

    /// Lowercase name used in module arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredState::Present => "present",
            DesiredState::Latest => "latest",
            DesiredState::Absent => "absent",
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesiredState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Exit code and captured output of one apm invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Process exit code (negated signal number if killed by a signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutcome {
    /// A zero-exit outcome with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed outcome with the given exit code and stderr.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Exit code 0 is the only success signal.
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Final verdict of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    /// Exit code of the last command that decided the result
    pub exit_code: i32,
    /// Whether a mutating command ran and succeeded
    pub changed: bool,
    /// Stdout of that command, empty when nothing needed doing
    pub stdout: String,
    /// Stderr of that command, empty when nothing needed doing
    pub stderr: String,
}

impl ReconciliationResult {
    /// The package was already in the desired state.
    ///
    /// The listing that showed it is not reported.
    pub fn converged() -> Self {
        Self::default()
    }

    /// Result of a status check that exited non-zero.
    pub fn check_failed(outcome: CommandOutcome) -> Self {
        Self::from_outcome(outcome, false)
    }

    /// Result of a mutating command.
    ///
    /// `changed` is set only when the command succeeded.
    pub fn mutated(outcome: CommandOutcome) -> Self {
        let changed = outcome.is_success();
        Self::from_outcome(outcome, changed)
    }

    fn from_outcome(outcome: CommandOutcome, changed: bool) -> Self {
        Self {
            exit_code: outcome.exit_code,
            changed,
            stdout: outcome.stdout,
            stderr: outcome.stderr,
        }
    }

    /// Whether the pass ended with a zero exit code.
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
