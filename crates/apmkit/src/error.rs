//! Error types for apm operations.
//!
//! A command that runs and exits non-zero is not an error here: its exit
//! code travels back to the caller inside a [`CommandOutcome`]. These
//! variants cover the cases where no exit code exists at all.
//!
//! [`CommandOutcome`]: crate::types::CommandOutcome

use thiserror::Error;

/// Errors that can occur while reconciling a package.
#[derive(Debug, Error)]
pub enum Error {
    /// Package name was empty or otherwise unusable as an argument
    #[error("invalid package name: {reason}")]
    InvalidName {
        /// Why the name was rejected
        reason: String,
    },

    /// The apm executable could not be found
    #[error("failed to find required executable {program}")]
    ApmNotFound {
        /// Program that was looked up
        program: String,
    },

    /// The command could not be started or waited on
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Program that failed to run
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Return code to report for this error.
    ///
    /// Mirrors what a shell would report: the OS errno when one is known,
    /// 2 for a missing executable, 1 otherwise.
    pub fn rc(&self) -> i32 {
        match self {
            Error::InvalidName { .. } => 1,
            Error::ApmNotFound { .. } => 2,
            Error::Spawn { source, .. } => source.raw_os_error().unwrap_or(1),
        }
    }

    /// Build an error from a failed spawn, separating "not found".
    pub fn from_spawn(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Error::ApmNotFound {
                program: program.to_string(),
            };
        }

        Error::Spawn {
            program: program.to_string(),
            source,
        }
    }
}

/// Result type for apm operations.
pub type Result<T> = std::result::Result<T, Error>;
