//! Result records returned to the automation host.

use anyhow::{Context, Result};
use apmkit::{DesiredState, PackageName, ReconciliationResult};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;

/// Echo of the arguments the module ran with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Invocation {
    pub module_args: Map<String, Value>,
}

/// One JSON object written to stdout.
///
/// Absent fields are omitted so the three shapes (success, check mode,
/// failure) stay distinguishable by their keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_lines: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_lines: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<DesiredState>,
    pub invocation: Invocation,
}

impl ModuleOutput {
    /// Verdict of a reconciliation pass; failed if its exit code is non-zero.
    pub fn from_result(
        name: &PackageName,
        state: DesiredState,
        result: ReconciliationResult,
        invocation: Invocation,
    ) -> Self {
        let failed = !result.is_success();
        let msg = failed.then(|| format!("failed to bring {name} to state {state}"));

        Self {
            failed: failed.then_some(true),
            changed: result.changed,
            msg,
            rc: Some(result.exit_code),
            stdout_lines: Some(split_lines(&result.stdout)),
            stderr_lines: Some(split_lines(&result.stderr)),
            stdout: Some(result.stdout),
            stderr: Some(result.stderr),
            name: Some(name.to_string()),
            state: Some(state),
            invocation,
        }
    }

    /// Check mode: nothing inspected, nothing changed.
    pub fn skipped(invocation: Invocation) -> Self {
        Self {
            changed: false,
            msg: Some("skipped, running in check mode".to_string()),
            invocation,
            ..Self::default()
        }
    }

    /// Failure before any command produced output.
    pub fn failure(msg: impl Into<String>, rc: i32, invocation: Invocation) -> Self {
        Self {
            failed: Some(true),
            changed: false,
            msg: Some(msg.into()),
            rc: Some(rc),
            stdout: Some(String::new()),
            stderr: Some(String::new()),
            stdout_lines: Some(Vec::new()),
            stderr_lines: Some(Vec::new()),
            invocation,
            ..Self::default()
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failed == Some(true)
    }

    /// Process exit code: the host treats 1 as `fail_json`.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.is_failed())
    }

    /// Write the record as one line of JSON.
    pub fn write_to(&self, out: &mut impl Write) -> Result<()> {
        let json = serde_json::to_string(self).context("Could not serialize result")?;
        writeln!(out, "{json}").context("Could not write result")?;
        out.flush().context("Could not write result")
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
