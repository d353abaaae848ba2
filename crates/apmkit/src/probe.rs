//! Read-only status probes.
//!
//! apm has no machine-readable status output, so both probes scan the
//! human-oriented listings. Names are compared as whole tokens: `foo` must
//! never match a listing of `foobar`.

use crate::backend::CommandRunner;
use crate::command::ApmCommand;
use crate::error::Result;
use crate::types::{CommandOutcome, PackageName};

/// Outcome of a probe command and what it said about the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// The probe command's own outcome
    pub outcome: CommandOutcome,
    /// Whether the package was found in the listing (false if the probe failed)
    pub found: bool,
}

impl Probe {
    /// Whether the probe command itself succeeded.
    ///
    /// A failed probe is inconclusive; `found` carries no information.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Check whether `name` is installed, via `apm list --bare`.
pub fn check_installed(runner: &dyn CommandRunner, name: &PackageName) -> Result<Probe> {
    run_probe(runner, &ApmCommand::ListInstalled, |stdout| {
        is_listed_installed(stdout, name.as_str())
    })
}

/// Check whether `name` has an upgrade available, via `apm upgrade --list`.
pub fn check_outdated(runner: &dyn CommandRunner, name: &PackageName) -> Result<Probe> {
    run_probe(runner, &ApmCommand::ListUpgradable, |stdout| {
        is_listed_outdated(stdout, name.as_str())
    })
}

fn run_probe(
    runner: &dyn CommandRunner,
    command: &ApmCommand,
    is_match: impl FnOnce(&str) -> bool,
) -> Result<Probe> {
    let outcome = runner.run(command)?;

    if !outcome.is_success() {
        log::warn!("{} exited with {}", command, outcome.exit_code);
        return Ok(Probe {
            outcome,
            found: false,
        });
    }

    let found = is_match(&outcome.stdout);
    Ok(Probe { outcome, found })
}

/// Scan `apm list --bare` output for `<name>@<version>`.
fn is_listed_installed(stdout: &str, name: &str) -> bool {
    stdout
        .lines()
        .filter_map(parse_installed_line)
        .any(|installed| installed == name)
}

/// Split an `apm list --bare` line into its package name.
///
/// Lines look like `minimap@4.29.9`. Lines without a version are not
/// package entries.
fn parse_installed_line(line: &str) -> Option<&str> {
    let (name, version) = line.trim().rsplit_once('@')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some(name)
}

/// Scan `apm upgrade --list` output for an upgrade candidate named `name`.
fn is_listed_outdated(stdout: &str, name: &str) -> bool {
    stdout
        .lines()
        .filter_map(upgrade_line_prefix)
        .any(|tokens| tokens.contains(&name))
}

/// Tokens before the `->` of an upgrade candidate line.
///
/// Candidate lines look like `├── minimap 4.29.8 -> 4.29.9`, with whatever
/// tree prefix apm's renderer draws. Headers and `(empty)` markers have no
/// `->` token and yield `None`.
fn upgrade_line_prefix(line: &str) -> Option<Vec<&str>> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    let arrow = tokens.iter().position(|token| *token == "->")?;
    tokens.truncate(arrow);
    Some(tokens)
}
