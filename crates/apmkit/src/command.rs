//! The apm invocations this crate issues.

use crate::types::PackageName;
use std::fmt;

/// One apm command line, minus the executable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApmCommand {
    /// `apm list --bare --color=false`
    ListInstalled,
    /// `apm upgrade --list --color=false`
    ListUpgradable,
    /// `apm install <name> --color=false`
    Install(PackageName),
    /// `apm upgrade <name> --confirm=false`
    Upgrade(PackageName),
    /// `apm uninstall <name> --color=false`
    Uninstall(PackageName),
}

impl ApmCommand {
    /// Arguments passed to the apm executable.
    pub fn args(&self) -> Vec<&str> {
        match self {
            ApmCommand::ListInstalled => vec!["list", "--bare", "--color=false"],
            ApmCommand::ListUpgradable => vec!["upgrade", "--list", "--color=false"],
            ApmCommand::Install(name) => vec!["install", name.as_str(), "--color=false"],
            ApmCommand::Upgrade(name) => vec!["upgrade", name.as_str(), "--confirm=false"],
            ApmCommand::Uninstall(name) => vec!["uninstall", name.as_str(), "--color=false"],
        }
    }
}

impl fmt::Display for ApmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "apm {}", self.args().join(" "))
    }
}
