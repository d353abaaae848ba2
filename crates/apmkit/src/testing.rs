//! Scripted runner for unit tests.

use crate::backend::CommandRunner;
use crate::command::ApmCommand;
use crate::error::Result;
use crate::types::CommandOutcome;
use std::collections::HashMap;
use std::sync::Mutex;

/// Answers each kind of apm command with a fixed outcome and records
/// every command it receives. Unscripted commands panic.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<&'static str, CommandOutcome>,
    calls: Mutex<Vec<ApmCommand>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_list_installed(self, outcome: CommandOutcome) -> Self {
        self.on("list", outcome)
    }

    pub fn on_list_upgradable(self, outcome: CommandOutcome) -> Self {
        self.on("upgrade --list", outcome)
    }

    pub fn on_install(self, outcome: CommandOutcome) -> Self {
        self.on("install", outcome)
    }

    pub fn on_upgrade(self, outcome: CommandOutcome) -> Self {
        self.on("upgrade", outcome)
    }

    pub fn on_uninstall(self, outcome: CommandOutcome) -> Self {
        self.on("uninstall", outcome)
    }

    fn on(mut self, verb: &'static str, outcome: CommandOutcome) -> Self {
        self.responses.insert(verb, outcome);
        self
    }

    /// Commands received so far, in order.
    pub fn calls(&self) -> Vec<ApmCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Verbs of commands received so far, in order.
    pub fn verbs(&self) -> Vec<&'static str> {
        self.calls().iter().map(verb).collect()
    }

    /// Whether any mutating command was received.
    pub fn mutated(&self) -> bool {
        self.calls().iter().any(is_mutating)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &ApmCommand) -> Result<CommandOutcome> {
        self.calls.lock().unwrap().push(command.clone());
        match self.responses.get(verb(command)) {
            Some(outcome) => Ok(outcome.clone()),
            None => panic!("unexpected command: {command}"),
        }
    }
}

/// The apm subcommand, without the package name.
fn verb(command: &ApmCommand) -> &'static str {
    match command {
        ApmCommand::ListInstalled => "list",
        ApmCommand::ListUpgradable => "upgrade --list",
        ApmCommand::Install(_) => "install",
        ApmCommand::Upgrade(_) => "upgrade",
        ApmCommand::Uninstall(_) => "uninstall",
    }
}

fn is_mutating(command: &ApmCommand) -> bool {
    matches!(
        command,
        ApmCommand::Install(_) | ApmCommand::Upgrade(_) | ApmCommand::Uninstall(_)
    )
}

mod tests {
    use super::*;
    use crate::types::PackageName;

    #[test]
    fn test_only_package_commands_mutate() {
        let hoge = PackageName::new("hoge").unwrap();
        assert!(!is_mutating(&ApmCommand::ListInstalled));
        assert!(!is_mutating(&ApmCommand::ListUpgradable));
        assert!(is_mutating(&ApmCommand::Install(hoge.clone())));
        assert!(is_mutating(&ApmCommand::Upgrade(hoge.clone())));
        assert!(is_mutating(&ApmCommand::Uninstall(hoge)));
    }
}
