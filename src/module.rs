//! Host adapter: arguments in, one reconciliation pass, record out.

use crate::args::{self, ModuleArgs};
use crate::output::{Invocation, ModuleOutput};
use apmkit::Client;
use apmkit::backend::process::DEFAULT_EXECUTABLE;

/// Settings given on the command line rather than in the arguments file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub check_mode: bool,
    pub executable: Option<String>,
}

/// Validate `input`, then reconcile unless running in check mode.
///
/// Validation runs first, so bad arguments fail even in check mode.
pub fn run(input: &str, overrides: &Overrides) -> ModuleOutput {
    let args = match args::parse(input) {
        Ok(args) => args,
        Err(rejected) => {
            log::warn!("{}", rejected.error);
            return ModuleOutput::failure(
                rejected.error.to_string(),
                1,
                Invocation {
                    module_args: rejected.module_args,
                },
            );
        }
    };

    if args.check_mode || overrides.check_mode {
        log::info!("check mode, skipping {}", args.name);
        return ModuleOutput::skipped(Invocation {
            module_args: args.module_args,
        });
    }

    let executable = overrides
        .executable
        .clone()
        .or_else(|| args.executable.clone())
        .unwrap_or_else(|| DEFAULT_EXECUTABLE.to_string());
    log::debug!("using apm executable {executable}");

    execute(&Client::with_executable(executable), args)
}

/// Run the reconciliation pass and turn its verdict into a record.
pub fn execute(client: &Client, args: ModuleArgs) -> ModuleOutput {
    let invocation = Invocation {
        module_args: args.module_args,
    };

    match client.reconcile(&args.name, args.state) {
        Ok(result) => ModuleOutput::from_result(&args.name, args.state, result, invocation),
        Err(e) => {
            log::error!("{e}");
            ModuleOutput::failure(e.to_string(), e.rc(), invocation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apmkit::{ApmCommand, CommandOutcome, Error};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<String>>>;

    /// Client whose runner answers from a fixed table and records commands.
    fn fake_client(
        installed: &'static str,
        upgradable: &'static str,
        mutate_rc: i32,
    ) -> (Client, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);

        let runner = move |command: &ApmCommand| -> apmkit::Result<CommandOutcome> {
            seen.lock().unwrap().push(command.to_string());
            Ok(match command {
                ApmCommand::ListInstalled => CommandOutcome::success(installed),
                ApmCommand::ListUpgradable => CommandOutcome::success(upgradable),
                _ if mutate_rc == 0 => CommandOutcome::success("done ✓"),
                _ => CommandOutcome::failure(mutate_rc, "apm blew up"),
            })
        };

        (Client::with_runner(Box::new(runner)), calls)
    }

    fn args_for(value: Value) -> ModuleArgs {
        args::parse(&value.to_string()).unwrap()
    }

    fn to_json(output: &ModuleOutput) -> Value {
        serde_json::to_value(output).unwrap()
    }

    #[test]
    fn test_present_and_changed() {
        let (client, calls) = fake_client("", "", 0);

        let output = execute(&client, args_for(json!({"name": "hoge", "state": "present"})));
        let json = to_json(&output);

        assert_eq!(json["changed"], true);
        assert_eq!(json["rc"], 0);
        assert_eq!(json["stdout"], "done ✓");
        assert_eq!(*calls.lock().unwrap(), vec![
            "apm list --bare --color=false",
            "apm install hoge --color=false",
        ]);
    }

    #[test]
    fn test_present_and_not_changed() {
        let (client, calls) = fake_client("hoge@1.0.0\n", "", 0);

        let output = execute(&client, args_for(json!({"name": "hoge"})));

        assert!(!output.changed);
        assert_eq!(output.rc, Some(0));
        assert_eq!(output.stdout.as_deref(), Some(""));
        assert_eq!(output.stdout_lines, Some(Vec::new()));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_latest_and_changed() {
        let (client, calls) = fake_client("hoge@1.0.0\n", "└── hoge 1.0.0 -> 1.0.1\n", 0);

        let output = execute(&client, args_for(json!({"name": "hoge", "state": "latest"})));

        assert!(output.changed);
        assert_eq!(output.rc, Some(0));
        assert_eq!(
            calls.lock().unwrap().last().map(String::as_str),
            Some("apm upgrade hoge --confirm=false")
        );
    }

    #[test]
    fn test_latest_and_not_changed() {
        let (client, _) = fake_client("hoge@1.0.1\n", "└── (empty)\n", 0);

        let output = execute(&client, args_for(json!({"name": "hoge", "state": "latest"})));

        assert!(!output.changed);
        assert!(!output.is_failed());
    }

    #[test]
    fn test_absent_and_changed() {
        let (client, _) = fake_client("hoge@1.0.0\n", "", 0);

        let output = execute(&client, args_for(json!({"name": "hoge", "state": "absent"})));

        assert!(output.changed);
        assert_eq!(output.rc, Some(0));
    }

    #[test]
    fn test_absent_and_not_changed() {
        let (client, calls) = fake_client("fuga@1.0.0\n", "", 0);

        let output = execute(&client, args_for(json!({"name": "hoge", "state": "absent"})));

        assert!(!output.changed);
        assert_eq!(output.rc, Some(0));
        assert_eq!(*calls.lock().unwrap(), vec!["apm list --bare --color=false"]);
    }

    #[test]
    fn test_mutation_failure_is_reported() {
        let (client, _) = fake_client("", "", 1);

        let output = execute(&client, args_for(json!({"name": "hoge"})));
        let json = to_json(&output);

        assert_eq!(json["failed"], true);
        assert_eq!(json["rc"], 1);
        assert_eq!(json["changed"], false);
        assert_eq!(json["stderr"], "apm blew up");
        assert_eq!(output.exit_code(), 1);
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let runner = |_: &ApmCommand| -> apmkit::Result<CommandOutcome> {
            Err(Error::ApmNotFound {
                program: "apm".to_string(),
            })
        };
        let client = Client::with_runner(Box::new(runner));

        let output = execute(&client, args_for(json!({"name": "hoge"})));

        assert!(output.is_failed());
        assert_eq!(output.rc, Some(2));
        assert_eq!(
            output.msg.as_deref(),
            Some("failed to find required executable apm")
        );
    }

    #[test]
    fn test_invocation_echoes_arguments() {
        let (client, _) = fake_client("hoge@1.0.0\n", "", 0);

        let output = execute(&client, args_for(json!({"name": "hoge"})));
        let json = to_json(&output);

        assert_eq!(
            json["invocation"],
            json!({"module_args": {"name": "hoge", "state": "present", "executable": null}})
        );
    }

    #[test]
    fn test_check_mode_skips_everything() {
        // A missing executable proves nothing was spawned
        let overrides = Overrides {
            check_mode: false,
            executable: Some("/nonexistent/apm".to_string()),
        };

        let output = run(
            &json!({"name": "hoge", "state": "absent", "_ansible_check_mode": true}).to_string(),
            &overrides,
        );

        assert!(!output.changed);
        assert!(!output.is_failed());
        assert!(output.rc.is_none());
        assert_eq!(output.exit_code(), 0);
    }

    #[test]
    fn test_check_mode_from_overrides() {
        let overrides = Overrides {
            check_mode: true,
            executable: Some("/nonexistent/apm".to_string()),
        };

        let output = run(&json!({"name": "hoge"}).to_string(), &overrides);

        assert!(!output.is_failed());
        assert_eq!(output.msg.as_deref(), Some("skipped, running in check mode"));
    }

    #[test]
    fn test_validation_runs_before_check_mode() {
        let output = run(
            &json!({"_ansible_check_mode": true}).to_string(),
            &Overrides::default(),
        );

        assert!(output.is_failed());
        assert_eq!(output.msg.as_deref(), Some("missing required arguments: name"));
    }

    #[test]
    fn test_missing_executable_fails() {
        let overrides = Overrides {
            check_mode: false,
            executable: Some("/nonexistent/apm".to_string()),
        };

        let output = run(&json!({"name": "hoge"}).to_string(), &overrides);

        assert!(output.is_failed());
        assert_eq!(output.rc, Some(2));
    }
}
