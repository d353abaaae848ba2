//! Module argument loading and validation.
//!
//! The host hands us a JSON object, either flat or wrapped as
//! `{"ANSIBLE_MODULE_ARGS": {...}}`. Keys starting with `_ansible_` are
//! host-internal; of those only `_ansible_check_mode` is read.

use anyhow::{Context, Result};
use apmkit::{DesiredState, PackageName};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

const ENVELOPE_KEY: &str = "ANSIBLE_MODULE_ARGS";
const INTERNAL_PREFIX: &str = "_ansible_";
const CHECK_MODE_KEY: &str = "_ansible_check_mode";
const SUPPORTED: [&str; 3] = ["name", "state", "executable"];

/// Validated module arguments.
#[derive(Debug, Clone)]
pub struct ModuleArgs {
    pub name: PackageName,
    pub state: DesiredState,
    pub executable: Option<String>,
    pub check_mode: bool,
    /// User-facing arguments after defaults, echoed back as `invocation`
    pub module_args: Map<String, Value>,
}

/// Why the arguments were rejected. No command runs after one of these.
#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("failed to parse module arguments: {0}")]
    Json(#[from] serde_json::Error),

    #[error("module arguments must be a JSON object")]
    NotAnObject,

    #[error("missing required arguments: name")]
    MissingName,

    #[error("argument {key} is of type {found} and we were unable to convert to str")]
    NotAString { key: &'static str, found: &'static str },

    #[error("value of name is invalid: {0}")]
    InvalidName(#[source] apmkit::Error),

    #[error("value of state must be one of: {}, got: {got}", state_choices())]
    InvalidState { got: String },

    #[error(
        "Unsupported parameters for (apm) module: {}. Supported parameters include: {}",
        .0.join(", "),
        SUPPORTED.join(", ")
    )]
    Unsupported(Vec<String>),
}

/// Rejected arguments together with what we managed to read of them.
#[derive(Debug)]
pub struct Rejected {
    pub error: ArgsError,
    pub module_args: Map<String, Value>,
}

fn state_choices() -> String {
    DesiredState::ALL
        .iter()
        .map(DesiredState::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read raw arguments from a file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Could not read arguments file {}", path.display())),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Could not read arguments from stdin")?;
            Ok(input)
        }
    }
}

/// Parse and validate module arguments.
pub fn parse(input: &str) -> std::result::Result<ModuleArgs, Rejected> {
    let object = match serde_json::from_str::<Value>(input) {
        Ok(value) => unwrap_envelope(value),
        Err(e) => return Err(reject(ArgsError::Json(e), &Map::new())),
    };

    let Some(object) = object else {
        return Err(reject(ArgsError::NotAnObject, &Map::new()));
    };

    validate(&object).map_err(|error| reject(error, &object))
}

fn reject(error: ArgsError, input: &Map<String, Value>) -> Rejected {
    Rejected {
        module_args: user_args(input),
        error,
    }
}

fn unwrap_envelope(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(mut object) => match object.remove(ENVELOPE_KEY) {
            Some(Value::Object(inner)) => Some(inner),
            Some(_) => None,
            None => Some(object),
        },
        _ => None,
    }
}

/// The user-facing portion of the input, for the `invocation` echo.
fn user_args(input: &Map<String, Value>) -> Map<String, Value> {
    input
        .iter()
        .filter(|(key, _)| !key.starts_with(INTERNAL_PREFIX))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn validate(input: &Map<String, Value>) -> std::result::Result<ModuleArgs, ArgsError> {
    let mut unsupported: Vec<String> = input
        .keys()
        .filter(|key| !key.starts_with(INTERNAL_PREFIX) && !SUPPORTED.contains(&key.as_str()))
        .cloned()
        .collect();
    if !unsupported.is_empty() {
        unsupported.sort();
        return Err(ArgsError::Unsupported(unsupported));
    }

    let name = string_arg(input, "name")?.ok_or(ArgsError::MissingName)?;
    let name = PackageName::new(name).map_err(ArgsError::InvalidName)?;

    let state = match string_arg(input, "state")? {
        Some(state) => state
            .parse::<DesiredState>()
            .map_err(|got| ArgsError::InvalidState { got })?,
        None => DesiredState::default(),
    };

    let executable = string_arg(input, "executable")?.filter(|e| !e.is_empty());

    let check_mode = input
        .get(CHECK_MODE_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut module_args = user_args(input);
    module_args.insert("state".to_string(), Value::from(state.as_str()));
    module_args.entry("executable").or_insert(Value::Null);

    Ok(ModuleArgs {
        name,
        state,
        executable,
        check_mode,
        module_args,
    })
}

/// Read an optional string argument; `null` counts as absent.
fn string_arg(
    input: &Map<String, Value>,
    key: &'static str,
) -> std::result::Result<Option<String>, ArgsError> {
    match input.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ArgsError::NotAString {
            key,
            found: json_type(other),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
