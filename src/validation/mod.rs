//! Configuration validation
//!
//! - `validate` - structural and enum checks on a raw config, returning a
//!   normalized, typed `WorkflowConfig`
//! - `secrets` - declared secrets versus secrets implied by build options
//! - `structure` - sanity checks on generated YAML
//!
//! Validation works on a clone of the caller's value; the input is never
//! modified.

pub mod secrets;
pub mod structure;

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::{
    AndroidOutputType, BuildPlatform, BuildVariant, CiPlatform, NotificationChannel,
    PackageManager, StorageProvider, WorkflowConfig,
};
use crate::error::ConfigError;
use crate::presets::PresetRegistry;

pub use secrets::{required_secret_names, validate_build_secrets};
pub use structure::{check_no_undefined, check_structure};

static SECRET_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*(?:_[A-Za-z0-9]+)*$").unwrap());

/// Validate a raw config and decode it into a `WorkflowConfig`
pub fn validate(config: &Value, registry: &PresetRegistry) -> Result<WorkflowConfig, ConfigError> {
    let root = match config {
        Value::Null => return Err(ConfigError::MissingConfig),
        Value::Object(map) => map,
        other => {
            return Err(ConfigError::InvalidOptions(format!(
                "configuration must be an object, got {}",
                type_name(other)
            )))
        }
    };

    let kind = root
        .get("kind")
        .and_then(Value::as_str)
        .filter(|k| !k.trim().is_empty())
        .ok_or(ConfigError::MissingKind)?;

    if !registry.contains(kind) {
        return Err(ConfigError::UnsupportedKind {
            kind: kind.to_string(),
            available: registry.list(),
        });
    }

    let mut normalized = root.clone();
    match normalized.get_mut("options") {
        None => {}
        Some(Value::Null) => {
            normalized.remove("options");
        }
        Some(Value::Object(options)) => normalize_options(options)?,
        Some(other) => {
            return Err(ConfigError::InvalidOptions(format!(
                "'options' must be an object, got {}",
                type_name(other)
            )))
        }
    }

    Ok(serde_json::from_value(Value::Object(normalized))?)
}

/// Validate a typed config (programmatic callers)
pub fn validate_config(
    config: &WorkflowConfig,
    registry: &PresetRegistry,
) -> Result<WorkflowConfig, ConfigError> {
    validate(&serde_json::to_value(config)?, registry)
}

fn normalize_options(options: &mut Map<String, Value>) -> Result<(), ConfigError> {
    // every option is optional; null means unset
    options.retain(|_, value| !value.is_null());

    check_enum(options, "platform", "platform", &enum_names(CiPlatform::ALL, CiPlatform::as_str))?;
    check_enum(
        options,
        "packageManager",
        "packageManager",
        &enum_names(PackageManager::ALL, PackageManager::as_str),
    )?;

    if let Some(name) = options.get("name") {
        if !name.is_null() && !name.is_string() {
            return Err(ConfigError::InvalidOptions("'name' must be a string".into()));
        }
    }
    if let Some(runs_on) = options.get("runsOn") {
        if !runs_on.is_null() && !runs_on.is_string() {
            return Err(ConfigError::InvalidOptions("'runsOn' must be a string".into()));
        }
    }

    if let Some(triggers) = options.get("triggers") {
        validate_triggers(triggers)?;
    }

    if let Some(env) = options.get_mut("env") {
        normalize_env(env)?;
    }

    if let Some(secrets) = options.get("secrets") {
        let valid = secrets
            .as_array()
            .map(|items| items.iter().all(Value::is_string))
            .unwrap_or(secrets.is_null());
        if !valid {
            return Err(ConfigError::InvalidOptions(
                "'secrets' must be an array of secret names".into(),
            ));
        }
        let invalid = secrets
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .find(|name| !SECRET_NAME_REGEX.is_match(name));
        if let Some(name) = invalid {
            return Err(ConfigError::InvalidOptions(format!(
                "'{}' is not a valid secret name (letters, digits and single underscores)",
                name
            )));
        }
    }

    if let Some(versions) = options.get_mut("nodeVersions") {
        normalize_node_versions(versions)?;
    }

    if let Some(build) = options.get_mut("build") {
        match build {
            Value::Object(build) => normalize_build(build)?,
            Value::Null => {}
            other => {
                return Err(ConfigError::InvalidOptions(format!(
                    "'build' must be an object, got {}",
                    type_name(other)
                )))
            }
        }
    }

    for key in ["staticAnalysis", "healthCheck"] {
        if let Some(checks) = options.get(key) {
            validate_static_analysis(key, checks)?;
        }
    }

    Ok(())
}

fn validate_triggers(triggers: &Value) -> Result<(), ConfigError> {
    let triggers = match triggers {
        Value::Object(map) => map,
        Value::Null => return Ok(()),
        other => {
            return Err(ConfigError::InvalidTriggers(format!(
                "triggers must be an object, got {}",
                type_name(other)
            )))
        }
    };

    for event in ["push", "pullRequest", "pullRequestTarget"] {
        let Some(value) = triggers.get(event) else {
            continue;
        };
        let block = match value {
            Value::Object(block) => block,
            Value::Null => continue,
            _ => {
                return Err(ConfigError::InvalidTriggers(format!(
                    "{} must be an object",
                    event
                )))
            }
        };
        check_string_array(block, "branches", event)?;
        if event == "push" {
            check_string_array(block, "ignorePaths", event)?;
        }
    }

    if let Some(dispatch) = triggers.get("workflowDispatch") {
        if !dispatch.is_boolean() && !dispatch.is_null() {
            return Err(ConfigError::InvalidTriggers(
                "workflowDispatch must be a boolean".into(),
            ));
        }
    }

    if let Some(schedule) = triggers.get("schedule") {
        let entries = match schedule {
            Value::Array(entries) => entries,
            Value::Null => return Ok(()),
            _ => {
                return Err(ConfigError::InvalidTriggers(
                    "schedule must be an array".into(),
                ))
            }
        };
        for (i, entry) in entries.iter().enumerate() {
            let has_cron = entry
                .get("cron")
                .and_then(Value::as_str)
                .is_some_and(|c| !c.trim().is_empty());
            if !has_cron {
                return Err(ConfigError::InvalidTriggers(format!(
                    "schedule[{}] must have a 'cron' string",
                    i
                )));
            }
        }
    }

    Ok(())
}

fn check_string_array(
    block: &Map<String, Value>,
    key: &str,
    event: &str,
) -> Result<(), ConfigError> {
    match block.get(key) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(ConfigError::InvalidTriggers(format!(
            "{}.{} must be an array of strings",
            event, key
        ))),
    }
}

fn normalize_env(env: &mut Value) -> Result<(), ConfigError> {
    let map = match env {
        Value::Object(map) => map,
        Value::Null => {
            *env = Value::Object(Map::new());
            return Ok(());
        }
        _ => return Err(ConfigError::InvalidOptions("'env' must be an object".into())),
    };

    for (key, value) in map.iter_mut() {
        match value {
            Value::String(_) => {}
            Value::Number(n) => *value = Value::String(n.to_string()),
            Value::Bool(b) => *value = Value::String(b.to_string()),
            _ => {
                return Err(ConfigError::InvalidOptions(format!(
                    "env.{} must be a string",
                    key
                )))
            }
        }
    }
    Ok(())
}

fn normalize_node_versions(versions: &mut Value) -> Result<(), ConfigError> {
    let items = match versions {
        Value::Array(items) => items,
        Value::Null => {
            *versions = Value::Array(Vec::new());
            return Ok(());
        }
        _ => {
            return Err(ConfigError::InvalidOptions(
                "'nodeVersions' must be an array".into(),
            ))
        }
    };

    for item in items.iter_mut() {
        match item {
            Value::String(_) => {}
            Value::Number(n) => match n.as_u64() {
                Some(major) => *item = Value::String(major.to_string()),
                // 18.10 parses as the float 18.1
                None => {
                    return Err(ConfigError::InvalidOptions(format!(
                        "'nodeVersions' entry {} must be quoted",
                        n
                    )))
                }
            },
            _ => {
                return Err(ConfigError::InvalidOptions(
                    "'nodeVersions' entries must be strings or numbers".into(),
                ))
            }
        }
    }
    Ok(())
}

fn normalize_build(build: &mut Map<String, Value>) -> Result<(), ConfigError> {
    build.retain(|_, value| !value.is_null());

    check_enum(
        build,
        "platform",
        "build platform",
        &enum_names(BuildPlatform::ALL, BuildPlatform::as_str),
    )?;
    check_enum(
        build,
        "variant",
        "build variant",
        &enum_names(BuildVariant::ALL, BuildVariant::as_str),
    )?;
    check_enum(
        build,
        "storage",
        "storage",
        &enum_names(StorageProvider::ALL, StorageProvider::as_str),
    )?;
    check_enum(
        build,
        "notification",
        "notification",
        &enum_names(NotificationChannel::ALL, NotificationChannel::as_str),
    )?;

    for key in ["includeHealthCheck", "includeStaticAnalysis"] {
        let coerced = build.get(key).map(coerce_bool).unwrap_or(true);
        build.insert(key.to_string(), Value::Bool(coerced));
    }

    let output_types = enum_names(AndroidOutputType::ALL, AndroidOutputType::as_str);
    let valid_output = match build.get("androidOutputType") {
        None => true,
        Some(Value::String(s)) => output_types.contains(&s.as_str()),
        Some(_) => false,
    };
    if !valid_output {
        warn!(
            value = %build.get("androidOutputType").map(|v| v.to_string()).unwrap_or_default(),
            "Invalid androidOutputType, falling back to apk"
        );
        build.insert(
            "androidOutputType".to_string(),
            Value::String(AndroidOutputType::Apk.as_str().to_string()),
        );
    }

    match build.get("flavor") {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(ConfigError::InvalidOptions(
            "build.flavor must be a string".into(),
        )),
    }
}

fn validate_static_analysis(key: &str, checks: &Value) -> Result<(), ConfigError> {
    let checks = match checks {
        Value::Object(map) => map,
        Value::Null => return Ok(()),
        _ => {
            return Err(ConfigError::InvalidOptions(format!(
                "'{}' must be an object",
                key
            )))
        }
    };

    for toggle in ["typescript", "eslint", "prettier", "unitTests"] {
        if let Some(value) = checks.get(toggle) {
            if !value.is_boolean() {
                return Err(ConfigError::InvalidOptions(format!(
                    "{}.{} must be a boolean",
                    key, toggle
                )));
            }
        }
    }

    check_enum(
        checks,
        "notification",
        "notification",
        &enum_names(NotificationChannel::ALL, NotificationChannel::as_str),
    )
}

/// Truthiness as understood by loosely typed config sources; null counts as unset
fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.trim().to_lowercase().as_str(), "" | "false" | "0"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn check_enum(
    map: &Map<String, Value>,
    key: &str,
    field: &str,
    allowed: &[&'static str],
) -> Result<(), ConfigError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(s)) if allowed.contains(&s.as_str()) => Ok(()),
        Some(other) => Err(ConfigError::InvalidEnum {
            field: field.to_string(),
            value: other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string()),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

fn enum_names<T>(all: &[T], name: fn(&T) -> &'static str) -> Vec<&'static str> {
    all.iter().map(name).collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
