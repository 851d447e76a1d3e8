//! Post-serialization structure checks
//!
//! Parse the emitted YAML back and confirm the fields each CI system insists
//! on are present. Also rejects unresolved values leaking into the output.

use serde_yaml::{Mapping, Value};

use crate::config::CiPlatform;
use crate::error::StructureError;

/// Check emitted YAML text for the target platform's required shape
pub fn check_structure(yaml: &str, platform: CiPlatform) -> Result<(), StructureError> {
    let document: Value = serde_yaml::from_str(yaml)?;
    let root = document.as_mapping().ok_or(StructureError::NotAMapping)?;
    match platform {
        CiPlatform::Github => check_github(root),
        CiPlatform::Bitrise => check_bitrise(root),
    }
}

fn check_github(root: &Mapping) -> Result<(), StructureError> {
    for field in ["name", "on", "jobs"] {
        require(root, field)?;
    }

    let jobs = root
        .get("jobs")
        .and_then(Value::as_mapping)
        .filter(|jobs| !jobs.is_empty())
        .ok_or_else(|| StructureError::MissingField("jobs".into()))?;

    for (key, job) in jobs {
        let name = key.as_str().unwrap_or("<non-string>").to_string();
        let job = job.as_mapping().ok_or_else(|| StructureError::InvalidJob {
            job: name.clone(),
            reason: "job must be a mapping".into(),
        })?;

        if job.get("runs-on").and_then(Value::as_str).is_none() {
            return Err(StructureError::InvalidJob {
                job: name,
                reason: "missing 'runs-on'".into(),
            });
        }

        let has_steps = job
            .get("steps")
            .and_then(Value::as_sequence)
            .is_some_and(|steps| !steps.is_empty());
        if !has_steps {
            return Err(StructureError::InvalidJob {
                job: name,
                reason: "missing or empty 'steps'".into(),
            });
        }
    }
    Ok(())
}

fn check_bitrise(root: &Mapping) -> Result<(), StructureError> {
    for field in ["format_version", "workflows"] {
        require(root, field)?;
    }

    let workflows = root
        .get("workflows")
        .and_then(Value::as_mapping)
        .filter(|w| !w.is_empty())
        .ok_or_else(|| StructureError::MissingField("workflows".into()))?;

    for (key, workflow) in workflows {
        let has_steps = workflow
            .get("steps")
            .and_then(Value::as_sequence)
            .is_some_and(|steps| !steps.is_empty());
        if !has_steps {
            let name = key.as_str().unwrap_or("<non-string>").to_string();
            return Err(StructureError::EmptyBitriseWorkflow(name));
        }
    }
    Ok(())
}

fn require(root: &Mapping, field: &str) -> Result<(), StructureError> {
    match root.get(field) {
        Some(value) if !value.is_null() => Ok(()),
        _ => Err(StructureError::MissingField(field.to_string())),
    }
}

/// Reject null values and strings containing `undefined` anywhere in the tree
pub fn check_no_undefined(value: &Value) -> Result<(), StructureError> {
    walk(value, "$")
}

fn walk(value: &Value, path: &str) -> Result<(), StructureError> {
    match value {
        Value::Null => Err(StructureError::UndefinedValue(path.to_string())),
        Value::String(s) if s.contains("undefined") => {
            Err(StructureError::UndefinedValue(format!("{} ({:?})", path, s)))
        }
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| walk(item, &format!("{}[{}]", path, i))),
        Value::Mapping(map) => map.iter().try_for_each(|(k, v)| {
            let key = k.as_str().map(str::to_string).unwrap_or_else(|| format!("{:?}", k));
            if key.contains("undefined") {
                return Err(StructureError::UndefinedValue(format!("{}.{}", path, key)));
            }
            walk(v, &format!("{}.{}", path, key))
        }),
        Value::Tagged(tagged) => walk(&tagged.value, path),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
    }
}
