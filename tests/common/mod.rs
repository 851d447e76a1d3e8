#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rn_ci_gen::{GeneratedWorkflow, Generator};
use serde_json::{json, Value};
use tempfile::TempDir;

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn write_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).expect("Failed to write config file");
    path
}

/// `{kind: "build", options: {build: <build>}}` merged with extra top-level options
pub fn build_config(build: Value, extra: Value) -> Value {
    let mut options = json!({ "build": build });
    if let (Some(target), Value::Object(extra)) = (options.as_object_mut(), extra) {
        target.extend(extra);
    }
    json!({ "kind": "build", "options": options })
}

pub fn generate(config: Value) -> GeneratedWorkflow {
    Generator::default()
        .generate_value(config)
        .expect("Generation failed")
}

/// Parse generated YAML back into a generic tree
pub fn parse(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).expect("Generated YAML does not parse")
}

/// Job keys of a generated GitHub workflow, in document order
pub fn job_keys(yaml: &serde_yaml::Value) -> Vec<String> {
    yaml["jobs"]
        .as_mapping()
        .expect("jobs mapping")
        .keys()
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect()
}

/// Step names of one job
pub fn step_names(yaml: &serde_yaml::Value, job: &str) -> Vec<String> {
    yaml["jobs"][job]["steps"]
        .as_sequence()
        .expect("steps sequence")
        .iter()
        .filter_map(|step| step["name"].as_str().map(str::to_string))
        .collect()
}

pub const SIMPLE_BUILD_YAML: &str = r#"
kind: build
options:
  name: Android CI
  packageManager: npm
  build:
    platform: android
    variant: release
    storage: github
"#;

pub const STATIC_ANALYSIS_JSON: &str = r#"{
  "kind": "static-analysis",
  "options": {
    "nodeVersions": ["18", "20"],
    "staticAnalysis": { "prettier": false }
  }
}"#;
