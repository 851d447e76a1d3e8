//! Generated YAML validation
//!
//! `validate_sync` runs the in-process structure check. `validate_async` adds
//! optional external tools (`yamllint`, `bitrise validate`) run as
//! subprocesses. Tool failures are not retried; callers wanting a deadline
//! wrap the future in their own timeout.

use std::io::Write as _;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::CiPlatform;
use crate::error::LintError;
use crate::validation::check_structure;

/// Structure check only; returns the input unchanged on success
pub fn validate_sync(yaml: &str, platform: CiPlatform) -> Result<String, LintError> {
    check_structure(yaml, platform)?;
    Ok(yaml.to_string())
}

/// Which external validators `validate_async` runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintOptions {
    pub yamllint: bool,
    pub bitrise: bool,
}

impl LintOptions {
    pub fn all() -> Self {
        Self {
            yamllint: true,
            bitrise: true,
        }
    }

    fn validators(&self) -> Vec<Box<dyn ExternalValidator>> {
        let mut validators: Vec<Box<dyn ExternalValidator>> = Vec::new();
        if self.yamllint {
            validators.push(Box::new(YamlLint::default()));
        }
        if self.bitrise {
            validators.push(Box::new(BitriseCli::default()));
        }
        validators
    }
}

/// Structure check followed by every enabled external validator for `platform`
pub async fn validate_async(
    yaml: &str,
    platform: CiPlatform,
    options: &LintOptions,
) -> Result<String, LintError> {
    validate_sync(yaml, platform)?;
    run_validators(yaml, platform, &options.validators()).await?;
    Ok(yaml.to_string())
}

/// Run the given validators in order, stopping at the first failure
pub async fn run_validators(
    yaml: &str,
    platform: CiPlatform,
    validators: &[Box<dyn ExternalValidator>],
) -> Result<(), LintError> {
    for validator in validators.iter().filter(|v| v.applies_to(platform)) {
        validator.validate(yaml).await?;
        info!(tool = validator.name(), "External validation passed");
    }
    Ok(())
}

/// An external program that checks generated YAML
#[async_trait]
pub trait ExternalValidator: Send + Sync {
    fn name(&self) -> &str;

    fn applies_to(&self, platform: CiPlatform) -> bool;

    async fn validate(&self, yaml: &str) -> Result<(), LintError>;
}

// ============================================================================
// yamllint
// ============================================================================

const YAMLLINT_CONFIG: &str = "{extends: relaxed, rules: {line-length: disable, truthy: disable}}";

pub struct YamlLint {
    binary: String,
}

impl YamlLint {
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for YamlLint {
    fn default() -> Self {
        Self::with_binary("yamllint")
    }
}

#[async_trait]
impl ExternalValidator for YamlLint {
    fn name(&self) -> &str {
        "yamllint"
    }

    fn applies_to(&self, _platform: CiPlatform) -> bool {
        true
    }

    #[tracing::instrument(skip(self, yaml), fields(tool = "yamllint"))]
    async fn validate(&self, yaml: &str) -> Result<(), LintError> {
        let binary = locate(&self.binary, "pip install yamllint")?;

        let mut child = Command::new(binary)
            .args(["-f", "parsable", "-d", YAMLLINT_CONFIG, "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(yaml.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        let text = combined_output(&output.stdout, &output.stderr);
        debug!(status = ?output.status.code(), "yamllint finished");

        if output.status.success() {
            Ok(())
        } else {
            Err(classify(self.name(), &text))
        }
    }
}

// ============================================================================
// bitrise validate
// ============================================================================

pub struct BitriseCli {
    binary: String,
}

impl BitriseCli {
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for BitriseCli {
    fn default() -> Self {
        Self::with_binary("bitrise")
    }
}

#[async_trait]
impl ExternalValidator for BitriseCli {
    fn name(&self) -> &str {
        "bitrise"
    }

    fn applies_to(&self, platform: CiPlatform) -> bool {
        platform == CiPlatform::Bitrise
    }

    #[tracing::instrument(skip(self, yaml), fields(tool = "bitrise"))]
    async fn validate(&self, yaml: &str) -> Result<(), LintError> {
        let binary = locate(&self.binary, "brew install bitrise")?;

        // bitrise only reads configs from disk
        let mut file = tempfile::Builder::new()
            .prefix("bitrise-")
            .suffix(".yml")
            .tempfile()?;
        file.write_all(yaml.as_bytes())?;
        file.flush()?;

        let output = Command::new(binary)
            .arg("validate")
            .arg("-c")
            .arg(file.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let text = combined_output(&output.stdout, &output.stderr);
        debug!(status = ?output.status.code(), "bitrise validate finished");

        if output.status.success() && !text.contains("valid: false") {
            Ok(())
        } else {
            Err(classify(self.name(), &text))
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn locate(binary: &str, hint: &str) -> Result<std::path::PathBuf, LintError> {
    which::which(binary).map_err(|_| LintError::ToolMissing {
        tool: binary.to_string(),
        hint: hint.to_string(),
    })
}

fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    [stdout.trim(), stderr.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map tool output to the most specific error kind it describes
pub fn classify(tool: &str, output: &str) -> LintError {
    let lower = output.to_lowercase();
    let tool = tool.to_string();
    let output = output.to_string();

    if lower.contains("syntax error") {
        LintError::Syntax { tool, output }
    } else if lower.contains("missing") || lower.contains("required") {
        LintError::MissingField { tool, output }
    } else if lower.contains("parse") || lower.contains("unmarshal") {
        LintError::Parse { tool, output }
    } else {
        LintError::Failed { tool, output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GITHUB_YAML: &str = r#"name: Build
on:
  push:
    branches:
    - main
jobs:
  build-android:
    runs-on: ubuntu-latest
    steps:
    - name: Checkout repository
      uses: actions/checkout@v4
"#;

    #[test]
    fn test_validate_sync_accepts_valid_document() {
        let result = validate_sync(GITHUB_YAML, CiPlatform::Github).unwrap();
        assert_eq!(result, GITHUB_YAML);
    }

    #[test]
    fn test_validate_sync_rejects_missing_jobs() {
        let err = validate_sync("name: Build\non: {push: {}}\n", CiPlatform::Github).unwrap_err();
        assert!(matches!(err, LintError::Structure(_)));
    }

    #[tokio::test]
    async fn test_validate_async_without_tools() {
        let result = validate_async(GITHUB_YAML, CiPlatform::Github, &LintOptions::default())
            .await
            .unwrap();
        assert_eq!(result, GITHUB_YAML);
    }

    #[tokio::test]
    async fn test_missing_tool_reports_install_hint() {
        let validators: Vec<Box<dyn ExternalValidator>> = vec![Box::new(YamlLint::with_binary(
            "rn-ci-gen-missing-yamllint-binary",
        ))];
        let err = run_validators(GITHUB_YAML, CiPlatform::Github, &validators)
            .await
            .unwrap_err();
        match err {
            LintError::ToolMissing { tool, hint } => {
                assert_eq!(tool, "rn-ci-gen-missing-yamllint-binary");
                assert!(hint.contains("pip install yamllint"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_bitrise_validator_skipped_for_github() {
        let validators: Vec<Box<dyn ExternalValidator>> = vec![Box::new(BitriseCli::with_binary(
            "rn-ci-gen-missing-bitrise-binary",
        ))];
        assert!(run_validators(GITHUB_YAML, CiPlatform::Github, &validators)
            .await
            .is_ok());
    }

    #[test]
    fn test_classify_output() {
        assert!(matches!(
            classify("yamllint", "stdin:3:1: [error] syntax error: mapping values are not allowed"),
            LintError::Syntax { .. }
        ));
        assert!(matches!(
            classify("bitrise", "workflow (primary) is missing steps"),
            LintError::MissingField { .. }
        ));
        assert!(matches!(
            classify("bitrise", "Failed to unmarshal config"),
            LintError::Parse { .. }
        ));
        assert!(matches!(
            classify("yamllint", "exit status 1"),
            LintError::Failed { .. }
        ));
    }
}
