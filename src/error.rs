//! Generator error types

use crate::config::LoadError;

/// Invalid or unsupported workflow configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration is required")]
    MissingConfig,

    #[error("Configuration must include a 'kind' string")]
    MissingKind,

    #[error("Unsupported pipeline kind: '{kind}'. Available kinds: {}", available.join(", "))]
    UnsupportedKind { kind: String, available: Vec<String> },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid triggers: {0}")]
    InvalidTriggers(String),

    #[error("Invalid {field}: '{value}'. Must be one of: {}", allowed.join(", "))]
    InvalidEnum {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Invalid configuration: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Secrets implied by the build options that were not declared
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required secrets: {}", missing.join(", "))]
pub struct MissingSecretsError {
    pub missing: Vec<String>,
}

/// Generated document failed the post-serialization sanity checks
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("Generated YAML could not be parsed: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Generated YAML must be a mapping at the top level")]
    NotAMapping,

    #[error("Missing required top-level field: {0}")]
    MissingField(String),

    #[error("Job '{job}' is invalid: {reason}")]
    InvalidJob { job: String, reason: String },

    #[error("Bitrise workflow '{0}' has no steps")]
    EmptyBitriseWorkflow(String),

    #[error("Undefined value at {0}")]
    UndefinedValue(String),
}

/// Failure reported by an external YAML validator
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("{tool} is not installed. Install it with: {hint}")]
    ToolMissing { tool: String, hint: String },

    #[error("{tool} reported a syntax error: {output}")]
    Syntax { tool: String, output: String },

    #[error("{tool} reported a missing field: {output}")]
    MissingField { tool: String, output: String },

    #[error("{tool} could not parse the document: {output}")]
    Parse { tool: String, output: String },

    #[error("{tool} failed: {output}")]
    Failed { tool: String, output: String },

    #[error("Structure check failed: {0}")]
    Structure(#[from] StructureError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Any error produced while generating a workflow
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    MissingSecrets(#[from] MissingSecretsError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_kind_lists_available() {
        let err = ConfigError::UnsupportedKind {
            kind: "deploy".into(),
            available: vec!["build".into(), "static-analysis".into()],
        };
        assert_eq!(
            err.to_string(),
            "Unsupported pipeline kind: 'deploy'. Available kinds: build, static-analysis"
        );
    }

    #[test]
    fn test_missing_secrets_message() {
        let err = MissingSecretsError {
            missing: vec!["SLACK_WEBHOOK".into(), "FIREBASE_APP_ID_IOS".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required secrets: SLACK_WEBHOOK, FIREBASE_APP_ID_IOS"
        );
    }
}
