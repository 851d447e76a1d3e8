//! # rn-ci-gen
//!
//! Generate CI pipelines for React Native projects from a declarative
//! configuration: GitHub Actions workflows or Bitrise configs, assembled from
//! named presets.
//!
//! ## Features
//!
//! - **Presets** - `build` (Android, iOS or both, with optional static analysis gate)
//!   and `static-analysis` (typescript, eslint, prettier, unit tests)
//! - **Two targets** - GitHub Actions and Bitrise from the same options
//! - **Contextual secrets** - required secrets are derived from storage,
//!   notification and platform choices and summarized as Markdown
//! - **Checked output** - generated YAML is parsed back and checked for the
//!   fields each CI system requires; `yamllint` and `bitrise validate` can be
//!   run on top
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rn_ci_gen::Generator;
//! use serde_json::json;
//!
//! fn main() -> anyhow::Result<()> {
//!     let generator = Generator::default();
//!     let result = generator.generate_value(json!({
//!         "kind": "build",
//!         "options": {
//!             "build": {
//!                 "platform": "both",
//!                 "variant": "release",
//!                 "storage": "firebase",
//!                 "notification": "slack"
//!             }
//!         }
//!     }))?;
//!
//!     println!("{}", result.yaml);
//!     println!("{}", result.secrets_summary);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod presets;
pub mod secrets;
pub mod steps;
pub mod validation;
pub mod workflow;

// Re-export main types
pub use config::{
    AndroidOutputType, BuildOptions, BuildPlatform, BuildVariant, CiPlatform, ConfigFormat,
    ConfigLoader, LoadError, NotificationChannel, PackageManager, PresetForm, StorageProvider,
    TriggerOptions, WorkflowConfig, WorkflowOptions,
};
pub use error::{ConfigError, GenerateError, LintError, MissingSecretsError, StructureError};
pub use generator::{default_output_path, GeneratedWorkflow, Generator};
pub use output::{validate_async, validate_sync, ExternalValidator, LintOptions};
pub use presets::{PresetBuilder, PresetRegistry};
pub use secrets::{
    generate_secrets_summary, get_contextual_secrets, SecretDefinition, SecretGroup,
    NO_SECRETS_MESSAGE,
};
pub use workflow::{BitriseConfig, GithubWorkflow, WorkflowDocument};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        BuildOptions, CiPlatform, ConfigLoader, PresetForm, WorkflowConfig, WorkflowOptions,
    };
    pub use crate::error::{GenerateError, LintError};
    pub use crate::generator::{default_output_path, GeneratedWorkflow, Generator};
    pub use crate::output::{validate_async, validate_sync, LintOptions};
    pub use crate::presets::PresetRegistry;
    pub use crate::secrets::{generate_secrets_summary, generate_secrets_summary_with_declared};
}
