//! Preset assemblers
//!
//! A preset turns `WorkflowOptions` into a complete workflow document for one
//! pipeline kind. Presets are looked up by kind in a `PresetRegistry`, a plain
//! value built at startup and passed to whoever needs it. Each built-in preset
//! dispatches on `options.platform` to its GitHub or Bitrise assembler.
//!
//! - `build` - per-platform build jobs behind an optional static analysis gate
//! - `static_analysis` - the check job on its own
//! - `bitrise` - Bitrise assemblers for both kinds
//! - `triggers` / `env` - trigger blocks and workflow environment

pub mod bitrise;
pub mod build;
pub mod env;
pub mod static_analysis;
pub mod triggers;

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::{CiPlatform, WorkflowOptions};
use crate::error::{ConfigError, GenerateError};
use crate::workflow::WorkflowDocument;

pub use build::{ANDROID_JOB, IOS_JOB};
pub use env::{accumulated_secrets, build_env};
pub use static_analysis::STATIC_ANALYSIS_JOB;
pub use triggers::{bitrise_trigger_map, build_triggers};

pub const BUILD_PRESET: &str = "build";
pub const STATIC_ANALYSIS_PRESET: &str = "static-analysis";

/// Builds a workflow document from validated options
pub type PresetBuilder = fn(&WorkflowOptions) -> Result<WorkflowDocument, GenerateError>;

/// Preset builders keyed by kind
#[derive(Clone, Default)]
pub struct PresetRegistry {
    builders: BTreeMap<String, PresetBuilder>,
}

impl PresetRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in `build` and `static-analysis` presets
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(BUILD_PRESET, build_preset);
        registry.register(STATIC_ANALYSIS_PRESET, static_analysis_preset);
        registry
    }

    /// Add or replace the builder for `kind`
    pub fn register(&mut self, kind: impl Into<String>, builder: PresetBuilder) {
        let kind = kind.into();
        debug!(kind = %kind, "Registered preset");
        self.builders.insert(kind, builder);
    }

    pub fn get(&self, kind: &str) -> Option<PresetBuilder> {
        self.builders.get(kind).copied()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.builders.contains_key(kind)
    }

    /// Registered kinds in sorted order
    pub fn list(&self) -> Vec<String> {
        self.builders.keys().cloned().collect()
    }

    /// Run the builder registered for `kind`
    pub fn build(
        &self,
        kind: &str,
        options: &WorkflowOptions,
    ) -> Result<WorkflowDocument, GenerateError> {
        let builder = self.get(kind).ok_or_else(|| ConfigError::UnsupportedKind {
            kind: kind.to_string(),
            available: self.list(),
        })?;
        builder(options)
    }
}

impl std::fmt::Debug for PresetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetRegistry")
            .field("kinds", &self.list())
            .finish()
    }
}

fn build_preset(options: &WorkflowOptions) -> Result<WorkflowDocument, GenerateError> {
    match options.platform {
        CiPlatform::Github => build::build_github(options).map(WorkflowDocument::Github),
        CiPlatform::Bitrise => bitrise::build_bitrise(options).map(WorkflowDocument::Bitrise),
    }
}

fn static_analysis_preset(options: &WorkflowOptions) -> Result<WorkflowDocument, GenerateError> {
    match options.platform {
        CiPlatform::Github => {
            static_analysis::static_analysis_github(options).map(WorkflowDocument::Github)
        }
        CiPlatform::Bitrise => {
            bitrise::static_analysis_bitrise(options).map(WorkflowDocument::Bitrise)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{GithubWorkflow, Job, Step, Triggers};

    fn hello_preset(_: &WorkflowOptions) -> Result<WorkflowDocument, GenerateError> {
        let mut jobs = indexmap::IndexMap::new();
        jobs.insert(
            "hello".to_string(),
            Job::new("Hello", "ubuntu-latest").steps([Step::run("Say hello", "echo hello")]),
        );
        Ok(WorkflowDocument::Github(GithubWorkflow {
            name: "Hello".into(),
            on: Triggers::default(),
            env: Default::default(),
            jobs,
        }))
    }

    #[test]
    fn test_default_presets_sorted() {
        let registry = PresetRegistry::with_defaults();
        assert_eq!(registry.list(), vec!["build", "static-analysis"]);
        assert!(registry.contains("build"));
        assert!(!registry.contains("deploy"));
    }

    #[test]
    fn test_register_custom_preset() {
        let mut registry = PresetRegistry::with_defaults();
        registry.register("hello", hello_preset);

        assert_eq!(registry.list(), vec!["build", "hello", "static-analysis"]);
        let document = registry.build("hello", &WorkflowOptions::default()).unwrap();
        assert_eq!(document.as_github().unwrap().name, "Hello");
    }

    #[test]
    fn test_unknown_kind_lists_available() {
        let registry = PresetRegistry::with_defaults();
        let err = registry
            .build("nonexistent-preset", &WorkflowOptions::default())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unsupported pipeline kind"));
        assert!(message.contains("build, static-analysis"));
    }

    #[test]
    fn test_platform_dispatch() {
        let registry = PresetRegistry::with_defaults();
        let github = registry.build("build", &WorkflowOptions::default()).unwrap();
        assert_eq!(github.platform(), CiPlatform::Github);

        let options = WorkflowOptions {
            platform: CiPlatform::Bitrise,
            ..Default::default()
        };
        let bitrise = registry.build("static-analysis", &options).unwrap();
        assert_eq!(bitrise.platform(), CiPlatform::Bitrise);
    }
}
