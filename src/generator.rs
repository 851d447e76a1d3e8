//! Generation pipeline
//!
//! ```text
//! raw config ─► validate ─► secrets check ─► preset ─► undefined check
//!            ─► dump ─► inject secrets ─► structure check ─► GeneratedWorkflow
//! ```
//!
//! Every stage is a pure transform. A `Generator` only holds its registry, so
//! one instance can serve any number of calls, including concurrent ones.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{
    BuildOptions, CiPlatform, ConfigLoader, WorkflowConfig, WorkflowOptions,
};
use crate::error::{ConfigError, GenerateError};
use crate::output::{dump, inject_secrets};
use crate::presets::{PresetRegistry, BUILD_PRESET};
use crate::secrets::generate_secrets_summary_with_declared;
use crate::validation::{check_no_undefined, check_structure, validate, validate_build_secrets};

/// Result of one generation call
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWorkflow {
    pub kind: String,
    pub platform: CiPlatform,
    pub yaml: String,
    pub secrets_summary: String,
}

impl GeneratedWorkflow {
    pub fn default_path(&self) -> PathBuf {
        default_output_path(&self.kind, self.platform)
    }
}

/// Conventional location of a generated file relative to the repository root
pub fn default_output_path(kind: &str, platform: CiPlatform) -> PathBuf {
    match platform {
        CiPlatform::Github => Path::new(".github")
            .join("workflows")
            .join(format!("{}.yaml", kind)),
        CiPlatform::Bitrise => PathBuf::from("bitrise.yml"),
    }
}

#[derive(Debug, Clone)]
pub struct Generator {
    registry: PresetRegistry,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(PresetRegistry::with_defaults())
    }
}

impl Generator {
    pub fn new(registry: PresetRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    /// Registered preset kinds, sorted
    pub fn available_presets(&self) -> Vec<String> {
        self.registry.list()
    }

    /// Generate from a typed config
    pub fn generate(&self, config: &WorkflowConfig) -> Result<GeneratedWorkflow, GenerateError> {
        let value = serde_json::to_value(config).map_err(ConfigError::from)?;
        self.generate_value(value)
    }

    /// Generate from a JSON or YAML config file
    pub fn generate_file(&self, path: &Path) -> Result<GeneratedWorkflow, GenerateError> {
        let value = ConfigLoader::load_file(path)?;
        self.generate_value(value)
    }

    /// Generate from a raw, not yet validated config
    #[tracing::instrument(skip(self, config), fields(kind = tracing::field::Empty))]
    pub fn generate_value(&self, config: Value) -> Result<GeneratedWorkflow, GenerateError> {
        let config = validate(&config, &self.registry)?;
        tracing::Span::current().record("kind", config.kind.as_str());

        let options = config.options.unwrap_or_default();
        let is_build = config.kind == BUILD_PRESET;

        if is_build {
            if let Some(declared) = &options.secrets {
                validate_build_secrets(&options.build, declared)?;
            }
        }

        let document = self.registry.build(&config.kind, &options)?;
        let platform = document.platform();
        check_no_undefined(&serde_yaml::to_value(&document)?)?;

        let yaml = inject_secrets(&dump(&document)?, platform);
        check_structure(&yaml, platform)?;
        debug!(bytes = yaml.len(), "Serialized workflow");

        let summary_options = summary_options(&options, is_build);
        let secrets_summary =
            generate_secrets_summary_with_declared(&summary_options, options.declared_secrets());

        info!(kind = %config.kind, platform = platform.as_str(), "Generated workflow");
        Ok(GeneratedWorkflow {
            kind: config.kind,
            platform,
            yaml,
            secrets_summary,
        })
    }
}

/// Build options the secrets summary is derived from. Presets other than
/// `build` only contribute their notification channel.
fn summary_options(options: &WorkflowOptions, is_build: bool) -> BuildOptions {
    if is_build {
        options.build.clone()
    } else {
        BuildOptions {
            notification: options.static_analysis.notification,
            ..Default::default()
        }
    }
}
