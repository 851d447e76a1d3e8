//! Workflow configuration types
//!
//! `WorkflowConfig` is what callers hand to the generator: a preset `kind`
//! plus an optional bag of `WorkflowOptions`. Field names follow the camelCase
//! convention of the JSON/YAML configuration files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::build::BuildOptions;

pub const DEFAULT_NODE_VERSION: &str = "20";
pub const DEFAULT_RUNNER: &str = "ubuntu-latest";
pub const DEFAULT_MACOS_RUNNER: &str = "macos-latest";
pub const DEFAULT_RETENTION_DAYS: u32 = 30;
pub const DEFAULT_JAVA_VERSION: &str = "17";
pub const DEFAULT_JAVA_DISTRIBUTION: &str = "temurin";
pub const DEFAULT_RUBY_VERSION: &str = "3.0";
pub const DEFAULT_BRANCH: &str = "main";

// ============================================================================
// WorkflowConfig
// ============================================================================

/// Top-level generator input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowConfig {
    /// Registered preset name (e.g. `build`, `static-analysis`)
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<WorkflowOptions>,
}

impl WorkflowConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: WorkflowOptions) -> Self {
        self.options = Some(options);
        self
    }
}

// ============================================================================
// Enums
// ============================================================================

/// CI system the generated file targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CiPlatform {
    #[default]
    Github,
    Bitrise,
}

impl CiPlatform {
    pub const ALL: &'static [CiPlatform] = &[CiPlatform::Github, CiPlatform::Bitrise];

    pub fn as_str(&self) -> &'static str {
        match self {
            CiPlatform::Github => "github",
            CiPlatform::Bitrise => "bitrise",
        }
    }
}

/// JavaScript package manager
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    #[default]
    Yarn,
}

impl PackageManager {
    pub const ALL: &'static [PackageManager] = &[PackageManager::Npm, PackageManager::Yarn];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Reproducible install command
    pub fn install_command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm ci",
            PackageManager::Yarn => "yarn install --frozen-lockfile",
        }
    }

    /// Run a package.json script
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            PackageManager::Yarn => format!("yarn {}", script),
        }
    }

    pub fn lockfile(&self) -> &'static str {
        match self {
            PackageManager::Npm => "package-lock.json",
            PackageManager::Yarn => "yarn.lock",
        }
    }
}

// ============================================================================
// Triggers
// ============================================================================

/// Abstract trigger intent, mapped onto each CI system's trigger block
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<PushTrigger>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<BranchTrigger>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_target: Option<BranchTrigger>,

    #[serde(default)]
    pub workflow_dispatch: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushTrigger {
    #[serde(default)]
    pub branches: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BranchTrigger {
    #[serde(default)]
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleEntry {
    pub cron: String,
}

// ============================================================================
// Caching and static analysis
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheOptions {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Checks run by the static analysis job; every check defaults to enabled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaticAnalysisOptions {
    #[serde(default = "default_true")]
    pub typescript: bool,

    #[serde(default = "default_true")]
    pub eslint: bool,

    #[serde(default = "default_true")]
    pub prettier: bool,

    #[serde(default = "default_true")]
    pub unit_tests: bool,

    /// Notification steps appended after the checks (static-analysis preset only)
    #[serde(default)]
    pub notification: super::build::NotificationChannel,
}

impl Default for StaticAnalysisOptions {
    fn default() -> Self {
        Self {
            typescript: true,
            eslint: true,
            prettier: true,
            unit_tests: true,
            notification: Default::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// WorkflowOptions
// ============================================================================

/// Options shared by every preset
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Target CI system
    #[serde(default)]
    pub platform: CiPlatform,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<TriggerOptions>,

    /// Workflow-level environment variables
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    /// Secret names the caller has configured in the CI system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_versions: Vec<String>,

    #[serde(default)]
    pub package_manager: PackageManager,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runs_on: Option<String>,

    #[serde(default)]
    pub cache: CacheOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,

    #[serde(default)]
    pub build: BuildOptions,

    #[serde(default, alias = "healthCheck")]
    pub static_analysis: StaticAnalysisOptions,
}

impl WorkflowOptions {
    /// First configured Node version, or the default
    pub fn node_version(&self) -> &str {
        self.node_versions
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_NODE_VERSION)
    }

    /// Runner label for Linux jobs
    pub fn runner(&self) -> &str {
        self.runs_on.as_deref().unwrap_or(DEFAULT_RUNNER)
    }

    pub fn retention_days(&self) -> u32 {
        self.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS)
    }

    /// Secret names declared by the caller, empty when none were given
    pub fn declared_secrets(&self) -> &[String] {
        self.secrets.as_deref().unwrap_or(&[])
    }
}
