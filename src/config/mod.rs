//! Generator input types
//!
//! - `options` - WorkflowConfig, WorkflowOptions, triggers and shared enums
//! - `build` - BuildOptions and the build preset enums
//! - `form` - Per-preset form state converted into WorkflowConfig
//! - `loader` - Load raw configs from JSON/YAML files

pub mod build;
pub mod form;
pub mod loader;
pub mod options;

pub use build::{
    AndroidOutputType, BuildOptions, BuildPlatform, BuildVariant, NotificationChannel,
    StorageProvider,
};
pub use form::{BuildForm, CommonFields, PresetForm, StaticAnalysisForm};
pub use loader::{ConfigFormat, ConfigLoader, LoadError};
pub use options::{
    BranchTrigger, CacheOptions, CiPlatform, PackageManager, PushTrigger, ScheduleEntry,
    StaticAnalysisOptions, TriggerOptions, WorkflowConfig, WorkflowOptions, DEFAULT_BRANCH,
    DEFAULT_MACOS_RUNNER, DEFAULT_NODE_VERSION, DEFAULT_RETENTION_DAYS, DEFAULT_RUNNER,
};
