//! Form state conversion
//!
//! Front ends (web forms, interactive prompts) collect a flat set of fields per
//! preset. Each preset has its own form struct; conversion into the typed
//! `WorkflowConfig` happens here so the preset builders only ever see
//! `WorkflowOptions`.

use serde::{Deserialize, Serialize};

use super::build::BuildOptions;
use super::options::{
    BranchTrigger, CiPlatform, PackageManager, PushTrigger, StaticAnalysisOptions,
    TriggerOptions, WorkflowConfig, WorkflowOptions,
};

/// Form state for one preset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "preset", rename_all = "kebab-case")]
pub enum PresetForm {
    Build(BuildForm),
    StaticAnalysis(StaticAnalysisForm),
}

/// Fields shared by every preset form
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommonFields {
    #[serde(default)]
    pub workflow_name: String,

    #[serde(default)]
    pub ci_platform: CiPlatform,

    /// Branches that trigger the workflow on push and pull request
    #[serde(default)]
    pub branches: Vec<String>,

    #[serde(default)]
    pub manual_trigger: bool,

    #[serde(default)]
    pub package_manager: PackageManager,

    #[serde(default)]
    pub secrets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildForm {
    #[serde(flatten)]
    pub common: CommonFields,

    #[serde(default)]
    pub node_version: Option<String>,

    #[serde(default)]
    pub build: BuildOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaticAnalysisForm {
    #[serde(flatten)]
    pub common: CommonFields,

    #[serde(default)]
    pub node_versions: Vec<String>,

    #[serde(default)]
    pub checks: StaticAnalysisOptions,
}

impl PresetForm {
    /// Preset kind this form produces
    pub fn kind(&self) -> &'static str {
        match self {
            PresetForm::Build(_) => "build",
            PresetForm::StaticAnalysis(_) => "static-analysis",
        }
    }

    pub fn into_config(self) -> WorkflowConfig {
        let kind = self.kind();
        let options = match self {
            PresetForm::Build(form) => {
                let mut options = common_options(form.common);
                options.node_versions = form.node_version.into_iter().collect();
                options.build = form.build;
                options
            }
            PresetForm::StaticAnalysis(form) => {
                let mut options = common_options(form.common);
                options.node_versions = form.node_versions;
                options.static_analysis = form.checks;
                options
            }
        };

        WorkflowConfig::new(kind).with_options(options)
    }
}

fn common_options(common: CommonFields) -> WorkflowOptions {
    let name = Some(common.workflow_name.trim().to_string()).filter(|n| !n.is_empty());
    let branches: Vec<String> = common
        .branches
        .into_iter()
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect();

    let triggers = if branches.is_empty() && !common.manual_trigger {
        None
    } else {
        let branch_trigger = (!branches.is_empty()).then(|| BranchTrigger {
            branches: branches.clone(),
        });
        Some(TriggerOptions {
            push: (!branches.is_empty()).then(|| PushTrigger {
                branches: branches.clone(),
                ignore_paths: Vec::new(),
            }),
            pull_request: branch_trigger,
            pull_request_target: None,
            workflow_dispatch: common.manual_trigger,
            schedule: Vec::new(),
        })
    };

    WorkflowOptions {
        name,
        platform: common.ci_platform,
        triggers,
        package_manager: common.package_manager,
        secrets: (!common.secrets.is_empty()).then_some(common.secrets),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::build::{BuildPlatform, StorageProvider};

    #[test]
    fn test_build_form_into_config() {
        let form: PresetForm = serde_json::from_str(
            r#"{
                "preset": "build",
                "workflowName": "  Release builds ",
                "branches": ["main", " "],
                "nodeVersion": "18",
                "build": { "platform": "ios", "storage": "firebase" }
            }"#,
        )
        .unwrap();

        let config = form.into_config();
        assert_eq!(config.kind, "build");

        let options = config.options.unwrap();
        assert_eq!(options.name.as_deref(), Some("Release builds"));
        assert_eq!(options.node_version(), "18");
        assert_eq!(options.build.platform, BuildPlatform::Ios);
        assert_eq!(options.build.storage, StorageProvider::Firebase);

        let triggers = options.triggers.unwrap();
        assert_eq!(triggers.push.unwrap().branches, vec!["main"]);
        assert!(!triggers.workflow_dispatch);
        assert!(options.secrets.is_none());
    }

    #[test]
    fn test_static_analysis_form_without_branches_uses_default_triggers() {
        let form = PresetForm::StaticAnalysis(StaticAnalysisForm {
            node_versions: vec!["18".into(), "20".into()],
            ..Default::default()
        });

        let config = form.into_config();
        assert_eq!(config.kind, "static-analysis");
        let options = config.options.unwrap();
        assert!(options.triggers.is_none());
        assert!(options.name.is_none());
        assert_eq!(options.node_versions.len(), 2);
    }

    #[test]
    fn test_manual_trigger_only() {
        let form = PresetForm::Build(BuildForm {
            common: CommonFields {
                manual_trigger: true,
                ..Default::default()
            },
            ..Default::default()
        });

        let triggers = form.into_config().options.unwrap().triggers.unwrap();
        assert!(triggers.workflow_dispatch);
        assert!(triggers.push.is_none());
        assert!(triggers.pull_request.is_none());
    }
}
