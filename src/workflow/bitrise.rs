//! Bitrise configuration shape
//!
//! A separate model from the GitHub one: Bitrise steps are single-entry maps
//! keyed by `step-id@version`, inputs are lists of one-key maps and triggers
//! live in a top-level `trigger_map`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "13";
pub const DEFAULT_STEP_LIB_SOURCE: &str = "https://github.com/bitrise-io/bitrise-steplib.git";
pub const PROJECT_TYPE: &str = "react-native";

/// A complete `bitrise.yml` document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BitriseConfig {
    pub format_version: String,

    pub default_step_lib_source: String,

    pub project_type: String,

    #[serde(default, skip_serializing_if = "BitriseApp::is_empty")]
    pub app: BitriseApp,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trigger_map: Vec<TriggerMapItem>,

    pub workflows: IndexMap<String, BitriseWorkflow>,
}

impl BitriseConfig {
    pub fn new() -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            default_step_lib_source: DEFAULT_STEP_LIB_SOURCE.to_string(),
            project_type: PROJECT_TYPE.to_string(),
            app: BitriseApp::default(),
            trigger_map: Vec::new(),
            workflows: IndexMap::new(),
        }
    }
}

impl Default for BitriseConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// App-level environment (`app.envs`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BitriseApp {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub envs: Vec<IndexMap<String, String>>,
}

impl BitriseApp {
    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TriggerMapItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_source_branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_target_branch: Option<String>,

    pub workflow: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BitriseWorkflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Workflows chained before this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub before_run: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub envs: Vec<IndexMap<String, String>>,

    pub steps: Vec<BitriseStep>,
}

/// `- step-id@version: { ... }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BitriseStep(pub IndexMap<String, BitriseStepBody>);

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BitriseStepBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_if: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_always_run: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<IndexMap<String, String>>,
}

impl BitriseStep {
    pub fn new(step_ref: impl Into<String>) -> Self {
        let mut map = IndexMap::new();
        map.insert(step_ref.into(), BitriseStepBody::default());
        Self(map)
    }

    /// Convenience for `script@1` with a title and inline content
    pub fn script(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new("script@1")
            .title(title)
            .input("content", content)
    }

    /// Step reference (`id@version`)
    pub fn step_ref(&self) -> Option<&str> {
        self.0.keys().next().map(String::as_str)
    }

    pub fn body(&self) -> Option<&BitriseStepBody> {
        self.0.values().next()
    }

    fn body_mut(&mut self) -> Option<&mut BitriseStepBody> {
        self.0.values_mut().next()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        if let Some(body) = self.body_mut() {
            body.title = Some(title.into());
        }
        self
    }

    pub fn input(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(body) = self.body_mut() {
            let mut entry = IndexMap::new();
            entry.insert(key.into(), value.into());
            body.inputs.push(entry);
        }
        self
    }

    pub fn run_if(mut self, condition: impl Into<String>) -> Self {
        if let Some(body) = self.body_mut() {
            body.run_if = Some(condition.into());
        }
        self
    }

    pub fn always_run(mut self) -> Self {
        if let Some(body) = self.body_mut() {
            body.is_always_run = Some(true);
        }
        self
    }
}
