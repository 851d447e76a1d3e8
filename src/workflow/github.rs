//! GitHub Actions workflow shape
//!
//! Mirrors the subset of the GitHub Actions schema the presets emit. Maps are
//! `IndexMap`s so jobs, inputs and env entries serialize in insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Workflow
// ============================================================================

/// A complete `.github/workflows/*.yaml` document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GithubWorkflow {
    pub name: String,

    pub on: Triggers,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    pub jobs: IndexMap<String, Job>,
}

/// Native `on:` block
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Triggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<PushEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<BranchEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request_target: Option<BranchEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_dispatch: Option<WorkflowDispatch>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<CronEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PushEvent {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,

    #[serde(rename = "paths-ignore", default, skip_serializing_if = "Vec::is_empty")]
    pub paths_ignore: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BranchEvent {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
}

/// Serializes as an empty mapping (`workflow_dispatch: {}`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WorkflowDispatch {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CronEvent {
    pub cron: String,
}

// ============================================================================
// Job
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "runs-on")]
    pub runs_on: String,

    /// Jobs that must succeed before this one starts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub needs: Vec<String>,

    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub permissions: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    pub steps: Vec<Step>,
}

impl Job {
    pub fn new(name: impl Into<String>, runs_on: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            runs_on: runs_on.into(),
            needs: Vec::new(),
            condition: None,
            permissions: IndexMap::new(),
            strategy: None,
            env: IndexMap::new(),
            steps: Vec::new(),
        }
    }

    pub fn needs(mut self, job: impl Into<String>) -> Self {
        self.needs.push(job.into());
        self
    }

    pub fn permission(mut self, scope: impl Into<String>, access: impl Into<String>) -> Self {
        self.permissions.insert(scope.into(), access.into());
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }
}

/// Build matrix (`strategy.matrix`)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Strategy {
    pub matrix: IndexMap<String, Vec<String>>,

    #[serde(rename = "fail-fast", default, skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,
}

// ============================================================================
// Step
// ============================================================================

/// A single step; by convention exactly one of `uses` / `run` is set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub with: IndexMap<String, serde_yaml::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    #[serde(
        rename = "continue-on-error",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub continue_on_error: Option<bool>,
}

impl Step {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            condition: None,
            uses: None,
            run: None,
            with: IndexMap::new(),
            env: IndexMap::new(),
            continue_on_error: None,
        }
    }

    /// Step that invokes a reusable action
    pub fn uses(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            uses: Some(action.into()),
            ..Self::named(name)
        }
    }

    /// Step that runs a shell script
    pub fn run(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            run: Some(script.into()),
            ..Self::named(name)
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.with.insert(key.into(), value.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn continue_on_error(mut self) -> Self {
        self.continue_on_error = Some(true);
        self
    }
}
