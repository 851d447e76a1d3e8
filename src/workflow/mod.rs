//! Generated workflow shapes
//!
//! - `github` - GitHub Actions workflow, job and step records
//! - `bitrise` - Bitrise config, workflow and keyed step records
//!
//! The two shapes are independent; builders for one never produce records of
//! the other.

pub mod bitrise;
pub mod github;

use serde::Serialize;

use crate::config::CiPlatform;

pub use bitrise::{
    BitriseApp, BitriseConfig, BitriseStep, BitriseStepBody, BitriseWorkflow, TriggerMapItem,
};
pub use github::{
    BranchEvent, CronEvent, GithubWorkflow, Job, PushEvent, Step, Strategy, Triggers,
    WorkflowDispatch,
};

/// Output of a preset builder
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum WorkflowDocument {
    Github(GithubWorkflow),
    Bitrise(BitriseConfig),
}

impl WorkflowDocument {
    pub fn platform(&self) -> CiPlatform {
        match self {
            WorkflowDocument::Github(_) => CiPlatform::Github,
            WorkflowDocument::Bitrise(_) => CiPlatform::Bitrise,
        }
    }

    pub fn as_github(&self) -> Option<&GithubWorkflow> {
        match self {
            WorkflowDocument::Github(workflow) => Some(workflow),
            WorkflowDocument::Bitrise(_) => None,
        }
    }

    pub fn as_bitrise(&self) -> Option<&BitriseConfig> {
        match self {
            WorkflowDocument::Bitrise(config) => Some(config),
            WorkflowDocument::Github(_) => None,
        }
    }
}
