//! GitHub static analysis preset
//!
//! One job running the enabled checks. The same job is reused by the build
//! preset as the shared gate in front of the platform builds.

use indexmap::IndexMap;
use tracing::debug;

use super::env::{accumulated_secrets, build_env};
use super::triggers::build_triggers;
use crate::config::{NotificationChannel, WorkflowOptions};
use crate::error::GenerateError;
use crate::steps::{analysis_steps, notification_steps, setup_steps, NotificationContext};
use crate::workflow::{GithubWorkflow, Job, Strategy};

pub const STATIC_ANALYSIS_JOB: &str = "static_analysis";

const DEFAULT_NAME: &str = "Static Analysis";
const MATRIX_NODE_VERSION: &str = "${{ matrix.node-version }}";

/// Static analysis job with optional trailing notification steps
///
/// More than one configured Node version turns the job into a matrix over
/// `node-version`.
pub fn static_analysis_job(options: &WorkflowOptions, notification: NotificationChannel) -> Job {
    let matrix = options.node_versions.len() > 1;
    let node_version = if matrix {
        MATRIX_NODE_VERSION
    } else {
        options.node_version()
    };

    let mut job = Job::new("Static Analysis", options.runner())
        .steps(setup_steps(options, node_version))
        .steps(analysis_steps(&options.static_analysis, options.package_manager));

    if matrix {
        let mut axes = IndexMap::new();
        axes.insert("node-version".to_string(), options.node_versions.clone());
        job.strategy = Some(Strategy {
            matrix: axes,
            fail_fast: Some(false),
        });
    }

    let ctx = NotificationContext::new("static-analysis", "Static analysis");
    job = job.steps(notification_steps(notification, &ctx));
    if notification.includes_pr_comment() {
        job = job.permission("contents", "read").permission("pull-requests", "write");
    }
    job
}

pub fn static_analysis_github(options: &WorkflowOptions) -> Result<GithubWorkflow, GenerateError> {
    let job = static_analysis_job(options, options.static_analysis.notification);
    debug!(steps = job.steps.len(), "Assembled static analysis job");

    let mut jobs = IndexMap::new();
    jobs.insert(STATIC_ANALYSIS_JOB.to_string(), job);

    Ok(GithubWorkflow {
        name: options.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string()),
        on: build_triggers(options.triggers.as_ref()),
        env: build_env(&options.env, &accumulated_secrets(options, false)),
        jobs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticAnalysisOptions;

    fn step_names(job: &Job) -> Vec<&str> {
        job.steps.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_default_job() {
        let workflow = static_analysis_github(&WorkflowOptions::default()).unwrap();
        assert_eq!(workflow.name, "Static Analysis");

        let job = &workflow.jobs[STATIC_ANALYSIS_JOB];
        assert_eq!(job.runs_on, "ubuntu-latest");
        assert!(job.strategy.is_none());
        let names = step_names(job);
        assert!(names.contains(&"TypeScript Check"));
        assert!(names.contains(&"Run Unit Tests"));
        assert!(!names.contains(&"Notify Slack"));
    }

    #[test]
    fn test_node_matrix() {
        let options = WorkflowOptions {
            node_versions: vec!["18".into(), "20".into()],
            ..Default::default()
        };
        let job = static_analysis_job(&options, NotificationChannel::None);

        let strategy = job.strategy.as_ref().unwrap();
        assert_eq!(strategy.matrix["node-version"], vec!["18", "20"]);
        assert_eq!(strategy.fail_fast, Some(false));

        let setup = job
            .steps
            .iter()
            .find(|s| s.uses.as_deref() == Some("actions/setup-node@v4"))
            .unwrap();
        assert_eq!(
            setup.with["node-version"],
            serde_yaml::Value::from("${{ matrix.node-version }}")
        );
    }

    #[test]
    fn test_single_node_version_is_used_directly() {
        let options = WorkflowOptions {
            node_versions: vec!["18".into()],
            ..Default::default()
        };
        let job = static_analysis_job(&options, NotificationChannel::None);
        assert!(job.strategy.is_none());
    }

    #[test]
    fn test_trailing_notifications() {
        let options = WorkflowOptions {
            static_analysis: StaticAnalysisOptions {
                notification: NotificationChannel::Both,
                ..Default::default()
            },
            ..Default::default()
        };
        let workflow = static_analysis_github(&options).unwrap();
        let job = &workflow.jobs[STATIC_ANALYSIS_JOB];

        let names = step_names(job);
        let tests = names.iter().position(|n| *n == "Run Unit Tests").unwrap();
        let slack = names.iter().position(|n| *n == "Notify Slack").unwrap();
        assert!(slack > tests);
        assert!(names.contains(&"Post PR comment"));
        assert_eq!(job.permissions["contents"], "read");
        assert_eq!(job.permissions["pull-requests"], "write");
    }
}
