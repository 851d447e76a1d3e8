//! GitHub build preset
//!
//! One job per requested mobile platform, optionally gated behind the shared
//! static analysis job:
//!
//! ```text
//! static_analysis ──► build-android
//!                 └─► build-ios
//! ```

use indexmap::IndexMap;
use tracing::debug;

use super::env::{accumulated_secrets, build_env};
use super::static_analysis::{static_analysis_job, STATIC_ANALYSIS_JOB};
use super::triggers::build_triggers;
use crate::config::{
    BuildOptions, BuildPlatform, NotificationChannel, WorkflowOptions, DEFAULT_MACOS_RUNNER,
};
use crate::error::GenerateError;
use crate::steps::{
    android_build_steps, android_storage_steps, ios_build_steps, ios_storage_steps,
    notification_steps, setup_steps, NotificationContext,
};
use crate::workflow::{GithubWorkflow, Job};

pub const ANDROID_JOB: &str = "build-android";
pub const IOS_JOB: &str = "build-ios";

/// Default workflow name, e.g. `Android Debug Build`
pub fn default_build_name(build: &BuildOptions) -> String {
    let platform = match build.platform {
        BuildPlatform::Android => "Android",
        BuildPlatform::Ios => "iOS",
        BuildPlatform::Both => "Android & iOS",
    };
    format!("{} {} Build", platform, build.variant.title())
}

pub fn build_github(options: &WorkflowOptions) -> Result<GithubWorkflow, GenerateError> {
    let build = &options.build;
    let mut jobs = IndexMap::new();

    if build.runs_static_analysis() {
        jobs.insert(
            STATIC_ANALYSIS_JOB.to_string(),
            static_analysis_job(options, NotificationChannel::None),
        );
    }
    if build.platform.includes_android() {
        jobs.insert(ANDROID_JOB.to_string(), android_job(options)?);
    }
    if build.platform.includes_ios() {
        jobs.insert(IOS_JOB.to_string(), ios_job(options)?);
    }
    debug!(jobs = ?jobs.keys().collect::<Vec<_>>(), "Assembled build jobs");

    Ok(GithubWorkflow {
        name: options
            .name
            .clone()
            .unwrap_or_else(|| default_build_name(build)),
        on: build_triggers(options.triggers.as_ref()),
        env: build_env(&options.env, &accumulated_secrets(options, true)),
        jobs,
    })
}

fn android_job(options: &WorkflowOptions) -> Result<Job, GenerateError> {
    let build = &options.build;
    let ctx = NotificationContext::new(
        "android",
        format!("Android {} build", build.variant.as_str()),
    );

    let job = Job::new("Build Android", options.runner())
        .steps(setup_steps(options, options.node_version()))
        .steps(android_build_steps(options)?)
        .steps(android_storage_steps(options))
        .steps(notification_steps(build.notification, &ctx));
    Ok(gate(job, build))
}

fn ios_job(options: &WorkflowOptions) -> Result<Job, GenerateError> {
    let build = &options.build;
    let ctx = NotificationContext::new("ios", format!("iOS {} build", build.variant.as_str()));

    let job = Job::new("Build iOS", DEFAULT_MACOS_RUNNER)
        .steps(setup_steps(options, options.node_version()))
        .steps(ios_build_steps(options)?)
        .steps(ios_storage_steps(options))
        .steps(notification_steps(build.notification, &ctx));
    Ok(gate(job, build))
}

/// Dependency edge on the static analysis job and PR comment permissions
fn gate(mut job: Job, build: &BuildOptions) -> Job {
    if build.runs_static_analysis() {
        job = job.needs(STATIC_ANALYSIS_JOB);
    }
    if build.notification.includes_pr_comment() {
        job = job.permission("contents", "read").permission("pull-requests", "write");
    }
    job
}
