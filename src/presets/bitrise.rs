//! Bitrise assemblers
//!
//! Both preset kinds share one layout: utility workflows chained through
//! `before_run` into a `primary` workflow that the trigger map points at.
//!
//! ```text
//! primary
//!   before_run: _setup, static-analysis, build-android, build-ios
//!   steps:      notifications | summary, cache push
//! ```
//!
//! Secret values are referenced through placeholders and rewritten to `$NAME`
//! after serialization.

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::env::{accumulated_secrets, build_env};
use super::triggers::bitrise_trigger_map;
use crate::config::{
    BuildPlatform, BuildVariant, NotificationChannel, StorageProvider, WorkflowOptions,
};
use crate::config::options::DEFAULT_JAVA_VERSION;
use crate::error::GenerateError;
use crate::output::secret_placeholder;
use crate::steps::analysis_checks;
use crate::steps::templates::{
    android_artifact_paths, ios_artifact_path, render_gradle_script, render_xcode_script,
};
use crate::workflow::{BitriseConfig, BitriseStep, BitriseWorkflow};

pub const PRIMARY_WORKFLOW: &str = "primary";
pub const SETUP_WORKFLOW: &str = "_setup";
pub const STATIC_ANALYSIS_WORKFLOW: &str = "static-analysis";
pub const ANDROID_WORKFLOW: &str = "build-android";
pub const IOS_WORKFLOW: &str = "build-ios";

const HAS_SSH_KEY: &str = r#"{{getenv "SSH_RSA_PRIVATE_KEY" | ne ""}}"#;
const IS_PR: &str = ".IsPR";

pub fn build_bitrise(options: &WorkflowOptions) -> Result<BitriseConfig, GenerateError> {
    let build = &options.build;
    let mut chain = vec![SETUP_WORKFLOW.to_string()];
    let mut workflows = IndexMap::new();
    workflows.insert(SETUP_WORKFLOW.to_string(), setup_workflow(options));

    if build.runs_static_analysis() {
        workflows.insert(STATIC_ANALYSIS_WORKFLOW.to_string(), static_analysis_workflow(options));
        chain.push(STATIC_ANALYSIS_WORKFLOW.to_string());
    }
    if build.platform.includes_android() {
        workflows.insert(ANDROID_WORKFLOW.to_string(), android_workflow(options)?);
        chain.push(ANDROID_WORKFLOW.to_string());
    }
    if build.platform.includes_ios() {
        workflows.insert(IOS_WORKFLOW.to_string(), ios_workflow(options)?);
        chain.push(IOS_WORKFLOW.to_string());
    }

    let subject = format!("{} {} build", platform_title(build.platform), build.variant.as_str());
    workflows.insert(
        PRIMARY_WORKFLOW.to_string(),
        primary_workflow(options, chain, build.notification, &subject),
    );
    debug!(workflows = ?workflows.keys().collect::<Vec<_>>(), "Assembled Bitrise workflows");

    Ok(config(options, workflows, true))
}

pub fn static_analysis_bitrise(options: &WorkflowOptions) -> Result<BitriseConfig, GenerateError> {
    let mut workflows = IndexMap::new();
    workflows.insert(SETUP_WORKFLOW.to_string(), setup_workflow(options));
    workflows.insert(STATIC_ANALYSIS_WORKFLOW.to_string(), static_analysis_workflow(options));

    let chain = vec![SETUP_WORKFLOW.to_string(), STATIC_ANALYSIS_WORKFLOW.to_string()];
    workflows.insert(
        PRIMARY_WORKFLOW.to_string(),
        primary_workflow(
            options,
            chain,
            options.static_analysis.notification,
            "Static analysis",
        ),
    );

    Ok(config(options, workflows, false))
}

fn config(
    options: &WorkflowOptions,
    workflows: IndexMap<String, BitriseWorkflow>,
    include_build_secrets: bool,
) -> BitriseConfig {
    let env = build_env(&options.env, &accumulated_secrets(options, include_build_secrets));

    let mut config = BitriseConfig::new();
    config.app.envs = env
        .into_iter()
        .map(|(key, value)| {
            let mut entry = IndexMap::new();
            entry.insert(key, value);
            entry
        })
        .collect();
    config.trigger_map = bitrise_trigger_map(options.triggers.as_ref(), PRIMARY_WORKFLOW);
    config.workflows = workflows;
    config
}

// ============================================================================
// Workflows
// ============================================================================

fn setup_workflow(options: &WorkflowOptions) -> BitriseWorkflow {
    if options.node_versions.len() > 1 {
        warn!(
            versions = ?options.node_versions,
            "Bitrise has no build matrix, using the first Node version"
        );
    }

    let mut steps = vec![
        BitriseStep::new("activate-ssh-key@4").run_if(HAS_SSH_KEY),
        BitriseStep::new("git-clone@8"),
    ];
    if options.cache.enabled {
        steps.push(BitriseStep::new("cache-pull@2"));
    }
    steps.push(BitriseStep::new("nvm@1").input("node_version", options.node_version()));
    steps.push(BitriseStep::script(
        "Install dependencies",
        options.package_manager.install_command(),
    ));

    BitriseWorkflow {
        title: Some("Setup".to_string()),
        steps,
        ..Default::default()
    }
}

fn static_analysis_workflow(options: &WorkflowOptions) -> BitriseWorkflow {
    let mut steps: Vec<BitriseStep> =
        analysis_checks(&options.static_analysis, options.package_manager)
            .into_iter()
            .map(|check| BitriseStep::script(check.title, check.command))
            .collect();
    if steps.is_empty() {
        steps.push(BitriseStep::script(
            "Static analysis",
            "echo \"No static analysis checks enabled\"",
        ));
    }

    BitriseWorkflow {
        title: Some("Static Analysis".to_string()),
        steps,
        ..Default::default()
    }
}

fn android_workflow(options: &WorkflowOptions) -> Result<BitriseWorkflow, GenerateError> {
    let build = &options.build;
    let script = render_gradle_script(build.variant, build.android_output_type, build.flavor())?;

    let mut steps = vec![
        BitriseStep::new("set-java-version@1").input("set_java_version", DEFAULT_JAVA_VERSION),
        BitriseStep::script("Run Android Build", script),
    ];
    let paths = android_artifact_paths(build.variant, build.android_output_type, build.flavor());
    steps.extend(storage_steps(options, "android", &paths, "FIREBASE_APP_ID_ANDROID"));

    Ok(BitriseWorkflow {
        title: Some("Build Android".to_string()),
        steps,
        ..Default::default()
    })
}

fn ios_workflow(options: &WorkflowOptions) -> Result<BitriseWorkflow, GenerateError> {
    let variant = options.build.variant;
    let script = render_xcode_script(variant)?;

    let mut steps = vec![
        BitriseStep::new("cocoapods-install@2").input("source_root_path", "ios"),
        BitriseStep::script("Run iOS Build", script),
    ];
    steps.extend(storage_steps(
        options,
        "ios",
        &[ios_artifact_path(variant)],
        "FIREBASE_APP_ID_IOS",
    ));

    Ok(BitriseWorkflow {
        title: Some("Build iOS".to_string()),
        steps,
        ..Default::default()
    })
}

fn primary_workflow(
    options: &WorkflowOptions,
    before_run: Vec<String>,
    notification: NotificationChannel,
    subject: &str,
) -> BitriseWorkflow {
    let mut steps = notification_steps(notification, subject);
    if steps.is_empty() {
        steps.push(BitriseStep::script(
            "Summary",
            format!("echo \"{} finished\"", subject),
        ));
    }
    if options.cache.enabled {
        steps.push(
            BitriseStep::new("cache-push@2")
                .input("compress_archive", "true")
                .always_run(),
        );
    }

    BitriseWorkflow {
        title: Some(subject.to_string()),
        before_run,
        steps,
        ..Default::default()
    }
}

// ============================================================================
// Steps
// ============================================================================

fn storage_steps(
    options: &WorkflowOptions,
    label: &str,
    paths: &[String],
    firebase_app_id: &str,
) -> Vec<BitriseStep> {
    let collect = BitriseStep::script(
        format!("Collect {} artifacts", platform_label(label)),
        collect_script(label, paths),
    );

    match options.build.storage {
        StorageProvider::Bitrise => vec![
            collect,
            BitriseStep::new("deploy-to-bitrise-io@2")
                .title(format!("Deploy {} artifacts to Bitrise", platform_label(label)))
                .input("deploy_path", artifact_dir(label)),
        ],

        StorageProvider::Firebase => vec![
            collect,
            BitriseStep::script(
                format!("Distribute {} build via Firebase", platform_label(label)),
                firebase_script(label, firebase_app_id),
            ),
        ],

        StorageProvider::S3 => vec![
            collect,
            BitriseStep::script(
                format!("Upload {} build to S3", platform_label(label)),
                s3_script(label, options.build.variant),
            ),
        ],

        StorageProvider::Github | StorageProvider::Drive => {
            warn!(
                storage = options.build.storage.as_str(),
                platform = label,
                "Storage provider has no Bitrise upload step, skipping"
            );
            Vec::new()
        }
    }
}

/// Per-platform directory under the deploy dir shared by the whole build
fn artifact_dir(label: &str) -> String {
    format!("$BITRISE_DEPLOY_DIR/{}", label)
}

fn collect_script(label: &str, paths: &[String]) -> String {
    let dir = artifact_dir(label);
    let mut script = format!("mkdir -p \"{}\"", dir);
    for glob in paths {
        script.push_str(&format!("\ncp {} \"{}/\"", glob, dir));
    }
    script
}

fn firebase_script(label: &str, app_id_secret: &str) -> String {
    format!(
        concat!(
            "echo \"{account}\" > \"$BITRISE_SOURCE_DIR/firebase-service-account.json\"\n",
            "export GOOGLE_APPLICATION_CREDENTIALS=\"$BITRISE_SOURCE_DIR/firebase-service-account.json\"\n",
            "for f in \"{dir}\"/*; do\n",
            "  npx firebase-tools appdistribution:distribute \"$f\" --app \"{app_id}\" --groups testers\n",
            "done"
        ),
        account = secret_placeholder("FIREBASE_SERVICE_ACCOUNT"),
        dir = artifact_dir(label),
        app_id = secret_placeholder(app_id_secret),
    )
}

fn s3_script(label: &str, variant: BuildVariant) -> String {
    format!(
        "aws s3 cp \"{dir}\" \"s3://{bucket}/{label}/{variant}/$BITRISE_BUILD_NUMBER/\" --recursive",
        dir = artifact_dir(label),
        bucket = secret_placeholder("S3_BUCKET"),
        label = label,
        variant = variant.as_str(),
    )
}

fn notification_steps(channel: NotificationChannel, subject: &str) -> Vec<BitriseStep> {
    let mut steps = Vec::new();
    if channel.includes_slack() {
        steps.push(
            BitriseStep::new("slack@4")
                .title("Notify Slack")
                .input("webhook_url", secret_placeholder("SLACK_WEBHOOK"))
                .input("text", format!("{} finished", subject))
                .always_run(),
        );
    }
    if channel.includes_pr_comment() {
        steps.push(
            BitriseStep::new("comment-on-github-pull-request@0")
                .title("Post PR comment")
                .run_if(IS_PR)
                .input("personal_access_token", "$GITHUB_TOKEN")
                .input(
                    "body",
                    format!("### {}\n\n[View build]($BITRISE_BUILD_URL)", subject),
                )
                .input("repository_url", "$GIT_REPOSITORY_URL")
                .input("issue_number", "$BITRISE_PULL_REQUEST")
                .input("update_comment_tag", "rn-ci-gen")
                .always_run(),
        );
    }
    steps
}

fn platform_title(platform: BuildPlatform) -> &'static str {
    match platform {
        BuildPlatform::Android => "Android",
        BuildPlatform::Ios => "iOS",
        BuildPlatform::Both => "Android & iOS",
    }
}

fn platform_label(label: &str) -> &'static str {
    match label {
        "ios" => "iOS",
        _ => "Android",
    }
}
