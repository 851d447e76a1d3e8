//! Artifact upload steps for GitHub-targeted workflows
//!
//! Each provider bakes `${{ secrets.X }}` references directly since these steps
//! only exist in GitHub Actions output. Providers with no GitHub counterpart
//! contribute no steps.

use tracing::warn;

use super::templates::{android_artifact_paths, ios_artifact_path};
use crate::config::{StorageProvider, WorkflowOptions};
use crate::workflow::Step;

/// Artifacts produced by one platform job
struct ArtifactTarget {
    /// `android` or `ios`; used in step ids and artifact names
    label: &'static str,
    paths: Vec<String>,
    firebase_app_id_secret: &'static str,
}

pub fn android_storage_steps(options: &WorkflowOptions) -> Vec<Step> {
    let build = &options.build;
    let target = ArtifactTarget {
        label: "android",
        paths: android_artifact_paths(build.variant, build.android_output_type, build.flavor()),
        firebase_app_id_secret: "FIREBASE_APP_ID_ANDROID",
    };
    storage_steps(&target, options)
}

pub fn ios_storage_steps(options: &WorkflowOptions) -> Vec<Step> {
    let target = ArtifactTarget {
        label: "ios",
        paths: vec![ios_artifact_path(options.build.variant)],
        firebase_app_id_secret: "FIREBASE_APP_ID_IOS",
    };
    storage_steps(&target, options)
}

fn storage_steps(target: &ArtifactTarget, options: &WorkflowOptions) -> Vec<Step> {
    let variant = options.build.variant.as_str();
    match options.build.storage {
        StorageProvider::Github => vec![Step::uses(
            format!("Upload {} artifact", title(target.label)),
            "actions/upload-artifact@v4",
        )
        .with("name", format!("{}-{}-build", target.label, variant))
        .with("path", target.paths.join("\n"))
        .with("retention-days", options.retention_days())
        .with("if-no-files-found", "error")],

        StorageProvider::Firebase => vec![
            locate_artifact(target),
            Step::uses(
                format!("Distribute {} build via Firebase", title(target.label)),
                "wzieba/Firebase-Distribution-Github-Action@v1",
            )
            .with("appId", secret(target.firebase_app_id_secret))
            .with("serviceCredentialsFileContent", secret("FIREBASE_SERVICE_ACCOUNT"))
            .with("groups", "testers")
            .with("file", located_path(target)),
        ],

        StorageProvider::S3 => vec![
            Step::uses("Configure AWS credentials", "aws-actions/configure-aws-credentials@v4")
                .with("aws-access-key-id", secret("AWS_ACCESS_KEY_ID"))
                .with("aws-secret-access-key", secret("AWS_SECRET_ACCESS_KEY"))
                .with("aws-region", secret("AWS_REGION")),
            Step::run(
                format!("Upload {} build to S3", title(target.label)),
                s3_upload_script(target, variant),
            )
            .env("S3_BUCKET", secret("S3_BUCKET")),
        ],

        StorageProvider::Drive => vec![
            locate_artifact(target),
            Step::uses(
                format!("Upload {} build to Google Drive", title(target.label)),
                "adityak74/google-drive-upload-git-action@main",
            )
            .with("credentials", secret("GOOGLE_DRIVE_SERVICE_ACCOUNT"))
            .with("filename", located_path(target))
            .with("folderId", secret("GOOGLE_DRIVE_FOLDER_ID"))
            .with("overwrite", "true"),
        ],

        StorageProvider::Bitrise => {
            warn!(
                platform = target.label,
                "Bitrise storage has no GitHub Actions upload step, skipping"
            );
            Vec::new()
        }
    }
}

/// Resolve the first artifact glob to a concrete path for single-file uploaders
fn locate_artifact(target: &ArtifactTarget) -> Step {
    let glob = target.paths.first().map(String::as_str).unwrap_or_default();
    Step::run(
        format!("Locate {} artifact", title(target.label)),
        format!(
            "ARTIFACT=$(ls -d {} | head -n 1)\necho \"path=$ARTIFACT\" >> \"$GITHUB_OUTPUT\"",
            glob
        ),
    )
    .id(locate_step_id(target))
}

fn locate_step_id(target: &ArtifactTarget) -> String {
    format!("locate-{}-artifact", target.label)
}

fn located_path(target: &ArtifactTarget) -> String {
    format!("${{{{ steps.{}.outputs.path }}}}", locate_step_id(target))
}

fn s3_upload_script(target: &ArtifactTarget, variant: &str) -> String {
    let prefix = format!("{}/{}/${{{{ github.run_number }}}}", target.label, variant);
    target
        .paths
        .iter()
        .map(|glob| {
            format!(
                "for f in {}; do\n  aws s3 cp \"$f\" \"s3://$S3_BUCKET/{}/$(basename \"$f\")\"\ndone",
                glob, prefix
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn secret(name: &str) -> String {
    format!("${{{{ secrets.{} }}}}", name)
}

fn title(label: &str) -> &'static str {
    match label {
        "ios" => "iOS",
        _ => "Android",
    }
}
