//! Contextual secrets resolver
//!
//! Derives the secrets a build configuration needs from static lookup tables
//! (storage provider, platform-specific Firebase app ids, notification channel)
//! and renders them as a grouped Markdown summary.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::{BuildOptions, BuildPlatform, NotificationChannel, StorageProvider};

pub const NO_SECRETS_MESSAGE: &str = "No secrets required for this configuration.";

/// Summary section a secret is listed under, in rendering order
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SecretGroup {
    Storage,
    Platform,
    Notification,
    General,
}

impl SecretGroup {
    pub fn title(&self) -> &'static str {
        match self {
            SecretGroup::Storage => "Storage",
            SecretGroup::Platform => "Platform",
            SecretGroup::Notification => "Notifications",
            SecretGroup::General => "General",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretDefinition {
    pub name: String,
    pub description: String,
    /// False for values the CI system provides on its own (e.g. `GITHUB_TOKEN`)
    pub required: bool,
    pub display_group: SecretGroup,
}

struct SecretSpec {
    name: &'static str,
    description: &'static str,
    required: bool,
}

const fn spec(name: &'static str, description: &'static str) -> SecretSpec {
    SecretSpec {
        name,
        description,
        required: true,
    }
}

const DRIVE_SECRETS: &[SecretSpec] = &[
    spec(
        "GOOGLE_DRIVE_SERVICE_ACCOUNT",
        "Google service account JSON with access to the upload folder",
    ),
    spec("GOOGLE_DRIVE_FOLDER_ID", "ID of the Google Drive folder receiving builds"),
];

const FIREBASE_SECRETS: &[SecretSpec] = &[spec(
    "FIREBASE_SERVICE_ACCOUNT",
    "Firebase service account JSON used by App Distribution",
)];

const S3_SECRETS: &[SecretSpec] = &[
    spec("AWS_ACCESS_KEY_ID", "AWS access key with write access to the bucket"),
    spec("AWS_SECRET_ACCESS_KEY", "Secret key paired with AWS_ACCESS_KEY_ID"),
    spec("AWS_REGION", "Region of the S3 bucket"),
    spec("S3_BUCKET", "Name of the S3 bucket receiving builds"),
];

const FIREBASE_ANDROID_APP_ID: SecretSpec = spec(
    "FIREBASE_APP_ID_ANDROID",
    "Firebase App ID of the Android app",
);

const FIREBASE_IOS_APP_ID: SecretSpec =
    spec("FIREBASE_APP_ID_IOS", "Firebase App ID of the iOS app");

const SLACK_SECRETS: &[SecretSpec] = &[spec(
    "SLACK_WEBHOOK",
    "Incoming webhook URL of the Slack channel to notify",
)];

const PR_COMMENT_SECRETS: &[SecretSpec] = &[SecretSpec {
    name: "GITHUB_TOKEN",
    description: "Provided automatically by GitHub Actions; no secret needs to be created",
    required: false,
}];

fn storage_table(storage: StorageProvider) -> &'static [SecretSpec] {
    match storage {
        StorageProvider::Github | StorageProvider::Bitrise => &[],
        StorageProvider::Drive => DRIVE_SECRETS,
        StorageProvider::Firebase => FIREBASE_SECRETS,
        StorageProvider::S3 => S3_SECRETS,
    }
}

fn platform_table(platform: BuildPlatform, storage: StorageProvider) -> Vec<&'static SecretSpec> {
    if storage != StorageProvider::Firebase {
        return Vec::new();
    }
    let mut specs: Vec<&'static SecretSpec> = Vec::new();
    if platform.includes_android() {
        specs.push(&FIREBASE_ANDROID_APP_ID);
    }
    if platform.includes_ios() {
        specs.push(&FIREBASE_IOS_APP_ID);
    }
    specs
}

fn notification_table(notification: NotificationChannel) -> Vec<&'static SecretSpec> {
    let mut specs: Vec<&'static SecretSpec> = Vec::new();
    if notification.includes_slack() {
        specs.extend(SLACK_SECRETS);
    }
    if notification.includes_pr_comment() {
        specs.extend(PR_COMMENT_SECRETS);
    }
    specs
}

/// Secrets implied by the build options, ordered storage, platform, notification
pub fn get_contextual_secrets(options: &BuildOptions) -> Vec<SecretDefinition> {
    let groups = [
        (SecretGroup::Storage, storage_table(options.storage).iter().collect::<Vec<_>>()),
        (
            SecretGroup::Platform,
            platform_table(options.platform, options.storage),
        ),
        (
            SecretGroup::Notification,
            notification_table(options.notification),
        ),
    ];

    let mut seen = HashSet::new();
    let mut secrets = Vec::new();
    for (group, specs) in groups {
        for spec in specs {
            if seen.insert(spec.name) {
                secrets.push(SecretDefinition {
                    name: spec.name.to_string(),
                    description: spec.description.to_string(),
                    required: spec.required,
                    display_group: group,
                });
            }
        }
    }
    secrets
}

pub fn generate_secrets_summary(options: &BuildOptions) -> String {
    render_summary(&get_contextual_secrets(options), options.storage)
}

/// Like `generate_secrets_summary`, additionally listing caller-declared secrets
/// not implied by the options under the General group
pub fn generate_secrets_summary_with_declared(
    options: &BuildOptions,
    declared: &[String],
) -> String {
    let mut secrets = get_contextual_secrets(options);
    for name in declared {
        if !secrets.iter().any(|s| &s.name == name) {
            secrets.push(SecretDefinition {
                name: name.clone(),
                description: "Declared in workflow options".to_string(),
                required: true,
                display_group: SecretGroup::General,
            });
        }
    }
    render_summary(&secrets, options.storage)
}

fn render_summary(secrets: &[SecretDefinition], storage: StorageProvider) -> String {
    if !secrets.iter().any(|s| s.required) {
        return NO_SECRETS_MESSAGE.to_string();
    }

    let mut out = String::from("## Required Secrets\n");
    for group in [
        SecretGroup::Storage,
        SecretGroup::Platform,
        SecretGroup::Notification,
        SecretGroup::General,
    ] {
        let entries: Vec<_> = secrets.iter().filter(|s| s.display_group == group).collect();
        if entries.is_empty() {
            continue;
        }

        if group == SecretGroup::Storage {
            out.push_str(&format!("\n### {} ({})\n", group.title(), storage.as_str()));
        } else {
            out.push_str(&format!("\n### {}\n", group.title()));
        }
        for secret in entries {
            let marker = if secret.required { "required" } else { "automatic" };
            out.push_str(&format!(
                "- `{}` ({}): {}\n",
                secret.name, marker, secret.description
            ));
        }
    }
    out
}
