//! Build preset options
//!
//! Everything the build preset needs to decide which jobs and steps to emit:
//! target platform, variant, where artifacts go and who gets told about them.

use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// Mobile platform(s) to build
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BuildPlatform {
    Ios,
    #[default]
    Android,
    Both,
}

impl BuildPlatform {
    pub const ALL: &'static [BuildPlatform] =
        &[BuildPlatform::Ios, BuildPlatform::Android, BuildPlatform::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildPlatform::Ios => "ios",
            BuildPlatform::Android => "android",
            BuildPlatform::Both => "both",
        }
    }

    pub fn includes_android(&self) -> bool {
        matches!(self, BuildPlatform::Android | BuildPlatform::Both)
    }

    pub fn includes_ios(&self) -> bool {
        matches!(self, BuildPlatform::Ios | BuildPlatform::Both)
    }
}

/// Build configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    #[default]
    Debug,
    Release,
}

impl BuildVariant {
    pub const ALL: &'static [BuildVariant] = &[BuildVariant::Debug, BuildVariant::Release];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }

    /// Capitalized form used by Gradle task names and Xcode configurations
    pub fn title(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "Debug",
            BuildVariant::Release => "Release",
        }
    }
}

/// Where build artifacts are uploaded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// GitHub Actions artifacts
    #[default]
    Github,
    /// Google Drive folder
    Drive,
    /// Firebase App Distribution
    Firebase,
    /// AWS S3 bucket
    S3,
    /// Bitrise artifact deploy (Bitrise targets only)
    Bitrise,
}

impl StorageProvider {
    pub const ALL: &'static [StorageProvider] = &[
        StorageProvider::Github,
        StorageProvider::Drive,
        StorageProvider::Firebase,
        StorageProvider::S3,
        StorageProvider::Bitrise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageProvider::Github => "github",
            StorageProvider::Drive => "drive",
            StorageProvider::Firebase => "firebase",
            StorageProvider::S3 => "s3",
            StorageProvider::Bitrise => "bitrise",
        }
    }
}

/// How build results are announced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationChannel {
    Slack,
    PrComment,
    Both,
    #[default]
    None,
}

impl NotificationChannel {
    pub const ALL: &'static [NotificationChannel] = &[
        NotificationChannel::Slack,
        NotificationChannel::PrComment,
        NotificationChannel::Both,
        NotificationChannel::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Slack => "slack",
            NotificationChannel::PrComment => "pr-comment",
            NotificationChannel::Both => "both",
            NotificationChannel::None => "none",
        }
    }

    pub fn includes_slack(&self) -> bool {
        matches!(self, NotificationChannel::Slack | NotificationChannel::Both)
    }

    pub fn includes_pr_comment(&self) -> bool {
        matches!(self, NotificationChannel::PrComment | NotificationChannel::Both)
    }
}

/// Android package format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AndroidOutputType {
    #[default]
    Apk,
    Aab,
    Both,
}

impl AndroidOutputType {
    pub const ALL: &'static [AndroidOutputType] =
        &[AndroidOutputType::Apk, AndroidOutputType::Aab, AndroidOutputType::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            AndroidOutputType::Apk => "apk",
            AndroidOutputType::Aab => "aab",
            AndroidOutputType::Both => "both",
        }
    }

    pub fn includes_apk(&self) -> bool {
        matches!(self, AndroidOutputType::Apk | AndroidOutputType::Both)
    }

    pub fn includes_aab(&self) -> bool {
        matches!(self, AndroidOutputType::Aab | AndroidOutputType::Both)
    }
}

// ============================================================================
// BuildOptions
// ============================================================================

/// Options for the `build` preset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    #[serde(default)]
    pub platform: BuildPlatform,

    #[serde(default)]
    pub variant: BuildVariant,

    #[serde(default)]
    pub storage: StorageProvider,

    #[serde(default)]
    pub notification: NotificationChannel,

    /// Run the shared static analysis job before building
    #[serde(default = "default_true")]
    pub include_health_check: bool,

    /// Alias of `include_health_check`; either one set to false disables the job
    #[serde(default = "default_true")]
    pub include_static_analysis: bool,

    #[serde(default)]
    pub android_output_type: AndroidOutputType,

    /// Gradle product flavor (e.g. `staging`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            platform: BuildPlatform::default(),
            variant: BuildVariant::default(),
            storage: StorageProvider::default(),
            notification: NotificationChannel::default(),
            include_health_check: true,
            include_static_analysis: true,
            android_output_type: AndroidOutputType::default(),
            flavor: None,
        }
    }
}

impl BuildOptions {
    /// Whether build jobs are gated behind the shared static analysis job
    pub fn runs_static_analysis(&self) -> bool {
        self.include_health_check && self.include_static_analysis
    }

    /// Flavor with surrounding whitespace removed; empty flavors count as absent
    pub fn flavor(&self) -> Option<&str> {
        self.flavor
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}
