//! Shell script templates for build steps
//!
//! Scripts are rendered with Handlebars in strict mode so a missing variable
//! fails rendering instead of leaking an empty or unresolved value. The inputs
//! are a small closed set: variant, Android output type and an optional flavor.

use std::sync::LazyLock;

use handlebars::{Handlebars, RenderError};
use serde::Serialize;

use crate::config::{AndroidOutputType, BuildVariant};

static RENDERER: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    let mut hb = Handlebars::new();
    hb.register_escape_fn(handlebars::no_escape);
    hb.set_strict_mode(true);
    hb
});

const GRADLE_TEMPLATE: &str = r#"cd android
chmod +x gradlew
{{#each tasks}}
echo "Running ./gradlew {{this}}"
./gradlew {{this}} --no-daemon
if [ $? -ne 0 ]; then
  echo "Gradle task {{this}} failed"
  exit 1
fi
{{/each}}"#;

const XCODE_TEMPLATE: &str = r#"cd ios
WORKSPACE=$(ls -d *.xcworkspace | head -n 1)
SCHEME=$(basename "$WORKSPACE" .xcworkspace)
{{#if archive}}
xcodebuild -workspace "$WORKSPACE" -scheme "$SCHEME" -configuration {{configuration}} -sdk iphoneos -archivePath "build/$SCHEME.xcarchive" archive
xcodebuild -exportArchive -archivePath "build/$SCHEME.xcarchive" -exportOptionsPlist ExportOptions.plist -exportPath build
{{else}}
xcodebuild -workspace "$WORKSPACE" -scheme "$SCHEME" -configuration {{configuration}} -sdk iphonesimulator -derivedDataPath build build CODE_SIGNING_ALLOWED=NO
cd build/Build/Products/{{configuration}}-iphonesimulator
for app in *.app; do
  ditto -c -k --keepParent "$app" "${app%.app}.zip"
done
{{/if}}"#;

#[derive(Serialize)]
struct GradleData<'a> {
    tasks: &'a [String],
}

#[derive(Serialize)]
struct XcodeData {
    configuration: &'static str,
    archive: bool,
}

/// Gradle tasks for a variant/output combination, each run with its own failure check
pub fn gradle_tasks(
    variant: BuildVariant,
    output: AndroidOutputType,
    flavor: Option<&str>,
) -> Vec<String> {
    let flavor = flavor.map(capitalize).unwrap_or_default();
    let mut tasks = Vec::new();
    if output.includes_apk() {
        tasks.push(format!("assemble{}{}", flavor, variant.title()));
    }
    if output.includes_aab() {
        tasks.push(format!("bundle{}{}", flavor, variant.title()));
    }
    tasks
}

/// Artifact globs produced by `gradle_tasks`, relative to the repository root
pub fn android_artifact_paths(
    variant: BuildVariant,
    output: AndroidOutputType,
    flavor: Option<&str>,
) -> Vec<String> {
    let mut paths = Vec::new();
    if output.includes_apk() {
        let dir = match flavor {
            Some(f) => format!("{}/{}", f, variant.as_str()),
            None => variant.as_str().to_string(),
        };
        paths.push(format!("android/app/build/outputs/apk/{}/*.apk", dir));
    }
    if output.includes_aab() {
        let dir = match flavor {
            Some(f) => format!("{}{}", f, variant.title()),
            None => variant.as_str().to_string(),
        };
        paths.push(format!("android/app/build/outputs/bundle/{}/*.aab", dir));
    }
    paths
}

/// Single-file iOS artifact; simulator `.app` bundles are zipped by the build script
pub fn ios_artifact_path(variant: BuildVariant) -> String {
    match variant {
        BuildVariant::Debug => "ios/build/Build/Products/Debug-iphonesimulator/*.zip".to_string(),
        BuildVariant::Release => "ios/build/*.ipa".to_string(),
    }
}

pub fn render_gradle_script(
    variant: BuildVariant,
    output: AndroidOutputType,
    flavor: Option<&str>,
) -> Result<String, RenderError> {
    let tasks = gradle_tasks(variant, output, flavor);
    RENDERER.render_template(GRADLE_TEMPLATE, &GradleData { tasks: &tasks })
}

pub fn render_xcode_script(variant: BuildVariant) -> Result<String, RenderError> {
    let data = XcodeData {
        configuration: variant.title(),
        archive: variant == BuildVariant::Release,
    };
    RENDERER.render_template(XCODE_TEMPLATE, &data)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradle_task_table() {
        use AndroidOutputType::*;
        use BuildVariant::*;

        let cases = [
            (Debug, Apk, vec!["assembleDebug"]),
            (Debug, Aab, vec!["bundleDebug"]),
            (Debug, Both, vec!["assembleDebug", "bundleDebug"]),
            (Release, Apk, vec!["assembleRelease"]),
            (Release, Aab, vec!["bundleRelease"]),
            (Release, Both, vec!["assembleRelease", "bundleRelease"]),
        ];
        for (variant, output, expected) in cases {
            assert_eq!(gradle_tasks(variant, output, None), expected);
        }
    }

    #[test]
    fn test_flavor_prefixes_tasks_and_paths() {
        let tasks = gradle_tasks(BuildVariant::Release, AndroidOutputType::Both, Some("staging"));
        assert_eq!(tasks, vec!["assembleStagingRelease", "bundleStagingRelease"]);

        let paths =
            android_artifact_paths(BuildVariant::Release, AndroidOutputType::Both, Some("staging"));
        assert_eq!(
            paths,
            vec![
                "android/app/build/outputs/apk/staging/release/*.apk",
                "android/app/build/outputs/bundle/stagingRelease/*.aab"
            ]
        );
    }

    #[test]
    fn test_gradle_script_checks_each_task() {
        let script =
            render_gradle_script(BuildVariant::Release, AndroidOutputType::Both, None).unwrap();
        assert!(script.contains("./gradlew assembleRelease --no-daemon"));
        assert!(script.contains("./gradlew bundleRelease --no-daemon"));
        assert_eq!(script.matches("if [ $? -ne 0 ]").count(), 2);
        assert!(script.starts_with("cd android"));
    }

    #[test]
    fn test_ios_artifacts_are_files() {
        assert!(ios_artifact_path(BuildVariant::Debug).ends_with("Debug-iphonesimulator/*.zip"));
        assert!(ios_artifact_path(BuildVariant::Release).ends_with("*.ipa"));
    }

    #[test]
    fn test_xcode_script_variants() {
        let debug = render_xcode_script(BuildVariant::Debug).unwrap();
        assert!(debug.contains("-sdk iphonesimulator"));
        assert!(debug.contains("-configuration Debug"));
        assert!(!debug.contains("exportArchive"));
        assert!(debug.contains("cd build/Build/Products/Debug-iphonesimulator"));
        assert!(debug.contains("ditto -c -k --keepParent \"$app\" \"${app%.app}.zip\""));

        let release = render_xcode_script(BuildVariant::Release).unwrap();
        assert!(release.contains("-configuration Release"));
        assert!(release.contains("-exportArchive"));
        assert!(release.contains("\"$WORKSPACE\""));
    }
}
