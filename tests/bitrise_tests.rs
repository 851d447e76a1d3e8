mod common;

use common::*;
use rn_ci_gen::validation::check_structure;
use rn_ci_gen::{CiPlatform, Generator};
use serde_json::json;

fn bitrise_build(build: serde_json::Value) -> serde_json::Value {
    build_config(build, json!({ "platform": "bitrise" }))
}

fn workflow_keys(yaml: &serde_yaml::Value) -> Vec<String> {
    yaml["workflows"]
        .as_mapping()
        .expect("workflows mapping")
        .keys()
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect()
}

fn step_ids(yaml: &serde_yaml::Value, workflow: &str) -> Vec<String> {
    yaml["workflows"][workflow]["steps"]
        .as_sequence()
        .expect("steps sequence")
        .iter()
        .filter_map(|step| step.as_mapping()?.keys().next()?.as_str().map(str::to_string))
        .collect()
}

#[test]
fn test_bitrise_document_shape() {
    let result = generate(bitrise_build(json!({ "platform": "both" })));
    assert_eq!(result.platform, CiPlatform::Bitrise);
    assert_eq!(result.default_path(), std::path::PathBuf::from("bitrise.yml"));

    let yaml = parse(&result.yaml);
    assert_eq!(yaml["format_version"].as_str(), Some("13"));
    assert_eq!(yaml["project_type"].as_str(), Some("react-native"));
    assert!(yaml["jobs"].is_null());
    assert_eq!(
        workflow_keys(&yaml),
        vec!["_setup", "static-analysis", "build-android", "build-ios", "primary"]
    );

    let chain: Vec<_> = yaml["workflows"]["primary"]["before_run"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(chain, vec!["_setup", "static-analysis", "build-android", "build-ios"]);

    assert!(check_structure(&result.yaml, CiPlatform::Bitrise).is_ok());
}

#[test]
fn test_bitrise_trigger_map_targets_primary() {
    let result = generate(bitrise_build(json!({})));
    let yaml = parse(&result.yaml);

    let items = yaml["trigger_map"].as_sequence().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["push_branch"].as_str(), Some("main"));
    assert_eq!(items[1]["pull_request_target_branch"].as_str(), Some("main"));
    assert!(items.iter().all(|i| i["workflow"].as_str() == Some("primary")));
}

#[test]
fn test_bitrise_secrets_use_env_references() {
    let result = generate(bitrise_build(json!({
        "storage": "firebase",
        "notification": "slack",
        "platform": "android"
    })));

    assert!(result.yaml.contains("$SLACK_WEBHOOK"));
    assert!(result.yaml.contains("$FIREBASE_APP_ID_ANDROID"));
    assert!(!result.yaml.contains("${{ secrets."));
    assert!(!result.yaml.contains("__SECRET_"));
    assert!(result.secrets_summary.contains("FIREBASE_SERVICE_ACCOUNT"));
}

#[test]
fn test_bitrise_build_steps() {
    let yaml = parse(&generate(bitrise_build(json!({
        "platform": "both",
        "storage": "bitrise",
        "notification": "both"
    })))
    .yaml);

    let setup = step_ids(&yaml, "_setup");
    assert_eq!(setup[0], "activate-ssh-key@4");
    assert_eq!(setup[1], "git-clone@8");
    assert!(setup.contains(&"nvm@1".to_string()));

    assert!(step_ids(&yaml, "build-android").contains(&"set-java-version@1".to_string()));
    assert!(step_ids(&yaml, "build-android").contains(&"deploy-to-bitrise-io@2".to_string()));
    assert!(step_ids(&yaml, "build-ios").contains(&"cocoapods-install@2".to_string()));

    let primary = step_ids(&yaml, "primary");
    assert_eq!(
        primary,
        vec!["slack@4", "comment-on-github-pull-request@0", "cache-push@2"]
    );
}

fn script_contents(yaml: &serde_yaml::Value, workflow: &str) -> String {
    yaml["workflows"][workflow]["steps"]
        .as_sequence()
        .expect("steps sequence")
        .iter()
        .filter_map(|step| step["script@1"]["inputs"].as_sequence())
        .flatten()
        .filter_map(|input| input["content"].as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_bitrise_firebase_distributes_each_platform_separately() {
    let result = generate(bitrise_build(json!({
        "platform": "both",
        "storage": "firebase",
        "variant": "release"
    })));
    let yaml = parse(&result.yaml);

    let android = script_contents(&yaml, "build-android");
    assert!(android.contains("\"$BITRISE_DEPLOY_DIR/android/\""));
    assert!(android.contains("for f in \"$BITRISE_DEPLOY_DIR/android\"/*; do"));
    assert!(android.contains("--app \"$FIREBASE_APP_ID_ANDROID\""));
    assert!(!android.contains("$BITRISE_DEPLOY_DIR/ios"));

    let ios = script_contents(&yaml, "build-ios");
    assert!(ios.contains("\"$BITRISE_DEPLOY_DIR/ios/\""));
    assert!(ios.contains("for f in \"$BITRISE_DEPLOY_DIR/ios\"/*; do"));
    assert!(ios.contains("--app \"$FIREBASE_APP_ID_IOS\""));
    assert!(!ios.contains("$BITRISE_DEPLOY_DIR/android"));
    assert!(!ios.contains("\"$BITRISE_DEPLOY_DIR\"/*"));
}

#[test]
fn test_bitrise_without_static_analysis() {
    let yaml = parse(&generate(bitrise_build(json!({ "includeStaticAnalysis": false }))).yaml);
    assert_eq!(workflow_keys(&yaml), vec!["_setup", "build-android", "primary"]);
}

#[test]
fn test_bitrise_static_analysis_preset() {
    let config = json!({
        "kind": "static-analysis",
        "options": { "platform": "bitrise", "staticAnalysis": { "eslint": false } }
    });
    let result = Generator::default().generate_value(config).unwrap();
    let yaml = parse(&result.yaml);

    assert_eq!(workflow_keys(&yaml), vec!["_setup", "static-analysis", "primary"]);
    assert!(!result.yaml.contains("eslint"));
    assert!(check_structure(&result.yaml, CiPlatform::Bitrise).is_ok());
}

#[test]
fn test_bitrise_structure_rejects_github_document() {
    let github = generate(build_config(json!({}), json!({})));
    assert!(check_structure(&github.yaml, CiPlatform::Bitrise).is_err());
}
