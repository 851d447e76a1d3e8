use rn_ci_gen::secrets::generate_secrets_summary_with_declared;
use rn_ci_gen::validation::{required_secret_names, validate_build_secrets};
use rn_ci_gen::{
    generate_secrets_summary, get_contextual_secrets, BuildOptions, BuildPlatform,
    NotificationChannel, SecretGroup, StorageProvider, NO_SECRETS_MESSAGE,
};

fn all_combinations() -> Vec<BuildOptions> {
    let mut combos = Vec::new();
    for platform in BuildPlatform::ALL {
        for storage in StorageProvider::ALL {
            for notification in NotificationChannel::ALL {
                combos.push(BuildOptions {
                    platform: *platform,
                    storage: *storage,
                    notification: *notification,
                    ..Default::default()
                });
            }
        }
    }
    combos
}

#[test]
fn test_summary_completeness_for_every_combination() {
    for options in all_combinations() {
        let summary = generate_secrets_summary(&options);
        let required = required_secret_names(&options);

        if required.is_empty() {
            assert_eq!(summary, NO_SECRETS_MESSAGE, "{:?}", options);
            continue;
        }

        assert!(summary.starts_with("## Required Secrets"), "{:?}", options);
        for name in &required {
            assert!(summary.contains(name.as_str()), "{} missing for {:?}", name, options);
        }
        if !options.platform.includes_android() {
            assert!(!summary.contains("FIREBASE_APP_ID_ANDROID"), "{:?}", options);
        }
        if !options.platform.includes_ios() {
            assert!(!summary.contains("FIREBASE_APP_ID_IOS"), "{:?}", options);
        }
    }
}

#[test]
fn test_summary_is_deterministic() {
    for options in all_combinations() {
        assert_eq!(
            generate_secrets_summary(&options),
            generate_secrets_summary(&options)
        );
    }
}

#[test]
fn test_groups_in_fixed_order() {
    let options = BuildOptions {
        platform: BuildPlatform::Both,
        storage: StorageProvider::Firebase,
        notification: NotificationChannel::Both,
        ..Default::default()
    };

    let groups: Vec<SecretGroup> = get_contextual_secrets(&options)
        .iter()
        .map(|s| s.display_group)
        .collect();
    let mut sorted = groups.clone();
    sorted.sort();
    assert_eq!(groups, sorted);

    let summary = generate_secrets_summary(&options);
    let storage = summary.find("### Storage (firebase)").unwrap();
    let platform = summary.find("### Platform").unwrap();
    let notifications = summary.find("### Notifications").unwrap();
    assert!(storage < platform && platform < notifications);
}

#[test]
fn test_secrets_are_unique_by_name() {
    for options in all_combinations() {
        let secrets = get_contextual_secrets(&options);
        let mut names: Vec<_> = secrets.iter().map(|s| s.name.as_str()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total, "{:?}", options);
    }
}

#[test]
fn test_declared_secrets_listed_under_general() {
    let options = BuildOptions {
        notification: NotificationChannel::Slack,
        ..Default::default()
    };
    let declared = vec!["SLACK_WEBHOOK".to_string(), "SENTRY_AUTH_TOKEN".to_string()];

    let summary = generate_secrets_summary_with_declared(&options, &declared);
    let general = summary.find("### General").unwrap();
    let sentry = summary.find("SENTRY_AUTH_TOKEN").unwrap();
    assert!(sentry > general);
    assert_eq!(summary.matches("SLACK_WEBHOOK").count(), 1);
}

#[test]
fn test_missing_secrets_aggregated() {
    let options = BuildOptions {
        platform: BuildPlatform::Both,
        storage: StorageProvider::Firebase,
        notification: NotificationChannel::Slack,
        ..Default::default()
    };

    let err = validate_build_secrets(&options, &["FIREBASE_APP_ID_IOS".to_string()]).unwrap_err();
    assert_eq!(
        err.missing,
        vec!["FIREBASE_SERVICE_ACCOUNT", "FIREBASE_APP_ID_ANDROID", "SLACK_WEBHOOK"]
    );
    assert_eq!(
        err.to_string(),
        "Missing required secrets: FIREBASE_SERVICE_ACCOUNT, FIREBASE_APP_ID_ANDROID, SLACK_WEBHOOK"
    );
}

#[test]
fn test_github_token_never_required() {
    let options = BuildOptions {
        notification: NotificationChannel::PrComment,
        ..Default::default()
    };
    assert!(validate_build_secrets(&options, &[]).is_ok());
    assert_eq!(generate_secrets_summary(&options), NO_SECRETS_MESSAGE);
}
