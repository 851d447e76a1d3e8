//! YAML emission and secret placeholder rewriting
//!
//! Assemblers reference secrets through `__SECRET_<NAME>__` placeholders when
//! the value comes from the generic env path. After dumping, a textual pass
//! rewrites each placeholder into the target platform's secret syntax.
//! serde_yaml never emits anchors or aliases, so repeated sub-trees are always
//! written out in full.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::config::CiPlatform;

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__SECRET_([A-Za-z0-9]+(?:_[A-Za-z0-9]+)*)__").unwrap());

/// Placeholder for a secret, rewritten by `inject_secrets`
pub fn secret_placeholder(name: &str) -> String {
    format!("__SECRET_{}__", name)
}

/// Secret reference in the target platform's syntax
pub fn secret_reference(name: &str, platform: CiPlatform) -> String {
    match platform {
        CiPlatform::Github => format!("${{{{ secrets.{} }}}}", name),
        CiPlatform::Bitrise => format!("${}", name),
    }
}

pub fn dump<T: Serialize>(document: &T) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(document)
}

/// Rewrite every `__SECRET_<NAME>__` placeholder in `yaml`
pub fn inject_secrets(yaml: &str, platform: CiPlatform) -> String {
    PLACEHOLDER_REGEX
        .replace_all(yaml, |caps: &Captures| secret_reference(&caps[1], platform))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_inject_github_secrets() {
        let yaml = "env:\n  AWS_ACCESS_KEY_ID: __SECRET_AWS_ACCESS_KEY_ID__\n  S3_BUCKET: __SECRET_S3_BUCKET__\n";
        let injected = inject_secrets(yaml, CiPlatform::Github);
        assert_eq!(
            injected,
            "env:\n  AWS_ACCESS_KEY_ID: ${{ secrets.AWS_ACCESS_KEY_ID }}\n  S3_BUCKET: ${{ secrets.S3_BUCKET }}\n"
        );
    }

    #[test]
    fn test_inject_bitrise_secrets() {
        let injected =
            inject_secrets("- SLACK_WEBHOOK: __SECRET_SLACK_WEBHOOK__", CiPlatform::Bitrise);
        assert_eq!(injected, "- SLACK_WEBHOOK: $SLACK_WEBHOOK");
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let yaml = "name: Build\nrun: echo __SECRET_\n";
        assert_eq!(inject_secrets(yaml, CiPlatform::Github), yaml);
    }

    #[test]
    fn test_dump_writes_duplicates_in_full() {
        let mut shared = IndexMap::new();
        shared.insert("node-version", "20");
        let doc = vec![shared.clone(), shared];

        let yaml = dump(&doc).unwrap();
        assert_eq!(yaml.matches("node-version: '20'").count(), 2);
        assert!(!yaml.contains('&'));
        assert!(!yaml.contains('*'));
    }

    #[test]
    fn test_injected_output_is_valid_yaml() {
        let mut env = IndexMap::new();
        env.insert("FIREBASE_SERVICE_ACCOUNT", secret_placeholder("FIREBASE_SERVICE_ACCOUNT"));
        let yaml = inject_secrets(&dump(&env).unwrap(), CiPlatform::Github);

        let parsed: IndexMap<String, String> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            parsed["FIREBASE_SERVICE_ACCOUNT"],
            "${{ secrets.FIREBASE_SERVICE_ACCOUNT }}"
        );
    }
}
