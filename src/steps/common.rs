//! Setup steps shared by every job: checkout, toolchains, caches, installs

use crate::config::options::{DEFAULT_JAVA_DISTRIBUTION, DEFAULT_JAVA_VERSION, DEFAULT_RUBY_VERSION};
use crate::config::{PackageManager, WorkflowOptions};
use crate::workflow::Step;

pub fn checkout() -> Step {
    Step::uses("Checkout repository", "actions/checkout@v4")
}

pub fn setup_node(options: &WorkflowOptions, node_version: &str) -> Step {
    let step = Step::uses("Setup Node.js", "actions/setup-node@v4")
        .with("node-version", node_version);
    if options.cache.enabled {
        step.with("cache", options.package_manager.as_str())
    } else {
        step
    }
}

pub fn node_modules_cache(package_manager: PackageManager) -> Step {
    Step::uses("Cache node_modules", "actions/cache@v4")
        .id("node-modules-cache")
        .with("path", "node_modules")
        .with(
            "key",
            format!(
                "${{{{ runner.os }}}}-node-modules-${{{{ hashFiles('**/{}') }}}}",
                package_manager.lockfile()
            ),
        )
}

pub fn install_dependencies(package_manager: PackageManager) -> Step {
    Step::run("Install dependencies", package_manager.install_command())
}

/// Checkout, Node toolchain, optional node_modules cache and install
pub fn setup_steps(options: &WorkflowOptions, node_version: &str) -> Vec<Step> {
    let mut steps = vec![checkout(), setup_node(options, node_version)];
    if options.cache.enabled {
        steps.push(node_modules_cache(options.package_manager));
    }
    steps.push(install_dependencies(options.package_manager));
    steps
}

pub fn setup_java() -> Step {
    Step::uses("Setup Java", "actions/setup-java@v4")
        .with("distribution", DEFAULT_JAVA_DISTRIBUTION)
        .with("java-version", DEFAULT_JAVA_VERSION)
}

pub fn gradle_cache() -> Step {
    Step::uses("Cache Gradle", "actions/cache@v4")
        .with("path", "~/.gradle/caches\n~/.gradle/wrapper")
        .with(
            "key",
            "${{ runner.os }}-gradle-${{ hashFiles('**/*.gradle*', '**/gradle-wrapper.properties') }}",
        )
}

pub fn setup_ruby() -> Step {
    Step::uses("Setup Ruby", "ruby/setup-ruby@v1")
        .with("ruby-version", DEFAULT_RUBY_VERSION)
        .with("bundler-cache", true)
}

pub fn pods_cache() -> Step {
    Step::uses("Cache CocoaPods", "actions/cache@v4")
        .with("path", "ios/Pods")
        .with("key", "${{ runner.os }}-pods-${{ hashFiles('ios/Podfile.lock') }}")
}

pub fn install_pods() -> Step {
    Step::run("Install CocoaPods", "cd ios\npod install")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheOptions;

    #[test]
    fn test_setup_steps_with_cache() {
        let options = WorkflowOptions::default();
        let steps = setup_steps(&options, "20");
        let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Checkout repository",
                "Setup Node.js",
                "Cache node_modules",
                "Install dependencies"
            ]
        );
        assert_eq!(steps[1].with["cache"], serde_yaml::Value::from("yarn"));
        assert_eq!(
            steps[2].with["key"],
            serde_yaml::Value::from(
                "${{ runner.os }}-node-modules-${{ hashFiles('**/yarn.lock') }}"
            )
        );
        assert_eq!(steps[3].run.as_deref(), Some("yarn install --frozen-lockfile"));
    }

    #[test]
    fn test_setup_steps_without_cache() {
        let options = WorkflowOptions {
            package_manager: PackageManager::Npm,
            cache: CacheOptions { enabled: false },
            ..Default::default()
        };
        let steps = setup_steps(&options, "18");
        assert_eq!(steps.len(), 3);
        assert!(!steps[1].with.contains_key("cache"));
        assert_eq!(steps[2].run.as_deref(), Some("npm ci"));
    }

    #[test]
    fn test_setup_java_defaults() {
        let step = setup_java();
        assert_eq!(step.with["java-version"], serde_yaml::Value::from("17"));
        assert_eq!(step.with["distribution"], serde_yaml::Value::from("temurin"));
    }
}
