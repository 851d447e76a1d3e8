//! Android build steps

use handlebars::RenderError;

use super::common::{gradle_cache, setup_java};
use super::templates::render_gradle_script;
use crate::config::WorkflowOptions;
use crate::workflow::Step;

/// Java toolchain, optional Gradle cache and the Gradle build itself
pub fn android_build_steps(options: &WorkflowOptions) -> Result<Vec<Step>, RenderError> {
    let build = &options.build;
    let mut steps = vec![setup_java()];
    if options.cache.enabled {
        steps.push(gradle_cache());
    }

    let script = render_gradle_script(build.variant, build.android_output_type, build.flavor())?;
    steps.push(Step::run("Run Android Build", script));
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AndroidOutputType, BuildOptions, BuildVariant, CacheOptions};

    #[test]
    fn test_release_both_outputs() {
        let options = WorkflowOptions {
            build: BuildOptions {
                variant: BuildVariant::Release,
                android_output_type: AndroidOutputType::Both,
                ..Default::default()
            },
            ..Default::default()
        };

        let steps = android_build_steps(&options).unwrap();
        let build = steps.last().unwrap();
        assert_eq!(build.name, "Run Android Build");
        let script = build.run.as_deref().unwrap();
        assert!(script.contains("assembleRelease"));
        assert!(script.contains("bundleRelease"));
    }

    #[test]
    fn test_no_gradle_cache_when_disabled() {
        let options = WorkflowOptions {
            cache: CacheOptions { enabled: false },
            ..Default::default()
        };
        let steps = android_build_steps(&options).unwrap();
        let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Setup Java", "Run Android Build"]);
    }
}
