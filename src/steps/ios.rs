//! iOS build steps

use handlebars::RenderError;

use super::common::{install_pods, pods_cache, setup_ruby};
use super::templates::render_xcode_script;
use crate::config::WorkflowOptions;
use crate::workflow::Step;

/// Ruby/CocoaPods setup followed by the Xcode build or archive
pub fn ios_build_steps(options: &WorkflowOptions) -> Result<Vec<Step>, RenderError> {
    let mut steps = vec![setup_ruby()];
    if options.cache.enabled {
        steps.push(pods_cache());
    }
    steps.push(install_pods());

    let script = render_xcode_script(options.build.variant)?;
    steps.push(Step::run("Run iOS Build", script));
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildOptions, BuildVariant};

    #[test]
    fn test_ios_debug_steps() {
        let steps = ios_build_steps(&WorkflowOptions::default()).unwrap();
        let names: Vec<_> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Setup Ruby", "Cache CocoaPods", "Install CocoaPods", "Run iOS Build"]
        );
        assert!(steps[3].run.as_deref().unwrap().contains("iphonesimulator"));
    }

    #[test]
    fn test_ios_release_archives() {
        let options = WorkflowOptions {
            build: BuildOptions {
                variant: BuildVariant::Release,
                ..Default::default()
            },
            ..Default::default()
        };
        let steps = ios_build_steps(&options).unwrap();
        assert!(steps.last().unwrap().run.as_deref().unwrap().contains("archive"));
    }
}
