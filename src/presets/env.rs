//! Workflow-level environment
//!
//! Merges the caller's `env` with a placeholder for every accumulated secret.
//! Placeholders are rewritten into platform syntax after serialization.

use indexmap::IndexMap;

use crate::config::WorkflowOptions;
use crate::output::secret_placeholder;
use crate::validation::required_secret_names;

/// Declared secrets followed by the secrets the build options require,
/// duplicates removed by name
pub fn accumulated_secrets(options: &WorkflowOptions, include_build: bool) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let implied = if include_build {
        required_secret_names(&options.build)
    } else {
        Vec::new()
    };

    for name in options.declared_secrets().iter().chain(implied.iter()) {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

/// User env first; each secret not already set by the user maps to its placeholder
pub fn build_env(
    user_env: &IndexMap<String, String>,
    secrets: &[String],
) -> IndexMap<String, String> {
    let mut env = user_env.clone();
    for name in secrets {
        if !env.contains_key(name) {
            env.insert(name.clone(), secret_placeholder(name));
        }
    }
    env
}
