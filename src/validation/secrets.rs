//! Declared-secret completeness check
//!
//! Only secret names are compared. Values never pass through the generator.

use crate::config::BuildOptions;
use crate::error::MissingSecretsError;
use crate::secrets::get_contextual_secrets;

/// Names of the secrets the build options cannot run without
pub fn required_secret_names(options: &BuildOptions) -> Vec<String> {
    get_contextual_secrets(options)
        .into_iter()
        .filter(|s| s.required)
        .map(|s| s.name)
        .collect()
}

/// Fail with every missing name when `declared` does not cover the required set
pub fn validate_build_secrets(
    options: &BuildOptions,
    declared: &[String],
) -> Result<(), MissingSecretsError> {
    let missing: Vec<String> = required_secret_names(options)
        .into_iter()
        .filter(|name| !declared.iter().any(|d| d == name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingSecretsError { missing })
    }
}
