//! Output stage
//!
//! - `serializer` - YAML dump and secret placeholder injection
//! - `lint` - structure check plus optional external validators

pub mod lint;
pub mod serializer;

pub use lint::{validate_async, validate_sync, BitriseCli, ExternalValidator, LintOptions, YamlLint};
pub use serializer::{dump, inject_secrets, secret_placeholder, secret_reference};
