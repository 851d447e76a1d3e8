//! Step builders
//!
//! Pure functions from options to ordered `Step` lists. No builder performs
//! I/O or keeps state; identical input always yields identical steps.
//!
//! - `common` - checkout, toolchains, caches, dependency install
//! - `android` / `ios` - platform build steps
//! - `storage` - artifact uploads per storage provider
//! - `notification` - Slack, source detection, PR comments
//! - `analysis` - typescript, eslint, prettier, unit tests
//! - `templates` - Gradle and Xcode script templates

pub mod analysis;
pub mod android;
pub mod common;
pub mod ios;
pub mod notification;
pub mod storage;
pub mod templates;

pub use analysis::{analysis_checks, analysis_steps, AnalysisCheck};
pub use android::android_build_steps;
pub use common::setup_steps;
pub use ios::ios_build_steps;
pub use notification::{notification_steps, NotificationContext};
pub use storage::{android_storage_steps, ios_storage_steps};
