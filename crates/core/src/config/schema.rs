//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub android: AndroidConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Android build-and-package settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AndroidConfig {
    /// Directory holding the Gradle project, relative to the project root
    #[serde(default = "default_android_dir")]
    pub dir: String,

    /// Folder collecting timestamped APK copies, relative to the project root
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    /// Name used when neither app.json nor package.json provides one
    #[serde(default = "default_fallback_app_name")]
    pub fallback_app_name: String,

    /// Deadline for each Gradle invocation in seconds, 0 disables it
    #[serde(default = "default_build_timeout_secs")]
    pub build_timeout_secs: u64,

    /// Deadline for the forced removal of the previous build output
    #[serde(default = "default_force_delete_timeout_secs")]
    pub force_delete_timeout_secs: u64,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            dir: default_android_dir(),
            archive_dir: default_archive_dir(),
            fallback_app_name: default_fallback_app_name(),
            build_timeout_secs: default_build_timeout_secs(),
            force_delete_timeout_secs: default_force_delete_timeout_secs(),
        }
    }
}

impl AndroidConfig {
    /// Gradle deadline, `None` when disabled
    #[must_use]
    pub fn build_timeout(&self) -> Option<Duration> {
        secs_to_timeout(self.build_timeout_secs)
    }

    /// Force-delete deadline, `None` when disabled
    #[must_use]
    pub fn force_delete_timeout(&self) -> Option<Duration> {
        secs_to_timeout(self.force_delete_timeout_secs)
    }
}

fn secs_to_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn default_android_dir() -> String {
    "android".to_string()
}

fn default_archive_dir() -> String {
    "apk_builds".to_string()
}

/// Fallback application name
pub const DEFAULT_APP_NAME: &str = "ReactNativeApp";

fn default_fallback_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_build_timeout_secs() -> u64 {
    30 * 60
}

fn default_force_delete_timeout_secs() -> u64 {
    120
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
