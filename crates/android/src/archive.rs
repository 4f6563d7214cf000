//! Archiving of built APKs
//!
//! Copies Gradle's APK from `<android>/app/build/outputs/apk/<type>/app-<type>.apk`
//! into `<root>/<archive_dir>/<appName>_<type>_<DD_MM_YYYY_HH_MM>.apk`.
//! Archiving never fails the build: problems come back as
//! [`ArchiveOutcome::NoArtifact`] or [`ArchiveOutcome::Failed`].

use crate::gradle;
use crate::locator;
use crate::timestamp::format_timestamp;
use crate::types::BuildType;
use adk_core::config::AndroidConfig;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Inputs that determine an archive file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDescriptor {
    /// Project display name
    pub app_name: String,
    /// Build variant
    pub build_type: BuildType,
    /// `DD_MM_YYYY_HH_MM`
    pub timestamp: String,
}

impl ArchiveDescriptor {
    /// `<appName>_<buildType>_<timestamp>.apk`, with path-hostile characters replaced
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.apk",
            sanitize(&self.app_name),
            self.build_type,
            self.timestamp
        )
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Result of an archive attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Copied to this path
    Archived(PathBuf),
    /// Gradle's APK was not where it should be
    NoArtifact,
    /// The copy failed
    Failed(String),
}

impl ArchiveOutcome {
    /// Destination path when archiving succeeded
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Archived(path) => Some(path),
            _ => None,
        }
    }
}

/// Copies APKs into the archive folder of one project
#[derive(Debug, Clone)]
pub struct Archiver {
    project_root: PathBuf,
    android_dir: String,
    archive_dir: String,
    fallback_app_name: String,
}

impl Archiver {
    /// Archiver with default folder names
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_config(project_root, &AndroidConfig::default())
    }

    /// Archiver using folder names and fallback name from `config`
    pub fn with_config(project_root: impl Into<PathBuf>, config: &AndroidConfig) -> Self {
        Self {
            project_root: project_root.into(),
            android_dir: config.dir.clone(),
            archive_dir: config.archive_dir.clone(),
            fallback_app_name: config.fallback_app_name.clone(),
        }
    }

    /// Folder receiving the copies
    #[must_use]
    pub fn archive_dir(&self) -> PathBuf {
        self.project_root.join(&self.archive_dir)
    }

    /// Where Gradle writes the APK for `build_type`
    #[must_use]
    pub fn source_path(&self, build_type: BuildType) -> PathBuf {
        gradle::apk_output_path(&self.project_root.join(&self.android_dir), build_type)
    }

    /// Name parts for an archive made at `now`
    #[must_use]
    pub fn descriptor(&self, build_type: BuildType, now: &NaiveDateTime) -> ArchiveDescriptor {
        ArchiveDescriptor {
            app_name: locator::app_name(&self.project_root, &self.fallback_app_name),
            build_type,
            timestamp: format_timestamp(now),
        }
    }

    /// Copy the APK for `build_type` into the archive folder.
    ///
    /// An existing file with the same name (same app, type and minute) is overwritten.
    pub fn archive(&self, build_type: BuildType, now: &NaiveDateTime) -> ArchiveOutcome {
        let source = self.source_path(build_type);
        if !source.is_file() {
            warn!(source = %source.display(), "No APK to archive");
            return ArchiveOutcome::NoArtifact;
        }

        let dir = self.archive_dir();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(dir = %dir.display(), error = %e, "Could not create archive folder");
            return ArchiveOutcome::Failed(format!("Could not create {}: {e}", dir.display()));
        }

        let destination = dir.join(self.descriptor(build_type, now).file_name());
        match std::fs::copy(&source, &destination) {
            Ok(bytes) => {
                info!(destination = %destination.display(), bytes, "APK archived");
                ArchiveOutcome::Archived(destination)
            }
            Err(e) => {
                warn!(destination = %destination.display(), error = %e, "Copying APK failed");
                ArchiveOutcome::Failed(format!("Could not copy APK to {}: {e}", destination.display()))
            }
        }
    }
}
