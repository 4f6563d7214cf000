//! Request, result and diagnostic types of the build pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Android build variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    /// Signed, minified release build
    #[default]
    Release,
    /// Debuggable development build
    Debug,
}

impl BuildType {
    /// Lowercase name used in Gradle output paths and archive file names
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Debug => "debug",
        }
    }

    /// Capitalised name for headings (`Release`, `Debug`)
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::Debug => "Debug",
        }
    }

    /// Gradle task producing the APK for this variant
    #[must_use]
    pub fn gradle_task(&self) -> &'static str {
        match self {
            Self::Release => "assembleRelease",
            Self::Debug => "assembleDebug",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown build type
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown build type `{0}` (expected `release` or `debug`)")]
pub struct ParseBuildTypeError(pub String);

impl FromStr for BuildType {
    type Err = ParseBuildTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "release" => Ok(Self::Release),
            "debug" => Ok(Self::Debug),
            _ => Err(ParseBuildTypeError(s.to_string())),
        }
    }
}

/// One invocation of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildRequest {
    /// Variant to build
    pub build_type: BuildType,
    /// Skip the clean stage
    pub skip_clean: bool,
}

impl BuildRequest {
    /// Build `build_type`, cleaning first
    #[must_use]
    pub fn new(build_type: BuildType) -> Self {
        Self {
            build_type,
            skip_clean: false,
        }
    }

    /// Set whether the clean stage is skipped
    #[must_use]
    pub fn skip_clean(mut self, skip: bool) -> Self {
        self.skip_clean = skip;
        self
    }
}

/// States of the build pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nothing has run yet
    Init,
    /// Checking the project layout
    Precheck,
    /// Removing previous build output
    Clean,
    /// Running the Gradle assemble task
    Building,
    /// Gradle reported failure
    BuildFailed,
    /// Gradle reported success
    BuildSucceeded,
    /// Copying the APK into the archive folder
    Archiving,
    /// Finished
    Done,
}

impl Stage {
    /// Short human label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Precheck => "precheck",
            Self::Clean => "clean",
            Self::Building => "build",
            Self::BuildFailed => "build failed",
            Self::BuildSucceeded => "build succeeded",
            Self::Archiving => "archive",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final classification of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The APK was built
    Success,
    /// A fatal stage failed
    Failed,
}

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Progress information
    Info,
    /// Recoverable problem, the pipeline continued
    Warning,
    /// Fatal problem, the pipeline stopped
    Error,
}

/// One entry of the diagnostic trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stage that produced it
    pub stage: Stage,
    /// How serious it is
    pub severity: Severity,
    /// What happened
    pub message: String,
    /// Advisory remediation text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic without a hint
    pub fn new(stage: Stage, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            stage,
            severity,
            message: message.into(),
            hint: None,
        }
    }

    /// Attach remediation text
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level} [{}]: {}", self.stage, self.message)
    }
}

/// Summary of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    /// Variant that was requested
    pub build_type: BuildType,
    /// Success or failure
    pub outcome: Outcome,
    /// Gradle's APK, set only after a successful build when the file exists
    pub artifact_path: Option<PathBuf>,
    /// Archived copy, set only when `artifact_path` is set and the copy succeeded
    pub archived_path: Option<PathBuf>,
    /// Ordered trail of everything noteworthy
    pub diagnostics: Vec<Diagnostic>,
    /// Wall time spent per stage, in execution order
    #[serde(skip)]
    pub timings: Vec<(Stage, Duration)>,
}

impl BuildResult {
    pub(crate) fn started(build_type: BuildType) -> Self {
        Self {
            build_type,
            outcome: Outcome::Failed,
            artifact_path: None,
            archived_path: None,
            diagnostics: Vec::new(),
            timings: Vec::new(),
        }
    }

    /// True when the build succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// The diagnostic trail as plain strings
    pub fn messages(&self) -> impl Iterator<Item = String> + '_ {
        self.diagnostics.iter().map(ToString::to_string)
    }

    /// Diagnostics at `Warning` severity
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Total time across all stages
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }
}
