//! Gradle build system integration
//!
//! Wraps the project's Gradle wrapper (`gradlew` / `gradlew.bat`) and the
//! platform's forced directory removal.

use crate::types::BuildType;
use adk_core::error::Result;
use adk_core::process::{CommandResult, CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the Gradle wrapper on this platform
#[must_use]
pub fn wrapper_name() -> &'static str {
    if cfg!(windows) { "gradlew.bat" } else { "gradlew" }
}

/// Where Gradle writes the APK for `build_type`
#[must_use]
pub fn apk_output_path(android_dir: &Path, build_type: BuildType) -> PathBuf {
    android_dir
        .join("app")
        .join("build")
        .join("outputs")
        .join("apk")
        .join(build_type.as_str())
        .join(format!("app-{}.apk", build_type.as_str()))
}

/// Build output directory of the `app` module
#[must_use]
pub fn app_build_dir(android_dir: &Path) -> PathBuf {
    android_dir.join("app").join("build")
}

/// Command that forcibly removes `dir` and everything under it
#[must_use]
pub fn force_delete_spec(dir: &Path) -> CommandSpec {
    let target = dir.display().to_string();
    if cfg!(windows) {
        let escaped = target.replace('\'', "''");
        CommandSpec::new("powershell").args([
            "-NoProfile".to_string(),
            "-Command".to_string(),
            format!("if (Test-Path '{escaped}') {{ Remove-Item -Path '{escaped}' -Recurse -Force }}"),
        ])
    } else {
        CommandSpec::new("rm").args(["-rf".to_string(), target])
    }
}

/// Remediation text for a clean that failed on locked files
#[must_use]
pub fn file_lock_hint() -> &'static str {
    if cfg!(windows) {
        "1. Close VS Code/Android Studio\n\
         2. Close Windows Explorer in the project folder\n\
         3. Run: taskkill /f /im java.exe\n\
         4. Try the build again"
    } else {
        "1. Close Android Studio and other editors watching the project\n\
         2. Stop the Gradle daemon: cd android && ./gradlew --stop\n\
         3. Try the build again"
    }
}

/// The Gradle project of a React Native app
#[derive(Debug, Clone)]
pub struct Gradle {
    android_dir: PathBuf,
    timeout: Option<Duration>,
}

impl Gradle {
    /// Gradle project in `android_dir`, without a deadline
    pub fn new(android_dir: impl Into<PathBuf>) -> Self {
        let android_dir = android_dir.into();
        let android_dir = std::path::absolute(&android_dir).unwrap_or(android_dir);
        Self {
            android_dir,
            timeout: None,
        }
    }

    /// Kill each Gradle invocation after `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory of the Gradle project
    #[must_use]
    pub fn android_dir(&self) -> &Path {
        &self.android_dir
    }

    /// Path of the platform's wrapper script
    #[must_use]
    pub fn wrapper_path(&self) -> PathBuf {
        self.android_dir.join(wrapper_name())
    }

    /// True when the android directory exists
    #[must_use]
    pub fn has_project_dir(&self) -> bool {
        self.android_dir.is_dir()
    }

    /// True when the wrapper script exists
    #[must_use]
    pub fn has_wrapper(&self) -> bool {
        self.wrapper_path().is_file()
    }

    /// Command running `task` through the wrapper inside the android directory
    #[must_use]
    pub fn task_spec(&self, task: &str) -> CommandSpec {
        CommandSpec::new(self.wrapper_path().display().to_string())
            .arg(task)
            .current_dir(&self.android_dir)
            .timeout(self.timeout)
    }

    /// Run a Gradle task
    pub fn run_task<R: CommandRunner + ?Sized>(&self, runner: &R, task: &str) -> Result<CommandResult> {
        runner.run(&self.task_spec(task))
    }

    /// Clean build artifacts
    pub fn clean<R: CommandRunner + ?Sized>(&self, runner: &R) -> Result<CommandResult> {
        self.run_task(runner, "clean")
    }

    /// Build the APK for `build_type`
    pub fn assemble<R: CommandRunner + ?Sized>(&self, runner: &R, build_type: BuildType) -> Result<CommandResult> {
        self.run_task(runner, build_type.gradle_task())
    }

    /// Expected APK location for `build_type`
    #[must_use]
    pub fn apk_path(&self, build_type: BuildType) -> PathBuf {
        apk_output_path(&self.android_dir, build_type)
    }
}
