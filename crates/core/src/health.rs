//! Health check system for verifying tool dependencies and environment
//!
//! Backs `adk doctor`. Checks cover:
//! - Required tools (node, npm) and optional ones (git, java)
//! - The Android SDK environment
//! - The current project (package.json, git repository, Gradle wrapper)

use crate::process::{command_exists, run_command, run_command_in_dir};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Oldest Node.js major that works at all
const NODE_MIN_MAJOR: u64 = 16;
/// Node.js major recommended for React Native tooling
const NODE_RECOMMENDED_MAJOR: u64 = 18;

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All checks passed
    Healthy,
    /// Some optional checks failed
    Degraded,
    /// Required checks failed
    Unhealthy,
}

impl HealthStatus {
    /// Returns true if status is healthy
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    /// Returns true if status is healthy or degraded (still operational)
    #[must_use]
    pub fn is_operational(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }
}

/// Individual health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Status of the check
    pub status: HealthStatus,
    /// Optional message with details
    pub message: Option<String>,
    /// Duration of the check in milliseconds
    pub duration_ms: u64,
    /// Additional details as key-value pairs
    pub details: BTreeMap<String, String>,
}

impl CheckResult {
    fn with_status(name: impl Into<String>, status: HealthStatus, message: Option<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message,
            duration_ms: 0,
            details: BTreeMap::new(),
        }
    }

    /// Create a healthy check result
    pub fn healthy(name: impl Into<String>) -> Self {
        Self::with_status(name, HealthStatus::Healthy, None)
    }

    /// Create an unhealthy check result with a message
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, HealthStatus::Unhealthy, Some(message.into()))
    }

    /// Create a degraded check result with a message
    pub fn degraded(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, HealthStatus::Degraded, Some(message.into()))
    }

    /// Attach a message to any result
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add a detail key-value pair
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Overall health report containing all check results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall status based on all checks
    pub status: HealthStatus,
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Total duration of all checks in milliseconds
    pub total_duration_ms: u64,
    /// Timestamp when the report was generated
    pub timestamp: String,
    /// Version of the tool
    pub version: String,
}

impl HealthReport {
    /// Create a new health report from check results
    #[must_use]
    pub fn new(checks: Vec<CheckResult>, duration: Duration) -> Self {
        let status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Degraded
        };

        Self {
            status,
            checks,
            total_duration_ms: duration_ms(duration),
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Returns true if overall status is healthy
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }

    /// Get all checks that failed (not healthy)
    #[must_use]
    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.status.is_healthy()).collect()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Health checker with configurable checks
#[derive(Default)]
pub struct HealthChecker {
    checks: Vec<Box<dyn HealthCheck>>,
}

impl HealthChecker {
    /// Create a new health checker with no checks
    #[must_use]
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a health check
    #[must_use]
    pub fn add_check(mut self, check: impl HealthCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Add the checks `adk doctor` runs for a React Native project
    #[must_use]
    pub fn with_react_native_checks(self, project_root: &Path, android_dir: &str) -> Self {
        self.add_check(NodeCheck)
            .add_check(CommandCheck::new("npm", Some("--version")))
            .add_check(CommandCheck::optional("git", Some("--version")))
            .add_check(CommandCheck::optional("java", Some("-version")))
            .add_check(EnvVarCheck::optional("ANDROID_HOME"))
            .add_check(PackageJsonCheck::new(project_root))
            .add_check(GitRepoCheck::new(project_root))
            .add_check(GradleProjectCheck::new(project_root.join(android_dir)))
    }

    /// Number of registered checks
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// True when no checks are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run all health checks
    #[must_use]
    pub fn run(&self) -> HealthReport {
        let start = Instant::now();
        let results = self
            .checks
            .iter()
            .map(|check| {
                let check_start = Instant::now();
                let mut result = check.check();
                result.duration_ms = duration_ms(check_start.elapsed());
                tracing::debug!(check = %result.name, status = ?result.status, "Health check finished");
                result
            })
            .collect();

        HealthReport::new(results, start.elapsed())
    }
}

/// Trait for implementing health checks
pub trait HealthCheck: Send + Sync {
    /// Perform the health check and return a result
    fn check(&self) -> CheckResult;
}

/// Check if a command is available
pub struct CommandCheck {
    command: String,
    version_arg: Option<String>,
    required: bool,
}

impl CommandCheck {
    /// Create a required command check
    pub fn new(command: impl Into<String>, version_arg: Option<&str>) -> Self {
        Self {
            command: command.into(),
            version_arg: version_arg.map(String::from),
            required: true,
        }
    }

    /// Create an optional command check (degraded if missing, not unhealthy)
    pub fn optional(command: impl Into<String>, version_arg: Option<&str>) -> Self {
        Self {
            required: false,
            ..Self::new(command, version_arg)
        }
    }
}

impl HealthCheck for CommandCheck {
    fn check(&self) -> CheckResult {
        if !command_exists(&self.command) {
            return if self.required {
                CheckResult::unhealthy(&self.command, format!("{} is not installed", self.command))
            } else {
                CheckResult::degraded(
                    &self.command,
                    format!("{} is not installed (optional)", self.command),
                )
            };
        }

        let Some(arg) = &self.version_arg else {
            return CheckResult::healthy(&self.command);
        };

        match run_command(&self.command, &[arg]) {
            // java prints its version on stderr
            Ok(output) if output.success => {
                let version = first_line(&output.combined_output());
                CheckResult::healthy(&self.command)
                    .with_message(format!("{} is available", version))
                    .with_detail("version", version)
            }
            _ => CheckResult::healthy(&self.command),
        }
    }
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or("").trim().to_string()
}

/// Check that Node.js is installed and recent enough
pub struct NodeCheck;

impl NodeCheck {
    /// Classify a `node --version` string such as `v18.17.1`
    #[must_use]
    pub fn evaluate(version: &str) -> CheckResult {
        let trimmed = version.trim().trim_start_matches('v');
        let Ok(parsed) = semver::Version::parse(trimmed) else {
            return CheckResult::unhealthy("node", format!("Unable to parse Node.js version {version:?}"));
        };

        let result = if parsed.major >= NODE_RECOMMENDED_MAJOR {
            CheckResult::healthy("node").with_message(format!("Node.js v{parsed} is compatible"))
        } else if parsed.major >= NODE_MIN_MAJOR {
            CheckResult::degraded(
                "node",
                format!("Node.js v{parsed} works but v{NODE_RECOMMENDED_MAJOR}+ is recommended"),
            )
        } else {
            CheckResult::unhealthy(
                "node",
                format!("Node.js v{parsed} is too old (minimum v{NODE_MIN_MAJOR} required)"),
            )
        };
        result.with_detail("version", parsed.to_string())
    }
}

impl HealthCheck for NodeCheck {
    fn check(&self) -> CheckResult {
        if !command_exists("node") {
            return CheckResult::unhealthy("node", "Node.js is not installed");
        }
        match run_command("node", &["--version"]) {
            Ok(output) if output.success => Self::evaluate(&output.stdout),
            Ok(output) => CheckResult::unhealthy("node", output.tail(1)),
            Err(e) => CheckResult::unhealthy("node", e.message),
        }
    }
}

/// Check if an environment variable is set
pub struct EnvVarCheck {
    var_name: String,
    required: bool,
}

impl EnvVarCheck {
    /// Create a required environment variable check
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
            required: true,
        }
    }

    /// Create an optional environment variable check
    pub fn optional(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
            required: false,
        }
    }
}

impl HealthCheck for EnvVarCheck {
    fn check(&self) -> CheckResult {
        match std::env::var(&self.var_name) {
            Ok(value) => {
                let shown = if value.chars().count() > 50 {
                    format!("{}...", value.chars().take(50).collect::<String>())
                } else {
                    value
                };
                CheckResult::healthy(&self.var_name).with_detail("value", shown)
            }
            Err(_) if self.required => {
                CheckResult::unhealthy(&self.var_name, format!("{} is not set", self.var_name))
            }
            Err(_) => CheckResult::degraded(
                &self.var_name,
                format!("{} is not set (optional)", self.var_name),
            ),
        }
    }
}

/// Check that the working directory is a Node.js project
pub struct PackageJsonCheck {
    project_root: PathBuf,
}

impl PackageJsonCheck {
    /// Check `package.json` under `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }
}

impl HealthCheck for PackageJsonCheck {
    fn check(&self) -> CheckResult {
        const NAME: &str = "project";
        let path = self.project_root.join("package.json");
        let Ok(content) = std::fs::read_to_string(&path) else {
            return CheckResult::degraded(
                NAME,
                "Not in a Node.js project directory (some features may be limited)",
            );
        };

        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(json) => {
                let name = json
                    .get("name")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("unnamed project");
                CheckResult::healthy(NAME)
                    .with_message(format!("Working in project: {name}"))
                    .with_detail("name", name)
            }
            Err(_) => CheckResult::degraded(NAME, "package.json found but invalid format"),
        }
    }
}

/// Check that the project is inside a git work tree
pub struct GitRepoCheck {
    project_root: PathBuf,
}

impl GitRepoCheck {
    /// Check the repository containing `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }
}

impl HealthCheck for GitRepoCheck {
    fn check(&self) -> CheckResult {
        const NAME: &str = "git repository";
        match run_command_in_dir("git", &["rev-parse", "--git-dir"], &self.project_root) {
            Ok(output) if output.success => {
                CheckResult::healthy(NAME).with_message("Current directory is a git repository")
            }
            _ => CheckResult::degraded(NAME, "Not in a git repository"),
        }
    }
}

/// Check that the Android Gradle project and its wrapper are present
pub struct GradleProjectCheck {
    android_dir: PathBuf,
}

impl GradleProjectCheck {
    /// Check the Gradle project in `android_dir`
    pub fn new(android_dir: impl Into<PathBuf>) -> Self {
        Self {
            android_dir: android_dir.into(),
        }
    }
}

impl HealthCheck for GradleProjectCheck {
    fn check(&self) -> CheckResult {
        const NAME: &str = "gradle wrapper";
        if !self.android_dir.is_dir() {
            return CheckResult::degraded(
                NAME,
                format!("No {} directory (android builds unavailable)", self.android_dir.display()),
            );
        }
        let wrapper = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };
        if self.android_dir.join(wrapper).is_file() {
            CheckResult::healthy(NAME).with_message(format!("{wrapper} found"))
        } else {
            CheckResult::degraded(NAME, format!("{wrapper} not found in {}", self.android_dir.display()))
        }
    }
}
