//! Build pipeline
//!
//! An explicit state machine:
//!
//! ```text
//! Init -> Precheck -> (Clean)? -> Building -> BuildFailed
//!                                          -> BuildSucceeded -> Archiving -> Done
//! ```
//!
//! Fatal: a failed precheck, a failed or timed-out build, a timed-out clean.
//! Recoverable (recorded as warnings): any other clean failure, a missing APK
//! after a successful build, and archiving problems.

use crate::archive::{ArchiveOutcome, Archiver};
use crate::gradle::{self, Gradle};
use crate::timestamp::{Clock, SystemClock};
use crate::types::{BuildRequest, BuildResult, Diagnostic, Outcome, Severity};
use adk_core::config::AndroidConfig;
use adk_core::error::{Error, ErrorCode};
use adk_core::process::CommandRunner;
use adk_telemetry::Timer;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

pub use crate::types::Stage;

/// Lines of Gradle output kept in a failure's context
const OUTPUT_TAIL_LINES: usize = 20;

/// Receives progress events, e.g. to drive spinners
///
/// Every method has an empty default.
pub trait PipelineObserver {
    /// A stage is about to run
    fn stage_started(&self, _stage: Stage, _request: &BuildRequest) {}

    /// A stage finished; `worst` is the highest severity it recorded
    fn stage_finished(&self, _stage: Stage, _worst: Option<Severity>) {}

    /// A diagnostic was recorded
    fn diagnostic(&self, _diagnostic: &Diagnostic) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// A fatal pipeline error together with everything recorded before it
#[derive(Debug, Error)]
#[error("{error}")]
pub struct PipelineFailure {
    /// What stopped the pipeline
    #[source]
    pub error: Error,
    /// Partial result, `outcome` is always `Failed`
    pub result: BuildResult,
}

impl PipelineFailure {
    /// Stage the pipeline stopped in
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        self.result
            .diagnostics
            .iter()
            .rev()
            .find(|d| d.severity == Severity::Error)
            .map(|d| d.stage)
    }
}

/// Builds and archives the Android APK of one React Native project
pub struct BuildPipeline<R> {
    project_root: PathBuf,
    runner: R,
    clock: Box<dyn Clock>,
    observer: Box<dyn PipelineObserver>,
    config: AndroidConfig,
}

impl<R: CommandRunner> BuildPipeline<R> {
    /// Pipeline for the project at `project_root`, running commands with `runner`
    pub fn new(project_root: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            project_root: project_root.into(),
            runner,
            clock: Box::new(SystemClock),
            observer: Box::new(NoopObserver),
            config: AndroidConfig::default(),
        }
    }

    /// Use `clock` for archive timestamps
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Report progress to `observer`
    #[must_use]
    pub fn with_observer(mut self, observer: impl PipelineObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Use folder names, fallback name and deadlines from `config`
    #[must_use]
    pub fn with_config(mut self, config: AndroidConfig) -> Self {
        self.config = config;
        self
    }

    /// Project root
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Run every stage for `request`
    pub fn run(&self, request: &BuildRequest) -> Result<BuildResult, PipelineFailure> {
        let span = info_span!(
            "android_build",
            build_type = %request.build_type,
            skip_clean = request.skip_clean
        );
        let _entered = span.enter();

        let mut run = Run {
            pipeline: self,
            request: *request,
            gradle: Gradle::new(self.project_root.join(&self.config.dir))
                .with_timeout(self.config.build_timeout()),
            archiver: Archiver::with_config(&self.project_root, &self.config),
            result: BuildResult::started(request.build_type),
            fatal: None,
        };

        let mut stage = Stage::Init;
        loop {
            if stage == Stage::Done {
                run.result.outcome = Outcome::Success;
                info!(
                    artifact = ?run.result.artifact_path,
                    archived = ?run.result.archived_path,
                    "Pipeline finished"
                );
                return Ok(run.result);
            }

            let recorded_before = run.result.diagnostics.len();
            let timer = Timer::start(stage.label());
            self.observer.stage_started(stage, request);
            debug!(%stage, "Entering stage");

            let next = run.step(stage);

            let elapsed = timer.stop();
            if stage != Stage::Init {
                run.result.timings.push((stage, elapsed));
            }
            let worst = run.result.diagnostics[recorded_before..]
                .iter()
                .map(|d| d.severity)
                .max();
            self.observer.stage_finished(stage, worst);

            match next {
                Ok(following) => stage = following,
                Err(error) => {
                    warn!(%stage, code = %error.code, "Pipeline stopped: {}", error.message);
                    run.result.outcome = Outcome::Failed;
                    run.result.artifact_path = None;
                    run.result.archived_path = None;
                    return Err(PipelineFailure {
                        error,
                        result: run.result,
                    });
                }
            }
        }
    }
}

/// State of one invocation
struct Run<'p, R> {
    pipeline: &'p BuildPipeline<R>,
    request: BuildRequest,
    gradle: Gradle,
    archiver: Archiver,
    result: BuildResult,
    fatal: Option<Error>,
}

impl<R: CommandRunner> Run<'_, R> {
    fn step(&mut self, stage: Stage) -> Result<Stage, Error> {
        match stage {
            Stage::Init => Ok(Stage::Precheck),
            Stage::Precheck => self.precheck(),
            Stage::Clean => self.clean(),
            Stage::Building => Ok(self.build()),
            Stage::BuildFailed => Err(self
                .fatal
                .take()
                .unwrap_or_else(|| Error::gradle("Build failed"))),
            Stage::BuildSucceeded => Ok(self.locate_artifact()),
            Stage::Archiving => Ok(self.archive()),
            Stage::Done => Ok(Stage::Done),
        }
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        self.pipeline.observer.diagnostic(&diagnostic);
        self.result.diagnostics.push(diagnostic);
    }

    fn note(&mut self, stage: Stage, severity: Severity, message: impl Into<String>) {
        self.record(Diagnostic::new(stage, severity, message));
    }

    fn display_path(&self, path: &Path) -> String {
        let relative = path
            .strip_prefix(&self.pipeline.project_root)
            .map(|p| Path::new(".").join(p))
            .unwrap_or_else(|_| path.to_path_buf());
        relative.display().to_string()
    }

    fn precheck(&mut self) -> Result<Stage, Error> {
        let dir = &self.pipeline.config.dir;

        let problem = if !self.gradle.has_project_dir() {
            Some((
                format!("No {dir} directory found"),
                "Make sure you're in a React Native project root",
            ))
        } else if !self.gradle.has_wrapper() {
            Some((
                format!("{} not found in {dir} directory", gradle::wrapper_name()),
                "Make sure your React Native project is properly set up",
            ))
        } else {
            None
        };

        if let Some((message, suggestion)) = problem {
            self.record(
                Diagnostic::new(Stage::Precheck, Severity::Error, format!("Not a recognized project: {message}"))
                    .with_hint(suggestion),
            );
            return Err(Error::project_not_recognized(message)
                .with_context(format!("Project root: {}", self.pipeline.project_root.display()))
                .with_suggestion(suggestion));
        }

        if self.request.skip_clean {
            self.note(Stage::Clean, Severity::Info, "Skipping clean step");
            Ok(Stage::Building)
        } else {
            Ok(Stage::Clean)
        }
    }

    fn clean(&mut self) -> Result<Stage, Error> {
        let build_dir = gradle::app_build_dir(self.gradle.android_dir());
        let delete = gradle::force_delete_spec(&build_dir)
            .timeout(self.pipeline.config.force_delete_timeout());
        match self.pipeline.runner.run(&delete) {
            Ok(r) if r.success => debug!(dir = %build_dir.display(), "Removed previous build output"),
            Ok(r) => debug!(exit_code = r.exit_code, "Forced removal failed, continuing with gradle clean"),
            Err(e) => debug!(error = %e, "Forced removal could not run, continuing with gradle clean"),
        }

        match self.gradle.clean(&self.pipeline.runner) {
            Ok(r) if r.success => {
                self.note(Stage::Clean, Severity::Info, "Android project cleaned");
            }
            Ok(r) => {
                warn!(exit_code = r.exit_code, failure = ?r.failure, "gradle clean failed, continuing");
                let mut diagnostic = Diagnostic::new(
                    Stage::Clean,
                    Severity::Warning,
                    format!("Clean had issues, proceeding with build (exit code {})", r.exit_code),
                );
                if r.is_file_locked() {
                    diagnostic = diagnostic.with_hint(format!(
                        "Some files are locked by another process.\n{}",
                        gradle::file_lock_hint()
                    ));
                }
                self.record(diagnostic);
            }
            Err(e) if e.code == ErrorCode::ProcessTimeout => {
                self.note(Stage::Clean, Severity::Error, "Build tool unresponsive during clean");
                return Err(e.with_context("Build tool unresponsive during gradle clean"));
            }
            Err(e) => {
                warn!(error = %e, "gradle clean could not run, continuing");
                self.note(
                    Stage::Clean,
                    Severity::Warning,
                    format!("Clean could not run, proceeding with build: {}", e.message),
                );
            }
        }

        Ok(Stage::Building)
    }

    fn build(&mut self) -> Stage {
        let build_type = self.request.build_type;
        let task = build_type.gradle_task();
        info!(task, "Building APK");

        let error = match self.gradle.assemble(&self.pipeline.runner, build_type) {
            Ok(r) if r.success => {
                self.note(
                    Stage::Building,
                    Severity::Info,
                    format!("{} APK built successfully", build_type.label()),
                );
                return Stage::BuildSucceeded;
            }
            Ok(r) => Error::gradle(format!("{task} failed with exit code {}", r.exit_code))
                .with_context(r.tail(OUTPUT_TAIL_LINES)),
            Err(e) if e.code == ErrorCode::ProcessTimeout => {
                e.with_context(format!("Build tool unresponsive during {task}"))
            }
            Err(e) => e,
        };

        self.note(
            Stage::Building,
            Severity::Error,
            format!("Failed to build {build_type} APK: {}", error.message),
        );
        self.fatal = Some(error);
        Stage::BuildFailed
    }

    fn locate_artifact(&mut self) -> Stage {
        let apk = self.gradle.apk_path(self.request.build_type);
        if apk.is_file() {
            let shown = self.display_path(&apk);
            self.note(
                Stage::BuildSucceeded,
                Severity::Info,
                format!("Your {} APK is ready at: {shown}", self.request.build_type),
            );
            self.result.artifact_path = Some(apk);
        } else {
            warn!(apk = %apk.display(), "Build succeeded but APK is missing");
            let shown = self.display_path(&apk);
            self.note(
                Stage::BuildSucceeded,
                Severity::Warning,
                format!("Build reported success but no APK exists at {shown}"),
            );
        }
        Stage::Archiving
    }

    fn archive(&mut self) -> Stage {
        const NO_APK: &str = "Could not copy APK to builds folder: no APK was produced";

        if self.result.artifact_path.is_none() {
            self.note(Stage::Archiving, Severity::Warning, NO_APK);
            return Stage::Done;
        }

        let now = self.pipeline.clock.now();
        match self.archiver.archive(self.request.build_type, &now) {
            ArchiveOutcome::Archived(path) => {
                let shown = self.display_path(&path);
                self.note(Stage::Archiving, Severity::Info, format!("APK copied to {shown}"));
                self.result.archived_path = Some(path);
            }
            ArchiveOutcome::NoArtifact => {
                self.note(Stage::Archiving, Severity::Warning, NO_APK);
            }
            ArchiveOutcome::Failed(reason) => {
                self.note(
                    Stage::Archiving,
                    Severity::Warning,
                    format!("Could not copy APK to builds folder: {reason}"),
                );
            }
        }
        Stage::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::FixedClock;
    use crate::types::BuildType;
    use adk_core::error::Result as CoreResult;
    use adk_core::process::{CommandResult, CommandSpec};
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Clone, Copy)]
    enum Reply {
        Ok,
        Fail(i32, &'static str),
        Timeout,
        SpawnError,
    }

    impl Reply {
        fn into_result(self, spec: &CommandSpec) -> CoreResult<CommandResult> {
            match self {
                Reply::Ok => Ok(CommandResult::ok("BUILD SUCCESSFUL")),
                Reply::Fail(code, stderr) => Ok(CommandResult::failed(code, stderr)),
                Reply::Timeout => Err(Error::timeout(&spec.program, Duration::from_secs(1))),
                Reply::SpawnError => Err(Error::command_not_found(&spec.program)),
            }
        }
    }

    /// Scripted runner; a successful assemble writes the APK like Gradle would
    struct FakeGradle {
        calls: RefCell<Vec<CommandSpec>>,
        delete: Reply,
        clean: Reply,
        assemble: Reply,
        produce_apk: bool,
    }

    impl FakeGradle {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                delete: Reply::Ok,
                clean: Reply::Ok,
                assemble: Reply::Ok,
                produce_apk: true,
            }
        }

        fn tasks(&self) -> Vec<String> {
            self.calls
                .borrow()
                .iter()
                .map(|s| s.args.last().cloned().unwrap_or_default())
                .collect()
        }
    }

    impl CommandRunner for FakeGradle {
        fn run(&self, spec: &CommandSpec) -> CoreResult<CommandResult> {
            self.calls.borrow_mut().push(spec.clone());
            let task = spec.args.last().map(String::as_str).unwrap_or_default();
            let reply = if !spec.program.contains("gradlew") {
                self.delete
            } else if task == "clean" {
                self.clean
            } else {
                self.assemble
            };

            if matches!(reply, Reply::Ok) && task.starts_with("assemble") && self.produce_apk {
                let build_type = if task == "assembleDebug" { BuildType::Debug } else { BuildType::Release };
                let apk = gradle::apk_output_path(spec.cwd.as_ref().unwrap(), build_type);
                fs::create_dir_all(apk.parent().unwrap()).unwrap();
                fs::write(apk, b"apk").unwrap();
            }
            reply.into_result(spec)
        }
    }

    #[derive(Clone, Default)]
    struct Events(Rc<RefCell<Vec<(Stage, Option<Severity>)>>>);

    impl PipelineObserver for Events {
        fn stage_finished(&self, stage: Stage, worst: Option<Severity>) {
            self.0.borrow_mut().push((stage, worst));
        }
    }

    fn clock() -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(2025, 1, 3)
                .unwrap()
                .and_hms_opt(9, 5, 0)
                .unwrap(),
        )
    }

    fn rn_project() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("android")).unwrap();
        fs::write(dir.path().join("android").join(gradle::wrapper_name()), "").unwrap();
        fs::write(dir.path().join("app.json"), r#"{"name": "FoodApp"}"#).unwrap();
        dir
    }

    fn pipeline<'a>(root: &Path, runner: &'a FakeGradle) -> BuildPipeline<&'a FakeGradle> {
        BuildPipeline::new(root, runner).with_clock(clock())
    }

    #[test]
    fn test_outside_project_halts_without_processes() {
        let dir = tempfile::tempdir().unwrap();
        let runner = FakeGradle::new();

        let failure = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Release))
            .unwrap_err();

        assert_eq!(failure.error.code, ErrorCode::ProjectNotRecognized);
        assert_eq!(failure.stage(), Some(Stage::Precheck));
        assert_eq!(failure.result.outcome, Outcome::Failed);
        assert!(runner.calls.borrow().is_empty());
        assert!(!dir.path().join("apk_builds").exists());
    }

    #[test]
    fn test_missing_wrapper_halts_at_precheck() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("android")).unwrap();
        let runner = FakeGradle::new();

        let failure = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Debug).skip_clean(true))
            .unwrap_err();

        assert_eq!(failure.error.code, ErrorCode::ProjectNotRecognized);
        assert!(failure.error.message.contains(gradle::wrapper_name()));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_release_build_cleans_builds_and_archives() {
        let dir = rn_project();
        let runner = FakeGradle::new();

        let result = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Release))
            .unwrap();

        assert!(result.is_success());
        assert_eq!(runner.calls.borrow().len(), 3);
        assert_eq!(runner.tasks()[1..], ["clean", "assembleRelease"]);
        assert!(result.artifact_path.as_ref().unwrap().ends_with("apk/release/app-release.apk"));
        assert_eq!(
            result.archived_path,
            Some(dir.path().join("apk_builds").join("FoodApp_release_03_01_2025_09_05.apk"))
        );
        assert!(result.archived_path.as_ref().unwrap().is_file());
        assert_eq!(result.warnings().count(), 0);
        assert!(result.timings.iter().any(|(s, _)| *s == Stage::Building));
    }

    #[test]
    fn test_debug_build_uses_debug_task_and_names() {
        let dir = rn_project();
        let runner = FakeGradle::new();

        let result = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Debug).skip_clean(true))
            .unwrap();

        assert_eq!(runner.tasks(), ["assembleDebug"]);
        assert!(result
            .archived_path
            .as_ref()
            .unwrap()
            .ends_with("FoodApp_debug_03_01_2025_09_05.apk"));
        assert!(result.messages().any(|m| m.contains("Skipping clean step")));
    }

    #[test]
    fn test_build_failure_is_fatal_and_leaves_paths_unset() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.clean = Reply::Fail(1, "clean exploded");
        runner.assemble = Reply::Fail(1, "FAILURE: Build failed with an exception.\n* What went wrong: compile error");

        let failure = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Release))
            .unwrap_err();

        assert_eq!(failure.error.code, ErrorCode::GradleError);
        assert!(failure.error.context.as_deref().unwrap().contains("compile error"));
        assert_eq!(failure.stage(), Some(Stage::Building));
        assert!(failure.result.artifact_path.is_none());
        assert!(failure.result.archived_path.is_none());
        assert!(!dir.path().join("apk_builds").exists());
    }

    #[test]
    fn test_clean_failure_does_not_stop_build() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.clean = Reply::Fail(1, "Execution failed for task ':app:clean'.");

        let result = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Release))
            .unwrap();

        assert!(result.is_success());
        assert!(result.archived_path.is_some());
        let warning = result.warnings().next().unwrap();
        assert_eq!(warning.stage, Stage::Clean);
        assert!(warning.hint.is_none());
    }

    #[test]
    fn test_locked_clean_carries_hint() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.clean = Reply::Fail(1, "Unable to delete directory 'android\\app\\build\\intermediates'");

        let result = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Release))
            .unwrap();

        let warning = result.warnings().next().unwrap();
        assert!(warning.hint.as_deref().unwrap().contains("Try the build again"));
        assert!(result.is_success());
    }

    #[test]
    fn test_force_delete_failure_ignored() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.delete = Reply::SpawnError;

        let result = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Release))
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.warnings().count(), 0);
    }

    #[test]
    fn test_clean_timeout_is_fatal() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.clean = Reply::Timeout;

        let failure = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Release))
            .unwrap_err();

        assert_eq!(failure.error.code, ErrorCode::ProcessTimeout);
        assert!(!runner.tasks().iter().any(|t| t.starts_with("assemble")));
    }

    #[test]
    fn test_build_timeout_is_fatal() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.assemble = Reply::Timeout;

        let failure = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Release).skip_clean(true))
            .unwrap_err();

        assert_eq!(failure.error.code, ErrorCode::ProcessTimeout);
        assert!(failure.error.context.as_deref().unwrap().contains("unresponsive"));
        assert!(failure.result.archived_path.is_none());
    }

    #[test]
    fn test_success_without_apk_is_not_fatal() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.produce_apk = false;

        let result = pipeline(dir.path(), &runner)
            .run(&BuildRequest::new(BuildType::Release).skip_clean(true))
            .unwrap();

        assert!(result.is_success());
        assert!(result.artifact_path.is_none());
        assert!(result.archived_path.is_none());
        let stages: Vec<Stage> = result.warnings().map(|d| d.stage).collect();
        assert_eq!(stages, [Stage::BuildSucceeded, Stage::Archiving]);
    }

    /// Writes the APK the first time it is asked for the time
    struct ApkOnFirstTick(PathBuf);

    impl Clock for ApkOnFirstTick {
        fn now(&self) -> chrono::NaiveDateTime {
            fs::create_dir_all(self.0.parent().unwrap()).unwrap();
            fs::write(&self.0, b"late apk").unwrap();
            clock().now()
        }
    }

    #[test]
    fn test_apk_appearing_after_check_is_not_archived() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.produce_apk = false;
        let late_apk = gradle::apk_output_path(&dir.path().join("android"), BuildType::Release);

        let result = BuildPipeline::new(dir.path(), &runner)
            .with_clock(ApkOnFirstTick(late_apk))
            .run(&BuildRequest::new(BuildType::Release).skip_clean(true))
            .unwrap();

        assert!(result.artifact_path.is_none());
        assert!(result.archived_path.is_none());
        assert!(!dir.path().join("apk_builds").exists());
    }

    #[test]
    fn test_same_minute_builds_collide() {
        let dir = rn_project();
        let runner = FakeGradle::new();
        let pipeline = pipeline(dir.path(), &runner);
        let request = BuildRequest::new(BuildType::Release).skip_clean(true);

        let first = pipeline.run(&request).unwrap();
        let second = pipeline.run(&request).unwrap();

        assert_eq!(first.archived_path, second.archived_path);
        assert_eq!(fs::read_dir(dir.path().join("apk_builds")).unwrap().count(), 1);
    }

    #[test]
    fn test_config_overrides_folders_and_timeout() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("mobile")).unwrap();
        fs::write(dir.path().join("mobile").join(gradle::wrapper_name()), "").unwrap();
        let runner = FakeGradle::new();
        let config = AndroidConfig {
            dir: "mobile".to_string(),
            archive_dir: "out".to_string(),
            build_timeout_secs: 42,
            ..AndroidConfig::default()
        };

        let result = pipeline(dir.path(), &runner)
            .with_config(config)
            .run(&BuildRequest::new(BuildType::Release).skip_clean(true))
            .unwrap();

        assert_eq!(runner.calls.borrow()[0].timeout, Some(Duration::from_secs(42)));
        assert_eq!(
            result.archived_path,
            Some(dir.path().join("out").join("ReactNativeApp_release_03_01_2025_09_05.apk"))
        );
    }

    #[test]
    fn test_observer_sees_each_transition() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.clean = Reply::Fail(2, "oops");
        let events = Events::default();

        pipeline(dir.path(), &runner)
            .with_observer(events.clone())
            .run(&BuildRequest::new(BuildType::Release))
            .unwrap();

        let seen = events.0.borrow();
        let stages: Vec<Stage> = seen.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            stages,
            [
                Stage::Init,
                Stage::Precheck,
                Stage::Clean,
                Stage::Building,
                Stage::BuildSucceeded,
                Stage::Archiving
            ]
        );
        assert_eq!(seen[2].1, Some(Severity::Warning));
        assert_eq!(seen[3].1, Some(Severity::Info));
    }

    #[test]
    fn test_observer_sees_build_failed_state() {
        let dir = rn_project();
        let mut runner = FakeGradle::new();
        runner.assemble = Reply::Fail(1, "nope");
        let events = Events::default();

        let _ = pipeline(dir.path(), &runner)
            .with_observer(events.clone())
            .run(&BuildRequest::new(BuildType::Debug).skip_clean(true));

        let stages: Vec<Stage> = events.0.borrow().iter().map(|(s, _)| *s).collect();
        assert_eq!(stages.last(), Some(&Stage::BuildFailed));
        assert!(!stages.contains(&Stage::Archiving));
    }
}
