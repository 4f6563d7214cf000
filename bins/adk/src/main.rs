//! ADK CLI
//!
//! Builds React Native Android APKs and archives them with dated names.

use adk_android::{
    BuildPipeline, BuildRequest, BuildResult, BuildType, PipelineFailure, PipelineObserver,
    Severity, Stage,
};
use adk_cli::output::{capitalize, format_duration, Panel, Status, Tone};
use adk_cli::progress;
use adk_core::config::Config;
use adk_core::error::{exit_codes, Error};
use adk_core::health::{HealthChecker, HealthReport, HealthStatus};
use adk_core::process::SystemRunner;
use adk_telemetry::TelemetryConfig;
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "adk")]
#[command(about = "Build and package React Native Android apps")]
#[command(version)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Gradle timeout in seconds (0 disables)
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and archive the Android APK
    Android {
        #[command(subcommand)]
        action: AndroidAction,
    },

    /// Diagnose environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum AndroidAction {
    /// Build the release APK
    Release {
        /// Skip the clean step
        #[arg(long)]
        skip_clean: bool,
    },
    /// Build the debug APK
    Debug {
        /// Skip the clean step
        #[arg(long)]
        skip_clean: bool,
    },
    /// Build the APK of a given type
    Build {
        /// Build type: release, debug
        #[arg(long = "type", value_name = "TYPE", default_value = "release")]
        build_type: BuildType,
        /// Skip the clean step
        #[arg(long)]
        skip_clean: bool,
    },
}

impl AndroidAction {
    fn request(&self) -> BuildRequest {
        match *self {
            Self::Release { skip_clean } => BuildRequest::new(BuildType::Release).skip_clean(skip_clean),
            Self::Debug { skip_clean } => BuildRequest::new(BuildType::Debug).skip_clean(skip_clean),
            Self::Build { build_type, skip_clean } => BuildRequest::new(build_type).skip_clean(skip_clean),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            report_error(&e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> adk_core::Result<i32> {
    let project_root = resolve_project(cli.project.as_deref())?;
    let mut config = Config::load(&project_root, cli.config.as_deref())?;
    if let Some(secs) = cli.timeout {
        config.schema.android.build_timeout_secs = secs;
    }

    init_logging(cli, &config);
    tracing::debug!(root = %project_root.display(), config = ?config.path, "Starting");

    let code = match &cli.command {
        Commands::Android { action } => run_android(&project_root, config, action.request(), cli.quiet),
        Commands::Doctor { json } => run_doctor(&project_root, &config, *json),
    };
    Ok(code)
}

fn resolve_project(project: Option<&Path>) -> adk_core::Result<PathBuf> {
    let path = project.unwrap_or(Path::new("."));
    dunce::canonicalize(path).map_err(|e| {
        Error::project_not_recognized(format!("Project directory {} not found", path.display()))
            .with_source(e)
            .with_suggestion("Pass an existing directory with --project")
    })
}

fn init_logging(cli: &Cli, config: &Config) {
    let log_level = if cli.quiet {
        "error".to_string()
    } else {
        adk_telemetry::level_for_verbosity(&config.schema.logging.level, cli.verbose)
    };
    let telemetry = TelemetryConfig {
        log_level,
        ..TelemetryConfig::default()
    };
    if let Err(e) = adk_telemetry::init_with_config(telemetry) {
        Status::warning(&format!("Logging disabled: {e}"));
    }
}

fn report_error(error: &Error) {
    Status::error(&error.message);
    if let Some(context) = &error.context {
        eprintln!("  {}", context.dimmed());
    }
    if let Some(suggestion) = &error.suggestion {
        eprintln!("  {} {}", "→".cyan(), suggestion);
    }
}

/// Draws one spinner per long-running stage
struct SpinnerObserver {
    quiet: bool,
    current: RefCell<Option<ProgressBar>>,
}

impl SpinnerObserver {
    fn new(quiet: bool) -> Self {
        Self {
            quiet,
            current: RefCell::new(None),
        }
    }
}

impl PipelineObserver for SpinnerObserver {
    fn stage_started(&self, stage: Stage, request: &BuildRequest) {
        let message = match stage {
            Stage::Clean => "Cleaning Android project...".to_string(),
            Stage::Building => format!("Building {} APK...", request.build_type),
            Stage::Archiving => "Copying APK to builds folder...".to_string(),
            _ => return,
        };
        let pb = if self.quiet { progress::hidden() } else { progress::spinner(&message) };
        *self.current.borrow_mut() = Some(pb);
    }

    fn stage_finished(&self, stage: Stage, worst: Option<Severity>) {
        let Some(pb) = self.current.borrow_mut().take() else {
            return;
        };
        let label = capitalize(stage.label());
        match worst {
            Some(Severity::Error) => progress::finish_error(&pb, &format!("{label} failed")),
            Some(Severity::Warning) => progress::finish_warning(&pb, &format!("{label} finished with warnings")),
            _ => progress::finish_success(&pb, &format!("{label} done")),
        }
    }
}

fn run_android(project_root: &Path, config: Config, request: BuildRequest, quiet: bool) -> i32 {
    if !quiet {
        Status::header(&format!(
            "Building {} APK for React Native",
            request.build_type.label()
        ));
        if request.skip_clean {
            Status::note("Skipping clean step");
        }
    }

    let pipeline = BuildPipeline::new(project_root, SystemRunner)
        .with_config(config.schema.android)
        .with_observer(SpinnerObserver::new(quiet));

    match pipeline.run(&request) {
        Ok(result) => {
            print_warnings(&result);
            if !quiet {
                print_success(project_root, &result);
            }
            exit_codes::SUCCESS
        }
        Err(failure) => {
            print_warnings(&failure.result);
            print_failure(&failure);
            failure.error.exit_code()
        }
    }
}

fn print_warnings(result: &BuildResult) {
    for warning in result.warnings() {
        Status::warning(&warning.message);
        if let Some(hint) = &warning.hint {
            Panel::new(Tone::Warning, "Possible fix").line(hint.as_str()).eprint();
        }
    }
}

fn shown(project_root: &Path, path: &Path) -> String {
    path.strip_prefix(project_root)
        .map(|p| Path::new(".").join(p))
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn print_success(project_root: &Path, result: &BuildResult) {
    let mut panel = Panel::new(Tone::Success, "Build Complete!");
    if let Some(apk) = &result.artifact_path {
        panel = panel.line(format!("APK:      {}", shown(project_root, apk)));
    }
    if let Some(archived) = &result.archived_path {
        panel = panel.line(format!("Archived: {}", shown(project_root, archived)));
    }
    panel
        .line(format!("Time:     {}", format_duration(result.total_duration())))
        .print();
}

fn print_failure(failure: &PipelineFailure) {
    report_error(&failure.error);

    let stage = failure
        .stage()
        .map_or_else(|| "unknown".to_string(), |s| s.label().to_string());
    let mut panel = Panel::new(Tone::Error, "Build Failed")
        .line(format!("Stage: {stage}"))
        .line(format!("Code:  {}", failure.error.code));
    if let Some(suggestion) = &failure.error.suggestion {
        panel = panel.line(suggestion.as_str());
    }
    panel.eprint();
}

fn run_doctor(project_root: &Path, config: &Config, json: bool) -> i32 {
    let report = HealthChecker::new()
        .with_react_native_checks(project_root, &config.schema.android.dir)
        .run();

    let printed = if json {
        print_report_json(&report)
    } else {
        print_report(&report);
        Ok(())
    };
    if let Err(e) = printed {
        Status::error(&format!("Failed to render report: {e}"));
        return exit_codes::FAILURE;
    }

    if report.status.is_operational() {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    }
}

fn print_report_json(report: &HealthReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_report(report: &HealthReport) {
    Status::header("Environment Check");

    for check in &report.checks {
        let line = match &check.message {
            Some(message) => format!("{}: {message}", check.name),
            None => check.name.clone(),
        };
        match check.status {
            HealthStatus::Healthy => Status::success(&line),
            HealthStatus::Degraded => Status::warning(&line),
            HealthStatus::Unhealthy => Status::error(&line),
        }
    }

    let issues = report.failed_checks().len();
    println!();
    let summary = format!(
        "{} checks, {issues} issue(s), {}ms",
        report.checks.len(),
        report.total_duration_ms
    );
    match report.status {
        HealthStatus::Healthy => Status::success(&summary),
        HealthStatus::Degraded => Status::warning(&summary),
        HealthStatus::Unhealthy => Status::error(&summary),
    }
}
