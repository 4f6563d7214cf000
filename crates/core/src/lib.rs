//! Core utilities for ADK development tools
//!
//! This crate provides shared functionality used by the platform crates and the CLI:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Process execution**: Command execution behind a runner trait, with deadlines
//!   and failure classification
//! - **Configuration**: TOML-based configuration with defaults
//! - **Health checks**: Verify tool dependencies and environment
//!
//! # Example
//!
//! ```rust,no_run
//! use adk_core::health::HealthChecker;
//! use std::path::Path;
//!
//! let report = HealthChecker::new()
//!     .with_react_native_checks(Path::new("."), "android")
//!     .run();
//!
//! if !report.is_healthy() {
//!     eprintln!("Environment issues detected!");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod health;
pub mod process;

pub use error::{Error, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
    pub use crate::health::{HealthChecker, HealthReport, HealthStatus};
    pub use crate::process::{CommandResult, CommandRunner, CommandSpec, FailureKind, SystemRunner};
}
