//! React Native Android build-and-package pipeline
//!
//! This crate provides:
//! - Gradle wrapper integration (clean, assemble, forced output removal)
//! - Application name discovery from `app.json` / `package.json`
//! - Sortable minute-granularity timestamps for archive file names
//! - Archiving of built APKs into a dated folder
//! - The build pipeline state machine tying these together

#![warn(missing_docs)]

pub mod archive;
pub mod gradle;
pub mod locator;
pub mod pipeline;
pub mod timestamp;
pub mod types;

pub use archive::{ArchiveDescriptor, ArchiveOutcome, Archiver};
pub use pipeline::{BuildPipeline, NoopObserver, PipelineFailure, PipelineObserver, Stage};
pub use timestamp::{Clock, FixedClock, SystemClock};
pub use types::{BuildRequest, BuildResult, BuildType, Diagnostic, Outcome, Severity};
