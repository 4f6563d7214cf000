//! Terminal output utilities for ADK development tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Boxed panels for summaries and remediation hints
//! - Spinners for long-running steps

#![warn(missing_docs)]

pub mod output;
pub mod progress;
