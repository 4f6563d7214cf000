//! Progress indicators
//!
//! Spinners for long-running steps such as Gradle invocations.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// A spinner that draws nothing, for `--quiet`
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

fn finish(pb: &ProgressBar, line: String) {
    pb.set_style(ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    pb.finish_with_message(line);
}

/// Finish a spinner with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    finish(pb, format!("{} {}", "✓".green(), message.green()));
}

/// Finish a spinner with a warning message
pub fn finish_warning(pb: &ProgressBar, message: &str) {
    finish(pb, format!("{} {}", "⚠".yellow(), message.yellow()));
}

/// Finish a spinner with an error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    finish(pb, format!("{} {}", "✗".red(), message.red()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_creation() {
        let pb = spinner("Testing...");
        finish_success(&pb, "done");
        assert!(pb.is_finished());
    }

    #[test]
    fn test_hidden_finish() {
        let pb = hidden();
        finish_warning(&pb, "careful");
        assert!(pb.is_finished());
    }
}
