//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use console::measure_text_width;
use owo_colors::OwoColorize;
use std::fmt::Write as _;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print a dimmed note
    pub fn note(message: &str) {
        println!("{}", message.dimmed());
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(measure_text_width(message)));
    }
}

/// Colour scheme of a [`Panel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Green border
    Success,
    /// Red border
    Error,
    /// Yellow border
    Warning,
}

/// A rounded box around a title and a few lines of text
///
/// ```text
/// ╭──────────────────╮
/// │ Build Complete!  │
/// │ app-release.apk  │
/// ╰──────────────────╯
/// ```
#[derive(Debug, Clone)]
pub struct Panel {
    tone: Tone,
    title: String,
    lines: Vec<String>,
}

impl Panel {
    /// Create a panel with a title line
    pub fn new(tone: Tone, title: impl Into<String>) -> Self {
        Self {
            tone,
            title: title.into(),
            lines: Vec::new(),
        }
    }

    /// Append a body line
    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.extend(line.into().lines().map(String::from));
        self
    }

    /// Render to a string, including ANSI colours
    pub fn render(&self) -> String {
        let title = match self.tone {
            Tone::Success => self.title.green().bold().to_string(),
            Tone::Error => self.title.red().bold().to_string(),
            Tone::Warning => self.title.yellow().bold().to_string(),
        };
        let body: Vec<String> = std::iter::once(title)
            .chain(self.lines.iter().cloned())
            .collect();
        let width = body.iter().map(|l| measure_text_width(l)).max().unwrap_or(0);

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(&format!("╭{}╮", "─".repeat(width + 2))));
        for line in &body {
            let pad = width - measure_text_width(line);
            let _ = writeln!(
                out,
                "{} {}{} {}",
                self.paint("│"),
                line,
                " ".repeat(pad),
                self.paint("│")
            );
        }
        let _ = write!(out, "{}", self.paint(&format!("╰{}╯", "─".repeat(width + 2))));
        out
    }

    /// Print to stdout with a blank line above
    pub fn print(&self) {
        println!();
        println!("{}", self.render());
    }

    /// Print to stderr with a blank line above
    pub fn eprint(&self) {
        eprintln!();
        eprintln!("{}", self.render());
    }

    fn paint(&self, border: &str) -> String {
        match self.tone {
            Tone::Success => border.green().to_string(),
            Tone::Error => border.red().to_string(),
            Tone::Warning => border.yellow().to_string(),
        }
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{mins}m {remaining_secs:.0}s")
    }
}

/// Capitalise the first letter (`release` -> `Release`)
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;
    use std::time::Duration;

    #[test]
    fn test_panel_render_shape() {
        let panel = Panel::new(Tone::Success, "Build Complete!")
            .line("Your release APK is ready at:")
            .line("android/app/build/outputs/apk/release/app-release.apk");
        let rendered = strip_ansi_codes(&panel.render()).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with('╭') && lines[0].ends_with('╮'));
        assert!(lines[4].starts_with('╰') && lines[4].ends_with('╯'));
        assert!(lines[1].contains("Build Complete!"));
        let width = measure_text_width(lines[0]);
        assert!(lines.iter().all(|l| measure_text_width(l) == width));
    }

    #[test]
    fn test_panel_splits_multiline() {
        let panel = Panel::new(Tone::Warning, "Hint").line("one\ntwo");
        let rendered = strip_ansi_codes(&panel.render()).to_string();
        assert_eq!(rendered.lines().count(), 5);
    }

    #[test]
    fn test_format_duration_ms() {
        let d = Duration::from_millis(500);
        assert_eq!(format_duration(d), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        let d = Duration::from_secs_f32(5.5);
        assert_eq!(format_duration(d), "5.5s");
    }

    #[test]
    fn test_format_duration_mins() {
        let d = Duration::from_secs(125);
        assert_eq!(format_duration(d), "2m 5s");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("release"), "Release");
        assert_eq!(capitalize(""), "");
    }
}
