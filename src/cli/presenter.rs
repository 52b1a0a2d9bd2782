//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const BAR_WIDTH: usize = 20;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        match self.spinner {
            Some(ref spinner) => spinner.println(format!("{} {}", "ℹ".cyan(), message)),
            None => eprintln!("{} {}", "ℹ".cyan(), message),
        }
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (replies and query results)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Format a position against a total as a bar.
    /// An unknown total (0) shows the position only.
    pub fn format_progress(&self, elapsed_ms: u64, total_ms: u64) -> String {
        let elapsed = format_clock(elapsed_ms);
        if total_ms == 0 {
            return format!("[{}] {}", "░".repeat(BAR_WIDTH), elapsed);
        }

        let fraction = (elapsed_ms as f64 / total_ms as f64).min(1.0);
        let filled = (fraction * BAR_WIDTH as f64) as usize;

        format!(
            "[{}{}] {} / {}",
            "█".repeat(filled).cyan(),
            "░".repeat(BAR_WIDTH - filled),
            elapsed,
            format_clock(total_ms)
        )
    }

    /// Format an input level 0.0-1.0 as a short meter
    pub fn format_level(&self, level: f32) -> String {
        const METER_WIDTH: usize = 10;
        let filled = ((level.clamp(0.0, 1.0) * METER_WIDTH as f32).round()) as usize;
        format!(
            "{}{}",
            "▮".repeat(filled).green(),
            "▯".repeat(METER_WIDTH - filled)
        )
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// m:ss.t clock for playback and recording positions
fn format_clock(ms: u64) -> String {
    let tenths = (ms / 100) % 10;
    let secs = ms / 1000;
    format!("{}:{:02}.{}", secs / 60, secs % 60, tenths)
}
