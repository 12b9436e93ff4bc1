use crate::output::Output;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner shown while a catalog lookup is pending.
///
/// Only drawn for human output on a terminal; otherwise the lookup is
/// reported through tracing.
pub struct LookupSpinner {
    bar: Option<ProgressBar>,
}

impl LookupSpinner {
    pub fn start(output: &Output, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        if !output.is_human() || output.is_quiet() || !is_interactive() {
            tracing::info!(operation = "lookup", message = %msg, "Lookup started");
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(style);
        bar.set_message(msg);
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar: Some(bar) }
    }

    /// Clear the spinner line before the result is printed.
    pub fn finish(mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for LookupSpinner {
    fn drop(&mut self) {
        self.clear();
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
