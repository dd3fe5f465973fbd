//! Progress indicator for first-run unpacking

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner drawn on stderr while the payload is copied.
///
/// Silent when stderr is not an interactive terminal, so tools that parse
/// the toolchain's output never see launcher chatter.
pub struct InstallSpinner {
    bar: Option<ProgressBar>,
}

impl InstallSpinner {
    /// Start the spinner (no-op in non-interactive mode)
    pub fn start(ctx: &UiContext, message: &str) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new_spinner();
            if let Ok(spinner_style) = ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}  {elapsed:.dim}")
            {
                bar.set_style(spinner_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            bar.set_message(message.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };
        Self { bar }
    }

    /// Update the message shown next to the spinner
    pub fn message(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Finish with a success line
    pub fn finish(mut self, message: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    /// Finish with a failure line
    pub fn fail(mut self, message: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
            eprintln!("{} {}", style("✗").red(), message);
        }
    }
}

impl Drop for InstallSpinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
