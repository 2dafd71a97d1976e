//! Spinner for the key derivation wait, using indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;

/// A spinner for indeterminate progress.
///
/// Draws to stderr and only when animation is allowed, so JSON and piped
/// output stay clean.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Create and start a spinner with the given message.
    pub fn start(ctx: &UiContext, message: &str) -> Self {
        if !ctx.allows_animation() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        let template = if ctx.unicode {
            "{spinner:.cyan} {msg}..."
        } else {
            "{spinner} {msg}..."
        };
        let tick_strings: &[&str] = if ctx.unicode {
            &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]
        } else {
            &["|", "/", "-", "\\", ""]
        };
        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            bar.set_style(style.tick_strings(tick_strings));
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar: Some(bar) }
    }

    /// Clear the spinner line.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::mode::OutputMode;

    #[test]
    fn test_spinner_disabled_without_tty() {
        let ctx = UiContext {
            is_tty: false,
            color: false,
            unicode: true,
            mode: OutputMode::Plain,
        };
        let spinner = Spinner::start(&ctx, "Deriving key");
        assert!(spinner.bar.is_none());
        spinner.finish();
    }
}
