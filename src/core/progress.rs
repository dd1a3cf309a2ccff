//! Spinner shown on stderr while repositories are searched and queried

use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use super::config::{SPINNER_TEMPLATE, SPINNER_TICK_MS};

/// Ticking spinner that is cleared when dropped
///
/// Dropping is the only way to stop it, so early returns and `?` on the
/// error path clear the line exactly once.
pub struct SpinnerGuard {
    bar: ProgressBar,
}

impl SpinnerGuard {
    /// Starts a spinner with `message`; hidden when stderr is not a terminal
    pub fn start(message: &str) -> Result<Self> {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        bar.set_style(create_spinner_style()?);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        Ok(Self { bar })
    }

    /// A spinner that never draws, for quiet runs
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Creates the spinner style
pub(crate) fn create_spinner_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_spinner().template(SPINNER_TEMPLATE)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_style_template_is_valid() {
        assert!(create_spinner_style().is_ok());
    }

    #[test]
    fn test_drop_finishes_the_bar() {
        let guard = SpinnerGuard::hidden();
        let bar = guard.bar.clone();
        assert!(!bar.is_finished());
        drop(guard);
        assert!(bar.is_finished());
    }

    #[test]
    fn test_guard_is_released_on_error_path() {
        fn failing_step(_guard: &SpinnerGuard) -> Result<()> {
            anyhow::bail!("step failed")
        }

        let guard = SpinnerGuard::hidden();
        let bar = guard.bar.clone();
        let result = (|| -> Result<()> {
            let guard = guard;
            failing_step(&guard)?;
            Ok(())
        })();
        assert!(result.is_err());
        assert!(bar.is_finished());
    }
}
