//! Progress bar abstraction that becomes no-op when the `progress` feature is disabled

use crate::corpus::LoadProgress;
use std::time::Duration;

#[cfg(feature = "progress")]
pub use indicatif::{ProgressBar, ProgressStyle};

#[cfg(not(feature = "progress"))]
pub use self::noop::*;

#[cfg(not(feature = "progress"))]
mod noop {
    use std::time::Duration;

    /// No-op progress bar when `progress` feature is disabled
    #[derive(Clone)]
    pub struct ProgressBar;

    impl ProgressBar {
        pub fn new_spinner() -> Self {
            ProgressBar
        }

        pub fn hidden() -> Self {
            ProgressBar
        }

        pub fn set_style(&self, _style: ProgressStyle) {}
        pub fn set_length(&self, _len: u64) {}
        pub fn set_message(&self, _msg: impl Into<std::borrow::Cow<'static, str>>) {}
        pub fn enable_steady_tick(&self, _interval: Duration) {}
        pub fn inc(&self, _delta: u64) {}
        pub fn finish_with_message(&self, _msg: impl Into<std::borrow::Cow<'static, str>>) {}
    }

    /// No-op progress style
    pub struct ProgressStyle;

    impl ProgressStyle {
        pub fn default_spinner() -> Self {
            ProgressStyle
        }

        pub fn default_bar() -> Self {
            ProgressStyle
        }

        pub fn template(self, _template: &str) -> Result<Self, std::convert::Infallible> {
            Ok(self)
        }

        pub fn progress_chars(self, _chars: &str) -> Self {
            self
        }
    }
}

/// Renders corpus load events on a progress bar.
///
/// Starts as a spinner while files are discovered and switches to a bar
/// once the file count is known.
pub struct LoadProgressBar {
    bar: ProgressBar,
}

impl LoadProgressBar {
    pub fn new(quiet: bool) -> Self {
        if quiet {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message("Discovering files...");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn observe(&self, event: LoadProgress<'_>) {
        match event {
            LoadProgress::Discovered { files } => {
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                {
                    self.bar.set_style(style.progress_chars("█▓▒░  "));
                }
                self.bar.set_length(files as u64);
                self.bar.set_message("Reading files...");
            }
            LoadProgress::FileRead { .. } | LoadProgress::Skipped { .. } => self.bar.inc(1),
            LoadProgress::Finished { files, bytes } => {
                self.bar.finish_with_message(format!(
                    "Loaded {} files ({})",
                    files,
                    crate::index::stats::format_size(bytes)
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_quiet_bar_accepts_events() {
        let progress = LoadProgressBar::new(true);
        progress.observe(LoadProgress::Discovered { files: 2 });
        progress.observe(LoadProgress::FileRead {
            path: Path::new("a.txt"),
            bytes: 10,
        });
        progress.observe(LoadProgress::Finished { files: 1, bytes: 10 });
    }
}
