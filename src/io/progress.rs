//! Terminal progress display for region tasks

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] {{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar counting completed region tasks
///
/// Cloning is cheap and every clone drives the same bar, so workers can
/// report completions concurrently.
#[derive(Clone)]
pub struct MosaicProgress {
    bar: ProgressBar,
}

impl Default for MosaicProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl MosaicProgress {
    /// Create a visible progress bar
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(PROGRESS_STYLE.clone());
        Self { bar }
    }

    /// Create a progress bar that never draws
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Reset the bar for a new batch of `total` tasks
    pub fn start(&self, total: usize, label: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_message(label.to_string());
    }

    /// Record one finished task
    pub fn advance(&self) {
        self.bar.inc(1);
    }

    /// Number of tasks recorded so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Label of the current batch
    pub fn label(&self) -> String {
        self.bar.message()
    }

    /// Number of tasks in the current batch
    pub fn length(&self) -> u64 {
        self.bar.length().unwrap_or(0)
    }

    /// Clear the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
