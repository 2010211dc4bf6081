//! Sweep progress bar on stderr.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} reads ({eta})";

/// Progress over the reads of a sweep.
pub struct SweepProgress {
    bar: ProgressBar,
}

impl SweepProgress {
    /// Progress over `total` reads; drawn on stderr unless `hidden`.
    #[must_use]
    pub fn new(total: u64, hidden: bool) -> Self {
        let target = if hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        let bar = ProgressBar::with_draw_target(Some(total), target);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    /// Record one completed read.
    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Reads completed so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Run `f` with the bar cleared, so stdout lines don't interleave with it.
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.bar.suspend(f)
    }

    /// Finish and remove the bar.
    pub fn finish(&self) {
        tracing::debug!(reads = self.bar.position(), "sweep progress finished");
        self.bar.finish_and_clear();
    }

    /// Leave the bar in place with a message.
    pub fn abandon(&self, msg: &'static str) {
        tracing::warn!(reads = self.bar.position(), reason = msg, "sweep abandoned");
        self.bar.abandon_with_message(msg);
    }
}
