//! Progress bar for the commit walk

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub struct CommitProgress {
    bar: ProgressBar,
}

impl CommitProgress {
    /// Bar with a known total, or a spinner when the total is unknown.
    pub fn new(total: Option<u64>) -> Self {
        let bar = match total {
            Some(total) => {
                let bar = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {pos}/{len} commits ({per_sec}, eta {eta})")
                {
                    bar.set_style(style.progress_chars("#>-"));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {pos} commits") {
                    bar.set_style(style);
                }
                bar
            }
        };
        Self { bar }
    }

    /// No terminal output; used by tests and non-interactive runs.
    pub fn hidden() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        Self { bar }
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish();
    }

    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
