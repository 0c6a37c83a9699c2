//! Per-container progress bar: posts fetched out of the post budget.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Thin wrapper so the driver can report progress whether or not a bar is shown.
pub struct ProgressScope {
    pb: Option<ProgressBar>,
}

impl ProgressScope {
    pub fn posts(container: &str, budget: u64, enabled: bool) -> Self {
        if !enabled {
            return Self { pb: None };
        }
        let pb = ProgressBar::new(budget);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  elapsed: {elapsed_precise}",
        ) {
            pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        pb.set_message(format!("r/{container}"));
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb: Some(pb) }
    }

    #[inline]
    pub fn inc(&self, delta: u64) {
        if let Some(pb) = &self.pb {
            pb.inc(delta);
        }
    }

    pub fn finish(&self, msg: impl Into<String>) {
        if let Some(pb) = &self.pb {
            pb.finish_with_message(msg.into());
        }
    }
}
