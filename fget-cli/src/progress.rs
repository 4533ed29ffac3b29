use fget_core::progress::ProgressObserver;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Renders download progress as a byte-count bar on stderr.
///
/// Workers report from multiple tasks concurrently; `ProgressBar` is
/// internally synchronized, so `inc` calls can interleave freely.
pub struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        ConsoleProgress {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ConsoleProgress {
    fn start(&self, total: Option<u64>) {
        match total {
            Some(total) => {
                self.bar.set_style(
                    ProgressStyle::with_template(
                        "{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                self.bar.set_length(total);
            }
            None => {
                self.bar.set_style(ProgressStyle::default_spinner());
            }
        }
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    fn add(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
