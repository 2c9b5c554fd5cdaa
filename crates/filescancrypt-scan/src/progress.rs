//! Live progress display driven by polling the shared scan state.

use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use filescancrypt_core::{ScanSnapshot, ScanState};

const BAR_TEMPLATE: &str =
    "{prefix:.cyan} {percent:>3}% [{bar:40.cyan/blue}] {pos}/{len} dirs | {msg}";

/// What the monitor last displayed.
#[derive(Debug, Clone, Copy)]
pub struct MonitorSummary {
    /// Number of polls made before completion was observed.
    pub polls: u64,
    /// Bar position when the monitor finished.
    pub position: u64,
    /// Snapshot behind the final annotation.
    pub last: ScanSnapshot,
}

/// Polls a [`ScanState`] at a fixed interval and renders a progress bar
/// bounded by a precomputed directory count.
///
/// The monitor never writes to the state. It stops once it observes the
/// completion flag, after one last update so a trailing increment is not
/// lost.
pub struct ProgressMonitor {
    bar: ProgressBar,
    interval: Duration,
}

impl ProgressMonitor {
    /// Create a monitor that draws to stderr.
    pub fn new(total_directories: u64, interval: Duration) -> Self {
        let bar = ProgressBar::new(total_directories);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█░░"),
        );
        bar.set_prefix("Scanning directories");
        Self { bar, interval }
    }

    /// Create a monitor that tracks progress without drawing anything.
    pub fn hidden(total_directories: u64, interval: Duration) -> Self {
        let bar =
            ProgressBar::with_draw_target(Some(total_directories), ProgressDrawTarget::hidden());
        Self { bar, interval }
    }

    /// Poll `state` until the scan completes.
    pub fn run(self, state: &ScanState) -> MonitorSummary {
        let mut last_entered = 0;
        let mut polls = 0;

        while !state.is_complete() {
            last_entered = self.update(last_entered, &state.snapshot());
            polls += 1;
            thread::sleep(self.interval);
        }

        let last = state.snapshot();
        self.update(last_entered, &last);
        self.bar.finish();

        MonitorSummary {
            polls,
            position: self.bar.position(),
            last,
        }
    }

    /// Advance by the directories entered since the previous poll and
    /// refresh the annotation. Returns the new high-water mark.
    fn update(&self, last_entered: u64, snapshot: &ScanSnapshot) -> u64 {
        let delta = snapshot.directories_entered.saturating_sub(last_entered);
        if delta > 0 {
            self.bar.inc(delta);
        }
        self.bar.set_message(status_line(snapshot));
        last_entered.max(snapshot.directories_entered)
    }
}

/// Annotation shown next to the bar.
pub fn status_line(snapshot: &ScanSnapshot) -> String {
    format!(
        "Files: {} | Size: {:.2} MB",
        snapshot.files_visited,
        snapshot.size_mb()
    )
}
