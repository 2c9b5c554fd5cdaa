//! One scan run: pre-pass, concurrent traversal and monitoring, report.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{error, info, warn};

use filescancrypt_core::{ScanConfig, ScanError, ScanReport, ScanState};

use crate::progress::ProgressMonitor;
use crate::scanner::{Traverser, count_directories};

/// Runs the two-pass scan described by a [`ScanConfig`].
pub struct ScanSession {
    config: ScanConfig,
}

impl ScanSession {
    /// Create a session for `config`.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Run the scan to completion.
    ///
    /// Fails only before any scanning starts: invalid configuration, a
    /// missing root, or a failed directory pre-pass. A traversal that breaks
    /// off midway still yields a report with the partial totals and the
    /// error attached.
    pub fn run(&self) -> Result<ScanReport, ScanError> {
        self.config.validate()?;
        let root = &self.config.root;

        match root.try_exists() {
            Ok(true) => {}
            Ok(false) => return Err(ScanError::NotFound { path: root.clone() }),
            Err(err) => return Err(ScanError::io(root, err)),
        }

        let start = Instant::now();

        let total_directories = count_directories(root)?;
        info!(root = %root.display(), total_directories, "directory pre-pass finished");

        let state = Arc::new(ScanState::new());
        let traverser = Traverser::new(root, Arc::clone(&state));
        let monitor = if self.config.show_progress {
            ProgressMonitor::new(total_directories, self.config.poll_interval)
        } else {
            ProgressMonitor::hidden(total_directories, self.config.poll_interval)
        };

        let scan_result = thread::scope(|s| {
            let scan = s.spawn(|| traverser.run());
            let progress = s.spawn(|| monitor.run(&state));

            let scan_result = scan.join().unwrap_or_else(|_| {
                error!("traversal thread panicked");
                Err(ScanError::Other {
                    message: "traversal thread panicked".to_string(),
                })
            });
            if progress.join().is_err() {
                warn!("progress monitor panicked");
            }
            scan_result
        });

        // Both units are joined, so the counters are settled.
        let snapshot = state.snapshot();
        let elapsed = start.elapsed();
        info!(
            files = snapshot.files_visited,
            dirs = snapshot.dirs_visited,
            bytes = snapshot.bytes_visited,
            read_errors = snapshot.read_errors,
            "scan finished in {:.2}s",
            elapsed.as_secs_f64()
        );

        let report =
            ScanReport::from_snapshot(root, &snapshot, self.config.encryption_speed, elapsed);
        Ok(match scan_result {
            Ok(()) => report,
            Err(err) => report.with_scan_error(err),
        })
    }
}
