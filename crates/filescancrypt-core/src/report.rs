//! Final scan report and the derived encryption estimate.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::ScanSnapshot;

/// Projected time to encrypt a data volume at a fixed throughput.
///
/// Nothing is encrypted; this is `size / speed` and nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncryptionEstimate {
    /// Throughput the estimate assumes, in MB/s.
    pub speed_mbps: f64,
    /// Estimated seconds, zero when there is no data.
    pub seconds: f64,
    /// Estimated minutes, always `seconds / 60`.
    pub minutes: f64,
}

impl EncryptionEstimate {
    /// Estimate the time to encrypt `size_mb` megabytes at `speed_mbps`.
    pub fn new(size_mb: f64, speed_mbps: f64) -> Self {
        let seconds = if size_mb > 0.0 {
            size_mb / speed_mbps
        } else {
            0.0
        };
        Self {
            speed_mbps,
            seconds,
            minutes: seconds / 60.0,
        }
    }
}

/// Everything printed at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Root path that was scanned.
    pub root: PathBuf,
    /// Total number of files.
    pub total_files: u64,
    /// Total number of subdirectories, root excluded.
    pub total_dirs: u64,
    /// Total size of stat-able files in MB.
    pub size_mb: f64,
    /// Directories the traversal actually entered.
    pub directories_entered: u64,
    /// Errors absorbed during the walk.
    pub read_errors: u64,
    /// Wall-clock time for the whole run.
    pub elapsed: Duration,
    /// Derived encryption estimate.
    pub estimate: EncryptionEstimate,
    /// Top-level traversal failure, if the walk aborted early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_error: Option<String>,
}

impl ScanReport {
    /// Build a report from the settled counters of a finished scan.
    pub fn from_snapshot(
        root: impl Into<PathBuf>,
        snapshot: &ScanSnapshot,
        speed_mbps: f64,
        elapsed: Duration,
    ) -> Self {
        let size_mb = snapshot.size_mb();
        Self {
            root: root.into(),
            total_files: snapshot.files_visited,
            total_dirs: snapshot.dirs_visited,
            size_mb,
            directories_entered: snapshot.directories_entered,
            read_errors: snapshot.read_errors,
            elapsed,
            estimate: EncryptionEstimate::new(size_mb, speed_mbps),
            scan_error: None,
        }
    }

    /// Attach a top-level traversal error.
    pub fn with_scan_error(mut self, error: impl ToString) -> Self {
        self.scan_error = Some(error.to_string());
        self
    }

    /// Whether there is any data to encrypt.
    pub fn has_data(&self) -> bool {
        self.size_mb > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_law() {
        let estimate = EncryptionEstimate::new(6.0, 50.0);
        assert!((estimate.seconds - 0.12).abs() < 1e-12);
        assert_eq!(estimate.minutes, estimate.seconds / 60.0);
        assert_eq!(format!("{:.2}", estimate.minutes), "0.00");
    }

    #[test]
    fn test_estimate_zero_size() {
        let estimate = EncryptionEstimate::new(0.0, 50.0);
        assert_eq!(estimate.seconds, 0.0);
        assert_eq!(estimate.minutes, 0.0);
    }

    #[test]
    fn test_report_from_snapshot() {
        let snapshot = ScanSnapshot {
            files_visited: 3,
            dirs_visited: 1,
            bytes_visited: 6 * 1024 * 1024,
            directories_entered: 2,
            read_errors: 0,
            complete: true,
        };
        let report =
            ScanReport::from_snapshot("/data", &snapshot, 50.0, Duration::from_millis(250));

        assert_eq!(report.total_files, 3);
        assert_eq!(report.total_dirs, 1);
        assert_eq!(format!("{:.2}", report.size_mb), "6.00");
        assert_eq!(format!("{:.2}", report.estimate.seconds), "0.12");
        assert!(report.has_data());
        assert!(report.scan_error.is_none());
    }

    #[test]
    fn test_report_without_data() {
        let report = ScanReport::from_snapshot(
            "/empty",
            &ScanSnapshot::default(),
            50.0,
            Duration::ZERO,
        )
        .with_scan_error("Permission denied: /empty");

        assert!(!report.has_data());
        assert_eq!(report.estimate.seconds, 0.0);
        assert_eq!(report.scan_error.as_deref(), Some("Permission denied: /empty"));
    }
}
