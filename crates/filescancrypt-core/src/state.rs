//! Shared counters written by the traverser and read by the progress monitor.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Bytes per megabyte used for every size shown to the user.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a byte count to megabytes.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Live state of one scan run.
///
/// Only the traverser writes to it; any number of observers may read it.
/// Counters use relaxed ordering since readers only need eventually
/// consistent values. The completion flag is stored with release ordering
/// and loaded with acquire ordering, so an observer that sees the scan as
/// complete also sees the final counter values.
#[derive(Debug, Default)]
pub struct ScanState {
    files_visited: AtomicU64,
    dirs_visited: AtomicU64,
    bytes_visited: AtomicU64,
    directories_entered: AtomicU64,
    read_errors: AtomicU64,
    scan_complete: AtomicBool,
}

impl ScanState {
    /// Create a fresh state with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one directory the traversal entered, with its immediate
    /// subdirectory and file counts.
    pub fn record_directory(&self, subdirs: u64, files: u64) {
        self.directories_entered.fetch_add(1, Ordering::Relaxed);
        self.dirs_visited.fetch_add(subdirs, Ordering::Relaxed);
        self.files_visited.fetch_add(files, Ordering::Relaxed);
    }

    /// Add the size of a successfully stat'd file.
    pub fn record_file_size(&self, bytes: u64) {
        self.bytes_visited.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record an error that was absorbed during the walk.
    pub fn record_read_error(&self) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Mark the scan complete.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn mark_complete(&self) -> bool {
        !self.scan_complete.swap(true, Ordering::AcqRel)
    }

    /// Whether the traverser has finished.
    pub fn is_complete(&self) -> bool {
        self.scan_complete.load(Ordering::Acquire)
    }

    /// Files seen so far.
    pub fn files_visited(&self) -> u64 {
        self.files_visited.load(Ordering::Relaxed)
    }

    /// Subdirectories seen so far, root excluded.
    pub fn dirs_visited(&self) -> u64 {
        self.dirs_visited.load(Ordering::Relaxed)
    }

    /// Bytes of every file that could be stat'd.
    pub fn bytes_visited(&self) -> u64 {
        self.bytes_visited.load(Ordering::Relaxed)
    }

    /// Directories the traversal has entered.
    pub fn directories_entered(&self) -> u64 {
        self.directories_entered.load(Ordering::Relaxed)
    }

    /// Errors absorbed during the walk.
    pub fn read_errors(&self) -> u64 {
        self.read_errors.load(Ordering::Relaxed)
    }

    /// Copy every field at once.
    ///
    /// The completion flag is read first, so a snapshot that reports
    /// `complete == true` carries the final counter values.
    pub fn snapshot(&self) -> ScanSnapshot {
        let complete = self.is_complete();
        ScanSnapshot {
            files_visited: self.files_visited(),
            dirs_visited: self.dirs_visited(),
            bytes_visited: self.bytes_visited(),
            directories_entered: self.directories_entered(),
            read_errors: self.read_errors(),
            complete,
        }
    }
}

/// Point-in-time copy of a [`ScanState`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub files_visited: u64,
    pub dirs_visited: u64,
    pub bytes_visited: u64,
    pub directories_entered: u64,
    pub read_errors: u64,
    pub complete: bool,
}

impl ScanSnapshot {
    /// Accumulated size in megabytes.
    pub fn size_mb(&self) -> f64 {
        bytes_to_mb(self.bytes_visited)
    }
}
