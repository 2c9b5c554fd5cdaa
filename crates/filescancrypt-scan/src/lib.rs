//! Directory scanning engine for filescancrypt.
//!
//! A scan is two passes over the same tree. A cheap directory-only pass
//! bounds the progress display, then a [`Traverser`] counts files, folders
//! and bytes into a shared [`ScanState`] while a [`ProgressMonitor`] polls
//! that state on a second thread.
//!
//! # Example
//!
//! ```rust,no_run
//! use filescancrypt_scan::{ScanConfig, ScanSession};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let report = ScanSession::new(config).run().unwrap();
//!
//! println!("Total files: {}", report.total_files);
//! println!("Estimated encryption time: {:.2}s", report.estimate.seconds);
//! ```

mod progress;
mod scanner;
mod session;

pub use progress::{MonitorSummary, ProgressMonitor, status_line};
pub use scanner::{Traverser, count_directories};
pub use session::ScanSession;

// Re-export core types for convenience
pub use filescancrypt_core::{
    EncryptionEstimate, ScanConfig, ScanError, ScanReport, ScanSnapshot, ScanState,
};
