//! Core types for filescancrypt.
//!
//! This crate provides the data structures shared by the scanner and the
//! command line front end: the live scan state, configuration, errors and
//! the final report with its encryption estimate.

mod config;
mod error;
mod report;
mod state;

pub use config::{DEFAULT_ENCRYPTION_SPEED, DEFAULT_POLL_INTERVAL, ScanConfig, ScanConfigBuilder};
pub use error::ScanError;
pub use report::{EncryptionEstimate, ScanReport};
pub use state::{BYTES_PER_MB, ScanSnapshot, ScanState, bytes_to_mb};
