//! Batch recovery of products whose primary scrape failed.

mod driver;
mod log_scanner;
pub mod report;

pub use driver::{BatchRecovery, RecoveryOutcome};
pub use log_scanner::LogScanner;
pub use report::{render_report, write_report};
