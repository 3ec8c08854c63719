//! Bulk simulation over independent runs

pub mod bulk;

pub use bulk::{flatten_runs, run_bulk, BulkSummary};
