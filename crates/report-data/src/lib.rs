//! Data pipeline for the retail sales report.
//!
//! Responsible for reading the transaction CSV, cleaning it, deriving the
//! revenue and calendar fields, and building every aggregation table the
//! report shows.

pub mod aggregator;
pub mod analysis;
pub mod cleaner;
pub mod deriver;
pub mod reader;

pub use report_core as core;
