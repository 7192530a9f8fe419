//! Core domain types for the retail sales report.
//!
//! Holds the transaction record shapes, the shared error type, calendar
//! labels and their canonical orderings, number formatting, descriptive
//! statistics and command-line settings.

pub mod calendar;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod statistics;

pub use error::{ReportError, Result};
