//! Reusable UI components for the report dashboard.
//!
//! - [`header`] – title banner with row count and total revenue.
//! - [`highlights`] – one-line takeaways drawn from the report.

pub mod header;
pub mod highlights;
