//! Terminal UI layer for the retail sales report.
//!
//! Provides themes, header and highlight components, chart, table and
//! overview views, the plain-text renderer, and the dashboard event loop
//! built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod overview_view;
pub mod table_view;
pub mod tables;
pub mod text_view;
pub mod themes;

pub use report_data as data;
