//! Plain-text tables built from the report.
//!
//! Every aggregation is turned into a [`TableData`] of preformatted cells so
//! the dashboard and the text view print the same values.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use report_core::formatting::{format_currency, format_number};
use report_core::models::{RawTransaction, SalesRecord, Transaction};
use report_core::statistics::{ColumnSummary, Summary};
use report_data::analysis::Report;

/// Display format for invoice timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Widest a single column is allowed to grow before truncation.
pub const MAX_COLUMN_WIDTH: usize = 36;

// ── TableData ─────────────────────────────────────────────────────────────────

/// A titled table of preformatted cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display width of every column: the widest header or cell, capped at
    /// [`MAX_COLUMN_WIDTH`].
    pub fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }
}

/// Cut `text` to at most `max_width` terminal columns, ending in `…` when
/// anything was dropped.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Report tables ─────────────────────────────────────────────────────────────

/// Every report table in presentation order.
pub fn report_tables(report: &Report) -> Vec<TableData> {
    vec![
        summary_table(&report.summary),
        missing_values_table(report),
        revenue_by_date_table(report),
        top_countries_table(report),
        top_products_table(report),
        product_quantities_table(report),
        product_unit_prices_table(report),
        top_customers_table(report),
        revenue_by_day_table(report),
        revenue_by_hour_table(report),
        cancellations_table(report),
        sales_preview_table(&report.sales_preview),
    ]
}

/// Descriptive statistics laid out with one column per numeric field.
pub fn summary_table(summary: &[ColumnSummary]) -> TableData {
    let mut headers = vec![String::new()];
    headers.extend(summary.iter().map(|c| c.column.clone()));
    let mut table = TableData {
        title: "Summary Statistics".to_string(),
        headers,
        rows: Vec::new(),
    };
    if summary.is_empty() {
        return table;
    }

    table.push(stat_row("count", summary, |s| format_number(s.count as f64, 0)));
    table.push(stat_row("mean", summary, |s| format_number(s.mean, 2)));
    table.push(stat_row("std", summary, |s| {
        s.std
            .map(|v| format_number(v, 2))
            .unwrap_or_else(|| "NaN".to_string())
    }));
    table.push(stat_row("min", summary, |s| format_number(s.min, 2)));
    table.push(stat_row("25%", summary, |s| format_number(s.p25, 2)));
    table.push(stat_row("50%", summary, |s| format_number(s.p50, 2)));
    table.push(stat_row("75%", summary, |s| format_number(s.p75, 2)));
    table.push(stat_row("max", summary, |s| format_number(s.max, 2)));
    table
}

fn stat_row(
    name: &str,
    summary: &[ColumnSummary],
    value: impl Fn(&Summary) -> String,
) -> Vec<String> {
    let mut row = vec![name.to_string()];
    row.extend(summary.iter().map(|c| value(&c.summary)));
    row
}

pub fn missing_values_table(report: &Report) -> TableData {
    let mut table = TableData::new("Missing Values", &["Feature", "Missing"]);
    for row in &report.missing_values {
        table.push(vec![row.feature.clone(), format_number(row.missing as f64, 0)]);
    }
    table
}

pub fn revenue_by_date_table(report: &Report) -> TableData {
    let mut table = TableData::new("Revenue by Date", &["Date", "Revenue"]);
    for row in &report.revenue_by_date {
        table.push(vec![row.date.clone(), format_currency(row.revenue)]);
    }
    table
}

pub fn top_countries_table(report: &Report) -> TableData {
    let mut table = TableData::new("Top 10 Revenue by Country", &["Country", "Revenue"]);
    for row in &report.top_countries {
        table.push(vec![row.country.clone(), format_currency(row.revenue)]);
    }
    table
}

pub fn top_products_table(report: &Report) -> TableData {
    let mut table = TableData::new(
        "Top 20 Products by Revenue",
        &["StockCode", "Description", "Revenue"],
    );
    for row in &report.top_products {
        table.push(vec![
            row.stock_code.clone(),
            row.description.clone(),
            format_currency(row.revenue),
        ]);
    }
    table
}

pub fn product_quantities_table(report: &Report) -> TableData {
    let mut table = TableData::new(
        "Quantity Sold of Top 20 Products",
        &["StockCode", "Description", "Revenue", "Sales"],
    );
    for row in &report.product_quantities {
        table.push(vec![
            row.stock_code.clone(),
            row.description.clone(),
            format_currency(row.revenue),
            format_number(row.sales as f64, 0),
        ]);
    }
    table
}

pub fn product_unit_prices_table(report: &Report) -> TableData {
    let mut table = TableData::new(
        "Unit Price of Top 20 Products",
        &["StockCode", "Description", "UnitPrice"],
    );
    for row in &report.product_unit_prices {
        table.push(vec![
            row.stock_code.clone(),
            row.description.clone(),
            format_currency(row.unit_price),
        ]);
    }
    table
}

pub fn top_customers_table(report: &Report) -> TableData {
    let mut table = TableData::new("Top 10 Customers by Revenue", &["CustomerID", "Revenue"]);
    for row in &report.top_customers {
        table.push(vec![row.customer_id.clone(), format_currency(row.revenue)]);
    }
    table
}

pub fn revenue_by_day_table(report: &Report) -> TableData {
    let mut table = TableData::new("Revenue by Day of Week", &["Day", "Revenue"]);
    for row in &report.revenue_by_day {
        table.push(vec![row.day.clone(), format_currency(row.revenue)]);
    }
    table
}

pub fn revenue_by_hour_table(report: &Report) -> TableData {
    let mut table = TableData::new("Revenue by Hour of Day", &["Hour", "Revenue"]);
    for row in &report.revenue_by_hour {
        table.push(vec![row.label.clone(), format_currency(row.revenue)]);
    }
    table
}

pub fn cancellations_table(report: &Report) -> TableData {
    let mut table = TableData::new(
        "Cancelled Orders and Revenue Lost",
        &["Date", "Canceled Orders", "Revenue Lost"],
    );
    for row in &report.cancellations {
        table.push(vec![
            row.date.clone(),
            format_number(row.canceled_orders as f64, 0),
            format_currency(row.revenue_lost),
        ]);
    }
    table
}

pub fn sales_preview_table(records: &[SalesRecord]) -> TableData {
    let mut table = TableData::new(
        "Sales Preview",
        &[
            "InvoiceNo",
            "StockCode",
            "Description",
            "Quantity",
            "InvoiceDate",
            "UnitPrice",
            "CustomerID",
            "Country",
            "Revenue",
            "Year",
            "Month",
            "Date",
            "Day",
            "Hour",
        ],
    );
    for r in records {
        let mut row = transaction_cells(&r.transaction);
        row.extend([
            format_number(r.revenue, 2),
            r.year.to_string(),
            r.month.clone(),
            r.date.clone(),
            r.day.clone(),
            r.hour.to_string(),
        ]);
        table.push(row);
    }
    table
}

// ── Dataset viewer tables ─────────────────────────────────────────────────────

const DATASET_HEADERS: [&str; 8] = [
    "InvoiceNo",
    "StockCode",
    "Description",
    "Quantity",
    "InvoiceDate",
    "UnitPrice",
    "CustomerID",
    "Country",
];

/// One page of cleaned rows for the dataset viewer.
pub fn transactions_table(title: &str, rows: &[&Transaction]) -> TableData {
    let mut table = TableData::new(title, &DATASET_HEADERS);
    for t in rows {
        table.push(transaction_cells(t));
    }
    table
}

/// One page of raw rows; missing cells print as `NaN`.
pub fn raw_transactions_table(title: &str, rows: &[RawTransaction]) -> TableData {
    fn text(v: &Option<String>) -> String {
        v.clone().unwrap_or_else(|| "NaN".to_string())
    }
    fn num<T: ToString>(v: &Option<T>) -> String {
        v.as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "NaN".to_string())
    }

    let mut table = TableData::new(title, &DATASET_HEADERS);
    for r in rows {
        table.push(vec![
            text(&r.invoice_no),
            text(&r.stock_code),
            text(&r.description),
            num(&r.quantity),
            text(&r.invoice_date),
            num(&r.unit_price),
            num(&r.customer_id),
            text(&r.country),
        ]);
    }
    table
}

fn transaction_cells(t: &Transaction) -> Vec<String> {
    vec![
        t.invoice_no.clone(),
        t.stock_code.clone(),
        t.description.clone(),
        t.quantity.to_string(),
        t.invoice_date.format(TIMESTAMP_FORMAT).to_string(),
        format_number(t.unit_price, 2),
        t.customer_id.to_string(),
        t.country.clone(),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use report_data::aggregator::{CountryRevenue, HourRevenue};

    fn sample_report() -> Report {
        Report {
            total_revenue: 146.58,
            top_countries: vec![
                CountryRevenue {
                    country: "Germany".to_string(),
                    revenue: 90.0,
                },
                CountryRevenue {
                    country: "United Kingdom".to_string(),
                    revenue: 56.58,
                },
            ],
            revenue_by_hour: vec![HourRevenue {
                hour: 8,
                label: "8:00".to_string(),
                revenue: 1234.5,
            }],
            ..Report::default()
        }
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("JAM", 10), "JAM");
    }

    #[test]
    fn test_truncate_long_text_gets_ellipsis() {
        let out = truncate("WHITE HANGING HEART T-LIGHT HOLDER", 10);
        assert_eq!(out, "WHITE HAN…");
        assert_eq!(out.width(), 10);
    }

    #[test]
    fn test_truncate_zero_width() {
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_country_table_uses_currency() {
        let table = top_countries_table(&sample_report());
        assert_eq!(table.headers, vec!["Country", "Revenue"]);
        assert_eq!(table.rows[0], vec!["Germany", "£90.00"]);
        assert_eq!(table.rows[1][1], "£56.58");
    }

    #[test]
    fn test_hour_table_uses_label() {
        let table = revenue_by_hour_table(&sample_report());
        assert_eq!(table.rows, vec![vec!["8:00".to_string(), "£1,234.50".to_string()]]);
    }

    #[test]
    fn test_column_widths() {
        let table = top_countries_table(&sample_report());
        // "United Kingdom" is 14 wide, "Revenue" is 7.
        assert_eq!(table.column_widths(), vec![14, 7]);
    }

    #[test]
    fn test_column_widths_are_capped() {
        let mut table = TableData::new("t", &["Description"]);
        table.push(vec!["X".repeat(100)]);
        assert_eq!(table.column_widths(), vec![MAX_COLUMN_WIDTH]);
    }

    #[test]
    fn test_summary_table_layout() {
        let summary = vec![ColumnSummary {
            column: "Quantity".to_string(),
            summary: Summary::describe([1.0]).unwrap(),
        }];
        let table = summary_table(&summary);
        assert_eq!(table.headers, vec!["", "Quantity"]);
        assert_eq!(table.rows.len(), 8);
        assert_eq!(table.rows[0], vec!["count", "1"]);
        assert_eq!(table.rows[2], vec!["std", "NaN"]);
    }

    #[test]
    fn test_summary_table_empty() {
        assert!(summary_table(&[]).is_empty());
    }

    #[test]
    fn test_report_tables_cover_every_aggregation() {
        let tables = report_tables(&Report::default());
        assert_eq!(tables.len(), 12);
        assert!(tables.iter().all(|t| t.is_empty()));
    }

    #[test]
    fn test_raw_table_marks_missing_cells() {
        let raw = RawTransaction {
            invoice_no: Some("536365".to_string()),
            quantity: Some(6),
            ..RawTransaction::default()
        };
        let table = raw_transactions_table("Raw", &[raw]);
        assert_eq!(table.rows[0][0], "536365");
        assert_eq!(table.rows[0][2], "NaN");
        assert_eq!(table.rows[0][3], "6");
        assert_eq!(table.rows[0][6], "NaN");
    }
}
