//! Plain-text rendering of the report for `--view text`.

use unicode_width::UnicodeWidthStr;

use report_core::formatting::{format_currency, format_number};
use report_data::analysis::Report;

use crate::components::header::SPARKLES;
use crate::components::highlights::highlight_items;
use crate::tables::{report_tables, truncate, TableData};

/// Render the whole report as aligned plain-text tables.
pub fn render_report(report: &Report) -> String {
    let meta = &report.metadata;

    let mut lines = vec![
        format!("{} RETAIL SALES REPORT {}", SPARKLES, SPARKLES),
        "=".repeat(60),
        format!(
            "Rows loaded: {}  Rows kept: {}  Cancellations: {}",
            format_number(meta.rows_loaded as f64, 0),
            format_number(meta.rows_clean as f64, 0),
            format_number(meta.rows_canceled as f64, 0),
        ),
        format!(
            "Missing CustomerID: {:.2}%  Missing Description: {:.2}%",
            meta.customer_missing_pct, meta.description_missing_pct
        ),
        format!("Total revenue: {}", format_currency(report.total_revenue)),
    ];

    let items = highlight_items(&report.highlights);
    if !items.is_empty() {
        lines.push(String::new());
        lines.extend(
            items
                .into_iter()
                .map(|(label, detail)| format!("  {}: {}", label, detail)),
        );
    }

    let mut out = lines.join("\n");
    out.push('\n');
    for table in report_tables(report) {
        out.push('\n');
        out.push_str(&render_table(&table));
    }
    out
}

/// Render one table with a title line, a header, a rule and padded cells.
pub fn render_table(table: &TableData) -> String {
    let mut out = format!("{}\n", table.title);

    if table.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let widths = table.column_widths();
    push_row(&mut out, &table.headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &table.rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| pad(&truncate(cell, *w), *w))
        .collect();
    out.push_str("  ");
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use report_data::aggregator::DayRevenue;

    #[test]
    fn test_render_table_alignment() {
        let mut table = TableData::new("Revenue by Day of Week", &["Day", "Revenue"]);
        table.push(vec!["Monday".to_string(), "£10.00".to_string()]);
        table.push(vec!["Thursday".to_string(), "£1,234.50".to_string()]);

        let text = render_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Revenue by Day of Week");
        assert_eq!(lines[1], "  Day       Revenue");
        assert_eq!(lines[2], "  --------  ---------");
        assert_eq!(lines[3], "  Monday    £10.00");
        assert_eq!(lines[4], "  Thursday  £1,234.50");
    }

    #[test]
    fn test_render_empty_table() {
        let table = TableData::new("Top 10 Customers by Revenue", &["CustomerID", "Revenue"]);
        assert_eq!(
            render_table(&table),
            "Top 10 Customers by Revenue\n  (no data)\n"
        );
    }

    #[test]
    fn test_pad_counts_display_width() {
        assert_eq!(pad("£1", 4), "£1  ");
    }

    #[test]
    fn test_render_report_includes_every_table() {
        let report = Report {
            total_revenue: 42.0,
            revenue_by_day: vec![DayRevenue {
                day: "Monday".to_string(),
                revenue: 42.0,
            }],
            ..Report::default()
        };
        let text = render_report(&report);
        assert!(text.contains("RETAIL SALES REPORT"));
        assert!(text.contains("Total revenue: £42.00"));
        assert!(text.contains("Revenue by Date\n  (no data)"));
        assert!(text.contains("  Monday  £42.00"));
        assert!(text.contains("Sales Preview"));
    }

    #[test]
    fn test_render_report_header_lines() {
        let text = render_report(&Report::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[2], "Rows loaded: 0  Rows kept: 0  Cancellations: 0");
        assert_eq!(lines[3], "Missing CustomerID: 0.00%  Missing Description: 0.00%");
        assert_eq!(lines[4], "Total revenue: £0.00");
        assert_eq!(lines[5], "");
    }
}
