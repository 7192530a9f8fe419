//! Overview page for the report dashboard.
//!
//! Shows the header, how many rows each cleaning step removed, the share of
//! missing customer ids and descriptions, and the report highlights.

use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};

use report_core::formatting::format_number;
use report_data::analysis::Report;

use crate::components::header::Header;
use crate::components::highlights::highlight_lines;
use crate::themes::Theme;

/// Width of the missing-value bars.
const BAR_WIDTH: usize = 40;

/// Build a bar string of `width` cells, capping fill at 100 %.
///
/// Returns `(filled, empty)` ready for display.
fn build_bar(pct: f64, width: usize) -> (String, String) {
    let capped = pct.clamp(0.0, 100.0);
    let filled = ((capped / 100.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    ("█".repeat(filled), "░".repeat(empty))
}

/// `label` padded to a fixed column so the values line up.
fn count_row<'a>(label: &str, value: usize, theme: &'a Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<34}", label), theme.label),
        Span::styled(format!("{:>12}", format_number(value as f64, 0)), theme.value),
    ])
}

fn missing_row<'a>(label: &str, pct: f64, theme: &'a Theme) -> Line<'a> {
    let (filled, empty) = build_bar(pct, BAR_WIDTH);
    let style = if pct >= 20.0 {
        theme.error
    } else if pct >= 5.0 {
        theme.warning
    } else {
        theme.success
    };
    Line::from(vec![
        Span::styled(format!("  {:<14}", label), theme.label),
        Span::styled("[", theme.dim),
        Span::styled(filled, style),
        Span::styled(empty, theme.dim),
        Span::styled("] ", theme.dim),
        Span::styled(format!("{:>6.2}%", pct), style),
    ])
}

/// Build every line of the overview page (extracted for testability).
pub fn build_overview_lines<'a>(report: &Report, theme: &'a Theme) -> Vec<Line<'a>> {
    let meta = &report.metadata;
    let cleaning = &meta.cleaning;

    let mut lines: Vec<Line<'a>> =
        Header::new(meta.rows_clean, report.total_revenue, theme).to_lines();

    lines.push(Line::from(Span::styled("Cleaning", theme.bold)));
    lines.push(count_row("Rows loaded", meta.rows_loaded, theme));
    lines.push(count_row(
        "Missing customer or description",
        cleaning.missing_customer_or_description,
        theme,
    ));
    lines.push(count_row("Unspecified country", cleaning.unspecified_country, theme));
    lines.push(count_row("Non-product line items", cleaning.excluded_description, theme));
    lines.push(count_row("Rows kept", meta.rows_clean, theme));
    lines.push(count_row("Cancellations among kept rows", meta.rows_canceled, theme));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Missing values", theme.bold)));
    lines.push(missing_row("CustomerID", meta.customer_missing_pct, theme));
    lines.push(missing_row("Description", meta.description_missing_pct, theme));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Highlights", theme.bold)));
    lines.extend(highlight_lines(&report.highlights, theme));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("←/→ or Tab", theme.info),
        Span::styled(" switch pages | ", theme.dim),
        Span::styled("q", theme.info),
        Span::styled(" or Ctrl+C to exit", theme.dim),
    ]));

    lines
}

/// Render the overview page into `area`.
pub fn render_overview_view(frame: &mut Frame, area: Rect, report: &Report, theme: &Theme) {
    let lines = build_overview_lines(report, theme);
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
