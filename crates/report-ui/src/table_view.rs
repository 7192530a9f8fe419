//! Table views for the report dashboard.
//!
//! Renders a bordered [`ratatui::widgets::Table`] for any [`TableData`],
//! plus the paged dataset viewer over the raw or cleaned transactions.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use report_core::formatting::format_number;
use report_data::analysis::Analysis;

use crate::tables::{self, truncate, TableData};
use crate::themes::Theme;

/// Render `table` with striped rows inside a bordered block.
///
/// Rows beyond the visible height are clipped by ratatui; callers that page
/// through long tables pass only the visible slice.
pub fn render_table_view(frame: &mut Frame, area: Rect, table: &TableData, theme: &Theme) {
    if table.is_empty() {
        render_no_data(frame, area, &table.title, theme);
        return;
    }

    let widths = table.column_widths();

    let header_cells = table
        .headers
        .iter()
        .map(|h| Cell::from(h.clone()).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cells = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| Cell::from(truncate(cell, *w)));
            Row::new(cells).style(theme.row_style(i))
        })
        .collect();

    let constraints: Vec<Constraint> = widths
        .iter()
        .map(|w| Constraint::Length(*w as u16))
        .collect();

    let widget = Table::new(rows, constraints)
        .header(header)
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", table.title)),
        )
        .style(theme.text);

    frame.render_widget(widget, area);
}

/// Render a placeholder for an aggregation that produced no rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No data for this table", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Every row was filtered out or the join came back empty.",
            theme.dim,
        )),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

// ── Dataset viewer ────────────────────────────────────────────────────────────

/// What the dataset viewer is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetView {
    /// Show cleaned rows with `Quantity > min_quantity`.
    pub min_quantity: i64,
    /// Show the uncleaned table instead of the filtered clean rows.
    pub show_raw: bool,
    /// Index of the first visible row.
    pub offset: usize,
}

/// Rows a bordered table can show in `area`: two border lines and a header.
pub fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}

/// Build the visible page of the dataset viewer.
pub fn dataset_page(analysis: &Analysis, view: &DatasetView, limit: usize) -> TableData {
    if view.show_raw {
        let total = analysis.raw.len();
        let start = view.offset.min(total);
        let end = (start + limit).min(total);
        let title = page_title("Raw Dataset", start, end, total);
        tables::raw_transactions_table(&title, &analysis.raw.rows[start..end])
    } else {
        let filtered = analysis.clean.filter_quantity_above(view.min_quantity);
        let total = filtered.len();
        let start = view.offset.min(total);
        let end = (start + limit).min(total);
        let title = format!(
            "{} · Quantity > {}",
            page_title("Dataset", start, end, total),
            view.min_quantity
        );
        tables::transactions_table(&title, &filtered[start..end])
    }
}

/// Render the dataset viewer into `area`.
pub fn render_dataset_view(
    frame: &mut Frame,
    area: Rect,
    analysis: &Analysis,
    view: &DatasetView,
    theme: &Theme,
) {
    let page = dataset_page(analysis, view, visible_rows(area));
    render_table_view(frame, area, &page, theme);
}

fn page_title(name: &str, start: usize, end: usize, total: usize) -> String {
    if total == 0 {
        return format!("{} (0 rows)", name);
    }
    format!(
        "{} rows {}–{} of {}",
        name,
        format_number((start + 1) as f64, 0),
        format_number(end as f64, 0),
        format_number(total as f64, 0)
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
