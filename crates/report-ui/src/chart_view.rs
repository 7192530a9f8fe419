//! Bar and line charts for the report dashboard.
//!
//! Categorical tables (countries, products, customers, days) are drawn as
//! horizontal bar charts; the date, hour and revenue-lost trends as line
//! charts.  Value labels use the `£` prefix and SI suffixes.

use ratatui::{
    layout::{Direction, Rect},
    style::Style,
    symbols,
    text::Line,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use report_core::formatting::{format_si, CURRENCY};
use report_data::analysis::Report;

use crate::table_view::render_no_data;
use crate::tables::truncate;
use crate::themes::Theme;

/// Significant digits on chart value labels.
const LABEL_DIGITS: u32 = 3;

/// Widest a bar label may be before it is cut.
const BAR_LABEL_WIDTH: usize = 28;

// ── Series ────────────────────────────────────────────────────────────────────

/// An ordered `(label, value)` series plus how its values are printed.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub title: String,
    /// Axis name for the measure.
    pub measure: String,
    pub points: Vec<(String, f64)>,
    /// Prefix value labels with the currency symbol.
    pub currency: bool,
}

impl Series {
    fn new(title: &str, measure: &str, points: Vec<(String, f64)>, currency: bool) -> Self {
        Self {
            title: title.to_string(),
            measure: measure.to_string(),
            points,
            currency,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Format `value` the way this series labels its bars and axis ticks.
    pub fn value_label(&self, value: f64) -> String {
        if self.currency {
            format!("{}{}", CURRENCY, format_si(value, LABEL_DIGITS))
        } else {
            format_si(value, LABEL_DIGITS)
        }
    }

    fn max_value(&self) -> f64 {
        self.points.iter().map(|(_, v)| *v).fold(0.0, f64::max)
    }
}

pub fn date_series(report: &Report) -> Series {
    Series::new(
        "Revenue by Date",
        "Revenue",
        report
            .revenue_by_date
            .iter()
            .map(|r| (r.date.clone(), r.revenue))
            .collect(),
        true,
    )
}

pub fn country_series(report: &Report) -> Series {
    Series::new(
        "Top 10 Revenue by Country",
        "Revenue",
        report
            .top_countries
            .iter()
            .map(|r| (r.country.clone(), r.revenue))
            .collect(),
        true,
    )
}

pub fn product_series(report: &Report) -> Series {
    Series::new(
        "Top 20 Products by Revenue",
        "Revenue",
        report
            .top_products
            .iter()
            .map(|r| (r.description.clone(), r.revenue))
            .collect(),
        true,
    )
}

pub fn quantity_series(report: &Report) -> Series {
    Series::new(
        "Quantity Sold of Top 20 Products",
        "Sales",
        report
            .product_quantities
            .iter()
            .map(|r| (r.description.clone(), r.sales as f64))
            .collect(),
        false,
    )
}

pub fn unit_price_series(report: &Report) -> Series {
    Series::new(
        "Unit Price of Top 20 Products",
        "UnitPrice",
        report
            .product_unit_prices
            .iter()
            .map(|r| (r.description.clone(), r.unit_price))
            .collect(),
        true,
    )
}

pub fn customer_series(report: &Report) -> Series {
    Series::new(
        "Top 10 Customers by Revenue",
        "Revenue",
        report
            .top_customers
            .iter()
            .map(|r| (r.customer_id.clone(), r.revenue))
            .collect(),
        true,
    )
}

pub fn day_series(report: &Report) -> Series {
    Series::new(
        "Revenue by Day of Week",
        "Revenue",
        report
            .revenue_by_day
            .iter()
            .map(|r| (r.day.clone(), r.revenue))
            .collect(),
        true,
    )
}

pub fn hour_series(report: &Report) -> Series {
    Series::new(
        "Revenue by Hour of Day",
        "Revenue",
        report
            .revenue_by_hour
            .iter()
            .map(|r| (r.label.clone(), r.revenue))
            .collect(),
        true,
    )
}

pub fn revenue_lost_series(report: &Report) -> Series {
    Series::new(
        "Revenue Lost to Cancellations",
        "Revenue Lost",
        report
            .cancellations
            .iter()
            .map(|r| (r.date.clone(), r.revenue_lost))
            .collect(),
        true,
    )
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render `series` as a horizontal bar chart, one colour per category.
pub fn render_bar_chart(frame: &mut Frame, area: Rect, series: &Series, theme: &Theme) {
    if series.is_empty() {
        render_no_data(frame, area, &series.title, theme);
        return;
    }

    let bars: Vec<Bar> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::default()
                .value(bar_value(*value))
                .label(Line::from(truncate(label, BAR_LABEL_WIDTH)))
                .text_value(series.value_label(*value))
                .style(theme.bar_style(i))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", series.title)),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Render `series` as a line chart over its category order.
pub fn render_line_chart(
    frame: &mut Frame,
    area: Rect,
    series: &Series,
    line_style: Style,
    theme: &Theme,
) {
    if series.is_empty() {
        render_no_data(frame, area, &series.title, theme);
        return;
    }

    let data: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, (_, value))| (i as f64, *value))
        .collect();

    let last_x = (data.len() - 1).max(1) as f64;
    let top = series.max_value().max(1.0) * 1.05;

    let dataset = Dataset::default()
        .name(series.measure.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(line_style)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", series.title)),
        )
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, last_x])
                .labels(x_labels(series)),
        )
        .y_axis(
            Axis::default()
                .title(series.measure.clone())
                .style(theme.chart_axis)
                .bounds([0.0, top])
                .labels(vec![
                    series.value_label(0.0),
                    series.value_label(top / 2.0),
                    series.value_label(top),
                ]),
        );

    frame.render_widget(chart, area);
}

/// First, middle and last category labels for the x axis.
pub fn x_labels(series: &Series) -> Vec<String> {
    let n = series.points.len();
    match n {
        0 => Vec::new(),
        1 | 2 => series.points.iter().map(|(l, _)| l.clone()).collect(),
        _ => vec![
            series.points[0].0.clone(),
            series.points[n / 2].0.clone(),
            series.points[n - 1].0.clone(),
        ],
    }
}

/// Bars are integral; scale to hundredths so unit prices keep their shape.
fn bar_value(value: f64) -> u64 {
    (value * 100.0).round().max(0.0) as u64
}

// ── Tests ──────────────────────────────────────────────────────────────────────
