//! Main application state and TUI event loop for the retail report.
//!
//! [`App`] owns the theme, the selected page and the dataset viewer state.
//! The report is computed once before the loop starts; only the dataset
//! viewer re-filters the cached clean table when its threshold changes.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};
use tracing::debug;

use report_core::error::{ReportError, Result};
use report_data::analysis::Analysis;

use crate::chart_view::{self, Series};
use crate::overview_view;
use crate::table_view::{self, DatasetView};
use crate::tables::{self, TableData};
use crate::themes::Theme;

/// Lowest and highest quantity threshold the dataset viewer accepts.
pub const MIN_QUANTITY_RANGE: (i64, i64) = (-1000, 1000);

/// Rows moved by PageUp / PageDown in the dataset viewer.
const PAGE_STEP: usize = 20;

// ── Page ──────────────────────────────────────────────────────────────────────

/// Dashboard pages, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Summary,
    RevenueByDate,
    Countries,
    Products,
    Quantities,
    UnitPrices,
    Customers,
    Days,
    Hours,
    Cancellations,
    Preview,
    Dataset,
}

impl Page {
    pub const ALL: [Page; 13] = [
        Page::Overview,
        Page::Summary,
        Page::RevenueByDate,
        Page::Countries,
        Page::Products,
        Page::Quantities,
        Page::UnitPrices,
        Page::Customers,
        Page::Days,
        Page::Hours,
        Page::Cancellations,
        Page::Preview,
        Page::Dataset,
    ];

    /// Tab label.
    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Summary => "Summary",
            Page::RevenueByDate => "Date",
            Page::Countries => "Countries",
            Page::Products => "Products",
            Page::Quantities => "Quantity",
            Page::UnitPrices => "Unit Price",
            Page::Customers => "Customers",
            Page::Days => "Day",
            Page::Hours => "Hour",
            Page::Cancellations => "Cancellations",
            Page::Preview => "Preview",
            Page::Dataset => "Dataset",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    /// Next page, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous page, wrapping around.
    pub fn prev(self) -> Self {
        let n = Self::ALL.len();
        Self::ALL[(self.index() + n - 1) % n]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the report TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Page currently on screen.
    pub page: Page,
    /// Dataset viewer filter and scroll position.
    pub dataset: DatasetView,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    /// Construct a new application; `min_quantity` is clamped into
    /// [`MIN_QUANTITY_RANGE`].
    pub fn new(theme_name: &str, min_quantity: i64) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            page: Page::Overview,
            dataset: DatasetView {
                min_quantity: min_quantity.clamp(MIN_QUANTITY_RANGE.0, MIN_QUANTITY_RANGE.1),
                show_raw: false,
                offset: 0,
            },
            should_quit: false,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Run the dashboard over `analysis` until `q` / `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so resizes redraw
    /// promptly.  The terminal is restored even when drawing fails.
    pub fn run_dashboard(mut self, analysis: &Analysis) -> Result<()> {
        enable_raw_mode().map_err(terminal_error)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(terminal_error)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(terminal_error)?;

        let result = self.event_loop(&mut terminal, analysis);
        let restored = restore_terminal(&mut terminal);

        result.and(restored)
    }

    fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        analysis: &Analysis,
    ) -> Result<()> {
        let tick_rate = Duration::from_millis(250);

        while !self.should_quit {
            terminal
                .draw(|frame| self.render(frame, analysis))
                .map_err(|e| ReportError::Terminal(e.to_string()))?;

            if event::poll(tick_rate).map_err(terminal_error)? {
                if let Event::Key(key) = event::read().map_err(terminal_error)? {
                    self.handle_key(key, analysis);
                }
            }
        }
        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent, analysis: &Analysis) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Right | KeyCode::Tab => self.page = self.page.next(),
            KeyCode::Left | KeyCode::BackTab => self.page = self.page.prev(),
            _ if self.page == Page::Dataset => self.handle_dataset_key(key.code, analysis),
            _ => {}
        }
    }

    fn handle_dataset_key(&mut self, code: KeyCode, analysis: &Analysis) {
        match code {
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_min_quantity(1),
            KeyCode::Char('-') | KeyCode::Char('_') => self.adjust_min_quantity(-1),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.dataset.show_raw = !self.dataset.show_raw;
                self.dataset.offset = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll(1, analysis),
            KeyCode::Up | KeyCode::Char('k') => self.scroll(-1, analysis),
            KeyCode::PageDown => self.scroll(PAGE_STEP as isize, analysis),
            KeyCode::PageUp => self.scroll(-(PAGE_STEP as isize), analysis),
            KeyCode::Home => self.dataset.offset = 0,
            _ => {}
        }
    }

    /// Move the viewer threshold by `delta`, staying inside
    /// [`MIN_QUANTITY_RANGE`].
    pub fn adjust_min_quantity(&mut self, delta: i64) {
        let next = (self.dataset.min_quantity + delta)
            .clamp(MIN_QUANTITY_RANGE.0, MIN_QUANTITY_RANGE.1);
        if next != self.dataset.min_quantity {
            debug!("Dataset threshold set to {}", next);
            self.dataset.min_quantity = next;
            self.dataset.offset = 0;
        }
    }

    fn scroll(&mut self, delta: isize, analysis: &Analysis) {
        let len = dataset_len(analysis, &self.dataset);
        let last = len.saturating_sub(1);
        self.dataset.offset = self.dataset.offset.saturating_add_signed(delta).min(last);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current page with the tab bar above and key hints below.
    pub fn render(&self, frame: &mut Frame, analysis: &Analysis) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let tabs = Tabs::new(Page::ALL.iter().map(|p| p.title()))
            .select(self.page.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border)
                    .title(" Retail Sales Report "),
            );
        frame.render_widget(tabs, chunks[0]);

        self.render_page(frame, chunks[1], analysis);

        frame.render_widget(Paragraph::new(self.footer()), chunks[2]);
    }

    fn render_page(&self, frame: &mut Frame, area: Rect, analysis: &Analysis) {
        let report = &analysis.report;
        let theme = &self.theme;

        match self.page {
            Page::Overview => overview_view::render_overview_view(frame, area, report, theme),
            Page::Summary => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(12), Constraint::Min(0)])
                    .split(area);
                table_view::render_table_view(
                    frame,
                    chunks[0],
                    &tables::summary_table(&report.summary),
                    theme,
                );
                table_view::render_table_view(
                    frame,
                    chunks[1],
                    &tables::missing_values_table(report),
                    theme,
                );
            }
            Page::RevenueByDate => self.render_line_page(
                frame,
                area,
                &chart_view::date_series(report),
                &tables::revenue_by_date_table(report),
                false,
            ),
            Page::Countries => self.render_bar_page(
                frame,
                area,
                &chart_view::country_series(report),
                &tables::top_countries_table(report),
            ),
            Page::Products => self.render_bar_page(
                frame,
                area,
                &chart_view::product_series(report),
                &tables::top_products_table(report),
            ),
            Page::Quantities => self.render_bar_page(
                frame,
                area,
                &chart_view::quantity_series(report),
                &tables::product_quantities_table(report),
            ),
            Page::UnitPrices => self.render_bar_page(
                frame,
                area,
                &chart_view::unit_price_series(report),
                &tables::product_unit_prices_table(report),
            ),
            Page::Customers => self.render_bar_page(
                frame,
                area,
                &chart_view::customer_series(report),
                &tables::top_customers_table(report),
            ),
            Page::Days => self.render_bar_page(
                frame,
                area,
                &chart_view::day_series(report),
                &tables::revenue_by_day_table(report),
            ),
            Page::Hours => self.render_line_page(
                frame,
                area,
                &chart_view::hour_series(report),
                &tables::revenue_by_hour_table(report),
                false,
            ),
            Page::Cancellations => self.render_line_page(
                frame,
                area,
                &chart_view::revenue_lost_series(report),
                &tables::cancellations_table(report),
                true,
            ),
            Page::Preview => table_view::render_table_view(
                frame,
                area,
                &tables::sales_preview_table(&report.sales_preview),
                theme,
            ),
            Page::Dataset => {
                table_view::render_dataset_view(frame, area, analysis, &self.dataset, theme)
            }
        }
    }

    fn render_bar_page(&self, frame: &mut Frame, area: Rect, series: &Series, table: &TableData) {
        let [chart_area, table_area] = split_chart_and_table(area);
        chart_view::render_bar_chart(frame, chart_area, series, &self.theme);
        table_view::render_table_view(frame, table_area, table, &self.theme);
    }

    fn render_line_page(
        &self,
        frame: &mut Frame,
        area: Rect,
        series: &Series,
        table: &TableData,
        loss: bool,
    ) {
        let [chart_area, table_area] = split_chart_and_table(area);
        let style = if loss {
            self.theme.chart_loss
        } else {
            self.theme.chart_line
        };
        chart_view::render_line_chart(frame, chart_area, series, style, &self.theme);
        table_view::render_table_view(frame, table_area, table, &self.theme);
    }

    /// Key hints for the current page.
    pub fn footer(&self) -> Line<'static> {
        let theme = &self.theme;
        let mut spans = vec![
            Span::styled(" ←/→ Tab", theme.info),
            Span::styled(" pages  ", theme.dim),
            Span::styled("q", theme.info),
            Span::styled(" quit", theme.dim),
        ];
        if self.page == Page::Dataset {
            spans.extend([
                Span::styled("  +/-", theme.info),
                Span::styled(
                    format!(" quantity > {}  ", self.dataset.min_quantity),
                    theme.dim,
                ),
                Span::styled("r", theme.info),
                Span::styled(
                    if self.dataset.show_raw {
                        " cleaned rows  "
                    } else {
                        " raw rows  "
                    },
                    theme.dim,
                ),
                Span::styled("↑/↓ PgUp/PgDn", theme.info),
                Span::styled(" scroll", theme.dim),
            ]);
        }
        Line::from(spans)
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn terminal_error(err: io::Error) -> ReportError {
    ReportError::Terminal(err.to_string())
}

/// Leave raw mode and the alternate screen, then show the cursor. Every
/// step runs even when an earlier one fails.
fn restore_terminal<W: io::Write>(terminal: &mut Terminal<CrosstermBackend<W>>) -> Result<()> {
    let raw_mode = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    first_failure([raw_mode, screen, cursor])
}

fn first_failure(steps: [io::Result<()>; 3]) -> Result<()> {
    steps
        .into_iter()
        .collect::<io::Result<Vec<()>>>()
        .map(|_| ())
        .map_err(terminal_error)
}

fn split_chart_and_table(area: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    [chunks[0], chunks[1]]
}

fn dataset_len(analysis: &Analysis, view: &DatasetView) -> usize {
    if view.show_raw {
        analysis.raw.len()
    } else {
        analysis.clean.filter_quantity_above(view.min_quantity).len()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
