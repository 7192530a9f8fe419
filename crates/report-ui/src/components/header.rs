use crate::themes::Theme;
use ratatui::text::{Line, Span};

use report_core::formatting::{format_currency, format_number};

/// Decorative sparkle string placed either side of the report title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Dashboard header rendering four lines:
///
/// 1. Report title with sparkle decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Row count and total revenue in `[ rows | revenue ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Rows kept after cleaning.
    pub rows: usize,
    /// Total non-canceled revenue.
    pub total_revenue: f64,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(rows: usize, total_revenue: f64, theme: &'a Theme) -> Self {
        Self {
            rows,
            total_revenue,
            theme,
        }
    }

    /// Render the header as exactly four lines, e.g.
    ///
    /// 1. `"✦ ✧ ✦ ✧ RETAIL SALES REPORT ✦ ✧ ✦ ✧"`
    /// 2. `"============================================================"`
    /// 3. `"[ 392,692 rows | £8,887,208.89 revenue ]"`
    /// 4. `""`
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" RETAIL SALES REPORT ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(
                    format!("{} rows", format_number(self.rows as f64, 0)),
                    self.theme.value,
                ),
                Span::styled(" | ", self.theme.label),
                Span::styled(
                    format!("{} revenue", format_currency(self.total_revenue)),
                    self.theme.value,
                ),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let lines = Header::new(10, 1.0, &theme).to_lines();
        assert_eq!(lines.len(), 4, "header must produce exactly 4 lines");
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let lines = Header::new(10, 1.0, &theme).to_lines();
        let title_text = line_text(&lines[0]);

        assert!(title_text.contains("RETAIL SALES REPORT"), "got: {title_text}");
        assert!(title_text.contains(SPARKLES), "got: {title_text}");
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::light();
        let lines = Header::new(392_692, 8_887_208.894, &theme).to_lines();
        let info_text = line_text(&lines[2]);

        assert_eq!(info_text, "[ 392,692 rows | £8,887,208.89 revenue ]");
        assert_eq!(lines[2].spans.len(), 5);
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::classic();
        let lines = Header::new(0, 0.0, &theme).to_lines();
        let sep_text = line_text(&lines[1]);

        assert_eq!(sep_text.chars().count(), 60);
        assert!(sep_text.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_empty_fourth_line() {
        let theme = Theme::dark();
        let lines = Header::new(0, 0.0, &theme).to_lines();
        assert!(line_text(&lines[3]).is_empty());
    }
}
