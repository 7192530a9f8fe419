use ratatui::text::{Line, Span};

use report_core::formatting::format_currency;
use report_data::analysis::Highlights;

use crate::themes::Theme;

/// One `(label, detail)` pair per available highlight, in display order.
pub fn highlight_items(h: &Highlights) -> Vec<(&'static str, String)> {
    let mut items = Vec::new();

    if let Some(best) = &h.best_month {
        let growth = h
            .best_month_growth_pct
            .map(|pct| format!(" ({:+.1}% on the previous month)", pct))
            .unwrap_or_default();
        items.push((
            "Best month",
            format!("{} with {}{}", best.date, format_currency(best.revenue), growth),
        ));
    }
    if let Some(c) = &h.best_country {
        items.push((
            "Top country",
            format!("{} ({})", c.country, format_currency(c.revenue)),
        ));
    }
    if let Some(p) = &h.best_product {
        items.push((
            "Best-selling product",
            format!(
                "{} [{}] at {}",
                p.description,
                p.stock_code,
                format_currency(p.revenue)
            ),
        ));
    }
    if let Some(p) = &h.priciest_product {
        items.push((
            "Priciest top product",
            format!(
                "{} [{}] at {} a unit",
                p.description,
                p.stock_code,
                format_currency(p.unit_price)
            ),
        ));
    }
    if let Some(c) = &h.best_customer {
        items.push((
            "Top customer",
            format!("{} ({})", c.customer_id, format_currency(c.revenue)),
        ));
    }
    if let Some(d) = &h.busiest_day {
        items.push((
            "Busiest day",
            format!("{} ({})", d.day, format_currency(d.revenue)),
        ));
    }
    if let Some(hr) = &h.busiest_hour {
        items.push((
            "Busiest hour",
            format!("{} ({})", hr.label, format_currency(hr.revenue)),
        ));
    }

    items
}

/// Styled highlight lines for the overview page.
pub fn highlight_lines(h: &Highlights, theme: &Theme) -> Vec<Line<'static>> {
    let items = highlight_items(h);
    if items.is_empty() {
        return vec![Line::from(Span::styled(
            "No sales to summarise.",
            theme.warning,
        ))];
    }
    items
        .into_iter()
        .map(|(label, detail)| {
            Line::from(vec![
                Span::styled("• ", theme.info),
                Span::styled(format!("{}: ", label), theme.label),
                Span::styled(detail, theme.value),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_data::aggregator::{CountryRevenue, DateRevenue, HourRevenue};

    #[test]
    fn test_empty_highlights() {
        assert!(highlight_items(&Highlights::default()).is_empty());
        let lines = highlight_lines(&Highlights::default(), &Theme::dark());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_best_month_with_growth() {
        let h = Highlights {
            best_month: Some(DateRevenue {
                date: "November-2011".to_string(),
                revenue: 1_000.0,
            }),
            best_month_growth_pct: Some(25.0),
            ..Highlights::default()
        };
        let items = highlight_items(&h);
        assert_eq!(items[0].0, "Best month");
        assert_eq!(
            items[0].1,
            "November-2011 with £1,000.00 (+25.0% on the previous month)"
        );
    }

    #[test]
    fn test_best_month_without_previous() {
        let h = Highlights {
            best_month: Some(DateRevenue {
                date: "December-2010".to_string(),
                revenue: 15.3,
            }),
            ..Highlights::default()
        };
        assert_eq!(highlight_items(&h)[0].1, "December-2010 with £15.30");
    }

    #[test]
    fn test_items_follow_display_order() {
        let h = Highlights {
            best_country: Some(CountryRevenue {
                country: "Germany".to_string(),
                revenue: 90.0,
            }),
            busiest_hour: Some(HourRevenue {
                hour: 14,
                label: "14:00".to_string(),
                revenue: 90.0,
            }),
            ..Highlights::default()
        };
        let labels: Vec<&str> = highlight_items(&h).iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["Top country", "Busiest hour"]);
    }
}
