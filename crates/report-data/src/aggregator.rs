//! Grouped revenue, quantity and price tables over the derived sales records.
//!
//! Every function is pure over its input slice. Unless stated otherwise an
//! aggregation only looks at the non-canceled subset.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use report_core::calendar;
use report_core::error::Result;
use report_core::formatting::{percentage, round_to};
use report_core::models::{SalesRecord, REQUIRED_COLUMNS};
use report_core::statistics::{ColumnSummary, Summary};

use crate::reader::RawTable;

/// Rows in the top-countries table.
pub const TOP_COUNTRIES: usize = 10;
/// Rows in the top-products table.
pub const TOP_PRODUCTS: usize = 20;
/// Rows in the top-customers table.
pub const TOP_CUSTOMERS: usize = 10;

// ── Row types ─────────────────────────────────────────────────────────────────

/// Number of empty cells in one input column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueRow {
    pub feature: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRevenue {
    /// Date label, e.g. `"December-2010"`.
    pub date: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRevenue {
    pub country: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub stock_code: String,
    pub description: String,
    pub revenue: f64,
}

/// A top product joined with the total quantity sold under its stock code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuantity {
    pub stock_code: String,
    pub description: String,
    pub revenue: f64,
    pub sales: i64,
}

/// A top product joined with the mean unit price of its stock code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUnitPrice {
    pub stock_code: String,
    pub description: String,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRevenue {
    /// Customer id rendered as text.
    pub customer_id: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRevenue {
    pub day: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourRevenue {
    pub hour: u32,
    /// `"H:00"` display label.
    pub label: String,
    pub revenue: f64,
}

/// Canceled orders and the revenue they represent, per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationRow {
    pub date: String,
    pub canceled_orders: usize,
    pub revenue_lost: f64,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that builds the report tables.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Empty-cell count per input column over the *uncleaned* table, in the
    /// canonical column order.
    pub fn missing_values(raw: &RawTable) -> Vec<MissingValueRow> {
        REQUIRED_COLUMNS
            .iter()
            .map(|column| MissingValueRow {
                feature: column.to_string(),
                missing: raw.rows.iter().filter(|r| r.is_missing(column)).count(),
            })
            .collect()
    }

    /// Share of rows missing `column`, as a percentage rounded to 2 dp.
    pub fn missing_percentage(raw: &RawTable, column: &str) -> f64 {
        let missing = raw.rows.iter().filter(|r| r.is_missing(column)).count();
        percentage(missing as f64, raw.len() as f64, 2)
    }

    /// Descriptive statistics for the numeric input columns of the raw table.
    pub fn describe(raw: &RawTable) -> Vec<ColumnSummary> {
        let columns: [(&str, Vec<f64>); 3] = [
            (
                "Quantity",
                raw.rows.iter().filter_map(|r| r.quantity).map(|q| q as f64).collect(),
            ),
            ("UnitPrice", raw.rows.iter().filter_map(|r| r.unit_price).collect()),
            ("CustomerID", raw.rows.iter().filter_map(|r| r.customer_id).collect()),
        ];

        columns
            .into_iter()
            .filter_map(|(column, values)| {
                Summary::describe(values).map(|summary| ColumnSummary {
                    column: column.to_string(),
                    summary,
                })
            })
            .collect()
    }

    /// Total non-canceled revenue.
    pub fn total_revenue(records: &[SalesRecord]) -> f64 {
        sales(records).map(|r| r.revenue).sum()
    }

    /// Revenue per date label, oldest month first, rounded to 2 dp.
    pub fn revenue_by_date(records: &[SalesRecord]) -> Result<Vec<DateRevenue>> {
        let rows: Vec<DateRevenue> = sum_by(sales(records), |r| r.date.clone(), |r| r.revenue)
            .into_iter()
            .map(|(date, revenue)| DateRevenue {
                date,
                revenue: round_to(revenue, 2),
            })
            .collect();
        calendar::order_chronologically(rows, |r| r.date.as_str())
    }

    /// Revenue per country, rounded to 2 dp, highest first, all countries.
    pub fn revenue_by_country(records: &[SalesRecord]) -> Vec<CountryRevenue> {
        let mut rows: Vec<CountryRevenue> =
            sum_by(sales(records), |r| r.transaction.country.clone(), |r| r.revenue)
                .into_iter()
                .map(|(country, revenue)| CountryRevenue {
                    country,
                    revenue: round_to(revenue, 2),
                })
                .collect();
        rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        rows
    }

    /// The `n` highest-revenue countries.
    pub fn top_countries(records: &[SalesRecord], n: usize) -> Vec<CountryRevenue> {
        let mut rows = Self::revenue_by_country(records);
        rows.truncate(n);
        rows
    }

    /// The `n` highest-revenue `(stock code, description)` pairs, rounded to
    /// 2 dp.
    pub fn top_products(records: &[SalesRecord], n: usize) -> Vec<ProductRevenue> {
        let mut rows: Vec<ProductRevenue> = sum_by(
            sales(records),
            |r| {
                (
                    r.transaction.stock_code.clone(),
                    r.transaction.description.clone(),
                )
            },
            |r| r.revenue,
        )
        .into_iter()
        .map(|((stock_code, description), revenue)| ProductRevenue {
            stock_code,
            description,
            revenue: round_to(revenue, 2),
        })
        .collect();
        rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        rows.truncate(n);
        rows
    }

    /// Total quantity per stock code, inner-joined onto `top` in `top`'s order.
    pub fn product_quantities(
        records: &[SalesRecord],
        top: &[ProductRevenue],
    ) -> Vec<ProductQuantity> {
        let mut totals: HashMap<&str, i64> = HashMap::new();
        for r in sales(records) {
            *totals.entry(r.transaction.stock_code.as_str()).or_default() +=
                r.transaction.quantity;
        }

        let rows: Vec<ProductQuantity> = top
            .iter()
            .filter_map(|p| {
                totals.get(p.stock_code.as_str()).map(|&sales| ProductQuantity {
                    stock_code: p.stock_code.clone(),
                    description: p.description.clone(),
                    revenue: p.revenue,
                    sales,
                })
            })
            .collect();
        if rows.is_empty() && !top.is_empty() {
            warn!("No quantity totals matched the top products");
        }
        rows
    }

    /// Mean unit price per stock code, inner-joined onto `top`.
    pub fn product_unit_prices(
        records: &[SalesRecord],
        top: &[ProductRevenue],
    ) -> Vec<ProductUnitPrice> {
        let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
        for r in sales(records) {
            let entry = totals
                .entry(r.transaction.stock_code.as_str())
                .or_insert((0.0, 0));
            entry.0 += r.transaction.unit_price;
            entry.1 += 1;
        }

        let rows: Vec<ProductUnitPrice> = top
            .iter()
            .filter_map(|p| {
                totals
                    .get(p.stock_code.as_str())
                    .map(|&(sum, count)| ProductUnitPrice {
                        stock_code: p.stock_code.clone(),
                        description: p.description.clone(),
                        unit_price: sum / count as f64,
                    })
            })
            .collect();
        if rows.is_empty() && !top.is_empty() {
            warn!("No unit prices matched the top products");
        }
        rows
    }

    /// The `n` highest-revenue customers.
    pub fn top_customers(records: &[SalesRecord], n: usize) -> Vec<CustomerRevenue> {
        let mut rows: Vec<CustomerRevenue> =
            sum_by(sales(records), |r| r.transaction.customer_id, |r| r.revenue)
                .into_iter()
                .map(|(id, revenue)| CustomerRevenue {
                    customer_id: id.to_string(),
                    revenue,
                })
                .collect();
        rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        rows.truncate(n);
        rows
    }

    /// Revenue per weekday, Monday first.
    pub fn revenue_by_day(records: &[SalesRecord]) -> Result<Vec<DayRevenue>> {
        let rows: Vec<DayRevenue> = sum_by(sales(records), |r| r.day.clone(), |r| r.revenue)
            .into_iter()
            .map(|(day, revenue)| DayRevenue { day, revenue })
            .collect();
        calendar::order_by_weekday(rows, |r| r.day.as_str())
    }

    /// Revenue per hour of day, ascending hour.
    pub fn revenue_by_hour(records: &[SalesRecord]) -> Vec<HourRevenue> {
        sum_by(sales(records), |r| r.hour, |r| r.revenue)
            .into_iter()
            .map(|(hour, revenue)| HourRevenue {
                hour,
                label: calendar::hour_label(hour),
                revenue,
            })
            .collect()
    }

    /// Count and revenue of *canceled* rows per date label, oldest first.
    pub fn cancellations_by_date(records: &[SalesRecord]) -> Result<Vec<CancellationRow>> {
        let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for r in records.iter().filter(|r| r.is_canceled()) {
            let entry = groups.entry(r.date.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += r.revenue;
        }

        let rows: Vec<CancellationRow> = groups
            .into_iter()
            .map(|(date, (canceled_orders, revenue_lost))| CancellationRow {
                date: date.to_string(),
                canceled_orders,
                revenue_lost,
            })
            .collect();
        calendar::order_chronologically(rows, |r| r.date.as_str())
    }

    /// Stock codes of a product table, for join checks.
    pub fn stock_codes(top: &[ProductRevenue]) -> HashSet<&str> {
        top.iter().map(|p| p.stock_code.as_str()).collect()
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// The non-canceled subset.
fn sales(records: &[SalesRecord]) -> impl Iterator<Item = &SalesRecord> {
    records.iter().filter(|r| !r.is_canceled())
}

/// Sum `value_fn` per `key_fn`, with keys in ascending order.
fn sum_by<'a, K: Ord>(
    records: impl Iterator<Item = &'a SalesRecord>,
    key_fn: impl Fn(&SalesRecord) -> K,
    value_fn: impl Fn(&SalesRecord) -> f64,
) -> BTreeMap<K, f64> {
    let mut map: BTreeMap<K, f64> = BTreeMap::new();
    for record in records {
        *map.entry(key_fn(record)).or_default() += value_fn(record);
    }
    map
}

// ── Tests ─────────────────────────────────────────────────────────────────────
