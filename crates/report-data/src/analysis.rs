//! Main analysis pipeline for the retail report.
//!
//! Orchestrates loading, cleaning, field derivation and every aggregation,
//! returning an [`Analysis`] ready for the UI layer.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use report_core::error::Result;
use report_core::models::SalesRecord;
use report_core::statistics::ColumnSummary;

use crate::aggregator::{
    CancellationRow, CountryRevenue, CustomerRevenue, DateRevenue, DayRevenue, HourRevenue,
    MissingValueRow, ProductQuantity, ProductRevenue, ProductUnitPrice, SalesAggregator,
    TOP_COUNTRIES, TOP_CUSTOMERS, TOP_PRODUCTS,
};
use crate::cleaner::{clean, CleanTable, CleaningReport};
use crate::deriver::derive;
use crate::reader::{load_transactions, RawTable};

/// Rows shown in the sales preview.
pub const PREVIEW_ROWS: usize = 5;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Rows in the input file.
    pub rows_loaded: usize,
    /// Rows kept after cleaning.
    pub rows_clean: usize,
    /// Clean rows that are cancellations.
    pub rows_canceled: usize,
    /// Percentage of input rows without a customer id.
    pub customer_missing_pct: f64,
    /// Percentage of input rows without a description.
    pub description_missing_pct: f64,
    pub cleaning: CleaningReport,
}

/// Single-line takeaways drawn from the report tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    pub best_month: Option<DateRevenue>,
    /// Month-over-month change into the best month, in percent.
    pub best_month_growth_pct: Option<f64>,
    pub best_country: Option<CountryRevenue>,
    pub best_product: Option<ProductRevenue>,
    pub priciest_product: Option<ProductUnitPrice>,
    pub best_customer: Option<CustomerRevenue>,
    pub busiest_day: Option<DayRevenue>,
    pub busiest_hour: Option<HourRevenue>,
}

/// Every named aggregation table of the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: Vec<ColumnSummary>,
    pub missing_values: Vec<MissingValueRow>,
    pub total_revenue: f64,
    pub revenue_by_date: Vec<DateRevenue>,
    pub top_countries: Vec<CountryRevenue>,
    pub top_products: Vec<ProductRevenue>,
    pub product_quantities: Vec<ProductQuantity>,
    pub product_unit_prices: Vec<ProductUnitPrice>,
    pub top_customers: Vec<CustomerRevenue>,
    pub revenue_by_day: Vec<DayRevenue>,
    pub revenue_by_hour: Vec<HourRevenue>,
    pub cancellations: Vec<CancellationRow>,
    /// First non-canceled sales rows with their derived fields.
    pub sales_preview: Vec<SalesRecord>,
    pub highlights: Highlights,
}

impl Report {
    /// Pretty-printed JSON of every table, for `--view json`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The report together with the tables it was computed from.
///
/// Kept so the dataset viewer can filter rows without re-reading the file.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub raw: RawTable,
    pub clean: CleanTable,
    pub records: Vec<SalesRecord>,
    pub report: Report,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline on the file at `path`.
///
/// 1. Load the raw table.
/// 2. Clean it.
/// 3. Derive revenue and calendar fields.
/// 4. Build every aggregation.
pub fn analyze_file(path: &Path) -> Result<Analysis> {
    info!("Loading {}", path.display());
    let raw = load_transactions(path)?;
    analyze(raw)
}

/// Run steps 2–4 on an already loaded table.
pub fn analyze(raw: RawTable) -> Result<Analysis> {
    let clean_table = clean(&raw)?;
    let records = derive(&clean_table);
    let report = build_report(&raw, &clean_table, &records)?;

    info!(
        "Report built: {} clean rows, total revenue {:.2}",
        report.metadata.rows_clean, report.total_revenue
    );

    Ok(Analysis {
        raw,
        clean: clean_table,
        records,
        report,
    })
}

/// Compute every aggregation table from the pipeline stages.
pub fn build_report(
    raw: &RawTable,
    clean_table: &CleanTable,
    records: &[SalesRecord],
) -> Result<Report> {
    let top_products = SalesAggregator::top_products(records, TOP_PRODUCTS);
    let product_quantities = SalesAggregator::product_quantities(records, &top_products);
    let product_unit_prices = SalesAggregator::product_unit_prices(records, &top_products);

    let metadata = ReportMetadata {
        rows_loaded: raw.len(),
        rows_clean: clean_table.len(),
        rows_canceled: records.iter().filter(|r| r.is_canceled()).count(),
        customer_missing_pct: SalesAggregator::missing_percentage(raw, "CustomerID"),
        description_missing_pct: SalesAggregator::missing_percentage(raw, "Description"),
        cleaning: clean_table.report.clone(),
    };

    let mut report = Report {
        metadata,
        summary: SalesAggregator::describe(raw),
        missing_values: SalesAggregator::missing_values(raw),
        total_revenue: SalesAggregator::total_revenue(records),
        revenue_by_date: SalesAggregator::revenue_by_date(records)?,
        top_countries: SalesAggregator::top_countries(records, TOP_COUNTRIES),
        top_products,
        product_quantities,
        product_unit_prices,
        top_customers: SalesAggregator::top_customers(records, TOP_CUSTOMERS),
        revenue_by_day: SalesAggregator::revenue_by_day(records)?,
        revenue_by_hour: SalesAggregator::revenue_by_hour(records),
        cancellations: SalesAggregator::cancellations_by_date(records)?,
        sales_preview: records
            .iter()
            .filter(|r| !r.is_canceled())
            .take(PREVIEW_ROWS)
            .cloned()
            .collect(),
        highlights: Highlights::default(),
    };
    report.highlights = highlights(&report);

    Ok(report)
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn highlights(report: &Report) -> Highlights {
    let best_index = report
        .revenue_by_date
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.revenue.total_cmp(&b.1.revenue))
        .map(|(i, _)| i);

    let best_month_growth_pct = best_index.and_then(|i| {
        let prev = report.revenue_by_date.get(i.checked_sub(1)?)?;
        let best = &report.revenue_by_date[i];
        (prev.revenue > 0.0).then(|| (best.revenue - prev.revenue) / prev.revenue * 100.0)
    });

    Highlights {
        best_month: best_index.map(|i| report.revenue_by_date[i].clone()),
        best_month_growth_pct,
        best_country: report.top_countries.first().cloned(),
        best_product: report.top_products.first().cloned(),
        priciest_product: report
            .product_unit_prices
            .iter()
            .max_by(|a, b| a.unit_price.total_cmp(&b.unit_price))
            .cloned(),
        best_customer: report.top_customers.first().cloned(),
        busiest_day: report
            .revenue_by_day
            .iter()
            .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
            .cloned(),
        busiest_hour: report
            .revenue_by_hour
            .iter()
            .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
            .cloned(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::load_transactions_from_reader;
    use report_core::error::ReportError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CSV: &str = "\
InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country
536365,85123A,WHITE HANGING HEART T-LIGHT HOLDER,6,12/1/2010 8:26,2.55,17850,United Kingdom
536365,71053,WHITE METAL LANTERN,6,12/1/2010 8:26,3.39,17850,United Kingdom
536366,22633,HAND WARMER UNION JACK,6,12/1/2010 8:28,1.85,17850,United Kingdom
536367,84879,ASSORTED COLOUR BIRD ORNAMENT,32,1/4/2011 10:05,1.69,13047,United Kingdom
536368,22960,JAM MAKING SET WITH JARS,6,1/4/2011 12:15,4.25,12583,France
536369,POST,POSTAGE,3,1/4/2011 12:15,18,12583,France
536370,22728,ALARM CLOCK BAKELIKE PINK,24,2/7/2011 14:30,3.75,12662,Germany
536371,22727,ALARM CLOCK BAKELIKE RED,24,2/7/2011 14:30,3.75,,Germany
536372,22726,ALARM CLOCK BAKELIKE GREEN,4,2/8/2011 9:00,3.75,12363,Unspecified
536373,22725,,12,2/8/2011 9:05,0,,United Kingdom
C536379,22556,PLASTERS IN TIN CIRCUS PARADE,-12,12/1/2010 9:41,1.65,14527,United Kingdom
C536383,35004C,SET OF 3 COLOURED FLYING DUCKS,-1,1/4/2011 9:49,4.65,15311,United Kingdom
";

    fn sample_analysis() -> Analysis {
        let raw = load_transactions_from_reader(SAMPLE_CSV.as_bytes()).unwrap();
        analyze(raw).unwrap()
    }

    #[test]
    fn test_metadata_counts() {
        let analysis = sample_analysis();
        let meta = &analysis.report.metadata;
        assert_eq!(meta.rows_loaded, 12);
        assert_eq!(meta.cleaning.missing_customer_or_description, 2);
        assert_eq!(meta.cleaning.unspecified_country, 1);
        assert_eq!(meta.cleaning.excluded_description, 1);
        assert_eq!(meta.rows_clean, 8);
        assert_eq!(meta.rows_canceled, 2);
        // 2 of 12 rows have no customer id.
        assert!((meta.customer_missing_pct - 16.67).abs() < 1e-9);
        assert!((meta.description_missing_pct - 8.33).abs() < 1e-9);
    }

    #[test]
    fn test_missing_values_use_uncleaned_table() {
        let analysis = sample_analysis();
        let customer = analysis
            .report
            .missing_values
            .iter()
            .find(|r| r.feature == "CustomerID")
            .unwrap();
        assert_eq!(customer.missing, 2);
    }

    #[test]
    fn test_tables_populated() {
        let report = sample_analysis().report;
        assert_eq!(report.revenue_by_date.len(), 3);
        assert_eq!(report.revenue_by_date[0].date, "December-2010");
        assert_eq!(report.top_countries.len(), 3);
        assert_eq!(report.top_products.len(), 6);
        assert_eq!(report.product_quantities.len(), 6);
        assert_eq!(report.product_unit_prices.len(), 6);
        assert_eq!(report.cancellations.len(), 2);
        assert_eq!(report.sales_preview.len(), PREVIEW_ROWS);
        assert!(report.sales_preview.iter().all(|r| !r.is_canceled()));
        assert_eq!(report.summary.len(), 3);
    }

    #[test]
    fn test_highlights() {
        let report = sample_analysis().report;
        let h = &report.highlights;
        // 24 * 3.75 = 90.00 for the pink alarm clock.
        assert_eq!(h.best_product.as_ref().unwrap().stock_code, "22728");
        assert_eq!(h.best_customer.as_ref().unwrap().customer_id, "12662");
        assert_eq!(h.best_month.as_ref().unwrap().date, "February-2011");
        assert!(h.best_month_growth_pct.is_some());
        assert_eq!(h.busiest_hour.as_ref().unwrap().label, "14:00");
    }

    #[test]
    fn test_analyze_file() {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(SAMPLE_CSV.as_bytes()).expect("write");
        let analysis = analyze_file(file.path()).unwrap();
        assert_eq!(analysis.records.len(), 8);
        assert_eq!(analysis.clean.len(), 8);
    }

    #[test]
    fn test_analyze_missing_file_is_fatal() {
        let err = analyze_file(Path::new("/nonexistent/data-2.csv")).unwrap_err();
        assert!(matches!(err, ReportError::FileRead { .. }));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = sample_analysis().report;
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["revenue_by_date"].is_array());
        assert_eq!(json["sales_preview"][0]["invoice_no"], "536365");
        assert_eq!(json["sales_preview"][0]["month"], "December");
    }

    #[test]
    fn test_report_to_json_is_pretty() {
        let json = sample_analysis().report.to_json().unwrap();
        assert!(json.starts_with("{\n"));
        assert!(json.contains("\"total_revenue\""));
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let raw = load_transactions_from_reader(
            "InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country\n"
                .as_bytes(),
        )
        .unwrap();
        let report = analyze(raw).unwrap().report;
        assert_eq!(report.total_revenue, 0.0);
        assert!(report.top_products.is_empty());
        assert!(report.product_quantities.is_empty());
        assert_eq!(report.highlights, Highlights::default());
    }
}
