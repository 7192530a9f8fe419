//! Row filtering and type conversion for the raw transaction table.
//!
//! Applies, in order: drop rows without a customer or description, drop the
//! `"Unspecified"` country, convert the timestamp and customer id, and drop
//! non-product line items. Later steps rely on the earlier null removal.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use report_core::error::{ReportError, Result};
use report_core::models::{
    is_cancellation, is_excluded_description, RawTransaction, Transaction, UNSPECIFIED_COUNTRY,
};

use crate::reader::RawTable;

/// Timestamp layouts accepted in the `InvoiceDate` column.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

// ── Public types ──────────────────────────────────────────────────────────────

/// Row counts removed by each cleaning step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_in: usize,
    pub missing_customer_or_description: usize,
    pub unspecified_country: usize,
    pub excluded_description: usize,
    pub rows_out: usize,
}

impl CleaningReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_in - self.rows_out
    }
}

/// The cleaned transaction table.
///
/// Every row in `rows` has a customer id and description, a country other
/// than `"Unspecified"`, and a description outside the excluded set.
/// `converted` holds the rows as they stood after type conversion, with the
/// non-product line items still present; the dataset viewer browses these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanTable {
    pub rows: Vec<Transaction>,
    pub converted: Vec<Transaction>,
    pub report: CleaningReport,
}

impl CleanTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Re-apply the row filters to an already-clean table.
    ///
    /// Returns an identical table: every filter is idempotent.
    pub fn reclean(&self) -> CleanTable {
        let converted: Vec<Transaction> = self
            .converted
            .iter()
            .filter(|t| t.country != UNSPECIFIED_COUNTRY)
            .cloned()
            .collect();
        let rows: Vec<Transaction> = self
            .rows
            .iter()
            .filter(|t| t.country != UNSPECIFIED_COUNTRY)
            .filter(|t| !is_excluded_description(&t.description))
            .cloned()
            .collect();
        let report = CleaningReport {
            rows_in: self.rows.len(),
            rows_out: rows.len(),
            ..Default::default()
        };
        CleanTable {
            rows,
            converted,
            report,
        }
    }

    /// Converted rows with `quantity > threshold`, for the dataset viewer.
    ///
    /// Non-product line items such as `POSTAGE` are included.
    pub fn filter_quantity_above(&self, threshold: i64) -> Vec<&Transaction> {
        self.converted
            .iter()
            .filter(|t| t.quantity > threshold)
            .collect()
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Clean `raw` into a new [`CleanTable`].
///
/// Fails with [`ReportError::Conversion`] when a surviving row has a
/// timestamp or customer id that cannot be converted, or lacks any other
/// required cell.
pub fn clean(raw: &RawTable) -> Result<CleanTable> {
    let mut report = CleaningReport {
        rows_in: raw.len(),
        ..Default::default()
    };

    // ── Step 1: Missing customer / description ────────────────────────────────
    let step1: Vec<(usize, &RawTransaction)> = raw
        .rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.customer_id.is_some() && r.description.is_some())
        .collect();
    report.missing_customer_or_description = raw.len() - step1.len();

    // ── Step 2: Unspecified country ───────────────────────────────────────────
    let step2: Vec<(usize, &RawTransaction)> = step1
        .into_iter()
        .filter(|(_, r)| r.country.as_deref() != Some(UNSPECIFIED_COUNTRY))
        .collect();
    report.unspecified_country =
        raw.len() - report.missing_customer_or_description - step2.len();

    // ── Step 3: Type conversion ───────────────────────────────────────────────
    let converted = step2
        .into_iter()
        .map(|(index, r)| convert_row(index, r))
        .collect::<Result<Vec<Transaction>>>()?;

    // ── Step 4: Non-product line items ────────────────────────────────────────
    let rows: Vec<Transaction> = converted
        .iter()
        .filter(|t| !is_excluded_description(&t.description))
        .cloned()
        .collect();
    report.excluded_description = converted.len() - rows.len();
    report.rows_out = rows.len();

    info!(
        "Cleaning kept {} of {} rows ({} missing customer/description, {} unspecified country, {} non-product)",
        report.rows_out,
        report.rows_in,
        report.missing_customer_or_description,
        report.unspecified_country,
        report.excluded_description,
    );

    Ok(CleanTable {
        rows,
        converted,
        report,
    })
}

/// Parse an `InvoiceDate` cell in any of the accepted layouts.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Convert a filtered raw row; `index` is the 0-based row position in the
/// raw table and is reported 1-based.
fn convert_row(index: usize, raw: &RawTransaction) -> Result<Transaction> {
    let row = index + 1;
    let missing = |column: &'static str| ReportError::Conversion {
        row,
        column,
        value: String::new(),
    };

    let invoice_no = raw.invoice_no.clone().ok_or_else(|| missing("InvoiceNo"))?;
    let stock_code = raw.stock_code.clone().ok_or_else(|| missing("StockCode"))?;
    let description = raw
        .description
        .clone()
        .ok_or_else(|| missing("Description"))?;
    let quantity = raw.quantity.ok_or_else(|| missing("Quantity"))?;
    let unit_price = raw.unit_price.ok_or_else(|| missing("UnitPrice"))?;
    let country = raw.country.clone().ok_or_else(|| missing("Country"))?;

    let date_text = raw
        .invoice_date
        .as_deref()
        .ok_or_else(|| missing("InvoiceDate"))?;
    let invoice_date = parse_timestamp(date_text).ok_or_else(|| ReportError::Conversion {
        row,
        column: "InvoiceDate",
        value: date_text.to_string(),
    })?;

    let raw_customer = raw.customer_id.ok_or_else(|| missing("CustomerID"))?;
    let customer_id = to_customer_id(raw_customer).ok_or_else(|| ReportError::Conversion {
        row,
        column: "CustomerID",
        value: raw_customer.to_string(),
    })?;

    let is_canceled = is_cancellation(&invoice_no);

    Ok(Transaction {
        invoice_no,
        stock_code,
        description,
        quantity,
        unit_price,
        customer_id,
        country,
        invoice_date,
        is_canceled,
    })
}

/// Accept only non-negative whole numbers that fit a `u32`.
fn to_customer_id(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use report_core::models::EXCLUDED_DESCRIPTIONS;

    fn raw(
        invoice: &str,
        description: Option<&str>,
        quantity: i64,
        customer: Option<f64>,
        country: &str,
        date: &str,
    ) -> RawTransaction {
        RawTransaction {
            invoice_no: Some(invoice.to_string()),
            stock_code: Some("85123A".to_string()),
            description: description.map(str::to_string),
            quantity: Some(quantity),
            invoice_date: Some(date.to_string()),
            unit_price: Some(2.55),
            customer_id: customer,
            country: Some(country.to_string()),
        }
    }

    fn table(rows: Vec<RawTransaction>) -> RawTable {
        RawTable { rows }
    }

    #[test]
    fn test_single_valid_row_is_kept() {
        let t = table(vec![raw(
            "536365",
            Some("WHITE HANGING HEART"),
            6,
            Some(17850.0),
            "United Kingdom",
            "2010-12-01 08:26",
        )]);
        let clean_table = clean(&t).unwrap();
        assert_eq!(clean_table.len(), 1);

        let row = &clean_table.rows[0];
        assert_eq!(row.customer_id, 17850);
        assert_eq!(row.quantity, 6);
        assert!(!row.is_canceled);
        assert_eq!(
            row.invoice_date,
            NaiveDateTime::parse_from_str("2010-12-01 08:26", "%Y-%m-%d %H:%M").unwrap()
        );
    }

    #[test]
    fn test_drops_missing_customer_and_description() {
        let t = table(vec![
            raw("1", Some("A"), 1, None, "France", "12/1/2010 8:26"),
            raw("2", None, 1, Some(1.0), "France", "12/1/2010 8:26"),
            raw("3", Some("B"), 1, Some(2.0), "France", "12/1/2010 8:26"),
        ]);
        let clean_table = clean(&t).unwrap();
        assert_eq!(clean_table.len(), 1);
        assert_eq!(clean_table.rows[0].invoice_no, "3");
        assert_eq!(clean_table.report.missing_customer_or_description, 2);
    }

    #[test]
    fn test_missing_customer_never_reaches_conversion() {
        // The bad date would be fatal if this row survived step 1.
        let t = table(vec![raw("1", Some("A"), 1, None, "France", "not a date")]);
        assert!(clean(&t).unwrap().is_empty());
    }

    #[test]
    fn test_drops_unspecified_country() {
        let t = table(vec![
            raw("1", Some("A"), 1, Some(1.0), "Unspecified", "12/1/2010 8:26"),
            raw("2", Some("B"), 1, Some(1.0), "EIRE", "12/1/2010 8:26"),
        ]);
        let clean_table = clean(&t).unwrap();
        assert_eq!(clean_table.len(), 1);
        assert_eq!(clean_table.report.unspecified_country, 1);
    }

    #[test]
    fn test_drops_every_excluded_description() {
        let mut rows: Vec<RawTransaction> = EXCLUDED_DESCRIPTIONS
            .iter()
            .map(|d| raw("1", Some(*d), 1, Some(1.0), "France", "12/1/2010 8:26"))
            .collect();
        rows.push(raw("2", Some("PAPER CRAFT , LITTLE BIRDIE"), 1, Some(1.0), "France", "12/1/2010 8:26"));

        let clean_table = clean(&table(rows)).unwrap();
        assert_eq!(clean_table.len(), 1);
        assert_eq!(clean_table.report.excluded_description, EXCLUDED_DESCRIPTIONS.len());
        assert_eq!(clean_table.report.rows_dropped(), EXCLUDED_DESCRIPTIONS.len());
    }

    #[test]
    fn test_excluded_description_must_match_exactly() {
        let t = table(vec![raw("1", Some("POSTAGE "), 1, Some(1.0), "France", "12/1/2010 8:26")]);
        let clean_table = clean(&t).unwrap();
        assert_eq!(clean_table.len(), 1);
        assert_eq!(clean_table.report.excluded_description, 0);
    }

    #[test]
    fn test_cancellation_flag_computed() {
        let t = table(vec![raw("C536379", Some("A"), -1, Some(14527.0), "France", "12/1/2010 9:41")]);
        let clean_table = clean(&t).unwrap();
        assert!(clean_table.rows[0].is_canceled);
    }

    #[test]
    fn test_bad_timestamp_is_conversion_error() {
        let t = table(vec![
            raw("1", Some("A"), 1, Some(1.0), "France", "12/1/2010 8:26"),
            raw("2", Some("B"), 1, Some(1.0), "France", "yesterday"),
        ]);
        match clean(&t).unwrap_err() {
            ReportError::Conversion { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "InvoiceDate");
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fractional_customer_is_conversion_error() {
        let t = table(vec![raw("1", Some("A"), 1, Some(17850.5), "France", "12/1/2010 8:26")]);
        assert!(matches!(
            clean(&t),
            Err(ReportError::Conversion {
                column: "CustomerID",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_quantity_is_conversion_error() {
        let mut row = raw("1", Some("A"), 1, Some(1.0), "France", "12/1/2010 8:26");
        row.quantity = None;
        assert!(matches!(
            clean(&table(vec![row])),
            Err(ReportError::Conversion {
                column: "Quantity",
                ..
            })
        ));
    }

    #[test]
    fn test_reclean_is_noop() {
        let t = table(vec![
            raw("1", Some("A"), 1, Some(1.0), "France", "12/1/2010 8:26"),
            raw("2", Some("POSTAGE"), 1, Some(1.0), "France", "12/1/2010 8:26"),
            raw("3", Some("B"), 1, Some(1.0), "Unspecified", "12/1/2010 8:26"),
        ]);
        let once = clean(&t).unwrap();
        let twice = once.reclean();
        assert_eq!(once.rows, twice.rows);
        assert_eq!(twice.report.rows_dropped(), 0);
    }

    #[test]
    fn test_clean_invariants_hold() {
        let t = table(vec![
            raw("1", Some("A"), 1, Some(1.0), "France", "12/1/2010 8:26"),
            raw("2", Some("Manual"), 1, Some(2.0), "France", "12/1/2010 8:26"),
            raw("3", None, 1, Some(3.0), "France", "12/1/2010 8:26"),
            raw("4", Some("C"), 1, Some(4.0), "Unspecified", "12/1/2010 8:26"),
            raw("5", Some("D"), 1, None, "Spain", "12/1/2010 8:26"),
        ]);
        for row in clean(&t).unwrap().rows {
            assert_ne!(row.country, UNSPECIFIED_COUNTRY);
            assert!(!is_excluded_description(&row.description));
        }
    }

    #[test]
    fn test_filter_quantity_above() {
        let t = table(vec![
            raw("1", Some("A"), -5, Some(1.0), "France", "12/1/2010 8:26"),
            raw("2", Some("B"), 0, Some(1.0), "France", "12/1/2010 8:26"),
            raw("3", Some("C"), 12, Some(1.0), "France", "12/1/2010 8:26"),
        ]);
        let clean_table = clean(&t).unwrap();
        assert_eq!(clean_table.filter_quantity_above(0).len(), 1);
        assert_eq!(clean_table.filter_quantity_above(-10).len(), 3);
        assert!(clean_table.filter_quantity_above(1000).is_empty());
    }

    #[test]
    fn test_filter_quantity_above_keeps_non_product_rows() {
        let t = table(vec![
            raw("1", Some("WHITE HANGING HEART"), 6, Some(1.0), "France", "12/1/2010 8:26"),
            raw("2", Some("POSTAGE"), 3, Some(1.0), "France", "12/1/2010 8:26"),
        ]);
        let clean_table = clean(&t).unwrap();
        assert_eq!(clean_table.len(), 1);

        let viewed: Vec<&str> = clean_table
            .filter_quantity_above(0)
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(viewed, vec!["WHITE HANGING HEART", "POSTAGE"]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDateTime::parse_from_str("2010-12-01 08:26", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(parse_timestamp("12/1/2010 8:26"), Some(expected));
        assert_eq!(parse_timestamp("2010-12-01 08:26"), Some(expected));
        assert_eq!(parse_timestamp("2010-12-01 08:26:00"), Some(expected));
        assert_eq!(parse_timestamp("2010-12-01T08:26:00"), Some(expected));
        assert_eq!(parse_timestamp("garbage"), None);
    }
}
