use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Character whose presence in an invoice number marks a cancellation.
pub const CANCELLATION_MARKER: char = 'C';

/// Country value used by the dataset when the origin is unknown.
pub const UNSPECIFIED_COUNTRY: &str = "Unspecified";

/// Line-item descriptions that are fees or adjustments rather than products.
pub const EXCLUDED_DESCRIPTIONS: [&str; 6] = [
    "POSTAGE",
    "CARRIAGE",
    "Discount",
    "DOTCOM POSTAGE",
    "CRUK Commission",
    "Manual",
];

/// Header names the input file must carry, in their canonical column order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "InvoiceNo",
    "StockCode",
    "Description",
    "Quantity",
    "InvoiceDate",
    "UnitPrice",
    "CustomerID",
    "Country",
];

/// Returns `true` when `invoice_no` denotes a canceled order.
pub fn is_cancellation(invoice_no: &str) -> bool {
    invoice_no.contains(CANCELLATION_MARKER)
}

/// Returns `true` when `description` is one of the non-product line items.
pub fn is_excluded_description(description: &str) -> bool {
    EXCLUDED_DESCRIPTIONS.contains(&description)
}

/// One row of the transaction log exactly as read from disk.
///
/// Every cell is optional so that missing values can be counted before
/// cleaning. Text cells keep their whitespace; numeric cells are trimmed
/// before parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "InvoiceNo")]
    pub invoice_no: Option<String>,
    #[serde(rename = "StockCode")]
    pub stock_code: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Quantity", default, deserialize_with = "trimmed_number")]
    pub quantity: Option<i64>,
    /// Timestamp text, converted during cleaning.
    #[serde(rename = "InvoiceDate")]
    pub invoice_date: Option<String>,
    #[serde(rename = "UnitPrice", default, deserialize_with = "trimmed_number")]
    pub unit_price: Option<f64>,
    /// Read as a decimal because the source writes ids like `17850.0`.
    #[serde(rename = "CustomerID", default, deserialize_with = "trimmed_number")]
    pub customer_id: Option<f64>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
}

/// Parse an optional numeric cell, ignoring surrounding whitespace.
fn trimmed_number<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let cell: Option<String> = Option::deserialize(deserializer)?;
    match cell.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl RawTransaction {
    /// Whether the cell under `column` is empty.
    ///
    /// Unknown column names are reported as present.
    pub fn is_missing(&self, column: &str) -> bool {
        match column {
            "InvoiceNo" => self.invoice_no.is_none(),
            "StockCode" => self.stock_code.is_none(),
            "Description" => self.description.is_none(),
            "Quantity" => self.quantity.is_none(),
            "InvoiceDate" => self.invoice_date.is_none(),
            "UnitPrice" => self.unit_price.is_none(),
            "CustomerID" => self.customer_id.is_none(),
            "Country" => self.country.is_none(),
            _ => false,
        }
    }
}

/// A cleaned transaction with every required field present and typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub invoice_no: String,
    pub stock_code: String,
    pub description: String,
    /// Signed; negative on returns and cancellations.
    pub quantity: i64,
    pub unit_price: f64,
    pub customer_id: u32,
    pub country: String,
    pub invoice_date: NaiveDateTime,
    /// Computed once from the invoice number.
    pub is_canceled: bool,
}

impl Transaction {
    /// Absolute line value, `|unit_price × quantity|`.
    pub fn revenue(&self) -> f64 {
        (self.unit_price * self.quantity as f64).abs()
    }
}

/// A cleaned transaction together with its derived calendar and revenue
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub revenue: f64,
    pub year: i32,
    /// English month name, e.g. `"December"`.
    pub month: String,
    /// `"{month}-{year}"`, e.g. `"December-2010"`.
    pub date: String,
    /// English day name, e.g. `"Wednesday"`.
    pub day: String,
    pub hour: u32,
}

impl SalesRecord {
    pub fn is_canceled(&self) -> bool {
        self.transaction.is_canceled
    }
}
