//! Calendar labels and the canonical orderings used to sort them.
//!
//! Month and weekday labels are plain strings once they reach an aggregation
//! table, so every ordered table converts its labels back to a sort key here
//! instead of relying on string order.

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};

use crate::error::{ReportError, Result};

// ── Labels ────────────────────────────────────────────────────────────────────

/// English month name of `ts`, e.g. `"December"`.
pub fn month_name(ts: &NaiveDateTime) -> String {
    ts.format("%B").to_string()
}

/// English weekday name of `ts`, e.g. `"Wednesday"`.
pub fn day_name(ts: &NaiveDateTime) -> String {
    ts.format("%A").to_string()
}

/// The date label used as the monthly x-axis category: `"{Month}-{Year}"`.
pub fn date_label(ts: &NaiveDateTime) -> String {
    format!("{}-{}", month_name(ts), ts.year())
}

/// Hour-of-day in `0..=23`.
pub fn hour_of_day(ts: &NaiveDateTime) -> u32 {
    ts.hour()
}

/// Display label for an hour bucket, e.g. `8` → `"8:00"`.
pub fn hour_label(hour: u32) -> String {
    format!("{}:00", hour)
}

// ── MonthKey ──────────────────────────────────────────────────────────────────

/// Chronological sort key recovered from a date label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// Calendar month, `1..=12`.
    pub month: u32,
}

impl MonthKey {
    /// Parse a label produced by [`date_label`].
    ///
    /// ```
    /// use report_core::calendar::MonthKey;
    ///
    /// let key = MonthKey::parse("December-2010").unwrap();
    /// assert_eq!((key.year, key.month), (2010, 12));
    /// assert!(MonthKey::parse("Smarch-2011").is_err());
    /// ```
    pub fn parse(label: &str) -> Result<Self> {
        let unknown = || ReportError::UnknownOrderingLabel(label.to_string());

        let (name, year) = label.rsplit_once('-').ok_or_else(unknown)?;
        let month: Month = name.parse().map_err(|_| unknown())?;
        let year: i32 = year.parse().map_err(|_| unknown())?;

        Ok(Self {
            year,
            month: month.number_from_month(),
        })
    }
}

/// Position of a weekday label in a Monday-first week (`0..=6`).
pub fn weekday_key(label: &str) -> Result<u32> {
    let day: Weekday = label
        .parse()
        .map_err(|_| ReportError::UnknownOrderingLabel(label.to_string()))?;
    Ok(day.num_days_from_monday())
}

// ── Ordering ──────────────────────────────────────────────────────────────────

/// Sort `rows` by an explicit, position-aligned list of `keys`.
///
/// `keys[i]` is the sort key of `rows[i]`. A key list of the wrong length is
/// rejected instead of silently misaligning rows. Equal keys keep their
/// input order.
pub fn order_by_keys<T, K: Ord>(rows: Vec<T>, keys: Vec<K>) -> Result<Vec<T>> {
    if keys.len() != rows.len() {
        return Err(ReportError::OrderMismatch {
            expected: rows.len(),
            found: keys.len(),
        });
    }

    let mut keyed: Vec<(K, T)> = keys.into_iter().zip(rows).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, row)| row).collect())
}

/// Order rows chronologically by the date label `label_of` extracts.
pub fn order_chronologically<T>(rows: Vec<T>, label_of: impl Fn(&T) -> &str) -> Result<Vec<T>> {
    let keys = rows
        .iter()
        .map(|row| MonthKey::parse(label_of(row)))
        .collect::<Result<Vec<_>>>()?;
    order_by_keys(rows, keys)
}

/// Order rows Monday → Sunday by the weekday label `label_of` extracts.
pub fn order_by_weekday<T>(rows: Vec<T>, label_of: impl Fn(&T) -> &str) -> Result<Vec<T>> {
    let keys = rows
        .iter()
        .map(|row| weekday_key(label_of(row)))
        .collect::<Result<Vec<_>>>()?;
    order_by_keys(rows, keys)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
