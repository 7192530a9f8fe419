//! Derived revenue and calendar fields.

use chrono::Datelike;
use report_core::calendar;
use report_core::models::{SalesRecord, Transaction};

use crate::cleaner::CleanTable;

/// Attach revenue, year, month, date label, day and hour to every clean row.
pub fn derive(table: &CleanTable) -> Vec<SalesRecord> {
    table.rows.iter().cloned().map(derive_record).collect()
}

/// Derive the fields of a single transaction.
pub fn derive_record(transaction: Transaction) -> SalesRecord {
    let ts = transaction.invoice_date;
    SalesRecord {
        revenue: transaction.revenue(),
        year: ts.year(),
        month: calendar::month_name(&ts),
        date: calendar::date_label(&ts),
        day: calendar::day_name(&ts),
        hour: calendar::hour_of_day(&ts),
        transaction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::clean;
    use crate::reader::load_transactions_from_reader;

    #[test]
    fn test_end_to_end_single_row() {
        let csv_data = "\
InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country
536365,85123A,WHITE HANGING HEART,6,2010-12-01 08:26,2.55,17850,United Kingdom
";
        let raw = load_transactions_from_reader(csv_data.as_bytes()).unwrap();
        let table = clean(&raw).unwrap();
        assert_eq!(table.len(), 1);

        let records = derive(&table);
        let r = &records[0];
        assert!((r.revenue - 15.30).abs() < 1e-9);
        assert_eq!(r.year, 2010);
        assert_eq!(r.month, "December");
        assert_eq!(r.date, "December-2010");
        assert_eq!(r.day, "Wednesday");
        assert_eq!(r.hour, 8);
        assert!(!r.is_canceled());
    }

    #[test]
    fn test_revenue_non_negative_for_returns() {
        let csv_data = "\
InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country
C536379,22556,PLASTERS IN TIN CIRCUS PARADE,-12,12/1/2010 9:41,1.65,14527,United Kingdom
536380,22961,JAM MAKING SET PRINTED,24,12/1/2010 9:41,1.45,17809,United Kingdom
";
        let raw = load_transactions_from_reader(csv_data.as_bytes()).unwrap();
        let records = derive(&clean(&raw).unwrap());
        for r in &records {
            assert!(r.revenue >= 0.0);
            let expected = (r.transaction.unit_price * r.transaction.quantity as f64).abs();
            assert!((r.revenue - expected).abs() < 1e-9);
        }
        assert!(records[0].is_canceled());
        assert!((records[0].revenue - 19.8).abs() < 1e-9);
    }

    #[test]
    fn test_derive_empty_table() {
        assert!(derive(&CleanTable::default()).is_empty());
    }
}
