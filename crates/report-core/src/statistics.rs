use serde::{Deserialize, Serialize};

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation (the same algorithm used by NumPy's `percentile` function).
///
/// Returns `0.0` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

// ── Summary ───────────────────────────────────────────────────────────────────

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator); `None` below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl Summary {
    /// Summarise the present values of a column. Returns `None` when the
    /// column has no values at all.
    pub fn describe(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count as f64 - 1.0)).sqrt()
        });

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            p25: percentile(&sorted, 25.0),
            p50: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
            max: sorted[count - 1],
        })
    }
}

/// A [`Summary`] labelled with the column it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_percentile_single() {
        assert_eq!(percentile(&[42.0], 90.0), 42.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&data, 25.0) - 1.75).abs() < 1e-9);
        assert!((percentile(&data, 50.0) - 2.5).abs() < 1e-9);
        assert!((percentile(&data, 75.0) - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_describe_empty_is_none() {
        assert!(Summary::describe(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_describe_basic() {
        let s = Summary::describe(vec![4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-9);
        // Sample std of 1..4 is sqrt(5/3).
        assert!((s.std.unwrap() - (5.0_f64 / 3.0).sqrt()).abs() < 1e-9);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.p50 - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_describe_single_value_has_no_std() {
        let s = Summary::describe(vec![6.0]).unwrap();
        assert_eq!(s.count, 1);
        assert!(s.std.is_none());
        assert_eq!(s.p25, 6.0);
    }

    #[test]
    fn test_describe_handles_negative_quantities() {
        let s = Summary::describe(vec![-12.0, 6.0, 6.0]).unwrap();
        assert_eq!(s.min, -12.0);
        assert!((s.mean - 0.0).abs() < 1e-9);
    }
}
