/// Currency symbol prefixed to every monetary value in the report.
pub const CURRENCY: &str = "£";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use report_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by the binary representation error before rounding so exact
    // decimal midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` is "0.xx"; keep the ".xx".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a monetary amount in pounds with two decimal places and thousands
/// separators.
///
/// ```
/// use report_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56), "£1,234.56");
/// assert_eq!(format_currency(-9.99),   "£-9.99");
/// ```
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("{}-{}", CURRENCY, format_number(amount.abs(), 2))
    } else {
        format!("{}{}", CURRENCY, format_number(amount, 2))
    }
}

/// Format `value` with an SI suffix and `significant` significant digits,
/// the way chart bar labels are printed (`7.29M`, `283.9k`, `15.3`).
///
/// ```
/// use report_core::formatting::format_si;
///
/// assert_eq!(format_si(7_290_000.0, 3), "7.29M");
/// assert_eq!(format_si(283_900.0, 4), "283.9k");
/// assert_eq!(format_si(15.3, 3), "15.3");
/// ```
pub fn format_si(value: f64, significant: u32) -> String {
    const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "k")];

    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }

    let abs = value.abs();
    let (scaled, suffix) = SUFFIXES
        .iter()
        .find(|(scale, _)| abs >= *scale)
        .map(|(scale, suffix)| (value / scale, *suffix))
        .unwrap_or((value, ""));

    let magnitude = scaled.abs().log10().floor() as i32 + 1;
    let decimals = (significant as i32 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, scaled);

    // Trailing zeros carry no information on a chart label.
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    format!("{}{}", text, suffix)
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// ```
/// use report_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    round_to(raw, decimal_places)
}

/// Round `value` half away from zero to `decimal_places`.
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10_f64.powi(decimal_places as i32);
    (value * factor).round() / factor
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
