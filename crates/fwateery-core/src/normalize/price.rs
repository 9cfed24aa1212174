//! Price normalization with OCR drift correction.

/// No genuine invoice price exceeds this many units.
pub const PRICE_CEILING: f64 = 3000.0;

/// Normalize a model-reported price to an integer string.
///
/// Everything except ASCII digits and `.` is dropped, the leading number is
/// parsed, and values above [`PRICE_CEILING`] are divided by 10 until they
/// fit (OCR tends to read "150.00" as "15000"). The result is rounded and
/// rendered without decimals. Empty, unparseable or non-finite input
/// yields `"0"`.
pub fn normalize_price(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return "0".to_string();
    };

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut value = match parse_leading_float(&cleaned) {
        Some(v) if v.is_finite() => v,
        _ => return "0".to_string(),
    };

    while value > PRICE_CEILING {
        value /= 10.0;
    }

    format!("{}", value.round() as u64)
}

/// Parse the longest prefix of digits with at most one decimal point.
fn parse_leading_float(s: &str) -> Option<f64> {
    let end = s
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    s[..end].parse::<f64>().ok()
}
