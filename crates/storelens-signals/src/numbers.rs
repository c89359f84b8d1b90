//! Parsing of abbreviated social-media counters ("1.5K", "12,5 mil", "2M").

use std::sync::LazyLock;

use regex::Regex;

static COUNTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)*)\s*(mill\w*|mil\b|k\b|m\b|b\b)?").expect("valid regex")
});

/// Parses the first counter in `text`, expanding magnitude suffixes.
///
/// Thousands separators may be `.` or `,`. With a suffix, a single separator
/// is a decimal mark (`"1.5K"` is 1500, `"12,5 mil"` is 12500). Without one,
/// a single separator followed by exactly three digits is a thousands
/// separator (`"1,234"` is 1234).
#[must_use]
pub fn parse_social_number(text: &str) -> Option<u64> {
    let caps = COUNTER_RE.captures(text)?;
    let digits = caps.get(1)?.as_str();
    let suffix = caps.get(2).map(|m| m.as_str().to_lowercase());

    let multiplier: f64 = match suffix.as_deref() {
        None => 1.0,
        Some("k" | "mil") => 1_000.0,
        Some("b") => 1_000_000_000.0,
        Some(_) => 1_000_000.0,
    };
    let value = numeric_value(digits, suffix.is_some())?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = (value * multiplier).round() as u64;
    Some(count)
}

fn numeric_value(digits: &str, prefer_decimal: bool) -> Option<f64> {
    let separators: Vec<(usize, char)> = digits
        .char_indices()
        .filter(|(_, c)| matches!(c, '.' | ','))
        .collect();

    let normalized = match separators.as_slice() {
        [] => digits.to_string(),
        [(idx, _)] => {
            let fraction_len = digits.len() - idx - 1;
            if prefer_decimal || fraction_len != 3 {
                digits.replace(',', ".")
            } else {
                digits.replace(['.', ','], "")
            }
        }
        [.., (last_idx, last)] => {
            let mixed = separators.iter().any(|(_, c)| c != last);
            if mixed {
                let (int_part, fraction) = digits.split_at(*last_idx);
                format!("{}.{}", int_part.replace(['.', ','], ""), &fraction[1..])
            } else {
                digits.replace(['.', ','], "")
            }
        }
    };
    normalized.parse::<f64>().ok()
}
