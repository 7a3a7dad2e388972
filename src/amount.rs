// src/amount.rs
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static DECIMAL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
        .expect("decimal prefix regex should be valid")
});

/// Longest leading decimal number in `s`, ignoring anything after it.
pub fn parse_decimal_prefix(s: &str) -> Option<f64> {
    DECIMAL_PREFIX
        .find(s)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Convert a display amount such as `"$1.2M"` or `"$950K"` into a number.
///
/// `$` and `,` are ignored, a trailing `M` or `K` scales the value. Missing
/// or unreadable amounts come back as `0.0`.
pub fn to_number(amount: Option<&str>) -> f64 {
    let raw = match amount {
        Some(s) if !s.trim().is_empty() => s,
        _ => {
            warn!(?amount, "invalid amount value encountered");
            return 0.0;
        }
    };

    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    let cleaned = cleaned.trim();

    let (digits, scale) = if let Some(d) = cleaned.strip_suffix('M') {
        (d, 1_000_000.0)
    } else if let Some(d) = cleaned.strip_suffix('K') {
        (d, 1_000.0)
    } else {
        (cleaned, 1.0)
    };

    parse_decimal_prefix(digits)
        .map(|v| v * scale)
        .unwrap_or(0.0)
}
