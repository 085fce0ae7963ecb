use crate::processor::field_resolver::Resolved;
use regex::Regex;
use serde_json::Value;
use std::str::FromStr;
use std::sync::LazyLock;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.,\-]").expect("valid price pattern"));

/// Parses a price out of loosely formatted text such as `"$1,234.50"` or `"USD 19.99"`.
///
/// Returns `None` when nothing numeric is left after stripping symbols, when the
/// remainder is not a float, or when the result is negative.
pub fn coerce_price(value: Option<Resolved<'_>>) -> Option<f64> {
    let raw = match value? {
        Resolved::Raw(Value::Number(n)) => return n.as_f64().and_then(non_negative_price),
        other => other.to_string_lossy(),
    };

    let cleaned = NON_NUMERIC.replace_all(&raw, "").replace(',', "");
    if cleaned.is_empty() {
        return None;
    }

    f64::from_str(&cleaned).ok().and_then(non_negative_price)
}

// `-0` passes the sign check and must come out as `0.0`.
fn non_negative_price(p: f64) -> Option<f64> {
    (p.is_finite() && p >= 0.0).then(|| p.abs())
}

/// Parses a non-negative whole number. Floats are truncated toward zero.
pub fn coerce_count(value: Option<Resolved<'_>>) -> Option<u64> {
    match value? {
        Resolved::Text(s) => i64::from_str(s).ok().and_then(|n| u64::try_from(n).ok()),
        Resolved::Raw(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Resolved::Raw(_) => None,
    }
}

/// Parses a non-negative finite float.
pub fn coerce_rating(value: Option<Resolved<'_>>) -> Option<f64> {
    let parsed = match value? {
        Resolved::Text(s) => f64::from_str(s).ok(),
        Resolved::Raw(Value::Number(n)) => n.as_f64(),
        Resolved::Raw(_) => None,
    };
    parsed.filter(|f| f.is_finite() && *f >= 0.0)
}

/// Truncates to at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
