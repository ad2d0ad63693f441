//! Primitive coercions: number, string, and the boolean heuristic.
//!
//! All three are total. A value that cannot be read as a number becomes
//! `NaN`; every value has a textual form; every value is either truthy or
//! not.

use crate::options::BoolMatch;

/// Texts that read as `true`.
const TRUE_TOKENS: &[&str] = &["t", "true", "y", "yes", "on"];

// ──────────────────────────────────────────────
// Numbers
// ──────────────────────────────────────────────

/// Read a raw value as a number.
///
/// `null` is 0, booleans are 1/0, strings are trimmed and parsed as decimal
/// (or `0x`/`0o`/`0b` prefixed) literals with the empty string reading as 0.
/// Arrays go through their textual form, so `[]` is 0 and `["7"]` is 7.
/// Anything else is `NaN`.
pub fn to_number(raw: &serde_json::Value) -> f64 {
    match raw {
        serde_json::Value::Null => 0.0,
        serde_json::Value::Bool(b) => f64::from(u8::from(*b)),
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        serde_json::Value::String(s) => parse_number(s),
        serde_json::Value::Array(_) => parse_number(&to_text(raw)),
        serde_json::Value::Object(_) => f64::NAN,
    }
}

/// Parse numeric text; `NaN` when it is not a numeric literal.
pub fn parse_number(text: &str) -> f64 {
    let s = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(n) = parse_radix_literal(s) {
        return n;
    }
    if is_decimal_literal(s) {
        return s.parse::<f64>().unwrap_or(f64::NAN);
    }
    f64::NAN
}

/// `0x1F`, `0o17`, `0b101`. Unsigned only.
fn parse_radix_literal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut acc = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => acc = acc * f64::from(radix) + f64::from(d),
            None => return Some(f64::NAN),
        }
    }
    Some(acc)
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut mantissa_digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        mantissa_digits += i - frac_start;
    }
    if mantissa_digits == 0 {
        return false;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

// ──────────────────────────────────────────────
// Strings
// ──────────────────────────────────────────────

/// The natural textual form of a raw value.
///
/// `null` is `"null"`, numbers print in shortest form without a trailing
/// `.0`, arrays join their elements with `,` (null elements print empty),
/// and objects are `"[object Object]"`.
pub fn to_text(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                format_number(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::Null => String::new(),
                other => to_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        serde_json::Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Format a float the way a JSON producer would print it back.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{}", n);
    }
    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => {
            format!("{}e+{}", mantissa, power)
        }
        _ => exp,
    }
}

// ──────────────────────────────────────────────
// Booleans
// ──────────────────────────────────────────────

/// The permissive boolean heuristic.
///
/// Numbers are true iff nonzero. Everything else is turned into text,
/// trimmed and lower-cased, and is true iff it starts with one of `t`,
/// `true`, `y`, `yes`, `on`. `null` reads as the text `"null"` and is false.
pub fn to_bool(raw: &serde_json::Value) -> bool {
    to_bool_with(raw, BoolMatch::Prefix)
}

/// [`to_bool`] with a choice of token matching.
pub fn to_bool_with(raw: &serde_json::Value, mode: BoolMatch) -> bool {
    if let serde_json::Value::Number(n) = raw {
        return n.as_f64().is_some_and(|f| f != 0.0);
    }
    let text = to_text(raw).trim().to_lowercase();
    match mode {
        BoolMatch::Prefix => TRUE_TOKENS.iter().any(|t| text.starts_with(t)),
        BoolMatch::Exact => TRUE_TOKENS.contains(&text.as_str()),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
