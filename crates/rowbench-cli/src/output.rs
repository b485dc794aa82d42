//! Shared output formatting helpers.

use serde::Serialize;

/// Print a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Print a key-value pair with aligned formatting.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<20} {}", key, value);
}

/// Format an optional millisecond value.
pub fn ms(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2} ms", v))
        .unwrap_or_else(|| "-".to_string())
}
