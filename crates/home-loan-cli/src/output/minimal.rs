use serde_json::Value;

use super::format_value;

/// Headline fields in priority order.
const PRIORITY_KEYS: [&str; 5] = [
    "years",
    "payment_delta",
    "monthly_payment",
    "total_interest_paid",
    "total_monthly_payment",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in the result (and in a nested
/// `comparison` object), then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result = value.get("result").unwrap_or(value);
    let candidates = [result.get("comparison"), Some(result)];

    for map in candidates.into_iter().flatten().filter_map(Value::as_object) {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_value(val));
                return;
            }
        }
    }

    if let Some((key, val)) = result.as_object().and_then(|m| m.iter().next()) {
        println!("{key}: {}", format_value(val));
        return;
    }

    println!("{}", format_value(result));
}
