use serde_json::Value;

use super::format_scalar;

/// Headline figure of each calculator, in priority order.
const HEADLINE_KEYS: [&str; 5] = [
    "monthly_payment",
    "final_value",
    "break_even_units",
    "rank_percent",
    "total_depreciation",
];

/// Print just the headline value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &HEADLINE_KEYS {
            if let Some(val) = map.get(*key).filter(|v| !v.is_null()) {
                println!("{}", format_scalar(val));
                return;
            }
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    if let Value::Array(points) = result_obj {
        println!("{} points", points.len());
        return;
    }

    println!("{}", format_scalar(result_obj));
}
