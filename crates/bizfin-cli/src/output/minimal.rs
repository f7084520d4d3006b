use serde_json::Value;

use super::{cell, result_of};

/// The headline figure of each calculator, most specific first: a solved
/// price or profit-target volume beats the plain break-even volume.
const PRIORITY_KEYS: [&str; 8] = [
    "required_price",
    "units_for_profit",
    "break_even_units",
    "expected_profit",
    "total_required",
    "peak_funding_requirement",
    "summary",
    "valid",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = result_of(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        // valuation summary range
        Value::Object(map) if map.contains_key("min") && map.contains_key("max") => {
            let min = map.get("min").map(cell).unwrap_or_default();
            let max = map.get("max").map(cell).unwrap_or_default();
            match map.get("average") {
                Some(avg) => format!("{min} to {max} (average {})", cell(avg)),
                None => format!("{min} to {max}"),
            }
        }
        Value::Null => "null".to_string(),
        _ => cell(value),
    }
}
