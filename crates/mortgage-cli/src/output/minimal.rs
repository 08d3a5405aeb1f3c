use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "initial_monthly_payment",
        "total_interest",
        "total_paid",
        "net_benefit",
        "total_savings",
        "breakeven_month",
        "recommended",
    ];

    match result_obj {
        Value::Object(map) => {
            // Try priority keys first (skip null values)
            for key in &priority_keys {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }

            // Fall back to first field
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        // Per-product analyses: one net-benefit line per product
        Value::Array(arr) => {
            for item in arr {
                let (id, benefit) = match item {
                    Value::Object(map) => (
                        map.get("product")
                            .and_then(|p| p.get("id"))
                            .and_then(Value::as_str)
                            .unwrap_or("?"),
                        map.get("net_benefit"),
                    ),
                    _ => ("?", None),
                };
                match benefit {
                    Some(v) => println!("{}: {}", id, format_minimal(v)),
                    None => println!("{}", format_minimal(item)),
                }
            }
        }
        _ => {
            println!("{}", format_minimal(result_obj));
        }
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
