use serde_json::Value;

/// Pretty-print the result envelope as JSON, the default format.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to serialise output as JSON: {}", e),
    }
}
