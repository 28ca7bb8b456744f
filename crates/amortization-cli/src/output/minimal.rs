use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields (inside `summary` when present),
/// then falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", render_minimal(value));
}

pub fn render_minimal(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    let result_obj = result_obj.get("summary").unwrap_or(result_obj);

    let priority_keys = ["monthly_payment", "rate_percent"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                return format_minimal(val);
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
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
