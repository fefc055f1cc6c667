use serde_json::{Map, Value};

/// Headline figure of each report, most specific first.
const PRIORITY_KEYS: [&str; 6] = [
    "remainingBalance",
    "projectedDate",
    "monthlyPayment",
    "monthsNeeded",
    "percent",
    "total",
];

/// Print just the key answer from the output.
///
/// Looks for a well-known field in the result and in the objects directly
/// under it, then falls back to the first scalar field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        println!("{}", format_minimal(result_obj));
        return;
    };

    if let Some(val) = find_priority(map) {
        println!("{}", format_minimal(val));
        return;
    }

    match map.iter().find(|(_, v)| !v.is_object() && !v.is_array()) {
        Some((key, val)) => println!("{}: {}", key, format_minimal(val)),
        None => println!("{}", format_minimal(result_obj)),
    }
}

fn find_priority(map: &Map<String, Value>) -> Option<&Value> {
    let nested: Vec<&Map<String, Value>> = map.values().filter_map(Value::as_object).collect();
    PRIORITY_KEYS.iter().find_map(|key| {
        std::iter::once(map)
            .chain(nested.iter().copied())
            .find_map(|m| m.get(*key).filter(|v| !v.is_null()))
    })
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
