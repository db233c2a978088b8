use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::row_field;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Value::Object(res_map) = result {
        let rows = row_field(res_map);

        // Scalar fields first, then the row collection as its own table
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            if rows.is_some_and(|(k, _)| k == key.as_str()) {
                continue;
            }
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));

        if let Some((key, arr)) = rows {
            println!("\n{}:", key);
            print_array_table(arr);
        }
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        // nested collections (per-offer schedules) are too wide for a cell
        let headers: Vec<String> = first
            .iter()
            .filter(|(_, v)| !v.is_array())
            .map(|(k, _)| k.clone())
            .collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("558.40")), "558.40");
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!([1, 2])), "1, 2");
    }
}
