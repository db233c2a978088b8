use serde_json::Value;
use std::io;

use super::row_field;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                if let Some((_, rows)) = row_field(result) {
                    // Schedules and offer lists export one row per item
                    write_array_csv(&mut wtr, rows);
                } else {
                    let _ = wtr.write_record(["field", "value"]);
                    for (key, val) in result {
                        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                    }
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first
            .iter()
            .filter(|(_, v)| !v.is_array())
            .map(|(k, _)| k.as_str())
            .collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
