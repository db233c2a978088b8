pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// First field of an object that holds a non-empty array of objects, such as
/// schedule entries or ranked offers.
pub(crate) fn row_field(map: &serde_json::Map<String, Value>) -> Option<(&str, &Vec<Value>)> {
    map.iter().find_map(|(key, val)| match val {
        Value::Array(arr) if matches!(arr.first(), Some(Value::Object(_))) => {
            Some((key.as_str(), arr))
        }
        _ => None,
    })
}
