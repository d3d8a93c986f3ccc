pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Scalar fields of the result object, nested objects flattened with a
/// `parent.child` key. Arrays of objects are left to the tabular printers.
pub(crate) fn flatten_fields(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                for (child, child_val) in flatten_fields(inner) {
                    fields.push((format!("{key}.{child}"), child_val));
                }
            }
            Value::Array(items) if items.iter().any(Value::is_object) => {}
            _ => fields.push((key.clone(), format_value(val))),
        }
    }
    fields
}

/// Named arrays of row objects inside the output: schedule rows and
/// balance paths.
pub(crate) fn row_sets(value: &Value) -> Vec<(&str, &[Value])> {
    let mut sets = Vec::new();
    let containers = [Some(value), value.get("result")];
    for container in containers.into_iter().flatten() {
        if let Value::Object(map) = container {
            for (key, val) in map {
                if let Value::Array(items) = val {
                    if items.first().is_some_and(Value::is_object) {
                        sets.push((key.as_str(), items.as_slice()));
                    }
                }
            }
        }
    }
    sets
}

pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join("; ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
