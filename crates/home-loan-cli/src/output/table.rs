use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten_fields, format_value, row_sets};

/// Format output as tables using the tabled crate.
///
/// Headline fields first, then one table per row set (schedule rows,
/// balance paths), then warnings and methodology.
pub fn print_table(value: &Value) {
    let result = value.get("result").unwrap_or(value);

    if let Value::Object(map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in flatten_fields(map) {
            builder.push_record([key, val]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", format_value(result));
    }

    for (name, rows) in row_sets(value) {
        println!("\n{name}:");
        print_rows(rows);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }

    println!("{}", Table::from(builder));
}
