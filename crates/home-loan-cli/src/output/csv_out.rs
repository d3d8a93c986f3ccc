use serde_json::Value;
use std::io;

use super::{flatten_fields, format_value, row_sets};

/// Write output as CSV to stdout.
///
/// The first row set (schedule rows or balance paths) is written as a
/// table when present; otherwise the headline fields as `field,value`.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some((_, rows)) = row_sets(value).into_iter().next() {
        write_rows(&mut wtr, rows);
    } else if let Value::Object(map) = value.get("result").unwrap_or(value) {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in flatten_fields(map) {
            let _ = wtr.write_record([key, val]);
        }
    } else {
        let _ = wtr.write_record([format_value(value)]);
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}
