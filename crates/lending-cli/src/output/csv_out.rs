use serde_json::{Map, Value};
use std::io::{self, Write};

use super::{display_value, result_of, row_array};

/// Write output as CSV to stdout.
///
/// A response carrying rows (schedule, installments) is written one row per
/// record; anything else becomes a two-column field,value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    write_csv(&mut wtr, value);
    let _ = wtr.flush();
}

fn write_csv<W: Write>(wtr: &mut csv::Writer<W>, value: &Value) {
    match result_of(value) {
        Value::Object(map) => match row_array(map) {
            Some((_, rows)) => write_rows(wtr, rows),
            None => write_fields(wtr, map),
        },
        Value::Array(rows) => write_rows(wtr, rows),
        other => {
            let _ = wtr.write_record([display_value(other)]);
        }
    }
}

fn write_fields<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &display_value(val)]);
    }
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            let _ = wtr.write_record([display_value(row)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(display_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}
