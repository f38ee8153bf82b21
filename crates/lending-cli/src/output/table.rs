use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{display_value, row_array};

/// Render a response as tables: scalar fields as a Field/Value table and
/// any row array (schedule, installments) as its own table below.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else {
                print_result(value);
            }
        }
        Value::Array(rows) => print_rows(rows),
        _ => println!("{value}"),
    }
}

fn print_result(result: &Value) {
    let Value::Object(map) = result else {
        println!("{}", display_value(result));
        return;
    };

    println!("{}", field_table(map));

    if let Some((name, rows)) = row_array(map) {
        println!("\n{}:", name);
        print_rows(rows);
    }
}

fn field_table(map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        match val {
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
                builder.push_record([key.clone(), format!("{} rows (below)", rows.len())]);
            }
            Value::Object(inner) => {
                for (inner_key, inner_val) in inner {
                    builder.push_record([format!("{key}.{inner_key}"), format_cell(inner_val)]);
                }
            }
            _ => builder.push_record([key.clone(), format_cell(val)]),
        }
    }
    Table::from(builder)
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            println!("{}", format_cell(row));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        if let Value::Object(map) = row {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_cell).unwrap_or_default())
                .collect();
            builder.push_record(cells);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(items) => items.iter().map(format_cell).collect::<Vec<_>>().join(", "),
        _ => display_value(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_table_flattens_nested_objects() {
        let value = json!({
            "calculation": {"payment_amount": "892.63"},
            "schedule": [{"payment_number": 1}, {"payment_number": 2}],
            "end_date": "2025-07-01"
        });
        let rendered = field_table(value.as_object().unwrap()).to_string();
        assert!(rendered.contains("calculation.payment_amount"));
        assert!(rendered.contains("2 rows (below)"));
        assert!(rendered.contains("2025-07-01"));
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&Value::Null), "-");
        assert_eq!(format_cell(&json!(["a", "b"])), "a, b");
    }
}
