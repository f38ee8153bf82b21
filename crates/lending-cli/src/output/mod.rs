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

/// Unwrap the computation envelope if present.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// First field of an object holding an array of row objects
/// (a schedule, a reassessed installment list).
pub(crate) fn row_array(map: &serde_json::Map<String, Value>) -> Option<(&str, &[Value])> {
    map.iter().find_map(|(key, val)| match val {
        Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
            Some((key.as_str(), rows.as_slice()))
        }
        _ => None,
    })
}

/// Render a scalar JSON value for a cell.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_of_unwraps_envelope() {
        let wrapped = json!({"result": {"a": 1}, "warnings": []});
        assert_eq!(result_of(&wrapped), &json!({"a": 1}));
        let bare = json!({"a": 1});
        assert_eq!(result_of(&bare), &bare);
    }

    #[test]
    fn test_row_array_finds_schedule() {
        let value = json!({"end_date": "2025-06-01", "schedule": [{"payment_number": 1}]});
        let (key, rows) = row_array(value.as_object().unwrap()).unwrap();
        assert_eq!(key, "schedule");
        assert_eq!(rows.len(), 1);
        assert!(row_array(json!({"warnings": ["x"]}).as_object().unwrap()).is_none());
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("933.33")), "933.33");
        assert_eq!(display_value(&json!(6)), "6");
        assert_eq!(display_value(&Value::Null), "");
    }
}
