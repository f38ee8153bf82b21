use serde_json::Value;

use super::{display_value, result_of};

/// Fields that answer each command, in priority order.
const HEADLINE_KEYS: [&str; 6] = [
    "payment_amount",
    "calculation",
    "penalty_amount",
    "total_penalties",
    "progress_pct",
    "end_date",
];

/// Print just the headline value of the response.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = result_of(value);
    let Value::Object(map) = result else {
        return display_value(result);
    };

    for key in HEADLINE_KEYS {
        match map.get(key) {
            Some(Value::Object(inner)) => {
                // LoanSummary nests the payment figures
                if let Some(payment) = inner.get("payment_amount") {
                    return display_value(payment);
                }
            }
            Some(val) if !val.is_null() => return display_value(val),
            _ => {}
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{key}: {}", display_value(val)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_payment() {
        let value = json!({"payment_amount": "933.33", "total_amount": "5600.00"});
        assert_eq!(headline(&value), "933.33");
    }

    #[test]
    fn test_headline_nested_summary() {
        let value = json!({"result": {"calculation": {"payment_amount": "892.63"}, "end_date": "2025-07-01"}});
        assert_eq!(headline(&value), "892.63");
    }

    #[test]
    fn test_headline_fallback() {
        assert_eq!(headline(&json!({"is_overdue": false})), "is_overdue: false");
    }
}
