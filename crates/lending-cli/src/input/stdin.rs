use serde_json::Value;
use std::io::{self, Read};

/// JSON request piped on stdin, or `None` when stdin is a terminal or the
/// pipe carried only whitespace.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_request(&buffer)
}

fn parse_request(raw: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match raw.trim() {
        "" => Ok(None),
        body => serde_json::from_str(body)
            .map(Some)
            .map_err(|e| format!("Failed to parse stdin request: {e}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_pipe_is_no_request() {
        assert!(parse_request("  \n").unwrap().is_none());
    }

    #[test]
    fn test_request_parsed() {
        let value = parse_request(r#"{"paid_amount": "10", "total_amount": "40"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(value["total_amount"], "40");
    }

    #[test]
    fn test_malformed_request_named() {
        let err = parse_request("{not json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse stdin request"));
    }
}
