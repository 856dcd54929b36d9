//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin
//! - Output: one JSON object per line on stdout
//! - Logs go to stderr so stdout stays machine-readable

use std::io::{Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a JSON document from `reader`
pub fn read_document(mut reader: impl Read) -> CliResult<Value> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(&input)?)
}

/// Success envelope
pub fn ok_response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope
pub fn error_response(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write one response object as a single line
pub fn write_line(mut out: impl Write, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_multiline_document() {
        let doc = read_document("{\n  \"name\": \"Ann\"\n}\n".as_bytes()).unwrap();
        assert_eq!(doc, json!({"name": "Ann"}));
    }

    #[test]
    fn test_empty_input() {
        let err = read_document("  \n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Empty input"));
    }

    #[test]
    fn test_envelopes() {
        assert_eq!(ok_response(json!(1)), json!({"status": "ok", "data": 1}));
        assert_eq!(error_response("X", "y")["status"], json!("error"));
    }

    #[test]
    fn test_write_line() {
        let mut out = Vec::new();
        write_line(&mut out, &ok_response(json!({"a": 1}))).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"status": "ok", "data": {"a": 1}}));
    }
}
