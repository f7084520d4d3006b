use serde_json::Value;
use std::io::{self, IsTerminal, Read};

/// JSON piped on stdin, or `None` when stdin is interactive or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse JSON from stdin: {}", e))?;
    Ok(Some(value))
}
