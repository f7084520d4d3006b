pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON document from `--input`, falling back to piped stdin. `None` when
/// neither supplies one.
pub fn read_document(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(Some(file::read_json_value(p)?)),
        None => stdin::read_stdin(),
    }
}

/// Like `read_document` but the document is mandatory.
pub fn require_document<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let value = read_document(path)?
        .ok_or_else(|| format!("{what} required: pass --input <file> or pipe JSON on stdin"))?;
    Ok(serde_json::from_value(value)?)
}
