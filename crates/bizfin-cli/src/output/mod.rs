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

/// Result arrays rendered as row sets, in the order they are looked for.
pub(crate) const ROW_SETS: [&str; 4] = ["projections", "scenarios", "line_items", "yearly"];

/// The payload inside the `result` envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Render a scalar for a cell. Nested values fall back to compact JSON.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// A result object split into scalar fields (dotted paths for nested
/// objects) and arrays of objects, which render as row sets.
#[derive(Debug, Default)]
pub(crate) struct Flattened<'a> {
    pub fields: Vec<(String, String)>,
    pub row_sets: Vec<(String, &'a [Value])>,
}

pub(crate) fn flatten(map: &serde_json::Map<String, Value>) -> Flattened<'_> {
    let mut out = Flattened::default();
    collect("", map, &mut out);
    out
}

fn collect<'a>(prefix: &str, map: &'a serde_json::Map<String, Value>, out: &mut Flattened<'a>) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => collect(&path, inner, out),
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                out.row_sets.push((path, items.as_slice()));
            }
            Value::Array(items) => {
                let joined: Vec<String> = items.iter().map(cell).collect();
                out.fields.push((path, joined.join(", ")));
            }
            _ => out.fields.push((path, cell(val))),
        }
    }
}

/// The preferred row set of a result for single-table formats (CSV).
pub(crate) fn primary_rows<'a>(flat: &Flattened<'a>) -> Option<(&'a str, &'a [Value])> {
    ROW_SETS.iter().find_map(|name| {
        flat.row_sets
            .iter()
            .find(|(path, _)| path == name)
            .map(|(_, rows)| (*name, *rows))
    })
}

/// Column names for a row set: the first row's scalar keys, with one level
/// of nested objects flattened as `parent.child`.
pub(crate) fn columns(first: &serde_json::Map<String, Value>) -> Vec<String> {
    let mut cols = Vec::new();
    for (key, val) in first {
        match val {
            Value::Object(inner) => {
                cols.extend(inner.keys().map(|k| format!("{key}.{k}")));
            }
            Value::Array(_) => {}
            _ => cols.push(key.clone()),
        }
    }
    cols
}

/// Value of a (possibly dotted) column in a row.
pub(crate) fn lookup<'a>(row: &'a serde_json::Map<String, Value>, column: &str) -> Option<&'a Value> {
    match column.split_once('.') {
        Some((parent, child)) => row.get(parent).and_then(|p| p.get(child)),
        None => row.get(column),
    }
}
