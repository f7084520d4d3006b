use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, columns, flatten, lookup, result_of};

/// Format output as tables: one Field/Value table for the scalar results,
/// then one table per row set (monthly projections, scenarios, ...).
pub fn print_table(value: &Value) {
    match result_of(value) {
        Value::Object(result) => print_result(result),
        Value::Array(rows) => print_rows(None, rows),
        other => println!("{}", cell(other)),
    }

    if let Value::Object(envelope) = value {
        print_footer(envelope);
    }
}

fn print_result(result: &Map<String, Value>) {
    let flat = flatten(result);

    if !flat.fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &flat.fields {
            builder.push_record([key.as_str(), val.as_str()]);
        }
        println!("{}", Table::from(builder));
    }

    for (name, rows) in &flat.row_sets {
        println!();
        print_rows(Some(name.as_str()), rows);
    }
}

fn print_rows(title: Option<&str>, rows: &[Value]) {
    if let Some(t) = title {
        println!("{}", t.bold());
    }
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers = columns(first);
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(String::as_str));
    for row in rows {
        if let Value::Object(map) = row {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| lookup(map, h).map(cell).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s.yellow());
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
