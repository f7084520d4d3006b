use serde_json::{Map, Value};
use std::io;

use super::{cell, columns, flatten, lookup, primary_rows, result_of};

/// Write output as CSV to stdout.
///
/// Results with a row set (cash-flow periods, scenarios, startup line
/// items) export those rows; anything else is written as field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let written = match result_of(value) {
        Value::Object(result) => write_result(&mut wtr, result),
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => wtr.write_record([cell(other)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_result<W: io::Write>(wtr: &mut csv::Writer<W>, result: &Map<String, Value>) -> csv::Result<()> {
    let flat = flatten(result);
    if let Some((_, rows)) = primary_rows(&flat) {
        return write_rows(wtr, rows);
    }

    wtr.write_record(["field", "value"])?;
    for (key, val) in &flat.fields {
        wtr.write_record([key, val])?;
    }
    Ok(())
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([cell(item)])?;
        }
        return Ok(());
    };

    let headers = columns(first);
    wtr.write_record(&headers)?;
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| lookup(map, h).map(cell).unwrap_or_default())
                .collect();
            wtr.write_record(&record)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        match result_of(value) {
            Value::Object(result) => write_result(&mut wtr, result).unwrap(),
            Value::Array(rows) => write_rows(&mut wtr, rows).unwrap(),
            _ => unreachable!(),
        }
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_projection_rows_exported() {
        let out = render(&json!({
            "result": {
                "growth_model": "linear",
                "projections": [
                    { "period": 1, "revenue": "100", "revenue_breakdown": { "services": "100" } },
                    { "period": 2, "revenue": "110", "revenue_breakdown": { "services": "110" } }
                ]
            }
        }));
        assert_eq!(
            out,
            "period,revenue,revenue_breakdown.services\n1,100,100\n2,110,110\n"
        );
    }

    #[test]
    fn test_scalar_result_as_pairs() {
        let out = render(&json!({
            "result": { "break_even_units": "400", "contribution_margin": "25" }
        }));
        assert_eq!(out, "field,value\nbreak_even_units,400\ncontribution_margin,25\n");
    }
}
