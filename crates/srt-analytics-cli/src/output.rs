use serde_json::Value;
use std::io;
use tabled::{builder::Builder, Table};

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => print_table(value),
        OutputFormat::Csv => print_csv(value),
        OutputFormat::Minimal => print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Stress output is an object holding the `records` ledger plus any
/// `failures`; series and filtered views are plain arrays of rows.
fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(records)) = map.get("records") {
                print_row_table(records);
            }
            if let Some(Value::Array(failures)) = map.get("failures") {
                if !failures.is_empty() {
                    println!("\nFailed scenarios:");
                    for f in failures {
                        let scenario = f.get("scenario").and_then(Value::as_str).unwrap_or("?");
                        let error = f.get("error").and_then(Value::as_str).unwrap_or("?");
                        println!("  - {}: {}", scenario, error);
                    }
                }
            }
        }
        Value::Array(rows) => print_row_table(rows),
        _ => println!("{}", value),
    }
}

fn print_row_table(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            println!("{}", cell_text(row));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows {
        if let Value::Object(map) = row {
            let cells: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(cell_text).unwrap_or_default())
                .collect();
            builder.push_record(cells);
        }
    }
    println!("{}", Table::from(builder));
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let rows: &[Value] = match value {
        Value::Object(map) => match map.get("records") {
            Some(Value::Array(records)) => records,
            _ => &[],
        },
        Value::Array(arr) => arr,
        _ => &[],
    };

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);
        for row in rows {
            if let Value::Object(map) = row {
                let record: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(cell_text).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&record);
            }
        }
    }

    let _ = wtr.flush();
}

// ---------------------------------------------------------------------------
// Minimal
// ---------------------------------------------------------------------------

/// Print just the final cumulative PnL per scenario (or per series).
fn print_minimal(value: &Value) {
    let rows: &[Value] = match value {
        Value::Object(map) => match map.get("records") {
            Some(Value::Array(records)) => records,
            _ => {
                println!("{}", cell_text(value));
                return;
            }
        },
        Value::Array(arr) => arr,
        _ => {
            println!("{}", cell_text(value));
            return;
        }
    };

    let mut last_by_scenario: Vec<(String, String)> = Vec::new();
    for row in rows {
        let Value::Object(map) = row else { continue };
        // PnL series rows carry the whole trajectory; ledger rows carry one
        // cumulative value per period.
        if let Some(Value::Array(pnl)) = map.get("cumulative_pnl") {
            let label = map
                .get("stress_multiplier")
                .map(cell_text)
                .unwrap_or_default();
            let final_pnl = pnl.last().map(cell_text).unwrap_or_default();
            last_by_scenario.push((format!("stress {}", label), final_pnl));
        } else if let Some(pnl) = map.get("cumulative_pnl") {
            let label = map
                .get("scenario")
                .map(cell_text)
                .unwrap_or_else(|| "scenario".to_string());
            let entry = (label, cell_text(pnl));
            match last_by_scenario.last_mut() {
                Some(last) if last.0 == entry.0 => *last = entry,
                _ => last_by_scenario.push(entry),
            }
        }
    }

    for (scenario, pnl) in last_by_scenario {
        println!("{}: {}", scenario, pnl);
    }
}
