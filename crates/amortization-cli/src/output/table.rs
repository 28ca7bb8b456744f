use amortization_core::export::SCHEDULE_COLUMNS;
use serde_json::{Map, Value};
use tabled::{Table, builder::Builder};

use super::currency::{decimal_from_value, format_currency, format_percent};

/// Summary fields shown above the schedule, in display order.
const SUMMARY_FIELDS: [(&str, &str, Cell); 7] = [
    ("principal", "Monto del Préstamo", Cell::Money),
    ("monthly_payment", "Pago Mensual", Cell::Money),
    ("annual_rate_percent", "Tasa Anual", Cell::Percent(2)),
    ("monthly_rate_percent", "Tasa Mensual", Cell::Percent(4)),
    ("total_paid", "Total a Pagar", Cell::Money),
    ("total_interest", "Total de Intereses", Cell::Money),
    ("term_months", "Plazo (meses)", Cell::Plain),
];

/// Row keys matching `SCHEDULE_COLUMNS`.
const SCHEDULE_KEYS: [(&str, Cell); 5] = [
    ("period", Cell::Plain),
    ("monthly_payment", Cell::Money),
    ("interest", Cell::Money),
    ("principal_portion", Cell::Money),
    ("remaining_balance", Cell::Money),
];

#[derive(Clone, Copy)]
enum Cell {
    Plain,
    Money,
    Percent(u32),
}

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    println!("{}", render_table(value));
}

pub fn render_table(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                render_result(result, map)
            } else {
                render_flat_object(map)
            }
        }
        Value::Array(arr) => render_array(arr),
        _ => value.to_string(),
    }
}

fn render_result(result: &Value, envelope: &Map<String, Value>) -> String {
    let mut out = String::new();

    match result {
        Value::Object(res_map) => match (res_map.get("summary"), res_map.get("schedule")) {
            (Some(Value::Object(summary)), Some(Value::Array(rows))) => {
                out.push_str(&render_summary(summary));
                out.push_str("\n\n");
                out.push_str(&render_schedule(rows));
            }
            _ => out.push_str(&render_flat_object(res_map)),
        },
        _ => out.push_str(&render_flat_object(envelope)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\n\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    out.push_str(&format!("\n  - {}", s));
                }
            }
        }
    }

    if let Some(Value::Array(exports)) = envelope.get("exports") {
        for e in exports {
            out.push_str(&format!("\n{}", describe_export(e)));
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        out.push_str(&format!("\n\nMethodology: {}", meth));
    }

    out
}

/// Two-column table of the headline metrics.
pub fn render_summary(summary: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Concepto", "Valor"]);
    for (key, label, cell) in SUMMARY_FIELDS {
        if let Some(val) = summary.get(key) {
            builder.push_record([label.to_string(), format_cell(val, cell)]);
        }
    }
    Table::from(builder).to_string()
}

/// One line per month, money columns currency-formatted.
pub fn render_schedule(rows: &[Value]) -> String {
    if rows.is_empty() {
        return "(empty)".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(SCHEDULE_COLUMNS);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = SCHEDULE_KEYS
                .iter()
                .map(|(key, cell)| map.get(*key).map(|v| format_cell(v, *cell)).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }
    Table::from(builder).to_string()
}

fn render_flat_object(map: &Map<String, Value>) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    Table::from(builder).to_string()
}

fn render_array(arr: &[Value]) -> String {
    if arr.is_empty() {
        return "(empty)".to_string();
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        Table::from(builder).to_string()
    } else {
        arr.iter().map(format_value).collect::<Vec<_>>().join("\n")
    }
}

fn describe_export(export: &Value) -> String {
    let format = export.get("format").and_then(Value::as_str).unwrap_or("file");
    let path = export.get("path").and_then(Value::as_str).unwrap_or("");
    match export.get("error").and_then(Value::as_str) {
        Some(err) => format!("Export {} to {} failed: {}", format, path, err),
        None => format!("Saved {}: {}", format, path),
    }
}

fn format_cell(value: &Value, cell: Cell) -> String {
    match (cell, decimal_from_value(value)) {
        (Cell::Money, Some(d)) => format_currency(d),
        (Cell::Percent(dp), Some(d)) => format_percent(d, dp),
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
