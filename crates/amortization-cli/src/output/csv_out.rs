use amortization_core::export::SCHEDULE_COLUMNS;
use serde_json::Value;
use std::io;

/// Keys of a schedule row in `SCHEDULE_COLUMNS` order.
const SCHEDULE_KEYS: [&str; 5] = [
    "period",
    "monthly_payment",
    "interest",
    "principal_portion",
    "remaining_balance",
];

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    write_csv(value, stdout.lock());
}

pub fn write_csv<W: io::Write>(value: &Value, out: W) {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Object(map) => {
            let result = map.get("result");
            if let Some(Value::Array(rows)) = result.and_then(|r| r.get("schedule")) {
                write_schedule_csv(&mut wtr, rows);
            } else if let Some(Value::Object(result)) = result {
                // Two-column CSV: field, value
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_schedule_csv<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let _ = wtr.write_record(SCHEDULE_COLUMNS);
    for row in rows {
        let record: Vec<String> = SCHEDULE_KEYS
            .iter()
            .map(|k| row.get(*k).map(format_csv_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
