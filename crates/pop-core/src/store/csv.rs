//! CSV export/import for feature documents.
//!
//! Two on-disk layouts, chosen by the document's JSON shape: an array of
//! objects becomes one row per element with a header row of field names; any
//! other object becomes two-column `key,value` rows with JSON-encoded
//! values. Import detects the layout from the header. Imports are
//! all-or-nothing: the document is only written after the entire input
//! parses.

use serde_json::{Map, Value};

use super::{KvStore, StoreError};

/// Structured import result, surfaced to the caller as a toast. Import never
/// panics and never partially writes.
#[derive(Debug)]
pub struct ImportOutcome {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

impl ImportOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), count: 0 }
    }

    fn imported(count: usize) -> Self {
        Self { success: true, message: "Data imported successfully".into(), count }
    }
}

/// Render a document to CSV. Absent documents export as the empty string.
pub fn export_csv(store: &dyn KvStore, key: &str) -> Result<String, StoreError> {
    match store.get(key)? {
        Some(value) => Ok(export_document(&value)),
        None => Ok(String::new()),
    }
}

/// Parse CSV and replace (or merge into) the document under `key`.
pub fn import_csv(store: &dyn KvStore, key: &str, csv: &str, merge: bool) -> ImportOutcome {
    let lines: Vec<&str> = csv.trim().lines().collect();
    if lines.len() < 2 {
        return ImportOutcome::failed("CSV file is empty or invalid");
    }

    let headers = parse_line(lines[0]);
    let mut rows: Vec<Map<String, Value>> = Vec::new();
    for line in &lines[1..] {
        let values = parse_line(line);
        if values.len() != headers.len() {
            continue;
        }
        let mut row = Map::new();
        for (header, value) in headers.iter().zip(values) {
            row.insert(header.clone(), parse_cell(&value));
        }
        rows.push(row);
    }

    // key/value layout restores a single object document.
    let document = if headers == ["key", "value"] {
        let mut object = Map::new();
        for row in &rows {
            let key_text = match row.get("key") {
                Some(Value::String(k)) => k.clone(),
                // A key that happened to parse as JSON (e.g. numeric) still
                // names a field.
                Some(other) => other.to_string(),
                None => continue,
            };
            if let Some(v) = row.get("value") {
                object.insert(key_text, v.clone());
            }
        }
        if merge {
            if let Ok(Some(Value::Object(existing))) = store.get(key) {
                let mut merged = existing;
                merged.extend(object);
                object = merged;
            }
        }
        let count = object.len();
        (Value::Object(object), count)
    } else {
        let mut items: Vec<Value> = rows.into_iter().map(Value::Object).collect();
        if merge {
            if let Ok(Some(Value::Array(existing))) = store.get(key) {
                let mut merged = existing;
                merged.append(&mut items);
                items = merged;
            }
        }
        let count = items.len();
        (Value::Array(items), count)
    };

    let (value, count) = document;
    match store.set(key, value) {
        Ok(()) => ImportOutcome::imported(count),
        Err(err) => ImportOutcome::failed(format!("Import failed: {err}")),
    }
}

fn export_document(value: &Value) -> String {
    match value {
        Value::Array(items) => export_rows(items),
        Value::Object(map) => export_pairs(map),
        _ => String::new(),
    }
}

fn export_rows(items: &[Value]) -> String {
    let Some(Value::Object(first)) = items.first() else {
        return String::new();
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut out = headers
        .iter()
        .map(|h| quote_cell(h))
        .collect::<Vec<_>>()
        .join(",");
    out.push('\n');

    for item in items {
        let row: Vec<String> = headers
            .iter()
            .map(|h| render_cell(item.get(h.as_str()).unwrap_or(&Value::Null)))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn export_pairs(map: &Map<String, Value>) -> String {
    let mut out = String::from("key,value\n");
    for (key, value) in map {
        out.push_str(&quote_cell(key));
        out.push(',');
        out.push_str(&render_cell(value));
        out.push('\n');
    }
    out
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => quote_cell(s),
        Value::Array(_) | Value::Object(_) => quote_cell(&value.to_string()),
        other => other.to_string(),
    }
}

fn quote_cell(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// A cell that parses as JSON keeps its parsed type; anything else stays a
/// string.
fn parse_cell(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Split one CSV line, honoring quoted cells with doubled-quote escapes.
fn parse_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else if ch == '"' {
                in_quotes = false;
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == ',' {
            values.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    values.push(current);
    values
}
