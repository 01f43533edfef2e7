use std::io::Write;

use crate::error::{Result, RowsmithError};
use crate::generate::engine::Dataset;
use crate::generate::value::Value;
use crate::output::{io_error, Exporter};

/// Pretty-printed JSON array of objects, keys in field order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export(&self, writer: &mut dyn Write, dataset: &Dataset) -> Result<()> {
        write_json(writer, dataset)
    }
}

/// Write a dataset as JSON using streaming serialization.
///
/// Writes row-by-row instead of building a `serde_json::Value` tree, which
/// also keeps keys in field order without relying on map ordering features.
pub fn write_json<W: Write + ?Sized>(writer: &mut W, dataset: &Dataset) -> Result<()> {
    if dataset.is_empty() {
        return write_str(writer, "[]\n");
    }

    write_str(writer, "[\n")?;
    for (row_idx, row) in dataset.iter().enumerate() {
        write_str(writer, "  {")?;

        let col_count = row.len();
        for (col_idx, (col_name, value)) in row.iter().enumerate() {
            let key = json_key(col_name)?;
            let val = json_value(value)?;
            write_str(writer, &format!("\n    {}: {}", key, val))?;
            if col_idx < col_count - 1 {
                write_str(writer, ",")?;
            }
        }

        write_str(writer, "\n  }")?;
        if row_idx < dataset.len() - 1 {
            write_str(writer, ",")?;
        }
        write_str(writer, "\n")?;
    }
    write_str(writer, "]\n")
}

/// Helper to write a string slice and map IO errors.
fn write_str<W: Write + ?Sized>(writer: &mut W, s: &str) -> Result<()> {
    writer.write_all(s.as_bytes()).map_err(io_error("JSON"))
}

/// Serialize a string as an RFC 8259-compliant JSON key.
pub(crate) fn json_key(s: &str) -> Result<String> {
    serde_json::to_string(s).map_err(|e| RowsmithError::Serialization {
        message: format!("JSON key error: {}", e),
    })
}

/// Serialize a Value as an RFC 8259-compliant JSON value string.
pub(crate) fn json_value(value: &Value) -> Result<String> {
    serde_json::to_string(&value_to_json(value)).map_err(|e| RowsmithError::Serialization {
        message: format!("JSON serialization error: {}", e),
    })
}

/// Convert a Value to its JSON representation.
///
/// JSON has no temporal type, so dates, datetimes, and times are strings in
/// their canonical forms. Non-finite floats become `null`.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::json!(*i),
        Value::Float(f) => serde_json::json!(*f),
        other => serde_json::Value::String(other.to_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::engine::Row;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_dataset_is_empty_array() {
        let mut buf = Vec::new();
        write_json(&mut buf, &Dataset::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim(), "[]");
    }

    #[test]
    fn test_json_keeps_field_order_and_types() {
        let mut row = Row::new();
        row.insert("zeta".to_string(), Value::Int(3));
        row.insert("alpha".to_string(), Value::Null);
        row.insert(
            "born".to_string(),
            Value::Date(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()),
        );
        row.insert("quote".to_string(), Value::owned("say \"hi\"".to_string()));
        let dataset = Dataset::new(vec![row]);

        let mut buf = Vec::new();
        write_json(&mut buf, &dataset).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let zeta = text.find("\"zeta\"").unwrap();
        let alpha = text.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["zeta"], 3);
        assert!(parsed[0]["alpha"].is_null());
        assert_eq!(parsed[0]["born"], "1999-12-31");
        assert_eq!(parsed[0]["quote"], "say \"hi\"");
    }
}
