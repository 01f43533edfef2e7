use crate::code::{quoted, CodeEmitter, Language};
use crate::error::Result;
use crate::generate::engine::Dataset;
use crate::generate::value::{float_literal, Value};

/// `const data = [...]` of object literals with quoted keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptEmitter;

impl CodeEmitter for JavaScriptEmitter {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn emit(&self, dataset: &Dataset) -> Result<String> {
        let mut records = Vec::with_capacity(dataset.len());
        for row in dataset {
            let mut fields = Vec::with_capacity(row.len());
            for (key, value) in row {
                fields.push(format!("{}: {}", quoted(key)?, js_literal(value)?));
            }
            records.push(format!("  {{ {} }}", fields.join(", ")));
        }

        let body = if records.is_empty() {
            "const data = [];\n".to_string()
        } else {
            format!("const data = [\n{}\n];\n", records.join(",\n"))
        };
        Ok(format!(
            "{}\ndata.forEach(item => console.log(item));\n",
            body
        ))
    }
}

fn js_literal(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => float_literal(*f),
        Value::Float(_) => "null".to_string(),
        other => quoted(&other.to_text())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::engine::Row;
    use uuid::Uuid;

    #[test]
    fn test_js_objects() {
        let mut row = Row::new();
        row.insert("id".to_string(), Value::Uuid(Uuid::nil()));
        row.insert("active".to_string(), Value::Bool(false));
        row.insert("note".to_string(), Value::Null);
        let code = JavaScriptEmitter
            .emit(&Dataset::new(vec![row.clone(), row]))
            .unwrap();

        let expected_row =
            "  { \"id\": \"00000000-0000-0000-0000-000000000000\", \"active\": false, \"note\": null }";
        assert!(code.starts_with(&format!(
            "const data = [\n{},\n{}\n];\n",
            expected_row, expected_row
        )));
        assert!(code.ends_with("data.forEach(item => console.log(item));\n"));
    }
}
