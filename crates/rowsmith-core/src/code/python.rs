use crate::code::{quoted, CodeEmitter, Language};
use crate::error::Result;
use crate::generate::engine::Dataset;
use crate::generate::value::{float_literal, Value};

/// A list of dicts named `data`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonEmitter;

impl CodeEmitter for PythonEmitter {
    fn language(&self) -> Language {
        Language::Python
    }

    fn emit(&self, dataset: &Dataset) -> Result<String> {
        let mut out = String::new();
        if dataset.is_empty() {
            out.push_str("data = []\n");
        } else {
            out.push_str("data = [\n");
            for row in dataset {
                let mut fields = Vec::with_capacity(row.len());
                for (key, value) in row {
                    fields.push(format!("{}: {}", quoted(key)?, python_literal(value)?));
                }
                out.push_str(&format!("    {{{}}},\n", fields.join(", ")));
            }
            out.push_str("]\n");
        }
        out.push_str("\nfor item in data:\n    print(item)\n");
        Ok(out)
    }
}

fn python_literal(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) if f.is_finite() => float_literal(*f),
        Value::Float(_) => "None".to_string(),
        other => quoted(&other.to_text())?,
    })
}
