use crate::code::{quoted, CodeEmitter, Language};
use crate::error::Result;
use crate::generate::engine::Dataset;
use crate::generate::value::{float_literal, Value};

/// A `Data` class holding `List<String> columns` and
/// `List<List<Object>> data`, printed row by row from `main`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaEmitter;

impl CodeEmitter for JavaEmitter {
    fn language(&self) -> Language {
        Language::Java
    }

    fn emit(&self, dataset: &Dataset) -> Result<String> {
        let columns = dataset
            .columns()
            .iter()
            .map(|c| quoted(c))
            .collect::<Result<Vec<_>>>()?;

        let mut rows = Vec::with_capacity(dataset.len());
        for row in dataset {
            // A lone untyped null would bind to the varargs array itself.
            let single = row.len() == 1;
            let values = row
                .values()
                .map(|v| java_literal(v, single))
                .collect::<Result<Vec<_>>>()?;
            rows.push(format!(
                "            Arrays.asList({})",
                values.join(", ")
            ));
        }
        let data = if rows.is_empty() {
            "Arrays.asList()".to_string()
        } else {
            format!("Arrays.asList(\n{}\n        )", rows.join(",\n"))
        };

        Ok(format!(
            "import java.util.Arrays;
import java.util.List;

public class Data {{
    public static void main(String[] args) {{
        List<String> columns = Arrays.asList({columns});
        List<List<Object>> data = {data};

        System.out.println(columns);
        for (List<Object> row : data) {{
            System.out.println(row);
        }}
    }}
}}
",
            columns = columns.join(", "),
            data = data
        ))
    }
}

fn java_literal(value: &Value, cast_null: bool) -> Result<String> {
    Ok(match value {
        Value::Null if cast_null => "(Object) null".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) if i32::try_from(*i).is_ok() => i.to_string(),
        Value::Int(i) => format!("{}L", i),
        Value::Float(f) if f.is_finite() => float_literal(*f),
        Value::Float(_) => "null".to_string(),
        other => quoted(&other.to_text())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::engine::Row;

    #[test]
    fn test_java_lists() {
        let mut row = Row::new();
        row.insert("imei".to_string(), Value::Int(123456789012));
        row.insert("n".to_string(), Value::Int(5));
        row.insert("name".to_string(), Value::owned("Zoe".to_string()));
        row.insert("gone".to_string(), Value::Null);
        let code = JavaEmitter.emit(&Dataset::new(vec![row])).unwrap();

        assert!(code.contains(
            "List<String> columns = Arrays.asList(\"imei\", \"n\", \"name\", \"gone\");"
        ));
        assert!(code.contains("Arrays.asList(123456789012L, 5, \"Zoe\", null)"));
        assert!(code.contains("for (List<Object> row : data) {"));
    }

    #[test]
    fn test_java_single_null_column_is_cast() {
        let mut row = Row::new();
        row.insert("x".to_string(), Value::Null);
        let code = JavaEmitter.emit(&Dataset::new(vec![row])).unwrap();
        assert!(code.contains("Arrays.asList((Object) null)"));
    }

    #[test]
    fn test_java_empty() {
        let code = JavaEmitter.emit(&Dataset::default()).unwrap();
        assert!(code.contains("List<List<Object>> data = Arrays.asList();"));
    }
}
