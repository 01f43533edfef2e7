//! # Schema Model
//!
//! A `Schema` is an ordered list of `FieldSpec`s. Field order is column order
//! in every generated row and every output artifact.
//!
//! Schemas load from JSON or TOML. JSON accepts either a bare array of field
//! objects or an object with a `fields` array (and an optional `table`):
//!
//! ```json
//! {
//!   "table": "users",
//!   "fields": [
//!     {"name": "id", "type": "int", "min": 1, "max": 100000, "pk": true},
//!     {"name": "email", "type": "email", "unique": true},
//!     {"name": "status", "type": "enum", "values": ["active", "banned"]}
//!   ]
//! }
//! ```
//!
//! TOML uses an array of tables:
//!
//! ```toml
//! table = "users"
//!
//! [[fields]]
//! name = "id"
//! type = "int"
//! pk = true
//! ```

pub mod field;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RowsmithError};

pub use field::{literal_to_value, Bound, FieldSpec, FieldType};

/// An ordered sequence of field specifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Table or collection name the schema describes, if the file names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    pub fields: Vec<FieldSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaFile {
    Fields(Vec<FieldSpec>),
    Document(Schema),
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            table: None,
            fields,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Parse a schema from JSON text (array or `{"fields": [...]}` object).
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: SchemaFile =
            serde_json::from_str(content).map_err(|e| RowsmithError::Configuration {
                message: format!("Failed to parse JSON schema: {}", e),
            })?;
        let schema = match file {
            SchemaFile::Fields(fields) => Schema::new(fields),
            SchemaFile::Document(schema) => schema,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Parse a schema from TOML text (`[[fields]]` tables).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let schema: Schema = toml::from_str(content).map_err(|e| RowsmithError::Configuration {
            message: format!("Failed to parse TOML schema: {}", e),
        })?;
        schema.validate()?;
        Ok(schema)
    }

    /// Read a schema file. `.toml` files parse as TOML, anything else as JSON.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RowsmithError::Output {
            message: format!("reading schema file {}", path.display()),
            source: e,
        })?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Structural checks shared by every field type: names must be non-empty
    /// and unique. Type-specific constraints are checked when the generation
    /// plan is built.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(RowsmithError::schema(
                    field.name.clone(),
                    "field name must not be empty",
                ));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(RowsmithError::schema(
                    field.name.clone(),
                    "field name appears more than once in the schema",
                ));
            }
        }
        Ok(())
    }
}
