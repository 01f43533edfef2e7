//! # rowsmith-core
//!
//! Schema-driven fake row generation. A [`Schema`] of typed fields is
//! resolved into a generation plan, the [`DatasetGenerator`] produces rows
//! under a per-session uniqueness registry, and an output adapter turns the
//! resulting [`Dataset`] into a file format, SQL inserts, or source code.
//!
//! ```
//! use rowsmith_core::schema::Schema;
//!
//! let schema = Schema::from_json_str(r#"[
//!     {"name": "id", "type": "int", "min": 1, "max": 1000, "pk": true},
//!     {"name": "status", "type": "enum", "values": ["A", "B"]}
//! ]"#).unwrap();
//!
//! let dataset = rowsmith_core::generate_dataset(&schema, 3).unwrap();
//! let sql = rowsmith_core::render_inserts("items", "postgresql", &dataset).unwrap();
//! assert_eq!(sql.lines().count(), 3);
//! ```

pub mod code;
pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod schema;
pub mod sql;

// Re-export key types for convenience
pub use error::{Result, RowsmithError};
pub use generate::engine::{Dataset, DatasetGenerator, GenerationOptions, Row};
pub use generate::value::Value;
pub use schema::{FieldSpec, FieldType, Schema};

/// Generate `row_count` rows with default options (random seed, 10% null
/// probability for nullable fields, built-in types only).
pub fn generate_dataset(schema: &Schema, row_count: usize) -> Result<Dataset> {
    DatasetGenerator::default().generate(schema, row_count)
}

/// Export a dataset by format name: `csv`, `json`, `xml`, or `spreadsheet`.
pub fn export_dataset(dataset: &Dataset, format: &str) -> Result<Vec<u8>> {
    output::export_dataset(dataset, format.parse()?, None)
}

/// Insert statements by dialect name: `mysql`, `postgresql`, `oracle`,
/// `sqlserver`, `sqlite`, or `document`.
pub fn render_inserts(table: &str, dialect: &str, dataset: &Dataset) -> Result<String> {
    sql::render_inserts(table, dialect.parse()?, dataset)
}

/// Source code by language name: `python`, `cpp`, `java`, or `javascript`.
pub fn render_code(dataset: &Dataset, language: &str) -> Result<String> {
    code::render_code(dataset, language.parse()?)
}
