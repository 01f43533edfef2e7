//! # Generation Engine
//!
//! Schema → plan → rows. `plan` resolves every field into a `FieldStrategy`,
//! `providers` turns a strategy plus RNG state into a `Value`, and `engine`
//! applies the null and uniqueness policy row by row.

pub mod corpus;
pub mod custom;
pub mod engine;
pub mod plan;
pub mod providers;
pub mod unique;
pub mod value;

pub use engine::{generate_row, Dataset, DatasetGenerator, GenerationOptions, Row};
pub use value::Value;
