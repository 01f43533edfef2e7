//! # Error Types
//!
//! Defines `RowsmithError`, the unified error enum for every failure mode in
//! the rowsmith pipeline. Variants carry the field name, row index, or format
//! involved so a failure can be acted on without digging through logs.

use thiserror::Error;

/// All errors that can occur in rowsmith operations.
#[derive(Error, Debug)]
pub enum RowsmithError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid schema for field '{field}': {message}")]
    SchemaValidation { field: String, message: String },

    #[error("Failed to generate a unique value for field '{field}' at row {row_index}: {attempts} attempts exhausted\n  The field's value domain is too small for the requested row count. Reduce the row count or widen the field's range")]
    ResourceExhausted {
        field: String,
        row_index: usize,
        attempts: usize,
    },

    #[error("Cannot export an empty dataset to {format}: the header row is inferred from the first row")]
    EmptyDataset { format: String },

    #[error("Output error: {message}: {source}")]
    Output {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl RowsmithError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        RowsmithError::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        RowsmithError::SchemaValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RowsmithError>;
