//! # Format Exporters
//!
//! Serialize a finished [`Dataset`] into CSV, JSON, XML, or a spreadsheet
//! workbook. Every exporter takes column order from the first row's keys and
//! writes dates, datetimes, and times in their canonical ISO forms unless the
//! target has a native temporal type.
//!
//! CSV and spreadsheet output need a header row, so they reject an empty
//! dataset. JSON writes `[]` and XML an empty root element instead.

pub mod csv;
pub mod json;
pub mod spreadsheet;
pub mod xml;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::{Result, RowsmithError};
use crate::generate::engine::Dataset;

/// Root element and worksheet name when the caller supplies no table name.
pub const DEFAULT_DOCUMENT_NAME: &str = "data";

/// A file format an exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Xml,
    Spreadsheet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Xml,
        ExportFormat::Spreadsheet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Spreadsheet => "spreadsheet",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
            ExportFormat::Spreadsheet => "xml",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Xml => "application/xml",
            ExportFormat::Spreadsheet => "application/vnd.ms-excel",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = RowsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xml" => Ok(ExportFormat::Xml),
            "spreadsheet" | "excel" | "xls" | "xlsx" => Ok(ExportFormat::Spreadsheet),
            other => Err(RowsmithError::config(format!(
                "Unknown export format '{}'. Expected one of: csv, json, xml, spreadsheet",
                other
            ))),
        }
    }
}

/// Capability to serialize a dataset into a byte stream.
pub trait Exporter {
    fn export(&self, writer: &mut dyn Write, dataset: &Dataset) -> Result<()>;
}

/// Build the exporter for a format. `document_name` names the XML root
/// element and the spreadsheet worksheet; other formats ignore it.
pub fn exporter_for(format: ExportFormat, document_name: Option<&str>) -> Box<dyn Exporter> {
    let name = document_name.unwrap_or(DEFAULT_DOCUMENT_NAME);
    match format {
        ExportFormat::Csv => Box::new(csv::CsvExporter),
        ExportFormat::Json => Box::new(json::JsonExporter),
        ExportFormat::Xml => Box::new(xml::XmlExporter::new(name)),
        ExportFormat::Spreadsheet => Box::new(spreadsheet::SpreadsheetExporter::new(name)),
    }
}

/// Export a dataset into an in-memory artifact.
pub fn export_dataset(
    dataset: &Dataset,
    format: ExportFormat,
    document_name: Option<&str>,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    exporter_for(format, document_name).export(&mut buf, dataset)?;
    tracing::debug!(format = %format, rows = dataset.len(), bytes = buf.len(), "Exported dataset");
    Ok(buf)
}

/// Map an I/O failure while writing `what` into an `Output` error.
pub(crate) fn io_error(what: &str) -> impl FnOnce(std::io::Error) -> RowsmithError + '_ {
    move |source| RowsmithError::Output {
        message: format!("writing {}", what),
        source,
    }
}
