use std::io::Write;

use crate::error::{Result, RowsmithError};
use crate::generate::engine::Dataset;
use crate::output::Exporter;

/// RFC 4180 CSV with a header row. Nulls become empty cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn export(&self, writer: &mut dyn Write, dataset: &Dataset) -> Result<()> {
        write_csv(writer, dataset)
    }
}

/// Write a dataset as CSV. Fails on an empty dataset since the header is
/// taken from the first row.
pub fn write_csv<W: Write>(writer: W, dataset: &Dataset) -> Result<()> {
    if dataset.is_empty() {
        return Err(RowsmithError::EmptyDataset {
            format: "CSV".to_string(),
        });
    }

    let columns = dataset.columns();
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(&columns)
        .map_err(|e| csv_error("CSV header", e))?;

    for (row_idx, row) in dataset.iter().enumerate() {
        let record: Vec<String> = columns
            .iter()
            .map(|col| row.get(*col).map(|v| v.to_text()).unwrap_or_default())
            .collect();
        csv_writer
            .write_record(&record)
            .map_err(|e| csv_error(&format!("CSV row {}", row_idx), e))?;
    }

    csv_writer.flush().map_err(|e| RowsmithError::Output {
        message: "flushing CSV".to_string(),
        source: e,
    })
}

fn csv_error(what: &str, e: csv::Error) -> RowsmithError {
    match e.into_kind() {
        csv::ErrorKind::Io(source) => RowsmithError::Output {
            message: format!("writing {}", what),
            source,
        },
        other => RowsmithError::Serialization {
            message: format!("{}: {:?}", what, other),
        },
    }
}
