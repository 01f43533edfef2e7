//! Spreadsheet export as an Excel 2003 XML workbook (SpreadsheetML).
//!
//! Excel, LibreOffice, and most spreadsheet tools open the file directly. It
//! is plain XML, so it is saved as `.xml` and the `mso-application`
//! instruction routes it to a spreadsheet application.
//!
//! Cells are typed: numbers and booleans stay numeric, and dates, datetimes,
//! and times use the native `DateTime` cell type with a display style.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Result, RowsmithError};
use crate::generate::engine::Dataset;
use crate::generate::value::Value;
use crate::output::{io_error, Exporter};

const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";
const PREAMBLE: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<?mso-application progid=\"Excel.Sheet\"?>\n";
/// Excel rejects worksheet names longer than this.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Style IDs and number formats declared in the workbook header.
const STYLES: &[(&str, Option<&str>)] = &[
    ("header", None),
    ("date", Some("yyyy\\-mm\\-dd")),
    ("datetime", Some("yyyy\\-mm\\-dd\\ hh:mm:ss")),
    ("time", Some("hh:mm:ss")),
];

#[derive(Debug, Clone)]
pub struct SpreadsheetExporter {
    sheet_name: String,
}

impl SpreadsheetExporter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl Exporter for SpreadsheetExporter {
    fn export(&self, writer: &mut dyn Write, dataset: &Dataset) -> Result<()> {
        write_spreadsheet(writer, dataset, &self.sheet_name)
    }
}

/// A typed cell: `(ss:Type, text, style)`.
fn cell_content(value: &Value) -> Option<(&'static str, String, Option<&'static str>)> {
    let cell = match value {
        Value::Null => return None,
        Value::Bool(b) => ("Boolean", (if *b { "1" } else { "0" }).to_string(), None),
        Value::Int(i) => ("Number", i.to_string(), None),
        Value::Float(f) if f.is_finite() => ("Number", f.to_string(), None),
        Value::Date(d) => (
            "DateTime",
            format!("{}T00:00:00.000", d.format("%Y-%m-%d")),
            Some("date"),
        ),
        Value::DateTime(ts) => (
            "DateTime",
            ts.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
            Some("datetime"),
        ),
        // Excel's epoch day carries a bare time of day.
        Value::Time(t) => (
            "DateTime",
            format!("1899-12-31T{}.000", t.format("%H:%M:%S")),
            Some("time"),
        ),
        other => ("String", other.to_text(), None),
    };
    Some(cell)
}

/// Write a dataset as a single-worksheet SpreadsheetML workbook with a bold
/// header row. Fails on an empty dataset.
pub fn write_spreadsheet<W: Write>(mut writer: W, dataset: &Dataset, sheet_name: &str) -> Result<()> {
    if dataset.is_empty() {
        return Err(RowsmithError::EmptyDataset {
            format: "spreadsheet".to_string(),
        });
    }

    writer
        .write_all(PREAMBLE.as_bytes())
        .map_err(io_error("spreadsheet"))?;

    let columns = dataset.columns();
    let sheet = sanitize_sheet_name(sheet_name);
    let mut xml = Writer::new_with_indent(writer, b' ', 1);

    let workbook = BytesStart::new("Workbook")
        .with_attributes([("xmlns", SPREADSHEET_NS), ("xmlns:ss", SPREADSHEET_NS)]);
    xml.write_event(Event::Start(workbook)).map_err(xml_error)?;

    xml.write_event(Event::Start(BytesStart::new("Styles")))
        .map_err(xml_error)?;
    for (id, number_format) in STYLES {
        xml.write_event(Event::Start(
            BytesStart::new("Style").with_attributes([("ss:ID", *id)]),
        ))
        .map_err(xml_error)?;
        let detail = match number_format {
            Some(fmt) => BytesStart::new("NumberFormat").with_attributes([("ss:Format", *fmt)]),
            None => BytesStart::new("Font").with_attributes([("ss:Bold", "1")]),
        };
        xml.write_event(Event::Empty(detail)).map_err(xml_error)?;
        xml.write_event(Event::End(BytesEnd::new("Style")))
            .map_err(xml_error)?;
    }
    xml.write_event(Event::End(BytesEnd::new("Styles")))
        .map_err(xml_error)?;

    xml.write_event(Event::Start(
        BytesStart::new("Worksheet").with_attributes([("ss:Name", sheet.as_str())]),
    ))
    .map_err(xml_error)?;
    xml.write_event(Event::Start(BytesStart::new("Table")))
        .map_err(xml_error)?;

    // Header row
    xml.write_event(Event::Start(BytesStart::new("Row")))
        .map_err(xml_error)?;
    for col in &columns {
        write_cell(&mut xml, Some(("String", col.to_string(), Some("header"))))?;
    }
    xml.write_event(Event::End(BytesEnd::new("Row")))
        .map_err(xml_error)?;

    for row in dataset {
        xml.write_event(Event::Start(BytesStart::new("Row")))
            .map_err(xml_error)?;
        for col in &columns {
            write_cell(&mut xml, row.get(*col).and_then(cell_content))?;
        }
        xml.write_event(Event::End(BytesEnd::new("Row")))
            .map_err(xml_error)?;
    }

    xml.write_event(Event::End(BytesEnd::new("Table")))
        .map_err(xml_error)?;
    xml.write_event(Event::End(BytesEnd::new("Worksheet")))
        .map_err(xml_error)?;
    xml.write_event(Event::End(BytesEnd::new("Workbook")))
        .map_err(xml_error)?;

    xml.into_inner()
        .write_all(b"\n")
        .map_err(io_error("spreadsheet"))
}

fn write_cell<W: Write>(
    xml: &mut Writer<W>,
    content: Option<(&'static str, String, Option<&'static str>)>,
) -> Result<()> {
    let Some((data_type, text, style)) = content else {
        return xml
            .write_event(Event::Empty(BytesStart::new("Cell")))
            .map_err(xml_error);
    };

    let mut cell = BytesStart::new("Cell");
    if let Some(style) = style {
        cell.push_attribute(("ss:StyleID", style));
    }
    xml.write_event(Event::Start(cell)).map_err(xml_error)?;
    xml.write_event(Event::Start(
        BytesStart::new("Data").with_attributes([("ss:Type", data_type)]),
    ))
    .map_err(xml_error)?;
    xml.write_event(Event::Text(BytesText::new(&text)))
        .map_err(xml_error)?;
    xml.write_event(Event::End(BytesEnd::new("Data")))
        .map_err(xml_error)?;
    xml.write_event(Event::End(BytesEnd::new("Cell")))
        .map_err(xml_error)
}

/// Worksheet names may not contain `: \ / ? * [ ]`, may not be blank, and are
/// limited to 31 characters.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => '_',
            other => other,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

fn xml_error(e: impl std::fmt::Display) -> RowsmithError {
    RowsmithError::Serialization {
        message: format!("spreadsheet write error: {}", e),
    }
}
