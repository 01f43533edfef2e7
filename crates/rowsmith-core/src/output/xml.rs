use std::io::Write;
use std::sync::LazyLock;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;

use crate::error::{Result, RowsmithError};
use crate::generate::engine::Dataset;
use crate::output::Exporter;

/// Element name for each row.
pub const RECORD_ELEMENT: &str = "record";

static INVALID_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("static pattern compiles"));

/// XML document with one `<record>` per row and one child element per field.
#[derive(Debug, Clone)]
pub struct XmlExporter {
    root: String,
}

impl XmlExporter {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

impl Exporter for XmlExporter {
    fn export(&self, writer: &mut dyn Write, dataset: &Dataset) -> Result<()> {
        write_xml(writer, dataset, &self.root)
    }
}

/// Write a dataset as indented XML. Nulls are empty elements; an empty
/// dataset yields an empty root element.
pub fn write_xml<W: Write>(writer: W, dataset: &Dataset, root: &str) -> Result<()> {
    let root = sanitize_element_name(root);
    let columns: Vec<(&str, String)> = dataset
        .columns()
        .into_iter()
        .map(|c| (c, sanitize_element_name(c)))
        .collect();

    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;

    if dataset.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new(root.as_str())))
            .map_err(xml_error)?;
    } else {
        xml.write_event(Event::Start(BytesStart::new(root.as_str())))
            .map_err(xml_error)?;
        for row in dataset {
            xml.write_event(Event::Start(BytesStart::new(RECORD_ELEMENT)))
                .map_err(xml_error)?;
            for (col, element) in &columns {
                match row.get(*col) {
                    Some(value) if !value.is_null() => {
                        xml.write_event(Event::Start(BytesStart::new(element.as_str())))
                            .map_err(xml_error)?;
                        xml.write_event(Event::Text(BytesText::new(&value.to_text())))
                            .map_err(xml_error)?;
                        xml.write_event(Event::End(BytesEnd::new(element.as_str())))
                            .map_err(xml_error)?;
                    }
                    _ => {
                        xml.write_event(Event::Empty(BytesStart::new(element.as_str())))
                            .map_err(xml_error)?;
                    }
                }
            }
            xml.write_event(Event::End(BytesEnd::new(RECORD_ELEMENT)))
                .map_err(xml_error)?;
        }
        xml.write_event(Event::End(BytesEnd::new(root.as_str())))
            .map_err(xml_error)?;
    }

    let mut inner = xml.into_inner();
    inner.write_all(b"\n").map_err(|e| RowsmithError::Output {
        message: "writing XML".to_string(),
        source: e,
    })
}

/// Turn an arbitrary field name into a valid XML element name: characters
/// outside `[A-Za-z0-9_.-]` become `_`, and names that cannot start an
/// element get a leading `_`.
pub fn sanitize_element_name(name: &str) -> String {
    let cleaned = INVALID_NAME_CHARS.replace_all(name, "_");
    match cleaned.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => cleaned.into_owned(),
        _ => format!("_{}", cleaned),
    }
}

fn xml_error(e: impl std::fmt::Display) -> RowsmithError {
    RowsmithError::Serialization {
        message: format!("XML write error: {}", e),
    }
}
