use logstitch_core::{RecordSink, SinkError};
use logstitch_types::{FieldValue, Record};
use std::io::Write;

/// Columns exported when neither the command line nor the config names any.
pub const DEFAULT_FIELDS: &[&str] = &[
    "report_timestamp",
    "obj_type",
    "event_id",
    "module",
    "internal",
    "context",
    "obj_uuid",
    "obj_name",
    "event_details",
];

/// Writes records as CSV rows projected onto a fixed list of fields.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    fields: Vec<String>,
}

impl<W: Write> CsvSink<W> {
    /// Create the sink and write the header row.
    pub fn new(output: W, fields: Vec<String>) -> Result<Self, SinkError> {
        let mut writer = csv::Writer::from_writer(output);
        writer
            .write_record(&fields)
            .map_err(|e| SinkError::with_source("could not write CSV header", e))?;
        Ok(Self { writer, fields })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::with_source("could not flush CSV output", e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn emit(&mut self, record: &Record) -> Result<(), SinkError> {
        let row = self
            .fields
            .iter()
            .map(|name| neutralize(render_value(record.field(name))));
        self.writer
            .write_record(row)
            .map_err(|e| SinkError::with_source("could not write CSV row", e))
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(SinkError::from)
    }
}

/// Text for one cell: strings verbatim, null or missing as empty,
/// everything else as compact JSON.
pub fn render_value(value: Option<&FieldValue>) -> String {
    match value {
        None | Some(FieldValue::Null) => String::new(),
        Some(FieldValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Keep spreadsheets from evaluating a cell as a formula.
pub fn neutralize(text: String) -> String {
    if text.trim_start().starts_with(['+', '-', '=']) {
        format!("'{}", text)
    } else {
        text
    }
}
