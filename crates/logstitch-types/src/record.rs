use crate::timestamp::{Timestamp, parse_api_timestamp};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Ordered field-name to value mapping of a record.
pub type FieldMap = Map<String, Value>;

/// Opaque value of one record field.
pub type FieldValue = Value;

/// Field carrying the record timestamp in analytics log payloads.
pub const DEFAULT_TIMESTAMP_FIELD: &str = "report_timestamp";

/// One log record: a timestamp plus an ordered set of opaque named fields.
///
/// Two records are equal only when their timestamps and their full ordered
/// field sequences are equal. Many distinct records can share a timestamp,
/// so identity by timestamp alone is never enough.
#[derive(Debug, Clone)]
pub struct Record {
    timestamp: Timestamp,
    fields: FieldMap,
}

impl Record {
    pub fn new(timestamp: Timestamp, fields: FieldMap) -> Self {
        Self { timestamp, fields }
    }

    /// Decode a record from one element of an API `results` array.
    pub fn from_json(value: Value, timestamp_field: &str) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(Error::MalformedRecord(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        };

        let raw = fields
            .get(timestamp_field)
            .ok_or_else(|| Error::MalformedRecord(format!("missing field '{}'", timestamp_field)))?;
        let text = raw.as_str().ok_or_else(|| {
            Error::MalformedRecord(format!(
                "field '{}' is {}, expected a string",
                timestamp_field,
                json_kind(raw)
            ))
        })?;
        let timestamp = parse_api_timestamp(text)
            .map_err(|e| Error::MalformedRecord(format!("field '{}': {}", timestamp_field, e)))?;

        Ok(Self { timestamp, fields })
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        // Map equality ignores insertion order, so compare the sequences.
        self.timestamp == other.timestamp && self.fields.iter().eq(other.fields.iter())
    }
}

impl Eq for Record {}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
