//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Encoding is strict: one field-naming convention (`id`, `title`, `text`),
//! records sorted by id. Decoding is tolerant: keys are matched without regard
//! to ASCII case, so files written by older PascalCase writers or edited by
//! hand still load. Loading a tolerant file and writing it back out is how the
//! store normalizes its backing file.
//!
//! Implement [`Serializer`] if you need a different format.

use crate::error::{Error, Result};
use crate::record::{Record, RecordId};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Converts record snapshots to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode a full collection snapshot to bytes.
    fn serialize(&self, records: &[Record]) -> Result<Vec<u8>>;

    /// Decode bytes back into records. Must reject duplicate or zero ids.
    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<Record>>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation, easier to read by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, records: &[Record]) -> Result<Vec<u8>> {
        let mut sorted: Vec<&Record> = records.iter().collect();
        sorted.sort_by_key(|r| r.id);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&sorted)
        } else {
            serde_json::to_vec(&sorted)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<Record>> {
        let value: Value = serde_json::from_slice(bytes)?;
        let Value::Array(items) = value else {
            return Err(Error::Deserialize("expected a JSON array of records".into()));
        };

        let mut seen = HashSet::with_capacity(items.len());
        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            let Value::Object(fields) = item else {
                return Err(Error::Deserialize(format!("entry {idx} is not an object")));
            };
            let record = decode_record(idx, &fields)?;
            if !seen.insert(record.id) {
                return Err(Error::Deserialize(format!("duplicate id {}", record.id)));
            }
            records.push(record);
        }
        Ok(records)
    }
}

fn decode_record(idx: usize, fields: &Map<String, Value>) -> Result<Record> {
    let id = match field(fields, &["id"]) {
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    };
    let id: RecordId = match id {
        Some(id) if id > 0 => id,
        _ => {
            return Err(Error::Deserialize(format!(
                "entry {idx}: id must be a positive integer"
            )))
        }
    };
    Ok(Record {
        id,
        title: text_field(idx, fields, &["title"])?,
        body: text_field(idx, fields, &["text", "body"])?,
    })
}

// Absent or null text loads as empty; any other non-string is malformed.
fn text_field(idx: usize, fields: &Map<String, Value>, names: &[&str]) -> Result<String> {
    match field(fields, names) {
        Some(Value::String(s)) => Ok(s.clone()),
        None | Some(Value::Null) => Ok(String::new()),
        Some(_) => Err(Error::Deserialize(format!(
            "entry {idx}: field `{}` must be a string",
            names[0]
        ))),
    }
}

// First key (in `names` order) that matches ignoring ASCII case.
fn field<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| {
        fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}
