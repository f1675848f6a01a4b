//! JSON codec for MIDI map documents
//!
//! The wire format is a JSON object with two optional keyed sub-objects:
//! `{"groups": {"0": "Vocalist", ...}, "attributes": {"1": "Hue", ...}}`.
//! Object key order becomes entry order, so `serde_json` is built with
//! `preserve_order`.

use serde_json::{Map, Value};
use thiserror::Error;

use super::MidiMap;

/// Errors from decoding a MIDI map payload
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Malformed payload: not JSON, root not an object, or a
    /// groups/attributes field not a keyed object of scalars
    #[error("invalid MIDI map format: {0}")]
    InvalidFormat(String),

    /// An entry with an empty id or empty name
    #[error("empty id or name in '{0}' section")]
    EmptyEntry(&'static str),
}

/// Decode a MIDI map from JSON text.
///
/// Never checks that the lists are non-empty; that belongs to whoever
/// installs the document into a registry.
pub fn decode(text: &str) -> Result<MidiMap, DecodeError> {
    let root: Value =
        serde_json::from_str(text).map_err(|e| DecodeError::InvalidFormat(e.to_string()))?;

    let Value::Object(root) = root else {
        return Err(DecodeError::InvalidFormat("root must be an object".to_string()));
    };

    let mut map = MidiMap::new();

    if let Some(groups) = root.get("groups") {
        map.groups = decode_section(groups, "groups")?;
    }

    if let Some(attributes) = root.get("attributes") {
        map.attributes = decode_section(attributes, "attributes")?;
    }

    Ok(map)
}

fn decode_section(
    value: &Value,
    section: &'static str,
) -> Result<Vec<(String, String)>, DecodeError> {
    let Value::Object(entries) = value else {
        return Err(DecodeError::InvalidFormat(format!(
            "'{section}' must be an object"
        )));
    };

    let mut out = Vec::with_capacity(entries.len());

    for (key, value) in entries {
        // String values pass through; numbers and bools are stringified
        let name = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => {
                return Err(DecodeError::InvalidFormat(format!(
                    "'{section}' entry '{key}' must be a scalar"
                )))
            }
        };

        if key.is_empty() || name.is_empty() {
            return Err(DecodeError::EmptyEntry(section));
        }

        out.push((key.clone(), name));
    }

    Ok(out)
}

/// Encode a MIDI map to JSON text, preserving entry order
pub fn encode(map: &MidiMap) -> String {
    let mut root = Map::new();
    root.insert("groups".to_string(), section_to_value(&map.groups));
    root.insert("attributes".to_string(), section_to_value(&map.attributes));
    Value::Object(root).to_string()
}

fn section_to_value(entries: &[(String, String)]) -> Value {
    let mut object = Map::new();
    for (id, name) in entries {
        object.insert(id.clone(), Value::String(name.clone()));
    }
    Value::Object(object)
}
