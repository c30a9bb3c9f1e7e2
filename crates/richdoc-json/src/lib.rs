#![warn(missing_docs)]
//! `richdoc-json` - JSON wire serialization for `richdoc-core`.
//!
//! The core crate defines the Document interchange shape (plain nested data,
//! `Document → Line[] → Chunk[]`) but not its wire serialization; this crate
//! provides one: a version-tagged JSON envelope
//! `{"version": 1, "lines": [...]}`.
//!
//! Round-tripping preserves text, styles, alignment, and opaque kind/payload
//! *content*. Opaque payload `Arc` identity is process-local and is not
//! preserved across the wire; re-linking by reference only applies within a
//! process.

use richdoc_core::{Document, Line};
use serde_json::Value;

/// Wire format version written by [`encode_document`] and accepted by
/// [`decode_document`].
pub const INTERCHANGE_VERSION: u64 = 1;

/// Wire decoding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The envelope carries a version this crate does not understand.
    UnsupportedVersion(u64),
    /// The input is not a valid envelope.
    Malformed(String),
}

impl std::fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterchangeError::UnsupportedVersion(version) => {
                write!(f, "Unsupported interchange version: {version}")
            }
            InterchangeError::Malformed(msg) => {
                write!(f, "Malformed interchange document: {msg}")
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Encode a document into the versioned JSON envelope.
pub fn encode_document(document: &Document) -> String {
    let mut envelope = serde_json::Map::new();
    envelope.insert("version".to_string(), Value::from(INTERCHANGE_VERSION));
    envelope.insert(
        "lines".to_string(),
        // The interchange shape is plain nested data; serialization cannot
        // fail for it.
        serde_json::to_value(&document.lines).expect("plain data"),
    );
    Value::Object(envelope).to_string()
}

/// Decode a document from the versioned JSON envelope.
pub fn decode_document(input: &str) -> Result<Document, InterchangeError> {
    let value: Value = serde_json::from_str(input)
        .map_err(|err| InterchangeError::Malformed(err.to_string()))?;

    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| InterchangeError::Malformed("missing version field".to_string()))?;
    if version != INTERCHANGE_VERSION {
        return Err(InterchangeError::UnsupportedVersion(version));
    }

    let lines = value
        .get("lines")
        .cloned()
        .ok_or_else(|| InterchangeError::Malformed("missing lines field".to_string()))?;
    let lines: Vec<Line> =
        serde_json::from_value(lines).map_err(|err| InterchangeError::Malformed(err.to_string()))?;
    Ok(Document::from_lines(lines))
}
