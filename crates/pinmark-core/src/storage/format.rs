//! Stored document layout.
//!
//! Documents are written inside a version envelope:
//! `{"version": 1, "document": {...}}`. Two unversioned shapes still load:
//! a bare document object, and a bare array of marker records, which
//! becomes a document holding only those markers.

use super::{StorageError, StorageResult};
use crate::collection::MarkerRecord;
use crate::document::MarkerDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Newest envelope version this build reads and the one it writes.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope<D> {
    version: u32,
    document: D,
}

/// Encode a document for storage.
pub fn encode_document(document: &MarkerDocument) -> StorageResult<String> {
    let envelope = Envelope {
        version: FORMAT_VERSION,
        document,
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Decode a stored document. The storage key `id` wins over any id inside.
pub fn decode_document(id: &str, json: &str) -> StorageResult<MarkerDocument> {
    let value: Value = serde_json::from_str(json)?;
    let version = match value.get("version") {
        Some(v) => Some(u32::deserialize(v)?),
        None => None,
    };

    let mut document = match version {
        Some(found) if found > FORMAT_VERSION => {
            return Err(StorageError::UnsupportedVersion {
                found,
                supported: FORMAT_VERSION,
            });
        }
        Some(_) => serde_json::from_value::<Envelope<MarkerDocument>>(value)?.document,
        None if value.is_array() => {
            let markers: Vec<MarkerRecord> = serde_json::from_value(value)?;
            log::info!("Document {} is a bare list of {} markers", id, markers.len());
            MarkerDocument {
                name: id.to_string(),
                markers,
                ..MarkerDocument::new()
            }
        }
        None => serde_json::from_value(value)?,
    };

    if document.id != id {
        log::debug!("Document stored as {} carried id {}", id, document.id);
        document.id = id.to_string();
    }
    Ok(document)
}
