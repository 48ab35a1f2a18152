//! In-memory storage.

use super::{BoxFuture, DocumentSummary, Storage, StorageError, StorageResult};
use super::{decode_document, encode_document};
use crate::document::MarkerDocument;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Keeps encoded documents for a scratch session.
///
/// Documents are held in their stored encoding, so anything saved here
/// reloads exactly as it would from disk.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, document: &MarkerDocument) -> BoxFuture<'_, StorageResult<()>> {
        let id = document.id.clone();
        let encoded = encode_document(document);
        Box::pin(async move {
            let json = encoded?;
            self.documents
                .write()
                .map_err(|_| StorageError::Poisoned)?
                .insert(id, json);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<MarkerDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            let documents = self.documents.read().map_err(|_| StorageError::Poisoned)?;
            match documents.get(&id) {
                Some(json) => decode_document(&id, json),
                None => Err(StorageError::NotFound(id)),
            }
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<DocumentSummary>>> {
        Box::pin(async move {
            let documents = self.documents.read().map_err(|_| StorageError::Poisoned)?;
            documents
                .iter()
                .map(|(id, json)| decode_document(id, json).map(|d| DocumentSummary::from(&d)))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::MarkerRecord;
    use crate::shapes::MarkerKind;
    use crate::storage::block_on;

    fn document(id: &str, markers: usize) -> MarkerDocument {
        let mut doc = MarkerDocument::new();
        doc.id = id.to_string();
        doc.markers = (1..=markers as u32)
            .map(|number| MarkerRecord {
                x: f64::from(number) * 50.0,
                y: 0.0,
                width: 40.0,
                height: 40.0,
                number,
                kind: MarkerKind::Ellipse,
            })
            .collect();
        doc
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let doc = document("test", 2);

        block_on(storage.save(&doc)).unwrap();
        let loaded = block_on(storage.load("test")).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(id)) if id == "nonexistent"));
    }

    #[test]
    fn test_save_replaces() {
        let storage = MemoryStorage::new();
        block_on(storage.save(&document("doc", 3))).unwrap();
        block_on(storage.save(&document("doc", 1))).unwrap();
        assert_eq!(block_on(storage.load("doc")).unwrap().markers.len(), 1);
    }

    #[test]
    fn test_list_sorted_summaries() {
        let storage = MemoryStorage::new();
        block_on(storage.save(&document("b-floor", 2))).unwrap();
        block_on(storage.save(&document("a-floor", 5))).unwrap();

        let list = block_on(storage.list()).unwrap();
        let ids: Vec<&str> = list.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a-floor", "b-floor"]);
        assert_eq!(list[0].markers, 5);
        assert_eq!(list[1].control_points, 0);
    }
}
