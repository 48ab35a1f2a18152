//! File-based storage.

use super::{BoxFuture, DocumentSummary, Storage, StorageError, StorageResult};
use super::{decode_document, encode_document};
use crate::document::MarkerDocument;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Stores each document as `<id>.json` in one directory.
///
/// Saves go to a sibling `.json.tmp` file that is renamed over the target,
/// so an interrupted save leaves the previous copy intact.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path).map_err(|e| io_error("create", &base_path, e))?;
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/pinmark/documents/`
    /// On Windows: `%LOCALAPPDATA%\pinmark\documents\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("pinmark").join("documents"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File name for `id`; characters outside `[A-Za-z0-9_-]` become `_`.
    fn document_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }
}

fn io_error(action: &str, path: &Path, e: io::Error) -> StorageError {
    StorageError::Io(format!("Failed to {} {}: {}", action, path.display(), e))
}

fn write_atomic(path: &Path, contents: &str) -> StorageResult<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(|e| io_error("write", &tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        io_error("replace", path, e)
    })
}

fn read_document(path: &Path, id: &str) -> StorageResult<MarkerDocument> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Err(e) => return Err(io_error("read", path, e)),
    };
    decode_document(id, &json)
}

impl Storage for FileStorage {
    fn save(&self, document: &MarkerDocument) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(&document.id);
        let encoded = encode_document(document);
        let markers = document.markers.len();
        Box::pin(async move {
            write_atomic(&path, &encoded?)?;
            log::debug!("Saved {} ({} markers)", path.display(), markers);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<MarkerDocument>> {
        let path = self.document_path(id);
        let id = id.to_string();
        Box::pin(async move {
            read_document(&path, &id).inspect_err(|e| {
                if !matches!(e, StorageError::NotFound(_)) {
                    log::warn!("Could not load {}: {}", path.display(), e);
                }
            })
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<DocumentSummary>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            let entries = match fs::read_dir(&base) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(io_error("list", &base, e)),
            };

            let mut summaries = Vec::new();
            for path in entries.flatten().map(|entry| entry.path()) {
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                match read_document(&path, id) {
                    Ok(document) => summaries.push(DocumentSummary::from(&document)),
                    Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
                }
            }
            summaries.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(summaries)
        })
    }
}
