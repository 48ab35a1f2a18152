//! Document persistence.
//!
//! Backends hold encoded documents keyed by id. The encoding lives in the
//! `format` module and is shared by every backend.

mod file;
mod format;
mod memory;

pub use file::FileStorage;
pub use format::{FORMAT_VERSION, decode_document, encode_document};
pub use memory::MemoryStorage;

use crate::document::MarkerDocument;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Document format version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// What a document listing shows without loading the editors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    pub markers: usize,
    pub control_points: usize,
    pub background_image: Option<String>,
}

impl From<&MarkerDocument> for DocumentSummary {
    fn from(document: &MarkerDocument) -> Self {
        Self {
            id: document.id.clone(),
            name: document.name.clone(),
            markers: document.markers.len(),
            control_points: document.curve.as_ref().map_or(0, |c| c.points.len()),
            background_image: document.background_image.clone(),
        }
    }
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{} markers, {} control points",
            self.id, self.name, self.markers, self.control_points
        )?;
        if let Some(image) = &self.background_image {
            write!(f, "\ton {}", image)?;
        }
        Ok(())
    }
}

/// Trait for document storage backends.
pub trait Storage: Send + Sync {
    /// Save a document under its own id, replacing any earlier copy.
    fn save(&self, document: &MarkerDocument) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a document. The returned document's id is always `id`.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<MarkerDocument>>;

    /// Summaries of every readable document, sorted by id.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<DocumentSummary>>>;
}

#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
