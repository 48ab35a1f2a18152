//! Error types for editing operations.

use crate::marker::MarkerId;
use thiserror::Error;

/// Precondition violations reported by the marker and curve models.
///
/// These are caller bugs, not runtime faults: the model state is left
/// untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Index {index} out of range for {len} control points")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("No resize in progress for marker {0}")]
    NoActiveResize(MarkerId),
    #[error("Marker not found: {0}")]
    MarkerNotFound(MarkerId),
}

/// Result type for editing operations.
pub type EditResult<T> = Result<T, EditError>;
