//! Pinmark Core Library
//!
//! Host-agnostic editing core: numbered markers with grip-based resizing,
//! and a control-point driven Bézier curve.

pub mod collection;
pub mod config;
pub mod curve;
pub mod document;
pub mod editor;
pub mod error;
pub mod grip;
pub mod input;
pub mod marker;
pub mod render;
pub mod shapes;
pub mod storage;

pub use collection::{MarkerCollection, MarkerRecord};
pub use config::{ConfigError, EditorConfig, Palette};
pub use curve::{ControlPoint, CurveModel, CurveRecord};
pub use document::MarkerDocument;
pub use editor::{CurveEditor, Editor, EditorResponse, MarkerEditor};
pub use error::{EditError, EditResult};
pub use grip::{CursorKind, Grip, GripRegion, GripRegions};
pub use input::{InputEvent, InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use marker::{Marker, MarkerId, ResizeSession, ResizeState};
pub use render::{DrawCommand, Renderer, render_scene};
pub use shapes::{MarkerKind, MarkerShape, SerializableColor};
pub use storage::{
    DocumentSummary, FileStorage, MemoryStorage, Storage, StorageError, StorageResult,
};
