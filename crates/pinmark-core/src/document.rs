//! Persistable editing session.

use crate::collection::{MarkerCollection, MarkerRecord};
use crate::curve::{CurveModel, CurveRecord};
use crate::editor::{CurveEditor, MarkerEditor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Markers, curve and background of one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// Background image file name. Loading it is up to the host.
    #[serde(default)]
    pub background_image: Option<String>,
    /// Markers in display order.
    #[serde(default)]
    pub markers: Vec<MarkerRecord>,
    #[serde(default)]
    pub curve: Option<CurveRecord>,
}

impl Default for MarkerDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            background_image: None,
            markers: Vec::new(),
            curve: None,
        }
    }

    /// Snapshot live models. An empty curve is stored as `None`.
    pub fn capture(&mut self, markers: &MarkerCollection, curve: &CurveModel) {
        self.markers = markers.to_records();
        self.curve = (!curve.is_empty()).then(|| curve.to_record());
    }

    /// Snapshot both editors into a document with the given id.
    pub fn from_editors(id: impl Into<String>, markers: &MarkerEditor, curve: &CurveEditor) -> Self {
        let mut document = Self {
            id: id.into(),
            ..Self::new()
        };
        document.capture(markers.markers(), curve.curve());
        document
    }

    /// Rebuild the marker collection.
    pub fn marker_collection(&self) -> MarkerCollection {
        MarkerCollection::from_records(&self.markers)
    }

    /// Rebuild the curve, falling back to `default_precision` when none is stored.
    pub fn curve_model(&self, default_precision: f64) -> CurveModel {
        match &self.curve {
            Some(record) => CurveModel::from_record(record),
            None => CurveModel::with_precision(default_precision),
        }
    }

    /// Load this document into both editors.
    pub fn apply_to(&self, markers: &mut MarkerEditor, curve: &mut CurveEditor) {
        markers.set_markers(self.marker_collection());
        let precision = curve.config().default_precision;
        *curve.curve_mut() = self.curve_model(precision);
        log::debug!(
            "Applied document {} ({} markers, {} control points)",
            self.id,
            markers.markers().len(),
            curve.curve().len()
        );
    }
}
