//! Marker shape variants.
//!
//! A marker's geometry is always its rect; the variant decides how that
//! rect is drawn and which points count as "inside" it.

mod ellipse;
mod label;

pub use ellipse::EllipseShape;
pub use label::LabelShape;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Geometry contract shared by all marker shapes.
pub trait MarkerShape {
    /// Outline path for a marker occupying `rect`.
    fn outline(&self, rect: Rect) -> BezPath;

    /// Whether `point` lies inside the visible shape.
    fn contains(&self, rect: Rect, point: Point) -> bool;

    /// Where the number label is centered.
    fn label_anchor(&self, rect: Rect) -> Point {
        rect.center()
    }

    /// Font size for the number label.
    fn label_size(&self) -> f64;

    /// Whether the label gets its own background plate.
    fn label_plate(&self) -> bool {
        false
    }
}

/// Closed set of marker shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerKind {
    /// Filled ellipse with the number drawn on top.
    #[default]
    Ellipse,
    /// Numbered tag on a rounded plate.
    Label,
}

impl MarkerKind {
    fn shape(self) -> &'static dyn MarkerShape {
        match self {
            MarkerKind::Ellipse => &EllipseShape,
            MarkerKind::Label => &LabelShape,
        }
    }

    pub fn outline(self, rect: Rect) -> BezPath {
        self.shape().outline(rect)
    }

    pub fn contains(self, rect: Rect, point: Point) -> bool {
        self.shape().contains(rect, point)
    }

    pub fn label_anchor(self, rect: Rect) -> Point {
        self.shape().label_anchor(rect)
    }

    pub fn label_size(self) -> f64 {
        self.shape().label_size()
    }

    pub fn label_plate(self) -> bool {
        self.shape().label_plate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_roundtrip() {
        let c = SerializableColor::new(10, 20, 30, 40);
        let back: SerializableColor = Color::from(c).into();
        assert_eq!(c, back);
    }

    #[test]
    fn test_kind_dispatch() {
        let rect = Rect::new(0.0, 0.0, 40.0, 20.0);
        // Corner of the rect is inside the label plate but outside the ellipse.
        let corner = Point::new(1.0, 1.0);
        assert!(!MarkerKind::Ellipse.contains(rect, corner));
        assert!(MarkerKind::Label.contains(rect, corner));
        assert!(MarkerKind::Label.label_plate());
        assert!(!MarkerKind::Ellipse.label_plate());
    }
}
