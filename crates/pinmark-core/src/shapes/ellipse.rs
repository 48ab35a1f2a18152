//! Ellipse marker.

use super::MarkerShape;
use kurbo::{BezPath, Ellipse, Point, Rect, Shape as KurboShape};

/// Ellipse inscribed in the marker rect.
#[derive(Debug, Clone, Copy, Default)]
pub struct EllipseShape;

impl EllipseShape {
    pub const LABEL_SIZE: f64 = 10.0;
}

impl MarkerShape for EllipseShape {
    fn outline(&self, rect: Rect) -> BezPath {
        Ellipse::from_rect(rect.abs()).to_path(0.1)
    }

    fn contains(&self, rect: Rect, point: Point) -> bool {
        let rect = rect.abs();
        let rx = rect.width() / 2.0;
        let ry = rect.height() / 2.0;
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return false;
        }
        let center = rect.center();
        let dx = (point.x - center.x) / rx;
        let dy = (point.y - center.y) / ry;
        dx * dx + dy * dy <= 1.0
    }

    fn label_size(&self) -> f64 {
        Self::LABEL_SIZE
    }
}
