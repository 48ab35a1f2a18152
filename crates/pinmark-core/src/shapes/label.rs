//! Rounded-plate label marker.

use super::MarkerShape;
use kurbo::{BezPath, Point, Rect, RoundedRect, Shape as KurboShape};

/// Numbered tag drawn as a rounded rect filling the marker rect.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelShape;

impl LabelShape {
    pub const CORNER_RADIUS: f64 = 5.0;
    pub const LABEL_SIZE: f64 = 13.0;
}

impl MarkerShape for LabelShape {
    fn outline(&self, rect: Rect) -> BezPath {
        let rect = rect.abs();
        let radius = Self::CORNER_RADIUS
            .min(rect.width() / 2.0)
            .min(rect.height() / 2.0);
        RoundedRect::from_rect(rect, radius).to_path(0.1)
    }

    fn contains(&self, rect: Rect, point: Point) -> bool {
        rect.abs().contains(point)
    }

    fn label_size(&self) -> f64 {
        Self::LABEL_SIZE
    }

    fn label_plate(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let rect = Rect::new(0.0, 0.0, 40.0, 20.0);
        assert!(LabelShape.contains(rect, Point::new(1.0, 1.0)));
        assert!(!LabelShape.contains(rect, Point::new(-1.0, 1.0)));
    }

    #[test]
    fn test_flipped_rect_still_hits() {
        let rect = Rect::new(40.0, 20.0, 0.0, 0.0);
        assert!(LabelShape.contains(rect, Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_outline_small_rect() {
        let path = LabelShape.outline(Rect::new(0.0, 0.0, 4.0, 4.0));
        let bbox = path.bounding_box();
        assert!((bbox.width() - 4.0).abs() < 0.01);
    }
}
