//! Resize grips: the eight directional handles around a shape's bounds.
//!
//! Everything here is pure geometry. Session state (which grip is being
//! dragged, where the press started) lives on [`crate::marker::Marker`].

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Side length of a grip region.
pub const GRIP_SIZE: f64 = 8.0;
/// Inward offset of a grip region relative to the shape edge.
pub const GRIP_OFFSET: f64 = -4.0;
/// How far the interactive bounding box extends beyond the shape rect.
pub const GRIP_MARGIN: f64 = GRIP_SIZE + GRIP_OFFSET;

/// A directional resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grip {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Cursor shape a host should show while hovering a grip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CursorKind {
    /// Plain pointer (no grip under the cursor).
    #[default]
    Arrow,
    /// Top-left to bottom-right diagonal (NW/SE).
    DiagonalForward,
    /// Top-right to bottom-left diagonal (NE/SW).
    DiagonalBackward,
    /// Up/down (N/S).
    Vertical,
    /// Left/right (E/W).
    Horizontal,
}

impl Grip {
    /// All grips in classification priority order.
    ///
    /// Where two regions overlap (only on very small bounds) the grip listed
    /// first wins: rows top to bottom, left to right within a row.
    pub const CLASSIFY_ORDER: [Grip; 8] = [
        Grip::NW,
        Grip::N,
        Grip::NE,
        Grip::W,
        Grip::E,
        Grip::SW,
        Grip::S,
        Grip::SE,
    ];

    /// Cursor hint for this grip.
    pub fn cursor(self) -> CursorKind {
        match self {
            Grip::NW | Grip::SE => CursorKind::DiagonalForward,
            Grip::NE | Grip::SW => CursorKind::DiagonalBackward,
            Grip::N | Grip::S => CursorKind::Vertical,
            Grip::E | Grip::W => CursorKind::Horizontal,
        }
    }

    /// Whether dragging this grip moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(self, Grip::W | Grip::NW | Grip::SW)
    }

    /// Whether dragging this grip moves the right edge.
    pub fn moves_right(self) -> bool {
        matches!(self, Grip::E | Grip::NE | Grip::SE)
    }

    /// Whether dragging this grip moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(self, Grip::N | Grip::NE | Grip::NW)
    }

    /// Whether dragging this grip moves the bottom edge.
    pub fn moves_bottom(self) -> bool {
        matches!(self, Grip::S | Grip::SE | Grip::SW)
    }

    /// Whether this is a corner grip.
    pub fn is_corner(self) -> bool {
        matches!(self, Grip::NE | Grip::SE | Grip::SW | Grip::NW)
    }
}

/// The hit region of one grip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GripRegion {
    pub grip: Grip,
    pub rect: Rect,
}

impl GripRegion {
    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}

/// The eight grip regions of a bounding box, stored in classification order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GripRegions([GripRegion; 8]);

impl GripRegions {
    /// Region for a given grip.
    pub fn get(&self, grip: Grip) -> &GripRegion {
        // CLASSIFY_ORDER holds every variant, and regions() builds in that order.
        let idx = Grip::CLASSIFY_ORDER
            .iter()
            .position(|&g| g == grip)
            .unwrap_or_default();
        &self.0[idx]
    }

    /// Iterate regions in classification order.
    pub fn iter(&self) -> impl Iterator<Item = &GripRegion> {
        self.0.iter()
    }

    /// Union of all regions.
    pub fn union_rect(&self) -> Rect {
        self.0
            .iter()
            .skip(1)
            .fold(self.0[0].rect, |acc, r| acc.union(r.rect))
    }
}

/// Compute grip regions for a bounding box.
///
/// Each region is a `GRIP_SIZE` square flush inside a corner or side
/// midpoint of `bounds`. Callers pass the rect inflated by [`GRIP_MARGIN`],
/// so regions straddle the visible edge.
pub fn regions(bounds: Rect) -> GripRegions {
    let sz = GRIP_SIZE;
    let center = bounds.center();
    let square = |x: f64, y: f64| Rect::new(x, y, x + sz, y + sz);

    let region_for = |grip: Grip| {
        let rect = match grip {
            Grip::NW => square(bounds.x0, bounds.y0),
            Grip::N => square(center.x - sz / 2.0, bounds.y0),
            Grip::NE => square(bounds.x1 - sz, bounds.y0),
            Grip::W => square(bounds.x0, center.y - sz / 2.0),
            Grip::E => square(bounds.x1 - sz, center.y - sz / 2.0),
            Grip::SW => square(bounds.x0, bounds.y1 - sz),
            Grip::S => square(center.x - sz / 2.0, bounds.y1 - sz),
            Grip::SE => square(bounds.x1 - sz, bounds.y1 - sz),
        };
        GripRegion { grip, rect }
    };

    GripRegions(Grip::CLASSIFY_ORDER.map(region_for))
}

/// Find the grip whose region contains `point`, in [`Grip::CLASSIFY_ORDER`].
pub fn classify(point: Point, regions: &GripRegions) -> Option<Grip> {
    regions
        .iter()
        .find(|region| region.contains(point))
        .map(|region| region.grip)
}

/// Cursor hint for a grip.
pub fn cursor_hint(grip: Grip) -> CursorKind {
    grip.cursor()
}
