//! Numbered, resizable markers.

use crate::grip::{self, CursorKind, GRIP_MARGIN, Grip, GripRegions};
use crate::shapes::MarkerKind;
use kurbo::{BezPath, Point, Rect, Vec2};
use uuid::Uuid;

/// Unique identifier for markers.
pub type MarkerId = Uuid;

/// Snapshot taken when a grip is pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeState {
    /// The grip being dragged.
    pub grip: Grip,
    /// Pointer position at press time.
    pub press_anchor: Point,
    /// Bounding box at press time.
    pub press_rect: Rect,
}

/// A placeable, numbered shape.
#[derive(Debug, Clone)]
pub struct Marker {
    pub(crate) id: MarkerId,
    /// The shape's own geometry (grips excluded).
    rect: Rect,
    /// Display label, kept dense by the owning collection.
    number: u32,
    /// Selection flag.
    pub selected: bool,
    /// How the marker is drawn.
    pub kind: MarkerKind,
    resize: Option<ResizeState>,
    /// Cached grip regions, derived from `bounding_box()`.
    regions: GripRegions,
}

fn empty_regions() -> GripRegions {
    grip::regions(Rect::ZERO)
}

impl Marker {
    /// Create a new marker.
    pub fn new(rect: Rect, number: u32) -> Self {
        Self::with_kind(rect, number, MarkerKind::default())
    }

    /// Create a new marker of a given kind.
    pub fn with_kind(rect: Rect, number: u32, kind: MarkerKind) -> Self {
        let mut marker = Self {
            id: Uuid::new_v4(),
            rect,
            number,
            selected: false,
            kind,
            resize: None,
            regions: empty_regions(),
        };
        marker.refresh_regions();
        marker
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Update the display label.
    pub fn set_number(&mut self, number: u32) {
        self.number = number;
    }

    /// Replace the shape geometry.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
        self.refresh_regions();
    }

    /// Move by a delta (drag).
    pub fn translate(&mut self, delta: Vec2) {
        self.set_rect(self.rect + delta);
    }

    /// Move the rect's top-left corner to `origin`.
    pub fn move_to(&mut self, origin: Point) {
        self.set_rect(self.rect.with_origin(origin));
    }

    /// Interactive extent: the rect grown by the grip margin on every side.
    ///
    /// Grip regions are fully contained in this box, so hosts should
    /// redraw this area rather than `rect()`.
    pub fn bounding_box(&self) -> Rect {
        self.rect.inflate(GRIP_MARGIN, GRIP_MARGIN)
    }

    /// Current grip regions.
    pub fn regions(&self) -> &GripRegions {
        &self.regions
    }

    /// Grip under `point`, if any.
    ///
    /// Only meaningful while selected; callers decide whether to act on it.
    pub fn hit_test_grip(&self, point: Point) -> Option<Grip> {
        grip::classify(point, &self.regions)
    }

    /// Cursor a host should show with the pointer at `point`.
    pub fn hover_cursor(&self, point: Point) -> CursorKind {
        if !self.selected {
            return CursorKind::Arrow;
        }
        self.hit_test_grip(point)
            .map(Grip::cursor)
            .unwrap_or(CursorKind::Arrow)
    }

    /// Whether `point` hits the visible shape, or one of its grips while selected.
    pub fn contains(&self, point: Point) -> bool {
        if self.kind.contains(self.rect, point) {
            return true;
        }
        self.selected && self.hit_test_grip(point).is_some()
    }

    /// Outline for rendering.
    pub fn outline(&self) -> BezPath {
        self.kind.outline(self.rect)
    }

    /// Active resize state, if a session is in progress.
    pub fn resize_state(&self) -> Option<&ResizeState> {
        self.resize.as_ref()
    }

    pub fn active_grip(&self) -> Option<Grip> {
        self.resize.map(|state| state.grip)
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Start a resize if `point` is on a grip.
    ///
    /// Returns `None` when no grip is hit; the press is then an ordinary
    /// drag and the host moves the marker instead.
    pub fn begin_resize(&mut self, point: Point) -> Option<ResizeSession<'_>> {
        let grip = self.hit_test_grip(point)?;
        let state = ResizeState {
            grip,
            press_anchor: point,
            press_rect: self.bounding_box(),
        };
        self.resize = Some(state);
        log::debug!("Marker {} begin resize {:?} at {:?}", self.number, grip, point);
        Some(ResizeSession { marker: self, state })
    }

    /// Reattach to an in-progress resize (for the next pointer event).
    pub fn resume_resize(&mut self) -> Option<ResizeSession<'_>> {
        let state = self.resize?;
        Some(ResizeSession { marker: self, state })
    }

    /// Finish any in-progress resize. Safe to call without one.
    ///
    /// An edge dragged past its opposite leaves a flipped rect during the
    /// session; committing normalizes it.
    pub fn end_resize(&mut self) -> Rect {
        if self.resize.take().is_some() {
            self.rect = self.rect.abs();
            log::debug!("Marker {} end resize: {:?}", self.number, self.rect);
        }
        self.refresh_regions();
        self.rect
    }

    /// Abort any in-progress resize, restoring the geometry from press time.
    pub fn cancel_resize(&mut self) -> Rect {
        if let Some(state) = self.resize.take() {
            self.rect = state.press_rect.inflate(-GRIP_MARGIN, -GRIP_MARGIN);
            log::debug!("Marker {} resize cancelled", self.number);
        }
        self.refresh_regions();
        self.rect
    }

    fn refresh_regions(&mut self) {
        self.regions = grip::regions(self.bounding_box());
    }

    /// Apply a pointer position to the active resize.
    fn apply_resize(&mut self, state: ResizeState, point: Point) -> Rect {
        let delta = point - state.press_anchor;
        let press = state.press_rect;
        let grip = state.grip;
        let mut rect = self.rect;

        if grip.moves_left() {
            rect.x0 = press.x0 + delta.x + GRIP_MARGIN;
        }
        if grip.moves_right() {
            rect.x1 = press.x1 + delta.x - GRIP_MARGIN;
        }
        if grip.moves_top() {
            rect.y0 = press.y0 + delta.y + GRIP_MARGIN;
        }
        if grip.moves_bottom() {
            rect.y1 = press.y1 + delta.y - GRIP_MARGIN;
        }

        self.set_rect(rect);
        rect
    }
}

/// Handle to an in-progress resize.
///
/// Only obtainable from [`Marker::begin_resize`] or [`Marker::resume_resize`],
/// so updates without an active session cannot be expressed.
#[derive(Debug)]
pub struct ResizeSession<'a> {
    marker: &'a mut Marker,
    state: ResizeState,
}

impl ResizeSession<'_> {
    pub fn grip(&self) -> Grip {
        self.state.grip
    }

    pub fn press_anchor(&self) -> Point {
        self.state.press_anchor
    }

    pub fn press_rect(&self) -> Rect {
        self.state.press_rect
    }

    /// Move the active grip to follow the pointer. Returns the new rect.
    pub fn update(&mut self, point: Point) -> Rect {
        self.marker.apply_resize(self.state, point)
    }

    /// Commit the resize and close the session.
    pub fn commit(self) -> Rect {
        self.marker.end_resize()
    }

    /// Restore the press-time geometry and close the session.
    pub fn cancel(self) -> Rect {
        self.marker.cancel_resize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_marker() -> Marker {
        let mut marker = Marker::new(Rect::new(100.0, 100.0, 140.0, 140.0), 1);
        marker.selected = true;
        marker
    }

    fn grip_center(marker: &Marker, grip: Grip) -> Point {
        marker.regions().get(grip).rect.center()
    }

    fn assert_rect_eq(a: Rect, b: Rect) {
        for (x, y) in [(a.x0, b.x0), (a.y0, b.y0), (a.x1, b.x1), (a.y1, b.y1)] {
            assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_bounding_box() {
        let marker = selected_marker();
        assert_rect_eq(marker.bounding_box(), Rect::new(96.0, 96.0, 144.0, 144.0));
    }

    #[test]
    fn test_grip_regions_straddle_edge() {
        let marker = selected_marker();
        let nw = marker.regions().get(Grip::NW).rect;
        assert_rect_eq(nw, Rect::new(96.0, 96.0, 104.0, 104.0));
        assert_eq!(marker.hit_test_grip(Point::new(99.0, 99.0)), Some(Grip::NW));
        assert_eq!(marker.hit_test_grip(Point::new(102.0, 102.0)), Some(Grip::NW));
        assert_eq!(marker.hit_test_grip(Point::new(120.0, 120.0)), None);
    }

    #[test]
    fn test_begin_resize_miss() {
        let mut marker = selected_marker();
        assert!(marker.begin_resize(Point::new(120.0, 120.0)).is_none());
        assert!(!marker.is_resizing());
        assert!(marker.resume_resize().is_none());
    }

    #[test]
    fn test_begin_resize_records_press() {
        let mut marker = selected_marker();
        let press = grip_center(&marker, Grip::E);
        let bbox = marker.bounding_box();
        let session = marker.begin_resize(press).unwrap();
        assert_eq!(session.grip(), Grip::E);
        assert_eq!(session.press_anchor(), press);
        assert_eq!(session.press_rect(), bbox);
        drop(session);
        assert_eq!(marker.active_grip(), Some(Grip::E));
    }

    #[test]
    fn test_resize_east_moves_right_edge_only() {
        let mut marker = selected_marker();
        let before = marker.bounding_box();
        let press = grip_center(&marker, Grip::E);
        let mut session = marker.begin_resize(press).unwrap();
        session.update(press + Vec2::new(25.0, 13.0));
        session.commit();

        let after = marker.bounding_box();
        assert_rect_eq(after, Rect::new(before.x0, before.y0, before.x1 + 25.0, before.y1));
        assert!(!marker.is_resizing());
    }

    #[test]
    fn test_every_grip_changes_only_its_edges() {
        let delta = Vec2::new(-7.0, 11.0);
        for grip in Grip::CLASSIFY_ORDER {
            let mut marker = selected_marker();
            let before = marker.bounding_box();
            let press = grip_center(&marker, grip);
            let mut session = marker.begin_resize(press).unwrap();
            assert_eq!(session.grip(), grip);
            session.update(press + delta);
            session.commit();
            let after = marker.bounding_box();

            let expect = Rect::new(
                if grip.moves_left() { before.x0 + delta.x } else { before.x0 },
                if grip.moves_top() { before.y0 + delta.y } else { before.y0 },
                if grip.moves_right() { before.x1 + delta.x } else { before.x1 },
                if grip.moves_bottom() { before.y1 + delta.y } else { before.y1 },
            );
            assert_rect_eq(after, expect);
        }
    }

    #[test]
    fn test_update_is_relative_to_press() {
        let mut marker = selected_marker();
        let press = grip_center(&marker, Grip::SE);
        {
            let mut session = marker.begin_resize(press).unwrap();
            session.update(press + Vec2::new(50.0, 50.0));
        }
        // Later event reattaches; the delta is still measured from the press.
        let mut session = marker.resume_resize().unwrap();
        let rect = session.update(press + Vec2::new(10.0, 5.0));
        assert_rect_eq(rect, Rect::new(100.0, 100.0, 150.0, 145.0));
    }

    #[test]
    fn test_regions_follow_resize() {
        let mut marker = selected_marker();
        let press = grip_center(&marker, Grip::S);
        let mut session = marker.begin_resize(press).unwrap();
        session.update(press + Vec2::new(0.0, 20.0));
        session.commit();
        let s = marker.regions().get(Grip::S).rect;
        assert!((s.y1 - marker.bounding_box().y1).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_restores_rect() {
        let mut marker = selected_marker();
        let original = marker.rect();
        let press = grip_center(&marker, Grip::NW);
        let mut session = marker.begin_resize(press).unwrap();
        session.update(press + Vec2::new(-30.0, -30.0));
        let restored = session.cancel();
        assert_rect_eq(restored, original);
        assert!(!marker.is_resizing());
    }

    #[test]
    fn test_flipped_resize_normalizes_on_commit() {
        let mut marker = selected_marker();
        let press = grip_center(&marker, Grip::E);
        let mut session = marker.begin_resize(press).unwrap();
        let during = session.update(press + Vec2::new(-60.0, 0.0));
        assert!(during.x1 < during.x0);
        let committed = session.commit();
        assert!(committed.x0 <= committed.x1);
        assert_rect_eq(committed, Rect::new(80.0, 100.0, 100.0, 140.0));
    }

    #[test]
    fn test_end_resize_without_session() {
        let mut marker = selected_marker();
        let rect = marker.end_resize();
        assert_eq!(rect, marker.rect());
    }

    #[test]
    fn test_hover_cursor() {
        let mut marker = selected_marker();
        let ne = grip_center(&marker, Grip::NE);
        assert_eq!(marker.hover_cursor(ne), CursorKind::DiagonalBackward);
        assert_eq!(marker.hover_cursor(Point::new(120.0, 120.0)), CursorKind::Arrow);
        marker.selected = false;
        assert_eq!(marker.hover_cursor(ne), CursorKind::Arrow);
    }

    #[test]
    fn test_translate() {
        let mut marker = selected_marker();
        marker.translate(Vec2::new(5.0, -5.0));
        assert_rect_eq(marker.rect(), Rect::new(105.0, 95.0, 145.0, 135.0));
        assert_eq!(marker.hit_test_grip(Point::new(103.0, 93.0)), Some(Grip::NW));
    }

    #[test]
    fn test_move_to() {
        let mut marker = selected_marker();
        marker.move_to(Point::new(0.0, 0.0));
        assert_rect_eq(marker.rect(), Rect::new(0.0, 0.0, 40.0, 40.0));
    }

    #[test]
    fn test_contains_grip_only_when_selected() {
        let mut marker = selected_marker();
        let outside_corner = Point::new(97.0, 97.0);
        assert!(marker.contains(outside_corner));
        marker.selected = false;
        assert!(!marker.contains(outside_corner));
        assert!(marker.contains(Point::new(120.0, 120.0)));
    }
}
