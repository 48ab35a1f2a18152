//! Ordered, densely numbered marker collection.

use crate::error::{EditError, EditResult};
use crate::grip::Grip;
use crate::marker::{Marker, MarkerId};
use crate::shapes::MarkerKind;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Persisted form of one marker: `(x, y, width, height, number)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub number: u32,
    #[serde(default)]
    pub kind: MarkerKind,
}

impl MarkerRecord {
    /// Stored geometry. A negative size is read as extending the other way.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size((self.x, self.y), (self.width, self.height)).abs()
    }

    /// Zero-size markers are legal (an edge dragged onto its opposite);
    /// only non-finite geometry is rejected.
    fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl From<&Marker> for MarkerRecord {
    fn from(marker: &Marker) -> Self {
        let rect = marker.rect().abs();
        Self {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            number: marker.number(),
            kind: marker.kind,
        }
    }
}

/// Markers in display order.
///
/// Sequence order is both z-order (later markers are on top) and numbering
/// order. After every mutation the numbers are exactly `1..=len`.
#[derive(Debug, Clone, Default)]
pub struct MarkerCollection {
    markers: Vec<Marker>,
}

impl MarkerCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker with its top-left corner at `origin`.
    pub fn add_marker(&mut self, origin: Point, size: Size) -> MarkerId {
        self.add_marker_with_kind(origin, size, MarkerKind::default())
    }

    /// Append a marker of a specific kind.
    pub fn add_marker_with_kind(&mut self, origin: Point, size: Size, kind: MarkerKind) -> MarkerId {
        let number = self.next_number();
        let marker = Marker::with_kind(Rect::from_origin_size(origin, size), number, kind);
        let id = marker.id();
        log::debug!("Added marker {} at {:?}", number, origin);
        self.markers.push(marker);
        id
    }

    fn next_number(&self) -> u32 {
        u32::try_from(self.markers.len()).map_or(u32::MAX, |n| n.saturating_add(1))
    }

    /// Remove every selected marker, then renumber the rest.
    ///
    /// Returns the removed markers in their former order.
    pub fn delete_selected(&mut self) -> Vec<Marker> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.markers).into_iter().partition(|m| m.selected);
        self.markers = kept;
        if !removed.is_empty() {
            self.renumber();
            log::debug!("Deleted {} markers, {} remain", removed.len(), self.markers.len());
        }
        removed
    }

    /// Remove a single marker by ID.
    pub fn remove(&mut self, id: MarkerId) -> Option<Marker> {
        let index = self.index_of(id)?;
        let marker = self.markers.remove(index);
        self.renumber();
        Some(marker)
    }

    /// Remove all markers.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    fn renumber(&mut self) {
        for (number, marker) in (1u32..).zip(self.markers.iter_mut()) {
            marker.set_number(number);
        }
    }

    /// Topmost marker whose bounding box contains `point`.
    ///
    /// Topmost means last in sequence, i.e. the most recently added marker.
    pub fn hit_test(&self, point: Point) -> Option<MarkerId> {
        self.markers
            .iter()
            .rev()
            .find(|m| m.bounding_box().contains(point))
            .map(Marker::id)
    }

    fn index_of(&self, id: MarkerId) -> Option<usize> {
        self.markers.iter().position(|m| m.id() == id)
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id() == id)
    }

    fn get_mut(&mut self, id: MarkerId) -> EditResult<&mut Marker> {
        self.markers
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(EditError::MarkerNotFound(id))
    }

    /// Markers in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker numbers in display order.
    pub fn numbers(&self) -> Vec<u32> {
        self.markers.iter().map(Marker::number).collect()
    }

    // --- Selection ---

    pub fn select(&mut self, id: MarkerId) -> EditResult<()> {
        self.get_mut(id)?.selected = true;
        Ok(())
    }

    /// Select `id` and deselect everything else.
    pub fn select_only(&mut self, id: MarkerId) -> EditResult<()> {
        self.get_mut(id)?;
        for marker in &mut self.markers {
            marker.selected = marker.id() == id;
        }
        Ok(())
    }

    pub fn toggle_selected(&mut self, id: MarkerId) -> EditResult<bool> {
        let marker = self.get_mut(id)?;
        marker.selected = !marker.selected;
        Ok(marker.selected)
    }

    pub fn deselect(&mut self, id: MarkerId) -> EditResult<()> {
        self.get_mut(id)?.selected = false;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for marker in &mut self.markers {
            marker.selected = false;
        }
    }

    pub fn select_all(&mut self) {
        for marker in &mut self.markers {
            marker.selected = true;
        }
    }

    pub fn selected_ids(&self) -> Vec<MarkerId> {
        self.markers
            .iter()
            .filter(|m| m.selected)
            .map(Marker::id)
            .collect()
    }

    /// Drag every selected marker by `delta`.
    pub fn translate_selected(&mut self, delta: Vec2) {
        for marker in self.markers.iter_mut().filter(|m| m.selected) {
            marker.translate(delta);
        }
    }

    // --- Resize ---

    /// Start a resize on `id` if `point` is on one of its grips.
    pub fn begin_resize(&mut self, id: MarkerId, point: Point) -> EditResult<Option<Grip>> {
        let marker = self.get_mut(id)?;
        Ok(marker.begin_resize(point).map(|session| session.grip()))
    }

    /// Feed a pointer position to the resize in progress on `id`.
    pub fn update_resize(&mut self, id: MarkerId, point: Point) -> EditResult<Rect> {
        let marker = self.get_mut(id)?;
        let mut session = marker.resume_resize().ok_or(EditError::NoActiveResize(id))?;
        Ok(session.update(point))
    }

    pub fn end_resize(&mut self, id: MarkerId) -> EditResult<Rect> {
        Ok(self.get_mut(id)?.end_resize())
    }

    pub fn cancel_resize(&mut self, id: MarkerId) -> EditResult<Rect> {
        Ok(self.get_mut(id)?.cancel_resize())
    }

    /// Marker with a resize in progress, if any.
    pub fn resizing(&self) -> Option<MarkerId> {
        self.markers.iter().find(|m| m.is_resizing()).map(Marker::id)
    }

    // --- Persistence ---

    /// Enumerate markers in persisted form, in display order.
    pub fn to_records(&self) -> Vec<MarkerRecord> {
        self.markers.iter().map(MarkerRecord::from).collect()
    }

    /// Rebuild a collection from persisted records.
    ///
    /// Record order is kept; stored numbers are replaced with `1..=len` so
    /// the numbering invariant holds even for hand-edited input.
    pub fn from_records(records: &[MarkerRecord]) -> Self {
        let mut markers = Vec::with_capacity(records.len());
        for record in records {
            if !record.is_valid() {
                log::warn!("Skipping invalid marker record: {:?}", record);
                continue;
            }
            markers.push(Marker::with_kind(record.rect(), record.number, record.kind));
        }
        let mut collection = Self { markers };
        let stored: Vec<u32> = collection.numbers();
        collection.renumber();
        if stored != collection.numbers() {
            log::warn!("Marker numbers {:?} were not contiguous; renumbered", stored);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_of(n: usize) -> (MarkerCollection, Vec<MarkerId>) {
        let mut collection = MarkerCollection::new();
        let ids = (0..n)
            .map(|i| {
                collection.add_marker(Point::new(i as f64 * 100.0, 0.0), Size::new(40.0, 40.0))
            })
            .collect();
        (collection, ids)
    }

    fn assert_dense(collection: &MarkerCollection) {
        let expected: Vec<u32> = (1..=collection.len() as u32).collect();
        assert_eq!(collection.numbers(), expected);
    }

    #[test]
    fn test_add_numbers_sequentially() {
        let (collection, _) = collection_of(3);
        assert_eq!(collection.numbers(), vec![1, 2, 3]);
    }

    #[test]
    fn test_delete_two_and_four_of_five() {
        let (mut collection, ids) = collection_of(5);
        collection.select(ids[1]).unwrap();
        collection.select(ids[3]).unwrap();

        let removed = collection.delete_selected();
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].number(), 2);
        assert_eq!(removed[1].number(), 4);

        let remaining: Vec<MarkerId> = collection.iter().map(Marker::id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[4]]);
        assert_eq!(collection.numbers(), vec![1, 2, 3]);
    }

    #[test]
    fn test_numbering_invariant_over_mixed_ops() {
        let mut collection = MarkerCollection::new();
        for step in 0..20usize {
            if step % 3 == 2 {
                let ids: Vec<_> = collection.iter().map(Marker::id).collect();
                for (i, id) in ids.iter().enumerate() {
                    if (i + step) % 2 == 0 {
                        collection.select(*id).unwrap();
                    }
                }
                collection.delete_selected();
            } else {
                collection.add_marker(Point::new(step as f64, 0.0), Size::new(10.0, 10.0));
            }
            assert_dense(&collection);
        }
    }

    #[test]
    fn test_delete_nothing_selected() {
        let (mut collection, _) = collection_of(3);
        assert!(collection.delete_selected().is_empty());
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_remove_by_id() {
        let (mut collection, ids) = collection_of(3);
        let removed = collection.remove(ids[0]).unwrap();
        assert_eq!(removed.id(), ids[0]);
        assert_dense(&collection);
        assert!(collection.remove(ids[0]).is_none());
    }

    #[test]
    fn test_hit_test_topmost() {
        let mut collection = MarkerCollection::new();
        let bottom = collection.add_marker(Point::new(0.0, 0.0), Size::new(40.0, 40.0));
        let top = collection.add_marker(Point::new(20.0, 20.0), Size::new(40.0, 40.0));

        assert_eq!(collection.hit_test(Point::new(30.0, 30.0)), Some(top));
        assert_eq!(collection.hit_test(Point::new(5.0, 5.0)), Some(bottom));
        // Inside the grip margin but outside the rect still hits.
        assert_eq!(collection.hit_test(Point::new(-2.0, -2.0)), Some(bottom));
        assert_eq!(collection.hit_test(Point::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_selection_ops() {
        let (mut collection, ids) = collection_of(3);
        collection.select(ids[0]).unwrap();
        collection.select(ids[1]).unwrap();
        collection.select_only(ids[2]).unwrap();
        assert_eq!(collection.selected_ids(), vec![ids[2]]);

        assert!(!collection.toggle_selected(ids[2]).unwrap());
        collection.select_all();
        assert_eq!(collection.selected_ids().len(), 3);
        collection.deselect(ids[1]).unwrap();
        assert_eq!(collection.selected_ids(), vec![ids[0], ids[2]]);
        collection.clear_selection();
        assert!(collection.selected_ids().is_empty());
    }

    #[test]
    fn test_unknown_id() {
        let (mut collection, _) = collection_of(1);
        let stranger = uuid::Uuid::new_v4();
        assert_eq!(collection.select(stranger), Err(EditError::MarkerNotFound(stranger)));
    }

    #[test]
    fn test_translate_selected() {
        let (mut collection, ids) = collection_of(2);
        collection.select(ids[1]).unwrap();
        collection.translate_selected(Vec2::new(10.0, 5.0));
        assert_eq!(collection.get(ids[0]).unwrap().rect().origin(), Point::new(0.0, 0.0));
        assert_eq!(collection.get(ids[1]).unwrap().rect().origin(), Point::new(110.0, 5.0));
    }

    #[test]
    fn test_resize_passthrough() {
        let (mut collection, ids) = collection_of(1);
        let id = ids[0];
        // SE grip of a 40x40 marker at the origin: bounding box -4..44.
        let press = Point::new(40.0, 40.0);

        assert_eq!(collection.update_resize(id, press), Err(EditError::NoActiveResize(id)));
        assert_eq!(collection.begin_resize(id, press).unwrap(), Some(Grip::SE));
        assert_eq!(collection.resizing(), Some(id));

        let rect = collection.update_resize(id, Point::new(50.0, 45.0)).unwrap();
        assert_eq!(rect, Rect::new(0.0, 0.0, 50.0, 45.0));
        collection.end_resize(id).unwrap();
        assert_eq!(collection.resizing(), None);
        assert_eq!(collection.update_resize(id, press), Err(EditError::NoActiveResize(id)));
    }

    #[test]
    fn test_begin_resize_miss() {
        let (mut collection, ids) = collection_of(1);
        assert_eq!(collection.begin_resize(ids[0], Point::new(20.0, 20.0)).unwrap(), None);
        assert_eq!(collection.resizing(), None);
    }

    #[test]
    fn test_records_roundtrip() {
        let (mut collection, ids) = collection_of(3);
        collection.select(ids[1]).unwrap();
        collection.delete_selected();

        let records = collection.to_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].x, 200.0);
        assert_eq!(records[1].number, 2);

        let loaded = MarkerCollection::from_records(&records);
        assert_eq!(loaded.to_records(), records);
    }

    #[test]
    fn test_from_records_renumbers() {
        let records = [
            MarkerRecord { x: 0.0, y: 0.0, width: 10.0, height: 10.0, number: 4, kind: MarkerKind::Ellipse },
            MarkerRecord { x: 5.0, y: 5.0, width: 10.0, height: 10.0, number: 9, kind: MarkerKind::Label },
            MarkerRecord { x: 5.0, y: 5.0, width: f64::NAN, height: 10.0, number: 10, kind: MarkerKind::Ellipse },
            MarkerRecord { x: 5.0, y: f64::INFINITY, width: 10.0, height: 10.0, number: 11, kind: MarkerKind::Ellipse },
            MarkerRecord { x: 50.0, y: 50.0, width: -10.0, height: 10.0, number: 12, kind: MarkerKind::Ellipse },
        ];
        let loaded = MarkerCollection::from_records(&records);
        assert_eq!(loaded.numbers(), vec![1, 2, 3]);
        assert_eq!(loaded.iter().nth(1).unwrap().kind, MarkerKind::Label);
        assert_eq!(loaded.iter().nth(2).unwrap().rect(), Rect::new(40.0, 50.0, 50.0, 60.0));
    }

    #[test]
    fn test_zero_width_marker_survives_reload() {
        let (mut collection, ids) = collection_of(2);
        let id = ids[0];
        assert_eq!(collection.begin_resize(id, Point::new(40.0, 20.0)).unwrap(), Some(Grip::E));
        collection.update_resize(id, Point::new(0.0, 20.0)).unwrap();
        let committed = collection.end_resize(id).unwrap();
        assert_eq!(committed, Rect::new(0.0, 0.0, 0.0, 40.0));

        let records = collection.to_records();
        assert_eq!(records[0].width, 0.0);
        let loaded = MarkerCollection::from_records(&records);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.to_records(), records);
        assert_eq!(loaded.iter().next().unwrap().rect(), committed);
    }
}
