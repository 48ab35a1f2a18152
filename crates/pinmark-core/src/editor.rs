//! Event-driven editors for markers and curves.
//!
//! An editor owns its model and turns host input into model operations.
//! Each handled event reports whether the host should redraw and which
//! cursor to show.

use crate::collection::MarkerCollection;
use crate::config::EditorConfig;
use crate::curve::CurveModel;
use crate::grip::CursorKind;
use crate::input::{InputEvent, InputState, KeyEvent, MouseButton, PointerEvent};
use crate::marker::MarkerId;
use crate::render::{DrawCommand, curve_scene, marker_scene};
use kurbo::{Point, Size, Vec2};
use std::time::Instant;

/// Result of handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorResponse {
    pub redraw: bool,
    pub cursor: CursorKind,
}

impl EditorResponse {
    fn redraw(cursor: CursorKind) -> Self {
        Self { redraw: true, cursor }
    }

    fn idle(cursor: CursorKind) -> Self {
        Self { redraw: false, cursor }
    }
}

/// Shared editor interface so hosts can drive either editor.
pub trait Editor {
    /// Handle an event that happened at `now`.
    fn handle_event_at(&mut self, event: &InputEvent, now: Instant) -> EditorResponse;

    /// Current scene for the host to paint.
    fn scene(&self) -> Vec<DrawCommand>;

    /// Handle an event that happened just now.
    fn handle_event(&mut self, event: &InputEvent) -> EditorResponse {
        self.handle_event_at(event, Instant::now())
    }
}

/// What the left button is currently doing in the marker editor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum MarkerGesture {
    #[default]
    Idle,
    /// Dragging the selection; `last` is the previous pointer position.
    Moving { last: Point },
    /// Dragging a grip of one marker.
    Resizing(MarkerId),
}

/// Places, selects, moves, resizes and deletes markers.
#[derive(Debug, Clone)]
pub struct MarkerEditor {
    markers: MarkerCollection,
    config: EditorConfig,
    input: InputState,
    gesture: MarkerGesture,
}

impl MarkerEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_markers(MarkerCollection::new(), config)
    }

    pub fn with_markers(markers: MarkerCollection, config: EditorConfig) -> Self {
        Self {
            markers,
            input: config.input_state(),
            config,
            gesture: MarkerGesture::Idle,
        }
    }

    pub fn markers(&self) -> &MarkerCollection {
        &self.markers
    }

    /// Replace the markers, abandoning any gesture in progress.
    pub fn set_markers(&mut self, markers: MarkerCollection) {
        self.markers = markers;
        self.gesture = MarkerGesture::Idle;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Add a marker of the configured size centered on `center`.
    pub fn add_marker_at(&mut self, center: Point) -> MarkerId {
        let side = self.config.marker_size;
        let origin = center - Vec2::new(side / 2.0, side / 2.0);
        self.markers
            .add_marker_with_kind(origin, Size::new(side, side), self.config.default_kind)
    }

    fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> EditorResponse {
        self.input.handle_pointer_event_at(event, now);
        match event {
            PointerEvent::Down { position, button: MouseButton::Right } => {
                self.add_marker_at(position);
                EditorResponse::redraw(CursorKind::Arrow)
            }
            PointerEvent::Down { position, button: MouseButton::Left } => self.press(position),
            PointerEvent::Down { .. } => EditorResponse::default(),
            PointerEvent::Move { position } => self.drag(position),
            PointerEvent::Up { position, button: MouseButton::Left } => self.release(position),
            PointerEvent::Up { .. } => EditorResponse::default(),
        }
    }

    fn press(&mut self, position: Point) -> EditorResponse {
        let Some(id) = self.markers.hit_test(position) else {
            let had_selection = !self.markers.selected_ids().is_empty();
            self.markers.clear_selection();
            self.gesture = MarkerGesture::Idle;
            return EditorResponse { redraw: had_selection, cursor: CursorKind::Arrow };
        };

        let selected = self.markers.get(id).is_some_and(|m| m.selected);
        if selected && !self.input.modifiers.shift {
            if let Ok(Some(grip)) = self.markers.begin_resize(id, position) {
                self.gesture = MarkerGesture::Resizing(id);
                return EditorResponse::redraw(grip.cursor());
            }
        }

        let result = if self.input.modifiers.shift {
            self.markers.toggle_selected(id)
        } else if selected {
            Ok(true)
        } else {
            self.markers.select_only(id).map(|()| true)
        };
        // A shift-press that deselects the marker only toggles; it never drags.
        self.gesture = match result {
            Ok(true) => MarkerGesture::Moving { last: position },
            Ok(false) => MarkerGesture::Idle,
            Err(e) => {
                log::warn!("Press on marker failed: {}", e);
                MarkerGesture::Idle
            }
        };
        EditorResponse::redraw(CursorKind::Arrow)
    }

    fn drag(&mut self, position: Point) -> EditorResponse {
        match self.gesture {
            MarkerGesture::Resizing(id) => match self.markers.update_resize(id, position) {
                Ok(_) => {
                    let cursor = self
                        .markers
                        .get(id)
                        .and_then(|m| m.active_grip())
                        .map(|g| g.cursor())
                        .unwrap_or_default();
                    EditorResponse::redraw(cursor)
                }
                Err(e) => {
                    log::warn!("Resize update dropped: {}", e);
                    self.gesture = MarkerGesture::Idle;
                    EditorResponse::default()
                }
            },
            MarkerGesture::Moving { last } => {
                self.markers.translate_selected(position - last);
                self.gesture = MarkerGesture::Moving { last: position };
                EditorResponse::redraw(CursorKind::Arrow)
            }
            MarkerGesture::Idle => EditorResponse::idle(self.hover_cursor(position)),
        }
    }

    fn release(&mut self, position: Point) -> EditorResponse {
        let response = match self.gesture {
            MarkerGesture::Resizing(id) => match self.markers.end_resize(id) {
                Ok(_) => EditorResponse::redraw(self.hover_cursor(position)),
                Err(e) => {
                    log::warn!("Resize commit failed: {}", e);
                    EditorResponse::default()
                }
            },
            MarkerGesture::Moving { .. } => EditorResponse::idle(self.hover_cursor(position)),
            MarkerGesture::Idle => EditorResponse::default(),
        };
        self.gesture = MarkerGesture::Idle;
        response
    }

    /// Cursor for the topmost marker under `position`.
    fn hover_cursor(&self, position: Point) -> CursorKind {
        self.markers
            .hit_test(position)
            .and_then(|id| self.markers.get(id))
            .map(|m| m.hover_cursor(position))
            .unwrap_or_default()
    }

    fn handle_key(&mut self, event: KeyEvent) -> EditorResponse {
        self.input.handle_key_event(event.clone());
        let KeyEvent::Pressed(key) = event else {
            return EditorResponse::default();
        };
        let modifiers = self.input.modifiers;
        match key.as_str() {
            "Delete" | "Backspace" => {
                self.cancel_gesture();
                let removed = self.markers.delete_selected();
                EditorResponse { redraw: !removed.is_empty(), cursor: CursorKind::Arrow }
            }
            "Escape" => {
                let cancelled = self.cancel_gesture();
                EditorResponse { redraw: cancelled, cursor: CursorKind::Arrow }
            }
            "a" | "A" if modifiers.ctrl || modifiers.meta => {
                self.markers.select_all();
                EditorResponse::redraw(CursorKind::Arrow)
            }
            _ => EditorResponse::default(),
        }
    }

    /// Abort a resize in progress. Returns whether one was cancelled.
    fn cancel_gesture(&mut self) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        let MarkerGesture::Resizing(id) = gesture else {
            return false;
        };
        match self.markers.cancel_resize(id) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Resize cancel failed: {}", e);
                false
            }
        }
    }
}

impl Editor for MarkerEditor {
    fn handle_event_at(&mut self, event: &InputEvent, now: Instant) -> EditorResponse {
        self.input.begin_frame();
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(*pointer, now),
            InputEvent::Key(key) => self.handle_key(key.clone()),
            InputEvent::Modifiers(modifiers) => {
                self.input.set_modifiers(*modifiers);
                EditorResponse::default()
            }
        }
    }

    fn scene(&self) -> Vec<DrawCommand> {
        marker_scene(&self.markers, &self.config)
    }
}

/// Adds, drags and removes curve control points.
#[derive(Debug, Clone)]
pub struct CurveEditor {
    curve: CurveModel,
    config: EditorConfig,
    input: InputState,
    /// Index of the control point being dragged.
    dragging: Option<usize>,
}

impl CurveEditor {
    pub fn new(config: EditorConfig) -> Self {
        let curve = CurveModel::with_precision(config.default_precision);
        Self::with_curve(curve, config)
    }

    pub fn with_curve(curve: CurveModel, config: EditorConfig) -> Self {
        Self {
            curve,
            input: config.input_state(),
            config,
            dragging: None,
        }
    }

    pub fn curve(&self) -> &CurveModel {
        &self.curve
    }

    /// Mutable access for programmatic edits. Ends any drag in progress.
    pub fn curve_mut(&mut self) -> &mut CurveModel {
        self.dragging = None;
        &mut self.curve
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    fn hit(&self, position: Point) -> Option<usize> {
        self.curve
            .hit_test_point(position, self.config.control_point_radius)
    }

    fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> EditorResponse {
        self.input.handle_pointer_event_at(event, now);
        match event {
            PointerEvent::Down { position, button: MouseButton::Left } => {
                if let Some(index) = self.hit(position) {
                    self.dragging = Some(index);
                    return EditorResponse::redraw(CursorKind::Arrow);
                }
                if self.input.is_double_click() {
                    let index = self.curve.push_point(position);
                    log::debug!("Added control point {} at {:?}", index + 1, position);
                    return EditorResponse::redraw(CursorKind::Arrow);
                }
                EditorResponse::default()
            }
            PointerEvent::Down { position, button: MouseButton::Right } => {
                let removed = self
                    .curve
                    .remove_point_near(position, self.config.control_point_radius);
                if let Some((index, _)) = removed {
                    log::debug!("Removed control point {}", index + 1);
                    self.dragging = None;
                }
                EditorResponse { redraw: removed.is_some(), cursor: CursorKind::Arrow }
            }
            PointerEvent::Down { .. } => EditorResponse::default(),
            PointerEvent::Move { position } => {
                let Some(index) = self.dragging else {
                    return EditorResponse::default();
                };
                match self.curve.move_point(index, position) {
                    Ok(()) => EditorResponse::redraw(CursorKind::Arrow),
                    Err(e) => {
                        log::warn!("Control point drag dropped: {}", e);
                        self.dragging = None;
                        EditorResponse::default()
                    }
                }
            }
            PointerEvent::Up { button: MouseButton::Left, .. } => {
                let was_dragging = self.dragging.take().is_some();
                EditorResponse { redraw: was_dragging, cursor: CursorKind::Arrow }
            }
            PointerEvent::Up { .. } => EditorResponse::default(),
        }
    }
}

impl Editor for CurveEditor {
    fn handle_event_at(&mut self, event: &InputEvent, now: Instant) -> EditorResponse {
        self.input.begin_frame();
        match event {
            InputEvent::Pointer(pointer) => self.handle_pointer(*pointer, now),
            InputEvent::Key(key) => {
                self.input.handle_key_event(key.clone());
                EditorResponse::default()
            }
            InputEvent::Modifiers(modifiers) => {
                self.input.set_modifiers(*modifiers);
                EditorResponse::default()
            }
        }
    }

    fn scene(&self) -> Vec<DrawCommand> {
        curve_scene(&self.curve, &self.config)
    }
}
