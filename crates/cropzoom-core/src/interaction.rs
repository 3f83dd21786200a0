//! Interaction controller: zoom buttons and drag-to-pan.
//!
//! The controller owns the session's [`EditState`] and translates discrete
//! and continuous input into state transitions. It renders nothing; a UI
//! layer reads [`InteractionController::state`] after each transition.
//!
//! Every operation is infallible and allocation-free so pointer moves can be
//! applied at display refresh rate. Out-of-range zoom requests are clamped.

use crate::geometry::Point;
use crate::{clamp_zoom, EditState, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};

/// Pointer state captured when a drag starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pointer position at drag start (screen coordinates)
    pub start_pointer: Point,
    /// Pan offset at drag start
    pub start_pan: Point,
}

/// Zoom and pan state for one editing session.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: EditState,
    drag: Option<DragSession>,
}

impl InteractionController {
    /// Create a controller at the default state (zoom 1, no pan).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller seeded with a previous selection.
    pub fn with_state(state: EditState) -> Self {
        Self {
            state: state.sanitized(),
            drag: None,
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn zoom_factor(&self) -> f64 {
        self.state.zoom_factor
    }

    pub fn pan_offset(&self) -> Point {
        self.state.pan_offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_session(&self) -> Option<DragSession> {
        self.drag
    }

    pub fn zoom_in(&mut self) {
        self.state.zoom_factor = clamp_zoom((self.state.zoom_factor + ZOOM_STEP).min(ZOOM_MAX));
    }

    pub fn zoom_out(&mut self) {
        self.state.zoom_factor = clamp_zoom((self.state.zoom_factor - ZOOM_STEP).max(ZOOM_MIN));
    }

    /// Set the zoom factor directly, clamping it into range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.state.zoom_factor = clamp_zoom(zoom);
    }

    /// Return to zoom 1 with no pan. Any drag in progress is dropped.
    pub fn reset(&mut self) {
        self.state = EditState::default();
        self.drag = None;
    }

    /// Start a drag at `pointer`. Replaces any drag already in progress.
    pub fn begin_drag(&mut self, pointer: Point) {
        self.drag = Some(DragSession {
            start_pointer: pointer,
            start_pan: self.state.pan_offset,
        });
    }

    /// Move the active drag to `pointer`.
    ///
    /// Returns `true` when a drag is active and the pan was updated; hosts use
    /// this to suppress the platform's default drag and selection behavior.
    /// Non-finite pointer positions are ignored.
    pub fn update_drag(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        if !pointer.is_finite() {
            return true;
        }
        self.state.pan_offset = drag.start_pan + (pointer - drag.start_pointer);
        true
    }

    /// Finish the drag. The pan keeps its last value.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
