//! Pointer drag state machine.
//!
//! A drag starts on a primary pointer-down over one of the drag affinity
//! areas, applies deltas on every move, and commits on pointer-up:
//!
//! | Target | Move applies |
//! |--------|--------------|
//! | Title bar | translate the entity |
//! | Resize handle | initial size + pointer delta, floored |
//! | Canvas background | pan the root canvas |
//! | Collection interior | shift every child of the collection |
//!
//! Only one target is active at a time. The host installs global move/up
//! listeners for the duration of a drag; starting a new drag always clears
//! the previous pair first so listeners never pile up. There is no cancel
//! gesture: releasing the pointer keeps whatever was applied.

use crate::input::{InputEvent, PointerButton};
use nb_core::{Board, NodeId};

/// The area a drag was started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    TitleBar(NodeId),
    ResizeHandle(NodeId),
    Canvas,
    CollectionInterior(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragTarget),
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    target: DragTarget,
    /// Pointer position at pointer-down.
    origin: (f32, f32),
    /// Pointer position at the previous event.
    last: (f32, f32),
    /// Entity size at pointer-down (resize only).
    initial_size: (f32, f32),
}

/// Number of global listeners a drag installs (move + up).
const LISTENERS_PER_DRAG: usize = 2;

#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
    listeners: usize,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        match self.session {
            Some(s) => DragState::Dragging(s.target),
            None => DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Global move/up listeners currently installed.
    pub fn listener_count(&self) -> usize {
        self.listeners
    }

    /// Feed one input event. `hit` is the drag area under the pointer,
    /// only consulted on pointer-down.
    pub fn handle(
        &mut self,
        board: &mut Board,
        event: &InputEvent,
        hit: Option<DragTarget>,
    ) -> DragState {
        match *event {
            InputEvent::PointerDown { x, y, button } => {
                if button != PointerButton::Primary {
                    log::trace!("drag: ignoring {button:?} button");
                } else if let Some(target) = hit {
                    self.begin(board, target, (x, y));
                }
            }
            InputEvent::PointerMove { x, y } => self.drag_to(board, (x, y)),
            InputEvent::PointerUp { x, y } => {
                self.drag_to(board, (x, y));
                self.end();
            }
        }
        self.state()
    }

    fn begin(&mut self, board: &Board, target: DragTarget, at: (f32, f32)) {
        if let Some(stale) = self.session.take() {
            log::debug!("drag: {:?} superseded by {target:?}", stale.target);
        }
        self.remove_listeners();

        let initial_size = match target {
            DragTarget::TitleBar(id)
            | DragTarget::ResizeHandle(id)
            | DragTarget::CollectionInterior(id) => match board.entity(id) {
                Some(e) => (e.width, e.height),
                None => {
                    log::debug!("drag: {id} is not on the board");
                    return;
                }
            },
            DragTarget::Canvas => (0.0, 0.0),
        };
        self.session = Some(DragSession {
            target,
            origin: at,
            last: at,
            initial_size,
        });
        self.listeners = LISTENERS_PER_DRAG;
    }

    fn drag_to(&mut self, board: &mut Board, at: (f32, f32)) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let dx = at.0 - session.last.0;
        let dy = at.1 - session.last.1;
        session.last = at;
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        log::trace!("drag {:?} by ({dx}, {dy})", session.target);
        match session.target {
            DragTarget::TitleBar(id) => board.translate(id, dx, dy),
            DragTarget::ResizeHandle(id) => {
                let (w, h) = session.initial_size;
                board.set_dimensions(
                    id,
                    w + (at.0 - session.origin.0),
                    h + (at.1 - session.origin.1),
                );
            }
            DragTarget::Canvas => board.pan_by(dx, dy),
            DragTarget::CollectionInterior(id) => board.pan_interior(id, dx, dy),
        }
    }

    fn end(&mut self) {
        self.session = None;
        self.remove_listeners();
    }

    fn remove_listeners(&mut self) {
        self.listeners = 0;
    }
}
