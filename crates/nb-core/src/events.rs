//! Change notifications for the rendering layer.
//!
//! Observers subscribe to the board and receive a [`BoardEvent`] after each
//! completed mutation. Compound operations run inside a batch: events are
//! queued while the batch is open and delivered in order when the outermost
//! batch closes, so no observer ever sees a half-applied move.

use crate::id::NodeId;
use serde::Serialize;

/// A completed mutation of the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BoardEvent {
    /// Entity attached to a collection.
    Added { id: NodeId, collection: NodeId },
    /// Entity detached from a collection (still registered).
    Removed { id: NodeId, collection: NodeId },
    /// Entity moved between owners. `to` is the root canvas id for moves to root.
    Moved {
        id: NodeId,
        from: Option<NodeId>,
        to: NodeId,
    },
    /// Entity destroyed and unregistered.
    Deleted { id: NodeId },
    /// Position or size changed.
    GeometryChanged { id: NodeId },
    /// Title or payload changed.
    ContentChanged { id: NodeId },
    Connected { a: NodeId, b: NodeId },
    Disconnected { a: NodeId, b: NodeId },
    StarToggled { id: NodeId, starred: bool },
    ConnectionsVisibilityToggled { id: NodeId, visible: bool },
    ModalToggled { collection: NodeId, open: bool },
    /// Every child of a collection was shifted.
    InteriorPanned { collection: NodeId, dx: f32, dy: f32 },
    /// Containing collections were re-centred on `id`.
    Centered { id: NodeId },
    /// The root canvas pan offset changed.
    CanvasPanned { x: f32, y: f32 },
}

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&BoardEvent)>;

/// Subscriber registry with nested batch support.
#[derive(Default)]
pub struct Observers {
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
    /// Batch nesting depth (0 = deliver immediately).
    batch_depth: usize,
    /// Events held back until the outermost batch closes.
    pending: Vec<BoardEvent>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&BoardEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Close a batch. The outermost close flushes everything queued.
    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            let pending = std::mem::take(&mut self.pending);
            for event in &pending {
                self.deliver(event);
            }
        }
    }

    pub fn emit(&mut self, event: BoardEvent) {
        if self.batch_depth > 0 {
            self.pending.push(event);
        } else {
            self.deliver(&event);
        }
    }

    fn deliver(&mut self, event: &BoardEvent) {
        log::trace!("event {event:?} → {} subscriber(s)", self.subscribers.len());
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .field("batch_depth", &self.batch_depth)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(obs: &mut Observers) -> Rc<RefCell<Vec<BoardEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        obs.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    #[test]
    fn delivers_immediately_outside_batch() {
        let mut obs = Observers::new();
        let log = recorder(&mut obs);
        let id = NodeId::intern("evt_a");
        obs.emit(BoardEvent::GeometryChanged { id });
        assert_eq!(log.borrow().as_slice(), &[BoardEvent::GeometryChanged { id }]);
    }

    #[test]
    fn nested_batches_flush_once_at_outermost_end() {
        let mut obs = Observers::new();
        let log = recorder(&mut obs);
        let id = NodeId::intern("evt_b");

        obs.begin_batch();
        obs.emit(BoardEvent::ContentChanged { id });
        obs.begin_batch();
        obs.emit(BoardEvent::GeometryChanged { id });
        obs.end_batch();
        assert!(log.borrow().is_empty());
        obs.end_batch();

        assert_eq!(
            log.borrow().as_slice(),
            &[
                BoardEvent::ContentChanged { id },
                BoardEvent::GeometryChanged { id },
            ]
        );
    }

    #[test]
    fn unmatched_end_batch_is_ignored() {
        let mut obs = Observers::new();
        obs.end_batch();
        assert!(!obs.is_batching());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut obs = Observers::new();
        let log = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&log);
        let sub = obs.subscribe(move |_| *sink.borrow_mut() += 1);
        obs.emit(BoardEvent::Deleted {
            id: NodeId::intern("evt_c"),
        });
        assert!(obs.unsubscribe(sub));
        assert!(!obs.unsubscribe(sub));
        obs.emit(BoardEvent::Deleted {
            id: NodeId::intern("evt_c"),
        });
        assert_eq!(*log.borrow(), 1);
    }
}
