//! Collection operations: membership, moves and interior centering.
//!
//! A collection's `nodes` list is the only ownership edge in the tree. Every
//! operation here keeps it and the child's `parent` back-reference in step:
//! a child of the root canvas has `parent == None`, a child of any other
//! collection has `parent == Some(collection)`, and each entity appears in
//! exactly one `nodes` list exactly once.

use crate::board::Board;
use crate::events::BoardEvent;
use crate::id::NodeId;
use crate::model::Entity;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Why a move was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The entity to move is not registered.
    UnknownNode(NodeId),
    /// The destination is not registered.
    UnknownParent(NodeId),
    /// The destination exists but cannot hold children.
    NotACollection(NodeId),
    /// The root canvas has no owner and cannot be moved.
    RootIsFixed,
    /// Entity dropped onto itself.
    SelfMove(NodeId),
    /// Entity already lives in the destination.
    AlreadyInParent { node: NodeId, parent: NodeId },
    /// The destination is inside the collection being moved.
    WouldCreateCycle { node: NodeId, parent: NodeId },
}

impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "entity not found: {id}"),
            Self::UnknownParent(id) => write!(f, "destination not found: {id}"),
            Self::NotACollection(id) => write!(f, "destination is not a collection: {id}"),
            Self::RootIsFixed => write!(f, "the root canvas cannot be moved"),
            Self::SelfMove(id) => write!(f, "cannot move {id} into itself"),
            Self::AlreadyInParent { node, parent } => {
                write!(f, "{node} already belongs to {parent}")
            }
            Self::WouldCreateCycle { node, parent } => write!(
                f,
                "move would create cycle: {node} under its own descendant {parent}"
            ),
        }
    }
}

impl Error for MoveError {}

impl Board {
    /// Register each entity (a no-op for ids already known) and append it to
    /// `collection` unless it is already there.
    ///
    /// Newly registered entities arrive detached: their `parent` is reset and
    /// a collection payload starts with no children, since membership is only
    /// ever created through this method. An entity owned by a different
    /// collection is detached from it first. Entities whose addition would
    /// nest a collection inside itself are skipped. Returns the ids that were
    /// actually appended.
    pub fn add_nodes(
        &mut self,
        collection: NodeId,
        entities: impl IntoIterator<Item = Entity>,
    ) -> Vec<NodeId> {
        if !self.entity(collection).is_some_and(Entity::is_collection) {
            log::debug!("add_nodes: {collection} is not a collection");
            return Vec::new();
        }
        self.batch(|board| {
            let mut added = Vec::new();
            for entity in entities {
                let id = board.register_detached(entity);
                if !board.can_attach(collection, id) {
                    continue;
                }
                if let Some(owner) = board.owner_of(id) {
                    board.remove_node(owner, id);
                }
                board.link(collection, id);
                board.emit(BoardEvent::Added { id, collection });
                added.push(id);
            }
            added
        })
    }

    /// Detach `id` from `collection`'s nodes and clear its parent.
    ///
    /// Children and connections are left alone; see [`Board::delete`].
    pub fn remove_node(&mut self, collection: NodeId, id: NodeId) -> bool {
        if !self.unlink(collection, id) {
            return false;
        }
        self.emit(BoardEvent::Removed { id, collection });
        true
    }

    /// Move `id` into `new_parent` (`None` = the root canvas), ignoring
    /// refused moves.
    pub fn move_node(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if let Err(err) = self.try_move_node(id, new_parent) {
            match err {
                MoveError::WouldCreateCycle { .. } => log::warn!("move refused: {err}"),
                _ => log::debug!("move ignored: {err}"),
            }
        }
    }

    /// Move `id` into `new_parent` (`None` = the root canvas).
    ///
    /// The detach and attach are delivered as a single `Moved` event. When
    /// the destination is a collection other than the root canvas the entity
    /// is re-centred inside it; moves to the root keep their coordinates.
    pub fn try_move_node(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), MoveError> {
        if new_parent == Some(id) {
            return Err(MoveError::SelfMove(id));
        }
        if id == self.root {
            return Err(MoveError::RootIsFixed);
        }
        let dest = new_parent.unwrap_or(self.root);
        let entity = self.entity(id).ok_or(MoveError::UnknownNode(id))?;
        let dest_entity = self.entity(dest).ok_or(MoveError::UnknownParent(dest))?;
        if !dest_entity.is_collection() {
            return Err(MoveError::NotACollection(dest));
        }
        if dest_entity.children().contains(&id) {
            return Err(MoveError::AlreadyInParent {
                node: id,
                parent: dest,
            });
        }
        if self.directory.is_ancestor_of(id, dest) {
            return Err(MoveError::WouldCreateCycle {
                node: id,
                parent: dest,
            });
        }
        let recenter = (dest != self.root).then(|| entity.centered_in(dest_entity));
        let from = self.owner_of(id);

        self.batch(|board| {
            if let Some(from) = from {
                board.unlink(from, id);
            }
            board.link(dest, id);
            board.emit(BoardEvent::Moved { id, from, to: dest });
            if let Some((x, y)) = recenter {
                board.set_position(id, x, y);
            }
        });
        log::debug!("moved {id} into {dest}");
        Ok(())
    }

    /// Shift every child of `collection` by `(dx, dy)`, panning its interior
    /// while leaving the collection itself in place.
    pub fn pan_interior(&mut self, collection: NodeId, dx: f32, dy: f32) {
        let children = self.children(collection).to_vec();
        if children.is_empty() {
            return;
        }
        for child in children {
            if let Some(e) = self.directory.lookup_mut(child) {
                e.translate(dx, dy);
            }
        }
        self.emit(BoardEvent::InteriorPanned { collection, dx, dy });
    }

    /// Pan every collection on the path to `id` so the target sits at the
    /// centre of its immediate parent, and each enclosing collection at the
    /// centre of its own parent.
    ///
    /// Walks the ancestor chain outermost first. Returns false for unknown ids.
    pub fn center_on_node(&mut self, id: NodeId) -> bool {
        let chain = self.directory.ancestor_chain(id);
        if chain.is_empty() {
            return false;
        }
        self.batch(|board| {
            for pair in chain.windows(2) {
                let (parent, node) = (pair[0], pair[1]);
                let (Some(p), Some(n)) = (board.entity(parent), board.entity(node)) else {
                    continue;
                };
                let (cx, cy) = n.center();
                let dx = p.width / 2.0 - cx;
                let dy = p.height / 2.0 - cy;
                board.pan_interior(parent, dx, dy);
            }
            board.emit(BoardEvent::Centered { id });
        });
        true
    }

    // ─── Raw membership edits (no events) ────────────────────────────────

    fn register_detached(&mut self, mut entity: Entity) -> NodeId {
        let id = entity.id;
        if self.directory.contains(id) {
            return id;
        }
        entity.parent = None;
        if let Some(nodes) = entity.children_mut()
            && !nodes.is_empty()
        {
            log::debug!("add_nodes: dropping {} preset children of {id}", nodes.len());
            nodes.clear();
        }
        self.directory.register(entity)
    }

    fn can_attach(&self, collection: NodeId, id: NodeId) -> bool {
        if id == collection || id == self.root {
            return false;
        }
        if self.children(collection).contains(&id) {
            return false;
        }
        if self.directory.is_ancestor_of(id, collection) {
            log::warn!("add_nodes: {id} contains {collection}; refusing cycle");
            return false;
        }
        true
    }

    /// Append `id` to `collection` and point its parent back.
    pub(crate) fn link(&mut self, collection: NodeId, id: NodeId) {
        let parent = (collection != self.root).then_some(collection);
        if let Some(nodes) = self
            .directory
            .lookup_mut(collection)
            .and_then(Entity::children_mut)
        {
            nodes.push(id);
        }
        if let Some(e) = self.directory.lookup_mut(id) {
            e.parent = parent;
        }
    }

    /// Remove `id` from `collection` and clear its parent.
    pub(crate) fn unlink(&mut self, collection: NodeId, id: NodeId) -> bool {
        let Some(nodes) = self
            .directory
            .lookup_mut(collection)
            .and_then(Entity::children_mut)
        else {
            return false;
        };
        let Some(pos) = nodes.iter().position(|n| *n == id) else {
            return false;
        };
        nodes.remove(pos);
        if let Some(e) = self.directory.lookup_mut(id) {
            e.parent = None;
        }
        true
    }
}
