//! The board: directory, root canvas, configuration and observers.
//!
//! `Board` is the one object the view layer holds. Reads go through
//! [`Board::entity`] / [`Board::directory`]; every mutation goes through a
//! `Board` method so observers are notified. Anomalous requests (unknown ids,
//! self-connections, duplicate adds) are ignored rather than reported.

use crate::config::BoardConfig;
use crate::directory::Directory;
use crate::events::{BoardEvent, Observers, SubscriptionId};
use crate::id::NodeId;
use crate::model::{Entity, EntityKind, NodeInit};

#[derive(Debug)]
pub struct Board {
    pub(crate) directory: Directory,
    pub(crate) root: NodeId,
    pub(crate) config: BoardConfig,
    pub(crate) observers: Observers,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Board {
    /// Create a board with an empty root canvas.
    pub fn new(config: BoardConfig) -> Self {
        let mut directory = Directory::new();
        let mut root = Entity::with_id(NodeId::root(), EntityKind::empty_collection());
        root.width = config.viewport.width;
        root.height = config.viewport.height;
        let root = directory.register(root);
        Self {
            directory,
            root,
            config,
            observers: Observers::new(),
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The root canvas collection.
    ///
    /// Registered at construction and refused by [`Board::delete`], so this
    /// is `Some` for every board built through [`Board::new`].
    pub fn root_entity(&self) -> Option<&Entity> {
        self.directory.lookup(self.root)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn entity(&self, id: NodeId) -> Option<&Entity> {
        self.directory.lookup(id)
    }

    /// Children of a collection in render order. Empty for anything else.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entity(id).map(Entity::children).unwrap_or(&[])
    }

    pub fn connections(&self, id: NodeId) -> Vec<NodeId> {
        self.directory.connections(id)
    }

    pub fn starred(&self) -> Vec<NodeId> {
        self.directory
            .starred()
            .into_iter()
            .filter(|id| *id != self.root)
            .collect()
    }

    pub fn ancestor_chain(&self, id: NodeId) -> Vec<NodeId> {
        self.directory.ancestor_chain(id)
    }

    /// The collection whose `nodes` currently hold `id`: its parent, the
    /// root canvas for top-level entities, or `None` when detached.
    pub fn owner_of(&self, id: NodeId) -> Option<NodeId> {
        let entity = self.entity(id)?;
        match entity.parent {
            Some(parent) => Some(parent),
            None if self.children(self.root).contains(&id) => Some(self.root),
            None => None,
        }
    }

    // ─── Observers ───────────────────────────────────────────────────────

    pub fn subscribe(&mut self, callback: impl FnMut(&BoardEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Run `f` as one observable step: events raised inside are delivered
    /// together once the outermost batch closes.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.observers.begin_batch();
        let result = f(self);
        self.observers.end_batch();
        result
    }

    pub(crate) fn emit(&mut self, event: BoardEvent) {
        self.observers.emit(event);
    }

    // ─── Entity mutations ────────────────────────────────────────────────

    /// Build an entity from `init` and add it to `collection`.
    pub fn create(&mut self, collection: NodeId, mut init: NodeInit) -> Option<NodeId> {
        if init.size.is_none() {
            init.size = Some((self.config.default_width, self.config.default_height));
        }
        let entity = init.build();
        let id = entity.id;
        let added = self.add_nodes(collection, [entity]);
        added.contains(&id).then_some(id)
    }

    pub fn set_position(&mut self, id: NodeId, x: f32, y: f32) {
        if let Some(e) = self.directory.lookup_mut(id) {
            e.set_position(x, y);
            self.emit(BoardEvent::GeometryChanged { id });
        }
    }

    pub fn translate(&mut self, id: NodeId, dx: f32, dy: f32) {
        if let Some(e) = self.directory.lookup_mut(id) {
            e.translate(dx, dy);
            self.emit(BoardEvent::GeometryChanged { id });
        }
    }

    /// Resize, floored at the configured minimum size.
    pub fn set_dimensions(&mut self, id: NodeId, width: f32, height: f32) {
        let min = self.config.effective_min_size();
        if let Some(e) = self.directory.lookup_mut(id) {
            e.set_dimensions(width.max(min), height.max(min));
            self.emit(BoardEvent::GeometryChanged { id });
        }
    }

    pub fn set_title(&mut self, id: NodeId, title: impl Into<String>) {
        if let Some(e) = self.directory.lookup_mut(id) {
            e.title = title.into();
            self.emit(BoardEvent::ContentChanged { id });
        }
    }

    /// Replace the text of a Text or FormattableText entity.
    pub fn set_text(&mut self, id: NodeId, content: impl Into<String>) -> bool {
        let Some(e) = self.directory.lookup_mut(id) else {
            return false;
        };
        match &mut e.kind {
            EntityKind::Text { text } | EntityKind::FormattableText { text } => {
                *text = content.into();
            }
            _ => return false,
        }
        self.emit(BoardEvent::ContentChanged { id });
        true
    }

    /// Replace the URL of a Video, Web or Image entity.
    pub fn set_url(&mut self, id: NodeId, new_url: impl Into<String>) -> bool {
        let Some(e) = self.directory.lookup_mut(id) else {
            return false;
        };
        match &mut e.kind {
            EntityKind::Video { url } | EntityKind::Web { url } => *url = new_url.into(),
            EntityKind::Image { image_url } => *image_url = new_url.into(),
            _ => return false,
        }
        self.emit(BoardEvent::ContentChanged { id });
        true
    }

    /// Flip the star flag. Returns the new state; the root canvas cannot be starred.
    pub fn toggle_star(&mut self, id: NodeId) -> Option<bool> {
        if id == self.root {
            return None;
        }
        let e = self.directory.lookup_mut(id)?;
        e.toggle_star();
        let starred = e.is_starred;
        self.emit(BoardEvent::StarToggled { id, starred });
        Some(starred)
    }

    pub fn toggle_connections_visible(&mut self, id: NodeId) -> Option<bool> {
        let e = self.directory.lookup_mut(id)?;
        e.toggle_connections_visible();
        let visible = e.are_connections_visible;
        self.emit(BoardEvent::ConnectionsVisibilityToggled { id, visible });
        Some(visible)
    }

    /// Open or close a collection's creation form.
    pub fn set_modal_open(&mut self, collection: NodeId, open: bool) -> bool {
        let Some(e) = self.directory.lookup_mut(collection) else {
            return false;
        };
        let EntityKind::Collection { is_modal_open, .. } = &mut e.kind else {
            return false;
        };
        *is_modal_open = open;
        self.emit(BoardEvent::ModalToggled { collection, open });
        true
    }

    // ─── Connections ─────────────────────────────────────────────────────

    pub fn connect(&mut self, a: NodeId, b: NodeId) -> bool {
        let added = self.directory.connect(a, b);
        if added {
            self.emit(BoardEvent::Connected { a, b });
        }
        added
    }

    pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> bool {
        let removed = self.directory.disconnect(a, b);
        if removed {
            self.emit(BoardEvent::Disconnected { a, b });
        }
        removed
    }

    // ─── Deletion ────────────────────────────────────────────────────────

    /// Destroy an entity: sever its connections, detach it from its owner,
    /// delete a collection's contents, and unregister it.
    ///
    /// The root canvas is never deleted. Returns false for unknown ids.
    pub fn delete(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.directory.contains(id) {
            return false;
        }
        // Subtree in pre-order; deleting in reverse removes children first.
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }

        self.batch(|board| {
            for current in order.into_iter().rev() {
                for other in board.directory.connections(current) {
                    board.disconnect(current, other);
                }
                if let Some(owner) = board.owner_of(current) {
                    board.remove_node(owner, current);
                }
                board.directory.unregister(current);
                log::debug!("deleted {current}");
                board.emit(BoardEvent::Deleted { id: current });
            }
        });
        true
    }
}
