//! Core data model for the node board.
//!
//! Every item on the board is an [`Entity`]: shared geometry and view state
//! plus a typed payload ([`EntityKind`]). Collections own an ordered list of
//! child ids; the child keeps a plain `parent` back-reference with no
//! ownership of its own. Coordinates are relative to the owning collection
//! (or to the root canvas for top-level entities).

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest width/height an entity may be resized to.
pub const MIN_NODE_SIZE: f32 = 50.0;

/// Size given to freshly created entities.
pub const DEFAULT_NODE_SIZE: f32 = 300.0;

// ─── Type discriminator ──────────────────────────────────────────────────

/// The discriminator tag of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntityType {
    #[default]
    Text,
    Video,
    FormattableText,
    Image,
    Web,
    Collection,
}

impl EntityType {
    /// All types, in the order the creation form's selector lists them.
    pub const ALL: [EntityType; 6] = [
        EntityType::Text,
        EntityType::Video,
        EntityType::FormattableText,
        EntityType::Image,
        EntityType::Web,
        EntityType::Collection,
    ];

    /// Map a selector index back to a type.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Prefix used when generating ids for this type.
    pub fn id_prefix(self) -> &'static str {
        match self {
            EntityType::Text => "text",
            EntityType::Video => "video",
            EntityType::FormattableText => "rich_text",
            EntityType::Image => "image",
            EntityType::Web => "web",
            EntityType::Collection => "collection",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityType::Text => "Text",
            EntityType::Video => "Video",
            EntityType::FormattableText => "Formattable Text",
            EntityType::Image => "Image",
            EntityType::Web => "Web",
            EntityType::Collection => "Collection",
        }
    }
}

// ─── Payload ─────────────────────────────────────────────────────────────

/// Per-type payload of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Static text.
    Text { text: String },

    /// Embedded video.
    Video { url: String },

    /// Rich text. The content is opaque markup owned by the editor widget.
    FormattableText { text: String },

    /// Image by URL.
    Image { image_url: String },

    /// Embedded web page.
    Web { url: String },

    /// Container of other entities, in render order.
    Collection { nodes: Vec<NodeId>, is_modal_open: bool },
}

impl EntityKind {
    pub fn empty_collection() -> Self {
        EntityKind::Collection {
            nodes: Vec::new(),
            is_modal_open: false,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKind::Text { .. } => EntityType::Text,
            EntityKind::Video { .. } => EntityType::Video,
            EntityKind::FormattableText { .. } => EntityType::FormattableText,
            EntityKind::Image { .. } => EntityType::Image,
            EntityKind::Web { .. } => EntityType::Web,
            EntityKind::Collection { .. } => EntityType::Collection,
        }
    }
}

// ─── Derived transform ───────────────────────────────────────────────────

/// A translation derived from an entity's position.
///
/// Displays as the CSS-style `translate(Xpx, Ypx)` the renderer consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({}px, {}px)", self.x, self.y)
    }
}

// ─── Entity ──────────────────────────────────────────────────────────────

/// A single item on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Immutable, process-unique identity.
    pub id: NodeId,

    pub kind: EntityKind,

    pub title: String,

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    /// Owning collection. `None` for entities on the root canvas
    /// (and for detached ones).
    pub parent: Option<NodeId>,

    pub is_starred: bool,

    /// View state: whether the connection window is shown.
    pub are_connections_visible: bool,
}

impl Entity {
    /// Create an entity with a freshly generated id.
    pub fn new(kind: EntityKind) -> Self {
        let id = NodeId::with_prefix(kind.entity_type().id_prefix());
        Self::with_id(id, kind)
    }

    /// Create an entity with an explicit id.
    pub fn with_id(id: NodeId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            title: String::new(),
            x: 0.0,
            y: 0.0,
            width: DEFAULT_NODE_SIZE,
            height: DEFAULT_NODE_SIZE,
            parent: None,
            is_starred: false,
            are_connections_visible: false,
        }
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.set_position(x, y);
        self
    }

    #[must_use]
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.set_dimensions(width, height);
        self
    }

    pub fn entity_type(&self) -> EntityType {
        self.kind.entity_type()
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.kind, EntityKind::Collection { .. })
    }

    /// Child ids in render order. Empty for non-collections.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            EntityKind::Collection { nodes, .. } => nodes,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            EntityKind::Collection { nodes, .. } => Some(nodes),
            _ => None,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Resize, never going below [`MIN_NODE_SIZE`] on either axis.
    pub fn set_dimensions(&mut self, width: f32, height: f32) {
        self.width = width.max(MIN_NODE_SIZE);
        self.height = height.max(MIN_NODE_SIZE);
    }

    pub fn toggle_star(&mut self) {
        self.is_starred = !self.is_starred;
    }

    pub fn toggle_connections_visible(&mut self) {
        self.are_connections_visible = !self.are_connections_visible;
    }

    /// Recomputed from the current position on every call.
    pub fn transform(&self) -> Transform {
        Transform {
            x: self.x,
            y: self.y,
        }
    }

    /// Centre point in the owning collection's coordinate space.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Position that centres an entity of this size inside `container`.
    pub fn centered_in(&self, container: &Entity) -> (f32, f32) {
        (
            container.width / 2.0 - self.width / 2.0,
            container.height / 2.0 - self.height / 2.0,
        )
    }

    /// The primary text-ish content of the payload, if any.
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            EntityKind::Text { text } | EntityKind::FormattableText { text } => Some(text),
            EntityKind::Video { url } | EntityKind::Web { url } => Some(url),
            EntityKind::Image { image_url } => Some(image_url),
            EntityKind::Collection { .. } => None,
        }
    }
}

// ─── Factory ─────────────────────────────────────────────────────────────

/// Initializer handed over by the creation form.
///
/// Only the fields relevant to `entity_type` are read: `text` for Text,
/// `url` for Video, Web and Image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeInit {
    pub entity_type: EntityType,
    pub title: String,
    pub text: String,
    pub url: String,
    pub position: Option<(f32, f32)>,
    pub size: Option<(f32, f32)>,
}

impl NodeInit {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Some((x, y));
        self
    }

    #[must_use]
    pub fn sized(mut self, width: f32, height: f32) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Build the entity variant selected by `entity_type`.
    pub fn build(self) -> Entity {
        let kind = match self.entity_type {
            EntityType::Text => EntityKind::Text { text: self.text },
            EntityType::Video => EntityKind::Video { url: self.url },
            // Rich text starts empty; the editor widget fills it in place.
            EntityType::FormattableText => EntityKind::FormattableText {
                text: String::new(),
            },
            EntityType::Image => EntityKind::Image {
                image_url: self.url,
            },
            EntityType::Web => EntityKind::Web { url: self.url },
            EntityType::Collection => EntityKind::empty_collection(),
        };
        let mut entity = Entity::new(kind).titled(self.title);
        if let Some((x, y)) = self.position {
            entity.set_position(x, y);
        }
        if let Some((w, h)) = self.size {
            entity.set_dimensions(w, h);
        }
        entity
    }
}
