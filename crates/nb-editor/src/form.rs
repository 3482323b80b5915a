//! Node creation form.
//!
//! Holds the form's field state while it is open and turns a submission
//! into a new entity in the target collection. Which inputs are shown
//! depends on the selected type: Text asks for text, Video/Web/Image ask
//! for a URL, every type asks for a title.

use nb_core::{Board, EntityType, NodeId, NodeInit};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeForm {
    pub entity_type: EntityType,
    pub title: String,
    pub text: String,
    pub url: String,
}

impl NodeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the form for `collection`.
    pub fn open(&mut self, board: &mut Board, collection: NodeId) -> bool {
        board.set_modal_open(collection, true)
    }

    /// Hide the form without creating anything. Field contents are kept.
    pub fn close(&mut self, board: &mut Board, collection: NodeId) {
        board.set_modal_open(collection, false);
    }

    /// Select a type by selector index. Out-of-range indices are ignored.
    pub fn select_type(&mut self, index: usize) {
        if let Some(t) = EntityType::from_index(index) {
            self.entity_type = t;
        }
    }

    pub fn shows_text_field(&self) -> bool {
        self.entity_type == EntityType::Text
    }

    pub fn shows_url_field(&self) -> bool {
        matches!(
            self.entity_type,
            EntityType::Video | EntityType::Web | EntityType::Image
        )
    }

    /// Create the entity, add it to `collection`, close the form and clear
    /// the fields. Returns the new id, or `None` if `collection` cannot
    /// hold children.
    pub fn submit(&mut self, board: &mut Board, collection: NodeId) -> Option<NodeId> {
        let init = NodeInit::new(self.entity_type)
            .title(std::mem::take(&mut self.title))
            .text(std::mem::take(&mut self.text))
            .url(std::mem::take(&mut self.url));
        let id = board.batch(|board| {
            let id = board.create(collection, init);
            board.set_modal_open(collection, false);
            id
        });
        match id {
            Some(id) => log::debug!("form created {id} in {collection}"),
            None => log::debug!("form submit ignored: {collection} is not a collection"),
        }
        id
    }
}
