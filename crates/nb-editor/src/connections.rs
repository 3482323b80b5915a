//! Connection window view model.
//!
//! Each entity can show a side window listing the entities it is connected
//! to. Dragging the window's handle from one entity and dropping it on
//! another entity's window connects the two.

use nb_core::{Board, EntityType, NodeId};
use serde::Serialize;

/// Label shown for connected entities without a title.
pub const UNTITLED: &str = "Untitled Node";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionEntry {
    pub id: NodeId,
    pub label: String,
    pub entity_type: EntityType,
}

/// Background tint of the window, keyed by the owning entity's type.
pub fn window_color(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Text => "#aa6da359",
        EntityType::Video => "#7c709e59",
        EntityType::Image => "#4d729859",
        EntityType::Web => "#be8a6659",
        EntityType::FormattableText => "#aa6f7759",
        EntityType::Collection => "#17161459",
    }
}

/// Whether `id` currently shows its connection window.
pub fn is_open(board: &Board, id: NodeId) -> bool {
    board
        .entity(id)
        .is_some_and(|e| e.are_connections_visible)
}

/// Rows of the connection window of `id`, oldest connection first.
///
/// Empty while the window is hidden or when `id` is unknown.
pub fn entries(board: &Board, id: NodeId) -> Vec<ConnectionEntry> {
    if !is_open(board, id) {
        return Vec::new();
    }
    board
        .connections(id)
        .into_iter()
        .filter_map(|other| board.entity(other))
        .map(|e| ConnectionEntry {
            id: e.id,
            label: if e.title.is_empty() {
                UNTITLED.to_string()
            } else {
                e.title.clone()
            },
            entity_type: e.entity_type(),
        })
        .collect()
}

/// Handle the connect handle of `source` being dropped on the window of
/// `target`. Returns true if a new connection was made.
pub fn drop_connect(board: &mut Board, source: NodeId, target: NodeId) -> bool {
    if source == target {
        log::trace!("connections: {source} dropped on its own window");
        return false;
    }
    board.connect(target, source)
}
