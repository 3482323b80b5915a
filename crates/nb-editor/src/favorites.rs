//! Favorites panel: one button per starred entity, each of which pans the
//! canvas to bring that entity into view.

use nb_core::{Board, EntityType, NodeId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteEntry {
    pub id: NodeId,
    pub title: String,
    pub entity_type: EntityType,
}

/// All starred entities. Order is not significant.
pub fn entries(board: &Board) -> Vec<FavoriteEntry> {
    board
        .starred()
        .into_iter()
        .filter_map(|id| board.entity(id))
        .map(|e| FavoriteEntry {
            id: e.id,
            title: e.title.clone(),
            entity_type: e.entity_type(),
        })
        .collect()
}

/// Centre the canvas on a favorite. Unknown or un-starred ids are ignored.
pub fn activate(board: &mut Board, id: NodeId) -> bool {
    if !board.entity(id).is_some_and(|e| e.is_starred) {
        return false;
    }
    board.center_canvas_on(id)
}
