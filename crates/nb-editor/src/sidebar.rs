//! Sidebar hierarchy view model.
//!
//! Flattens the board into indented rows (a collection's children directly
//! under it, one level deeper) and routes sidebar drag-and-drop to
//! [`Board::move_node`]: dropping on a collection row moves the dragged node
//! into that collection, dropping on the sidebar background moves it to the
//! root canvas.

use nb_core::{Board, EntityType, NodeId};
use serde::Serialize;

/// Horizontal indent per hierarchy level, in pixels.
pub const INDENT_PX: f32 = 20.0;

/// Label shown for entities without a title.
pub const UNTITLED: &str = "No Title";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarRow {
    pub id: NodeId,
    pub label: String,
    pub entity_type: EntityType,
    pub depth: usize,
    pub indent: f32,
    pub is_collection: bool,
    pub child_count: usize,
}

/// Every entity reachable from the root canvas, depth-first in render order.
pub fn rows(board: &Board) -> Vec<SidebarRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = board
        .children(board.root())
        .iter()
        .rev()
        .map(|id| (*id, 0))
        .collect();

    while let Some((id, depth)) = stack.pop() {
        let Some(entity) = board.entity(id) else {
            continue;
        };
        let children = entity.children();
        rows.push(SidebarRow {
            id,
            label: if entity.title.is_empty() {
                UNTITLED.to_string()
            } else {
                entity.title.clone()
            },
            entity_type: entity.entity_type(),
            depth,
            indent: INDENT_PX * depth as f32,
            is_collection: entity.is_collection(),
            child_count: children.len(),
        });
        stack.extend(children.iter().rev().map(|c| (*c, depth + 1)));
    }
    rows
}

/// Handle a drop of `dragged` onto `target` (`None` = sidebar background).
///
/// Drops onto non-collection rows are ignored. Returns true if the board
/// changed.
pub fn drop_on(board: &mut Board, dragged: NodeId, target: Option<NodeId>) -> bool {
    if let Some(target) = target
        && !board.entity(target).is_some_and(|e| e.is_collection())
    {
        log::trace!("sidebar: {target} is not a drop target");
        return false;
    }
    board.try_move_node(dragged, target).is_ok()
}
