//! Root canvas panning and "bring into view".
//!
//! Node coordinates are collection-relative, so revealing a nested node is a
//! two-level operation: pan inside the nested collections until the node is
//! centred in its topmost collection, then pan the root canvas by that
//! collection's position and the node's own size.

use crate::board::Board;
use crate::events::BoardEvent;
use crate::id::NodeId;

impl Board {
    /// Current pan offset of the root canvas.
    pub fn pan_offset(&self) -> (f32, f32) {
        self.root_entity().map_or((0.0, 0.0), |root| (root.x, root.y))
    }

    pub fn set_pan(&mut self, x: f32, y: f32) {
        if let Some(root) = self.directory.lookup_mut(self.root) {
            root.set_position(x, y);
        }
        self.emit(BoardEvent::CanvasPanned { x, y });
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        let (x, y) = self.pan_offset();
        self.set_pan(x + dx, y + dy);
    }

    /// Pan the root canvas to bring `id` into view.
    ///
    /// The pan is `viewport/2 - size/2 - anchor` on each axis, where `size`
    /// is the target's own size and `anchor` the position of its topmost
    /// collection ancestor (the target itself when it sits on the root
    /// canvas), read before any interior panning. Nested targets are first
    /// centred inside their collections. Returns false for unknown ids.
    pub fn center_canvas_on(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        let Some(target) = self.entity(id) else {
            return false;
        };
        let (width, height) = (target.width, target.height);
        let anchor = self.directory.topmost_collection_ancestor(id).unwrap_or(id);
        let Some((ax, ay)) = self.entity(anchor).map(|a| (a.x, a.y)) else {
            return false;
        };
        let viewport = self.config.viewport;
        let x = viewport.width / 2.0 - width / 2.0 - ax;
        let y = viewport.height / 2.0 - height / 2.0 - ay;

        self.batch(|board| {
            if anchor != id {
                board.center_on_node(id);
            }
            log::debug!("centering canvas on {id} via {anchor}: pan ({x}, {y})");
            board.set_pan(x, y);
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::config::BoardConfig;
    use crate::model::{EntityType, NodeInit};

    #[test]
    fn pan_by_accumulates() {
        let mut board = Board::default();
        board.pan_by(10.0, -4.0);
        board.pan_by(2.5, 1.0);
        assert_eq!(board.pan_offset(), (12.5, -3.0));
        assert_eq!(
            board.root_entity().unwrap().transform().to_string(),
            "translate(12.5px, -3px)"
        );
    }

    #[test]
    fn centers_top_level_node_in_viewport() {
        let mut board = Board::new(BoardConfig::default().with_viewport(1000.0, 800.0));
        let root = board.root();
        let t = board
            .create(
                root,
                NodeInit::new(EntityType::Text).at(2000.0, -300.0).sized(300.0, 200.0),
            )
            .unwrap();

        assert!(board.center_canvas_on(t));
        assert_eq!(board.pan_offset(), (500.0 - 150.0 - 2000.0, 400.0 - 100.0 + 300.0));
    }

    #[test]
    fn nested_target_pans_by_own_size_and_ancestor_position() {
        let mut board = Board::default();
        let root = board.root();
        let c = board
            .create(
                root,
                NodeInit::new(EntityType::Collection).at(100.0, 50.0).sized(600.0, 400.0),
            )
            .unwrap();
        let t = board
            .create(c, NodeInit::new(EntityType::Web).at(5.0, 5.0).sized(200.0, 100.0))
            .unwrap();

        assert!(board.center_canvas_on(t));
        assert_eq!(board.pan_offset(), (400.0 - 100.0 - 100.0, 300.0 - 50.0 - 50.0));
        let anchor = board.entity(c).unwrap();
        assert_eq!((anchor.x, anchor.y), (100.0, 50.0));
    }

    #[test]
    fn unknown_target_leaves_pan_alone() {
        let mut board = Board::default();
        board.pan_by(7.0, 7.0);
        assert!(!board.center_canvas_on(crate::id::NodeId::intern("nonexistent-id")));
        assert_eq!(board.pan_offset(), (7.0, 7.0));
    }
}
