//! Integration tests: tree consistency, connection symmetry and centering.
//!
//! Drives the `Board` through add/remove/move/delete sequences and checks
//! the structural invariants after each step.

use nb_core::*;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn collection(board: &mut Board, parent: NodeId, x: f32, y: f32, w: f32, h: f32) -> NodeId {
    board
        .create(
            parent,
            NodeInit::new(EntityType::Collection)
                .title("group")
                .at(x, y)
                .sized(w, h),
        )
        .expect("collection created")
}

fn text(board: &mut Board, parent: NodeId, x: f32, y: f32, w: f32, h: f32) -> NodeId {
    board
        .create(
            parent,
            NodeInit::new(EntityType::Text)
                .title("note")
                .text("body")
                .at(x, y)
                .sized(w, h),
        )
        .expect("text created")
}

/// Every entity is owned exactly once, and `parent` agrees with ownership.
fn assert_tree_consistent(board: &Board) {
    let root = board.root();
    for id in board.directory().ids() {
        if id == root {
            continue;
        }
        let owners: Vec<NodeId> = board
            .directory()
            .ids()
            .filter(|c| board.children(*c).contains(&id))
            .collect();
        for owner in &owners {
            let count = board.children(*owner).iter().filter(|n| **n == id).count();
            assert_eq!(count, 1, "{id} listed {count} times in {owner}");
        }
        let entity = board.entity(id).unwrap();
        match entity.parent {
            Some(parent) => assert_eq!(owners, vec![parent], "{id} parent mismatch"),
            None => assert!(
                owners.is_empty() || owners == vec![root],
                "{id} has no parent but is owned by {owners:?}"
            ),
        }
    }
}

/// `a ∈ connections(b)` ⇔ `b ∈ connections(a)`, and nobody connects to itself.
fn assert_connections_symmetric(board: &Board) {
    for a in board.directory().ids() {
        for b in board.connections(a) {
            assert_ne!(a, b, "self-connection on {a}");
            assert!(
                board.connections(b).contains(&a),
                "{a} → {b} is not mirrored"
            );
        }
    }
}

// ─── Membership ──────────────────────────────────────────────────────────

#[test]
fn move_to_root_keeps_coordinates() {
    let mut board = Board::default();
    let root = board.root();
    let c1 = collection(&mut board, root, 500.0, 500.0, 800.0, 800.0);
    let t = text(&mut board, c1, 20.0, 20.0, 300.0, 300.0);

    board.move_node(t, None);

    let e = board.entity(t).unwrap();
    assert_eq!(e.parent, None);
    assert!(!board.children(c1).contains(&t));
    assert!(board.children(root).contains(&t));
    assert_eq!((e.x, e.y), (20.0, 20.0));
    assert_tree_consistent(&board);
}

#[test]
fn move_onto_self_changes_nothing() {
    let mut board = Board::default();
    let root = board.root();
    let c = collection(&mut board, root, 0.0, 0.0, 400.0, 400.0);
    let before = board.entity(c).unwrap().clone();

    board.move_node(c, Some(c));

    assert_eq!(board.entity(c).unwrap(), &before);
    assert_eq!(board.children(root), &[c]);
}

#[test]
fn move_into_descendant_is_refused() {
    let mut board = Board::default();
    let root = board.root();
    let a = collection(&mut board, root, 0.0, 0.0, 900.0, 900.0);
    let b = collection(&mut board, a, 0.0, 0.0, 600.0, 600.0);
    let c = collection(&mut board, b, 0.0, 0.0, 300.0, 300.0);

    board.move_node(a, Some(c));

    assert_eq!(board.ancestor_chain(c), vec![a, b, c]);
    assert_eq!(board.owner_of(a), Some(root));
    assert_tree_consistent(&board);
}

#[test]
fn shuffling_keeps_tree_consistent() {
    let mut board = Board::default();
    let root = board.root();
    let a = collection(&mut board, root, 0.0, 0.0, 800.0, 800.0);
    let b = collection(&mut board, root, 900.0, 0.0, 800.0, 800.0);
    let inner = collection(&mut board, a, 10.0, 10.0, 400.0, 400.0);
    let notes: Vec<NodeId> = (0..4)
        .map(|n| text(&mut board, root, n as f32 * 10.0, 0.0, 100.0, 100.0))
        .collect();

    board.move_node(notes[0], Some(a));
    assert_tree_consistent(&board);
    board.move_node(notes[1], Some(inner));
    assert_tree_consistent(&board);
    board.move_node(inner, Some(b));
    assert_tree_consistent(&board);
    board.move_node(notes[0], Some(inner));
    assert_tree_consistent(&board);
    board.remove_node(b, inner);
    assert_tree_consistent(&board);
    board.move_node(inner, None);
    assert_tree_consistent(&board);
    board.move_node(notes[2], Some(b));
    board.move_node(notes[2], Some(b));
    assert_tree_consistent(&board);

    assert_eq!(board.children(inner), &[notes[1], notes[0]]);
    assert_eq!(board.children(b), &[notes[2]]);
    assert_eq!(board.children(root), &[a, b, notes[3], inner]);
}

#[test]
fn add_twice_lists_once() {
    let mut board = Board::default();
    let root = board.root();
    let c = collection(&mut board, root, 0.0, 0.0, 400.0, 400.0);
    let e = NodeInit::new(EntityType::Video).url("https://example.com/v").build();

    board.add_nodes(c, [e.clone()]);
    board.add_nodes(c, [e.clone()]);

    assert_eq!(board.children(c), &[e.id]);
    assert_tree_consistent(&board);
}

// ─── Connections ─────────────────────────────────────────────────────────

#[test]
fn prefilled_collection_payload_cannot_steal_children() {
    let mut board = Board::default();
    let root = board.root();
    let c = collection(&mut board, root, 0.0, 0.0, 400.0, 400.0);
    let t = text(&mut board, c, 10.0, 10.0, 100.0, 100.0);

    let rogue = Entity::new(EntityKind::Collection {
        nodes: vec![t],
        is_modal_open: false,
    });
    let rogue_id = rogue.id;
    assert_eq!(board.add_nodes(root, [rogue]), vec![rogue_id]);

    assert!(board.children(rogue_id).is_empty());
    assert_eq!(board.children(c), &[t]);
    assert_eq!(board.owner_of(t), Some(c));
    assert_tree_consistent(&board);
}

#[test]
fn self_listing_collection_payload_can_be_deleted() {
    let mut board = Board::default();
    let root = board.root();
    let id = NodeId::intern("self_listing_group");
    let rogue = Entity::with_id(
        id,
        EntityKind::Collection {
            nodes: vec![id],
            is_modal_open: false,
        },
    );
    board.add_nodes(root, [rogue]);

    assert!(board.children(id).is_empty());
    assert!(board.delete(id));
    assert!(!board.directory().contains(id));
    assert_tree_consistent(&board);
}

#[test]
fn connect_twice_keeps_single_edge() {
    let mut board = Board::default();
    let root = board.root();
    let a = text(&mut board, root, 0.0, 0.0, 100.0, 100.0);
    let b = text(&mut board, root, 200.0, 0.0, 100.0, 100.0);

    board.connect(a, b);
    assert_eq!(board.connections(a), vec![b]);
    assert_eq!(board.connections(b), vec![a]);

    board.connect(a, b);
    assert_eq!(board.connections(a).len(), 1);
    assert_eq!(board.connections(b).len(), 1);
    assert_connections_symmetric(&board);

    board.disconnect(a, b);
    assert!(board.connections(a).is_empty());
    assert!(board.connections(b).is_empty());
}

#[test]
fn unknown_ids_are_ignored() {
    let mut board = Board::default();
    let root = board.root();
    let b = text(&mut board, root, 0.0, 0.0, 100.0, 100.0);
    let ghost = NodeId::intern("nonexistent-id");

    assert!(board.entity(ghost).is_none());
    assert!(!board.connect(ghost, b));
    assert!(!board.connect(b, b));
    assert!(board.connections(b).is_empty());
}

#[test]
fn deleting_connected_collection_leaves_no_dangling_refs() {
    let mut board = Board::default();
    let root = board.root();
    let c = collection(&mut board, root, 0.0, 0.0, 600.0, 600.0);
    let inside = text(&mut board, c, 0.0, 0.0, 100.0, 100.0);
    let outside = text(&mut board, root, 700.0, 0.0, 100.0, 100.0);
    let other = text(&mut board, root, 900.0, 0.0, 100.0, 100.0);
    board.connect(inside, outside);
    board.connect(c, other);
    board.connect(outside, other);

    assert!(board.delete(c));

    assert!(board.entity(c).is_none());
    assert!(board.entity(inside).is_none());
    assert_eq!(board.connections(outside), vec![other]);
    assert_eq!(board.connections(other), vec![outside]);
    assert_eq!(board.children(root), &[outside, other]);
    assert_connections_symmetric(&board);
    assert_tree_consistent(&board);
}

// ─── Queries ─────────────────────────────────────────────────────────────

#[test]
fn starred_contains_all_and_only_starred() {
    let mut board = Board::default();
    let root = board.root();
    let c = collection(&mut board, root, 0.0, 0.0, 600.0, 600.0);
    let a = text(&mut board, c, 0.0, 0.0, 100.0, 100.0);
    let b = text(&mut board, root, 0.0, 0.0, 100.0, 100.0);

    board.toggle_star(a);
    board.toggle_star(b);
    board.toggle_star(b);
    board.toggle_star(c);

    let mut starred = board.starred();
    starred.sort_by_key(|id| id.as_str().to_string());
    let mut expected = vec![a, c];
    expected.sort_by_key(|id| id.as_str().to_string());
    assert_eq!(starred, expected);
}

#[test]
fn ancestor_chain_excludes_root() {
    let mut board = Board::default();
    let root = board.root();
    let c1 = collection(&mut board, root, 0.0, 0.0, 900.0, 900.0);
    let c2 = collection(&mut board, c1, 0.0, 0.0, 600.0, 600.0);
    let t = text(&mut board, c2, 0.0, 0.0, 100.0, 100.0);
    let loose = text(&mut board, root, 0.0, 0.0, 100.0, 100.0);

    assert_eq!(board.ancestor_chain(t), vec![c1, c2, t]);
    assert_eq!(board.ancestor_chain(loose), vec![loose]);
    assert_eq!(board.directory().topmost_collection_ancestor(t), Some(c1));
    assert_eq!(board.directory().topmost_collection_ancestor(loose), None);
}

// ─── Centering ───────────────────────────────────────────────────────────

#[test]
fn center_on_node_three_deep() {
    let mut board = Board::default();
    let root = board.root();
    let c1 = collection(&mut board, root, 500.0, 500.0, 1200.0, 1000.0);
    let c2 = collection(&mut board, c1, 37.0, 910.0, 700.0, 640.0);
    let c3 = collection(&mut board, c2, -80.0, 12.0, 420.0, 300.0);
    let t = text(&mut board, c3, 390.0, 275.0, 120.0, 90.0);
    let sibling = text(&mut board, c3, 10.0, 15.0, 60.0, 60.0);

    let before_gap = {
        let (t, s) = (board.entity(t).unwrap(), board.entity(sibling).unwrap());
        (t.x - s.x, t.y - s.y)
    };

    assert!(board.center_on_node(t));

    for (parent, node) in [(c1, c2), (c2, c3), (c3, t)] {
        let p = board.entity(parent).unwrap();
        let n = board.entity(node).unwrap();
        assert_eq!(n.center(), (p.width / 2.0, p.height / 2.0), "{node} in {parent}");
    }

    // Siblings move with the target, preserving the interior layout.
    let (te, se) = (board.entity(t).unwrap(), board.entity(sibling).unwrap());
    assert_eq!((te.x - se.x, te.y - se.y), before_gap);

    // The outermost collection stays where it is on the root canvas.
    let outer = board.entity(c1).unwrap();
    assert_eq!((outer.x, outer.y), (500.0, 500.0));
}

#[test]
fn center_canvas_on_nested_node_pans_root() {
    let mut board = Board::new(BoardConfig::default().with_viewport(1000.0, 800.0));
    let root = board.root();
    let c1 = collection(&mut board, root, 500.0, 500.0, 800.0, 600.0);
    let t = text(&mut board, c1, 20.0, 20.0, 300.0, 300.0);

    assert!(board.center_canvas_on(t));

    let e = board.entity(t).unwrap();
    assert_eq!(e.center(), (400.0, 300.0));
    // viewport/2 - target size/2 - collection position, per axis.
    assert_eq!(board.pan_offset(), (-150.0, -250.0));
}

// ─── Notifications ───────────────────────────────────────────────────────

#[test]
fn move_is_observed_as_one_step() {
    let mut board = Board::default();
    let root = board.root();
    let a = collection(&mut board, root, 0.0, 0.0, 400.0, 400.0);
    let b = collection(&mut board, root, 500.0, 0.0, 400.0, 400.0);
    let t = text(&mut board, a, 0.0, 0.0, 100.0, 100.0);

    // Each observer call checks the tree is already consistent.
    let snapshots = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&snapshots);
    board.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    board.move_node(t, Some(b));

    let events = snapshots.borrow();
    let moves: Vec<&BoardEvent> = events
        .iter()
        .filter(|e| matches!(e, BoardEvent::Moved { .. }))
        .collect();
    assert_eq!(
        moves,
        vec![&BoardEvent::Moved {
            id: t,
            from: Some(a),
            to: b
        }]
    );
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, BoardEvent::Removed { .. } | BoardEvent::Added { .. }))
    );
}

#[test]
fn refused_move_emits_nothing() {
    let mut board = Board::default();
    let root = board.root();
    let c = collection(&mut board, root, 0.0, 0.0, 400.0, 400.0);

    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    board.subscribe(move |_| *sink.borrow_mut() += 1);

    board.move_node(c, Some(c));
    board.move_node(c, None);
    assert_eq!(*count.borrow(), 0);
}
