//! The directory service: the single authoritative id → entity index.
//!
//! Entities live as node weights of an undirected `StableGraph`; graph
//! edges are the symmetric connections between entities, so "A is connected
//! to B" and "B is connected to A" are the same edge. Containment is not
//! stored in the graph: it is the `nodes` list of each collection plus the
//! child's `parent` back-reference.

use crate::id::NodeId;
use crate::model::Entity;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableUnGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Directory {
    /// Entity arena. Edges are connections.
    graph: StableUnGraph<Entity, ()>,

    /// Index from NodeId → NodeIndex for O(1) lookup.
    id_index: HashMap<NodeId, NodeIndex>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.id_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_index.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// All registered ids, in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().map(|idx| self.graph[idx].id)
    }

    /// Add an entity to the index. A no-op when the id is already present:
    /// the existing entity is kept and `entity` is dropped.
    pub fn register(&mut self, entity: Entity) -> NodeId {
        let id = entity.id;
        if self.id_index.contains_key(&id) {
            log::trace!("register {id}: already present");
            return id;
        }
        let idx = self.graph.add_node(entity);
        self.id_index.insert(id, idx);
        id
    }

    /// Remove an entity from the index.
    ///
    /// Callers detach it from its owner and sever its connections first;
    /// any edge still attached is dropped along with the node.
    pub fn unregister(&mut self, id: NodeId) -> Option<Entity> {
        let idx = self.id_index.remove(&id)?;
        self.graph.remove_node(idx)
    }

    pub fn lookup(&self, id: NodeId) -> Option<&Entity> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn lookup_mut(&mut self, id: NodeId) -> Option<&mut Entity> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Connect two entities. Returns true if a new connection was made.
    ///
    /// Self-connections, unknown ids and already-connected pairs are ignored.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            log::debug!("connect {a}: refusing self-connection");
            return false;
        }
        let (Some(ia), Some(ib)) = (self.id_index.get(&a), self.id_index.get(&b)) else {
            log::debug!("connect {a} ↔ {b}: unknown id");
            return false;
        };
        if self.graph.find_edge(*ia, *ib).is_some() {
            return false;
        }
        self.graph.add_edge(*ia, *ib, ());
        true
    }

    /// Remove the connection between two entities. Returns true if one existed.
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> bool {
        let (Some(ia), Some(ib)) = (self.id_index.get(&a), self.id_index.get(&b)) else {
            return false;
        };
        match self.graph.find_edge(*ia, *ib) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        match (self.id_index.get(&a), self.id_index.get(&b)) {
            (Some(ia), Some(ib)) => self.graph.find_edge(*ia, *ib).is_some(),
            _ => false,
        }
    }

    /// Entities connected to `id`, oldest connection first.
    pub fn connections(&self, id: NodeId) -> Vec<NodeId> {
        let Some(&idx) = self.id_index.get(&id) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx {
                    e.target()
                } else {
                    e.source()
                };
                (e.id(), other)
            })
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);
        edges
            .into_iter()
            .map(|(_, other)| self.graph[other].id)
            .collect()
    }

    // ─── Structural queries ──────────────────────────────────────────────

    /// Path from the outermost collection ancestor (root canvas excluded)
    /// down to and including `id`.
    ///
    /// An entity sitting directly on the root canvas yields `[id]`; an
    /// unknown id yields an empty path. The walk is bounded by the number
    /// of registered entities, so a corrupted parent cycle cannot hang it.
    pub fn ancestor_chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.lookup(id);
        while let Some(entity) = current {
            if path.len() > self.len() {
                log::warn!("ancestor chain of {id} exceeds directory size; parent cycle?");
                break;
            }
            path.push(entity.id);
            current = entity.parent.and_then(|p| self.lookup(p));
        }
        path.reverse();
        path
    }

    /// The collection ancestor sitting directly on the root canvas, or
    /// `None` when `id` itself lives on the root canvas.
    pub fn topmost_collection_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let chain = self.ancestor_chain(id);
        if chain.len() > 1 { chain.first().copied() } else { None }
    }

    /// Check if `ancestor` is a parent/grandparent/etc. of `descendant`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        if ancestor == descendant {
            return false;
        }
        let chain = self.ancestor_chain(descendant);
        chain[..chain.len().saturating_sub(1)].contains(&ancestor)
    }

    /// Every starred entity.
    ///
    /// Arena order: insertion order until a deletion frees a slot that a
    /// later entity reuses. Only membership is guaranteed.
    pub fn starred(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .map(|idx| &self.graph[idx])
            .filter(|e| e.is_starred)
            .map(|e| e.id)
            .collect()
    }
}
