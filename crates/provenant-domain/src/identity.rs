//! Equivalence classes over `same_as` edges
//!
//! Union-find over entity nodes. Each class is represented by its smallest
//! node id, so the canonical id of a class does not depend on edge order.

use crate::{Edge, EdgeType, NodeId};
use std::collections::HashMap;

/// Disjoint sets of nodes linked by asserted `same_as` edges
///
/// Negated edges ("X is not Y") never merge classes.
#[derive(Debug, Clone, Default)]
pub struct IdentityClasses {
    parent: HashMap<NodeId, NodeId>,
}

impl IdentityClasses {
    /// Create an empty structure where every node is its own class
    pub fn new() -> Self {
        Self::default()
    }

    /// Build classes from every asserted `same_as` edge in `edges`
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let mut classes = Self::new();
        for edge in edges {
            classes.add_edge(edge);
        }
        classes
    }

    /// Merge the endpoints of an edge if it is an asserted `same_as`
    ///
    /// Returns whether the edge was considered.
    pub fn add_edge(&mut self, edge: &Edge) -> bool {
        if edge.edge_type != EdgeType::SAME_AS || edge.is_negated {
            return false;
        }
        self.union(edge.source_node, edge.target_node);
        true
    }

    /// Merge the classes of two nodes
    pub fn union(&mut self, a: NodeId, b: NodeId) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return;
        }
        // Smaller id becomes the root so the class representative is stable
        if root_a < root_b {
            self.parent.insert(root_b, root_a);
        } else {
            self.parent.insert(root_a, root_b);
        }
    }

    /// Canonical id of the node's class (the node itself if unlinked)
    pub fn canonical(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&next) = self.parent.get(&current) {
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Whether two nodes denote the same referent
    pub fn same_class(&self, a: NodeId, b: NodeId) -> bool {
        self.canonical(a) == self.canonical(b)
    }

    /// Every known member of the node's class, sorted, including the node
    pub fn class_of(&self, id: NodeId) -> Vec<NodeId> {
        let root = self.canonical(id);
        let mut members: Vec<NodeId> = self
            .parent
            .keys()
            .copied()
            .filter(|member| self.canonical(*member) == root)
            .collect();
        if !members.contains(&root) {
            members.push(root);
        }
        if !members.contains(&id) {
            members.push(id);
        }
        members.sort();
        members
    }

    /// Path-compressing find
    fn find(&mut self, id: NodeId) -> NodeId {
        let root = self.canonical(id);
        let mut current = id;
        while current != root {
            let next = self.parent.get(&current).copied().unwrap_or(root);
            self.parent.insert(current, root);
            current = next;
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Properties;

    fn same_as(a: NodeId, b: NodeId, negated: bool) -> Edge {
        Edge {
            id: crate::EdgeId::new(),
            edge_type: EdgeType::SAME_AS,
            source_node: a,
            target_node: b,
            properties: Properties::new(),
            is_negated: negated,
            created_at: 0,
        }
    }

    #[test]
    fn test_unlinked_node_is_its_own_class() {
        let classes = IdentityClasses::new();
        let id = NodeId::new();
        assert_eq!(classes.canonical(id), id);
        assert_eq!(classes.class_of(id), vec![id]);
    }

    #[test]
    fn test_chain_collapses_to_smallest_id() {
        let a = NodeId::from_value(30);
        let b = NodeId::from_value(10);
        let c = NodeId::from_value(20);
        let edges = vec![same_as(a, b, false), same_as(b, c, false)];
        let classes = IdentityClasses::from_edges(&edges);

        assert_eq!(classes.canonical(a), b);
        assert_eq!(classes.canonical(c), b);
        assert_eq!(classes.class_of(c), vec![b, c, a]);
        assert!(classes.same_class(a, c));
    }

    #[test]
    fn test_negated_and_other_edges_do_not_merge() {
        let a = NodeId::from_value(1);
        let b = NodeId::from_value(2);
        let c = NodeId::from_value(3);
        let mut related = same_as(a, c, false);
        related.edge_type = EdgeType::RELATED_TO;

        let edges = vec![same_as(a, b, true), related];
        let classes = IdentityClasses::from_edges(&edges);
        assert!(!classes.same_class(a, b));
        assert!(!classes.same_class(a, c));
    }

    #[test]
    fn test_order_independent() {
        let ids: Vec<NodeId> = (1..=5).map(NodeId::from_value).collect();
        let forward = vec![
            same_as(ids[4], ids[3], false),
            same_as(ids[3], ids[2], false),
            same_as(ids[1], ids[0], false),
            same_as(ids[2], ids[1], false),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let f = IdentityClasses::from_edges(&forward);
        let b = IdentityClasses::from_edges(&backward);
        for id in &ids {
            assert_eq!(f.canonical(*id), ids[0]);
            assert_eq!(b.canonical(*id), ids[0]);
        }
    }
}
