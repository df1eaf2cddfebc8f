//! Node - base identity and metadata for every graph vertex
//!
//! Every vertex of the property graph carries the same metadata: a display
//! name, the raw source text it was produced from, an optional comment and
//! its physical location. Identity is the arena-assigned [`NodeId`].

use crate::location::PhysicalLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a node inside one translation unit.
///
/// `NodeId::UNIT` is the translation unit itself; declarations allocated in
/// the unit's arena receive ids starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The owning translation unit
    pub const UNIT: NodeId = NodeId(0);

    /// A declaration that has not been allocated yet
    pub const DETACHED: NodeId = NodeId(u32::MAX);

    pub fn is_detached(&self) -> bool {
        *self == Self::DETACHED
    }

    /// Position in the declaration arena, `None` for the unit and detached ids
    pub(crate) fn slot(&self) -> Option<usize> {
        if self.is_detached() {
            return None;
        }
        (self.0 as usize).checked_sub(1)
    }

    pub(crate) fn from_slot(slot: usize) -> Self {
        NodeId(slot as u32 + 1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_detached() {
            write!(f, "#detached")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Metadata shared by every graph vertex.
///
/// Fields are public: frontends patch them while they build the graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    /// Display name (identifier for declarations, token text for literals)
    pub name: String,
    /// Raw source text the node was produced from
    pub code: Option<String>,
    pub location: Option<PhysicalLocation>,
    pub comment: Option<String>,
    /// Created by the frontend without a source counterpart
    pub implicit: bool,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_location(mut self, location: PhysicalLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.code == other.code
            && self.location == other.location
            && self.comment == other.comment
            && self.implicit == other.implicit
    }
}

impl Eq for Node {}

// Hashes name and location only.
impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.location.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Region;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(node: &Node) -> u64 {
        let mut hasher = DefaultHasher::new();
        node.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_node_builder() {
        let node = Node::new("main")
            .with_code("int main() {}")
            .with_comment("entry point")
            .with_location(PhysicalLocation::new("main.cpp", Region::new(1, 1, 1, 14)));

        assert_eq!(node.name, "main");
        assert_eq!(node.code.as_deref(), Some("int main() {}"));
        assert!(node.location.is_some());
        assert!(!node.implicit);
    }

    #[test]
    fn test_node_equality_and_hash() {
        let a = Node::new("x").with_code("int x;");
        let b = Node::new("x").with_code("int x;");
        let c = Node::new("x").with_code("long x;");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(hash_of(&a), hash_of(&b));
        // code is not hashed, so unequal nodes may collide
        assert_eq!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn test_node_id_slots() {
        assert_eq!(NodeId::UNIT.slot(), None);
        assert_eq!(NodeId::DETACHED.slot(), None);
        assert_eq!(NodeId(1).slot(), Some(0));
        assert_eq!(NodeId::from_slot(4), NodeId(5));
        assert_eq!(NodeId(3).to_string(), "#3");
    }
}
