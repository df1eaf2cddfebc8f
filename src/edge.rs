//! Property edges - directed, attributed relationships between nodes
//!
//! An edge points from a source node to a target node and carries an
//! ordered map of properties. Ordered collections of edges (`EdgeList`)
//! keep an `INDEX` property on every edge that always equals its position.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Closed set of keys an edge property may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKey {
    /// 0-based position of the edge within its collection
    Index,
    /// Name under which the target is known at the source (e.g. an alias)
    Name,
    /// Branch taken for conditional edges
    Branch,
    /// Target is statically unreachable
    Unreachable,
    /// Scope tag of the relationship
    Scope,
}

impl PropertyKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKey::Index => "INDEX",
            PropertyKey::Name => "NAME",
            PropertyKey::Branch => "BRANCH",
            PropertyKey::Unreachable => "UNREACHABLE",
            PropertyKey::Scope => "SCOPE",
        }
    }

    pub fn all() -> &'static [PropertyKey] {
        &[
            PropertyKey::Index,
            PropertyKey::Name,
            PropertyKey::Branch,
            PropertyKey::Unreachable,
            PropertyKey::Scope,
        ]
    }
}

impl FromStr for PropertyKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "index" | "idx" => Ok(PropertyKey::Index),
            "name" => Ok(PropertyKey::Name),
            "branch" => Ok(PropertyKey::Branch),
            "unreachable" => Ok(PropertyKey::Unreachable),
            "scope" => Ok(PropertyKey::Scope),
            _ => Err(crate::Error::UnknownKind(format!("property key: {}", s))),
        }
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value stored under a [`PropertyKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<usize> for PropertyValue {
    fn from(value: usize) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

/// A directed edge between two nodes of the same translation unit.
///
/// The edge is owned by the collection of its source; the target is a
/// plain id into the unit's arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyEdge {
    pub start: NodeId,
    pub end: NodeId,
    pub properties: BTreeMap<PropertyKey, PropertyValue>,
}

impl PropertyEdge {
    pub fn new(start: NodeId, end: NodeId) -> Self {
        Self {
            start,
            end,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: PropertyKey, value: impl Into<PropertyValue>) -> Self {
        self.add_property(key, value);
        self
    }

    pub fn add_property(&mut self, key: PropertyKey, value: impl Into<PropertyValue>) {
        self.properties.insert(key, value.into());
    }

    pub fn property(&self, key: PropertyKey) -> Option<&PropertyValue> {
        self.properties.get(&key)
    }

    /// The `INDEX` property, if the edge has one
    pub fn index(&self) -> Option<usize> {
        match self.property(PropertyKey::Index) {
            Some(PropertyValue::Int(i)) => usize::try_from(*i).ok(),
            _ => None,
        }
    }
}

/// An ordered edge collection owned by a single source node.
///
/// Invariant: the edge at position `i` carries `INDEX == i`. Every
/// operation that adds, removes or reorders edges renumbers.
///
/// Equality compares targets and properties in order; the source is
/// implied by the owner and is not compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeList {
    source: NodeId,
    edges: Vec<PropertyEdge>,
}

impl EdgeList {
    pub fn new(source: NodeId) -> Self {
        Self {
            source,
            edges: Vec::new(),
        }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Append an edge to `target` with `INDEX = len`
    pub fn push(&mut self, target: NodeId) {
        let edge = PropertyEdge::new(self.source, target)
            .with_property(PropertyKey::Index, self.edges.len());
        self.edges.push(edge);
    }

    /// Append unless an edge to the same target exists. Returns whether
    /// an edge was added.
    pub fn push_unique(&mut self, target: NodeId) -> bool {
        if self.contains(target) {
            return false;
        }
        self.push(target);
        true
    }

    pub fn contains(&self, target: NodeId) -> bool {
        self.edges.iter().any(|e| e.end == target)
    }

    pub fn get(&self, index: usize) -> Option<&PropertyEdge> {
        self.edges.get(index)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyEdge> {
        self.edges.iter()
    }

    pub fn as_slice(&self) -> &[PropertyEdge] {
        &self.edges
    }

    /// Target ids in collection order
    pub fn targets(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().map(|e| e.end)
    }

    /// Reorder edges by a key derived from the target and renumber
    pub fn sort_by_key<K: Ord>(&mut self, mut key: impl FnMut(NodeId) -> K) {
        self.edges.sort_by_key(|e| key(e.end));
        self.renumber();
    }

    /// Keep only edges whose target satisfies `keep` and renumber
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.edges.retain(|e| keep(e.end));
        self.renumber();
    }

    /// Move every edge to a new source node
    pub fn rebind(&mut self, source: NodeId) {
        self.source = source;
        for edge in &mut self.edges {
            edge.start = source;
        }
    }

    fn renumber(&mut self) {
        for (i, edge) in self.edges.iter_mut().enumerate() {
            edge.add_property(PropertyKey::Index, i);
        }
    }
}

impl PartialEq for EdgeList {
    fn eq(&self, other: &Self) -> bool {
        self.edges.len() == other.edges.len()
            && self
                .edges
                .iter()
                .zip(&other.edges)
                .all(|(a, b)| a.end == b.end && a.properties == b.properties)
    }
}

impl Eq for EdgeList {}

impl<'a> IntoIterator for &'a EdgeList {
    type Item = &'a PropertyEdge;
    type IntoIter = std::slice::Iter<'a, PropertyEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(list: &EdgeList) {
        for (i, edge) in list.iter().enumerate() {
            assert_eq!(edge.index(), Some(i));
        }
    }

    #[test]
    fn test_property_key_roundtrip() {
        for key in PropertyKey::all() {
            let parsed: PropertyKey = key.as_str().parse().unwrap();
            assert_eq!(*key, parsed);
        }
        assert!("weight".parse::<PropertyKey>().is_err());
    }

    #[test]
    fn test_edge_properties() {
        let edge = PropertyEdge::new(NodeId(1), NodeId(2))
            .with_property(PropertyKey::Index, 3usize)
            .with_property(PropertyKey::Name, "alias");

        assert_eq!(edge.index(), Some(3));
        assert_eq!(
            edge.property(PropertyKey::Name),
            Some(&PropertyValue::Str("alias".to_string()))
        );
        assert_eq!(edge.property(PropertyKey::Branch), None);
    }

    #[test]
    fn test_edge_list_indices() {
        let mut list = EdgeList::new(NodeId::UNIT);
        list.push(NodeId(4));
        list.push(NodeId(2));
        assert!(list.push_unique(NodeId(7)));
        assert!(!list.push_unique(NodeId(2)));

        assert_eq!(list.len(), 3);
        assert_contiguous(&list);
        assert_eq!(list.targets().collect::<Vec<_>>(), vec![NodeId(4), NodeId(2), NodeId(7)]);
    }

    #[test]
    fn test_edge_list_reorder_renumbers() {
        let mut list = EdgeList::new(NodeId::UNIT);
        for id in [5, 1, 3, 2] {
            list.push(NodeId(id));
        }

        list.sort_by_key(|id| id.0);
        assert_eq!(
            list.targets().collect::<Vec<_>>(),
            vec![NodeId(1), NodeId(2), NodeId(3), NodeId(5)]
        );
        assert_contiguous(&list);

        list.retain(|id| id.0 % 2 == 1);
        assert_eq!(list.targets().collect::<Vec<_>>(), vec![NodeId(1), NodeId(3), NodeId(5)]);
        assert_contiguous(&list);
    }

    #[test]
    fn test_edge_list_equality_ignores_source() {
        let mut a = EdgeList::new(NodeId(1));
        let mut b = EdgeList::new(NodeId(2));
        a.push(NodeId(3));
        b.push(NodeId(3));
        assert_eq!(a, b);

        b.push(NodeId(4));
        assert_ne!(a, b);
    }

    #[test]
    fn test_edge_list_rebind() {
        let mut list = EdgeList::new(NodeId::DETACHED);
        list.push(NodeId(2));
        list.rebind(NodeId(9));

        assert_eq!(list.source(), NodeId(9));
        assert!(list.iter().all(|e| e.start == NodeId(9)));
    }
}
