//! Declaration arena - storage behind a translation unit's graph
//!
//! All declarations of a unit live in one arena and are addressed by
//! [`NodeId`]. Edges only store ids, so the graph can hold arbitrary
//! forward and back references without shared ownership.

use crate::declaration::{DeclRef, Declaration, DeclarationKind, DeclarationVariant};
use crate::edge::EdgeList;
use crate::node::NodeId;
use std::collections::HashSet;

/// Slab of declarations with stable ids.
#[derive(Debug, Default, Clone)]
pub struct DeclarationArena {
    declarations: Vec<Declaration>,
}

impl DeclarationArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a declaration and assign its id
    pub fn alloc(&mut self, mut declaration: Declaration) -> NodeId {
        let id = NodeId::from_slot(self.declarations.len());
        declaration.bind(id);
        self.declarations.push(declaration);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Declaration> {
        self.declarations.get(id.slot()?)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Declaration> {
        self.declarations.get_mut(id.slot()?)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// All declarations in allocation order
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Targets of an edge collection, in `INDEX` order
    pub fn resolve<'a>(&'a self, edges: &'a EdgeList) -> Vec<&'a Declaration> {
        edges.targets().filter_map(|id| self.get(id)).collect()
    }

    /// The `index`-th target of `edges`, if it exists and narrows to `T`
    pub fn nth_as<T: DeclarationVariant>(
        &self,
        edges: &EdgeList,
        index: usize,
    ) -> Option<DeclRef<'_, T>> {
        let edge = edges.get(index)?;
        DeclRef::narrow(self.get(edge.end)?)
    }

    /// Every target of `edges` that narrows to `T` and is named `name`
    pub fn by_name<T: DeclarationVariant>(
        &self,
        edges: &EdgeList,
        name: &str,
    ) -> HashSet<DeclRef<'_, T>> {
        edges
            .targets()
            .filter_map(|id| self.get(id))
            .filter(|decl| decl.name() == name)
            .filter_map(DeclRef::narrow)
            .collect()
    }

    /// First target of `edges`, in `INDEX` order, that narrows to `T` and
    /// is named `name`
    pub fn first_by_name<T: DeclarationVariant>(
        &self,
        edges: &EdgeList,
        name: &str,
    ) -> Option<DeclRef<'_, T>> {
        edges
            .targets()
            .filter_map(|id| self.get(id))
            .filter(|decl| decl.name() == name)
            .find_map(DeclRef::narrow)
    }

    /// Count of declarations per kind, in [`DeclarationKind::all`] order
    pub fn count_by_kind(&self) -> Vec<(DeclarationKind, usize)> {
        DeclarationKind::all()
            .iter()
            .map(|kind| (*kind, self.iter().filter(|d| d.kind() == *kind).count()))
            .collect()
    }
}

/// Statistics about one translation unit
#[derive(Debug, Clone, serde::Serialize)]
pub struct UnitStats {
    pub name: String,
    pub allocated: usize,
    pub declarations: usize,
    pub includes: usize,
    pub namespaces: usize,
    pub by_kind: Vec<(DeclarationKind, usize)>,
}

impl std::fmt::Display for UnitStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Translation Unit {}:", self.name)?;
        writeln!(f, "  Allocated: {}", self.allocated)?;
        writeln!(f, "  Top-level declarations: {}", self.declarations)?;
        writeln!(f, "  Includes: {}", self.includes)?;
        writeln!(f, "  Namespaces: {}", self.namespaces)?;
        for (kind, count) in self.by_kind.iter().filter(|(_, count)| *count > 0) {
            writeln!(f, "    {}: {}", kind, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{FunctionDeclaration, VariableDeclaration};
    use crate::types::Type;

    fn sample_arena() -> (DeclarationArena, EdgeList) {
        let mut arena = DeclarationArena::new();
        let mut edges = EdgeList::new(NodeId::UNIT);
        for decl in [
            Declaration::variable("x", VariableDeclaration::default()),
            Declaration::function("x", Type::Unknown),
            Declaration::variable("x", VariableDeclaration::default()),
            Declaration::variable("y", VariableDeclaration::default()),
        ] {
            let id = arena.alloc(decl);
            edges.push(id);
        }
        (arena, edges)
    }

    #[test]
    fn test_alloc_assigns_ids() {
        let mut arena = DeclarationArena::new();
        let a = arena.alloc(Declaration::namespace("a"));
        let b = arena.alloc(Declaration::namespace("b"));

        assert_eq!(a, NodeId(1));
        assert_eq!(b, NodeId(2));
        assert_eq!(arena.get(b).unwrap().id(), b);
        assert!(arena.get(NodeId::UNIT).is_none());
        assert!(arena.get(NodeId(3)).is_none());
        assert!(arena.get(NodeId::DETACHED).is_none());
    }

    #[test]
    fn test_nth_as() {
        let (arena, edges) = sample_arena();
        assert!(arena.nth_as::<VariableDeclaration>(&edges, 0).is_some());
        assert!(arena.nth_as::<VariableDeclaration>(&edges, 1).is_none());
        assert!(arena.nth_as::<FunctionDeclaration>(&edges, 1).is_some());
        assert!(arena.nth_as::<Declaration>(&edges, 99).is_none());
    }

    #[test]
    fn test_by_name_returns_every_candidate() {
        let (arena, edges) = sample_arena();
        assert_eq!(arena.by_name::<VariableDeclaration>(&edges, "x").len(), 2);
        assert_eq!(arena.by_name::<FunctionDeclaration>(&edges, "x").len(), 1);
        assert_eq!(arena.by_name::<Declaration>(&edges, "x").len(), 3);
        assert!(arena.by_name::<Declaration>(&edges, "z").is_empty());

        let first = arena.first_by_name::<VariableDeclaration>(&edges, "x").unwrap();
        assert_eq!(first.id, NodeId(1));
    }

    #[test]
    fn test_count_by_kind() {
        let (arena, _) = sample_arena();
        let counts = arena.count_by_kind();
        assert!(counts.contains(&(DeclarationKind::Variable, 3)));
        assert!(counts.contains(&(DeclarationKind::Function, 1)));
        assert!(counts.contains(&(DeclarationKind::Include, 0)));
    }
}
