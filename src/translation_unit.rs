//! Translation unit - the root declaration of one source file
//!
//! A unit owns the arena of every declaration its frontend creates and
//! three ordered views over the top-level ones:
//! - `declarations`: everything surfaced in the unit
//! - `includes`: the include declarations among them
//! - `namespaces`: the namespace declarations among them
//!
//! The three views reference the same arena entries; nothing is owned
//! twice.

use crate::declaration::{
    DeclRef, Declaration, DeclarationData, DeclarationHolder, DeclarationKind,
    DeclarationVariant, VariableDeclaration,
};
use crate::edge::EdgeList;
use crate::graph::{DeclarationArena, UnitStats};
use crate::node::{Node, NodeId};
use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Top-level collections of a unit. Implements the holder capability for
/// the unit itself.
#[derive(Debug, Clone)]
struct TopLevel {
    declarations: EdgeList,
    includes: EdgeList,
    namespaces: EdgeList,
}

impl TopLevel {
    fn new() -> Self {
        Self {
            declarations: EdgeList::new(NodeId::UNIT),
            includes: EdgeList::new(NodeId::UNIT),
            namespaces: EdgeList::new(NodeId::UNIT),
        }
    }
}

impl DeclarationHolder for TopLevel {
    fn declaration_edges(&self) -> &EdgeList {
        &self.declarations
    }

    fn add_declaration(&mut self, id: NodeId, kind: DeclarationKind) {
        match kind {
            DeclarationKind::Include => {
                self.includes.push_unique(id);
            }
            DeclarationKind::Namespace => {
                self.namespaces.push_unique(id);
            }
            _ => {}
        }

        if !self.declarations.push_unique(id) {
            tracing::debug!("{} {} already registered in unit, skipping", kind, id);
        }
    }
}

/// The declaration graph of one source file.
///
/// Built by exactly one frontend; once handed to a
/// [`TranslationResult`](crate::manager::TranslationResult) it is shared
/// read-only.
#[derive(Debug, Clone)]
pub struct TranslationUnitDeclaration {
    pub node: Node,
    arena: DeclarationArena,
    top: TopLevel,
}

impl TranslationUnitDeclaration {
    /// A unit is named after its file
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_node(Node::new(name))
    }

    pub fn with_node(node: Node) -> Self {
        Self {
            node,
            arena: DeclarationArena::new(),
            top: TopLevel::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        NodeId::UNIT
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    fn unknown(&self, id: NodeId) -> Error {
        Error::UnknownDeclaration(format!("{} in unit {}", id, self.node.name))
    }

    // ========== Population ==========

    /// Allocate a declaration in this unit without registering it anywhere
    pub fn alloc(&mut self, declaration: Declaration) -> NodeId {
        self.arena.alloc(declaration)
    }

    /// Register an allocated declaration at the top level.
    ///
    /// Includes and namespaces are also indexed in their own collection.
    /// Registering the same id twice leaves all three collections unchanged.
    pub fn add_declaration(&mut self, id: NodeId) -> Result<()> {
        let kind = self
            .arena
            .get(id)
            .map(Declaration::kind)
            .ok_or_else(|| self.unknown(id))?;
        self.top.add_declaration(id, kind);
        Ok(())
    }

    /// Allocate and register at the top level in one step
    pub fn declare(&mut self, declaration: Declaration) -> NodeId {
        let kind = declaration.kind();
        let id = self.arena.alloc(declaration);
        self.top.add_declaration(id, kind);
        id
    }

    /// Register `id` inside a nested holder (function, namespace, record)
    pub fn add_declaration_to(&mut self, holder: NodeId, id: NodeId) -> Result<()> {
        let kind = self
            .arena
            .get(id)
            .map(Declaration::kind)
            .ok_or_else(|| self.unknown(id))?;

        let name = &self.node.name;
        let target = self
            .arena
            .get_mut(holder)
            .ok_or_else(|| Error::UnknownDeclaration(format!("{} in unit {}", holder, name)))?;
        let target_kind = target.kind();
        let target_holder = target
            .as_holder_mut()
            .ok_or_else(|| Error::NotAHolder(format!("{} {}", target_kind, holder)))?;
        target_holder.add_declaration(id, kind);
        Ok(())
    }

    /// Allocate and register inside a nested holder in one step
    pub fn declare_in(&mut self, holder: NodeId, declaration: Declaration) -> Result<NodeId> {
        match self.arena.get(holder) {
            Some(decl) if decl.kind().is_holder() => {}
            Some(decl) => return Err(Error::NotAHolder(format!("{} {}", decl.kind(), holder))),
            None => return Err(self.unknown(holder)),
        }
        let id = self.arena.alloc(declaration);
        self.add_declaration_to(holder, id)?;
        Ok(id)
    }

    // ========== Queries ==========

    pub fn get(&self, id: NodeId) -> Option<&Declaration> {
        self.arena.get(id)
    }

    /// Node metadata of an allocated declaration, for patching names,
    /// locations and comments after allocation
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(id).map(|decl| &mut decl.node)
    }

    /// Payload of an allocated variable, e.g. to attach an initializer seen
    /// after the declarator. `None` for other kinds.
    pub fn variable_mut(&mut self, id: NodeId) -> Option<&mut VariableDeclaration> {
        match self.arena.get_mut(id)?.data_mut() {
            DeclarationData::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn arena(&self) -> &DeclarationArena {
        &self.arena
    }

    /// The `index`-th top-level declaration if it narrows to `T`
    pub fn declaration_as<T: DeclarationVariant>(
        &self,
        index: usize,
    ) -> Option<DeclRef<'_, T>> {
        self.arena.nth_as(&self.top.declarations, index)
    }

    /// Every top-level declaration of variant `T` named exactly `name`.
    ///
    /// More than one candidate is normal, e.g. a function declared in the
    /// unit and again in an included header.
    pub fn declarations_by_name<T: DeclarationVariant>(
        &self,
        name: &str,
    ) -> HashSet<DeclRef<'_, T>> {
        self.arena.by_name(&self.top.declarations, name)
    }

    /// First top-level declaration of variant `T` named `name`
    pub fn declaration_by_name<T: DeclarationVariant>(
        &self,
        name: &str,
    ) -> Option<DeclRef<'_, T>> {
        self.arena.first_by_name(&self.top.declarations, name)
    }

    /// A variable registered inside a nested holder
    pub fn variable_by_name(
        &self,
        holder: NodeId,
        name: &str,
    ) -> Option<DeclRef<'_, VariableDeclaration>> {
        let edges = self.arena.get(holder)?.as_holder()?.declaration_edges();
        self.arena.first_by_name(edges, name)
    }

    /// Declarations registered inside a nested holder, in order
    pub fn children(&self, holder: NodeId) -> Vec<&Declaration> {
        match self.arena.get(holder).and_then(Declaration::as_holder) {
            Some(h) => self.arena.resolve(h.declaration_edges()),
            None => Vec::new(),
        }
    }

    pub fn declarations(&self) -> Vec<&Declaration> {
        self.arena.resolve(&self.top.declarations)
    }

    pub fn includes(&self) -> Vec<&Declaration> {
        self.arena.resolve(&self.top.includes)
    }

    pub fn namespaces(&self) -> Vec<&Declaration> {
        self.arena.resolve(&self.top.namespaces)
    }

    pub fn declaration_edges(&self) -> &EdgeList {
        &self.top.declarations
    }

    pub fn include_edges(&self) -> &EdgeList {
        &self.top.includes
    }

    pub fn namespace_edges(&self) -> &EdgeList {
        &self.top.namespaces
    }

    pub fn stats(&self) -> UnitStats {
        UnitStats {
            name: self.node.name.clone(),
            allocated: self.arena.len(),
            declarations: self.top.declarations.len(),
            includes: self.top.includes.len(),
            namespaces: self.top.namespaces.len(),
            by_kind: self.arena.count_by_kind(),
        }
    }

    fn same_collection(&self, other: &Self, pick: impl Fn(&TopLevel) -> &EdgeList) -> bool {
        let (mine, theirs) = (pick(&self.top), pick(&other.top));
        mine == theirs && self.arena.resolve(mine) == other.arena.resolve(theirs)
    }
}

impl PartialEq for TranslationUnitDeclaration {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.node == other.node
            && self.same_collection(other, |t| &t.declarations)
            && self.same_collection(other, |t| &t.includes)
            && self.same_collection(other, |t| &t.namespaces)
    }
}

impl Eq for TranslationUnitDeclaration {}

// Collections are not hashed.
impl Hash for TranslationUnitDeclaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl fmt::Display for TranslationUnitDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TranslationUnitDeclaration[name={}, declarations={}, includes={}, namespaces={}]",
            self.node.name,
            self.top.declarations.len(),
            self.top.includes.len(),
            self.top.namespaces.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{FunctionDeclaration, IncludeDeclaration, NamespaceDeclaration};
    use crate::expression::Expression;
    use crate::literal::{IntegerValue, LiteralTypeResolver};
    use crate::types::{IntegerType, TargetModel, Type};
    use std::collections::hash_map::DefaultHasher;

    fn var(name: &str) -> Declaration {
        Declaration::variable(name, VariableDeclaration::default())
    }

    fn assert_indices(edges: &EdgeList) {
        for (i, edge) in edges.iter().enumerate() {
            assert_eq!(edge.index(), Some(i));
            assert_eq!(edge.start, NodeId::UNIT);
        }
    }

    fn hash_of(tu: &TranslationUnitDeclaration) -> u64 {
        let mut hasher = DefaultHasher::new();
        tu.hash(&mut hasher);
        hasher.finish()
    }

    fn sample_unit() -> TranslationUnitDeclaration {
        let mut tu = TranslationUnitDeclaration::new("main.cpp");
        tu.declare(Declaration::include("stdio.h"));
        tu.declare(Declaration::namespace("std"));
        tu.declare(var("counter"));
        tu.declare(Declaration::include("util.h"));
        tu.declare(Declaration::function("main", Type::Integer(IntegerType::Int)));
        tu
    }

    #[test]
    fn test_index_order() {
        let tu = sample_unit();
        assert_eq!(tu.declarations().len(), 5);
        assert_eq!(tu.includes().len(), 2);
        assert_eq!(tu.namespaces().len(), 1);
        assert_indices(tu.declaration_edges());
        assert_indices(tu.include_edges());
        assert_indices(tu.namespace_edges());

        let names: Vec<_> = tu.includes().iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["stdio.h", "util.h"]);
    }

    #[test]
    fn test_dual_reachability() {
        let tu = sample_unit();
        for id in tu.include_edges().targets().chain(tu.namespace_edges().targets()) {
            assert!(tu.declaration_edges().contains(id));
        }
    }

    #[test]
    fn test_idempotent_insert() {
        let mut tu = TranslationUnitDeclaration::new("a.cpp");
        let include = tu.alloc(Declaration::include("a.h"));
        let namespace = tu.alloc(Declaration::namespace("a"));
        let x = tu.alloc(var("x"));

        for id in [include, namespace, x, include, namespace, x] {
            tu.add_declaration(id).unwrap();
        }

        assert_eq!(tu.declarations().len(), 3);
        assert_eq!(tu.includes().len(), 1);
        assert_eq!(tu.namespaces().len(), 1);
        assert_indices(tu.declaration_edges());
    }

    #[test]
    fn test_round_trip_in_insertion_order() {
        let mut tu = TranslationUnitDeclaration::new("a.cpp");
        let ids: Vec<_> = ["a", "b", "c", "d"].iter().map(|n| tu.alloc(var(n))).collect();
        for id in ids.iter().rev() {
            tu.add_declaration(*id).unwrap();
        }
        tu.add_declaration(ids[2]).unwrap();

        let names: Vec<_> = tu.declarations().iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn test_unknown_declaration_is_rejected() {
        let mut tu = TranslationUnitDeclaration::new("a.cpp");
        assert!(matches!(tu.add_declaration(NodeId(7)), Err(Error::UnknownDeclaration(_))));
        assert!(matches!(tu.add_declaration(NodeId::UNIT), Err(Error::UnknownDeclaration(_))));
        assert!(tu.declarations().is_empty());
    }

    #[test]
    fn test_declaration_as() {
        let tu = sample_unit();
        assert_eq!(tu.declaration_as::<IncludeDeclaration>(0).unwrap().filename, "stdio.h");
        assert!(tu.declaration_as::<NamespaceDeclaration>(0).is_none());
        assert!(tu.declaration_as::<NamespaceDeclaration>(1).is_some());
        assert!(tu.declaration_as::<Declaration>(5).is_none());
        assert!(tu.declaration_as::<Declaration>(usize::MAX).is_none());
    }

    #[test]
    fn test_name_lookup_completeness() {
        let mut tu = TranslationUnitDeclaration::new("a.cpp");
        let a = tu.declare(Declaration::function("foo", Type::Unknown));
        let b = tu.declare(Declaration::function("foo", Type::Unknown));
        tu.declare(var("foo"));

        let found = tu.declarations_by_name::<FunctionDeclaration>("foo");
        assert_eq!(found.len(), 2);
        let ids: HashSet<_> = found.iter().map(|d| d.id).collect();
        let expected: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(ids, expected);

        assert_eq!(tu.declarations_by_name::<Declaration>("foo").len(), 3);
        assert!(tu.declarations_by_name::<FunctionDeclaration>("Foo").is_empty());
        assert_eq!(tu.declaration_by_name::<FunctionDeclaration>("foo").unwrap().id, a);
    }

    #[test]
    fn test_nested_declarations() {
        let model = TargetModel::Lp64;
        let resolver = LiteralTypeResolver::new(model);
        let mut tu = TranslationUnitDeclaration::new("largenegativenumber.cpp");
        let main = tu.declare(Declaration::function("main", Type::Integer(IntegerType::Int)));

        for (name, text) in [("a", "-1"), ("b", "-2147483648"), ("c", "-2147483649")] {
            let init = Expression::parse_integer(text, &resolver).unwrap();
            let variable = VariableDeclaration::default().with_initializer(init, model);
            tu.declare_in(main, Declaration::variable(name, variable)).unwrap();
        }

        assert_eq!(tu.declarations().len(), 1);
        assert_eq!(tu.children(main).len(), 3);

        let b = tu.variable_by_name(main, "b").unwrap();
        assert_eq!(b.ty, Type::Integer(IntegerType::Int));
        let literal = b.initializer_as_unary().unwrap().input.as_literal().unwrap();
        assert_eq!(literal.value, IntegerValue::Long(2147483648));

        let c = tu.variable_by_name(main, "c").unwrap();
        assert_eq!(c.ty, Type::Integer(IntegerType::Long));
        assert!(tu.variable_by_name(main, "d").is_none());
    }

    #[test]
    fn test_nested_holder_errors() {
        let mut tu = TranslationUnitDeclaration::new("a.cpp");
        let include = tu.declare(Declaration::include("a.h"));
        let x = tu.alloc(var("x"));

        assert!(matches!(tu.add_declaration_to(include, x), Err(Error::NotAHolder(_))));
        assert!(matches!(tu.declare_in(include, var("y")), Err(Error::NotAHolder(_))));
        assert!(matches!(tu.add_declaration_to(NodeId(40), x), Err(Error::UnknownDeclaration(_))));
        assert!(tu.children(include).is_empty());
    }

    #[test]
    fn test_namespace_members_are_not_top_level() {
        let mut tu = TranslationUnitDeclaration::new("a.cpp");
        let std = tu.declare(Declaration::namespace("std"));
        let inner = tu.declare_in(std, Declaration::function("swap", Type::Unknown)).unwrap();

        assert!(!tu.declaration_edges().contains(inner));
        assert_eq!(tu.children(std)[0].id(), inner);
        assert_eq!(tu.get(std).unwrap().as_holder().unwrap().declaration_edges().source(), std);
    }

    #[test]
    fn test_equality_and_hash() {
        let a = sample_unit();
        let b = sample_unit();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let mut c = sample_unit();
        c.declare(var("extra"));
        assert_ne!(a, c);
        // collections are not hashed
        assert_eq!(hash_of(&a), hash_of(&c));

        let mut d = sample_unit();
        d.node_mut(NodeId(3)).unwrap().name = "renamed".to_string();
        assert_ne!(a, d);

        assert_ne!(a, TranslationUnitDeclaration::new("other.cpp"));
    }

    #[test]
    fn test_patching_keeps_identity() {
        let model = TargetModel::Lp64;
        let resolver = LiteralTypeResolver::new(model);
        let mut tu = TranslationUnitDeclaration::new("a.cpp");
        let a = tu.declare(Declaration::function("foo", Type::Unknown));
        let b = tu.declare(Declaration::function("foo", Type::Unknown));
        let x = tu.declare(var("x"));

        let location = "a.cpp:3:1-3:12".parse().unwrap();
        tu.node_mut(a).unwrap().location = Some(location);
        tu.node_mut(b).unwrap().comment = Some("overload".to_string());
        assert_eq!(tu.get(a).unwrap().id(), a);
        assert_eq!(tu.get(b).unwrap().id(), b);
        assert_eq!(tu.declarations_by_name::<FunctionDeclaration>("foo").len(), 2);

        let init = Expression::parse_integer("-2147483649", &resolver).unwrap();
        let variable = tu.variable_mut(x).unwrap();
        *variable = std::mem::take(variable).with_initializer(init, model);
        assert_eq!(tu.get(x).unwrap().id(), x);
        assert_eq!(tu.get(x).unwrap().kind(), DeclarationKind::Variable);
        let x = tu.declaration_by_name::<VariableDeclaration>("x").unwrap();
        assert_eq!(x.ty, Type::Integer(IntegerType::Long));

        assert!(tu.variable_mut(a).is_none());
        assert!(tu.node_mut(NodeId(99)).is_none());
        assert!(tu.variable_mut(NodeId::UNIT).is_none());
    }

    #[test]
    fn test_stats() {
        let tu = sample_unit();
        let stats = tu.stats();
        assert_eq!(stats.declarations, 5);
        assert_eq!(stats.includes, 2);
        assert!(stats.to_string().contains("Includes: 2"));
        assert!(tu.to_string().contains("declarations=5"));
    }
}
