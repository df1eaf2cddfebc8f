//! Declarations - named program entities
//!
//! Every frontend maps its declaration-like AST nodes onto a closed set of
//! kinds:
//! - `Variable`: global or local variables
//! - `Function`: functions and methods (holds locals)
//! - `Namespace`: namespaces and packages (holds declarations)
//! - `Include`: `#include`/import of another file
//! - `Record`: class, struct, union (holds members)
//! - `Field`: record members
//! - `Typedef`: type aliases

pub mod holder;
pub mod variants;

pub use holder::{DeclRef, DeclarationHolder, DeclarationVariant};
pub use variants::{
    FieldDeclaration, FunctionDeclaration, IncludeDeclaration, NamespaceDeclaration,
    RecordDeclaration, TypedefDeclaration, VariableDeclaration,
};

use crate::node::{Node, NodeId};
use crate::types::Type;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Declaration kinds known to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Variable,
    Function,
    Namespace,
    Include,
    Record,
    Field,
    Typedef,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Variable => "variable",
            DeclarationKind::Function => "function",
            DeclarationKind::Namespace => "namespace",
            DeclarationKind::Include => "include",
            DeclarationKind::Record => "record",
            DeclarationKind::Field => "field",
            DeclarationKind::Typedef => "typedef",
        }
    }

    pub fn all() -> &'static [DeclarationKind] {
        &[
            DeclarationKind::Variable,
            DeclarationKind::Function,
            DeclarationKind::Namespace,
            DeclarationKind::Include,
            DeclarationKind::Record,
            DeclarationKind::Field,
            DeclarationKind::Typedef,
        ]
    }

    /// Kinds that own a collection of nested declarations
    pub fn is_holder(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Function | DeclarationKind::Namespace | DeclarationKind::Record
        )
    }
}

impl FromStr for DeclarationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "variable" | "var" | "let" | "const" => Ok(DeclarationKind::Variable),
            "function" | "fn" | "method" => Ok(DeclarationKind::Function),
            "namespace" | "ns" | "package" | "module" => Ok(DeclarationKind::Namespace),
            "include" | "import" => Ok(DeclarationKind::Include),
            "record" | "class" | "struct" | "union" => Ok(DeclarationKind::Record),
            "field" | "member" => Ok(DeclarationKind::Field),
            "typedef" | "alias" | "using" => Ok(DeclarationKind::Typedef),
            _ => Err(Error::UnknownKind(format!("declaration kind: {}", s))),
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific payload of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationData {
    Variable(VariableDeclaration),
    Function(FunctionDeclaration),
    Namespace(NamespaceDeclaration),
    Include(IncludeDeclaration),
    Record(RecordDeclaration),
    Field(FieldDeclaration),
    Typedef(TypedefDeclaration),
}

impl DeclarationData {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            DeclarationData::Variable(_) => DeclarationKind::Variable,
            DeclarationData::Function(_) => DeclarationKind::Function,
            DeclarationData::Namespace(_) => DeclarationKind::Namespace,
            DeclarationData::Include(_) => DeclarationKind::Include,
            DeclarationData::Record(_) => DeclarationKind::Record,
            DeclarationData::Field(_) => DeclarationKind::Field,
            DeclarationData::Typedef(_) => DeclarationKind::Typedef,
        }
    }
}

/// A declaration node.
///
/// `id` is assigned when the declaration is allocated in a translation
/// unit; until then it is [`NodeId::DETACHED`]. Equality is structural and
/// ignores `id`; identity checks compare ids.
///
/// The kind is fixed at construction: `data` can only be read, or patched
/// through a narrowed variant that cannot change it.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub node: Node,
    id: NodeId,
    data: DeclarationData,
}

impl Declaration {
    pub fn new(node: Node, data: impl Into<DeclarationData>) -> Self {
        Self {
            node,
            id: NodeId::DETACHED,
            data: data.into(),
        }
    }

    pub fn variable(name: impl Into<String>, variable: VariableDeclaration) -> Self {
        Self::new(Node::new(name), variable)
    }

    pub fn function(name: impl Into<String>, return_type: Type) -> Self {
        Self::new(Node::new(name), FunctionDeclaration::new(return_type))
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(Node::new(name), NamespaceDeclaration::new())
    }

    /// An include is named after the included file
    pub fn include(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        Self::new(Node::new(filename.clone()), IncludeDeclaration::new(filename))
    }

    pub fn record(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::new(Node::new(name), RecordDeclaration::new(kind))
    }

    pub fn field(name: impl Into<String>, ty: Type) -> Self {
        Self::new(Node::new(name), FieldDeclaration { ty })
    }

    pub fn typedef(name: impl Into<String>, target: Type) -> Self {
        Self::new(Node::new(name), TypedefDeclaration { target })
    }

    /// Replace the node metadata
    pub fn with_node(mut self, node: Node) -> Self {
        self.node = node;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn kind(&self) -> DeclarationKind {
        self.data.kind()
    }

    pub fn data(&self) -> &DeclarationData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut DeclarationData {
        &mut self.data
    }

    /// Narrow to a specific variant; `None` on kind mismatch
    pub fn downcast<T: DeclarationVariant>(&self) -> Option<&T> {
        T::narrow(self)
    }

    pub fn as_holder(&self) -> Option<&dyn DeclarationHolder> {
        match &self.data {
            DeclarationData::Function(f) => Some(f),
            DeclarationData::Namespace(n) => Some(n),
            DeclarationData::Record(r) => Some(r),
            _ => None,
        }
    }

    pub(crate) fn as_holder_mut(&mut self) -> Option<&mut dyn DeclarationHolder> {
        match &mut self.data {
            DeclarationData::Function(f) => Some(f),
            DeclarationData::Namespace(n) => Some(n),
            DeclarationData::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Assign the arena id and point owned edge collections at it
    pub(crate) fn bind(&mut self, id: NodeId) {
        self.id = id;
        match &mut self.data {
            DeclarationData::Function(f) => f.declarations.rebind(id),
            DeclarationData::Namespace(n) => n.declarations.rebind(id),
            DeclarationData::Record(r) => r.declarations.rebind(id),
            _ => {}
        }
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.data == other.data
    }
}

impl Eq for Declaration {}
