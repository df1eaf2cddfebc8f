//! Kind-specific declaration payloads

use super::{DeclarationData, DeclarationHolder, DeclarationKind};
use crate::edge::EdgeList;
use crate::expression::{Expression, Literal, UnaryOperator};
use crate::node::NodeId;
use crate::types::{TargetModel, Type};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariableDeclaration {
    pub ty: Type,
    pub initializer: Option<Expression>,
}

impl VariableDeclaration {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            initializer: None,
        }
    }

    /// Attach an initializer. A variable without a declared type takes the
    /// initializer's type, after narrowing of negated literals.
    pub fn with_initializer(mut self, initializer: Expression, model: TargetModel) -> Self {
        if self.ty.is_unknown() {
            self.ty = Type::Integer(initializer.ty(model));
        }
        self.initializer = Some(initializer);
        self
    }

    pub fn initializer_as_literal(&self) -> Option<&Literal> {
        self.initializer.as_ref()?.as_literal()
    }

    pub fn initializer_as_unary(&self) -> Option<&UnaryOperator> {
        self.initializer.as_ref()?.as_unary()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDeclaration {
    pub return_type: Type,
    /// Parameters and locals, in declaration order
    pub(crate) declarations: EdgeList,
}

impl FunctionDeclaration {
    pub fn new(return_type: Type) -> Self {
        Self {
            return_type,
            declarations: EdgeList::new(NodeId::DETACHED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDeclaration {
    pub(crate) declarations: EdgeList,
}

impl NamespaceDeclaration {
    pub fn new() -> Self {
        Self {
            declarations: EdgeList::new(NodeId::DETACHED),
        }
    }
}

impl Default for NamespaceDeclaration {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDeclaration {
    /// `class`, `struct`, `union`, ...
    pub kind: String,
    pub(crate) declarations: EdgeList,
}

impl RecordDeclaration {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            declarations: EdgeList::new(NodeId::DETACHED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDeclaration {
    pub filename: String,
    /// `<...>` rather than `"..."`
    pub system: bool,
}

impl IncludeDeclaration {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            system: false,
        }
    }

    pub fn system(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            system: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedefDeclaration {
    pub target: Type,
}

macro_rules! nested_holder {
    ($ty:ty) => {
        impl DeclarationHolder for $ty {
            fn declaration_edges(&self) -> &EdgeList {
                &self.declarations
            }

            fn add_declaration(&mut self, id: NodeId, _kind: DeclarationKind) {
                if !self.declarations.push_unique(id) {
                    tracing::debug!("{} already registered, skipping", id);
                }
            }
        }
    };
}

nested_holder!(FunctionDeclaration);
nested_holder!(NamespaceDeclaration);
nested_holder!(RecordDeclaration);

macro_rules! into_data {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for DeclarationData {
            fn from(value: $ty) -> Self {
                DeclarationData::$variant(value)
            }
        }
    };
}

into_data!(VariableDeclaration, Variable);
into_data!(FunctionDeclaration, Function);
into_data!(NamespaceDeclaration, Namespace);
into_data!(IncludeDeclaration, Include);
into_data!(RecordDeclaration, Record);
into_data!(FieldDeclaration, Field);
into_data!(TypedefDeclaration, Typedef);
