//! Declaration holders and typed declaration access
//!
//! Holders own an ordered collection of edges to their declarations.
//! Typed lookups narrow a declaration to one payload type through
//! [`DeclarationVariant`] and hand out [`DeclRef`]s, which compare by
//! identity.

use super::{
    Declaration, DeclarationData, DeclarationKind, FieldDeclaration, FunctionDeclaration,
    IncludeDeclaration, NamespaceDeclaration, RecordDeclaration, TypedefDeclaration,
    VariableDeclaration,
};
use crate::edge::EdgeList;
use crate::node::NodeId;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// Anything that owns an ordered collection of declarations.
pub trait DeclarationHolder {
    /// The `declarations` collection, in `INDEX` order
    fn declaration_edges(&self) -> &EdgeList;

    /// Register a declaration. Registering the same id again is a no-op.
    fn add_declaration(&mut self, id: NodeId, kind: DeclarationKind);
}

/// A payload type a [`Declaration`] can be narrowed to.
pub trait DeclarationVariant {
    fn narrow(declaration: &Declaration) -> Option<&Self>;
}

/// Every declaration narrows to `Declaration`.
impl DeclarationVariant for Declaration {
    fn narrow(declaration: &Declaration) -> Option<&Self> {
        Some(declaration)
    }
}

macro_rules! variant {
    ($ty:ty, $variant:ident) => {
        impl DeclarationVariant for $ty {
            fn narrow(declaration: &Declaration) -> Option<&Self> {
                match &declaration.data {
                    DeclarationData::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

variant!(VariableDeclaration, Variable);
variant!(FunctionDeclaration, Function);
variant!(NamespaceDeclaration, Namespace);
variant!(IncludeDeclaration, Include);
variant!(RecordDeclaration, Record);
variant!(FieldDeclaration, Field);
variant!(TypedefDeclaration, Typedef);

/// A declaration narrowed to `T`, together with its identity.
#[derive(Debug)]
pub struct DeclRef<'a, T: ?Sized> {
    pub id: NodeId,
    pub declaration: &'a Declaration,
    pub variant: &'a T,
}

impl<'a, T: DeclarationVariant> DeclRef<'a, T> {
    /// Narrow `declaration`, `None` on kind mismatch
    pub fn narrow(declaration: &'a Declaration) -> Option<Self> {
        T::narrow(declaration).map(|variant| Self {
            id: declaration.id(),
            declaration,
            variant,
        })
    }
}

impl<'a, T: ?Sized> DeclRef<'a, T> {
    pub fn name(&self) -> &'a str {
        &self.declaration.node.name
    }
}

impl<T: ?Sized> Clone for DeclRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for DeclRef<'_, T> {}

impl<T: ?Sized> Deref for DeclRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.variant
    }
}

impl<T: ?Sized> PartialEq for DeclRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: ?Sized> Eq for DeclRef<'_, T> {}

impl<T: ?Sized> Hash for DeclRef<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
