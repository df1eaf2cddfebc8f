//! # cpgraph - Code Property Graph core
//!
//! Language-agnostic declaration graph and literal typing for source programs.
//!
//! cpgraph provides:
//! - Graph nodes with source metadata and arena-stable identity
//! - Property edges with ordered, contiguously indexed collections
//! - Declarations as a closed set of kinds with safe typed narrowing
//! - Translation units holding declarations, includes and namespaces
//! - Integer literal typing with exact promotion and arbitrary precision
//! - A frontend seam and a manager that translates files in parallel

pub mod location;
pub mod node;
pub mod edge;
pub mod types;
pub mod literal;
pub mod expression;
pub mod declaration;
pub mod graph;
pub mod translation_unit;
pub mod frontend;
pub mod manager;
pub mod config;

// Re-exports for convenient access
pub use node::{Node, NodeId};
pub use edge::{EdgeList, PropertyEdge, PropertyKey, PropertyValue};
pub use declaration::{DeclRef, Declaration, DeclarationHolder, DeclarationKind, DeclarationVariant};
pub use literal::{IntegerValue, LiteralTypeResolver, ResolvedLiteral};
pub use types::{IntegerType, TargetModel, Type};
pub use translation_unit::TranslationUnitDeclaration;
pub use manager::{TranslationManager, TranslationResult};

/// Result type alias for cpgraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cpgraph operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed literal: {0}")]
    MalformedLiteral(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Unknown declaration: {0}")]
    UnknownDeclaration(String),

    #[error("Not a declaration holder: {0}")]
    NotAHolder(String),

    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    #[error("Frontend error in {path}: {message}")]
    Frontend { path: String, message: String },

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
