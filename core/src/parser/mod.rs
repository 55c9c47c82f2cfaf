//! # Parser Module
//!
//! Front end for C# source files: a lexer, a declaration-level
//! recursive-descent parser, and the syntax models they produce.

pub mod extractors;
pub mod lexer;
pub mod models;
mod preprocessor;

pub use extractors::parse_source;
pub use models::{
    Accessor, AccessorKind, Attribute, AttributeList, CompilationUnit, NamespaceDecl,
    NamespaceMember, PathSegment, PropertyDecl, TupleElement, TypeDecl, TypeDeclKind, TypeRef,
};
