#![deny(missing_docs)]

//! # DTO Writer Core
//!
//! Core library for generating C# Data Transfer Objects from model classes.
//!
//! The pipeline is: parse the model file and its project siblings, classify
//! every property against the collected symbols, then emit one `XDto` class
//! per model class with `FromModel` / `ToModel` mapping methods.

/// Shared error types.
pub mod error;

/// Shared names and small string helpers.
pub mod constants;

/// C# front end.
pub mod parser;

/// Known types collected from the runtime and the project.
pub mod symbols;

/// Property type classification.
pub mod type_mapping;

/// Mapper strategies.
pub mod strategies;

/// Intermediate model.
pub mod model;

/// Source analysis.
pub mod analyzer;

/// User toggles.
pub mod options;

/// Code generation utilities.
pub mod codegen;

/// Attribute refactorings on existing DTO files.
pub mod patcher;

pub use analyzer::{analyze, analyze_sources, SourceFile};
pub use codegen::{cleanup_code_formatting, generate_source_code};
pub use error::{AppError, AppResult};
pub use model::{ClassInfo, ParsedModel, PropertyInfo};
pub use options::{ClassDefaults, ClassOptions, GenerationOptions};
pub use parser::parse_source;
pub use patcher::{add_property_attribute, remove_property_attribute, AttributeKind};
pub use strategies::{MapperStrategy, MappingLine, PropertyMapper};
pub use symbols::SymbolTable;
pub use type_mapping::{Classification, SymbolClassifier, TypeClassifier};
