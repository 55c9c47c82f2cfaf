//! # Type Mapping
//!
//! Decides how each model property maps to its DTO counterpart: the mapper
//! strategy, the DTO-side type name and the shape flags that drive imports.

use crate::constants::{is_simple_type_name, DTO_SUFFIX};
use crate::parser::{PathSegment, TypeRef};
use crate::strategies::{MapperStrategy, PropertyMapper};
use crate::symbols::{SymbolKind, SymbolTable, TypeSymbol};

/// Outcome of classifying one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Mapper for the property.
    pub mapper: PropertyMapper,
    /// DTO-side type name, empty when unchanged.
    pub type_name: String,
    /// Array or enumerable type.
    pub is_enumerable: bool,
    /// Constructed generic type.
    pub is_generic: bool,
}

impl Classification {
    fn new(name: &str, has_setter: bool, strategy: MapperStrategy) -> Self {
        Self {
            mapper: PropertyMapper::new(name, has_setter, strategy),
            type_name: String::new(),
            is_enumerable: false,
            is_generic: false,
        }
    }

    fn with_type_name(mut self, type_name: String) -> Self {
        self.type_name = type_name;
        self
    }

    fn with_flags(mut self, is_enumerable: bool, is_generic: bool) -> Self {
        self.is_enumerable = is_enumerable;
        self.is_generic = is_generic;
        self
    }
}

/// Trait for choosing a property's mapping.
pub trait TypeClassifier {
    /// Classifies property `name` of declared type `ty`.
    fn classify(&self, name: &str, ty: &TypeRef, has_setter: bool) -> Classification;
}

/// Classifier resolving names against a [`SymbolTable`].
pub struct SymbolClassifier<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> SymbolClassifier<'a> {
    /// Creates a classifier over `symbols`.
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }
}

/// A type reference after name resolution.
enum Resolved<'t> {
    /// A known named type.
    Named {
        symbol: &'t TypeSymbol,
        segment: &'t PathSegment,
    },
    /// `Nullable<T>` over a value type, or a tuple.
    ValueWrapper,
    /// An array.
    Array { element: &'t TypeRef },
    /// Not resolvable.
    Unresolved,
}

impl<'a> SymbolClassifier<'a> {
    fn resolve<'t>(&'t self, ty: &'t TypeRef) -> Resolved<'t> {
        match ty {
            TypeRef::Named { .. } => match ty.last_segment() {
                Some(segment) => match self.symbols.lookup(&segment.name) {
                    Some(symbol) => Resolved::Named { symbol, segment },
                    None => Resolved::Unresolved,
                },
                None => Resolved::Unresolved,
            },
            TypeRef::Nullable { inner } => match self.resolve(inner) {
                Resolved::Named { symbol, .. } if symbol.is_value_type() => Resolved::ValueWrapper,
                // `T?` on a reference type is only an annotation.
                other => other,
            },
            TypeRef::Tuple { .. } => Resolved::ValueWrapper,
            TypeRef::Array { element, .. } => Resolved::Array { element },
            TypeRef::Pointer { .. } => Resolved::Unresolved,
        }
    }
}

/// Simple name of a generic argument, ignoring qualifiers and `?`.
fn element_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Nullable { inner } => element_name(inner),
        TypeRef::Named { .. } => ty
            .last_segment()
            .map(|s| s.name.clone())
            .unwrap_or_default(),
        other => other.unqualified(),
    }
}

impl TypeClassifier for SymbolClassifier<'_> {
    fn classify(&self, name: &str, ty: &TypeRef, has_setter: bool) -> Classification {
        let unknown = || Classification::new(name, has_setter, MapperStrategy::Unknown);

        match self.resolve(ty) {
            Resolved::ValueWrapper => Classification::new(name, has_setter, MapperStrategy::Simple),

            Resolved::Named { symbol, segment } => {
                let is_generic = !segment.args.is_empty();
                let is_simple = symbol.is_value_type()
                    || symbol.kind == SymbolKind::Interface
                    || symbol.name.eq_ignore_ascii_case("object")
                    || symbol.name.eq_ignore_ascii_case("string");

                if is_simple {
                    return Classification::new(name, has_setter, MapperStrategy::Simple);
                }

                if symbol.is_enumerable {
                    if !symbol.name.eq_ignore_ascii_case("List") {
                        // Only `List<T>` gets per-item handling.
                        return unknown().with_flags(true, is_generic);
                    }
                    let Some(arg) = segment.args.first() else {
                        return unknown().with_flags(true, false);
                    };
                    let arg_name = element_name(arg);
                    if is_simple_type_name(&arg_name) {
                        return Classification::new(
                            name,
                            has_setter,
                            MapperStrategy::SimpleGenericList,
                        )
                        .with_type_name(format!("List<{}>", arg.unqualified()))
                        .with_flags(true, true);
                    }
                    let element_dto = format!("{}{}", arg_name, DTO_SUFFIX);
                    return Classification::new(
                        name,
                        has_setter,
                        MapperStrategy::List {
                            element_dto: element_dto.clone(),
                        },
                    )
                    .with_type_name(format!("List<{}>", element_dto))
                    .with_flags(true, true);
                }

                let dto_type = format!("{}{}", symbol.name, DTO_SUFFIX);
                Classification::new(
                    name,
                    has_setter,
                    MapperStrategy::Class {
                        dto_type: dto_type.clone(),
                    },
                )
                .with_type_name(dto_type)
                .with_flags(false, is_generic)
            }

            Resolved::Array { element } => {
                let simple = match self.resolve(element) {
                    Resolved::ValueWrapper => Some(true),
                    Resolved::Named { symbol, .. } => Some(
                        symbol.is_value_type() || symbol.name.to_lowercase().contains("string"),
                    ),
                    Resolved::Array { .. } | Resolved::Unresolved => None,
                };
                match simple {
                    Some(true) => Classification::new(name, has_setter, MapperStrategy::SimpleArray)
                        .with_flags(true, false),
                    Some(false) => {
                        let element_dto = format!("{}{}", element_name(element), DTO_SUFFIX);
                        Classification::new(
                            name,
                            has_setter,
                            MapperStrategy::Array {
                                element_dto: element_dto.clone(),
                            },
                        )
                        .with_type_name(format!("{}[]", element_dto))
                        .with_flags(true, false)
                    }
                    None => unknown().with_flags(true, false),
                }
            }

            Resolved::Unresolved => unknown(),
        }
    }
}
