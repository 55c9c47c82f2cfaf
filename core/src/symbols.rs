//! # Symbol Table
//!
//! Resolves type names for the classifier. Built in one pass over every parsed
//! file of the project, on top of a fixed table of base runtime library types.

use crate::parser::{CompilationUnit, TypeDeclKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Reference type (classes and records).
    Class,
    /// Value type (structs and record structs).
    Struct,
    /// Interface.
    Interface,
    /// Enumeration.
    Enum,
}

/// Where a symbol was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolOrigin {
    /// Base runtime library.
    Runtime,
    /// A source file of the analyzed project.
    Project,
}

/// A resolved named type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSymbol {
    /// Simple name.
    pub name: String,
    /// Type kind.
    pub kind: SymbolKind,
    /// True when the type exposes `GetEnumerator`.
    pub is_enumerable: bool,
    /// Declaration origin.
    pub origin: SymbolOrigin,
}

impl TypeSymbol {
    /// Structs and enums are value types.
    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, SymbolKind::Struct | SymbolKind::Enum)
    }
}

use SymbolKind::{Class, Interface, Struct};

/// Base runtime library types: name, kind, enumerable.
const RUNTIME_TYPES: &[(&str, SymbolKind, bool)] = &[
    // Keyword aliases
    ("bool", Struct, false),
    ("byte", Struct, false),
    ("sbyte", Struct, false),
    ("char", Struct, false),
    ("decimal", Struct, false),
    ("double", Struct, false),
    ("float", Struct, false),
    ("int", Struct, false),
    ("uint", Struct, false),
    ("long", Struct, false),
    ("ulong", Struct, false),
    ("short", Struct, false),
    ("ushort", Struct, false),
    ("nint", Struct, false),
    ("nuint", Struct, false),
    ("string", Class, true),
    ("object", Class, false),
    // Framework value types
    ("Boolean", Struct, false),
    ("Byte", Struct, false),
    ("SByte", Struct, false),
    ("Char", Struct, false),
    ("Decimal", Struct, false),
    ("Double", Struct, false),
    ("Single", Struct, false),
    ("Int16", Struct, false),
    ("UInt16", Struct, false),
    ("Int32", Struct, false),
    ("UInt32", Struct, false),
    ("Int64", Struct, false),
    ("UInt64", Struct, false),
    ("IntPtr", Struct, false),
    ("UIntPtr", Struct, false),
    ("DateTime", Struct, false),
    ("DateTimeOffset", Struct, false),
    ("DateOnly", Struct, false),
    ("TimeOnly", Struct, false),
    ("TimeSpan", Struct, false),
    ("Guid", Struct, false),
    ("Nullable", Struct, false),
    ("ValueTuple", Struct, false),
    ("KeyValuePair", Struct, false),
    // Framework reference types
    ("String", Class, true),
    ("Object", Class, false),
    ("Uri", Class, false),
    ("Version", Class, false),
    ("Array", Class, true),
    // Collections
    ("List", Class, true),
    ("Dictionary", Class, true),
    ("HashSet", Class, true),
    ("SortedSet", Class, true),
    ("Queue", Class, true),
    ("Stack", Class, true),
    ("LinkedList", Class, true),
    ("SortedList", Class, true),
    ("SortedDictionary", Class, true),
    ("Collection", Class, true),
    ("ObservableCollection", Class, true),
    ("ReadOnlyCollection", Class, true),
    ("ConcurrentDictionary", Class, true),
    ("ConcurrentBag", Class, true),
    ("ArrayList", Class, true),
    ("Hashtable", Class, true),
    // Collection interfaces
    ("IEnumerable", Interface, true),
    ("ICollection", Interface, false),
    ("IList", Interface, false),
    ("IReadOnlyCollection", Interface, false),
    ("IReadOnlyList", Interface, false),
    ("IDictionary", Interface, false),
    ("IReadOnlyDictionary", Interface, false),
    ("ISet", Interface, false),
    ("IEnumerator", Interface, false),
    ("IComparable", Interface, false),
    ("IDisposable", Interface, false),
];

/// Name-keyed table of known types.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    types: IndexMap<String, TypeSymbol>,
}

impl SymbolTable {
    /// A table holding only the base runtime library types.
    pub fn with_runtime() -> Self {
        let types = RUNTIME_TYPES
            .iter()
            .map(|&(name, kind, is_enumerable)| {
                (
                    name.to_string(),
                    TypeSymbol {
                        name: name.to_string(),
                        kind,
                        is_enumerable,
                        origin: SymbolOrigin::Runtime,
                    },
                )
            })
            .collect();
        Self { types }
    }

    /// Runtime types plus every type declared in `units`.
    pub fn from_units<'u>(units: impl IntoIterator<Item = &'u CompilationUnit>) -> Self {
        let mut table = Self::with_runtime();
        for unit in units {
            table.declare_unit(unit);
        }
        table
    }

    /// Records every type declared in `unit`, nested types included.
    ///
    /// A project type replaces a runtime type of the same name; repeated project
    /// declarations (partial types) merge.
    pub fn declare_unit(&mut self, unit: &CompilationUnit) {
        for decl in unit.all_types() {
            let kind = match decl.kind {
                TypeDeclKind::Class | TypeDeclKind::Record => SymbolKind::Class,
                TypeDeclKind::Struct | TypeDeclKind::RecordStruct => SymbolKind::Struct,
                TypeDeclKind::Interface => SymbolKind::Interface,
                TypeDeclKind::Enum => SymbolKind::Enum,
            };
            match self.types.get_mut(&decl.name) {
                Some(existing) if existing.origin == SymbolOrigin::Project => {
                    existing.is_enumerable |= decl.declares_enumerator;
                }
                _ => {
                    self.types.insert(
                        decl.name.clone(),
                        TypeSymbol {
                            name: decl.name.clone(),
                            kind,
                            is_enumerable: decl.declares_enumerator,
                            origin: SymbolOrigin::Project,
                        },
                    );
                }
            }
        }
    }

    /// Looks a type up by its simple name.
    pub fn lookup(&self, name: &str) -> Option<&TypeSymbol> {
        self.types.get(name)
    }

    /// Number of known types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when no type is known, not even runtime ones.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
