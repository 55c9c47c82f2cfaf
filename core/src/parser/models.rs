//! # Syntax Models
//!
//! Syntax tree produced by the parser. Only the parts the generator and the
//! patcher care about are modelled; method bodies and initializers are skipped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// One segment of a (possibly qualified) type name, e.g. `List<int>` in
/// `System.Collections.Generic.List<int>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Identifier.
    pub name: String,
    /// Generic arguments, empty when not generic.
    pub args: Vec<TypeRef>,
}

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// A named type; the last segment is the type itself, earlier ones are qualifiers.
    Named {
        /// Qualifier segments followed by the type segment.
        segments: Vec<PathSegment>,
    },
    /// `T[]`, `T[,]`.
    Array {
        /// Element type.
        element: Box<TypeRef>,
        /// Number of dimensions.
        rank: usize,
    },
    /// `T?`.
    Nullable {
        /// Underlying type.
        inner: Box<TypeRef>,
    },
    /// `(A, B)` or `(A Id, B Name)`.
    Tuple {
        /// Elements in declaration order.
        elements: Vec<TupleElement>,
    },
    /// `T*`.
    Pointer {
        /// Pointee type.
        inner: Box<TypeRef>,
    },
}

/// One element of a tuple type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleElement {
    /// Element type.
    pub ty: TypeRef,
    /// Element name, when the tuple names it.
    pub name: Option<String>,
}

impl TupleElement {
    fn render(&self, ty: String) -> String {
        match &self.name {
            Some(name) => format!("{ty} {name}"),
            None => ty,
        }
    }
}

impl TypeRef {
    /// Builds an unqualified, non-generic named type.
    pub fn named(name: &str) -> Self {
        TypeRef::Named {
            segments: vec![PathSegment {
                name: name.to_string(),
                args: Vec::new(),
            }],
        }
    }

    /// The last path segment of a named type.
    pub fn last_segment(&self) -> Option<&PathSegment> {
        match self {
            TypeRef::Named { segments } => segments.last(),
            _ => None,
        }
    }

    /// Renders the type without its namespace qualifiers.
    pub fn unqualified(&self) -> String {
        match self {
            TypeRef::Named { segments } => match segments.last() {
                Some(last) => fmt_segment(last),
                None => String::new(),
            },
            TypeRef::Array { element, rank } => {
                format!("{}[{}]", element.unqualified(), ",".repeat(rank.saturating_sub(1)))
            }
            TypeRef::Nullable { inner } => format!("{}?", inner.unqualified()),
            TypeRef::Tuple { elements } => {
                let parts: Vec<String> = elements
                    .iter()
                    .map(|e| e.render(e.ty.unqualified()))
                    .collect();
                format!("({})", parts.join(", "))
            }
            TypeRef::Pointer { inner } => format!("{}*", inner.unqualified()),
        }
    }
}

fn fmt_segment(segment: &PathSegment) -> String {
    if segment.args.is_empty() {
        segment.name.clone()
    } else {
        let args: Vec<String> = segment.args.iter().map(ToString::to_string).collect();
        format!("{}<{}>", segment.name, args.join(", "))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { segments } => {
                let parts: Vec<String> = segments.iter().map(fmt_segment).collect();
                write!(f, "{}", parts.join("."))
            }
            TypeRef::Array { element, rank } => {
                write!(f, "{}[{}]", element, ",".repeat(rank.saturating_sub(1)))
            }
            TypeRef::Nullable { inner } => write!(f, "{}?", inner),
            TypeRef::Tuple { elements } => {
                let parts: Vec<String> =
                    elements.iter().map(|e| e.render(e.ty.to_string())).collect();
                write!(f, "({})", parts.join(", "))
            }
            TypeRef::Pointer { inner } => write!(f, "{}*", inner),
        }
    }
}

/// A single attribute inside an attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Name as written (`DataMember`, `Newtonsoft.Json.JsonProperty`).
    pub name: String,
    /// Byte range of the attribute (name and arguments).
    pub span: Range<usize>,
}

impl Attribute {
    /// Matches `name`, `nameAttribute` and their qualified forms.
    pub fn is(&self, name: &str) -> bool {
        let simple = self.name.rsplit('.').next().unwrap_or(&self.name);
        simple == name || simple.strip_suffix("Attribute") == Some(name)
    }
}

/// A bracketed attribute list, `[A, B(...)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeList {
    /// Byte range from `[` to `]` inclusive.
    pub span: Range<usize>,
    /// Attributes in the list.
    pub attributes: Vec<Attribute>,
}

/// Kind of a property accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// `get`
    Get,
    /// `set`
    Set,
    /// `init`
    Init,
}

/// One accessor of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// get / set / init.
    pub kind: AccessorKind,
    /// Accessibility modifiers on the accessor (`private`, `protected`, ...).
    pub modifiers: Vec<String>,
}

/// A property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Member modifiers.
    pub modifiers: Vec<String>,
    /// Attribute lists preceding the declaration.
    pub attributes: Vec<AttributeList>,
    /// Declared accessors. `=> expr` properties get a single implicit `get`.
    pub accessors: Vec<Accessor>,
    /// Byte offset of the first attribute, or of `decl_start` when there are none.
    pub member_start: usize,
    /// Byte offset of the first modifier (or of the type).
    pub decl_start: usize,
}

impl PropertyDecl {
    /// True when the property has a `set` accessor that is not `private`.
    pub fn has_setter(&self) -> bool {
        self.accessors.iter().any(|a| {
            a.kind == AccessorKind::Set && !a.modifiers.iter().any(|m| m == "private")
        })
    }

    /// True if any attribute list carries `name`.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|l| l.attributes.iter().any(|a| a.is(name)))
    }
}

/// Declaration keyword of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDeclKind {
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// `record` / `record class`
    Record,
    /// `record struct`
    RecordStruct,
}

/// A type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Type name without generic parameters.
    pub name: String,
    /// Declaration keyword.
    pub kind: TypeDeclKind,
    /// Attribute lists preceding the declaration.
    pub attributes: Vec<AttributeList>,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDecl>,
    /// Types declared inside this one.
    pub nested: Vec<TypeDecl>,
    /// True if the type declares a `GetEnumerator` method.
    pub declares_enumerator: bool,
    /// Byte offset of the first attribute, or of `decl_start` when there are none.
    pub member_start: usize,
    /// Byte offset of the first modifier (or of the keyword).
    pub decl_start: usize,
}

/// An item directly inside a namespace or the compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceMember {
    /// A nested namespace.
    Namespace(NamespaceDecl),
    /// A type declaration.
    Type(TypeDecl),
}

/// A namespace declaration (block or file-scoped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Dotted name.
    pub name: String,
    /// True for `namespace X;`.
    pub file_scoped: bool,
    /// Members in source order.
    pub members: Vec<NamespaceMember>,
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompilationUnit {
    /// Top level members in source order.
    pub members: Vec<NamespaceMember>,
}

impl CompilationUnit {
    /// The first namespace declaration in source order (outermost first).
    pub fn first_namespace(&self) -> Option<&NamespaceDecl> {
        self.members.iter().find_map(|m| match m {
            NamespaceMember::Namespace(ns) => Some(ns),
            NamespaceMember::Type(_) => None,
        })
    }

    /// Type declarations that are not nested in another type, in source order,
    /// across every namespace level.
    pub fn top_level_types(&self) -> Vec<&TypeDecl> {
        let mut out = Vec::new();
        collect_top_level(&self.members, &mut out);
        out
    }

    /// Every type declaration including nested ones.
    pub fn all_types(&self) -> Vec<&TypeDecl> {
        let mut out = Vec::new();
        for ty in self.top_level_types() {
            collect_nested(ty, &mut out);
        }
        out
    }
}

fn collect_top_level<'a>(members: &'a [NamespaceMember], out: &mut Vec<&'a TypeDecl>) {
    for member in members {
        match member {
            NamespaceMember::Namespace(ns) => collect_top_level(&ns.members, out),
            NamespaceMember::Type(ty) => out.push(ty),
        }
    }
}

fn collect_nested<'a>(ty: &'a TypeDecl, out: &mut Vec<&'a TypeDecl>) {
    out.push(ty);
    for inner in &ty.nested {
        collect_nested(inner, out);
    }
}
