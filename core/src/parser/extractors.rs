//! # Extractors
//!
//! Recursive-descent parser turning the token stream into [`CompilationUnit`].
//!
//! Declarations are parsed structurally down to property accessors. Everything
//! else (method bodies, initializers, base lists) is skipped by matching
//! delimiters, which is also where malformed input is detected.

use super::lexer::{tokenize, Token, TokenKind};
use super::models::{
    Accessor, AccessorKind, Attribute, AttributeList, CompilationUnit, NamespaceDecl,
    NamespaceMember, PathSegment, PropertyDecl, TupleElement, TypeDecl, TypeDeclKind, TypeRef,
};
use crate::error::{AppError, AppResult};

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "virtual", "override", "abstract",
    "sealed", "readonly", "new", "required", "partial", "async", "extern", "unsafe", "volatile",
    "const", "event", "implicit", "explicit", "fixed", "file", "ref",
];

const ENUMERATOR_METHOD: &str = "GetEnumerator";

/// Parses a C# source file.
///
/// # Examples
/// ```
/// use dto_writer_core::parser::parse_source;
///
/// let unit = parse_source("Person.cs", r#"
///     namespace Shop.Models
///     {
///         public class Person
///         {
///             public string Name { get; set; }
///             public int Age { get; private set; }
///         }
///     }
/// "#).unwrap();
/// assert_eq!(unit.first_namespace().unwrap().name, "Shop.Models");
/// let person = unit.top_level_types()[0];
/// assert_eq!(person.properties.len(), 2);
/// assert!(!person.properties[1].has_setter());
/// ```
pub fn parse_source(path: &str, src: &str) -> AppResult<CompilationUnit> {
    let tokens = tokenize(path, src)?;
    let mut parser = Parser {
        path,
        tokens,
        pos: 0,
        src_len: src.len(),
    };
    let mut unit = CompilationUnit::default();
    parser.namespace_body(&mut unit.members, Scope::CompilationUnit)?;
    Ok(unit)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    CompilationUnit,
    FileScopedNamespace,
    BlockNamespace,
}

struct Parser<'a> {
    path: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    src_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn at_punct(&self, p: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(p))
    }

    fn at_ident(&self, word: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident(word))
    }

    fn at_any_ident(&self) -> bool {
        self.peek().is_some_and(|t| t.kind == TokenKind::Ident)
    }

    fn advance(&mut self) -> Option<Token<'a>> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Byte offset of the next token, or end of input.
    fn offset(&self) -> usize {
        self.peek().map_or(self.src_len, |t| t.span.start)
    }

    /// Byte offset just past the previous token.
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.span.end)
    }

    fn error_at(&self, tok: Option<&Token>, message: impl Into<String>) -> AppError {
        let (line, column) = tok
            .or_else(|| self.tokens.last())
            .map_or((1, 1), |t| (t.line, t.column));
        AppError::Parse {
            path: self.path.to_string(),
            line,
            column,
            message: message.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> AppError {
        match self.peek() {
            Some(t) => self.error_at(Some(t), format!("expected {}, found '{}'", expected, t.text)),
            None => self.error_at(None, format!("expected {}, found end of file", expected)),
        }
    }

    fn expect_punct(&mut self, p: &str) -> AppResult<Token<'a>> {
        if self.at_punct(p) {
            self.advance().ok_or_else(|| self.unexpected(p))
        } else {
            Err(self.unexpected(&format!("'{}'", p)))
        }
    }

    fn expect_ident(&mut self, what: &str) -> AppResult<Token<'a>> {
        if self.at_any_ident() {
            self.advance().ok_or_else(|| self.unexpected(what))
        } else {
            Err(self.unexpected(what))
        }
    }

    // --- Namespaces ---

    fn namespace_body(
        &mut self,
        members: &mut Vec<NamespaceMember>,
        scope: Scope,
    ) -> AppResult<()> {
        loop {
            match self.peek() {
                None if scope == Scope::BlockNamespace => {
                    return Err(self.unexpected("'}' closing namespace"))
                }
                None => return Ok(()),
                Some(t) if t.is_punct("}") => {
                    if scope != Scope::BlockNamespace {
                        return Err(self.error_at(Some(t), "unexpected '}'"));
                    }
                    self.advance();
                    if self.at_punct(";") {
                        self.advance();
                    }
                    return Ok(());
                }
                Some(t) if t.is_punct(";") => {
                    self.advance();
                    continue;
                }
                _ => {}
            }

            if self.at_ident("global") && self.peek_nth(1).is_some_and(|t| t.is_ident("using")) {
                self.advance();
            }
            if self.at_ident("using") {
                self.skip_to_semicolon()?;
                continue;
            }
            if self.at_ident("extern") && self.peek_nth(1).is_some_and(|t| t.is_ident("alias")) {
                self.skip_to_semicolon()?;
                continue;
            }
            if self.at_ident("namespace") {
                let ns = self.namespace_decl()?;
                members.push(NamespaceMember::Namespace(ns));
                continue;
            }
            if self.at_punct("[") && self.is_global_attribute() {
                self.skip_group()?;
                continue;
            }

            let checkpoint = self.pos;
            let (attributes, member_start) = self.attribute_lists()?;
            let decl_start = self.offset();
            let modifiers = self.modifiers();

            if self.at_type_keyword() {
                let ty = self.type_decl(attributes, member_start, decl_start, modifiers)?;
                members.push(NamespaceMember::Type(ty));
            } else if self.at_ident("delegate") {
                self.skip_to_semicolon()?;
            } else if scope == Scope::CompilationUnit {
                // Top-level statements and local functions.
                self.pos = checkpoint;
                self.skip_statement()?;
            } else {
                return Err(self.unexpected("type declaration"));
            }
        }
    }

    fn is_global_attribute(&self) -> bool {
        self.peek_nth(1)
            .is_some_and(|t| t.is_ident("assembly") || t.is_ident("module"))
            && self.peek_nth(2).is_some_and(|t| t.is_punct(":"))
    }

    fn namespace_decl(&mut self) -> AppResult<NamespaceDecl> {
        self.expect_ident("'namespace'")?;
        let mut name = self.expect_ident("namespace name")?.text.to_string();
        while self.at_punct(".") {
            self.advance();
            name.push('.');
            name.push_str(self.expect_ident("namespace name")?.text);
        }

        let mut ns = NamespaceDecl {
            name,
            file_scoped: false,
            members: Vec::new(),
        };

        if self.at_punct(";") {
            self.advance();
            ns.file_scoped = true;
            self.namespace_body(&mut ns.members, Scope::FileScopedNamespace)?;
        } else {
            self.expect_punct("{")?;
            self.namespace_body(&mut ns.members, Scope::BlockNamespace)?;
        }
        Ok(ns)
    }

    // --- Types ---

    fn at_type_keyword(&self) -> bool {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Ident => match t.text {
                "class" | "struct" | "interface" | "enum" => true,
                "record" => self.peek_nth(1).is_some_and(|n| n.kind == TokenKind::Ident),
                _ => false,
            },
            _ => false,
        }
    }

    fn type_decl(
        &mut self,
        attributes: Vec<AttributeList>,
        member_start: usize,
        decl_start: usize,
        modifiers: Vec<String>,
    ) -> AppResult<TypeDecl> {
        let keyword = self.expect_ident("type keyword")?;
        let kind = match keyword.text {
            "class" => TypeDeclKind::Class,
            "struct" => TypeDeclKind::Struct,
            "interface" => TypeDeclKind::Interface,
            "enum" => TypeDeclKind::Enum,
            _ if self.at_ident("struct") => {
                self.advance();
                TypeDeclKind::RecordStruct
            }
            _ => {
                if self.at_ident("class") {
                    self.advance();
                }
                TypeDeclKind::Record
            }
        };

        let name = self.expect_ident("type name")?.text.to_string();
        if self.at_punct("<") {
            self.skip_angle()?;
        }

        let mut decl = TypeDecl {
            name,
            kind,
            attributes,
            properties: Vec::new(),
            nested: Vec::new(),
            declares_enumerator: false,
            member_start,
            decl_start,
        };

        if self.at_punct("(") {
            match kind {
                TypeDeclKind::Record | TypeDeclKind::RecordStruct => {
                    let writable = kind == TypeDeclKind::RecordStruct
                        && !modifiers.iter().any(|m| m == "readonly");
                    decl.properties = self.record_parameters(writable)?;
                }
                _ => self.skip_group()?,
            }
        }

        // Base list and constraint clauses.
        while !(self.at_punct("{") || self.at_punct(";")) {
            if self.peek().is_none() {
                return Err(self.unexpected(&format!("body of '{}'", decl.name)));
            }
            if self.at_punct("(") || self.at_punct("[") {
                self.skip_group()?;
            } else {
                self.advance();
            }
        }

        if self.at_punct(";") {
            self.advance();
            return Ok(decl);
        }

        if kind == TypeDeclKind::Enum {
            self.skip_group()?;
        } else {
            self.type_body(&mut decl)?;
        }
        if self.at_punct(";") {
            self.advance();
        }
        Ok(decl)
    }

    fn record_parameters(&mut self, writable: bool) -> AppResult<Vec<PropertyDecl>> {
        self.expect_punct("(")?;
        let mut props = Vec::new();
        if self.at_punct(")") {
            self.advance();
            return Ok(props);
        }
        loop {
            let (attributes, member_start) = self.attribute_lists()?;
            let decl_start = self.offset();
            while self.at_ident("params") || self.at_ident("in") || self.at_ident("ref") {
                self.advance();
            }
            let ty = self.parse_type()?;
            let name = self.expect_ident("parameter name")?.text.to_string();
            while !(self.at_punct(",") || self.at_punct(")")) {
                if self.peek().is_none() {
                    return Err(self.unexpected("')'"));
                }
                if self.at_punct("(") || self.at_punct("[") || self.at_punct("{") {
                    self.skip_group()?;
                } else {
                    self.advance();
                }
            }
            let second = if writable {
                AccessorKind::Set
            } else {
                AccessorKind::Init
            };
            props.push(PropertyDecl {
                name,
                ty,
                modifiers: vec!["public".into()],
                attributes,
                accessors: vec![
                    Accessor {
                        kind: AccessorKind::Get,
                        modifiers: Vec::new(),
                    },
                    Accessor {
                        kind: second,
                        modifiers: Vec::new(),
                    },
                ],
                member_start,
                decl_start,
            });
            if self.at_punct(",") {
                self.advance();
            } else {
                self.expect_punct(")")?;
                return Ok(props);
            }
        }
    }

    fn type_body(&mut self, decl: &mut TypeDecl) -> AppResult<()> {
        let open = self.expect_punct("{")?;
        loop {
            match self.peek() {
                None => {
                    return Err(self.error_at(
                        Some(&open),
                        format!("unclosed body of '{}'", decl.name),
                    ))
                }
                Some(t) if t.is_punct("}") => {
                    self.advance();
                    return Ok(());
                }
                Some(t) if t.is_punct(";") => {
                    self.advance();
                    continue;
                }
                _ => {}
            }

            let (attributes, member_start) = self.attribute_lists()?;
            let decl_start = self.offset();
            let modifiers = self.modifiers();

            if self.at_type_keyword() {
                let nested = self.type_decl(attributes, member_start, decl_start, modifiers)?;
                decl.nested.push(nested);
                continue;
            }
            if self.at_ident("delegate") {
                self.skip_to_semicolon()?;
                continue;
            }
            let is_constructor = self.peek().is_some_and(|t| t.text == decl.name)
                && self.peek_nth(1).is_some_and(|t| t.is_punct("("));
            if self.at_punct("~")
                || self.at_ident("operator")
                || is_constructor
                || modifiers.iter().any(|m| m == "event")
            {
                self.skip_member_rest()?;
                continue;
            }

            let ty = self.parse_type()?;
            if self.at_ident("operator") || self.at_ident("this") {
                self.skip_member_rest()?;
                continue;
            }

            let name = self.member_name()?;
            if self.at_ident("this") || self.at_ident("operator") {
                self.skip_member_rest()?;
                continue;
            }
            if self.at_punct("(") {
                if name == ENUMERATOR_METHOD {
                    decl.declares_enumerator = true;
                }
                self.skip_member_rest()?;
            } else if self.at_punct("{") {
                let accessors = self.accessor_list()?;
                if self.at_punct("=") {
                    self.skip_to_semicolon()?;
                }
                decl.properties.push(PropertyDecl {
                    name,
                    ty,
                    modifiers,
                    attributes,
                    accessors,
                    member_start,
                    decl_start,
                });
            } else if self.at_punct("=>") {
                self.skip_to_semicolon()?;
                decl.properties.push(PropertyDecl {
                    name,
                    ty,
                    modifiers,
                    attributes,
                    accessors: vec![Accessor {
                        kind: AccessorKind::Get,
                        modifiers: Vec::new(),
                    }],
                    member_start,
                    decl_start,
                });
            } else if self.at_punct("=")
                || self.at_punct(";")
                || self.at_punct(",")
                || self.at_punct("[")
            {
                self.skip_to_semicolon()?;
            } else {
                return Err(self.unexpected("member declaration"));
            }
        }
    }

    fn member_name(&mut self) -> AppResult<String> {
        let mut name = self.expect_ident("member name")?.text.to_string();
        loop {
            if self.at_punct("<") {
                self.skip_angle()?;
                if !self.at_punct(".") {
                    // Generic method parameters.
                    return Ok(name);
                }
            }
            if self.at_punct(".")
                && self
                    .peek_nth(1)
                    .is_some_and(|t| t.is_ident("this") || t.is_ident("operator"))
            {
                // Explicit interface indexer or operator; the caller skips it.
                self.advance();
                return Ok(name);
            }
            if self.at_punct(".") && self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::Ident)
            {
                self.advance();
                name = self.expect_ident("member name")?.text.to_string();
                continue;
            }
            return Ok(name);
        }
    }

    fn accessor_list(&mut self) -> AppResult<Vec<Accessor>> {
        self.expect_punct("{")?;
        let mut accessors = Vec::new();
        loop {
            if self.at_punct("}") {
                self.advance();
                return Ok(accessors);
            }
            self.attribute_lists()?;
            let modifiers = self.modifiers();
            let keyword = self.expect_ident("accessor")?;
            let kind = match keyword.text {
                "get" => AccessorKind::Get,
                "set" => AccessorKind::Set,
                "init" => AccessorKind::Init,
                other => {
                    return Err(self.error_at(
                        Some(&keyword),
                        format!("expected 'get', 'set' or 'init', found '{}'", other),
                    ))
                }
            };
            if self.at_punct(";") {
                self.advance();
            } else if self.at_punct("{") {
                self.skip_group()?;
            } else if self.at_punct("=>") {
                self.skip_to_semicolon()?;
            } else {
                return Err(self.unexpected("accessor body"));
            }
            accessors.push(Accessor { kind, modifiers });
        }
    }

    // --- Attributes & modifiers ---

    /// Parses consecutive attribute lists. Returns them with the offset where the member starts.
    fn attribute_lists(&mut self) -> AppResult<(Vec<AttributeList>, usize)> {
        let member_start = self.offset();
        let mut lists = Vec::new();
        while self.at_punct("[") {
            let open = self.expect_punct("[")?;
            if self.at_any_ident() && self.peek_nth(1).is_some_and(|t| t.is_punct(":")) {
                self.pos += 2;
            }
            let mut attributes = Vec::new();
            loop {
                if self.at_punct("]") {
                    break;
                }
                let start = self.offset();
                let mut name = self.expect_ident("attribute name")?.text.to_string();
                while self.at_punct(".") || self.at_punct("::") {
                    let sep = self.advance().map(|t| t.text).unwrap_or(".");
                    name.push_str(sep);
                    name.push_str(self.expect_ident("attribute name")?.text);
                }
                if self.at_punct("<") {
                    self.skip_angle()?;
                }
                if self.at_punct("(") {
                    self.skip_group()?;
                }
                attributes.push(Attribute {
                    name,
                    span: start..self.prev_end(),
                });
                if self.at_punct(",") {
                    self.advance();
                } else {
                    break;
                }
            }
            let close = self.expect_punct("]").map_err(|_| {
                self.error_at(Some(&open), "unclosed attribute list")
            })?;
            lists.push(AttributeList {
                span: open.span.start..close.span.end,
                attributes,
            });
        }
        Ok((lists, member_start))
    }

    fn modifiers(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(tok) = self.peek() {
            if tok.kind == TokenKind::Ident
                && MODIFIERS.contains(&tok.text)
                && self.peek_nth(1).is_some_and(|n| n.kind == TokenKind::Ident || n.is_punct("("))
            {
                out.push(tok.text.to_string());
                self.advance();
            } else {
                break;
            }
        }
        out
    }

    // --- Types ---

    /// Parses a type reference.
    fn parse_type(&mut self) -> AppResult<TypeRef> {
        let mut ty = if self.at_punct("(") {
            self.advance();
            let mut elements = Vec::new();
            loop {
                let ty = self.parse_type()?;
                let name = if self.at_any_ident() {
                    self.advance().map(|t| t.text.to_string())
                } else {
                    None
                };
                elements.push(TupleElement { ty, name });
                if self.at_punct(",") {
                    self.advance();
                    continue;
                }
                self.expect_punct(")")?;
                break;
            }
            TypeRef::Tuple { elements }
        } else {
            if self.at_ident("global") && self.peek_nth(1).is_some_and(|t| t.is_punct("::")) {
                self.pos += 2;
            }
            let mut segments = Vec::new();
            loop {
                let name = self.expect_ident("type")?.text.to_string();
                let args = if self.at_punct("<") {
                    self.type_arguments()?
                } else {
                    Vec::new()
                };
                segments.push(PathSegment { name, args });
                let separated = self.at_punct(".") || self.at_punct("::");
                if separated && self.peek_nth(1).is_some_and(|t| t.kind == TokenKind::Ident) {
                    self.advance();
                    continue;
                }
                break;
            }
            TypeRef::Named { segments }
        };

        loop {
            if self.at_punct("?") {
                self.advance();
                ty = TypeRef::Nullable {
                    inner: Box::new(ty),
                };
            } else if self.at_punct("*") {
                self.advance();
                ty = TypeRef::Pointer {
                    inner: Box::new(ty),
                };
            } else if self.at_punct("[")
                && self
                    .peek_nth(1)
                    .is_some_and(|t| t.is_punct("]") || t.is_punct(","))
            {
                self.advance();
                let mut rank = 1;
                while self.at_punct(",") {
                    self.advance();
                    rank += 1;
                }
                self.expect_punct("]")?;
                ty = TypeRef::Array {
                    element: Box::new(ty),
                    rank,
                };
            } else {
                return Ok(ty);
            }
        }
    }

    fn type_arguments(&mut self) -> AppResult<Vec<TypeRef>> {
        self.expect_punct("<")?;
        let mut args = Vec::new();
        loop {
            if self.at_punct(",") {
                // Unbound generic, e.g. `Dictionary<,>`.
                self.advance();
                continue;
            }
            if self.at_punct(">") {
                self.advance();
                return Ok(args);
            }
            args.push(self.parse_type()?);
            if self.at_punct(",") {
                self.advance();
            } else {
                self.expect_punct(">")?;
                return Ok(args);
            }
        }
    }

    // --- Skipping ---

    /// Skips a balanced `(...)`, `[...]` or `{...}` group starting at the current token.
    fn skip_group(&mut self) -> AppResult<()> {
        let mut stack: Vec<Token<'a>> = Vec::new();
        loop {
            let Some(tok) = self.advance() else {
                let open = stack.last();
                return Err(self.error_at(
                    open,
                    format!("unclosed '{}'", open.map_or("?", |t| t.text)),
                ));
            };
            match tok.text {
                "(" | "[" | "{" if tok.kind == TokenKind::Punct => stack.push(tok),
                ")" | "]" | "}" if tok.kind == TokenKind::Punct => {
                    let Some(open) = stack.pop() else {
                        return Err(self.error_at(Some(&tok), format!("unexpected '{}'", tok.text)));
                    };
                    let expected = match open.text {
                        "(" => ")",
                        "[" => "]",
                        _ => "}",
                    };
                    if tok.text != expected {
                        return Err(self.error_at(
                            Some(&tok),
                            format!(
                                "mismatched '{}', expected '{}' to close line {}",
                                tok.text, expected, open.line
                            ),
                        ));
                    }
                    if stack.is_empty() {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    fn skip_angle(&mut self) -> AppResult<()> {
        let open = self.expect_punct("<")?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Some(t) if t.is_punct("<") => depth += 1,
                Some(t) if t.is_punct(">") => depth -= 1,
                Some(t) if t.is_punct("(") || t.is_punct("[") => {
                    self.pos -= 1;
                    self.skip_group()?;
                }
                Some(t) if t.is_punct("{") || t.is_punct(";") || t.is_punct("}") => {
                    return Err(self.error_at(Some(&t), "malformed generic argument list"))
                }
                Some(_) => {}
                None => return Err(self.error_at(Some(&open), "unclosed '<'")),
            }
        }
        Ok(())
    }

    /// Skips to and over the next `;` at nesting depth zero.
    fn skip_to_semicolon(&mut self) -> AppResult<()> {
        loop {
            match self.peek() {
                None => return Err(self.unexpected("';'")),
                Some(t) if t.is_punct(";") => {
                    self.advance();
                    return Ok(());
                }
                Some(t) if t.is_punct("(") || t.is_punct("[") || t.is_punct("{") => {
                    self.skip_group()?
                }
                Some(t) if t.is_punct(")") || t.is_punct("]") || t.is_punct("}") => {
                    return Err(self.error_at(Some(t), format!("unexpected '{}'", t.text)))
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Skips the remainder of a method-like member: up to a `;`, a block body, or an
    /// expression body.
    fn skip_member_rest(&mut self) -> AppResult<()> {
        loop {
            match self.peek() {
                None => return Err(self.unexpected("member body")),
                Some(t) if t.is_punct(";") => {
                    self.advance();
                    return Ok(());
                }
                Some(t) if t.is_punct("=>") => return self.skip_to_semicolon(),
                Some(t) if t.is_punct("{") => return self.skip_group(),
                Some(t) if t.is_punct("(") || t.is_punct("[") => self.skip_group()?,
                Some(t) if t.is_punct(")") || t.is_punct("]") || t.is_punct("}") => {
                    return Err(self.error_at(Some(t), format!("unexpected '{}'", t.text)))
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn skip_statement(&mut self) -> AppResult<()> {
        if self.at_punct("{") {
            self.skip_group()
        } else {
            self.skip_member_rest()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_type(src: &str) -> TypeDecl {
        let unit = parse_source("test.cs", src).unwrap();
        unit.top_level_types()[0].clone()
    }

    #[test]
    fn test_person_properties() {
        let ty = only_type(
            r#"
            using System;
            using System.Collections.Generic;

            namespace Shop.Models
            {
                [Serializable]
                public class Person
                {
                    private readonly int _cache = 42;

                    public Person() { Name = "x"; }

                    public string Name { get; set; }
                    public int Age { get; private set; }
                    public List<Address> Addresses { get; set; } = new List<Address>();
                    public string Display => $"{Name} ({Age})";

                    public override string ToString() { return Name; }
                }
            }
            "#,
        );
        assert_eq!(ty.name, "Person");
        assert_eq!(ty.kind, TypeDeclKind::Class);
        assert_eq!(ty.attributes[0].attributes[0].name, "Serializable");

        let names: Vec<_> = ty.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Age", "Addresses", "Display"]);
        assert!(ty.properties[0].has_setter());
        assert!(!ty.properties[1].has_setter());
        assert_eq!(ty.properties[2].ty.to_string(), "List<Address>");
        assert!(!ty.properties[3].has_setter());
    }

    #[test]
    fn test_usings_and_namespace() {
        let unit = parse_source(
            "t.cs",
            "global using System;\nusing static System.Math;\nusing Json = Newtonsoft.Json;\nnamespace A.B { namespace C { class D {} } }",
        )
        .unwrap();
        assert_eq!(unit.first_namespace().unwrap().name, "A.B");
        assert_eq!(unit.top_level_types()[0].name, "D");
    }

    #[test]
    fn test_file_scoped_namespace() {
        let unit = parse_source(
            "t.cs",
            "namespace Shop.Models;\n\npublic class A { public int X { get; set; } }\npublic class B { }",
        )
        .unwrap();
        let ns = unit.first_namespace().unwrap();
        assert!(ns.file_scoped);
        assert_eq!(ns.name, "Shop.Models");
        assert_eq!(unit.top_level_types().len(), 2);
    }

    #[test]
    fn test_type_shapes() {
        let ty = only_type(
            r#"namespace N { class T {
                public int[] Scores { get; set; }
                public string[,] Grid { get; set; }
                public int? Maybe { get; set; }
                public (int Id, string Name) Pair { get; set; }
                public global::System.Collections.Generic.Dictionary<string, List<int>> Map { get; set; }
            } }"#,
        );
        let tys: Vec<String> = ty.properties.iter().map(|p| p.ty.to_string()).collect();
        assert_eq!(
            tys,
            vec![
                "int[]",
                "string[,]",
                "int?",
                "(int, string)",
                "System.Collections.Generic.Dictionary<string, List<int>>",
            ]
        );
    }

    #[test]
    fn test_skips_non_property_members() {
        let ty = only_type(
            r#"namespace N {
            public class Bag : IEnumerable<int>, IDisposable where T : class, new()
            {
                public event EventHandler Changed;
                public event EventHandler Other { add { } remove { } }
                public int this[int i] { get { return i; } }
                public static Bag operator +(Bag a, Bag b) => a;
                public static implicit operator int(Bag b) => 0;
                ~Bag() { }
                public T Get<T>() where T : new() { return new T(); }
                IEnumerator IEnumerable.GetEnumerator() => null;
                int IFoo.Size { get { return 0; } }
                public delegate void Handler(int x);
                private fixed byte _buf[16];
                public Func<int, int> Square = x => { return x * x; };
                public int Count { get; set; }
                public class Inner { public int Z { get; set; } }
                public enum Kind : byte { A, B = 2 }
            }
            }"#,
        );
        let names: Vec<_> = ty.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Size", "Count"]);
        assert!(ty.declares_enumerator);
        assert_eq!(ty.nested.len(), 2);
        assert_eq!(ty.nested[0].properties[0].name, "Z");
        assert_eq!(ty.nested[1].kind, TypeDeclKind::Enum);
    }

    #[test]
    fn test_skips_explicit_interface_indexer() {
        let ty = only_type(
            "namespace N { class A : IList<int> { int IList<int>.this[int i] { get { return 0; } set { } } \
             public int Count { get; set; } public string Name { get; set; } } }",
        );
        let names: Vec<_> = ty.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Count", "Name"]);
    }

    #[test]
    fn test_conditional_base_list() {
        let ty = only_type(
            "namespace N {\n#if NETFRAMEWORK\n class A : MarshalByRefObject {\n#else\n class A {\n#endif\n public int Id { get; set; } } }",
        );
        assert_eq!(ty.name, "A");
        assert_eq!(ty.properties[0].name, "Id");
    }

    #[test]
    fn test_record_positional_parameters() {
        let unit = parse_source(
            "t.cs",
            "namespace N; public record Person(string Name, int Age = 3); public record struct Point(int X, int Y) { public int Z { get; init; } }",
        )
        .unwrap();
        let types = unit.top_level_types();
        assert_eq!(types[0].kind, TypeDeclKind::Record);
        assert_eq!(types[0].properties.len(), 2);
        assert!(!types[0].properties[0].has_setter());
        assert_eq!(types[1].kind, TypeDeclKind::RecordStruct);
        assert!(types[1].properties[0].has_setter());
        assert_eq!(types[1].properties[2].name, "Z");
        assert!(!types[1].properties[2].has_setter());
    }

    #[test]
    fn test_named_tuple_elements() {
        let ty = only_type(
            "namespace N { class A { public (int Id, string) Pair { get; set; } public List<(int X, int Y)> Points { get; set; } } }",
        );
        let TypeRef::Tuple { elements } = &ty.properties[0].ty else {
            panic!("expected tuple, got {:?}", ty.properties[0].ty);
        };
        assert_eq!(elements[0].name.as_deref(), Some("Id"));
        assert_eq!(elements[1].name, None);
        assert_eq!(ty.properties[1].ty.to_string(), "List<(int X, int Y)>");
    }

    #[test]
    fn test_generic_class_parameters() {
        let ty = only_type(
            "namespace N { public class Page<TItem, in TKey> where TItem : class { public TItem Item { get; set; } } }",
        );
        assert_eq!(ty.name, "Page");
        assert_eq!(ty.properties[0].ty.to_string(), "TItem");
    }

    #[test]
    fn test_top_level_statements_are_skipped() {
        let unit = parse_source(
            "Program.cs",
            "using System;\nvar app = Build(args);\nif (app != null) { app.Run(); } else { return; }\nstatic int Build(string[] a) { return 0; }\nclass Helper { }",
        )
        .unwrap();
        assert!(unit.first_namespace().is_none());
        assert_eq!(unit.top_level_types()[0].name, "Helper");
    }

    #[test]
    fn test_property_spans() {
        let src = "namespace N {\n    class A\n    {\n        [DataMember]\n        public int X { get; set; }\n    }\n}";
        let unit = parse_source("t.cs", src).unwrap();
        let prop = &unit.top_level_types()[0].properties[0];
        assert_eq!(&src[prop.attributes[0].span.clone()], "[DataMember]");
        assert_eq!(&src[prop.decl_start..prop.decl_start + 6], "public");
        assert_eq!(prop.member_start, prop.attributes[0].span.start);
    }

    #[test]
    fn test_unclosed_class_is_error() {
        let err = parse_source("bad.cs", "namespace N { public class A { public int X { get; set; }")
            .unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }), "{err}");
    }

    #[test]
    fn test_mismatched_delimiters_is_error() {
        let err = parse_source("bad.cs", "namespace N { class A { void F() { (] } } }").unwrap_err();
        match err {
            AppError::Parse { message, .. } => assert!(message.contains("mismatched"), "{message}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_garbage_in_namespace_is_error() {
        assert!(parse_source("bad.cs", "namespace N { int x = 5; }").is_err());
        assert!(parse_source("bad.cs", "namespace N { } }").is_err());
    }

    #[test]
    fn test_bad_accessor_is_error() {
        assert!(parse_source("bad.cs", "namespace N { class A { int X { fetch; } } }").is_err());
    }
}
