//! # Source Analyzer
//!
//! Turns a selected model file plus its sibling project files into a
//! [`ParsedModel`]. Siblings are only used to resolve property types.

use crate::error::{AppError, AppResult};
use crate::model::{ClassInfo, ParsedModel, PropertyInfo};
use crate::parser::{parse_source, CompilationUnit, PropertyDecl, TypeDeclKind};
use crate::strategies::MapperStrategy;
use crate::symbols::SymbolTable;
use crate::type_mapping::{SymbolClassifier, TypeClassifier};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A file path with its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Where the text came from.
    pub path: PathBuf,
    /// Raw contents.
    pub text: String,
}

impl SourceFile {
    /// Wraps in-memory text.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Reads a file from disk.
    pub fn read(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Ok(Self::new(path, text))
    }

    /// Parses the contents.
    pub fn parse(&self) -> AppResult<CompilationUnit> {
        parse_source(&self.path.display().to_string(), &self.text)
    }
}

/// Analyzes `selected` against its project siblings.
///
/// Siblings are read and parsed on the rayon pool. After every read and every
/// parse the shared counter is incremented and `on_progress` receives the new
/// value, so a full run reports `2 * others.len()` steps. The callback may be
/// invoked from any worker thread.
pub fn analyze<P, F>(selected: impl AsRef<Path>, others: &[P], on_progress: F) -> AppResult<ParsedModel>
where
    P: AsRef<Path> + Sync,
    F: Fn(usize) + Sync,
{
    let selected = SourceFile::read(selected)?;
    let selected_unit = selected.parse()?;

    let progress = AtomicUsize::new(0);
    let step = || on_progress(progress.fetch_add(1, Ordering::SeqCst) + 1);

    let siblings = others
        .par_iter()
        .map(|path| -> AppResult<CompilationUnit> {
            let file = SourceFile::read(path)?;
            step();
            let unit = file.parse()?;
            step();
            tracing::debug!(path = %file.path.display(), "parsed sibling");
            Ok(unit)
        })
        .collect::<AppResult<Vec<_>>>()?;

    build_model(&selected.path, &selected_unit, &siblings)
}

/// In-memory variant of [`analyze`] without progress reporting.
pub fn analyze_sources(selected: SourceFile, others: Vec<SourceFile>) -> AppResult<ParsedModel> {
    let selected_unit = selected.parse()?;
    let siblings = others
        .par_iter()
        .map(SourceFile::parse)
        .collect::<AppResult<Vec<_>>>()?;
    build_model(&selected.path, &selected_unit, &siblings)
}

fn build_model(
    path: &Path,
    unit: &CompilationUnit,
    siblings: &[CompilationUnit],
) -> AppResult<ParsedModel> {
    let namespace = unit
        .first_namespace()
        .ok_or_else(|| AppError::MissingNamespace(path.display().to_string()))?;

    let symbols = SymbolTable::from_units(std::iter::once(unit).chain(siblings));
    let classifier = SymbolClassifier::new(&symbols);

    let classes: Vec<ClassInfo> = unit
        .top_level_types()
        .into_iter()
        .filter(|decl| decl.kind == TypeDeclKind::Class)
        .map(|decl| {
            let properties = decl
                .properties
                .iter()
                .map(|prop| property_info(&classifier, &decl.name, prop))
                .collect();
            ClassInfo::new(decl.name.clone(), properties)
        })
        .collect();

    tracing::info!(
        path = %path.display(),
        namespace = %namespace.name,
        classes = classes.len(),
        known_types = symbols.len(),
        "analyzed model file"
    );

    Ok(ParsedModel::new(namespace.name.clone(), classes))
}

fn property_info(classifier: &impl TypeClassifier, class: &str, prop: &PropertyDecl) -> PropertyInfo {
    let has_setter = prop.has_setter();
    let c = classifier.classify(&prop.name, &prop.ty, has_setter);

    if c.mapper.strategy == MapperStrategy::Unknown {
        tracing::warn!(
            class,
            property = %prop.name,
            ty = %prop.ty,
            "no mapping for property type, emitting TODO"
        );
    } else {
        tracing::debug!(class, property = %prop.name, ty = %prop.ty, strategy = ?c.mapper.strategy, "classified");
    }

    PropertyInfo {
        name: prop.name.clone(),
        ty: prop.ty.clone(),
        type_name: c.type_name,
        has_setter,
        is_enumerable_type: c.is_enumerable,
        is_generic_type: c.is_generic,
        is_enabled: true,
        mapper: c.mapper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, text: &str) -> SourceFile {
        SourceFile::new(path, text)
    }

    #[test]
    fn test_namespaces_and_classes() {
        let model = analyze_sources(
            file(
                "Person.cs",
                "namespace Shop.Models { public class Person { public string Name { get; set; } public int Age { get; set; } } public enum Kind { A } public record Tag(string Value); }",
            ),
            vec![],
        )
        .unwrap();
        assert_eq!(model.model_namespace, "Shop.Models");
        assert_eq!(model.namespace, "Shop.Models.Dto");
        let names: Vec<_> = model.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Person"]);
        let props: Vec<_> = model.classes[0].properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(props, ["Name", "Age"]);
    }

    #[test]
    fn test_sibling_types_resolve() {
        let model = analyze_sources(
            file(
                "Person.cs",
                "namespace Shop { class Person { public Address Home { get; set; } public Color Favourite { get; set; } } }",
            ),
            vec![
                file("Address.cs", "namespace Shop { class Address { } }"),
                file("Color.cs", "namespace Shop { enum Color { Red } }"),
            ],
        )
        .unwrap();
        let props = &model.classes[0].properties;
        assert_eq!(props[0].type_name, "AddressDto");
        assert_eq!(props[1].mapper.strategy, MapperStrategy::Simple);
    }

    #[test]
    fn test_without_siblings_project_types_are_unknown() {
        let model = analyze_sources(
            file("Person.cs", "namespace Shop { class Person { public Address Home { get; set; } } }"),
            vec![],
        )
        .unwrap();
        assert_eq!(model.classes[0].properties[0].mapper.strategy, MapperStrategy::Unknown);
    }

    #[test]
    fn test_nested_classes_are_not_analyzed() {
        let model = analyze_sources(
            file(
                "Outer.cs",
                "namespace N { class Outer { public Inner Child { get; set; } public class Inner { public int X { get; set; } } } }",
            ),
            vec![],
        )
        .unwrap();
        assert_eq!(model.classes.len(), 1);
        assert_eq!(model.classes[0].properties[0].type_name, "InnerDto");
    }

    #[test]
    fn test_setter_detection() {
        let model = analyze_sources(
            file(
                "A.cs",
                "namespace N { class A { public int B { get; set; } public int C { get; private set; } public int D { get; init; } public int E => 1; } }",
            ),
            vec![],
        )
        .unwrap();
        let setters: Vec<_> = model.classes[0].properties.iter().map(|p| p.has_setter).collect();
        assert_eq!(setters, [true, false, false, false]);
    }

    #[test]
    fn test_missing_namespace() {
        let err = analyze_sources(file("Loose.cs", "class A { }"), vec![]).unwrap_err();
        assert!(matches!(err, AppError::MissingNamespace(ref p) if p == "Loose.cs"));
    }

    #[test]
    fn test_sibling_parse_error_aborts() {
        let err = analyze_sources(
            file("A.cs", "namespace N { class A { } }"),
            vec![file("Broken.cs", "namespace N { class B { ")],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Parse { ref path, .. } if path == "Broken.cs"));
    }
}
