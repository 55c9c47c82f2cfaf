#![deny(missing_docs)]

//! # Code Patching
//!
//! Adds or removes serialization attributes on the properties of an existing
//! DTO class. Edits are byte-span splices into the original text, so
//! formatting and comments outside the touched attribute lists survive
//! unchanged.

use crate::constants::{attribute, to_lower_camel_case, DTO_SUFFIX};
use crate::error::{AppError, AppResult};
use crate::parser::{parse_source, AttributeList, PropertyDecl, TypeDecl, TypeDeclKind};
use std::ops::Range;

/// Path reported in parse errors for patched text.
const SOURCE_LABEL: &str = "<dto source>";

/// Property attributes the patcher manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// `[JsonProperty("camelName")]`
    Json,
    /// `[DataMember]`, paired with `[DataContract]` on the class.
    DataMember,
}

impl AttributeKind {
    /// Attribute name as matched in source.
    pub fn name(self) -> &'static str {
        match self {
            AttributeKind::Json => attribute::JSON_PROPERTY,
            AttributeKind::DataMember => attribute::DATA_MEMBER,
        }
    }

    fn render(self, property: &str) -> String {
        match self {
            AttributeKind::Json => format!("[{}(\"{}\")]", self.name(), to_lower_camel_case(property)),
            AttributeKind::DataMember => format!("[{}]", self.name()),
        }
    }
}

/// A pending replacement of `range` by `text`.
struct Edit {
    range: Range<usize>,
    text: String,
}

/// Adds `kind` to `property` of DTO class `class`, or to every property of the
/// class lacking it when `property` is `None`.
///
/// Adding `DataMember` also adds `[DataContract]` to the class if absent.
///
/// # Examples
/// ```
/// use dto_writer_core::patcher::{add_property_attribute, AttributeKind};
///
/// let src = "class UserDto\n{\n    public int UserId { get; set; }\n}\n";
/// let out = add_property_attribute(src, AttributeKind::Json, "UserDto", None).unwrap();
/// assert_eq!(
///     out,
///     "class UserDto\n{\n    [JsonProperty(\"userId\")]\n    public int UserId { get; set; }\n}\n"
/// );
/// ```
pub fn add_property_attribute(
    source: &str,
    kind: AttributeKind,
    class: &str,
    property: Option<&str>,
) -> AppResult<String> {
    let unit = parse_source(SOURCE_LABEL, source)?;
    let decl = find_dto_class(&unit.all_types(), class)?;
    let targets = target_properties(decl, property)?;

    let mut edits: Vec<Edit> = targets
        .iter()
        .filter(|p| !p.has_attribute(kind.name()))
        .map(|p| Edit {
            range: p.decl_start..p.decl_start,
            text: format!("{}\n{}", kind.render(&p.name), line_indent(source, p.decl_start)),
        })
        .collect();

    if kind == AttributeKind::DataMember
        && !edits.is_empty()
        && !lists_contain(&decl.attributes, attribute::DATA_CONTRACT)
    {
        edits.push(Edit {
            range: decl.decl_start..decl.decl_start,
            text: format!(
                "[{}]\n{}",
                attribute::DATA_CONTRACT,
                line_indent(source, decl.decl_start)
            ),
        });
    }

    tracing::debug!(class, attribute = kind.name(), edits = edits.len(), "adding attributes");
    Ok(apply_edits(source, edits))
}

/// Removes `kind` from `property` of DTO class `class`, or from every property
/// of the class when `property` is `None`.
///
/// Only the matching attribute is dropped from a combined list such as
/// `[DataMember, JsonProperty("x")]`. Removing the last `DataMember` of the
/// class also removes `[DataContract]`.
pub fn remove_property_attribute(
    source: &str,
    kind: AttributeKind,
    class: &str,
    property: Option<&str>,
) -> AppResult<String> {
    let unit = parse_source(SOURCE_LABEL, source)?;
    let decl = find_dto_class(&unit.all_types(), class)?;
    let targets = target_properties(decl, property)?;

    let mut edits: Vec<Edit> = targets
        .iter()
        .flat_map(|p| removal_edits(source, &p.attributes, kind.name()))
        .collect();

    if kind == AttributeKind::DataMember && !edits.is_empty() {
        let still_used = decl.properties.iter().any(|p| {
            !targets.iter().any(|t| t.name == p.name) && p.has_attribute(attribute::DATA_MEMBER)
        });
        if !still_used {
            edits.extend(removal_edits(source, &decl.attributes, attribute::DATA_CONTRACT));
        }
    }

    tracing::debug!(class, attribute = kind.name(), edits = edits.len(), "removing attributes");
    Ok(apply_edits(source, edits))
}

fn find_dto_class<'a>(types: &[&'a TypeDecl], class: &str) -> AppResult<&'a TypeDecl> {
    let is_dto = class.len() >= DTO_SUFFIX.len()
        && class
            .get(class.len() - DTO_SUFFIX.len()..)
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case(DTO_SUFFIX));
    if !is_dto {
        return Err(AppError::NotFound(format!(
            "'{}' is not a DTO class (name must end with '{}')",
            class, DTO_SUFFIX
        )));
    }
    types
        .iter()
        .copied()
        .find(|t| t.kind == TypeDeclKind::Class && t.name == class)
        .ok_or_else(|| AppError::NotFound(format!("class '{}'", class)))
}

fn target_properties<'a>(decl: &'a TypeDecl, property: Option<&str>) -> AppResult<Vec<&'a PropertyDecl>> {
    match property {
        None => Ok(decl.properties.iter().collect()),
        Some(name) => decl
            .properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| vec![p])
            .ok_or_else(|| AppError::NotFound(format!("property '{}.{}'", decl.name, name))),
    }
}

fn lists_contain(lists: &[AttributeList], name: &str) -> bool {
    lists.iter().any(|l| l.attributes.iter().any(|a| a.is(name)))
}

/// Edits removing every attribute called `name` from `lists`.
fn removal_edits(source: &str, lists: &[AttributeList], name: &str) -> Vec<Edit> {
    let mut edits = Vec::new();
    for list in lists {
        let keep = list.attributes.iter().filter(|a| !a.is(name)).count();
        if keep == list.attributes.len() {
            continue;
        }
        if keep == 0 {
            edits.push(Edit {
                range: whole_list_range(source, &list.span),
                text: String::new(),
            });
            continue;
        }
        // Rebuild combined lists from the surviving attributes.
        let kept: Vec<&str> = list
            .attributes
            .iter()
            .filter(|a| !a.is(name))
            .map(|a| &source[a.span.clone()])
            .collect();
        edits.push(Edit {
            range: list.span.clone(),
            text: format!("[{}]", kept.join(", ")),
        });
    }
    edits
}

/// Span of an attribute list including its own line when nothing else is on it,
/// or the trailing blanks when the declaration continues on the same line.
fn whole_list_range(source: &str, span: &Range<usize>) -> Range<usize> {
    let bytes = source.as_bytes();
    let line_start = source[..span.start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let mut end = span.end;
    while end < bytes.len() && (bytes[end] == b' ' || bytes[end] == b'\t') {
        end += 1;
    }
    let alone = source[line_start..span.start].trim().is_empty();
    if alone && source[end..].starts_with("\r\n") {
        line_start..end + 2
    } else if alone && source[end..].starts_with('\n') {
        line_start..end + 1
    } else {
        span.start..end
    }
}

/// Leading whitespace of the line containing `pos`.
fn line_indent(source: &str, pos: usize) -> &str {
    let line_start = source[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &source[line_start..];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));
    let mut out = source.to_string();
    for edit in edits {
        out.replace_range(edit.range, &edit.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = r#"namespace Shop.Dto
{
    public class PersonDto
    {
        public string Name { get; set; }

        [JsonProperty("age")]
        public int Age { get; set; }
    }
}
"#;

    #[test]
    fn test_add_json_to_class() {
        let out = add_property_attribute(PERSON, AttributeKind::Json, "PersonDto", None).unwrap();
        let expected = r#"namespace Shop.Dto
{
    public class PersonDto
    {
        [JsonProperty("name")]
        public string Name { get; set; }

        [JsonProperty("age")]
        public int Age { get; set; }
    }
}
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn test_add_data_member_adds_contract() {
        let out =
            add_property_attribute(PERSON, AttributeKind::DataMember, "PersonDto", Some("Age")).unwrap();
        let expected = r#"namespace Shop.Dto
{
    [DataContract]
    public class PersonDto
    {
        public string Name { get; set; }

        [JsonProperty("age")]
        [DataMember]
        public int Age { get; set; }
    }
}
"#;
        assert_eq!(out, expected);

        // A second pass only adds to the remaining property.
        let again = add_property_attribute(&out, AttributeKind::DataMember, "PersonDto", None).unwrap();
        assert_eq!(again.matches("[DataContract]").count(), 1);
        assert_eq!(again.matches("[DataMember]").count(), 2);
    }

    #[test]
    fn test_remove_from_combined_list() {
        let src = "[DataContract]\nclass ADto\n{\n    [DataMember, JsonProperty(\"x\")]\n    public int X { get; set; }\n    [DataMember]\n    public int Y { get; set; }\n}\n";

        let out = remove_property_attribute(src, AttributeKind::DataMember, "ADto", Some("X")).unwrap();
        assert_eq!(
            out,
            "[DataContract]\nclass ADto\n{\n    [JsonProperty(\"x\")]\n    public int X { get; set; }\n    [DataMember]\n    public int Y { get; set; }\n}\n"
        );

        let out = remove_property_attribute(&out, AttributeKind::DataMember, "ADto", Some("Y")).unwrap();
        assert_eq!(
            out,
            "class ADto\n{\n    [JsonProperty(\"x\")]\n    public int X { get; set; }\n    public int Y { get; set; }\n}\n"
        );
    }

    #[test]
    fn test_remove_last_in_list() {
        let src = "class ADto { [JsonProperty(\"x\"), DataMember] public int X { get; set; } }";
        let out = remove_property_attribute(src, AttributeKind::DataMember, "ADto", None).unwrap();
        assert_eq!(out, "class ADto { [JsonProperty(\"x\")] public int X { get; set; } }");
    }

    #[test]
    fn test_remove_inline_list() {
        let src = "class ADto { [JsonProperty(\"x\")] public int X { get; set; } }";
        let out = remove_property_attribute(src, AttributeKind::Json, "ADto", None).unwrap();
        assert_eq!(out, "class ADto { public int X { get; set; } }");
    }

    #[test]
    fn test_only_dto_classes() {
        let src = "class Person { public int X { get; set; } }";
        let err = add_property_attribute(src, AttributeKind::Json, "Person", None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let src = "class PersonDTO { public int X { get; set; } }";
        assert!(add_property_attribute(src, AttributeKind::Json, "PersonDTO", None).is_ok());
    }

    #[test]
    fn test_missing_targets() {
        let err = add_property_attribute(PERSON, AttributeKind::Json, "OtherDto", None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err =
            remove_property_attribute(PERSON, AttributeKind::Json, "PersonDto", Some("Nope")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("PersonDto.Nope")));
    }

    #[test]
    fn test_noop_keeps_text() {
        let out = remove_property_attribute(PERSON, AttributeKind::DataMember, "PersonDto", None).unwrap();
        assert_eq!(out, PERSON);
    }
}
