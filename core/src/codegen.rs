#![deny(missing_docs)]

//! # Code Generation
//!
//! Emits the DTO compilation unit for a [`ParsedModel`].
//!
//! Text is produced in a pretty-printer layout (4-space indent, braces on
//! their own lines, accessors one per line) and then normalized by
//! [`cleanup_code_formatting`], which compresses auto-property bodies and
//! strips whitespace artifacts. The result only depends on the model, so
//! repeated calls give byte-identical output.

use crate::constants::{attribute, to_lower_camel_case, using, FROM_MODEL_METHOD, FROM_MODEL_PARAM, TO_MODEL_METHOD};
use crate::model::{ClassInfo, ParsedModel, PropertyInfo};
use crate::strategies::MappingLine;
use regex::{Captures, Regex};
use std::sync::OnceLock;

const INDENT: &str = "    ";

/// Generates the source of every enabled DTO class in `model`.
pub fn generate_source_code(model: &ParsedModel) -> String {
    let mut code = String::new();

    for import in usings(model) {
        code.push_str(&format!("using {};\n", import));
    }
    code.push('\n');

    code.push_str(&format!("namespace {}\n{{\n", model.namespace));
    let classes: Vec<String> = model.enabled_classes().map(class_block).collect();
    code.push_str(&classes.join("\n"));
    code.push_str("}\n");

    let code = cleanup_code_formatting(&code);
    tracing::info!(
        namespace = %model.namespace,
        classes = classes.len(),
        bytes = code.len(),
        "generated DTO source"
    );
    code
}

/// Imports needed by the enabled parts of `model`, `System` first.
fn usings(model: &ParsedModel) -> Vec<String> {
    let enabled_props = || model.enabled_classes().flat_map(ClassInfo::enabled_properties);

    let mut imports = vec![using::SYSTEM.to_string()];
    let mut add = |name: &str| {
        if !imports.iter().any(|i| i == name) {
            imports.push(name.to_string());
        }
    };

    if enabled_props().any(|p| p.is_generic_type) {
        add(using::SYSTEM_COLLECTIONS_GENERIC);
    }
    if enabled_props().any(|p| p.is_enumerable_type) {
        add(using::SYSTEM_LINQ);
    }
    if model.enabled_classes().any(|c| c.need_data_member_property_attribute) {
        add(using::SYSTEM_RUNTIME_SERIALIZATION);
    }
    if model.enabled_classes().any(|c| c.need_json_property_attribute) {
        add(using::NEWTONSOFT_JSON);
    }
    if !model.namespace.starts_with(&model.model_namespace) {
        add(model.model_namespace.as_str());
    }
    imports
}

/// Appends `text` at `depth` levels of indentation.
fn push_line(out: &mut String, depth: usize, text: &str) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(text);
    out.push('\n');
}

fn class_block(class: &ClassInfo) -> String {
    let mut members: Vec<String> = class
        .enabled_properties()
        .map(|p| property_block(class, p))
        .collect();
    if class.need_from_model_method {
        members.push(from_model_block(class));
    }
    if class.need_to_model_method {
        members.push(to_model_block(class));
    }

    let mut out = String::new();
    if class.need_data_member_property_attribute {
        push_line(&mut out, 1, &format!("[{}]", attribute::DATA_CONTRACT));
    }
    push_line(&mut out, 1, &format!("public class {}", class.dto_name()));
    push_line(&mut out, 1, "{");
    out.push_str(&members.join("\n"));
    push_line(&mut out, 1, "}");
    out
}

fn property_block(class: &ClassInfo, prop: &PropertyInfo) -> String {
    let mut out = String::new();
    if class.need_data_member_property_attribute {
        push_line(&mut out, 2, &format!("[{}]", attribute::DATA_MEMBER));
    }
    if class.need_json_property_attribute {
        push_line(
            &mut out,
            2,
            &format!("[{}(\"{}\")]", attribute::JSON_PROPERTY, to_lower_camel_case(&prop.name)),
        );
    }
    push_line(&mut out, 2, &format!("public {} {}", prop.dto_type(), prop.name));
    push_line(&mut out, 2, "{");
    push_line(&mut out, 3, "get;");
    push_line(&mut out, 3, if prop.has_setter { "set;" } else { "private set;" });
    push_line(&mut out, 2, "}");
    out
}

fn from_model_block(class: &ClassInfo) -> String {
    let dto = class.dto_name();
    let lines: Vec<MappingLine> = class
        .enabled_properties()
        .map(|p| p.mapper.from_model_mapping())
        .collect();

    let mut out = String::new();
    push_line(
        &mut out,
        2,
        &format!(
            "public static {} {}({} {})",
            dto, FROM_MODEL_METHOD, class.name, FROM_MODEL_PARAM
        ),
    );
    push_line(&mut out, 2, "{");
    push_initializer(&mut out, &dto, &lines);
    push_line(&mut out, 2, "}");
    out
}

fn to_model_block(class: &ClassInfo) -> String {
    let lines: Vec<MappingLine> = class
        .enabled_properties()
        .filter_map(|p| p.mapper.to_model_mapping())
        .collect();

    let mut out = String::new();
    push_line(&mut out, 2, &format!("public {} {}()", class.name, TO_MODEL_METHOD));
    push_line(&mut out, 2, "{");
    push_initializer(&mut out, &class.name, &lines);
    push_line(&mut out, 2, "}");
    out
}

/// `return new T { ... };` inside a method body.
fn push_initializer(out: &mut String, ty: &str, lines: &[MappingLine]) {
    if lines.is_empty() {
        push_line(out, 3, &format!("return new {} {{ }};", ty));
        return;
    }
    push_line(out, 3, &format!("return new {}", ty));
    push_line(out, 3, "{");
    for line in lines {
        push_line(out, 4, &line.to_string());
    }
    push_line(out, 3, "};");
}

/// Normalizes emitted C# text.
///
/// - `{ get; set; }` and `{ get; private set; }` bodies spread over several
///   lines are joined onto the declaration line.
/// - Whitespace before `;` and `,` is removed, as is trailing whitespace.
/// - Blank lines directly after `{` or before `}` are dropped and other runs
///   of blank lines collapse to one.
/// - The result ends with exactly one newline.
///
/// `\r\n` input is normalized to `\n`. The function is idempotent.
///
/// # Examples
/// ```
/// use dto_writer_core::codegen::cleanup_code_formatting;
///
/// let raw = "public int Age\n{\n    get;\n    private set;\n}\n\n\n";
/// assert_eq!(cleanup_code_formatting(raw), "public int Age { get; private set; }\n");
/// ```
pub fn cleanup_code_formatting(code: &str) -> String {
    static ACCESSORS_RE: OnceLock<Regex> = OnceLock::new();
    let accessors_re = ACCESSORS_RE.get_or_init(|| {
        Regex::new(r"[ \t]*\r?\n[ \t]*\{\s*get;\s*(private\s+)?set;\s*\}").expect("Invalid regex")
    });

    static SPACE_BEFORE_PUNCT_RE: OnceLock<Regex> = OnceLock::new();
    let space_before_punct_re =
        SPACE_BEFORE_PUNCT_RE.get_or_init(|| Regex::new(r"[ \t]+([;,])").expect("Invalid regex"));

    static TRAILING_WS_RE: OnceLock<Regex> = OnceLock::new();
    let trailing_ws_re =
        TRAILING_WS_RE.get_or_init(|| Regex::new(r"(?m)[ \t]+$").expect("Invalid regex"));

    static BLANK_AFTER_OPEN_RE: OnceLock<Regex> = OnceLock::new();
    let blank_after_open_re = BLANK_AFTER_OPEN_RE
        .get_or_init(|| Regex::new(r"\{\n(?:[ \t]*\n)+").expect("Invalid regex"));

    static BLANK_BEFORE_CLOSE_RE: OnceLock<Regex> = OnceLock::new();
    let blank_before_close_re = BLANK_BEFORE_CLOSE_RE
        .get_or_init(|| Regex::new(r"\n(?:[ \t]*\n)+([ \t]*\})").expect("Invalid regex"));

    static BLANK_RUN_RE: OnceLock<Regex> = OnceLock::new();
    let blank_run_re = BLANK_RUN_RE.get_or_init(|| Regex::new(r"\n{3,}").expect("Invalid regex"));

    let code = code.replace("\r\n", "\n");
    let code = accessors_re.replace_all(&code, |caps: &Captures| {
        if caps.get(1).is_some() {
            " { get; private set; }".to_string()
        } else {
            " { get; set; }".to_string()
        }
    });
    let code = space_before_punct_re.replace_all(&code, "$1");
    let code = trailing_ws_re.replace_all(&code, "");
    let code = blank_after_open_re.replace_all(&code, "{\n");
    let code = blank_before_close_re.replace_all(&code, "\n$1");
    let code = blank_run_re.replace_all(&code, "\n\n");

    let mut out = code.trim_end().to_string();
    out.push('\n');
    out
}
