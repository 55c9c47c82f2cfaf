#![deny(missing_docs)]

//! # Attribute Command
//!
//! Adds or removes serialization attributes in an existing DTO file.

use crate::error::CliResult;
use dto_writer_core::{add_property_attribute, remove_property_attribute, AttributeKind};
use std::fs;
use std::path::PathBuf;

/// Whether to add or remove.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Add the attribute where missing.
    Add,
    /// Remove the attribute.
    Remove,
}

/// Attribute selector.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `[JsonProperty("camelName")]`
    Json,
    /// `[DataMember]` (with `[DataContract]` on the class)
    DataMember,
}

impl From<Kind> for AttributeKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Json => AttributeKind::Json,
            Kind::DataMember => AttributeKind::DataMember,
        }
    }
}

/// Arguments for the attribute command.
#[derive(clap::Args, Debug, Clone)]
pub struct AttributeArgs {
    /// Add or remove.
    #[clap(value_enum)]
    pub action: Action,

    /// DTO source file, rewritten in place.
    pub dto_file: PathBuf,

    /// Attribute to edit.
    #[clap(long, value_enum)]
    pub kind: Kind,

    /// DTO class name (must end with `Dto`).
    #[clap(long)]
    pub class: String,

    /// Single property to edit (default: every property of the class).
    #[clap(long)]
    pub property: Option<String>,
}

/// Executes the attribute command.
pub fn execute(args: &AttributeArgs) -> CliResult<()> {
    let source = fs::read_to_string(&args.dto_file)?;
    let kind = AttributeKind::from(args.kind);
    let property = args.property.as_deref();

    let patched = match args.action {
        Action::Add => add_property_attribute(&source, kind, &args.class, property)?,
        Action::Remove => remove_property_attribute(&source, kind, &args.class, property)?,
    };

    if patched == source {
        tracing::info!(path = %args.dto_file.display(), "nothing to change");
        return Ok(());
    }
    fs::write(&args.dto_file, patched)?;
    tracing::info!(path = %args.dto_file.display(), "updated DTO file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("UserDto.cs");
        let original = "namespace A.Dto\n{\n    public class UserDto\n    {\n        public int UserId { get; set; }\n    }\n}\n";
        fs::write(&file, original).unwrap();

        let mut args = AttributeArgs {
            action: Action::Add,
            dto_file: file.clone(),
            kind: Kind::DataMember,
            class: "UserDto".into(),
            property: None,
        };
        execute(&args).unwrap();
        let added = fs::read_to_string(&file).unwrap();
        assert!(added.contains("    [DataContract]\n    public class UserDto"));
        assert!(added.contains("        [DataMember]\n        public int UserId"));

        args.action = Action::Remove;
        execute(&args).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn test_non_dto_class_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("User.cs");
        fs::write(&file, "class User { public int X { get; set; } }").unwrap();
        let args = AttributeArgs {
            action: Action::Add,
            dto_file: file,
            kind: Kind::Json,
            class: "User".into(),
            property: None,
        };
        assert!(execute(&args).is_err());
    }
}
