#![deny(missing_docs)]

//! # Option Flags
//!
//! Command line toggles folded on top of an optional options file.

use crate::error::{CliError, CliResult};
use dto_writer_core::GenerationOptions;
use std::path::PathBuf;

/// Generation toggles shared by `generate` and `analyze`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// YAML or JSON options file applied before the flags below.
    #[clap(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Target namespace (default: `<model namespace>.Dto`).
    #[clap(long)]
    pub namespace: Option<String>,

    /// Attach `[JsonProperty("camelName")]` to every property.
    #[clap(long)]
    pub json_property: bool,

    /// Attach `[DataContract]` / `[DataMember]`.
    #[clap(long)]
    pub data_member: bool,

    /// Skip the static `FromModel` factory.
    #[clap(long)]
    pub no_from_model: bool,

    /// Skip the `ToModel` method.
    #[clap(long)]
    pub no_to_model: bool,

    /// Model class to leave out. Repeatable.
    #[clap(long, value_name = "CLASS")]
    pub exclude_class: Vec<String>,

    /// Property to leave out. Repeatable.
    #[clap(long, value_name = "CLASS.PROPERTY", value_parser = parse_class_property)]
    pub exclude_property: Vec<(String, String)>,
}

/// Splits `Class.Property`.
fn parse_class_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('.') {
        Some((class, prop)) if !class.is_empty() && !prop.is_empty() => {
            Ok((class.to_string(), prop.to_string()))
        }
        _ => Err(format!("expected CLASS.PROPERTY, found `{}`", s)),
    }
}

impl OptionArgs {
    /// Builds the options snapshot.
    pub fn resolve(&self) -> CliResult<GenerationOptions> {
        let mut opts = match &self.options {
            Some(path) => GenerationOptions::from_path(path).map_err(CliError::Core)?,
            None => GenerationOptions::default(),
        };

        if let Some(ns) = &self.namespace {
            opts.namespace = Some(ns.clone());
        }
        if self.json_property {
            opts.defaults.json_property = true;
        }
        if self.data_member {
            opts.defaults.data_member = true;
        }
        if self.no_from_model {
            opts.defaults.from_model = false;
        }
        if self.no_to_model {
            opts.defaults.to_model = false;
        }
        for class in &self.exclude_class {
            opts.class_mut(class).enabled = Some(false);
        }
        for (class, prop) in &self.exclude_property {
            opts.class_mut(class).disabled_properties.push(prop.clone());
        }
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class_property() {
        assert_eq!(
            parse_class_property("Person.Secret").unwrap(),
            ("Person".to_string(), "Secret".to_string())
        );
        assert!(parse_class_property("Person").is_err());
        assert!(parse_class_property(".Secret").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("opts.yaml");
        std::fs::write(&file, "namespace: FromFile\ndefaults:\n  to_model: true\n").unwrap();

        let args = OptionArgs {
            options: Some(file),
            namespace: Some("FromFlag".into()),
            no_to_model: true,
            exclude_class: vec!["Audit".into()],
            exclude_property: vec![("Person".into(), "Secret".into())],
            ..Default::default()
        };
        let opts = args.resolve().unwrap();
        assert_eq!(opts.namespace.as_deref(), Some("FromFlag"));
        assert!(!opts.defaults.to_model);
        assert!(opts.defaults.from_model);
        assert_eq!(opts.classes["Audit"].enabled, Some(false));
        assert_eq!(opts.classes["Person"].disabled_properties, vec!["Secret".to_string()]);
    }
}
