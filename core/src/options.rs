//! # Generation Options
//!
//! User toggles applied to an analyzed model before generation. The options
//! are an immutable snapshot: [`GenerationOptions::apply`] returns a new model
//! and never touches the analyzer's output.
//!
//! ```yaml
//! namespace: Shop.Api.Contracts
//! defaults:
//!   json_property: true
//! classes:
//!   Person:
//!     to_model: false
//!     disabled_properties: [PasswordHash]
//!   AuditEntry:
//!     enabled: false
//! ```

use crate::error::{AppError, AppResult};
use crate::model::ParsedModel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Flags applied to every class unless overridden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassDefaults {
    /// Emit `FromModel`.
    pub from_model: bool,
    /// Emit `ToModel`.
    pub to_model: bool,
    /// Attach `[JsonProperty]`.
    pub json_property: bool,
    /// Attach `[DataContract]` / `[DataMember]`.
    pub data_member: bool,
}

impl Default for ClassDefaults {
    fn default() -> Self {
        Self {
            from_model: true,
            to_model: true,
            json_property: false,
            data_member: false,
        }
    }
}

/// Overrides for a single class. Unset fields fall back to [`ClassDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassOptions {
    /// Emit a DTO for the class.
    pub enabled: Option<bool>,
    /// Emit `FromModel`.
    pub from_model: Option<bool>,
    /// Emit `ToModel`.
    pub to_model: Option<bool>,
    /// Attach `[JsonProperty]`.
    pub json_property: Option<bool>,
    /// Attach `[DataContract]` / `[DataMember]`.
    pub data_member: Option<bool>,
    /// Properties left out of the DTO.
    pub disabled_properties: Vec<String>,
}

/// Complete set of user toggles for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationOptions {
    /// Target namespace, replacing `<ModelNamespace>.Dto`.
    pub namespace: Option<String>,
    /// Class-level defaults.
    pub defaults: ClassDefaults,
    /// Per-class overrides keyed by model class name.
    pub classes: IndexMap<String, ClassOptions>,
}

impl GenerationOptions {
    /// Loads options from a `.yaml`/`.yml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(AppError::Config(format!(
                "Unsupported options file '{}': expected .yaml, .yml or .json",
                path.display()
            ))),
        }
    }

    /// Parses YAML options.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse options YAML: {}", e)))
    }

    /// Parses JSON options.
    pub fn from_json_str(content: &str) -> AppResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse options JSON: {}", e)))
    }

    /// Overrides for `class`, created on first use.
    pub fn class_mut(&mut self, class: &str) -> &mut ClassOptions {
        self.classes.entry(class.to_string()).or_default()
    }

    /// Returns a copy of `model` with these toggles applied.
    ///
    /// Options naming classes or properties the model does not have are
    /// logged and otherwise ignored.
    pub fn apply(&self, model: &ParsedModel) -> ParsedModel {
        let mut out = model.clone();
        if let Some(namespace) = &self.namespace {
            out.namespace = namespace.clone();
        }

        for (name, class_opts) in &self.classes {
            match model.class(name) {
                None => tracing::warn!(class = %name, "options refer to an unknown class"),
                Some(class) => {
                    for prop in &class_opts.disabled_properties {
                        if !class.properties.iter().any(|p| &p.name == prop) {
                            tracing::warn!(class = %name, property = %prop, "options refer to an unknown property");
                        }
                    }
                }
            }
        }

        let d = &self.defaults;
        for class in &mut out.classes {
            let overrides = self.classes.get(&class.name);
            let pick = |f: fn(&ClassOptions) -> Option<bool>, default: bool| {
                overrides.and_then(f).unwrap_or(default)
            };

            class.is_enabled = pick(|o| o.enabled, class.is_enabled);
            class.need_from_model_method = pick(|o| o.from_model, d.from_model);
            class.need_to_model_method = pick(|o| o.to_model, d.to_model);
            class.need_json_property_attribute = pick(|o| o.json_property, d.json_property);
            class.need_data_member_property_attribute = pick(|o| o.data_member, d.data_member);

            if let Some(o) = overrides {
                for prop in &mut class.properties {
                    if o.disabled_properties.contains(&prop.name) {
                        prop.is_enabled = false;
                    }
                }
            }
        }

        tracing::debug!(
            enabled = out.enabled_classes().count(),
            total = out.classes.len(),
            namespace = %out.namespace,
            "applied generation options"
        );
        out
    }
}
