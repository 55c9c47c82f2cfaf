//! # Analysis Model
//!
//! Intermediate representation handed from the analyzer to the generator.
//! Serializable so a host can inspect it or persist toggles alongside it.

use crate::constants::DTO_SUFFIX;
use crate::parser::TypeRef;
use crate::strategies::PropertyMapper;
use serde::{Deserialize, Serialize};

fn enabled() -> bool {
    true
}

/// One property of a model class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// DTO-side type, empty when the declared type is reused.
    #[serde(default)]
    pub type_name: String,
    /// False for read-only model properties: the DTO gets a private setter and
    /// `ToModel` skips the property.
    pub has_setter: bool,
    /// The type is an array or exposes an enumerator.
    #[serde(default)]
    pub is_enumerable_type: bool,
    /// The type is constructed from a generic type.
    #[serde(default)]
    pub is_generic_type: bool,
    /// Emit this property.
    #[serde(default = "enabled")]
    pub is_enabled: bool,
    /// Mapping strategy.
    pub mapper: PropertyMapper,
}

impl PropertyInfo {
    /// Type used for the DTO property.
    pub fn dto_type(&self) -> String {
        if self.type_name.trim().is_empty() {
            self.ty.to_string()
        } else {
            self.type_name.clone()
        }
    }
}

/// One model class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Model class name.
    pub name: String,
    /// Properties in declaration order.
    pub properties: Vec<PropertyInfo>,
    /// Emit a DTO for this class.
    #[serde(default = "enabled")]
    pub is_enabled: bool,
    /// Emit `static XDto FromModel(X model)`.
    #[serde(default = "enabled")]
    pub need_from_model_method: bool,
    /// Emit `X ToModel()`.
    #[serde(default = "enabled")]
    pub need_to_model_method: bool,
    /// Attach `[JsonProperty("camelName")]` to properties.
    #[serde(default)]
    pub need_json_property_attribute: bool,
    /// Attach `[DataContract]` / `[DataMember]`.
    #[serde(default)]
    pub need_data_member_property_attribute: bool,
}

impl ClassInfo {
    /// A class with default toggles.
    pub fn new(name: impl Into<String>, properties: Vec<PropertyInfo>) -> Self {
        Self {
            name: name.into(),
            properties,
            is_enabled: true,
            need_from_model_method: true,
            need_to_model_method: true,
            need_json_property_attribute: false,
            need_data_member_property_attribute: false,
        }
    }

    /// Name of the generated class.
    pub fn dto_name(&self) -> String {
        format!("{}{}", self.name, DTO_SUFFIX)
    }

    /// Properties that will be emitted.
    pub fn enabled_properties(&self) -> impl Iterator<Item = &PropertyInfo> {
        self.properties.iter().filter(|p| p.is_enabled)
    }
}

/// Result of analyzing one selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedModel {
    /// Namespace of the model classes.
    pub model_namespace: String,
    /// Namespace for the generated DTOs.
    pub namespace: String,
    /// Model classes in declaration order.
    pub classes: Vec<ClassInfo>,
}

impl ParsedModel {
    /// Derives the default DTO namespace (`Shop.Models` -> `Shop.Models.Dto`).
    pub fn new(model_namespace: impl Into<String>, classes: Vec<ClassInfo>) -> Self {
        let model_namespace = model_namespace.into();
        Self {
            namespace: format!("{}.{}", model_namespace, DTO_SUFFIX),
            model_namespace,
            classes,
        }
    }

    /// Classes that will be emitted.
    pub fn enabled_classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.iter().filter(|c| c.is_enabled)
    }

    /// Looks a class up by model name.
    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.name == name)
    }
}
