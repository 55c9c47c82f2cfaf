//! # Mapper Strategies
//!
//! Per-property rendering of the model <-> DTO assignments that make up the
//! bodies of `FromModel` and `ToModel`.

use crate::constants::{FROM_MODEL_METHOD, FROM_MODEL_PARAM, TO_MODEL_METHOD};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a property is converted, decided once by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapperStrategy {
    /// Values, strings, enums, structs, interfaces and `object`: copied as-is.
    Simple,
    /// A nested model class converted through its own DTO.
    Class {
        /// DTO type of the property, e.g. `AddressDto`.
        dto_type: String,
    },
    /// Array of model classes converted element by element.
    Array {
        /// DTO type of the elements.
        element_dto: String,
    },
    /// Array of values or strings, copied.
    SimpleArray,
    /// `List<T>` of model classes converted element by element.
    List {
        /// DTO type of the elements.
        element_dto: String,
    },
    /// `List<T>` of primitives, copied.
    SimpleGenericList,
    /// Unrecognised shape; rendered as a TODO comment.
    Unknown,
}

/// One line of an object initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingLine {
    /// `Name = expr`, rendered with a trailing comma.
    Assignment {
        /// Property being assigned.
        target: String,
        /// Right-hand side.
        value: String,
    },
    /// A `//` comment standing in for a mapping.
    Comment(String),
}

impl fmt::Display for MappingLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingLine::Assignment { target, value } => write!(f, "{} = {},", target, value),
            MappingLine::Comment(text) => write!(f, "// {}", text),
        }
    }
}

/// A property's mapping strategy together with the data it renders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMapper {
    /// Property name (identical on model and DTO).
    pub property: String,
    /// Whether the model property can be assigned.
    pub has_setter: bool,
    /// Chosen strategy.
    pub strategy: MapperStrategy,
}

impl PropertyMapper {
    /// Creates a mapper.
    pub fn new(property: impl Into<String>, has_setter: bool, strategy: MapperStrategy) -> Self {
        Self {
            property: property.into(),
            has_setter,
            strategy,
        }
    }

    /// The initializer line used inside `FromModel(model)`.
    ///
    /// # Examples
    /// ```
    /// use dto_writer_core::strategies::{MapperStrategy, PropertyMapper};
    ///
    /// let m = PropertyMapper::new("Addresses", true, MapperStrategy::List {
    ///     element_dto: "AddressDto".into(),
    /// });
    /// assert_eq!(
    ///     m.from_model_mapping().to_string(),
    ///     "Addresses = model.Addresses.Select(AddressDto.FromModel).ToList(),"
    /// );
    /// ```
    pub fn from_model_mapping(&self) -> MappingLine {
        let p = &self.property;
        let source = format!("{}.{}", FROM_MODEL_PARAM, p);
        let value = match &self.strategy {
            MapperStrategy::Simple => source,
            MapperStrategy::Class { dto_type } => {
                format!("{}.{}({})", dto_type, FROM_MODEL_METHOD, source)
            }
            MapperStrategy::Array { element_dto } => {
                format!("{}.Select({}.{}).ToArray()", source, element_dto, FROM_MODEL_METHOD)
            }
            MapperStrategy::SimpleArray => format!("{}.ToArray()", source),
            MapperStrategy::List { element_dto } => {
                format!("{}.Select({}.{}).ToList()", source, element_dto, FROM_MODEL_METHOD)
            }
            MapperStrategy::SimpleGenericList => format!("{}.ToList()", source),
            MapperStrategy::Unknown => return self.todo(),
        };
        MappingLine::Assignment {
            target: p.clone(),
            value,
        }
    }

    /// The initializer line used inside `ToModel()`, or `None` for read-only properties.
    pub fn to_model_mapping(&self) -> Option<MappingLine> {
        if !self.has_setter {
            return None;
        }
        let p = &self.property;
        let value = match &self.strategy {
            MapperStrategy::Simple => p.clone(),
            MapperStrategy::Class { .. } => format!("{}.{}()", p, TO_MODEL_METHOD),
            MapperStrategy::Array { .. } => {
                format!("{}.Select(dto => dto.{}()).ToArray()", p, TO_MODEL_METHOD)
            }
            MapperStrategy::SimpleArray => format!("{}.ToArray()", p),
            MapperStrategy::List { .. } => {
                format!("{}.Select(dto => dto.{}()).ToList()", p, TO_MODEL_METHOD)
            }
            MapperStrategy::SimpleGenericList => format!("{}.ToList()", p),
            MapperStrategy::Unknown => return Some(self.todo()),
        };
        Some(MappingLine::Assignment {
            target: p.clone(),
            value,
        })
    }

    fn todo(&self) -> MappingLine {
        MappingLine::Comment(format!("TODO: Add mapping for {}", self.property))
    }
}
