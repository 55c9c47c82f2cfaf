//! # Constants
//!
//! Names shared by the analyzer and the generator.

/// Appended to model class names and to the target namespace.
pub const DTO_SUFFIX: &str = "Dto";

/// Name of the static factory emitted on each DTO.
pub const FROM_MODEL_METHOD: &str = "FromModel";

/// Name of the instance conversion method emitted on each DTO.
pub const TO_MODEL_METHOD: &str = "ToModel";

/// Parameter name of the `FromModel` factory.
pub const FROM_MODEL_PARAM: &str = "model";

/// Namespaces imported by generated files.
pub mod using {
    /// Always imported.
    pub const SYSTEM: &str = "System";
    /// Imported when a generic property is emitted.
    pub const SYSTEM_COLLECTIONS_GENERIC: &str = "System.Collections.Generic";
    /// Imported when an enumerable property is emitted.
    pub const SYSTEM_LINQ: &str = "System.Linq";
    /// Imported for `[DataContract]` / `[DataMember]`.
    pub const SYSTEM_RUNTIME_SERIALIZATION: &str = "System.Runtime.Serialization";
    /// Imported for `[JsonProperty]`.
    pub const NEWTONSOFT_JSON: &str = "Newtonsoft.Json";
}

/// Attribute names used on DTO declarations.
pub mod attribute {
    /// Class-level serialization contract marker.
    pub const DATA_CONTRACT: &str = "DataContract";
    /// Property-level serialization contract marker.
    pub const DATA_MEMBER: &str = "DataMember";
    /// Property-level JSON name attribute.
    pub const JSON_PROPERTY: &str = "JsonProperty";
}

/// Type names copied as-is when used as a `List<T>` element.
const SIMPLE_TYPE_NAMES: &[&str] = &[
    "Boolean", "Byte", "SByte", "Char", "Decimal", "Double", "Single", "Int32", "UInt32", "Int64",
    "UInt64", "Object", "Int16", "UInt16", "String", //
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "long", "ulong",
    "object", "short", "ushort", "string", //
    "DateTime",
];

/// Returns true for built-in value types, `object`, `string` and `DateTime`
/// in either their keyword or framework spelling. Matching is exact.
pub fn is_simple_type_name(name: &str) -> bool {
    SIMPLE_TYPE_NAMES.contains(&name)
}

/// Lowercases the first character (`UserId` -> `userId`).
///
/// The remainder is left untouched, so `ID` becomes `iD`. A verbatim prefix
/// is dropped (`@class` -> `class`).
pub fn to_lower_camel_case(name: &str) -> String {
    let name = name.strip_prefix('@').unwrap_or(name);
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_type_names() {
        assert!(is_simple_type_name("int"));
        assert!(is_simple_type_name("Int32"));
        assert!(is_simple_type_name("DateTime"));
        assert!(!is_simple_type_name("Guid"));
        assert!(!is_simple_type_name("INT"));
        assert!(!is_simple_type_name("Address"));
    }

    #[test]
    fn test_lower_camel_case() {
        assert_eq!(to_lower_camel_case("UserId"), "userId");
        assert_eq!(to_lower_camel_case("name"), "name");
        assert_eq!(to_lower_camel_case("ID"), "iD");
        assert_eq!(to_lower_camel_case(""), "");
        assert_eq!(to_lower_camel_case("@class"), "class");
        assert_eq!(to_lower_camel_case("@Event"), "event");
    }
}
