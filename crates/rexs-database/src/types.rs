//! Value types and version numbers shared by the catalog and runtime models

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The value shape a database attribute declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    FloatingPoint,
    Boolean,
    Integer,
    Enum,
    String,
    FileReference,
    FloatingPointArray,
    BooleanArray,
    IntegerArray,
    StringArray,
    EnumArray,
    ReferenceComponent,
    FloatingPointMatrix,
    StringMatrix,
    ArrayOfIntegerArrays,
}

impl ValueType {
    /// All value types, in catalog order.
    pub const ALL: [ValueType; 15] = [
        ValueType::FloatingPoint,
        ValueType::Boolean,
        ValueType::Integer,
        ValueType::Enum,
        ValueType::String,
        ValueType::FileReference,
        ValueType::FloatingPointArray,
        ValueType::BooleanArray,
        ValueType::IntegerArray,
        ValueType::StringArray,
        ValueType::EnumArray,
        ValueType::ReferenceComponent,
        ValueType::FloatingPointMatrix,
        ValueType::StringMatrix,
        ValueType::ArrayOfIntegerArrays,
    ];

    /// Wire name, also the JSON field name carrying the value.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ValueType::FloatingPoint => "floating_point",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Enum => "enum",
            ValueType::String => "string",
            ValueType::FileReference => "file_reference",
            ValueType::FloatingPointArray => "floating_point_array",
            ValueType::BooleanArray => "boolean_array",
            ValueType::IntegerArray => "integer_array",
            ValueType::StringArray => "string_array",
            ValueType::EnumArray => "enum_array",
            ValueType::ReferenceComponent => "reference_component",
            ValueType::FloatingPointMatrix => "floating_point_matrix",
            ValueType::StringMatrix => "string_matrix",
            ValueType::ArrayOfIntegerArrays => "array_of_integer_arrays",
        }
    }

    /// Whether attributes of this type must carry enum values.
    #[must_use]
    pub fn requires_enum_values(self) -> bool {
        matches!(self, ValueType::Enum | ValueType::EnumArray)
    }

    /// Whether the value may be written in coded (base64 packed) form.
    #[must_use]
    pub fn supports_coding(self) -> bool {
        matches!(
            self,
            ValueType::FloatingPointArray
                | ValueType::IntegerArray
                | ValueType::FloatingPointMatrix
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ValueType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| Error::UnknownValueType(s.to_string()))
    }
}

/// A REXS standard version, `major.minor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RexsVersion {
    pub major: u32,
    pub minor: u32,
}

impl RexsVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for RexsVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for RexsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_names_parse_back() {
        for value_type in ValueType::ALL {
            assert_eq!(value_type.name().parse::<ValueType>().unwrap(), value_type);
        }
    }

    #[test]
    fn test_unknown_value_type() {
        let err = "floating_point_array_coded".parse::<ValueType>().unwrap_err();
        assert!(matches!(err, Error::UnknownValueType(name) if name == "floating_point_array_coded"));
    }

    #[test]
    fn test_enum_requirements() {
        assert!(ValueType::Enum.requires_enum_values());
        assert!(ValueType::EnumArray.requires_enum_values());
        assert!(!ValueType::StringArray.requires_enum_values());
    }

    #[test]
    fn test_version_parsing() {
        let version: RexsVersion = "1.4".parse().unwrap();
        assert_eq!(version, RexsVersion::new(1, 4));
        assert_eq!(version.to_string(), "1.4");
        assert!(RexsVersion::new(1, 3) < version);
    }

    #[test]
    fn test_invalid_versions() {
        assert!("1".parse::<RexsVersion>().is_err());
        assert!("1.x".parse::<RexsVersion>().is_err());
        assert!("".parse::<RexsVersion>().is_err());
    }
}
