//! ksqlDB column type to GraphQL type mapping.

use super::definition::{ResolvedType, ScalarType};
use crate::catalog::{FieldSchema, SqlType};

/// A column kind the mapper cannot express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedType {
    pub kind: String,
}

impl UnsupportedType {
    fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl std::fmt::Display for UnsupportedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type {} is not supported", self.kind)
    }
}

/// Maps a ksqlDB kind, plus the member kind for arrays, to a GraphQL type.
///
/// `BIGINT` maps to `Float`: 64-bit values exceed GraphQL's 32-bit `Int`.
/// Arrays are only supported over primitive members.
pub fn map_type(kind: &SqlType, member: Option<&SqlType>) -> Result<ResolvedType, UnsupportedType> {
    match kind {
        SqlType::Array => {
            let member = member.ok_or_else(|| UnsupportedType::new("ARRAY"))?;
            scalar_for(member)
                .map(ResolvedType::List)
                .ok_or_else(|| UnsupportedType::new(format!("ARRAY<{member}>")))
        }
        other => scalar_for(other)
            .map(ResolvedType::Scalar)
            .ok_or_else(|| UnsupportedType::new(other.as_str())),
    }
}

/// Maps a decoded column schema through [`map_type`].
///
/// Structs never resolve here; the type builder turns non-empty
/// structs into object types before reaching the mapper.
pub fn map_schema(schema: &FieldSchema) -> Result<ResolvedType, UnsupportedType> {
    match schema {
        FieldSchema::Primitive(kind) => map_type(kind, None),
        FieldSchema::Array { member: None } => map_type(&SqlType::Array, None),
        FieldSchema::Array {
            member: Some(member),
        } => map_type(&SqlType::Array, Some(&member.kind())),
        FieldSchema::Struct { .. } => map_type(&SqlType::Struct, None),
    }
}

fn scalar_for(kind: &SqlType) -> Option<ScalarType> {
    match kind {
        SqlType::String | SqlType::Varchar => Some(ScalarType::String),
        SqlType::Bigint | SqlType::Integer | SqlType::Double => Some(ScalarType::Float),
        SqlType::Boolean => Some(ScalarType::Boolean),
        SqlType::Array | SqlType::Struct | SqlType::Unsupported(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Field;

    const PRIMITIVES: [(SqlType, ScalarType); 6] = [
        (SqlType::String, ScalarType::String),
        (SqlType::Varchar, ScalarType::String),
        (SqlType::Bigint, ScalarType::Float),
        (SqlType::Integer, ScalarType::Float),
        (SqlType::Double, ScalarType::Float),
        (SqlType::Boolean, ScalarType::Boolean),
    ];

    #[test]
    fn test_primitive_kinds() {
        for (kind, expected) in PRIMITIVES {
            assert_eq!(map_type(&kind, None), Ok(ResolvedType::Scalar(expected)));
        }
    }

    #[test]
    fn test_array_kinds() {
        for (kind, expected) in PRIMITIVES {
            assert_eq!(
                map_type(&SqlType::Array, Some(&kind)),
                Ok(ResolvedType::List(expected))
            );
        }
    }

    #[test]
    fn test_bigint_is_float() {
        assert_eq!(
            map_type(&SqlType::Bigint, None),
            Ok(ResolvedType::Scalar(ScalarType::Float))
        );
    }

    #[test]
    fn test_unsupported_kind() {
        let err = map_type(&SqlType::Unsupported("MAP".into()), None).unwrap_err();
        assert_eq!(err.to_string(), "type MAP is not supported");
    }

    #[test]
    fn test_array_without_member() {
        let err = map_type(&SqlType::Array, None).unwrap_err();
        assert_eq!(err.kind, "ARRAY");
    }

    #[test]
    fn test_array_of_struct_is_unsupported() {
        let schema = FieldSchema::Array {
            member: Some(Box::new(FieldSchema::structure(vec![Field::new(
                "X",
                FieldSchema::primitive(SqlType::String),
            )]))),
        };
        let err = map_schema(&schema).unwrap_err();
        assert_eq!(err.to_string(), "type ARRAY<STRUCT> is not supported");
    }

    #[test]
    fn test_array_of_array_is_unsupported() {
        let schema = FieldSchema::Array {
            member: Some(Box::new(FieldSchema::array(SqlType::String))),
        };
        assert!(map_schema(&schema).is_err());
    }

    #[test]
    fn test_bare_struct_is_unsupported() {
        let err = map_schema(&FieldSchema::structure(Vec::new())).unwrap_err();
        assert_eq!(err.kind, "STRUCT");
    }
}
