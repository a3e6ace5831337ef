//! Resolved type model shared by the builder, classifier, and assembler.

use async_graphql::dynamic::TypeRef;
use indexmap::IndexMap;
use serde::Serialize;

/// Built-in GraphQL scalar a column maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarType {
    String,
    Float,
    Boolean,
}

impl ScalarType {
    /// Returns the GraphQL type name.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::String => TypeRef::STRING,
            Self::Float => TypeRef::FLOAT,
            Self::Boolean => TypeRef::BOOLEAN,
        }
    }
}

/// The GraphQL type a field resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResolvedType {
    Scalar(ScalarType),
    List(ScalarType),
    Object(ObjectType),
}

impl ResolvedType {
    /// Returns true if the type may be used as an argument.
    ///
    /// Object types are output-only; nested filtering is not offered.
    pub fn is_input_type(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::List(_))
    }

    /// Returns a nullable type reference for the dynamic schema.
    pub fn type_ref(&self) -> TypeRef {
        match self {
            Self::Scalar(scalar) => TypeRef::named(scalar.type_name()),
            Self::List(scalar) => TypeRef::named_list(scalar.type_name()),
            Self::Object(object) => TypeRef::named(&object.name),
        }
    }

    /// Returns the SDL spelling of the type, e.g. `[String]`.
    pub fn display_name(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.type_name().to_string(),
            Self::List(scalar) => format!("[{}]", scalar.type_name()),
            Self::Object(object) => object.name.clone(),
        }
    }
}

/// A named object type: a source, or a `STRUCT` column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectType {
    pub name: String,
    pub fields: TypeDefinition,
}

impl ObjectType {
    pub fn new(name: impl Into<String>, fields: TypeDefinition) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Iterates over the nested object types of this type, depth first.
    pub fn nested_objects(&self) -> Vec<&ObjectType> {
        let mut out = Vec::new();
        collect_nested(self, &mut out);
        out
    }
}

fn collect_nested<'a>(object: &'a ObjectType, out: &mut Vec<&'a ObjectType>) {
    for (_, field_type) in object.fields.iter() {
        if let ResolvedType::Object(nested) = field_type {
            out.push(nested);
            collect_nested(nested, out);
        }
    }
}

/// Field name to resolved type, in first-seen order.
///
/// Entries are only ever added through [`TypeDefinition::insert_if_absent`],
/// so an existing definition is never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TypeDefinition {
    fields: IndexMap<String, ResolvedType>,
}

impl TypeDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `field_type` under `name` unless the name is taken.
    ///
    /// Returns false, leaving the existing entry untouched, on collision.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, field_type: ResolvedType) -> bool {
        match self.fields.entry(name.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(field_type);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedType> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResolvedType)> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Checks if a name is valid for GraphQL.
///
/// GraphQL names must match the pattern `[_a-zA-Z][_a-zA-Z0-9]*`. Names
/// starting with `__` are reserved for introspection.
pub fn is_valid_graphql_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }

    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }

    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
