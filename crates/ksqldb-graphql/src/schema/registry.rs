//! Object type name registry.
//!
//! GraphQL type names are global, so a source and every `STRUCT` column
//! below it compete for one namespace. Types are admitted in catalog order:
//! the first shape under a name wins, an identical shape reuses it, and a
//! different shape is dropped along with the field that would have pointed
//! at it. Sources and columns named after a built-in or generated type are
//! dropped the same way.
//!
//! Admission runs before the field tables are built, so the tables and the
//! assembled schema always describe the same types.

use async_graphql::dynamic::TypeRef;
use indexmap::IndexMap;

use super::classifier::{MUTATION_ACK_TYPE, SENTINEL_FIELD};
use super::definition::{ObjectType, ResolvedType, TypeDefinition};
use crate::diagnostics::Diagnostics;

/// Type names the assembler defines itself.
pub const RESERVED_TYPE_NAMES: [&str; 10] = [
    "Query",
    "Mutation",
    "Subscription",
    MUTATION_ACK_TYPE,
    SENTINEL_FIELD,
    TypeRef::STRING,
    TypeRef::FLOAT,
    TypeRef::BOOLEAN,
    TypeRef::INT,
    TypeRef::ID,
];

fn is_reserved(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(&name)
}

/// Object types admitted so far, by name.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, ObjectType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a source type and the nested types it uses.
    ///
    /// Returns the source type with colliding nested fields pruned, or
    /// `None` when the source itself cannot be named in the schema.
    pub fn admit(
        &mut self,
        source: &ObjectType,
        diagnostics: &mut Diagnostics,
    ) -> Option<ObjectType> {
        self.admit_object(source, &mut Vec::new(), diagnostics)
    }

    /// Returns the admitted type registered under `name`.
    pub fn get(&self, name: &str) -> Option<&ObjectType> {
        self.types.get(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn admit_object(
        &mut self,
        object: &ObjectType,
        ancestors: &mut Vec<String>,
        diagnostics: &mut Diagnostics,
    ) -> Option<ObjectType> {
        if is_reserved(&object.name) || ancestors.contains(&object.name) {
            diagnostics.name_collision(&object.name);
            return None;
        }

        ancestors.push(object.name.clone());
        let fields = self.prune(&object.fields, ancestors, diagnostics);
        ancestors.pop();

        if fields.is_empty() {
            let kind = if ancestors.is_empty() { "source" } else { "struct" };
            diagnostics.unsupported_type(format!(
                "{kind} {} has no supported fields",
                object.name
            ));
            return None;
        }

        let admitted = ObjectType::new(&object.name, fields);
        match self.types.get(&admitted.name) {
            Some(existing) if *existing == admitted => Some(admitted),
            Some(_) => {
                diagnostics.name_collision(&admitted.name);
                None
            }
            None => {
                self.types.insert(admitted.name.clone(), admitted.clone());
                Some(admitted)
            }
        }
    }

    fn prune(
        &mut self,
        fields: &TypeDefinition,
        ancestors: &mut Vec<String>,
        diagnostics: &mut Diagnostics,
    ) -> TypeDefinition {
        let mut pruned = TypeDefinition::new();
        for (name, field_type) in fields.iter() {
            let field_type = match field_type {
                ResolvedType::Object(nested) => {
                    match self.admit_object(nested, ancestors, diagnostics) {
                        Some(admitted) => ResolvedType::Object(admitted),
                        None => continue,
                    }
                }
                other => other.clone(),
            };
            pruned.insert_if_absent(name.clone(), field_type);
        }
        pruned
    }
}
