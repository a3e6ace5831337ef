//! Structural type building.
//!
//! Turns a source's column list into an [`ObjectType`], recursing into
//! `STRUCT` columns. Each struct becomes an object type named after its
//! column.

use tracing::trace;

use super::definition::{ObjectType, ResolvedType, TypeDefinition, is_valid_graphql_name};
use super::type_mapper::map_schema;
use crate::catalog::{Field, FieldSchema, SourceDescription};
use crate::diagnostics::Diagnostics;

/// Builds the object type for one source.
pub fn build_source_type(source: &SourceDescription, diagnostics: &mut Diagnostics) -> ObjectType {
    trace!(source = %source.name, columns = source.fields.len(), "Building source type");
    ObjectType::new(&source.name, build_type_definition(&source.fields, diagnostics))
}

/// Builds a type definition from an ordered field list.
///
/// Later fields never replace earlier ones: a repeated name records a
/// collision and is dropped. Columns with unsupported kinds or invalid
/// names are dropped with a diagnostic.
pub fn build_type_definition(fields: &[Field], diagnostics: &mut Diagnostics) -> TypeDefinition {
    fields.iter().fold(TypeDefinition::new(), |mut definition, field| {
        add_field(&mut definition, field, diagnostics);
        definition
    })
}

fn add_field(definition: &mut TypeDefinition, field: &Field, diagnostics: &mut Diagnostics) {
    if !is_valid_graphql_name(&field.name) {
        diagnostics.invalid_name(&field.name);
        return;
    }

    let resolved = match &field.schema {
        FieldSchema::Struct { fields } if !fields.is_empty() => {
            let nested = build_type_definition(fields, diagnostics);
            // GraphQL objects need at least one field
            if nested.is_empty() {
                diagnostics.unsupported_type(format!(
                    "struct {} has no supported fields",
                    field.name
                ));
                return;
            }
            ResolvedType::Object(ObjectType::new(&field.name, nested))
        }
        schema => match map_schema(schema) {
            Ok(resolved) => resolved,
            Err(unsupported) => {
                diagnostics.unsupported_type(unsupported.to_string());
                return;
            }
        },
    };

    if !definition.insert_if_absent(&field.name, resolved) {
        diagnostics.name_collision(&field.name);
    }
}
