//! GraphQL schema inference.
//!
//! ## Components
//!
//! - [`type_mapper`] - ksqlDB column kinds to GraphQL scalars and lists
//! - [`type_builder`] - Source columns to object types, recursing into structs
//! - [`registry`] - One object type per name across sources and structs
//! - [`classifier`] - Sources to Query / Mutation / Subscription field tables
//! - [`assembler`] - Field tables to an executable dynamic schema
//!
//! ## Pipeline
//!
//! 1. Build one object type per source
//! 2. Classify sources into capability tables, dropping types whose names
//!    collide and installing the sentinel `Query` field when nothing is
//!    materialized
//! 3. Assemble the schema and the flattened resolver field table
//!
//! The pipeline is synchronous. It logs, and records recoverable problems
//! as diagnostics, but has no other side effects.

pub mod assembler;
pub mod classifier;
pub mod definition;
pub mod registry;
pub mod type_builder;
pub mod type_mapper;

use std::sync::Arc;

use tracing::debug;

pub use assembler::{ApiSchema, ResolverFields, SchemaAssembler};
pub use classifier::{
    ArgumentTypes, Capability, FieldEntry, FieldTable, FieldTables, FieldType, MUTATION_ACK_TYPE,
    SENTINEL_FIELD, classify, derive_arguments,
};
pub use definition::{ObjectType, ResolvedType, ScalarType, TypeDefinition, is_valid_graphql_name};
pub use registry::{RESERVED_TYPE_NAMES, TypeRegistry};
pub use type_builder::{build_source_type, build_type_definition};
pub use type_mapper::{UnsupportedType, map_schema, map_type};

use crate::catalog::SourceDescription;
use crate::config::GraphQLConfig;
use crate::diagnostics::Diagnostics;
use crate::error::KsqlGraphQLError;
use crate::resolvers::SourceResolver;

/// Runs the full inference pipeline over a catalog snapshot.
///
/// # Errors
///
/// Returns `EmptyCatalog` when `sources` is empty, and `SchemaBuildFailed`
/// when assembly fails.
pub fn generate_schema_and_fields(
    sources: &[SourceDescription],
    config: &GraphQLConfig,
    resolver: Arc<dyn SourceResolver>,
) -> Result<ApiSchema, KsqlGraphQLError> {
    if sources.is_empty() {
        return Err(KsqlGraphQLError::EmptyCatalog);
    }

    debug!(sources = sources.len(), "Generating GraphQL schema from catalog");

    let mut diagnostics = Diagnostics::new();
    let source_types: Vec<ObjectType> = sources
        .iter()
        .map(|source| build_source_type(source, &mut diagnostics))
        .collect();

    let tables = classify(&source_types, sources, &mut diagnostics);

    SchemaAssembler::new(config.clone(), resolver).assemble(tables, diagnostics)
}
