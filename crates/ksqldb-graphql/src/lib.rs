//! # ksqldb-graphql
//!
//! Infers a GraphQL API from a ksqlDB source catalog.
//!
//! Given the streams and tables a ksqlDB server describes through
//! `LIST STREAMS EXTENDED` / `LIST TABLES EXTENDED`, this crate derives:
//!
//! - an object type per source, with nested object types for `STRUCT` columns
//! - a `Query` root with one field per materialized source (a source that has
//!   write-queries behind it)
//! - a `Subscription` root and a `Mutation` root with one field per source
//! - a flattened resolver field table for wiring execution
//!
//! ## Overview
//!
//! The inference pipeline is synchronous and pure. Only fetching the catalog
//! is asynchronous, and that is delegated to a [`CatalogClient`].
//!
//! ```ignore
//! let api = SchemaGenerator::new(client)
//!     .with_filters(SourceFilters::default().with_streams_filter(|_| false))
//!     .build()
//!     .await?;
//!
//! println!("{}", api.schema.sdl());
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//!
//! [tables]
//! exclude = ["KSQL_PROCESSING_LOG"]
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - ksqlDB source description model
//! - [`schema`] - Type mapping, classification, and schema assembly
//! - [`generator`] - Catalog fetching and filtering
//! - [`resolvers`] - Execution seam for the assembled schema
//! - [`diagnostics`] - Non-fatal build diagnostics
//! - [`config`] - Configuration options
//! - [`error`] - Error types

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use catalog::{Field, FieldSchema, SourceDescription, SourceKind, SqlType};
pub use config::{GraphQLConfig, SourceSelection};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::KsqlGraphQLError;
pub use generator::{CatalogClient, SchemaGenerator, SourceFilters};
pub use resolvers::{NullResolver, RowStream, SourceResolver};
pub use schema::{
    ApiSchema, Capability, FieldEntry, FieldTables, FieldType, ResolverFields,
    generate_schema_and_fields,
};

/// Result type for schema generation.
pub type Result<T> = std::result::Result<T, KsqlGraphQLError>;
