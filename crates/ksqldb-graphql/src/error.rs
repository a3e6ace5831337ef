//! Error types for schema generation.
//!
//! Only conditions that abort a build live here. Recoverable conditions
//! (unsupported column types, name collisions) are reported through
//! [`crate::diagnostics`] instead.

use thiserror::Error;

/// Errors that can occur while generating a GraphQL API from a catalog.
#[derive(Debug, Error)]
pub enum KsqlGraphQLError {
    /// No stream or table survived filtering.
    #[error("No Stream or Table exists on the server")]
    EmptyCatalog,

    /// The catalog could not be fetched or decoded.
    #[error("Failed to fetch catalog: {0}")]
    Catalog(String),

    /// The assembled schema was rejected by the GraphQL type system.
    #[error("Failed to build GraphQL schema: {0}")]
    SchemaBuildFailed(String),

    /// Configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A resolver failed while answering a request.
    #[error("Resolver error: {0}")]
    Resolver(String),
}

impl KsqlGraphQLError {
    /// Create a new Catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog(message.into())
    }

    /// Create a new Resolver error
    pub fn resolver(message: impl Into<String>) -> Self {
        Self::Resolver(message.into())
    }

    /// Returns a stable error code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCatalog => "EMPTY_CATALOG",
            Self::Catalog(_) => "CATALOG_ERROR",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Resolver(_) => "RESOLVER_ERROR",
        }
    }
}

impl From<serde_json::Error> for KsqlGraphQLError {
    fn from(err: serde_json::Error) -> Self {
        Self::Catalog(err.to_string())
    }
}
