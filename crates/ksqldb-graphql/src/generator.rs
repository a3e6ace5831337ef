//! Catalog fetching and schema generation.
//!
//! [`SchemaGenerator`] fetches streams and tables from a [`CatalogClient`],
//! filters them, and runs the inference pipeline over the result.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::catalog::SourceDescription;
use crate::config::GraphQLConfig;
use crate::error::KsqlGraphQLError;
use crate::resolvers::{NullResolver, SourceResolver};
use crate::schema::{ApiSchema, generate_schema_and_fields};

/// Source of ksqlDB catalog snapshots.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Returns the result of `LIST STREAMS EXTENDED;`.
    async fn list_streams_extended(&self) -> Result<Vec<SourceDescription>, KsqlGraphQLError>;

    /// Returns the result of `LIST TABLES EXTENDED;`.
    async fn list_tables_extended(&self) -> Result<Vec<SourceDescription>, KsqlGraphQLError>;
}

/// Predicate deciding whether a source takes part in the schema.
pub type SourcePredicate = Arc<dyn Fn(&SourceDescription) -> bool + Send + Sync>;

/// Inclusion filters for streams and tables. Both accept everything by
/// default.
#[derive(Clone)]
pub struct SourceFilters {
    streams: SourcePredicate,
    tables: SourcePredicate,
}

impl Default for SourceFilters {
    fn default() -> Self {
        Self {
            streams: Arc::new(|_: &SourceDescription| true),
            tables: Arc::new(|_: &SourceDescription| true),
        }
    }
}

impl std::fmt::Debug for SourceFilters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFilters").finish_non_exhaustive()
    }
}

impl SourceFilters {
    /// Builds name-based filters from the `[streams]` and `[tables]`
    /// sections of the configuration.
    pub fn from_config(config: &GraphQLConfig) -> Self {
        let streams = config.streams.clone();
        let tables = config.tables.clone();
        Self {
            streams: Arc::new(move |source: &SourceDescription| streams.accepts(&source.name)),
            tables: Arc::new(move |source: &SourceDescription| tables.accepts(&source.name)),
        }
    }

    #[must_use]
    pub fn with_streams_filter(
        mut self,
        filter: impl Fn(&SourceDescription) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.streams = Arc::new(filter);
        self
    }

    #[must_use]
    pub fn with_tables_filter(
        mut self,
        filter: impl Fn(&SourceDescription) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.tables = Arc::new(filter);
        self
    }

    /// Applies both filters, streams first.
    pub fn apply(
        &self,
        streams: Vec<SourceDescription>,
        tables: Vec<SourceDescription>,
    ) -> Vec<SourceDescription> {
        streams
            .into_iter()
            .filter(|source| (self.streams)(source))
            .chain(tables.into_iter().filter(|source| (self.tables)(source)))
            .collect()
    }
}

/// Generates a GraphQL API from a live catalog.
///
/// # Example
///
/// ```ignore
/// let api = SchemaGenerator::new(client)
///     .with_config(config)
///     .with_resolver(Arc::new(MyResolver::new()))
///     .build()
///     .await?;
/// ```
pub struct SchemaGenerator<C> {
    client: C,
    filters: SourceFilters,
    config: GraphQLConfig,
    resolver: Arc<dyn SourceResolver>,
}

impl<C: CatalogClient> SchemaGenerator<C> {
    /// Creates a generator with accept-all filters, default configuration,
    /// and a [`NullResolver`].
    pub fn new(client: C) -> Self {
        Self {
            client,
            filters: SourceFilters::default(),
            config: GraphQLConfig::default(),
            resolver: Arc::new(NullResolver),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: SourceFilters) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: GraphQLConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn SourceResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Fetches streams and tables concurrently and applies the filters.
    ///
    /// # Errors
    ///
    /// Returns the client's error if either fetch fails, and `EmptyCatalog`
    /// if nothing survives filtering.
    pub async fn fetch_sources(&self) -> Result<Vec<SourceDescription>, KsqlGraphQLError> {
        let (streams, tables) = tokio::try_join!(
            self.client.list_streams_extended(),
            self.client.list_tables_extended(),
        )?;
        debug!(
            streams = streams.len(),
            tables = tables.len(),
            "Fetched ksqlDB catalog"
        );

        let sources = self.filters.apply(streams, tables);
        if sources.is_empty() {
            return Err(KsqlGraphQLError::EmptyCatalog);
        }
        Ok(sources)
    }

    /// Fetches the catalog and builds the API.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the catalog cannot be
    /// fetched, it is empty after filtering, or assembly fails. No partial
    /// schema is returned.
    pub async fn build(&self) -> Result<ApiSchema, KsqlGraphQLError> {
        self.config
            .validate()
            .map_err(KsqlGraphQLError::Configuration)?;

        let result = match self.fetch_sources().await {
            Ok(sources) => {
                generate_schema_and_fields(&sources, &self.config, Arc::clone(&self.resolver))
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(api) => info!(
                queries = api.fields.query_fields.len(),
                mutations = api.fields.mutation_fields.len(),
                subscriptions = api.fields.subscription_fields.len(),
                diagnostics = api.diagnostics.len(),
                "Generated GraphQL schema"
            ),
            Err(e) => error!(error = %e, code = e.error_code(), "Could not generate schemas"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Field, FieldSchema, SqlType};

    fn source(name: &str) -> SourceDescription {
        SourceDescription::new(
            name,
            vec![Field::new("ID", FieldSchema::primitive(SqlType::String))],
        )
    }

    #[test]
    fn test_default_filters_accept_all() {
        let sources = SourceFilters::default().apply(vec![source("S")], vec![source("T")]);
        let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["S", "T"]);
    }

    #[test]
    fn test_streams_filter_only_applies_to_streams() {
        let filters = SourceFilters::default().with_streams_filter(|_| false);
        let sources = filters.apply(vec![source("S")], vec![source("T")]);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "T");
    }

    #[test]
    fn test_filters_from_config() {
        let mut config = GraphQLConfig::default();
        config.streams.exclude = vec!["KSQL_PROCESSING_LOG".into()];
        config.tables.include = vec!["USERS".into()];

        let sources = SourceFilters::from_config(&config).apply(
            vec![source("KSQL_PROCESSING_LOG"), source("PAGEVIEWS")],
            vec![source("USERS"), source("ORDERS")],
        );
        let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["PAGEVIEWS", "USERS"]);
    }
}
