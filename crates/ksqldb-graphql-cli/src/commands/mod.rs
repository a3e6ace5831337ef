pub mod fields;
pub mod schema;

use anyhow::{Context, Result};
use ksqldb_graphql::{ApiSchema, CatalogClient, SchemaGenerator, SourceFilters};

use crate::cli::CatalogArgs;
use crate::client::{FileCatalog, KsqlDbClient};
use crate::config::{self, CliConfig};
use crate::output::print_diagnostics;

/// Builds the API from the catalog file when given, otherwise from the
/// server, and reports diagnostics.
pub async fn generate(
    server: Option<&str>,
    args: &CatalogArgs,
    config: &CliConfig,
) -> Result<ApiSchema> {
    let api = match &args.catalog {
        Some(path) => build(FileCatalog::load(path)?, config).await?,
        None => {
            let server = config::resolve_server(server, config)?;
            build(KsqlDbClient::new(&server), config).await?
        }
    };
    print_diagnostics(&api.diagnostics);
    Ok(api)
}

async fn build<C: CatalogClient>(client: C, config: &CliConfig) -> Result<ApiSchema> {
    SchemaGenerator::new(client)
        .with_filters(SourceFilters::from_config(&config.graphql))
        .with_config(config.graphql.clone())
        .build()
        .await
        .context("Could not generate schemas")
}
