use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ksqldb_graphql::catalog::source_descriptions_from_json;
use ksqldb_graphql::{CatalogClient, KsqlGraphQLError, SourceDescription, SourceKind};
use serde_json::{Value, json};
use tracing::debug;

const KSQL_CONTENT_TYPE: &str = "application/vnd.ksql.v1+json";

/// ksqlDB REST client for catalog statements.
pub struct KsqlDbClient {
    http: reqwest::Client,
    base_url: String,
}

impl KsqlDbClient {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn ksql_url(&self) -> String {
        format!("{}/ksql", self.base_url)
    }

    /// Runs a `LIST ... EXTENDED;` statement and decodes the source
    /// descriptions.
    pub async fn describe(&self, statement: &str) -> Result<Vec<SourceDescription>> {
        debug!(statement, server = %self.base_url, "Running catalog statement");
        let resp = self
            .http
            .post(self.ksql_url())
            .header("Accept", KSQL_CONTENT_TYPE)
            .header("Content-Type", KSQL_CONTENT_TYPE)
            .json(&json!({ "ksql": statement, "streamsProperties": {} }))
            .send()
            .await
            .context("Failed to connect to ksqlDB server")?;

        let body = handle_response(resp).await?;
        source_descriptions_from_json(body)
            .with_context(|| format!("Unexpected response to `{statement}`"))
    }
}

#[async_trait]
impl CatalogClient for KsqlDbClient {
    async fn list_streams_extended(&self) -> Result<Vec<SourceDescription>, KsqlGraphQLError> {
        self.describe("LIST STREAMS EXTENDED;")
            .await
            .map_err(|e| KsqlGraphQLError::catalog(format!("{e:#}")))
    }

    async fn list_tables_extended(&self) -> Result<Vec<SourceDescription>, KsqlGraphQLError> {
        self.describe("LIST TABLES EXTENDED;")
            .await
            .map_err(|e| KsqlGraphQLError::catalog(format!("{e:#}")))
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        // ksqlDB errors carry `@type`, `error_code` and `message`
        if let Ok(json) = serde_json::from_str::<Value>(&body)
            && let Some(message) = json.get("message").and_then(|v| v.as_str())
        {
            anyhow::bail!("HTTP {status}: {message}");
        }
        anyhow::bail!("HTTP {status}: {body}");
    }

    serde_json::from_str(&body).context("Failed to parse response JSON")
}

/// Catalog read from a file holding a `LIST ... EXTENDED` response or a
/// bare array of source descriptions.
///
/// Sources typed `TABLE` are served as tables, everything else as streams.
#[derive(Debug, Default)]
pub struct FileCatalog {
    streams: Vec<SourceDescription>,
    tables: Vec<SourceDescription>,
}

impl FileCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Catalog file {} is not valid JSON", path.display()))?;
        let sources = source_descriptions_from_json(value)
            .with_context(|| format!("Catalog file {} holds no source descriptions", path.display()))?;
        Ok(Self::from_sources(sources))
    }

    pub fn from_sources(sources: Vec<SourceDescription>) -> Self {
        let (tables, streams): (Vec<_>, Vec<_>) = sources
            .into_iter()
            .partition(|source| source.kind == Some(SourceKind::Table));
        Self { streams, tables }
    }
}

#[async_trait]
impl CatalogClient for FileCatalog {
    async fn list_streams_extended(&self) -> Result<Vec<SourceDescription>, KsqlGraphQLError> {
        Ok(self.streams.clone())
    }

    async fn list_tables_extended(&self) -> Result<Vec<SourceDescription>, KsqlGraphQLError> {
        Ok(self.tables.clone())
    }
}
