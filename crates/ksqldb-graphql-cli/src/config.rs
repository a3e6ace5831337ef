use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ksqldb_graphql::GraphQLConfig;
use serde::{Deserialize, Serialize};
use url::Url;

/// Contents of the CLI config file.
///
/// ```toml
/// server = "http://localhost:8088"
///
/// [graphql]
/// max_depth = 10
///
/// [graphql.streams]
/// exclude = ["KSQL_PROCESSING_LOG"]
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub server: Option<String>,
    pub graphql: GraphQLConfig,
}

/// Loads the config file, or defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

fn parse(content: &str) -> Result<CliConfig> {
    let cfg: CliConfig = toml::from_str(content)?;
    cfg.graphql.validate().map_err(anyhow::Error::msg)?;
    Ok(cfg)
}

pub fn resolve_server(cli_server: Option<&str>, config: &CliConfig) -> Result<String> {
    // 1. --server flag / KSQLDB_URL env
    // 2. config file
    let Some(server) = cli_server.or(config.server.as_deref()) else {
        anyhow::bail!(
            "No server URL configured. Use --server, set KSQLDB_URL env var, add `server` to the config file, or pass --catalog <file>"
        );
    };
    Url::parse(server).with_context(|| format!("Invalid server URL: {server}"))?;
    Ok(server.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg = parse(
            r#"
            server = "http://ksqldb:8088"

            [graphql]
            max_depth = 8
            introspection = false

            [graphql.tables]
            include = ["USERS"]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.as_deref(), Some("http://ksqldb:8088"));
        assert_eq!(cfg.graphql.max_depth, 8);
        assert!(!cfg.graphql.introspection);
        assert_eq!(cfg.graphql.tables.include, vec!["USERS"]);
        assert_eq!(cfg.graphql.max_complexity, GraphQLConfig::default().max_complexity);
    }

    #[test]
    fn test_parse_rejects_invalid_limits() {
        let err = parse("[graphql]\nmax_depth = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_depth"));
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let cfg = load(None).unwrap();
        assert!(cfg.server.is_none());
        assert_eq!(cfg.graphql, GraphQLConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ksqldb-graphql.toml");
        fs::write(&path, "server = \"http://localhost:8088\"\n").unwrap();

        let cfg = load(Some(&path)).unwrap();
        assert_eq!(cfg.server.as_deref(), Some("http://localhost:8088"));
    }

    #[test]
    fn test_resolve_server_precedence() {
        let cfg = CliConfig {
            server: Some("http://from-config:8088".into()),
            ..Default::default()
        };

        assert_eq!(
            resolve_server(Some("http://from-flag:8088/"), &cfg).unwrap(),
            "http://from-flag:8088"
        );
        assert_eq!(resolve_server(None, &cfg).unwrap(), "http://from-config:8088");
        assert!(resolve_server(None, &CliConfig::default()).is_err());
        assert!(resolve_server(Some("not a url"), &cfg).is_err());
    }
}
