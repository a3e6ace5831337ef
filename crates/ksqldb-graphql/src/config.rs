//! Schema generation configuration.
//!
//! Configuration can be specified in TOML.
//!
//! # Example Configuration
//!
//! ```toml
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//!
//! [streams]
//! include = ["PAGEVIEWS", "CLICKS"]
//!
//! [tables]
//! exclude = ["KSQL_PROCESSING_LOG"]
//! ```

use serde::{Deserialize, Serialize};

/// GraphQL API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,

    /// Which streams take part in the schema.
    #[serde(default)]
    pub streams: SourceSelection,

    /// Which tables take part in the schema.
    #[serde(default)]
    pub tables: SourceSelection,
}

/// Name-based source selection.
///
/// An empty `include` list admits every source. `exclude` always wins.
/// Names compare case-insensitively, as ksqlDB identifiers do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSelection {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl SourceSelection {
    /// Returns true if a source with this name is selected.
    pub fn accepts(&self, name: &str) -> bool {
        let included =
            self.include.is_empty() || self.include.iter().any(|n| n.eq_ignore_ascii_case(name));
        included && !self.exclude.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Returns true if this selection admits every source.
    pub fn is_unrestricted(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
            streams: SourceSelection::default(),
            tables: SourceSelection::default(),
        }
    }
}

impl GraphQLConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("max_complexity must be > 0".into());
        }
        for (section, selection) in [("streams", &self.streams), ("tables", &self.tables)] {
            if let Some(name) = selection
                .include
                .iter()
                .find(|n| selection.exclude.iter().any(|e| e.eq_ignore_ascii_case(n)))
            {
                return Err(format!("{section}: `{name}` is both included and excluded"));
            }
        }
        Ok(())
    }
}
