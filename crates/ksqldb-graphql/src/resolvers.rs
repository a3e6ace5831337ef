//! Execution seam for the assembled schema.
//!
//! The schema assembler wires every root field to a [`SourceResolver`].
//! How rows are actually read, written, or streamed from ksqlDB is up to the
//! implementation; [`NullResolver`] answers everything with nothing.
//!
//! Arguments arrive as a JSON object keyed by argument name, holding only
//! the arguments the client supplied.

use async_graphql::Value;
use async_graphql::dynamic::ObjectAccessor;
use async_trait::async_trait;
use futures_util::stream::{self, BoxStream};

use crate::error::KsqlGraphQLError;

/// Arguments of a root field.
pub type Arguments = serde_json::Map<String, serde_json::Value>;

/// Stream of rows produced by a subscription.
pub type RowStream = BoxStream<'static, Result<serde_json::Value, KsqlGraphQLError>>;

/// Answers root fields for sources.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// Reads a row of a materialized source.
    async fn query(
        &self,
        source: &str,
        args: Arguments,
    ) -> Result<Option<serde_json::Value>, KsqlGraphQLError>;

    /// Submits a row to a source and returns the acknowledgement object.
    async fn mutate(
        &self,
        source: &str,
        args: Arguments,
    ) -> Result<Option<serde_json::Value>, KsqlGraphQLError>;

    /// Streams rows of a source as they arrive.
    async fn subscribe(&self, source: &str, args: Arguments) -> Result<RowStream, KsqlGraphQLError>;
}

/// Resolver that returns `null` for queries and mutations and an empty
/// stream for subscriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

#[async_trait]
impl SourceResolver for NullResolver {
    async fn query(
        &self,
        _source: &str,
        _args: Arguments,
    ) -> Result<Option<serde_json::Value>, KsqlGraphQLError> {
        Ok(None)
    }

    async fn mutate(
        &self,
        _source: &str,
        _args: Arguments,
    ) -> Result<Option<serde_json::Value>, KsqlGraphQLError> {
        Ok(None)
    }

    async fn subscribe(&self, _source: &str, _args: Arguments) -> Result<RowStream, KsqlGraphQLError> {
        Ok(Box::pin(stream::empty()))
    }
}

/// Converts resolver arguments to JSON.
pub(crate) fn arguments_to_json(args: &ObjectAccessor<'_>) -> Result<Arguments, async_graphql::Error> {
    let mut out = Arguments::new();
    for (name, value) in args.iter() {
        let json = value
            .as_value()
            .clone()
            .into_json()
            .map_err(|e| async_graphql::Error::new(format!("Invalid argument {name}: {e}")))?;
        out.insert(name.to_string(), json);
    }
    Ok(out)
}

/// Convert a serde_json::Value to async_graphql::Value.
pub(crate) fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                async_graphql::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let map: async_graphql::indexmap::IndexMap<async_graphql::Name, Value> = obj
                .into_iter()
                .map(|(k, v)| (async_graphql::Name::new(k), json_to_graphql_value(v)))
                .collect();
            Value::Object(map)
        }
    }
}
