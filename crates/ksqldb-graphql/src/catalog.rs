//! ksqlDB catalog model.
//!
//! Mirrors the `sourceDescriptions` payload returned by ksqlDB for
//! `LIST STREAMS EXTENDED;` and `LIST TABLES EXTENDED;`. Only the parts the
//! schema pipeline reads are modelled; unknown keys are ignored.
//!
//! Column schemas arrive as `{ "type", "memberSchema", "fields" }` objects.
//! They are decoded into the tagged [`FieldSchema`] so that the rest of the
//! crate can match exhaustively instead of probing optional keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a source is a stream or a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceKind {
    Stream,
    Table,
}

/// One ksqlDB stream or table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescription {
    /// Source name, unique within the server.
    pub name: String,

    /// Columns in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Persistent queries writing into this source.
    /// Non-empty means the source is materialized and can be queried.
    #[serde(default)]
    pub write_queries: Vec<QueryDescription>,

    /// `STREAM` or `TABLE`, when the server reports it.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SourceKind>,

    /// Backing Kafka topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_format: Option<String>,
}

impl SourceDescription {
    /// Creates a source description with no write-queries.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            write_queries: Vec::new(),
            kind: None,
            topic: None,
            key_format: None,
            value_format: None,
        }
    }

    /// Sets the source kind.
    #[must_use]
    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Adds a persistent query writing into this source.
    #[must_use]
    pub fn with_write_query(mut self, id: impl Into<String>, query_string: impl Into<String>) -> Self {
        self.write_queries.push(QueryDescription {
            id: id.into(),
            query_string: query_string.into(),
        });
        self
    }

    /// Returns true if the source is backed by persisted, queryable state.
    pub fn is_materialized(&self) -> bool {
        !self.write_queries.is_empty()
    }
}

/// A persistent query as listed under `writeQueries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescription {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub query_string: String,
}

/// A named column of a source or a member of a `STRUCT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub schema: FieldSchema,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: FieldSchema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Column type name as reported by ksqlDB.
///
/// Kinds the type mapper does not know are kept verbatim in
/// [`SqlType::Unsupported`] so diagnostics can name them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SqlType {
    String,
    Varchar,
    Bigint,
    Integer,
    Double,
    Boolean,
    Array,
    Struct,
    Unsupported(String),
}

impl SqlType {
    /// Returns the ksqlDB spelling of the type name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "STRING",
            Self::Varchar => "VARCHAR",
            Self::Bigint => "BIGINT",
            Self::Integer => "INTEGER",
            Self::Double => "DOUBLE",
            Self::Boolean => "BOOLEAN",
            Self::Array => "ARRAY",
            Self::Struct => "STRUCT",
            Self::Unsupported(name) => name,
        }
    }
}

impl From<String> for SqlType {
    fn from(name: String) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "STRING" => Self::String,
            "VARCHAR" => Self::Varchar,
            "BIGINT" => Self::Bigint,
            "INTEGER" => Self::Integer,
            "DOUBLE" => Self::Double,
            "BOOLEAN" => Self::Boolean,
            "ARRAY" => Self::Array,
            "STRUCT" => Self::Struct,
            _ => Self::Unsupported(name),
        }
    }
}

impl From<SqlType> for String {
    fn from(kind: SqlType) -> Self {
        match kind {
            SqlType::Unsupported(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSchema", into = "WireSchema")]
pub enum FieldSchema {
    /// A non-composite kind, supported or not.
    Primitive(SqlType),
    /// `ARRAY<member>`. The member is missing when the server omits it.
    Array { member: Option<Box<FieldSchema>> },
    /// `STRUCT<...>` with its members in declaration order.
    Struct { fields: Vec<Field> },
}

impl FieldSchema {
    pub fn primitive(kind: SqlType) -> Self {
        Self::Primitive(kind)
    }

    /// `ARRAY` of a primitive member kind.
    pub fn array(member: SqlType) -> Self {
        Self::Array {
            member: Some(Box::new(Self::Primitive(member))),
        }
    }

    pub fn structure(fields: Vec<Field>) -> Self {
        Self::Struct { fields }
    }

    /// Returns the top-level kind tag.
    pub fn kind(&self) -> SqlType {
        match self {
            Self::Primitive(kind) => kind.clone(),
            Self::Array { .. } => SqlType::Array,
            Self::Struct { .. } => SqlType::Struct,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSchema {
    #[serde(rename = "type")]
    kind: SqlType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    member_schema: Option<Box<WireSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<Field>>,
}

impl From<WireSchema> for FieldSchema {
    fn from(wire: WireSchema) -> Self {
        match (wire.kind, wire.fields) {
            (_, Some(fields)) => Self::Struct { fields },
            (SqlType::Struct, None) => Self::Struct { fields: Vec::new() },
            (SqlType::Array, None) => Self::Array {
                member: wire.member_schema.map(|member| Box::new(Self::from(*member))),
            },
            (kind, None) => Self::Primitive(kind),
        }
    }
}

impl From<FieldSchema> for WireSchema {
    fn from(schema: FieldSchema) -> Self {
        match schema {
            FieldSchema::Primitive(kind) => Self {
                kind,
                member_schema: None,
                fields: None,
            },
            FieldSchema::Array { member } => Self {
                kind: SqlType::Array,
                member_schema: member.map(|member| Box::new(Self::from(*member))),
                fields: None,
            },
            FieldSchema::Struct { fields } => Self {
                kind: SqlType::Struct,
                member_schema: None,
                fields: Some(fields),
            },
        }
    }
}

/// Decodes source descriptions from a ksqlDB response body.
///
/// Accepts the raw `/ksql` response (an array of statement results, each
/// carrying `sourceDescriptions`), a single statement result, or a bare
/// array of source descriptions.
pub fn source_descriptions_from_json(
    value: Value,
) -> Result<Vec<SourceDescription>, serde_json::Error> {
    match value {
        Value::Array(items) => {
            let mut sources = Vec::new();
            for item in items {
                if let Some(descriptions) = item.get("sourceDescriptions") {
                    sources.extend(serde_json::from_value::<Vec<SourceDescription>>(
                        descriptions.clone(),
                    )?);
                } else {
                    sources.push(serde_json::from_value(item)?);
                }
            }
            Ok(sources)
        }
        Value::Object(mut obj) if obj.contains_key("sourceDescriptions") => {
            let descriptions = obj.remove("sourceDescriptions").unwrap_or(Value::Null);
            serde_json::from_value(descriptions)
        }
        other => serde_json::from_value(other),
    }
}
