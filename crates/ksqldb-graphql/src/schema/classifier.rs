//! Capability classification.
//!
//! Every source can be subscribed to and written to. Only materialized
//! sources, those with write-queries behind them, can be queried.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::definition::{ObjectType, ResolvedType, TypeDefinition, is_valid_graphql_name};
use super::registry::TypeRegistry;
use crate::catalog::SourceDescription;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Name of the object type returned by every mutation field.
pub const MUTATION_ACK_TYPE: &str = "KsqlDBMutation";

/// Name of the placeholder `Query` field and of its always-null scalar.
pub const SENTINEL_FIELD: &str = "KsqlDBGraphQLError";

/// One of the three API roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Capability {
    Query,
    Mutation,
    Subscription,
}

impl Capability {
    pub const ALL: [Capability; 3] = [Self::Query, Self::Mutation, Self::Subscription];

    /// Returns the root type name in the schema.
    pub fn root_type_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.root_type_name())
    }
}

/// What a root field returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldType {
    /// Rows of the source.
    Source(ObjectType),
    /// The fixed [`MUTATION_ACK_TYPE`] acknowledgement.
    MutationAck,
    /// The [`SENTINEL_FIELD`] placeholder scalar.
    Sentinel,
}

impl FieldType {
    /// Returns the GraphQL type name this field returns.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Source(object) => &object.name,
            Self::MutationAck => MUTATION_ACK_TYPE,
            Self::Sentinel => SENTINEL_FIELD,
        }
    }
}

/// Argument name to argument type, in column order.
pub type ArgumentTypes = IndexMap<String, ResolvedType>;

/// A root field: its return type and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEntry {
    pub field_type: FieldType,
    pub args: ArgumentTypes,
}

impl FieldEntry {
    pub fn is_sentinel(&self) -> bool {
        matches!(self.field_type, FieldType::Sentinel)
    }

    fn sentinel() -> Self {
        Self {
            field_type: FieldType::Sentinel,
            args: ArgumentTypes::new(),
        }
    }
}

/// Root field name to field entry.
pub type FieldTable = IndexMap<String, FieldEntry>;

/// The three capability tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldTables {
    pub query: FieldTable,
    pub mutation: FieldTable,
    pub subscription: FieldTable,
}

impl FieldTables {
    pub fn table(&self, capability: Capability) -> &FieldTable {
        match capability {
            Capability::Query => &self.query,
            Capability::Mutation => &self.mutation,
            Capability::Subscription => &self.subscription,
        }
    }

    /// Returns true if `Query` holds the sentinel field.
    ///
    /// The sentinel is only installed into an otherwise empty table.
    pub fn has_sentinel_query(&self) -> bool {
        self.query.values().any(FieldEntry::is_sentinel)
    }
}

/// Derives field arguments from a type definition.
///
/// Scalar and list-of-scalar fields become arguments of the same type.
/// Object-typed fields are left out.
pub fn derive_arguments(definition: &TypeDefinition) -> ArgumentTypes {
    definition
        .iter()
        .filter(|(_, field_type)| field_type.is_input_type())
        .map(|(name, field_type)| (name.clone(), field_type.clone()))
        .collect()
}

/// Partitions built source types into capability tables.
///
/// `sources` are the descriptions the types were built from; they decide
/// which sources are materialized. Each source type passes through a
/// [`TypeRegistry`] first, so a type name that is reserved or already taken
/// by a different shape never reaches the tables.
pub fn classify(
    source_types: &[ObjectType],
    sources: &[SourceDescription],
    diagnostics: &mut Diagnostics,
) -> FieldTables {
    let mut tables = FieldTables::default();
    let mut registry = TypeRegistry::new();

    for source_type in source_types {
        if !is_valid_graphql_name(&source_type.name) {
            diagnostics.invalid_name(&source_type.name);
            continue;
        }
        if source_type.fields.is_empty() {
            diagnostics.unsupported_type(format!(
                "source {} has no supported fields",
                source_type.name
            ));
            continue;
        }
        if tables.subscription.contains_key(&source_type.name) {
            diagnostics.name_collision(&source_type.name);
            continue;
        }
        let Some(source_type) = registry.admit(source_type, diagnostics) else {
            continue;
        };

        let args = derive_arguments(&source_type.fields);
        let name = source_type.name.clone();
        tables.subscription.insert(
            name.clone(),
            FieldEntry {
                field_type: FieldType::Source(source_type),
                args: args.clone(),
            },
        );
        tables.mutation.insert(
            name,
            FieldEntry {
                field_type: FieldType::MutationAck,
                args,
            },
        );
    }

    for source_type in source_types {
        if tables.query.contains_key(&source_type.name) {
            continue;
        }
        let materialized = sources
            .iter()
            .find(|source| source.name == source_type.name)
            .is_some_and(SourceDescription::is_materialized);
        if !materialized {
            continue;
        }

        // A materialized source exposes the same field as its subscription.
        let entry = match tables.subscription.get(&source_type.name) {
            Some(subscription) => subscription.clone(),
            None => continue,
        };
        tables.query.insert(source_type.name.clone(), entry);
    }

    if tables.query.is_empty() {
        diagnostics.push(
            DiagnosticKind::EmptyQueryCapability,
            "No materialized views have been registered. \
             Only subscriptions and mutations will work properly. \
             Defaulting `type Query` to a null scalar since it is required by GraphQL.",
        );
        tables.query.insert(SENTINEL_FIELD.to_string(), FieldEntry::sentinel());
    }

    debug!(
        queries = tables.query.len(),
        mutations = tables.mutation.len(),
        subscriptions = tables.subscription.len(),
        "Classified sources"
    );

    tables
}
