//! GraphQL schema assembly.
//!
//! Composes classified field tables into an `async_graphql` dynamic schema
//! with `Query`, `Mutation`, and `Subscription` roots, and produces the
//! flattened resolver field table.

use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{
    Field, FieldFuture, InputValue, Object, ResolverContext, Scalar, Schema, Subscription,
    SubscriptionField, SubscriptionFieldFuture, TypeRef,
};
use futures_util::StreamExt;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use super::classifier::{
    ArgumentTypes, Capability, FieldTable, FieldTables, FieldType, MUTATION_ACK_TYPE,
    SENTINEL_FIELD,
};
use super::definition::ObjectType;
use crate::config::GraphQLConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::KsqlGraphQLError;
use crate::resolvers::{SourceResolver, arguments_to_json, json_to_graphql_value};

/// Root fields handed to the resolver layer, by capability.
///
/// The sentinel `Query` field is never listed; it exists only to keep the
/// schema valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolverFields {
    pub query_fields: FieldTable,
    pub subscription_fields: FieldTable,
    pub mutation_fields: FieldTable,
}

impl ResolverFields {
    pub fn from_tables(tables: &FieldTables) -> Self {
        Self {
            query_fields: tables
                .query
                .iter()
                .filter(|(_, entry)| !entry.is_sentinel())
                .map(|(name, entry)| (name.clone(), entry.clone()))
                .collect(),
            subscription_fields: tables.subscription.clone(),
            mutation_fields: tables.mutation.clone(),
        }
    }

    pub fn get(&self, capability: Capability) -> &FieldTable {
        match capability {
            Capability::Query => &self.query_fields,
            Capability::Mutation => &self.mutation_fields,
            Capability::Subscription => &self.subscription_fields,
        }
    }
}

/// Result of a successful build.
pub struct ApiSchema {
    /// The executable schema.
    pub schema: Schema,
    /// The capability tables, sentinel included.
    pub tables: FieldTables,
    /// The flattened resolver field table.
    pub fields: ResolverFields,
    /// Recoverable conditions hit during the build.
    pub diagnostics: Vec<Diagnostic>,
}

impl ApiSchema {
    /// Prints the schema as SDL.
    pub fn sdl(&self) -> String {
        self.schema.sdl()
    }
}

impl std::fmt::Debug for ApiSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSchema")
            .field("tables", &self.tables)
            .field("fields", &self.fields)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}

/// Builds the dynamic schema from field tables.
pub struct SchemaAssembler {
    config: GraphQLConfig,
    resolver: Arc<dyn SourceResolver>,
}

impl SchemaAssembler {
    #[must_use]
    pub fn new(config: GraphQLConfig, resolver: Arc<dyn SourceResolver>) -> Self {
        Self { config, resolver }
    }

    /// Assembles the schema.
    ///
    /// `Mutation` and `Subscription` roots are only declared when their
    /// tables have fields.
    ///
    /// # Errors
    ///
    /// Returns `SchemaBuildFailed` if the GraphQL type system rejects the
    /// result.
    pub fn assemble(
        &self,
        tables: FieldTables,
        diagnostics: Diagnostics,
    ) -> Result<ApiSchema, KsqlGraphQLError> {
        debug!("Starting GraphQL schema build");

        let mutation_root =
            (!tables.mutation.is_empty()).then(|| Capability::Mutation.root_type_name());
        let subscription_root =
            (!tables.subscription.is_empty()).then(|| Capability::Subscription.root_type_name());

        let mut builder = Schema::build(
            Capability::Query.root_type_name(),
            mutation_root,
            subscription_root,
        );

        let objects = collect_object_types(&tables);
        debug!(count = objects.len(), "Registering source object types");
        for object in objects {
            builder = builder.register(build_object(object));
        }

        if tables.has_sentinel_query() {
            builder = builder.register(
                Scalar::new(SENTINEL_FIELD)
                    .description("Placeholder for a schema without materialized sources; always null"),
            );
        }
        builder = builder.register(self.build_query_type(tables.table(Capability::Query)));

        if mutation_root.is_some() {
            builder = builder.register(create_mutation_ack_type());
            builder = builder.register(self.build_mutation_type(tables.table(Capability::Mutation)));
        }
        if subscription_root.is_some() {
            builder = builder.register(
                self.build_subscription_type(tables.table(Capability::Subscription)),
            );
        }

        let mut builder = builder
            .limit_depth(self.config.max_depth)
            .limit_complexity(self.config.max_complexity);
        if !self.config.introspection {
            builder = builder.disable_introspection();
        }

        let schema = builder
            .finish()
            .map_err(|e| KsqlGraphQLError::SchemaBuildFailed(e.to_string()))?;

        debug!("GraphQL schema build complete");

        let fields = ResolverFields::from_tables(&tables);
        Ok(ApiSchema {
            schema,
            tables,
            fields,
            diagnostics: diagnostics.into_vec(),
        })
    }

    /// Builds the Query root type.
    fn build_query_type(&self, table: &FieldTable) -> Object {
        let mut query = Object::new(Capability::Query.root_type_name())
            .description("Materialized ksqlDB sources");

        for (name, entry) in table {
            let field = if entry.is_sentinel() {
                Field::new(name, TypeRef::named(SENTINEL_FIELD), |_| {
                    FieldFuture::new(async { Ok(None::<Value>) })
                })
                .description("No materialized sources are registered")
            } else {
                with_arguments(
                    Field::new(
                        name,
                        TypeRef::named(entry.field_type.type_name()),
                        root_resolver(Arc::clone(&self.resolver), Capability::Query, name.clone()),
                    ),
                    &entry.args,
                )
                .description(format!("Read rows of {name}"))
            };
            query = query.field(field);
            trace!(source = %name, "Added query field");
        }

        query
    }

    /// Builds the Mutation root type.
    fn build_mutation_type(&self, table: &FieldTable) -> Object {
        let mut mutation = Object::new(Capability::Mutation.root_type_name())
            .description("Insert rows into ksqlDB sources");

        for (name, entry) in table {
            let field = with_arguments(
                Field::new(
                    name,
                    TypeRef::named(entry.field_type.type_name()),
                    root_resolver(Arc::clone(&self.resolver), Capability::Mutation, name.clone()),
                ),
                &entry.args,
            )
            .description(format!("Insert a row into {name}"));
            mutation = mutation.field(field);
            trace!(source = %name, "Added mutation field");
        }

        mutation
    }

    /// Builds the Subscription root type.
    fn build_subscription_type(&self, table: &FieldTable) -> Subscription {
        let mut subscription = Subscription::new(Capability::Subscription.root_type_name());

        for (name, entry) in table {
            let resolver = Arc::clone(&self.resolver);
            let source = name.clone();
            let mut field = SubscriptionField::new(
                name,
                TypeRef::named(entry.field_type.type_name()),
                move |ctx| {
                    let resolver = Arc::clone(&resolver);
                    let source = source.clone();
                    let args = arguments_to_json(&ctx.args);

                    SubscriptionFieldFuture::new(async move {
                        let args = args?;
                        debug!(source = %source, "Starting subscription");
                        let rows = resolver.subscribe(&source, args).await?;
                        Ok(rows.map(|row| {
                            row.map(json_to_graphql_value)
                                .map_err(|e| async_graphql::Error::new(e.to_string()))
                        }))
                    })
                },
            )
            .description(format!("Stream rows of {name} as they arrive"));

            for (arg_name, arg_type) in &entry.args {
                field = field.argument(InputValue::new(arg_name, arg_type.type_ref()));
            }
            subscription = subscription.field(field);
            trace!(source = %name, "Added subscription field");
        }

        subscription
    }
}

/// Creates a resolver forwarding a root field to the source resolver.
fn root_resolver(
    resolver: Arc<dyn SourceResolver>,
    capability: Capability,
    source: String,
) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + 'static {
    move |ctx| {
        let resolver = Arc::clone(&resolver);
        let source = source.clone();
        FieldFuture::new(async move {
            let args = arguments_to_json(&ctx.args)?;
            debug!(source = %source, capability = %capability, "Resolving root field");

            let row = match capability {
                Capability::Mutation => resolver.mutate(&source, args).await?,
                _ => resolver.query(&source, args).await?,
            };
            Ok(row.map(json_to_graphql_value))
        })
    }
}

/// Collects the object types to register, once per name.
///
/// Names were settled by the type registry during classification, so a
/// repeated name here is the same type reached through another field.
fn collect_object_types(tables: &FieldTables) -> Vec<&ObjectType> {
    let mut registered: IndexMap<&str, &ObjectType> = IndexMap::new();

    for entry in tables.subscription.values().chain(tables.query.values()) {
        let FieldType::Source(source) = &entry.field_type else {
            continue;
        };
        for object in std::iter::once(source).chain(source.nested_objects()) {
            registered.entry(object.name.as_str()).or_insert(object);
        }
    }

    registered.into_values().collect()
}

/// Builds a dynamic object type whose fields read from the parent value.
fn build_object(object: &ObjectType) -> Object {
    object
        .fields
        .iter()
        .fold(Object::new(&object.name), |obj, (name, field_type)| {
            obj.field(create_field_resolver(name, field_type.type_ref()))
        })
}

fn with_arguments(field: Field, args: &ArgumentTypes) -> Field {
    args.iter().fold(field, |field, (name, arg_type)| {
        field.argument(InputValue::new(name, arg_type.type_ref()))
    })
}

/// Creates the acknowledgement type returned by mutation fields.
fn create_mutation_ack_type() -> Object {
    Object::new(MUTATION_ACK_TYPE)
        .description("Acknowledgement of a row submitted to ksqlDB")
        .field(
            create_field_resolver("success", TypeRef::named(TypeRef::BOOLEAN))
                .description("Whether ksqlDB accepted the row"),
        )
        .field(
            create_field_resolver("error", TypeRef::named(TypeRef::STRING))
                .description("Error message when the row was rejected"),
        )
}

/// Creates a field resolver that extracts a value from the parent JSON object.
fn create_field_resolver(field_name: &str, type_ref: TypeRef) -> Field {
    let key = field_name.to_string();

    Field::new(field_name, type_ref, move |ctx| {
        let key = key.clone();
        FieldFuture::new(async move {
            if let Some(Value::Object(obj)) = ctx.parent_value.as_value()
                && let Some(value) = obj.get(key.as_str())
            {
                return Ok(Some(value.clone()));
            }
            Ok(None)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolvers::NullResolver;
    use crate::schema::classifier::FieldEntry;
    use crate::schema::definition::{ResolvedType, ScalarType, TypeDefinition};

    fn object(name: &str, fields: &[(&str, ResolvedType)]) -> ObjectType {
        let mut definition = TypeDefinition::new();
        for (field, field_type) in fields {
            definition.insert_if_absent(*field, field_type.clone());
        }
        ObjectType::new(name, definition)
    }

    fn source_entry(object: ObjectType) -> FieldEntry {
        FieldEntry {
            field_type: FieldType::Source(object),
            args: ArgumentTypes::new(),
        }
    }

    fn assembler() -> SchemaAssembler {
        SchemaAssembler::new(GraphQLConfig::default(), Arc::new(NullResolver))
    }

    #[test]
    fn test_resolver_fields_exclude_sentinel() {
        let mut tables = FieldTables::default();
        tables.query.insert(
            SENTINEL_FIELD.to_string(),
            FieldEntry {
                field_type: FieldType::Sentinel,
                args: ArgumentTypes::new(),
            },
        );

        let fields = ResolverFields::from_tables(&tables);
        assert!(fields.query_fields.is_empty());
    }

    #[test]
    fn test_query_only_schema() {
        let users = object("USERS", &[("ID", ResolvedType::Scalar(ScalarType::String))]);
        let mut tables = FieldTables::default();
        tables.query.insert("USERS".into(), source_entry(users));

        let api = assembler().assemble(tables, Diagnostics::new()).unwrap();
        let sdl = api.sdl();

        assert!(sdl.contains("type Query"));
        assert!(sdl.contains("type USERS"));
        assert!(!sdl.contains("type Mutation"));
        assert!(!sdl.contains("type Subscription"));
    }

    #[test]
    fn test_shared_nested_type_registered_once() {
        let address = object("ADDRESS", &[("CITY", ResolvedType::Scalar(ScalarType::String))]);
        let a = object("A", &[("ADDRESS", ResolvedType::Object(address.clone()))]);
        let b = object("B", &[("ADDRESS", ResolvedType::Object(address))]);
        let mut tables = FieldTables::default();
        tables.subscription.insert("A".into(), source_entry(a.clone()));
        tables.subscription.insert("B".into(), source_entry(b.clone()));
        tables.query.insert("A".into(), source_entry(a));

        let names: Vec<_> = collect_object_types(&tables)
            .iter()
            .map(|o| o.name.clone())
            .collect();

        assert_eq!(names, vec!["A", "ADDRESS", "B"]);
    }

    #[test]
    fn test_disabled_introspection_still_builds() {
        let users = object("USERS", &[("ID", ResolvedType::Scalar(ScalarType::String))]);
        let mut tables = FieldTables::default();
        tables.query.insert("USERS".into(), source_entry(users));
        let config = GraphQLConfig {
            introspection: false,
            ..Default::default()
        };

        let result = SchemaAssembler::new(config, Arc::new(NullResolver))
            .assemble(tables, Diagnostics::new());
        assert!(result.is_ok());
    }
}
