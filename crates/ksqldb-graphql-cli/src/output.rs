use colored::Colorize;
use ksqldb_graphql::schema::FieldTable;
use ksqldb_graphql::{Capability, Diagnostic, DiagnosticKind, ResolverFields};
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Prints build diagnostics to stderr, one per line, then a summary.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let marker = match diagnostic.kind {
            DiagnosticKind::EmptyQueryCapability => "✗".red(),
            _ => "!".yellow(),
        };
        eprintln!(
            "{} [{}] {}",
            marker,
            diagnostic.kind.code().dimmed(),
            diagnostic.message
        );
    }
    if !diagnostics.is_empty() {
        eprintln!("{} diagnostic(s) reported", diagnostics.len().to_string().yellow());
    }
}

/// Renders resolver fields as a table, optionally for one capability.
pub fn fields_table(fields: &ResolverFields, only: Option<Capability>) -> Option<String> {
    let mut builder = Builder::default();
    builder.push_record(["Capability", "Field", "Returns", "Arguments"]);

    let mut rows = 0;
    for capability in Capability::ALL {
        if only.is_some_and(|c| c != capability) {
            continue;
        }
        rows += push_rows(&mut builder, capability, fields.get(capability));
    }

    if rows == 0 {
        return None;
    }
    Some(builder.build().with(Style::rounded()).to_string())
}

fn push_rows(builder: &mut Builder, capability: Capability, table: &FieldTable) -> usize {
    for (name, entry) in table {
        let args = entry
            .args
            .iter()
            .map(|(arg, arg_type)| format!("{arg}: {}", arg_type.display_name()))
            .collect::<Vec<_>>()
            .join(", ");
        builder.push_record([
            capability.to_string(),
            name.clone(),
            entry.field_type.type_name().to_string(),
            if args.is_empty() { "-".to_string() } else { args },
        ]);
    }
    table.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksqldb_graphql::schema::{
        ArgumentTypes, FieldEntry, FieldType, ObjectType, ResolvedType, ScalarType,
        TypeDefinition,
    };

    fn resolver_fields() -> ResolverFields {
        let mut definition = TypeDefinition::new();
        definition.insert_if_absent("ID", ResolvedType::Scalar(ScalarType::String));
        let mut args = ArgumentTypes::new();
        args.insert("ID".into(), ResolvedType::Scalar(ScalarType::String));

        let mut fields = ResolverFields::default();
        fields.subscription_fields.insert(
            "PAGEVIEWS".into(),
            FieldEntry {
                field_type: FieldType::Source(ObjectType::new("PAGEVIEWS", definition)),
                args: args.clone(),
            },
        );
        fields.mutation_fields.insert(
            "PAGEVIEWS".into(),
            FieldEntry {
                field_type: FieldType::MutationAck,
                args,
            },
        );
        fields
    }

    #[test]
    fn test_fields_table_lists_every_capability() {
        let table = fields_table(&resolver_fields(), None).unwrap();

        assert!(table.contains("Subscription"));
        assert!(table.contains("Mutation"));
        assert!(table.contains("KsqlDBMutation"));
        assert!(table.contains("ID: String"));
    }

    #[test]
    fn test_fields_table_for_empty_capability() {
        assert!(fields_table(&resolver_fields(), Some(Capability::Query)).is_none());
    }
}
