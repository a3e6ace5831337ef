use anyhow::Result;
use ksqldb_graphql::{ApiSchema, Capability};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::output::fields_table;

pub fn print_fields(api: &ApiSchema, only: Option<Capability>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => match fields_table(&api.fields, only) {
            Some(table) => println!("{table}"),
            None => println!("No fields found."),
        },
        OutputFormat::Json => {
            let value = match only {
                Some(capability) => serde_json::to_value(api.fields.get(capability))?,
                None => serde_json::to_value(&api.fields)?,
            };
            print_json(&value)?;
        }
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
