use anyhow::Result;
use ksqldb_graphql::ApiSchema;
use serde_json::json;

use crate::cli::OutputFormat;

pub fn print_schema(api: &ApiSchema, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", api.sdl()),
        OutputFormat::Json => {
            let out = json!({
                "sdl": api.sdl(),
                "diagnostics": api.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
