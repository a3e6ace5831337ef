mod cli;
mod client;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::{print_error, print_success};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);

    let cfg = config::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or_default();
    let server = cli.server.as_deref();

    match &cli.command {
        Commands::Schema(args) => {
            let api = commands::generate(server, &args.source, &cfg).await?;
            commands::schema::print_schema(&api, format)?;
        }
        Commands::Fields(args) => {
            let api = commands::generate(server, &args.source, &cfg).await?;
            commands::fields::print_fields(&api, args.capability.map(Into::into), format)?;
            print_success(&format!(
                "{} query, {} mutation, {} subscription field(s)",
                api.fields.query_fields.len(),
                api.fields.mutation_fields.len(),
                api.fields.subscription_fields.len()
            ));
        }
    }

    Ok(())
}
