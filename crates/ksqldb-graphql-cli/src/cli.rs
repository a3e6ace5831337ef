use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use ksqldb_graphql::Capability;

#[derive(Parser)]
#[command(name = "ksqldb-graphql")]
#[command(about = "Generate a GraphQL API from the streams and tables of a ksqlDB server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// ksqlDB server URL (overrides config and KSQLDB_URL env var)
    #[arg(short, long, global = true, env = "KSQLDB_URL")]
    pub server: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, global = true, env = "KSQLDB_GRAPHQL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the generated schema as SDL
    Schema(SchemaArgs),
    /// List the root fields handed to resolvers
    Fields(FieldsArgs),
}

#[derive(clap::Args)]
pub struct CatalogArgs {
    /// Read the catalog from a JSON file instead of the server
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub source: CatalogArgs,
}

#[derive(clap::Args)]
pub struct FieldsArgs {
    #[command(flatten)]
    pub source: CatalogArgs,
    /// Only list fields of one root type
    #[arg(long)]
    pub capability: Option<CapabilityArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CapabilityArg {
    Query,
    Mutation,
    Subscription,
}

impl From<CapabilityArg> for Capability {
    fn from(arg: CapabilityArg) -> Self {
        match arg {
            CapabilityArg::Query => Capability::Query,
            CapabilityArg::Mutation => Capability::Mutation,
            CapabilityArg::Subscription => Capability::Subscription,
        }
    }
}
