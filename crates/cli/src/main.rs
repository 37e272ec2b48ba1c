use crate::{
    commands::{BuildArgs, Commands},
    env::{DbConfig, EnvManager},
    error::CliError,
    fixture::Fixture,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use connectors::sql::postgres::PgMetadataStore;
use model::{
    access::accountability::Accountability, core::schema::SchemaOverview, query::Query,
};
use planner::{BuildOptions, build_ast};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod fixture;
mod output;
mod shutdown;

const STDIN: &str = "-";

#[derive(Parser)]
#[command(
    name = "querytree",
    version = "0.1.0",
    about = "Builds permission-filtered query trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    let code = match run(cli.command, &shutdown).await {
        Ok(()) => ExitCode::Success,
        Err(CliError::ShutdownRequested) => {
            warn!("Build cancelled");
            ExitCode::ShutdownRequested
        }
        Err(err) => {
            error!("{err}");
            ExitCode::GeneralError
        }
    };

    std::process::exit(code.as_i32());
}

async fn run(command: Commands, shutdown: &ShutdownCoordinator) -> Result<(), CliError> {
    match command {
        Commands::Build(args) => build(args, shutdown.cancel_token()).await,
        Commands::Schema { env_file, output } => {
            let store = connect(env_file.as_deref()).await?;
            let schema = store.load_schema().await?;
            info!(collections = schema.collections().count(), "Schema loaded");
            output::emit(&schema, output.as_deref()).await
        }
    }
}

async fn build(args: BuildArgs, cancel: CancellationToken) -> Result<(), CliError> {
    let query = read_query(&args.query).await?;

    let accountability = if args.admin {
        Accountability::admin()
    } else if let Some(role) = args.role.clone() {
        Accountability::role(role)
    } else {
        Accountability::public()
    };

    let mut options = BuildOptions::new()
        .with_accountability(accountability)
        .with_action(args.action)
        .with_cancel(cancel);
    if args.strict {
        options = options.strict();
    }

    let schema_override = match &args.schema {
        Some(path) => Some(read_json::<SchemaOverview>(path).await?),
        None => None,
    };

    let ast = match &args.fixture {
        Some(path) => {
            let fixture: Fixture = read_json(path).await?;
            let schema = schema_override.unwrap_or(fixture.schema);
            build_ast(&args.collection, &query, &schema, &fixture.store, options).await?
        }
        None => {
            let store = connect(args.env_file.as_deref()).await?;
            let schema = match schema_override {
                Some(schema) => schema,
                None => store.load_schema().await?,
            };
            build_ast(&args.collection, &query, &schema, &store, options).await?
        }
    };

    info!(
        collection = %ast.name,
        children = ast.children.len(),
        "AST built"
    );
    output::emit(&ast, args.output.as_deref()).await
}

async fn connect(env_file: Option<&Path>) -> Result<PgMetadataStore, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = env_file {
        env.load_from_file(path).await?;
    }

    let config = DbConfig::from_env(&env)?;
    debug!(?config, "Connecting to metadata database");

    Ok(PgMetadataStore::connect(&config.connection_string(), config.search_path()).await?)
}

async fn read_query(source: &str) -> Result<Query, CliError> {
    let raw = if source == STDIN {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        buffer
    } else {
        tokio::fs::read_to_string(source).await?
    };
    Ok(serde_json::from_str(&raw)?)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}
