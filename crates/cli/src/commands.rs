use clap::{Args, Subcommand};
use model::access::permission::PermissionAction;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Build the permission-filtered AST for a query and print it as JSON
    Build(BuildArgs),

    /// Introspect the database schema and print it as JSON
    Schema {
        #[arg(long, help = "Load DB_* variables from this .env file")]
        env_file: Option<PathBuf>,

        #[arg(long, help = "If specified, writes the schema to this file instead of stdout")]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct BuildArgs {
    #[arg(long, help = "Root collection")]
    pub collection: String,

    #[arg(long, help = "Query JSON file path, or `-` for stdin")]
    pub query: String,

    #[arg(
        long,
        help = "Fixture file with schema, relations, permissions and fields; skips the database"
    )]
    pub fixture: Option<PathBuf>,

    #[arg(long, help = "Schema JSON file; overrides the fixture or introspected schema")]
    pub schema: Option<PathBuf>,

    #[arg(long, conflicts_with = "admin", help = "Role the request is made as")]
    pub role: Option<String>,

    #[arg(long, help = "Bypass permission checks")]
    pub admin: bool,

    #[arg(long, default_value = "read", help = "Permission action: read, create, update, ...")]
    pub action: PermissionAction,

    #[arg(long, help = "Fail on malformed selectors instead of dropping them")]
    pub strict: bool,

    #[arg(long, help = "Load DB_* variables from this .env file")]
    pub env_file: Option<PathBuf>,

    #[arg(long, help = "If specified, writes the AST to this file instead of stdout")]
    pub output: Option<PathBuf>,
}
