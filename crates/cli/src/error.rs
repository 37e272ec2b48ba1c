use connectors::error::StoreError;
use planner::AstError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse JSON input: {0}")]
    JsonDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Metadata store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to build AST: {0}")]
    Ast(AstError),

    #[error("Shutdown requested")]
    ShutdownRequested,
}

impl From<AstError> for CliError {
    fn from(err: AstError) -> Self {
        match err {
            AstError::Cancelled => CliError::ShutdownRequested,
            other => CliError::Ast(other),
        }
    }
}
