use thiserror::Error;

/// Errors raised while reading relation, permission or field metadata.
#[derive(Debug, Error)]
pub enum StoreError {
    /// PostgreSQL driver error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// TLS connector could not be built.
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// The connection string could not be parsed.
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    /// A fixture file could not be decoded.
    #[error("Fixture error: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A metadata row did not have the expected shape.
    #[error("Malformed metadata row: {0}")]
    MalformedRow(String),
}
