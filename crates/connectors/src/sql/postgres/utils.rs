use crate::error::StoreError;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::future::Future;
use tokio_postgres::{Client, Config, NoTls, config::SslMode};
use tracing::{debug, error, warn};

/// How one connection attempt reaches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transport {
    Tls,
    Plain,
}

/// Attempts for an `sslmode`, in order. Only `prefer` falls back to plain text.
pub(crate) fn transports(mode: SslMode) -> &'static [Transport] {
    match mode {
        SslMode::Disable => &[Transport::Plain],
        SslMode::Prefer => &[Transport::Tls, Transport::Plain],
        _ => &[Transport::Tls],
    }
}

/// Parses a connection string and pins the session `search_path` when given.
pub(crate) fn metadata_config(url: &str, search_path: Option<&str>) -> Result<Config, StoreError> {
    let mut config = url
        .parse::<Config>()
        .map_err(|e| StoreError::InvalidUrl(e.to_string()))?;

    if let Some(path) = search_path.map(str::trim).filter(|p| !p.is_empty()) {
        let option = format!("-c search_path={path}");
        let options = match config.get_options() {
            Some(existing) if !existing.is_empty() => format!("{existing} {option}"),
            _ => option,
        };
        config.options(&options);
    }

    Ok(config)
}

pub(crate) async fn connect_client(config: &Config) -> Result<Client, StoreError> {
    let mut attempts = transports(config.get_ssl_mode()).iter().copied().peekable();

    while let Some(transport) = attempts.next() {
        match open(config, transport).await {
            Ok(client) => {
                debug!(?transport, "Connected to metadata database");
                return Ok(client);
            }
            Err(error) if attempts.peek().is_some() => {
                warn!(%error, ?transport, "Metadata database connection failed, trying next transport");
            }
            Err(error) => return Err(error),
        }
    }

    Err(StoreError::InvalidUrl(format!(
        "no transport for sslmode {:?}",
        config.get_ssl_mode()
    )))
}

async fn open(config: &Config, transport: Transport) -> Result<Client, StoreError> {
    match transport {
        Transport::Tls => {
            let tls = MakeTlsConnector::new(TlsConnector::builder().build()?);
            let (client, connection) = config.connect(tls).await?;
            drive(connection);
            Ok(client)
        }
        Transport::Plain => {
            let (client, connection) = config.connect(NoTls).await?;
            drive(connection);
            Ok(client)
        }
    }
}

/// The connection half must be polled for the client to make progress.
fn drive<C>(connection: C)
where
    C: Future<Output = Result<(), tokio_postgres::Error>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Metadata database connection closed with error");
        }
    });
}
