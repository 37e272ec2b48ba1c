use crate::error::CliError;
use std::{collections::HashMap, fmt, path::Path};

pub const DB_CONNECTION_STRING: &str = "DB_CONNECTION_STRING";
pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_DATABASE: &str = "DB_DATABASE";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_SSL_MODE: &str = "DB_SSL_MODE";
pub const DB_SEARCH_PATH: &str = "DB_SEARCH_PATH";

const DEFAULT_PORT: u16 = 5432;

/// Process environment overlaid with an optional `.env` file.
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Values from the file win over the process environment.
    pub async fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {e}", path.display()))
        })?;

        self.parse_env_content(&content)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars.insert(key.to_string(), unquote(value.trim()));
        }

        Ok(())
    }
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

/// Where the metadata database lives.
#[derive(Clone, PartialEq, Eq)]
pub enum DbConfig {
    Url {
        url: String,
        search_path: Option<String>,
    },
    Parts {
        host: String,
        port: u16,
        database: String,
        user: String,
        password: Option<String>,
        ssl_mode: Option<String>,
        search_path: Option<String>,
    },
}

impl DbConfig {
    /// `DB_CONNECTION_STRING` takes precedence over the individual `DB_*` parts.
    pub fn from_env(env: &EnvManager) -> Result<Self, CliError> {
        let search_path = env.get(DB_SEARCH_PATH).map(str::to_string);

        if let Some(url) = env.get(DB_CONNECTION_STRING) {
            return Ok(DbConfig::Url {
                url: url.to_string(),
                search_path,
            });
        }

        let required = |key: &str| {
            env.get(key)
                .map(str::to_string)
                .ok_or_else(|| CliError::Config(format!("{key} or {DB_CONNECTION_STRING} must be set")))
        };

        let port = match env.get(DB_PORT) {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| CliError::Config(format!("{DB_PORT} is not a valid port: {port}")))?,
            None => DEFAULT_PORT,
        };

        Ok(DbConfig::Parts {
            host: required(DB_HOST)?,
            port,
            database: required(DB_DATABASE)?,
            user: required(DB_USER)?,
            password: env.get(DB_PASSWORD).map(str::to_string),
            ssl_mode: env.get(DB_SSL_MODE).map(str::to_string),
            search_path,
        })
    }

    /// Schema the metadata tables live in, applied by the store on connect.
    pub fn search_path(&self) -> Option<&str> {
        match self {
            DbConfig::Url { search_path, .. } | DbConfig::Parts { search_path, .. } => {
                search_path.as_deref()
            }
        }
    }

    /// Connection string accepted by `tokio_postgres::Config`, without the search path.
    pub fn connection_string(&self) -> String {
        match self {
            DbConfig::Url { url, .. } => url.clone(),
            DbConfig::Parts {
                host,
                port,
                database,
                user,
                password,
                ssl_mode,
                ..
            } => {
                let mut params = vec![
                    format!("host={host}"),
                    format!("port={port}"),
                    format!("dbname={database}"),
                    format!("user={user}"),
                ];
                if let Some(password) = password {
                    params.push(format!("password='{}'", escape(password)));
                }
                if let Some(mode) = ssl_mode {
                    params.push(format!("sslmode={mode}"));
                }
                params.join(" ")
            }
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbConfig::Url { search_path, .. } => f
                .debug_struct("Url")
                .field("url", &"<redacted>")
                .field("search_path", search_path)
                .finish(),
            DbConfig::Parts {
                host,
                port,
                database,
                user,
                ssl_mode,
                search_path,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("database", database)
                .field("user", user)
                .field("ssl_mode", ssl_mode)
                .field("search_path", search_path)
                .finish(),
        }
    }
}
