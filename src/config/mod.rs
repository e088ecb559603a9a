use std::env;

pub mod cors;
pub mod request_log;

pub use cors::create_cors_layer;
pub use request_log::create_request_log_layer;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Some(StoreBackend::Postgres),
            "memory" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub store: StoreBackend,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to defaults
    /// for missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| {
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port = lookup("DB_PORT")
                    .and_then(|p| p.trim().parse::<u16>().ok())
                    .unwrap_or(DEFAULT_DB_PORT);
                let user = lookup("DB_USER").unwrap_or_else(|| "postgres".to_string());
                let password = lookup("DB_PASS").unwrap_or_else(|| "postgres".to_string());
                let name = lookup("DB_NAME").unwrap_or_else(|| "ems".to_string());
                format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
            });

        let port = lookup("PORT")
            .and_then(|p| p.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|n| n.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let store = match lookup("EVENT_STORE") {
            Some(raw) => StoreBackend::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Config: unknown EVENT_STORE '{}', using postgres", raw);
                StoreBackend::Postgres
            }),
            None => StoreBackend::Postgres,
        };

        Self {
            database_url,
            port,
            max_connections,
            store,
        }
    }
}
