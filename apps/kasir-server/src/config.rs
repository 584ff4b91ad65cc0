//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file is read by `main` before this runs.

use kasir_db::{DbConfig, DbError, DEFAULT_DATABASE_URL};
use std::env;
use std::net::SocketAddr;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,kasir=debug,sqlx=warn,tower_http=debug";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Normalized connection string
    pub database_url: String,

    /// Pool size
    pub db_max_connections: u32,

    /// Run migrations at startup instead of via the `migrate` binary
    pub auto_migrate: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("DATABASE_URL")
            .or_else(|| lookup("DATABASE"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        // Rejects unsupported schemes up front
        let db = DbConfig::from_url(&raw_url)?;

        let config = ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            database_url: db.database_url,

            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            auto_migrate: match lookup("AUTO_MIGRATE") {
                None => false,
                Some(v) => parse_bool(&v)
                    .ok_or_else(|| ConfigError::InvalidValue("AUTO_MIGRATE".to_string()))?,
            },
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("HOST".to_string()))
    }

    /// Pool configuration derived from this config.
    pub fn db_config(&self) -> Result<DbConfig, ConfigError> {
        Ok(DbConfig::from_url(&self.database_url)?
            .max_connections(self.db_max_connections)
            .run_migrations(self.auto_migrate))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid database configuration: {0}")]
    Database(#[from] DbError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_url, "sqlite://kasir.db");
        assert_eq!(config.db_max_connections, 5);
        assert!(!config.auto_migrate);
        assert_eq!(config.bind_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_database_url_precedence_and_normalization() {
        let config = load(&[
            ("DATABASE", "sqlite://other.db"),
            ("DATABASE_URL", "postgres://kasir@db/kasir"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgresql://kasir@db/kasir");

        let config = load(&[("DATABASE", "sqlite://other.db")]).unwrap();
        assert_eq!(config.database_url, "sqlite://other.db");
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = load(&[("PORT", "http")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT");

        let err = load(&[("DB_MAX_CONNECTIONS", "0")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for DB_MAX_CONNECTIONS");

        let err = load(&[("AUTO_MIGRATE", "maybe")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for AUTO_MIGRATE");
    }

    #[test]
    fn test_unsupported_database_scheme() {
        let err = load(&[("DATABASE_URL", "mysql://localhost/kasir")]).unwrap_err();
        assert!(matches!(err, ConfigError::Database(DbError::UnsupportedBackend(_))));
    }

    #[test]
    fn test_db_config() {
        let config = load(&[("DB_MAX_CONNECTIONS", "12"), ("AUTO_MIGRATE", "true")]).unwrap();
        let db = config.db_config().unwrap();

        assert_eq!(db.max_connections, 12);
        assert!(db.run_migrations);
    }
}
