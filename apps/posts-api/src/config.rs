//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use posts_core::ConcurrencyMode;
use posts_infra::DatabaseConfig;

use crate::telemetry::LogFormat;

/// Page size used by v2 list endpoints when the client sends none.
pub const DEFAULT_PAGE_SIZE: u64 = 5;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub concurrency: ConcurrencyMode,
    pub default_page_size: u64,
    pub log_format: LogFormat,
    pub service_name: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails on an unknown `CONFLICT_DETECTION` value.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let database = var("DATABASE_URL").map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var(&var, "DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var(&var, "DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let concurrency = match var("CONFLICT_DETECTION") {
            Some(value) => value.parse()?,
            None => ConcurrencyMode::default(),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(&var, "PORT").unwrap_or(8080),
            database,
            concurrency,
            default_page_size: parse_var(&var, "DEFAULT_PAGE_SIZE")
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            log_format: var("LOG_FORMAT")
                .map(|v| LogFormat::from_name(&v))
                .unwrap_or_default(),
            service_name: var("OTEL_SERVICE_NAME").unwrap_or_else(|| "posts-api".to_string()),
        })
    }
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    var(name).and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert!(config.database.is_none());
        assert_eq!(config.port, 8080);
        assert_eq!(config.concurrency, ConcurrencyMode::Optimistic);
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.service_name, "posts-api");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/posts"),
            ("DB_MAX_CONNECTIONS", "20"),
            ("CONFLICT_DETECTION", "disabled"),
            ("DEFAULT_PAGE_SIZE", "0"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.database.unwrap().max_connections, 20);
        assert_eq!(config.concurrency, ConcurrencyMode::LastWriterWins);
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_conflict_mode_is_rejected() {
        assert!(load(&[("CONFLICT_DETECTION", "sometimes")]).is_err());
    }
}
