use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

/// Default bind port; the web client proxies `/api` here.
const DEFAULT_PORT: u16 = 5000;
/// Default upper bound on pooled database connections.
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

/// A malformed or missing environment variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and JWT secret have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Maximum pooled connections (default: `20`).
    pub db_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT validation settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `DATABASE_URL`         | required                   |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// See [`JwtConfig::from_lookup`] for the token settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", "u16", DEFAULT_PORT)?;

        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let db_max_connections =
            parse_or(&lookup, "DB_MAX_CONNECTIONS", "u32", DEFAULT_DB_MAX_CONNECTIONS)?;

        let cors_origins = parse_origins(
            &lookup("CORS_ORIGINS").unwrap_or_else(|| "http://localhost:5173".into()),
        )?;

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", "u64", 30)?;

        let jwt = JwtConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            cors_origins,
            request_timeout_secs,
            jwt,
        })
    }
}

/// Split a comma-separated origin list, rejecting any entry that is not a
/// valid header value.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            origin.parse().map_err(|_| ConfigError::Invalid {
                name: "CORS_ORIGINS",
                expected: "origin header value",
                value: origin.to_string(),
            })
        })
        .collect()
}

/// Parse `name` with `FromStr`, falling back to `default` when unset.
pub(crate) fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn origins(config: &ServerConfig) -> Vec<&str> {
        config
            .cors_origins
            .iter()
            .map(|o| o.to_str().unwrap())
            .collect()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/gridwatch"),
        ("JWT_SECRET", "test-secret"),
    ];

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(origins(&config), vec!["http://localhost:5173"]);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.jwt.access_token_expiry_mins, 60);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("CORS_ORIGINS", "http://a.test, http://b.test,,"));
        let config = ServerConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(origins(&config), vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn invalid_cors_origin_fails() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("CORS_ORIGINS", "http://a.test,http://bad\u{1}origin"));
        let result = ServerConfig::from_lookup(lookup_from(&vars));
        assert_matches!(
            result,
            Err(ConfigError::Invalid { name: "CORS_ORIGINS", value, .. }) if value.contains("bad")
        );
    }

    #[test]
    fn missing_database_url_fails() {
        let result = ServerConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s")]));
        assert_matches!(result, Err(ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn invalid_port_fails() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "eighty"));
        let result = ServerConfig::from_lookup(lookup_from(&vars));
        assert_matches!(result, Err(ConfigError::Invalid { name: "PORT", .. }));
    }
}
