// src/config.rs
use std::net::IpAddr;
use std::time::{Duration, SystemTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Ten years; session expiry and cookie token `exp` must stay representable.
pub const MAX_SESSION_TTL_SECONDS: u64 = 60 * 60 * 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub secret: String,
    pub cookie_name: String,
    pub ttl: Duration,
    pub secure: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub session: SessionSettings,
    pub password_iterations: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let database_url = required("DATABASE_URL")?;
        let secret = required("SESSION_SECRET")?;

        let host = parse_or(&lookup, "HOST", IpAddr::from([127, 0, 0, 1]))?;
        let ttl_secs: u64 = parse_or(&lookup, "SESSION_TTL_SECONDS", 60 * 60 * 24 * 14)?;
        let ttl = Duration::from_secs(ttl_secs);
        if ttl_secs > MAX_SESSION_TTL_SECONDS
            || chrono::Duration::from_std(ttl).is_err()
            || SystemTime::now().checked_add(ttl).is_none()
        {
            return Err(ConfigError::Invalid {
                name: "SESSION_TTL_SECONDS",
                value: ttl_secs.to_string(),
            });
        }
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            host,
            port: parse_or(&lookup, "PORT", 8000)?,
            session: SessionSettings {
                secret,
                cookie_name: lookup("SESSION_COOKIE_NAME").unwrap_or_else(|| "sessionid".to_string()),
                ttl,
                secure: parse_or(&lookup, "SESSION_COOKIE_SECURE", false)?,
            },
            password_iterations: parse_or(&lookup, "PASSWORD_ITERATIONS", 600_000)?,
            cors_allowed_origins,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(env(&[
            ("DATABASE_URL", "postgres://localhost/vacations"),
            ("SESSION_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.host.to_string(), "127.0.0.1");
        assert_eq!(config.session.cookie_name, "sessionid");
        assert_eq!(config.session.ttl, Duration::from_secs(1_209_600));
        assert!(!config.session.secure);
        assert_eq!(config.password_iterations, 600_000);
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let err = AppConfig::from_lookup(env(&[("DATABASE_URL", "postgres://localhost/v")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SESSION_SECRET")));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(env(&[
            ("DATABASE_URL", "postgres://localhost/v"),
            ("SESSION_SECRET", "x"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_unrepresentable_session_ttl_is_rejected() {
        let max = u64::MAX.to_string();
        for value in [max.as_str(), "315360001"] {
            let err = AppConfig::from_lookup(env(&[
                ("DATABASE_URL", "postgres://localhost/v"),
                ("SESSION_SECRET", "x"),
                ("SESSION_TTL_SECONDS", value),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: "SESSION_TTL_SECONDS", .. }));
        }

        let config = AppConfig::from_lookup(env(&[
            ("DATABASE_URL", "postgres://localhost/v"),
            ("SESSION_SECRET", "x"),
            ("SESSION_TTL_SECONDS", "315360000"),
        ]))
        .unwrap();
        assert_eq!(config.session.ttl.as_secs(), MAX_SESSION_TTL_SECONDS);
    }

    #[test]
    fn test_origins_are_split() {
        let config = AppConfig::from_lookup(env(&[
            ("DATABASE_URL", "postgres://localhost/v"),
            ("SESSION_SECRET", "x"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("SESSION_COOKIE_SECURE", "true"),
        ]))
        .unwrap();
        assert_eq!(config.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert!(config.session.secure);
    }
}
