use std::{env, fmt::Display, str::FromStr};

use axum::http::HeaderValue;

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub admin_email: String,
    pub admin_password: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Browser origins allowed by CORS, from a comma-separated `CORS_ORIGIN`.
    pub cors_origins: Vec<HeaderValue>,
}

impl Config {
    /// Reads the server configuration from the process environment. A `.env`
    /// file is honoured when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: try_load("PORT", "8000")?,
            admin_email: required("ADMIN_EMAIL")?,
            admin_password: required("ADMIN_PASSWORD")?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_hours: try_load("TOKEN_TTL_HOURS", "24")?,
            cors_origins: parse_origins(
                &env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            )?,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }
    })
}

pub fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                key: "CORS_ORIGIN",
                reason: format!("{origin}: {e}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if origins.is_empty() {
        return Err(ConfigError::Invalid {
            key: "CORS_ORIGIN",
            reason: "no origin given".into(),
        });
    }
    Ok(origins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_origins_are_comma_separated() {
        let origins = parse_origins("https://admin.vanrakshak.in, https://report.vanrakshak.in,").unwrap();
        assert_eq!(
            origins,
            [
                HeaderValue::from_static("https://admin.vanrakshak.in"),
                HeaderValue::from_static("https://report.vanrakshak.in"),
            ]
        );
    }

    #[test]
    fn empty_or_broken_origins_are_rejected() {
        assert!(matches!(parse_origins(" , "), Err(ConfigError::Invalid { key: "CORS_ORIGIN", .. })));
        assert!(parse_origins("https://ok.in,bad\norigin").is_err());
        assert!(parse_origins("https://ok.in,bad\u{7f}origin").is_err());
    }
}
