use std::{net::SocketAddr, time::Duration};

use rvw_db::{DatabaseConfig, InvalidConfig};
use serde::Deserialize;
use thiserror::Error;

/// Deployment environment, read from `ENVIRONMENT`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Env(#[from] envy::Error),
    #[error(transparent)]
    Invalid(#[from] InvalidConfig),
}

/// Service settings, built once at startup.
///
/// | Variable                       | Default        |
/// |--------------------------------|----------------|
/// | `ENVIRONMENT`                  | `development`  |
/// | `BIND_ADDR`                    | `0.0.0.0:8080` |
/// | `CLOUDAMQP_WEBHOOK_SECRET_KEY` | required       |
/// | `REQUEST_TIMEOUT_SECS`         | `10`           |
/// | `DATABASE_*`                   | see [`DatabaseConfig`] |
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub webhook_secret: String,
    pub request_timeout: Duration,
    pub database: DatabaseConfig,
}

#[derive(Deserialize)]
struct RawApiConfig {
    #[serde(default)]
    environment: Environment,
    #[serde(default = "default_bind_addr")]
    bind_addr: String,
    cloudamqp_webhook_secret_key: String,
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    10
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Build and validate the configuration from `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        let raw: RawApiConfig = envy::from_iter(vars.iter().cloned())?;
        let database: DatabaseConfig = envy::prefixed("DATABASE_").from_iter(vars)?;

        if raw.cloudamqp_webhook_secret_key.trim().is_empty() {
            return Err(InvalidConfig::new("CLOUDAMQP_WEBHOOK_SECRET_KEY", "must not be blank").into());
        }
        let bind_addr = raw.bind_addr.parse().map_err(|e| {
            InvalidConfig::new("BIND_ADDR", format!("'{}' is not a socket address: {e}", raw.bind_addr))
        })?;
        if raw.request_timeout_secs == 0 {
            return Err(InvalidConfig::new("REQUEST_TIMEOUT_SECS", "must be at least 1").into());
        }
        database.validate()?;

        Ok(Self {
            env: raw.environment,
            bind_addr,
            webhook_secret: raw.cloudamqp_webhook_secret_key,
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
            database,
        })
    }
}
