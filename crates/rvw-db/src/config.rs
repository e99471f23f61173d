use std::{fmt, str::FromStr};

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::error::InvalidConfig;

/// Connection settings for the review database.
///
/// Loaded once at startup from the `DATABASE_*` variables (`DATABASE_HOST`,
/// `DATABASE_PORT`, `DATABASE_USERNAME`, `DATABASE_PASSWORD`, `DATABASE_NAME`,
/// `DATABASE_SSLMODE`, `DATABASE_MAX_CONNECTIONS`) and validated before any
/// connection is attempted.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_port() -> u16 {
    5432
}

fn default_sslmode() -> String {
    "prefer".to_string()
}

const fn default_max_connections() -> u32 {
    25
}

impl DatabaseConfig {
    /// Check every field once so bad settings fail at startup, not on first query.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        for (key, value) in [
            ("DATABASE_HOST", &self.host),
            ("DATABASE_USERNAME", &self.username),
            ("DATABASE_NAME", &self.name),
        ] {
            if value.trim().is_empty() {
                return Err(InvalidConfig::new(key, "must not be blank"));
            }
        }
        if self.port == 0 {
            return Err(InvalidConfig::new("DATABASE_PORT", "must not be 0"));
        }
        if self.max_connections == 0 {
            return Err(InvalidConfig::new(
                "DATABASE_MAX_CONNECTIONS",
                "must be at least 1",
            ));
        }
        self.ssl_mode()?;
        Ok(())
    }

    pub fn ssl_mode(&self) -> Result<PgSslMode, InvalidConfig> {
        PgSslMode::from_str(&self.sslmode).map_err(|_| {
            InvalidConfig::new(
                "DATABASE_SSLMODE",
                format!(
                    "unknown mode '{}' (expected disable, allow, prefer, require, verify-ca or verify-full)",
                    self.sslmode
                ),
            )
        })
    }

    /// Build sqlx connect options from the validated settings.
    pub fn connect_options(&self) -> Result<PgConnectOptions, InvalidConfig> {
        self.validate()?;
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(self.ssl_mode()?))
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}
