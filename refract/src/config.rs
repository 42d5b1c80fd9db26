use std::env;

use log::LevelFilter;
use sea_orm::ConnectOptions;
use serde::{Deserialize, Serialize};

use crate::{QueryError, RefractResult};

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const MAX_CONNECTIONS_VAR: &str = "REFRACT_MAX_CONNECTIONS";
pub const SQLX_LOGGING_VAR: &str = "REFRACT_SQLX_LOGGING";

/// Connection settings for [`crate::QueryFactory::connect`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Let sqlx log every statement at debug level.
    pub sqlx_logging: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            sqlx_logging: false,
        }
    }
}

impl FactoryConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Read settings from the environment, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> RefractResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> RefractResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(DATABASE_URL_VAR) {
            config.database_url = url;
        }
        if let Some(raw) = lookup(MAX_CONNECTIONS_VAR) {
            config.max_connections = raw.trim().parse().map_err(|_| {
                QueryError::invalid_configuration(MAX_CONNECTIONS_VAR, format!("not a number: {raw}"))
            })?;
            if config.max_connections == 0 {
                return Err(QueryError::invalid_configuration(
                    MAX_CONNECTIONS_VAR,
                    "must be at least 1",
                ));
            }
        }
        if let Some(raw) = lookup(SQLX_LOGGING_VAR) {
            config.sqlx_logging = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(QueryError::invalid_configuration(
                        SQLX_LOGGING_VAR,
                        format!("not a boolean: {raw}"),
                    ))
                }
            };
        }
        Ok(config)
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.database_url.clone());
        options
            .max_connections(self.max_connections)
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(LevelFilter::Debug);
        options
    }
}
