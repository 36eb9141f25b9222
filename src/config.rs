use crate::db::sqlite::StoreSettings;
use crate::error::AccountsError;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment keys read by [`Config::from_env`]. Matching is case-insensitive.
const ENV_KEYS: &[&str] = &[
    "database_url",
    "loglevel",
    "max_connections",
    "connect_timeout_secs",
    "query_timeout_secs",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub loglevel: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub query_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let store = StoreSettings::default();
        Self {
            database_url: store.database_url,
            loglevel: "info".to_string(),
            max_connections: store.max_connections,
            connect_timeout_secs: store.connect_timeout.as_secs(),
            query_timeout_secs: store.query_timeout.as_secs(),
        }
    }
}

impl Config {
    /// Defaults overlaid with `DATABASE_URL`, `LOGLEVEL`, `MAX_CONNECTIONS`,
    /// `CONNECT_TIMEOUT_SECS` and `QUERY_TIMEOUT_SECS` from the environment.
    pub fn from_env() -> Result<Self, AccountsError> {
        Self::figment().extract().map_err(AccountsError::from)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(ENV_KEYS))
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            database_url: self.database_url.clone(),
            max_connections: self.max_connections.max(1),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            query_timeout: Duration::from_secs(self.query_timeout_secs.max(1)),
        }
    }
}
